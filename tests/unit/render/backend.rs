use super::*;
use crate::compile::timeline::{CompileOptions, compile_str};

const DOC: &str = r#"{
    "meta": { "id": "r1", "title": "R", "duration": 2, "fps": 25,
              "dimensions": { "width": 640, "height": 360 } },
    "scenes": [ { "id": "t", "type": "transition", "duration": 1,
                  "content": { "effect": "dissolve" } } ]
}"#;

#[test]
fn in_memory_renderer_records_calls() {
    let tl = compile_str(DOC, &CompileOptions::default()).unwrap();
    let mut r = InMemoryRenderer::new();
    let report = r.render(&tl, Path::new("out/a.mp4")).unwrap();
    assert_eq!(report.frames, 50);
    assert_eq!(report.output, PathBuf::from("out/a.mp4"));
    assert!(report.manifest.is_none());

    r.render(&tl, Path::new("out/b.mp4")).unwrap();
    assert_eq!(r.rendered.len(), 2);
    assert_eq!(r.rendered[1].0, PathBuf::from("out/b.mp4"));
    assert_eq!(r.last().unwrap().id, "r1");
}

#[test]
fn renderer_is_object_safe() {
    let tl = compile_str(DOC, &CompileOptions::default()).unwrap();
    let mut boxed: Box<dyn TimelineRenderer> = Box::new(InMemoryRenderer::new());
    assert!(boxed.render(&tl, Path::new("x.mp4")).is_ok());
}
