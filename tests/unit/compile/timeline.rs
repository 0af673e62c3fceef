use super::*;
use serde_json::json;

fn definition(scenes: serde_json::Value) -> VideoDefinition {
    VideoDefinition::from_json_value(&json!({
        "meta": {
            "id": "daily-42",
            "title": "Daily Markets",
            "duration": 10,
            "fps": 30,
            "dimensions": { "width": 1920, "height": 1080 }
        },
        "scenes": scenes
    }))
    .unwrap()
}

#[test]
fn entries_follow_resolved_order() {
    let def = definition(json!([
        { "id": "b", "type": "transition", "duration": 1, "timing": { "start": 60, "end": 90 },
          "content": { "effect": "wipe" } },
        { "id": "a", "type": "full_bleed", "duration": 2,
          "content": { "header": { "title": "Open" } } }
    ]));
    let tl = compile_timeline(&def, &CompileOptions::default()).unwrap();
    let ids: Vec<&str> = tl.entries.iter().map(|e| e.scene_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(tl.entries[0].component, "FullBleed");
    assert_eq!(tl.entries[1].component, "Wipe");
    assert_eq!(tl.entries[1].range().len_frames(), 30);
    assert_eq!(tl.duration_in_frames, 300);
    assert!(tl.skipped.is_empty());
}

#[test]
fn failing_scene_is_skipped_not_fatal() {
    let def = definition(json!([
        { "id": "bad", "type": "overlay", "duration": 1, "content": { "component": "ticker" } },
        { "id": "empty", "type": "full_bleed", "duration": 1, "content": {} },
        { "id": "good", "type": "transition", "duration": 1, "content": { "effect": "dissolve" } }
    ]));
    let tl = compile_timeline(&def, &CompileOptions::default()).unwrap();
    assert_eq!(tl.entries.len(), 1);
    assert_eq!(tl.entries[0].scene_id, "good");
    assert_eq!(tl.skipped.len(), 2);
    assert_eq!(
        tl.skipped[0].error,
        DispatchError::UnknownComponent("ticker".to_owned())
    );
    assert_eq!(tl.skipped[1].error, DispatchError::EmptyScene);
}

#[test]
fn zero_length_scenes_are_neither_entries_nor_skipped() {
    let def = definition(json!([
        { "id": "zero", "type": "transition", "duration": 0, "content": { "effect": "dissolve" } }
    ]));
    let tl = compile_timeline(&def, &CompileOptions::default()).unwrap();
    assert!(tl.entries.is_empty());
    assert!(tl.skipped.is_empty());
}

#[test]
fn sequential_policy_overflow_is_a_schema_error() {
    let def = definition(json!([
        { "id": "a", "type": "transition", "duration": 6, "content": { "effect": "dissolve" } },
        { "id": "b", "type": "transition", "duration": 6, "content": { "effect": "dissolve" } }
    ]));
    assert!(compile_timeline(&def, &CompileOptions::default()).is_ok());

    let opts = CompileOptions {
        timing: TimingPolicy::Sequential,
        ..CompileOptions::default()
    };
    let err = compile_timeline(&def, &opts).unwrap_err();
    let ReelError::Schema(errors) = err else {
        panic!("expected schema error, got {err}");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors[0].path_string(), "$.scenes[1].duration");
}

#[test]
fn resolve_checked_applies_the_frame_budget() {
    let def = definition(json!([
        { "id": "a", "type": "grid", "duration": 6, "content": {} },
        { "id": "b", "type": "grid", "duration": 6, "content": {} }
    ]));
    let r = resolve_checked(&def, TimingPolicy::StartAtZero).unwrap();
    assert_eq!(r.len(), 2);

    let err = resolve_checked(&def, TimingPolicy::Sequential).unwrap_err();
    assert!(matches!(err, ReelError::Schema(_)));
    assert!(err.to_string().contains("$.scenes[1].duration"));
}

#[test]
fn serializes_composition_facing_shape() {
    let def = definition(json!([
        { "id": "a", "type": "full_bleed", "duration": 2,
          "content": { "text": "Hello" } }
    ]));
    let tl = compile_timeline(&def, &CompileOptions::default()).unwrap();
    let v = serde_json::to_value(&tl).unwrap();
    assert_eq!(v["durationInFrames"], 300);
    assert_eq!(v["fps"], 30);
    assert_eq!(v["width"], 1920);
    assert_eq!(v["entries"][0]["startFrame"], 0);
    assert_eq!(v["entries"][0]["durationInFrames"], 60);
    assert_eq!(v["entries"][0]["component"], "FullBleed");
    assert_eq!(v["entries"][0]["props"]["text"]["content"], "Hello");
    assert!(v.get("theme").is_none());
}

#[test]
fn fingerprint_is_stable_and_content_sensitive() {
    let scenes = json!([
        { "id": "a", "type": "full_bleed", "duration": 2, "content": { "text": "Hello" } }
    ]);
    let a = compile_timeline(&definition(scenes.clone()), &CompileOptions::default()).unwrap();
    let b = compile_timeline(&definition(scenes), &CompileOptions::default()).unwrap();
    assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    assert_eq!(a.fingerprint().unwrap().to_string().len(), 32);

    let c = compile_timeline(
        &definition(json!([
            { "id": "a", "type": "full_bleed", "duration": 2, "content": { "text": "Bye" } }
        ])),
        &CompileOptions::default(),
    )
    .unwrap();
    assert_ne!(a.fingerprint().unwrap(), c.fingerprint().unwrap());
}

#[test]
fn active_at_filters_by_frame() {
    let def = definition(json!([
        { "id": "a", "type": "transition", "duration": 1, "content": { "effect": "dissolve" } },
        { "id": "b", "type": "transition", "duration": 1, "timing": { "start": 20, "end": 50 },
          "content": { "effect": "dissolve" } }
    ]));
    let tl = compile_timeline(&def, &CompileOptions::default()).unwrap();
    let at = |f| {
        tl.active_at(FrameIndex(f))
            .map(|e| e.scene_id.as_str())
            .collect::<Vec<_>>()
    };
    assert_eq!(at(0), vec!["a"]);
    assert_eq!(at(25), vec!["a", "b"]);
    assert_eq!(at(30), vec!["b"]);
    assert!(at(50).is_empty());
    assert!(tl.entry("b").is_some());
}

#[test]
fn invalid_chart_box_is_rejected() {
    let def = definition(json!([]));
    let opts = CompileOptions {
        chart: ChartBox {
            width: 10.0,
            height: 10.0,
        },
        ..CompileOptions::default()
    };
    assert!(matches!(
        compile_timeline(&def, &opts),
        Err(ReelError::Layout(_))
    ));
}

#[test]
fn compile_str_reports_schema_errors() {
    let err = compile_str("{\"meta\": {}}", &CompileOptions::default()).unwrap_err();
    assert!(matches!(err, ReelError::Schema(_)));
    let err = compile_str("not json", &CompileOptions::default()).unwrap_err();
    assert!(matches!(err, ReelError::Serde(_)));
}
