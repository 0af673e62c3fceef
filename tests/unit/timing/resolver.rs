use super::*;
use crate::definition::model::Timing;

fn scene(id: &str, duration: f64, timing: Option<(u64, u64)>) -> Scene {
    Scene {
        id: id.to_owned(),
        kind: SceneKind::FullBleed,
        duration,
        timing: timing.map(|(start, end)| Timing { start, end }),
        content: serde_json::json!({}),
    }
}

fn spans(r: &[ResolvedScene]) -> Vec<(&str, u64, u64)> {
    r.iter()
        .map(|s| (s.id.as_str(), s.start_frame, s.end_frame()))
        .collect()
}

#[test]
fn explicit_timing_wins_over_duration() {
    let r = resolve(&[scene("a", 5.0, Some((10, 40)))], Fps(30));
    assert_eq!(spans(&r), vec![("a", 10, 40)]);
    assert_eq!(r[0].duration_frames, 30);
}

#[test]
fn untimed_scenes_start_at_zero_by_default() {
    let r = resolve(&[scene("a", 4.0, None), scene("b", 6.0, None)], Fps(30));
    assert_eq!(spans(&r), vec![("a", 0, 120), ("b", 0, 180)]);
}

#[test]
fn sequential_policy_stacks_untimed_scenes() {
    let scenes = [
        scene("a", 4.0, None),
        scene("pinned", 1.0, Some((30, 60))),
        scene("b", 6.0, None),
    ];
    let r = resolve_with(&scenes, Fps(30), TimingPolicy::Sequential);
    assert_eq!(
        spans(&r),
        vec![("a", 0, 120), ("pinned", 30, 60), ("b", 120, 300)]
    );
}

#[test]
fn non_positive_lengths_are_dropped() {
    let scenes = [
        scene("zero", 0.0, None),
        scene("tiny", 0.01, None),
        scene("inverted", 3.0, Some((50, 20))),
        scene("empty", 3.0, Some((20, 20))),
        scene("ok", 1.0, None),
    ];
    let r = resolve(&scenes, Fps(30));
    assert_eq!(spans(&r), vec![("ok", 0, 30)]);
    assert!(r.iter().all(|s| s.duration_frames > 0));
}

#[test]
fn dropped_scenes_do_not_advance_sequential_cursor() {
    let scenes = [scene("zero", 0.0, None), scene("a", 1.0, None)];
    let r = resolve_with(&scenes, Fps(30), TimingPolicy::Sequential);
    assert_eq!(spans(&r), vec![("a", 0, 30)]);
}

#[test]
fn ordering_is_by_start_then_document_position() {
    let scenes = [
        scene("late", 1.0, Some((90, 120))),
        scene("first", 1.0, Some((0, 30))),
        scene("tie", 2.0, None),
    ];
    let r = resolve(&scenes, Fps(30));
    assert_eq!(
        r.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
        vec!["first", "tie", "late"]
    );
    assert_eq!(r[0].index, 1);
    assert_eq!(r[1].index, 2);
    assert_eq!(r[2].index, 0);
}

#[test]
fn resolution_is_deterministic() {
    let scenes = [
        scene("a", 2.5, None),
        scene("b", 1.0, Some((15, 45))),
        scene("c", 0.5, None),
    ];
    assert_eq!(resolve(&scenes, Fps(24)), resolve(&scenes, Fps(24)));
}

#[test]
fn durations_round_to_nearest_frame() {
    let r = resolve(&[scene("a", 1.01, None)], Fps(30));
    assert_eq!(r[0].duration_frames, 30);
    let r = resolve(&[scene("a", 0.05, None)], Fps(30));
    assert_eq!(r[0].duration_frames, 2);
}

#[test]
fn range_and_schedule_end() {
    let r = resolve(
        &[scene("a", 1.0, Some((10, 40))), scene("b", 2.0, None)],
        Fps(30),
    );
    assert_eq!(r[1].range().len_frames(), 30);
    assert_eq!(schedule_end(&r), 60);
    assert_eq!(schedule_end(&[]), 0);
}

#[test]
fn policy_parses_from_kebab_and_snake_case() {
    assert_eq!("sequential".parse(), Ok(TimingPolicy::Sequential));
    assert_eq!("start-at-zero".parse(), Ok(TimingPolicy::StartAtZero));
    assert!("random".parse::<TimingPolicy>().is_err());
    assert_eq!(TimingPolicy::default().to_string(), "start_at_zero");
}

#[test]
fn timing_near_the_top_of_the_frame_range_resolves() {
    let near_max = i64::MAX as u64;
    let scenes = [
        scene("edge", 1.0, Some((near_max, near_max + 1))),
        scene("wide", 1.0, Some((0, 10_000_000_000_000_000_000))),
    ];
    let r = resolve(&scenes, Fps(1));
    assert_eq!(
        spans(&r),
        vec![
            ("wide", 0, 10_000_000_000_000_000_000),
            ("edge", near_max, near_max + 1),
        ]
    );
}

#[test]
fn sequential_cursor_saturates_instead_of_overflowing() {
    let scenes = [
        scene("a", 9e18, None),
        scene("b", 9e18, None),
        scene("c", 9e18, None),
    ];
    let r = resolve_with(&scenes, Fps(1), TimingPolicy::Sequential);
    assert_eq!(r.len(), 3);
    assert_eq!(r[1].start_frame, 9_000_000_000_000_000_000);
    assert_eq!(r[2].start_frame, 18_000_000_000_000_000_000);
    assert_eq!(r[2].end_frame(), u64::MAX);
}
