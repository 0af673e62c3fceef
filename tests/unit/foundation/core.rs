use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(FrameIndex(10), FrameIndex(40)).unwrap();
    assert!(!r.contains(FrameIndex(9)));
    assert!(r.contains(FrameIndex(10)));
    assert!(r.contains(FrameIndex(39)));
    assert!(!r.contains(FrameIndex(40)));
    assert_eq!(r.len_frames(), 30);
}

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(4)).is_err());
    assert!(
        FrameRange::new(FrameIndex(5), FrameIndex(5))
            .unwrap()
            .is_empty()
    );
}

#[test]
fn frame_range_overlap_is_half_open() {
    let a = FrameRange::new(FrameIndex(0), FrameIndex(120)).unwrap();
    let b = FrameRange::new(FrameIndex(120), FrameIndex(300)).unwrap();
    let c = FrameRange::new(FrameIndex(0), FrameIndex(180)).unwrap();
    assert!(!a.overlaps(b));
    assert!(a.overlaps(c));
    assert!(c.overlaps(b));
}

#[test]
fn fps_rounds_seconds_to_nearest_frame() {
    let fps = Fps::new(30).unwrap();
    assert_eq!(fps.secs_to_frames_round(4.0), 120);
    assert_eq!(fps.secs_to_frames_round(0.0), 0);
    assert_eq!(fps.secs_to_frames_round(0.05), 2); // 1.5 rounds up
    assert_eq!(fps.secs_to_frames_round(-1.0), -30);
    assert_eq!(fps.secs_to_frames_round(f64::NAN), 0);
    assert_eq!(fps.frames_to_secs(45), 1.5);
}

#[test]
fn budget_frames_clamps_to_unsigned_range() {
    let fps = Fps::new(30).unwrap();
    assert_eq!(fps.budget_frames(10.0), 300);
    assert_eq!(fps.budget_frames(-2.0), 0);
    assert_eq!(fps.budget_frames(f64::INFINITY), 0);
    assert_eq!(Fps(1).budget_frames(1e19), 10_000_000_000_000_000_000);
    assert_eq!(Fps(1).budget_frames(1e30), u64::MAX);
}

#[test]
fn fps_rejects_zero() {
    assert!(Fps::new(0).is_err());
}
