use super::*;
use crate::dispatch::content::Position;
use serde_json::json;

#[test]
fn unknown_scene_type_is_reported_not_panicked() {
    let err = dispatch("carousel", &json!({})).unwrap_err();
    assert_eq!(err, DispatchError::UnknownSceneType("carousel".to_owned()));
}

#[test]
fn split_screen_applies_defaults() {
    let inst = dispatch(
        "split_screen",
        &json!({
            "global": { "title": "Rates vs Jobs" },
            "left": { "header": { "title": "Rates" } },
            "right": { "chart": { "type": "bar", "data": [ { "label": "Q1", "value": 2 } ] } }
        }),
    )
    .unwrap();
    let RenderInstruction::SplitScreen(p) = inst else {
        panic!("expected split screen");
    };
    assert_eq!(p.ratio, 0.5);
    assert!(p.divider);
    assert_eq!(p.title.as_deref(), Some("Rates vs Jobs"));
    let left = p.left.unwrap();
    assert_eq!(left.header.unwrap().align, Align::Left);
    assert!(p.right.unwrap().chart.is_some());
}

#[test]
fn split_screen_divider_only_off_when_false() {
    let base = json!({ "left": { "header": { "title": "L" } }, "divider": false });
    let RenderInstruction::SplitScreen(p) = dispatch("split_screen", &base).unwrap() else {
        panic!("expected split screen");
    };
    assert!(!p.divider);
}

#[test]
fn split_screen_needs_a_panel() {
    let err = dispatch("split_screen", &json!({ "divider": true })).unwrap_err();
    assert!(matches!(err, DispatchError::ContentShape(_)));
}

#[test]
fn split_screen_ratio_must_be_open_unit_interval() {
    for ratio in [0.0, 1.0, 1.5, -0.2] {
        let err = dispatch(
            "split_screen",
            &json!({ "left": { "header": { "title": "L" } }, "ratio": ratio }),
        )
        .unwrap_err();
        assert!(matches!(err, DispatchError::ContentShape(_)), "{ratio}");
    }
    assert!(
        dispatch(
            "split_screen",
            &json!({ "right": { "header": { "title": "R" } }, "ratio": 0.3 })
        )
        .is_ok()
    );
}

#[test]
fn full_bleed_without_content_is_empty() {
    let err = dispatch("full_bleed", &json!({ "background": { "color": "#111" } })).unwrap_err();
    assert_eq!(err, DispatchError::EmptyScene);
}

#[test]
fn full_bleed_defaults() {
    let inst = dispatch(
        "full_bleed",
        &json!({
            "header": { "title": "Breaking" },
            "text": "Markets rally",
            "background": {},
            "overlay": { "type": "scanlines" }
        }),
    )
    .unwrap();
    let RenderInstruction::FullBleed(p) = inst else {
        panic!("expected full bleed");
    };
    assert_eq!(p.header.unwrap().align, Align::Center);
    assert_eq!(p.text.unwrap().content, "Markets rally");
    assert_eq!(p.background_color.as_deref(), Some(DEFAULT_BACKGROUND_COLOR));
    let overlay = p.overlay.unwrap();
    assert_eq!(overlay.kind, "scanlines");
    assert_eq!(overlay.color, DEFAULT_FRAME_OVERLAY_COLOR);
}

#[test]
fn full_bleed_styled_text_keeps_color() {
    let RenderInstruction::FullBleed(p) = dispatch(
        "full_bleed",
        &json!({ "text": { "content": "Up 3%", "color": "#0f0" } }),
    )
    .unwrap() else {
        panic!("expected full bleed");
    };
    let text = p.text.unwrap();
    assert_eq!(text.content, "Up 3%");
    assert_eq!(text.color.as_deref(), Some("#0f0"));
    assert!(p.background_color.is_none());
}

#[test]
fn full_bleed_explicit_header_align_wins() {
    let RenderInstruction::FullBleed(p) = dispatch(
        "full_bleed",
        &json!({ "header": { "title": "T", "align": "right" } }),
    )
    .unwrap() else {
        panic!("expected full bleed");
    };
    assert_eq!(p.header.unwrap().align, Align::Right);
}

#[test]
fn stat_callout_positions_resolve_to_anchors() {
    let RenderInstruction::StatCallout(p) = dispatch(
        "overlay",
        &json!({
            "component": "stat_callout",
            "position": "bottom_right",
            "data": { "value": "4.2%", "label": "Inflation" }
        }),
    )
    .unwrap() else {
        panic!("expected stat callout");
    };
    assert_eq!(p.color, DEFAULT_CALLOUT_COLOR);
    assert_eq!(p.anchor.bottom, Some(100.0));
    assert_eq!(p.anchor.right, Some(100.0));
    assert_eq!(p.anchor.top, None);
    assert!(!p.anchor.centered);

    let center = Anchor::for_position(Some(Position::Center));
    assert!(center.centered);
    assert_eq!(center.top, None);
}

#[test]
fn unknown_overlay_component() {
    let err = dispatch("overlay", &json!({ "component": "ticker" })).unwrap_err();
    assert_eq!(err, DispatchError::UnknownComponent("ticker".to_owned()));
}

#[test]
fn stat_callout_without_data_is_a_shape_error() {
    let err = dispatch("overlay", &json!({ "component": "stat_callout" })).unwrap_err();
    assert!(matches!(err, DispatchError::ContentShape(_)));
}

#[test]
fn wipe_direction_defaults_to_right() {
    let RenderInstruction::Wipe(w) = dispatch("transition", &json!({ "effect": "wipe" })).unwrap()
    else {
        panic!("expected wipe");
    };
    assert_eq!(w.direction, Direction::Right);
    assert_eq!(w.duration_secs, 1.0);

    let RenderInstruction::Wipe(w) =
        dispatch("transition", &json!({ "effect": "wipe", "from": "up" })).unwrap()
    else {
        panic!("expected wipe");
    };
    assert_eq!(w.direction, Direction::Up);
}

#[test]
fn arrow_sweep_and_dissolve() {
    let inst = dispatch(
        "transition",
        &json!({ "effect": "arrow_sweep", "color": "#f00", "message": { "text": "Next: jobs" } }),
    )
    .unwrap();
    assert_eq!(inst.component(), "ArrowSweep");
    let RenderInstruction::ArrowSweep(a) = inst else {
        unreachable!();
    };
    assert_eq!(a.message.as_deref(), Some("Next: jobs"));

    let inst = dispatch("transition", &json!({ "effect": "dissolve" })).unwrap();
    assert_eq!(serde_json::to_value(&inst).unwrap(), json!({}));
}

#[test]
fn grid_passes_payload_through() {
    let payload = json!({ "cells": [ { "title": "A" }, 2 ] });
    let inst = dispatch("grid", &payload).unwrap();
    assert_eq!(inst.component(), "Grid");
    assert_eq!(serde_json::to_value(&inst).unwrap(), payload);
}

#[test]
fn empty_chart_data_is_a_shape_error() {
    let err = dispatch(
        "full_bleed",
        &json!({ "chart": { "type": "line", "data": [] } }),
    )
    .unwrap_err();
    assert!(matches!(err, DispatchError::ContentShape(_)));
}

#[test]
fn mistyped_content_is_a_shape_error() {
    let err = dispatch("transition", &json!({ "effect": 3 })).unwrap_err();
    assert!(matches!(err, DispatchError::ContentShape(_)));
    let err = dispatch("full_bleed", &json!("just a string")).unwrap_err();
    assert!(matches!(err, DispatchError::ContentShape(_)));
}

#[test]
fn dispatch_errors_serialize_with_kind_tag() {
    let v = serde_json::to_value(DispatchError::UnknownComponent("x".to_owned())).unwrap();
    assert_eq!(v, json!({ "kind": "unknown_component", "detail": "x" }));
    let v = serde_json::to_value(DispatchError::EmptyScene).unwrap();
    assert_eq!(v, json!({ "kind": "empty_scene" }));
}

#[test]
fn dispatch_scene_uses_parsed_kind() {
    let scene = Scene {
        id: "s".to_owned(),
        kind: SceneKind::Transition,
        duration: 1.0,
        timing: None,
        content: json!({ "effect": "dissolve" }),
    };
    assert_eq!(dispatch_scene(&scene).unwrap().component(), "Dissolve");
}
