use crate::{
    definition::model::{Scene, SceneKind, UnknownSceneKind},
    dispatch::{
        content::{
            Align, CalloutData, ChartSpec, Direction, FullBleedContent, OverlayContent, PanelSpec,
            SceneContent, SplitScreenContent, TextSpec, TransitionContent, TransitionEffect,
            typed,
        },
        instruction::{
            Anchor, ArrowSweepProps, ChartInstruction, DEFAULT_BACKGROUND_COLOR,
            DEFAULT_CALLOUT_COLOR, DEFAULT_FRAME_OVERLAY_COLOR, DEFAULT_SPLIT_RATIO,
            DissolveProps, FrameOverlayProps, FullBleedProps, HeaderProps, PanelProps,
            RenderInstruction, SplitScreenProps, StatCalloutProps, TextProps, WIPE_DURATION_SECS,
            WipeProps,
        },
    },
    layout::chart::ChartBox,
};

/// Why a single scene produced no render instruction.
///
/// These never abort a video; the compiler records them next to the scene id.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DispatchError {
    #[error("content shape: {0}")]
    ContentShape(String),

    #[error("scene has nothing to render")]
    EmptyScene,

    #[error("unknown overlay component \"{0}\"")]
    UnknownComponent(String),

    #[error("unknown scene type \"{0}\"")]
    UnknownSceneType(String),
}

pub const STAT_CALLOUT: &str = "stat_callout";

/// Map a scene `type` string and its raw content to a render instruction.
pub fn dispatch(
    kind: &str,
    content: &serde_json::Value,
) -> Result<RenderInstruction, DispatchError> {
    dispatch_with(kind, content, &ChartBox::default())
}

/// [`dispatch`] with charts laid out into `chart_box`.
pub fn dispatch_with(
    kind: &str,
    content: &serde_json::Value,
    chart_box: &ChartBox,
) -> Result<RenderInstruction, DispatchError> {
    let kind: SceneKind = kind
        .parse()
        .map_err(|UnknownSceneKind(name)| DispatchError::UnknownSceneType(name))?;
    let content = SceneContent::from_value(kind, content)?;
    dispatch_content(&content, chart_box)
}

/// Dispatch a parsed scene with the default chart box.
pub fn dispatch_scene(scene: &Scene) -> Result<RenderInstruction, DispatchError> {
    dispatch_scene_with(scene, &ChartBox::default())
}

pub fn dispatch_scene_with(
    scene: &Scene,
    chart_box: &ChartBox,
) -> Result<RenderInstruction, DispatchError> {
    let content = SceneContent::from_value(scene.kind, &scene.content)?;
    dispatch_content(&content, chart_box)
}

pub fn dispatch_content(
    content: &SceneContent,
    chart_box: &ChartBox,
) -> Result<RenderInstruction, DispatchError> {
    match content {
        SceneContent::SplitScreen(c) => split_screen(c, chart_box),
        SceneContent::FullBleed(c) => full_bleed(c, chart_box),
        SceneContent::Overlay(c) => overlay(c),
        SceneContent::Transition(c) => Ok(transition(c)),
        SceneContent::Grid(v) => Ok(RenderInstruction::Grid(v.clone())),
    }
}

fn chart(
    spec: Option<&ChartSpec>,
    chart_box: &ChartBox,
) -> Result<Option<ChartInstruction>, DispatchError> {
    spec.map(|c| ChartInstruction::build(c, chart_box))
        .transpose()
}

fn panel(
    spec: Option<&PanelSpec>,
    chart_box: &ChartBox,
) -> Result<Option<PanelProps>, DispatchError> {
    let Some(p) = spec else {
        return Ok(None);
    };
    Ok(Some(PanelProps {
        header: p
            .header
            .as_ref()
            .map(|h| HeaderProps::from_spec(h, Align::Left)),
        chart: chart(p.chart.as_ref(), chart_box)?,
    }))
}

fn split_screen(
    c: &SplitScreenContent,
    chart_box: &ChartBox,
) -> Result<RenderInstruction, DispatchError> {
    if c.left.is_none() && c.right.is_none() {
        return Err(DispatchError::ContentShape(
            "split_screen needs a left or right panel".to_owned(),
        ));
    }
    let ratio = c.ratio.unwrap_or(DEFAULT_SPLIT_RATIO);
    if !(ratio > 0.0 && ratio < 1.0) {
        return Err(DispatchError::ContentShape(format!(
            "split_screen ratio must be in (0, 1), got {ratio}"
        )));
    }
    let global = c.global.clone().unwrap_or_default();

    Ok(RenderInstruction::SplitScreen(SplitScreenProps {
        ratio,
        divider: c.divider != Some(false),
        title: global.title,
        title_animation: global.title_animation,
        left: panel(c.left.as_ref(), chart_box)?,
        right: panel(c.right.as_ref(), chart_box)?,
    }))
}

fn full_bleed(
    c: &FullBleedContent,
    chart_box: &ChartBox,
) -> Result<RenderInstruction, DispatchError> {
    if c.header.is_none() && c.text.is_none() && c.chart.is_none() {
        return Err(DispatchError::EmptyScene);
    }

    let text = c.text.as_ref().map(|t| match t {
        TextSpec::Plain(s) => TextProps {
            content: s.clone(),
            color: None,
        },
        TextSpec::Styled { content, color } => TextProps {
            content: content.clone(),
            color: color.clone(),
        },
    });

    Ok(RenderInstruction::FullBleed(FullBleedProps {
        background_color: c.background.as_ref().map(|b| {
            b.color
                .clone()
                .unwrap_or_else(|| DEFAULT_BACKGROUND_COLOR.to_owned())
        }),
        header: c
            .header
            .as_ref()
            .map(|h| HeaderProps::from_spec(h, Align::Center)),
        text,
        chart: chart(c.chart.as_ref(), chart_box)?,
        overlay: c.overlay.as_ref().map(|o| FrameOverlayProps {
            kind: o.kind.clone(),
            color: o
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_FRAME_OVERLAY_COLOR.to_owned()),
        }),
    }))
}

fn overlay(c: &OverlayContent) -> Result<RenderInstruction, DispatchError> {
    if c.component != STAT_CALLOUT {
        return Err(DispatchError::UnknownComponent(c.component.clone()));
    }
    let data: CalloutData = match &c.data {
        Some(v) => typed(v)?,
        None => {
            return Err(DispatchError::ContentShape(
                "stat_callout needs data".to_owned(),
            ));
        }
    };
    Ok(RenderInstruction::StatCallout(StatCalloutProps {
        value: data.value,
        label: data.label,
        color: data
            .color
            .unwrap_or_else(|| DEFAULT_CALLOUT_COLOR.to_owned()),
        anchor: Anchor::for_position(c.position),
    }))
}

fn transition(c: &TransitionContent) -> RenderInstruction {
    match c.effect {
        TransitionEffect::Wipe => RenderInstruction::Wipe(WipeProps {
            direction: c.from.unwrap_or(Direction::Right),
            to: c.to,
            color: c.color.clone(),
            duration_secs: WIPE_DURATION_SECS,
        }),
        TransitionEffect::ArrowSweep => RenderInstruction::ArrowSweep(ArrowSweepProps {
            color: c.color.clone(),
            message: c.message.as_ref().map(|m| m.text.clone()),
        }),
        TransitionEffect::Dissolve => RenderInstruction::Dissolve(DissolveProps::default()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dispatch/dispatcher.rs"]
mod tests;
