use crate::{
    dispatch::{
        content::{
            Align, AnimationSpec, BarDatum, ChartData, ChartSpec, Direction, HeaderSpec, Position,
            Scalar, SeriesDatum,
        },
        dispatcher::DispatchError,
    },
    foundation::error::ReelError,
    layout::chart::{
        BAR_GAP_FRACTION, CandleGeometry, ChartBox, ChartKind, ChartScale, Ohlc, Polyline,
        ScalePolicy, X_LABEL_BAND_PX, candlestick_scale, format_axis_value, layout_categorical,
        layout_continuous, map_candlestick_with_scale,
    },
};

pub const DEFAULT_CHART_COLOR: &str = "#3b82f6";
pub const DEFAULT_CANDLE_COLOR: &str = "#10b981";
pub const DEFAULT_CALLOUT_COLOR: &str = "#f59e0b";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#000";
pub const DEFAULT_FRAME_OVERLAY_COLOR: &str = "#00ffff";
pub const DEFAULT_SPLIT_RATIO: f64 = 0.5;
/// Inset of corner-anchored overlays from the frame edges.
pub const OVERLAY_INSET_PX: f64 = 100.0;
pub const WIPE_DURATION_SECS: f64 = 1.0;

/// What the composition layer should draw for one scene.
///
/// Serializes to the props object of the template named by [`RenderInstruction::component`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum RenderInstruction {
    SplitScreen(SplitScreenProps),
    FullBleed(FullBleedProps),
    StatCallout(StatCalloutProps),
    Wipe(WipeProps),
    ArrowSweep(ArrowSweepProps),
    Dissolve(DissolveProps),
    Grid(serde_json::Value),
}

impl RenderInstruction {
    /// Template name understood by the composition layer.
    pub fn component(&self) -> &'static str {
        match self {
            RenderInstruction::SplitScreen(_) => "SplitScreen",
            RenderInstruction::FullBleed(_) => "FullBleed",
            RenderInstruction::StatCallout(_) => "StatCallout",
            RenderInstruction::Wipe(_) => "Wipe",
            RenderInstruction::ArrowSweep(_) => "ArrowSweep",
            RenderInstruction::Dissolve(_) => "Dissolve",
            RenderInstruction::Grid(_) => "Grid",
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub align: Align,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl HeaderProps {
    pub(crate) fn from_spec(spec: &HeaderSpec, default_align: Align) -> Self {
        Self {
            category: spec.category.clone(),
            title: spec.title.clone(),
            subtitle: spec.subtitle.clone(),
            align: spec.align.unwrap_or(default_align),
            color: spec.color.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<HeaderProps>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartInstruction>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitScreenProps {
    pub ratio: f64,
    pub divider: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_animation: Option<AnimationSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<PanelProps>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<PanelProps>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOverlayProps {
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullBleedProps {
    /// Set only when the scene declares a background.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<HeaderProps>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextProps>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<FrameOverlayProps>,
}

/// Absolute placement of an overlay in frame pixels.
///
/// Unset edges are left to the template. `centered` means the overlay's own centre sits on the
/// frame centre.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    pub centered: bool,
}

impl Anchor {
    pub fn for_position(position: Option<Position>) -> Self {
        let inset = Some(OVERLAY_INSET_PX);
        match position {
            None => Anchor::default(),
            Some(Position::TopLeft) => Anchor {
                top: inset,
                left: inset,
                ..Anchor::default()
            },
            Some(Position::TopRight) => Anchor {
                top: inset,
                right: inset,
                ..Anchor::default()
            },
            Some(Position::BottomLeft) => Anchor {
                bottom: inset,
                left: inset,
                ..Anchor::default()
            },
            Some(Position::BottomRight) => Anchor {
                bottom: inset,
                right: inset,
                ..Anchor::default()
            },
            Some(Position::Center) => Anchor {
                centered: true,
                ..Anchor::default()
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCalloutProps {
    pub value: Scalar,
    pub label: String,
    pub color: String,
    pub anchor: Anchor,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WipeProps {
    pub direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub duration_secs: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowSweepProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct DissolveProps {}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarGeometry {
    pub label: String,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
}

/// Pixel geometry of a laid-out chart, in plot coordinates (origin top-left of the plot area).
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ChartGeometry {
    Bars {
        bars: Vec<BarGeometry>,
    },
    Series {
        line: Polyline,
        filled: bool,
        #[serde(rename = "xLabels")]
        x_labels: Vec<String>,
    },
    Candles {
        candles: Vec<CandleGeometry>,
        labels: Vec<String>,
    },
}

/// A chart ready to draw: resolved scale, axis labels and geometry.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartInstruction {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationSpec>,
    pub width: f64,
    pub height: f64,
    pub scale: ChartScale,
    /// One label per gridline, bottom to top.
    pub axis_labels: Vec<String>,
    pub geometry: ChartGeometry,
}

impl ChartInstruction {
    pub(crate) fn build(spec: &ChartSpec, chart_box: &ChartBox) -> Result<Self, DispatchError> {
        let plot_w = chart_box.plot_width();
        let default_color = match spec.kind {
            ChartKind::Candlestick => DEFAULT_CANDLE_COLOR,
            _ => DEFAULT_CHART_COLOR,
        };
        let color = spec
            .color
            .clone()
            .unwrap_or_else(|| default_color.to_owned());

        let (scale, geometry) = match spec.data()? {
            ChartData::Bar(data) => bar_geometry(&data, &color, plot_w, chart_box.height)?,
            ChartData::Series(data) => series_geometry(
                spec.kind,
                &data,
                plot_w,
                chart_box.height - X_LABEL_BAND_PX,
            )?,
            ChartData::Candles(data) => candle_geometry(
                &data,
                spec.labels.clone().unwrap_or_default(),
                plot_w,
                chart_box.height,
            )?,
        };

        Ok(Self {
            kind: spec.kind,
            title: spec.title.clone(),
            color,
            animation: spec.animation.clone(),
            width: chart_box.width,
            height: chart_box.height,
            axis_labels: scale.grid_lines.iter().map(|v| format_axis_value(*v)).collect(),
            scale,
            geometry,
        })
    }
}

fn layout_err(e: ReelError) -> DispatchError {
    DispatchError::ContentShape(e.to_string())
}

fn bar_geometry(
    data: &[BarDatum],
    color: &str,
    width: f64,
    height: f64,
) -> Result<(ChartScale, ChartGeometry), DispatchError> {
    let values: Vec<f64> = data.iter().map(|d| d.value).collect();
    let scale = ScalePolicy::for_kind(ChartKind::Bar)
        .apply(&values)
        .map_err(layout_err)?;
    let slots = layout_categorical(data.len(), width, BAR_GAP_FRACTION).map_err(layout_err)?;

    let bars = data
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let h = scale.extent_px(d.value, height);
            BarGeometry {
                label: d.label.clone(),
                value: d.value,
                x: slots.x_for(i),
                y: height - h,
                width: slots.bar_width,
                height: h,
                color: d.color.clone().unwrap_or_else(|| color.to_owned()),
            }
        })
        .collect();
    Ok((scale, ChartGeometry::Bars { bars }))
}

fn series_geometry(
    kind: ChartKind,
    data: &[SeriesDatum],
    width: f64,
    height: f64,
) -> Result<(ChartScale, ChartGeometry), DispatchError> {
    let values: Vec<f64> = data.iter().map(|d| d.y).collect();
    let scale = ScalePolicy::for_kind(kind)
        .apply(&values)
        .map_err(layout_err)?;
    let line = layout_continuous(&values, &scale, width, height).map_err(layout_err)?;
    Ok((
        scale,
        ChartGeometry::Series {
            line,
            filled: kind == ChartKind::Area,
            x_labels: data.iter().map(|d| d.x.label()).collect(),
        },
    ))
}

fn candle_geometry(
    data: &[Ohlc],
    labels: Vec<String>,
    width: f64,
    height: f64,
) -> Result<(ChartScale, ChartGeometry), DispatchError> {
    let scale = candlestick_scale(data).map_err(layout_err)?;
    let candles = map_candlestick_with_scale(data, &scale, width, height).map_err(layout_err)?;
    Ok((scale, ChartGeometry::Candles { candles, labels }))
}

#[cfg(test)]
#[path = "../../tests/unit/dispatch/instruction.rs"]
mod tests;
