use serde::de::DeserializeOwned;

use crate::{
    definition::model::SceneKind,
    dispatch::dispatcher::DispatchError,
    layout::chart::{ChartKind, Ohlc},
};

/// Typed scene payload, one variant per scene `type`.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneContent {
    SplitScreen(SplitScreenContent),
    FullBleed(FullBleedContent),
    Overlay(OverlayContent),
    Transition(TransitionContent),
    /// Opaque payload handed to the grid template untouched.
    Grid(serde_json::Value),
}

impl SceneContent {
    /// Type `content` according to `kind`. Shape mismatches become [`DispatchError::ContentShape`].
    pub fn from_value(kind: SceneKind, content: &serde_json::Value) -> Result<Self, DispatchError> {
        Ok(match kind {
            SceneKind::SplitScreen => SceneContent::SplitScreen(typed(content)?),
            SceneKind::FullBleed => SceneContent::FullBleed(typed(content)?),
            SceneKind::Overlay => SceneContent::Overlay(typed(content)?),
            SceneKind::Transition => SceneContent::Transition(typed(content)?),
            SceneKind::Grid => SceneContent::Grid(content.clone()),
        })
    }
}

pub(crate) fn typed<T: DeserializeOwned>(v: &serde_json::Value) -> Result<T, DispatchError> {
    <T as serde::Deserialize>::deserialize(v).map_err(|e| DispatchError::ContentShape(e.to_string()))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HeaderSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Animation hints forwarded to the template as-is.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    /// Entries are typed per chart kind by [`ChartSpec::data`].
    pub data: Vec<serde_json::Value>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub animation: Option<AnimationSpec>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BarDatum {
    pub label: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A category or numeric x value, serialized back unchanged.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    pub fn label(&self) -> String {
        match self {
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct SeriesDatum {
    pub x: Scalar,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChartData {
    Bar(Vec<BarDatum>),
    Series(Vec<SeriesDatum>),
    Candles(Vec<Ohlc>),
}

impl ChartSpec {
    pub fn data(&self) -> Result<ChartData, DispatchError> {
        if self.data.is_empty() {
            return Err(DispatchError::ContentShape(format!(
                "{:?} chart has no data",
                self.kind
            )));
        }
        fn each<T: DeserializeOwned>(data: &[serde_json::Value]) -> Result<Vec<T>, DispatchError> {
            data.iter().map(typed).collect()
        }
        Ok(match self.kind {
            ChartKind::Bar => ChartData::Bar(each(&self.data)?),
            ChartKind::Line | ChartKind::Area => ChartData::Series(each(&self.data)?),
            ChartKind::Candlestick => ChartData::Candles(each(&self.data)?),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
pub struct PanelSpec {
    #[serde(default)]
    pub header: Option<HeaderSpec>,
    #[serde(default)]
    pub chart: Option<ChartSpec>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
pub struct GlobalSpec {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "titleAnimation")]
    pub title_animation: Option<AnimationSpec>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct SplitScreenContent {
    #[serde(default)]
    pub global: Option<GlobalSpec>,
    #[serde(default)]
    pub left: Option<PanelSpec>,
    #[serde(default)]
    pub right: Option<PanelSpec>,
    #[serde(default)]
    pub divider: Option<bool>,
    #[serde(default)]
    pub ratio: Option<f64>,
}

/// Full-bleed text: bare string or `{content, color}`.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(untagged)]
pub enum TextSpec {
    Plain(String),
    Styled {
        content: String,
        #[serde(default)]
        color: Option<String>,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct BackgroundSpec {
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct FrameOverlaySpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct FullBleedContent {
    #[serde(default)]
    pub header: Option<HeaderSpec>,
    #[serde(default)]
    pub text: Option<TextSpec>,
    #[serde(default)]
    pub chart: Option<ChartSpec>,
    #[serde(default)]
    pub background: Option<BackgroundSpec>,
    #[serde(default)]
    pub overlay: Option<FrameOverlaySpec>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct OverlayContent {
    pub component: String,
    #[serde(default)]
    pub position: Option<Position>,
    /// Component-specific payload, typed once the component is known.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct CalloutData {
    pub value: Scalar,
    pub label: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionEffect {
    Wipe,
    ArrowSweep,
    Dissolve,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct MessageSpec {
    pub text: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct TransitionContent {
    pub effect: TransitionEffect,
    #[serde(default)]
    pub from: Option<Direction>,
    #[serde(default)]
    pub to: Option<Direction>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub message: Option<MessageSpec>,
}
