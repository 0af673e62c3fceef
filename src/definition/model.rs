use std::{fmt, path::Path, str::FromStr};

use crate::{
    foundation::core::{Dimensions, Fps, FrameIndex},
    foundation::error::{ReelError, ReelResult},
    schema::validate,
};

/// A complete video plan: metadata, optional theme and an ordered list of scenes.
///
/// Definitions are produced by an LLM planning step or written by hand, and are treated as
/// immutable once parsed. Build one through [`VideoDefinition::from_json_str`],
/// [`VideoDefinition::from_path`] or [`crate::parse`] so the structural contract is enforced;
/// deserializing with Serde directly skips validation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VideoDefinition {
    /// Video-level metadata.
    pub meta: Meta,
    /// Cosmetic theme; has no effect on timing or validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    /// Scenes in document order.
    pub scenes: Vec<Scene>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Meta {
    /// Identifier unique within a render run.
    pub id: String,
    pub title: String,
    /// Total length in seconds.
    pub duration: f64,
    pub fps: Fps,
    pub dimensions: Dimensions,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Bloomberg,
    Wsj,
    Ft,
    Default,
}

impl Theme {
    pub const NAMES: [&'static str; 4] = ["bloomberg", "wsj", "ft", "default"];
}

/// One timed segment of the video.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    /// Display/debug key, unique within the definition.
    pub id: String,
    /// Content discriminator.
    #[serde(rename = "type")]
    pub kind: SceneKind,
    /// Declared length in seconds. Ignored when `timing` is present.
    pub duration: f64,
    /// Explicit frame placement; takes precedence over `duration`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<Timing>,
    /// Type-specific payload, typed by [`crate::SceneContent::from_value`].
    pub content: serde_json::Value,
}

/// Explicit `[start, end)` frame placement of a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Timing {
    pub start: u64,
    pub end: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    SplitScreen,
    Overlay,
    Transition,
    FullBleed,
    Grid,
}

impl SceneKind {
    pub const NAMES: [&'static str; 5] = [
        "split_screen",
        "overlay",
        "transition",
        "full_bleed",
        "grid",
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SceneKind::SplitScreen => "split_screen",
            SceneKind::Overlay => "overlay",
            SceneKind::Transition => "transition",
            SceneKind::FullBleed => "full_bleed",
            SceneKind::Grid => "grid",
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a scene `type` string is not one of [`SceneKind::NAMES`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownSceneKind(pub String);

impl FromStr for SceneKind {
    type Err = UnknownSceneKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "split_screen" => Ok(SceneKind::SplitScreen),
            "overlay" => Ok(SceneKind::Overlay),
            "transition" => Ok(SceneKind::Transition),
            "full_bleed" => Ok(SceneKind::FullBleed),
            "grid" => Ok(SceneKind::Grid),
            other => Err(UnknownSceneKind(other.to_owned())),
        }
    }
}

impl VideoDefinition {
    /// Parse and validate a definition from a JSON value.
    pub fn from_json_value(raw: &serde_json::Value) -> ReelResult<Self> {
        Ok(validate::parse(raw)?)
    }

    /// Parse and validate a definition from JSON text.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let raw: serde_json::Value =
            serde_json::from_str(s).map_err(|e| ReelError::serde(format!("invalid JSON: {e}")))?;
        Self::from_json_value(&raw)
    }

    /// Read, parse and validate a definition file.
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        use anyhow::Context as _;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read video definition '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Total frame budget, `round(meta.duration * meta.fps)`.
    pub fn total_frames(&self) -> FrameIndex {
        FrameIndex(self.meta.fps.budget_frames(self.meta.duration))
    }

    /// Look up a scene by id.
    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/definition/model.rs"]
mod tests;
