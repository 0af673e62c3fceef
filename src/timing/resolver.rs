use std::{fmt, str::FromStr};

use crate::{
    definition::model::{Scene, SceneKind},
    foundation::core::{Fps, FrameIndex, FrameRange},
};

/// Rule used to place scenes that carry no explicit `timing`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingPolicy {
    /// Every untimed scene starts at frame 0.
    #[default]
    StartAtZero,
    /// Untimed scenes follow each other in document order, starting at frame 0.
    Sequential,
}

impl TimingPolicy {
    pub const NAMES: [&'static str; 2] = ["start_at_zero", "sequential"];

    pub fn as_str(self) -> &'static str {
        match self {
            TimingPolicy::StartAtZero => "start_at_zero",
            TimingPolicy::Sequential => "sequential",
        }
    }
}

impl fmt::Display for TimingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "start_at_zero" => Ok(TimingPolicy::StartAtZero),
            "sequential" => Ok(TimingPolicy::Sequential),
            other => Err(format!(
                "unknown timing policy \"{other}\" (expected one of {})",
                Self::NAMES.join(", ")
            )),
        }
    }
}

/// A scene placed on the absolute frame axis.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedScene {
    pub id: String,
    /// Position of the scene in the definition's `scenes` array.
    pub index: usize,
    pub kind: SceneKind,
    pub start_frame: u64,
    /// Always > 0.
    pub duration_frames: u64,
}

impl ResolvedScene {
    /// Exclusive end frame, saturating at `u64::MAX`.
    pub fn end_frame(&self) -> u64 {
        self.start_frame.saturating_add(self.duration_frames)
    }

    pub fn range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(self.start_frame),
            end: FrameIndex(self.end_frame()),
        }
    }
}

/// Resolve scenes with the default [`TimingPolicy::StartAtZero`] rule.
pub fn resolve(scenes: &[Scene], fps: Fps) -> Vec<ResolvedScene> {
    resolve_with(scenes, fps, TimingPolicy::default())
}

/// Place every scene on the frame axis.
///
/// Explicit `timing` wins over `duration`. Scenes whose length resolves to zero or less are
/// dropped. The result is ordered by start frame; ties keep document order.
#[tracing::instrument(skip(scenes), fields(scenes = scenes.len()))]
pub fn resolve_with(scenes: &[Scene], fps: Fps, policy: TimingPolicy) -> Vec<ResolvedScene> {
    let mut cursor: u64 = 0;
    let mut out = Vec::with_capacity(scenes.len());

    for (index, scene) in scenes.iter().enumerate() {
        let placed = match scene.timing {
            Some(t) => t.end.checked_sub(t.start).map(|d| (t.start, d)),
            None => {
                let frames = u64::try_from(fps.secs_to_frames_round(scene.duration)).ok();
                let start = match policy {
                    TimingPolicy::StartAtZero => 0,
                    TimingPolicy::Sequential => cursor,
                };
                if let Some(f) = frames {
                    cursor = cursor.saturating_add(f);
                }
                frames.map(|f| (start, f))
            }
        };

        let Some((start, duration)) = placed.filter(|&(_, d)| d > 0) else {
            tracing::debug!(scene = %scene.id, "dropping scene with non-positive length");
            continue;
        };

        out.push(ResolvedScene {
            id: scene.id.clone(),
            index,
            kind: scene.kind,
            start_frame: start,
            duration_frames: duration,
        });
    }

    out.sort_by_key(|s| s.start_frame);
    out
}

/// Last frame (exclusive) covered by any resolved scene, or 0 when nothing is scheduled.
pub fn schedule_end(resolved: &[ResolvedScene]) -> u64 {
    resolved.iter().map(ResolvedScene::end_frame).max().unwrap_or(0)
}

#[cfg(test)]
#[path = "../../tests/unit/timing/resolver.rs"]
mod tests;
