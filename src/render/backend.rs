use std::path::{Path, PathBuf};

use crate::{compile::timeline::Timeline, foundation::error::ReelResult};

/// Outcome of handing one timeline to a renderer.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderReport {
    pub output: PathBuf,
    /// Where the timeline manifest was written, if the renderer writes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PathBuf>,
    pub frames: u64,
}

/// Seam to the external composition/encoding collaborator.
pub trait TimelineRenderer {
    fn render(&mut self, timeline: &Timeline, out: &Path) -> ReelResult<RenderReport>;
}

/// Records timelines instead of rendering them; for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryRenderer {
    /// Rendered timelines with their requested output path, in call order.
    pub rendered: Vec<(PathBuf, Timeline)>,
}

impl InMemoryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&Timeline> {
        self.rendered.last().map(|(_, t)| t)
    }
}

impl TimelineRenderer for InMemoryRenderer {
    fn render(&mut self, timeline: &Timeline, out: &Path) -> ReelResult<RenderReport> {
        self.rendered.push((out.to_path_buf(), timeline.clone()));
        Ok(RenderReport {
            output: out.to_path_buf(),
            manifest: None,
            frames: timeline.duration_in_frames,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
