use crate::{
    compile::fingerprint::{StableHasher, TimelineFingerprint},
    definition::model::{Theme, VideoDefinition},
    dispatch::{
        dispatcher::{DispatchError, dispatch_scene_with},
        instruction::RenderInstruction,
    },
    foundation::{
        core::{Fps, FrameIndex, FrameRange},
        error::{ReelError, ReelResult},
    },
    layout::chart::ChartBox,
    schema::validate::{SchemaError, SchemaErrors, SchemaPathElem},
    timing::resolver::{ResolvedScene, TimingPolicy, resolve_with},
};

/// Knobs that change how a definition becomes a timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CompileOptions {
    pub timing: TimingPolicy,
    pub chart: ChartBox,
}

/// Composition-facing output: scheduled scenes with their template props.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    pub fps: Fps,
    pub width: u32,
    pub height: u32,
    pub duration_in_frames: u64,
    /// Rendered scenes ordered by start frame.
    pub entries: Vec<TimelineEntry>,
    /// Scheduled scenes that produced no instruction.
    pub skipped: Vec<SkippedScene>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub scene_id: String,
    pub scene_index: usize,
    pub component: &'static str,
    pub start_frame: u64,
    pub duration_in_frames: u64,
    pub props: RenderInstruction,
}

impl TimelineEntry {
    pub fn range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(self.start_frame),
            end: FrameIndex(self.start_frame + self.duration_in_frames),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedScene {
    pub scene_id: String,
    pub scene_index: usize,
    pub error: DispatchError,
}

impl Timeline {
    /// Entries visible at `frame`, in draw order.
    pub fn active_at(&self, frame: FrameIndex) -> impl Iterator<Item = &TimelineEntry> {
        self.entries
            .iter()
            .filter(move |e| e.range().contains(frame))
    }

    pub fn entry(&self, scene_id: &str) -> Option<&TimelineEntry> {
        self.entries.iter().find(|e| e.scene_id == scene_id)
    }

    pub fn to_json_pretty(&self) -> ReelResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ReelError::serde(e.to_string()))
    }

    /// Stable digest of the serialized timeline, for golden tests and render caching.
    pub fn fingerprint(&self) -> ReelResult<TimelineFingerprint> {
        let v = serde_json::to_value(self).map_err(|e| ReelError::serde(e.to_string()))?;
        let mut h = StableHasher::new();
        h.write_json(&v);
        Ok(h.finish())
    }
}

/// Resolve, dispatch and assemble the timeline of a validated definition.
///
/// A scene whose content cannot be dispatched is logged and listed in [`Timeline::skipped`];
/// its siblings are unaffected.
#[tracing::instrument(skip(def, opts), fields(video = %def.meta.id, timing = %opts.timing))]
pub fn compile_timeline(def: &VideoDefinition, opts: &CompileOptions) -> ReelResult<Timeline> {
    opts.chart.validate()?;

    let resolved = resolve_checked(def, opts.timing)?;
    let budget = def.total_frames().0;

    let mut entries = Vec::with_capacity(resolved.len());
    let mut skipped = Vec::new();
    for r in resolved {
        let scene = &def.scenes[r.index];
        match dispatch_scene_with(scene, &opts.chart) {
            Ok(props) => entries.push(TimelineEntry {
                scene_id: r.id,
                scene_index: r.index,
                component: props.component(),
                start_frame: r.start_frame,
                duration_in_frames: r.duration_frames,
                props,
            }),
            Err(error) => {
                tracing::warn!(scene = %scene.id, kind = %scene.kind, %error, "skipping scene");
                skipped.push(SkippedScene {
                    scene_id: r.id,
                    scene_index: r.index,
                    error,
                });
            }
        }
    }

    tracing::debug!(
        entries = entries.len(),
        skipped = skipped.len(),
        "timeline compiled"
    );

    Ok(Timeline {
        id: def.meta.id.clone(),
        title: def.meta.title.clone(),
        theme: def.theme,
        fps: def.meta.fps,
        width: def.meta.dimensions.width,
        height: def.meta.dimensions.height,
        duration_in_frames: budget,
        entries,
        skipped,
    })
}

/// Resolve the scenes of `def` and reject any that end past the frame budget.
///
/// Timed scenes were checked at parse time; this catches sequential placement pushing untimed
/// scenes past the budget.
pub fn resolve_checked(
    def: &VideoDefinition,
    policy: TimingPolicy,
) -> ReelResult<Vec<ResolvedScene>> {
    let resolved = resolve_with(&def.scenes, def.meta.fps, policy);
    check_budget(def, &resolved, def.total_frames().0)?;
    Ok(resolved)
}

fn check_budget(def: &VideoDefinition, resolved: &[ResolvedScene], budget: u64) -> ReelResult<()> {
    let errors: Vec<SchemaError> = resolved
        .iter()
        .filter(|r| r.end_frame() > budget)
        .map(|r| {
            let field = if def.scenes[r.index].timing.is_some() {
                [SchemaPathElem::Field("timing"), SchemaPathElem::Field("end")].to_vec()
            } else {
                [SchemaPathElem::Field("duration")].to_vec()
            };
            let path = [
                &[SchemaPathElem::Field("scenes"), SchemaPathElem::Index(r.index)][..],
                &field,
            ]
            .concat();
            SchemaError::at(
                &path,
                format!("end frame <= {budget} (meta.duration * meta.fps)"),
                format!("end frame {}", r.end_frame()),
            )
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchemaErrors { errors }.into())
    }
}

/// Parse, validate and compile JSON text in one step.
pub fn compile_str(json: &str, opts: &CompileOptions) -> ReelResult<Timeline> {
    let def = VideoDefinition::from_json_str(json)?;
    compile_timeline(&def, opts)
}

#[cfg(test)]
#[path = "../../tests/unit/compile/timeline.rs"]
mod tests;
