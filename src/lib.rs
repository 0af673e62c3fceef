//! reelgen turns a declarative JSON video plan into a resolved, validated timeline.
//!
//! A plan (a [`VideoDefinition`]) is usually produced by an LLM planning step from a written
//! script. It describes a video as an ordered list of typed scenes with either explicit frame
//! placement or a duration in seconds. reelgen validates the plan, places every scene on the
//! frame axis, maps each scene's content to a render instruction for a visual template, lays
//! out any charts, and hands the result to an external composition/encoding collaborator.
//!
//! # Pipeline overview
//!
//! 1. **Parse**: JSON -> [`VideoDefinition`], reporting every structural violation as a
//!    [`SchemaError`] with a JSONPath-style location.
//! 2. **Resolve**: scenes -> [`ResolvedScene`]s on absolute frames ([`resolve`]).
//! 3. **Dispatch**: scene `type` + `content` -> [`RenderInstruction`] ([`dispatch`]), with charts
//!    laid out by the chart layout engine ([`compute_scale`], [`layout_categorical`],
//!    [`layout_continuous`], [`map_candlestick`]).
//! 4. **Compile**: all of the above -> [`Timeline`] ([`compile_timeline`]). A scene that cannot
//!    be dispatched is listed in [`Timeline::skipped`] and never affects its siblings.
//! 5. **Render** (optional): [`TimelineRenderer`] implementations hand the timeline off.
//!
//! Steps 1-4 are pure and deterministic; the only IO is reading plans/config and running the
//! external renderer.
#![forbid(unsafe_code)]

mod compile;
mod config;
mod definition;
mod dispatch;
mod foundation;
mod layout;
mod render;
mod schema;
mod timing;

pub use compile::fingerprint::TimelineFingerprint;
pub use compile::timeline::{
    CompileOptions, SkippedScene, Timeline, TimelineEntry, compile_str, compile_timeline,
    resolve_checked,
};
pub use config::{
    ChartSection, DEFAULT_CONFIG_FILE, ReelConfig, RenderSection, TimingSection,
};
pub use definition::model::{
    Meta, Scene, SceneKind, Theme, Timing, UnknownSceneKind, VideoDefinition,
};
pub use dispatch::content::{
    Align, AnimationSpec, BackgroundSpec, BarDatum, CalloutData, ChartData, ChartSpec, Direction,
    FrameOverlaySpec, FullBleedContent, GlobalSpec, HeaderSpec, MessageSpec, OverlayContent,
    PanelSpec, Position, Scalar, SceneContent, SeriesDatum, SplitScreenContent, TextSpec,
    TransitionContent, TransitionEffect,
};
pub use dispatch::dispatcher::{
    DispatchError, STAT_CALLOUT, dispatch, dispatch_content, dispatch_scene, dispatch_scene_with,
    dispatch_with,
};
pub use dispatch::instruction::{
    Anchor, ArrowSweepProps, BarGeometry, ChartGeometry, ChartInstruction,
    DEFAULT_BACKGROUND_COLOR, DEFAULT_CALLOUT_COLOR, DEFAULT_CANDLE_COLOR, DEFAULT_CHART_COLOR,
    DEFAULT_FRAME_OVERLAY_COLOR, DEFAULT_SPLIT_RATIO, DissolveProps, FrameOverlayProps,
    FullBleedProps, HeaderProps, OVERLAY_INSET_PX, PanelProps, RenderInstruction,
    SplitScreenProps, StatCalloutProps, TextProps, WIPE_DURATION_SECS, WipeProps,
};
pub use foundation::core::{Dimensions, Fps, FrameIndex, FrameRange};
pub use foundation::error::{ReelError, ReelResult};
pub use layout::chart::{
    AXIS_GUTTER_PX, BAR_GAP_FRACTION, CANDLE_MIN_BODY_PX, CANDLE_MIN_WIDTH_PX, CANDLE_SLOT_FILL,
    CandleGeometry, CategoricalLayout, ChartBox, ChartKind, ChartScale, GRID_LINE_COUNT, Ohlc,
    Polyline, ScalePolicy, X_LABEL_BAND_PX, candlestick_scale, compute_scale, format_axis_value,
    layout_categorical, layout_continuous, map_candlestick, map_candlestick_with_scale,
};
pub use render::backend::{InMemoryRenderer, RenderReport, TimelineRenderer};
pub use render::command::{
    CommandRenderer, CommandRendererOpts, MANIFEST_PLACEHOLDER, OUTPUT_PLACEHOLDER,
    ensure_parent_dir, expand_args, manifest_path,
};
pub use schema::validate::{SchemaError, SchemaErrors, SchemaPathElem, parse, parse_str};
pub use timing::resolver::{ResolvedScene, TimingPolicy, resolve, resolve_with, schedule_end};
