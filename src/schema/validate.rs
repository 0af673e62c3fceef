use std::{collections::HashSet, fmt};

use serde_json::{Map, Value};

use crate::{
    definition::model::{SceneKind, Theme, VideoDefinition},
    foundation::{core::Fps, error::ReelResult},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaPathElem {
    Field(&'static str),
    Index(usize),
}

/// One structural violation, located by a JSONPath-style path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    pub path: Vec<SchemaPathElem>,
    pub expected: String,
    pub received: String,
}

impl SchemaError {
    pub(crate) fn at(
        path: &[SchemaPathElem],
        expected: impl Into<String>,
        received: impl Into<String>,
    ) -> Self {
        Self {
            path: path.to_vec(),
            expected: expected.into(),
            received: received.into(),
        }
    }

    pub fn path_string(&self) -> String {
        format_path(&self.path)
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, received {}",
            format_path(&self.path),
            self.expected,
            self.received
        )
    }
}

fn format_path(path: &[SchemaPathElem]) -> String {
    let mut s = String::from("$");
    for p in path {
        match *p {
            SchemaPathElem::Field(name) => {
                s.push('.');
                s.push_str(name);
            }
            SchemaPathElem::Index(i) => {
                s.push('[');
                s.push_str(&i.to_string());
                s.push(']');
            }
        }
    }
    s
}

/// Every violation found in one document, in document walk order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaErrors {
    pub errors: Vec<SchemaError>,
}

impl SchemaErrors {
    pub fn iter(&self) -> impl Iterator<Item = &SchemaError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

const HEADER_ALIGNS: [&str; 3] = ["left", "center", "right"];
const CHART_TYPES: [&str; 4] = ["bar", "line", "area", "candlestick"];
const OVERLAY_POSITIONS: [&str; 5] = [
    "top_left",
    "top_right",
    "bottom_left",
    "bottom_right",
    "center",
];
const TRANSITION_EFFECTS: [&str; 3] = ["wipe", "arrow_sweep", "dissolve"];
const DIRECTIONS: [&str; 4] = ["left", "right", "up", "down"];

/// Validate a raw JSON document and build the typed definition.
///
/// All violations are collected before returning; on success the typed model is exactly what
/// the document declares.
pub fn parse(raw: &Value) -> Result<VideoDefinition, SchemaErrors> {
    let mut w = Walker::default();
    check_definition(&mut w, raw);
    if !w.errors.is_empty() {
        return Err(SchemaErrors { errors: w.errors });
    }

    serde_json::from_value(raw.clone()).map_err(|e| SchemaErrors {
        errors: vec![SchemaError::at(&[], "a video definition", e.to_string())],
    })
}

/// [`parse`] for JSON text.
pub fn parse_str(s: &str) -> ReelResult<VideoDefinition> {
    VideoDefinition::from_json_str(s)
}

#[derive(Default)]
struct Walker {
    path: Vec<SchemaPathElem>,
    errors: Vec<SchemaError>,
}

impl Walker {
    fn field<R>(&mut self, name: &'static str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(SchemaPathElem::Field(name));
        let r = f(self);
        self.path.pop();
        r
    }

    fn index<R>(&mut self, i: usize, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(SchemaPathElem::Index(i));
        let r = f(self);
        self.path.pop();
        r
    }

    fn fail(&mut self, expected: impl Into<String>, received: impl Into<String>) {
        self.errors
            .push(SchemaError::at(&self.path, expected, received));
    }

    fn fail_value(&mut self, expected: &str, received: Option<&Value>) {
        self.fail(expected, describe(received));
    }

    /// Look up `name` in `obj` and convert it with `pick`.
    ///
    /// Null is treated as absent. Absent required fields and values `pick` rejects are
    /// recorded as errors at `path.name`.
    fn typed<'v, T>(
        &mut self,
        obj: &'v Map<String, Value>,
        name: &'static str,
        required: bool,
        expected: &str,
        pick: impl FnOnce(&'v Value) -> Option<T>,
    ) -> Option<T> {
        let Some(v) = obj.get(name).filter(|v| !v.is_null()) else {
            if required {
                self.field(name, |w| w.fail_value(expected, obj.get(name)));
            }
            return None;
        };
        match pick(v) {
            Some(t) => Some(t),
            None => {
                self.field(name, |w| w.fail_value(expected, Some(v)));
                None
            }
        }
    }

    fn req_str<'v>(&mut self, obj: &'v Map<String, Value>, name: &'static str) -> Option<&'v str> {
        self.typed(obj, name, true, "string", Value::as_str)
    }

    fn opt_str<'v>(&mut self, obj: &'v Map<String, Value>, name: &'static str) -> Option<&'v str> {
        self.typed(obj, name, false, "string", Value::as_str)
    }

    fn req_number(&mut self, obj: &Map<String, Value>, name: &'static str) -> Option<f64> {
        self.typed(obj, name, true, "number", Value::as_f64)
    }

    fn opt_number(&mut self, obj: &Map<String, Value>, name: &'static str) -> Option<f64> {
        self.typed(obj, name, false, "number", Value::as_f64)
    }

    fn opt_bool(&mut self, obj: &Map<String, Value>, name: &'static str) -> Option<bool> {
        self.typed(obj, name, false, "boolean", Value::as_bool)
    }

    fn req_u64(&mut self, obj: &Map<String, Value>, name: &'static str) -> Option<u64> {
        self.typed(obj, name, true, "non-negative integer", Value::as_u64)
    }

    fn req_object<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        name: &'static str,
    ) -> Option<&'v Map<String, Value>> {
        self.typed(obj, name, true, "object", Value::as_object)
    }

    fn opt_object<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        name: &'static str,
    ) -> Option<&'v Map<String, Value>> {
        self.typed(obj, name, false, "object", Value::as_object)
    }

    fn req_array<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        name: &'static str,
    ) -> Option<&'v Vec<Value>> {
        self.typed(obj, name, true, "array", Value::as_array)
    }

    fn opt_array<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        name: &'static str,
    ) -> Option<&'v Vec<Value>> {
        self.typed(obj, name, false, "array", Value::as_array)
    }

    fn enum_str<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        name: &'static str,
        required: bool,
        allowed: &[&str],
    ) -> Option<&'v str> {
        let expected = format!("one of {}", allowed.join(" | "));
        self.typed(obj, name, required, &expected, |v| {
            v.as_str().filter(|s| allowed.iter().any(|a| a == s))
        })
    }

    /// The current value as an object, or an error at the current path.
    fn expect_object<'v>(&mut self, v: &'v Value) -> Option<&'v Map<String, Value>> {
        let obj = v.as_object();
        if obj.is_none() {
            self.fail_value("object", Some(v));
        }
        obj
    }
}

fn describe(v: Option<&Value>) -> String {
    match v {
        None => "missing".to_owned(),
        Some(Value::Null) => "null".to_owned(),
        Some(Value::Bool(b)) => format!("boolean {b}"),
        Some(Value::Number(n)) => format!("number {n}"),
        Some(Value::String(s)) => {
            let shown: String = s.chars().take(40).collect();
            if shown.len() < s.len() {
                format!("string \"{shown}...\"")
            } else {
                format!("string \"{shown}\"")
            }
        }
        Some(Value::Array(a)) => format!("array of {} items", a.len()),
        Some(Value::Object(_)) => "object".to_owned(),
    }
}

struct Budget {
    fps: Fps,
    total_frames: u64,
}

fn check_definition(w: &mut Walker, raw: &Value) {
    let Some(root) = w.expect_object(raw) else {
        return;
    };

    let budget = w
        .req_object(root, "meta")
        .and_then(|meta| w.field("meta", |w| check_meta(w, meta)));

    w.enum_str(root, "theme", false, &Theme::NAMES);

    let Some(scenes) = w.req_array(root, "scenes") else {
        return;
    };
    w.field("scenes", |w| {
        let mut seen = HashSet::<&str>::new();
        for (i, scene) in scenes.iter().enumerate() {
            w.index(i, |w| check_scene(w, scene, &mut seen, budget.as_ref()));
        }
    });
}

fn check_meta(w: &mut Walker, meta: &Map<String, Value>) -> Option<Budget> {
    if let Some(id) = w.req_str(meta, "id")
        && id.trim().is_empty()
    {
        w.field("id", |w| w.fail("non-empty string", "string \"\""));
    }
    w.req_str(meta, "title");

    let duration = w.req_number(meta, "duration");
    let duration = match duration {
        Some(d) if d > 0.0 => Some(d),
        Some(d) => {
            w.field("duration", |w| w.fail("number > 0", format!("number {d}")));
            None
        }
        None => None,
    };

    let fps = w.typed(meta, "fps", true, "positive integer", |v| {
        v.as_u64()
            .filter(|&n| n > 0 && u32::try_from(n).is_ok())
    });

    if let Some(dims) = w.req_object(meta, "dimensions") {
        w.field("dimensions", |w| {
            for name in ["width", "height"] {
                w.typed(dims, name, true, "positive integer", |v| {
                    v.as_u64()
                        .filter(|&n| n > 0 && u32::try_from(n).is_ok())
                });
            }
        });
    }

    let fps = Fps(u32::try_from(fps?).ok()?);
    Some(Budget {
        fps,
        total_frames: fps.budget_frames(duration?),
    })
}

fn check_scene<'v>(
    w: &mut Walker,
    scene: &'v Value,
    seen: &mut HashSet<&'v str>,
    budget: Option<&Budget>,
) {
    let Some(obj) = w.expect_object(scene) else {
        return;
    };

    if let Some(id) = w.req_str(obj, "id") {
        if id.trim().is_empty() {
            w.field("id", |w| w.fail("non-empty string", "string \"\""));
        } else if !seen.insert(id) {
            w.field("id", |w| {
                w.fail("unique scene id", format!("duplicate \"{id}\""))
            });
        }
    }

    let kind = w
        .enum_str(obj, "type", true, &SceneKind::NAMES)
        .and_then(|s| s.parse::<SceneKind>().ok());

    let duration = match w.req_number(obj, "duration") {
        Some(d) if d < 0.0 => {
            w.field("duration", |w| w.fail("number >= 0", format!("number {d}")));
            None
        }
        other => other,
    };

    let timing = w.opt_object(obj, "timing").and_then(|t| {
        w.field("timing", |w| {
            let start = w.req_u64(t, "start");
            let end = w.req_u64(t, "end");
            Some((start?, end?))
        })
    });
    let timing_present = obj.get("timing").is_some_and(|t| !t.is_null());

    if let Some(content) = w.req_object(obj, "content")
        && let Some(kind) = kind
    {
        w.field("content", |w| check_content(w, kind, content));
    }

    let Some(budget) = budget else {
        return;
    };
    match (timing_present, timing, duration) {
        (true, Some((start, end)), _) if end > start && end > budget.total_frames => {
            w.field("timing", |w| {
                w.field("end", |w| {
                    w.fail(
                        format!("end frame <= {} (meta.duration * meta.fps)", budget.total_frames),
                        format!("{end}"),
                    )
                })
            });
        }
        (false, _, Some(secs)) => {
            let frames = (secs * budget.fps.as_f64()).round();
            if frames.is_finite() && frames > budget.total_frames as f64 {
                w.field("duration", |w| {
                    w.fail(
                        format!(
                            "at most {} frames (meta.duration * meta.fps)",
                            budget.total_frames
                        ),
                        format!("{frames} frames"),
                    )
                });
            }
        }
        _ => {}
    }
}

fn check_content(w: &mut Walker, kind: SceneKind, content: &Map<String, Value>) {
    match kind {
        SceneKind::SplitScreen => check_split_screen(w, content),
        SceneKind::FullBleed => check_full_bleed(w, content),
        SceneKind::Overlay => check_overlay(w, content),
        SceneKind::Transition => check_transition(w, content),
        // Grid payloads pass through untouched.
        SceneKind::Grid => {}
    }
}

fn check_split_screen(w: &mut Walker, c: &Map<String, Value>) {
    if let Some(global) = w.opt_object(c, "global") {
        w.field("global", |w| {
            w.opt_str(global, "title");
            if let Some(a) = w.opt_object(global, "titleAnimation") {
                w.field("titleAnimation", |w| check_animation(w, a));
            }
        });
    }
    for side in ["left", "right"] {
        if let Some(panel) = w.opt_object(c, side) {
            w.field(side, |w| {
                if let Some(h) = w.opt_object(panel, "header") {
                    w.field("header", |w| check_header(w, h));
                }
                if let Some(chart) = w.opt_object(panel, "chart") {
                    w.field("chart", |w| check_chart(w, chart));
                }
            });
        }
    }
    w.opt_bool(c, "divider");
    w.opt_number(c, "ratio");
}

fn check_full_bleed(w: &mut Walker, c: &Map<String, Value>) {
    if let Some(h) = w.opt_object(c, "header") {
        w.field("header", |w| check_header(w, h));
    }
    match c.get("text") {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(Value::Object(text)) => w.field("text", |w| {
            w.req_str(text, "content");
            w.opt_str(text, "color");
        }),
        Some(other) => w.field("text", |w| {
            w.fail_value("string or object with content", Some(other))
        }),
    }
    if let Some(chart) = w.opt_object(c, "chart") {
        w.field("chart", |w| check_chart(w, chart));
    }
    if let Some(bg) = w.opt_object(c, "background") {
        w.field("background", |w| {
            w.opt_str(bg, "color");
        });
    }
    if let Some(overlay) = w.opt_object(c, "overlay") {
        w.field("overlay", |w| {
            w.req_str(overlay, "type");
            w.opt_str(overlay, "color");
        });
    }
}

fn check_overlay(w: &mut Walker, c: &Map<String, Value>) {
    let component = w.req_str(c, "component");
    w.enum_str(c, "position", false, &OVERLAY_POSITIONS);
    if component != Some("stat_callout") {
        return;
    }
    if let Some(data) = w.opt_object(c, "data") {
        w.field("data", |w| {
            w.typed(data, "value", true, "string or number", |v| {
                (v.is_string() || v.is_number()).then_some(())
            });
            w.req_str(data, "label");
            w.opt_str(data, "color");
        });
    }
}

fn check_transition(w: &mut Walker, c: &Map<String, Value>) {
    w.enum_str(c, "effect", true, &TRANSITION_EFFECTS);
    w.enum_str(c, "from", false, &DIRECTIONS);
    w.enum_str(c, "to", false, &DIRECTIONS);
    w.opt_str(c, "color");
    if let Some(msg) = w.opt_object(c, "message") {
        w.field("message", |w| {
            w.req_str(msg, "text");
            w.opt_str(msg, "position");
            w.opt_str(msg, "color");
        });
    }
}

fn check_header(w: &mut Walker, h: &Map<String, Value>) {
    w.opt_str(h, "category");
    w.req_str(h, "title");
    w.opt_str(h, "subtitle");
    w.enum_str(h, "align", false, &HEADER_ALIGNS);
    w.opt_str(h, "color");
}

fn check_animation(w: &mut Walker, a: &Map<String, Value>) {
    w.req_str(a, "type");
    w.opt_number(a, "duration");
    w.opt_number(a, "delay");
    w.opt_str(a, "ease");
}

fn check_chart(w: &mut Walker, chart: &Map<String, Value>) {
    let kind = w.enum_str(chart, "type", true, &CHART_TYPES);
    if let Some(data) = w.req_array(chart, "data") {
        w.field("data", |w| {
            for (i, entry) in data.iter().enumerate() {
                w.index(i, |w| {
                    let Some(e) = w.expect_object(entry) else {
                        return;
                    };
                    match kind {
                        Some("bar") => {
                            w.req_str(e, "label");
                            w.req_number(e, "value");
                            w.opt_str(e, "color");
                        }
                        Some("line" | "area") => {
                            w.typed(e, "x", true, "number or string", |v| {
                                (v.is_number() || v.is_string()).then_some(())
                            });
                            w.req_number(e, "y");
                        }
                        Some("candlestick") => check_candle(w, e),
                        _ => {}
                    }
                });
            }
        });
    }
    if let Some(labels) = w.opt_array(chart, "labels") {
        w.field("labels", |w| {
            for (i, label) in labels.iter().enumerate() {
                if !label.is_string() {
                    w.index(i, |w| w.fail_value("string", Some(label)));
                }
            }
        });
    }
    w.opt_str(chart, "color");
    w.opt_str(chart, "title");
    if let Some(a) = w.opt_object(chart, "animation") {
        w.field("animation", |w| check_animation(w, a));
    }
}

fn check_candle(w: &mut Walker, e: &Map<String, Value>) {
    let o = w.req_number(e, "o");
    let h = w.req_number(e, "h");
    let l = w.req_number(e, "l");
    let c = w.req_number(e, "c");
    let (Some(_), Some(h), Some(l), Some(_)) = (o, h, l, c) else {
        return;
    };
    if l > h {
        w.field("l", |w| w.fail(format!("low <= high ({h})"), format!("number {l}")));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schema/validate.rs"]
mod tests;
