use kurbo::{BezPath, Point};

use crate::foundation::error::{ReelError, ReelResult};

/// Number of horizontal gridlines produced for every chart scale.
pub const GRID_LINE_COUNT: usize = 5;
/// Horizontal space reserved for the y-axis labels.
pub const AXIS_GUTTER_PX: f64 = 60.0;
/// Vertical space reserved under line/area plots for x labels.
pub const X_LABEL_BAND_PX: f64 = 40.0;
/// Share of the plot width given to the gaps between bars.
pub const BAR_GAP_FRACTION: f64 = 0.2;
/// Smallest rendered candle body, so unchanged candles stay visible.
pub const CANDLE_MIN_BODY_PX: f64 = 3.0;
/// Smallest rendered candle width.
pub const CANDLE_MIN_WIDTH_PX: f64 = 4.0;
/// Share of a candle slot covered by the candle body.
pub const CANDLE_SLOT_FILL: f64 = 0.75;

const BAR_HEADROOM: f64 = 0.2;
const SERIES_PAD: f64 = 0.1;
const CANDLE_RANGE_PAD: f64 = 0.15;

/// Plot family of a chart; each family has its own scaling rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
    Area,
    Candlestick,
}

/// How a chart turns its raw data extent into an axis range.
///
/// Bar charts always anchor at zero and only grow upwards; line and area charts pad both ends
/// multiplicatively; candlesticks pad by a share of the observed range.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ScalePolicy {
    ZeroAnchored { headroom: f64 },
    Padded { pad: f64 },
    RangePadded { fraction: f64 },
}

impl ScalePolicy {
    pub fn for_kind(kind: ChartKind) -> Self {
        match kind {
            ChartKind::Bar => ScalePolicy::ZeroAnchored {
                headroom: BAR_HEADROOM,
            },
            ChartKind::Line | ChartKind::Area => ScalePolicy::Padded { pad: SERIES_PAD },
            ChartKind::Candlestick => ScalePolicy::RangePadded {
                fraction: CANDLE_RANGE_PAD,
            },
        }
    }

    /// The rule of `kind` with its margin replaced by `headroom`.
    pub fn with_headroom(kind: ChartKind, headroom: f64) -> Self {
        match Self::for_kind(kind) {
            ScalePolicy::ZeroAnchored { .. } => ScalePolicy::ZeroAnchored { headroom },
            ScalePolicy::Padded { .. } => ScalePolicy::Padded { pad: headroom },
            ScalePolicy::RangePadded { .. } => ScalePolicy::RangePadded { fraction: headroom },
        }
    }

    pub fn apply(self, values: &[f64]) -> ReelResult<ChartScale> {
        let (raw_min, raw_max) = extent(values)?;
        let (min, max) = match self {
            ScalePolicy::ZeroAnchored { headroom } => {
                check_margin(headroom, "headroom")?;
                (0.0, raw_max.max(0.0) * (1.0 + headroom))
            }
            ScalePolicy::Padded { pad } => {
                check_margin(pad, "pad")?;
                (raw_min * (1.0 - pad), raw_max * (1.0 + pad))
            }
            ScalePolicy::RangePadded { fraction } => {
                check_margin(fraction, "range fraction")?;
                let pad = (raw_max - raw_min) * fraction;
                (raw_min - pad / 2.0, raw_max + pad / 2.0)
            }
        };
        Ok(ChartScale::new(min, max))
    }
}

fn check_margin(v: f64, what: &str) -> ReelResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(ReelError::layout(format!(
            "scale {what} must be finite and >= 0"
        )));
    }
    Ok(())
}

fn extent(values: &[f64]) -> ReelResult<(f64, f64)> {
    if values.is_empty() {
        return Err(ReelError::layout("cannot scale an empty series"));
    }
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values {
        if !v.is_finite() {
            return Err(ReelError::layout("chart values must be finite"));
        }
        lo = lo.min(v);
        hi = hi.max(v);
    }
    Ok((lo, hi))
}

/// Resolved value axis of a chart.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartScale {
    pub min: f64,
    pub max: f64,
    /// Evenly spaced values from `min` to `max`, inclusive.
    pub grid_lines: [f64; GRID_LINE_COUNT],
}

impl ChartScale {
    fn new(min: f64, max: f64) -> Self {
        let steps = (GRID_LINE_COUNT - 1) as f64;
        let mut grid_lines = [0.0; GRID_LINE_COUNT];
        for (i, g) in grid_lines.iter_mut().enumerate() {
            *g = min + (max - min) * (i as f64 / steps);
        }
        Self {
            min,
            max,
            grid_lines,
        }
    }

    /// Axis span used for mapping; a flat axis maps as if it were one unit tall.
    pub fn span(&self) -> f64 {
        let s = self.max - self.min;
        if s == 0.0 { 1.0 } else { s }
    }

    /// Pixel row of `value` in a plot of `height` pixels (0 at the top).
    pub fn y_for(&self, value: f64, height: f64) -> f64 {
        height - ((value - self.min) / self.span()) * height
    }

    /// Height in pixels of a bar of `value` measured from the axis minimum.
    pub fn extent_px(&self, value: f64, height: f64) -> f64 {
        (((value - self.min) / self.span()) * height).max(0.0)
    }
}

/// Compute the value axis for `values` using the rule of `kind` with margin `headroom`.
pub fn compute_scale(values: &[f64], headroom: f64, kind: ChartKind) -> ReelResult<ChartScale> {
    ScalePolicy::with_headroom(kind, headroom).apply(values)
}

/// Horizontal slots of a categorical (bar) chart.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoricalLayout {
    pub bar_width: f64,
    pub gap: f64,
}

impl CategoricalLayout {
    /// Left edge of bar `i`; the first gap sits before the first bar.
    pub fn x_for(&self, i: usize) -> f64 {
        self.gap + (i as f64) * (self.bar_width + self.gap)
    }
}

/// Split `total_width` into `n` equal bars and `n + 1` equal gaps taking `gap_fraction` of it.
pub fn layout_categorical(
    n: usize,
    total_width: f64,
    gap_fraction: f64,
) -> ReelResult<CategoricalLayout> {
    if n == 0 {
        return Err(ReelError::layout("categorical layout needs at least one bar"));
    }
    if !total_width.is_finite() || total_width < 0.0 {
        return Err(ReelError::layout("total_width must be finite and >= 0"));
    }
    if !gap_fraction.is_finite() || !(0.0..1.0).contains(&gap_fraction) {
        return Err(ReelError::layout("gap_fraction must be in [0, 1)"));
    }
    let total_gap = total_width * gap_fraction;
    Ok(CategoricalLayout {
        bar_width: (total_width - total_gap) / n as f64,
        gap: total_gap / (n as f64 + 1.0),
    })
}

/// Straight-segment polyline through a plotted series.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub width: f64,
    pub height: f64,
}

impl Polyline {
    pub fn line_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for (i, p) in self.points.iter().enumerate() {
            if i == 0 {
                path.move_to(*p);
            } else {
                path.line_to(*p);
            }
        }
        path
    }

    /// The line closed along the bottom edge of the plot.
    pub fn area_path(&self) -> BezPath {
        let mut path = self.line_path();
        if !self.points.is_empty() {
            path.line_to((self.width, self.height));
            path.line_to((0.0, self.height));
            path.close_path();
        }
        path
    }
}

impl serde::Serialize for Polyline {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct as _;
        let mut s = serializer.serialize_struct("Polyline", 3)?;
        s.serialize_field("points", &self.points)?;
        s.serialize_field("d", &self.line_path().to_svg())?;
        s.serialize_field("areaD", &self.area_path().to_svg())?;
        s.end()
    }
}

/// Place `values` evenly across `width` and map them through `scale` into `height`.
pub fn layout_continuous(
    values: &[f64],
    scale: &ChartScale,
    width: f64,
    height: f64,
) -> ReelResult<Polyline> {
    if values.is_empty() {
        return Err(ReelError::layout("continuous layout needs at least one point"));
    }
    check_box(width, height)?;
    let denom = values.len().saturating_sub(1).max(1) as f64;
    let points = values
        .iter()
        .enumerate()
        .map(|(i, &v)| Point::new((i as f64 / denom) * width, scale.y_for(v, height)))
        .collect();
    Ok(Polyline {
        points,
        width,
        height,
    })
}

/// Open/high/low/close sample.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Ohlc {
    pub o: f64,
    pub h: f64,
    pub l: f64,
    pub c: f64,
}

/// Pixel geometry of one candle.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandleGeometry {
    /// Horizontal centre of the candle and its wick.
    pub x: f64,
    pub width: f64,
    pub body_top: f64,
    pub body_height: f64,
    pub wick_top: f64,
    pub wick_bottom: f64,
    /// `close >= open`.
    pub bullish: bool,
}

/// Candlestick geometry with the candlestick scaling rule.
pub fn map_candlestick(ohlc: &[Ohlc], width: f64, height: f64) -> ReelResult<Vec<CandleGeometry>> {
    let scale = candlestick_scale(ohlc)?;
    map_candlestick_with_scale(ohlc, &scale, width, height)
}

/// Scale over every high and low of `ohlc`.
pub fn candlestick_scale(ohlc: &[Ohlc]) -> ReelResult<ChartScale> {
    let values: Vec<f64> = ohlc.iter().flat_map(|d| [d.l, d.h]).collect();
    ScalePolicy::for_kind(ChartKind::Candlestick).apply(&values)
}

pub fn map_candlestick_with_scale(
    ohlc: &[Ohlc],
    scale: &ChartScale,
    width: f64,
    height: f64,
) -> ReelResult<Vec<CandleGeometry>> {
    if ohlc.is_empty() {
        return Err(ReelError::layout("candlestick layout needs at least one candle"));
    }
    check_box(width, height)?;
    let slot = width / ohlc.len() as f64;
    let candle_w = (slot * CANDLE_SLOT_FILL).max(CANDLE_MIN_WIDTH_PX);

    Ok(ohlc
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let y_o = scale.y_for(d.o, height);
            let y_c = scale.y_for(d.c, height);
            CandleGeometry {
                x: slot * i as f64 + slot / 2.0,
                width: candle_w,
                body_top: y_o.min(y_c),
                body_height: (y_c - y_o).abs().max(CANDLE_MIN_BODY_PX),
                wick_top: scale.y_for(d.h, height),
                wick_bottom: scale.y_for(d.l, height),
                bullish: d.c >= d.o,
            }
        })
        .collect())
}

fn check_box(width: f64, height: f64) -> ReelResult<()> {
    if !width.is_finite() || width < 0.0 || !height.is_finite() || height < 0.0 {
        return Err(ReelError::layout("plot width/height must be finite and >= 0"));
    }
    Ok(())
}

/// Axis label text: one decimal with `K`/`M` suffix for large values, else a rounded integer.
pub fn format_axis_value(value: f64) -> String {
    if value > 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value > 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{}", value.round() as i64)
    }
}

/// Outer size of the box a chart template draws into.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChartBox {
    pub width: f64,
    pub height: f64,
}

impl Default for ChartBox {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 500.0,
        }
    }
}

impl ChartBox {
    pub fn validate(&self) -> ReelResult<()> {
        if !self.width.is_finite() || self.width <= AXIS_GUTTER_PX {
            return Err(ReelError::layout(format!(
                "chart box width must be finite and > {AXIS_GUTTER_PX}"
            )));
        }
        if !self.height.is_finite() || self.height <= X_LABEL_BAND_PX {
            return Err(ReelError::layout(format!(
                "chart box height must be finite and > {X_LABEL_BAND_PX}"
            )));
        }
        Ok(())
    }

    /// Width left for the plot after the y-axis gutter.
    pub fn plot_width(&self) -> f64 {
        (self.width - AXIS_GUTTER_PX).max(0.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/chart.rs"]
mod tests;
