use crate::foundation::error::{ReelError, ReelResult};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    pub start: FrameIndex,
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    pub fn new(start: FrameIndex, end: FrameIndex) -> ReelResult<Self> {
        if start.0 > end.0 {
            return Err(ReelError::layout("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }

    pub fn overlaps(self, other: FrameRange) -> bool {
        self.start.0 < other.end.0 && other.start.0 < self.end.0
    }
}

/// Integer frames-per-second of a video definition.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Fps(pub u32);

impl Fps {
    pub fn new(fps: u32) -> ReelResult<Self> {
        if fps == 0 {
            return Err(ReelError::layout("fps must be > 0"));
        }
        Ok(Self(fps))
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }

    /// Whole frames covered by `secs`, rounded; non-finite or non-positive input gives 0 and
    /// oversized input saturates at `u64::MAX`.
    pub fn budget_frames(self, secs: f64) -> u64 {
        let frames = (secs * self.as_f64()).round();
        if frames.is_finite() && frames > 0.0 {
            frames as u64
        } else {
            0
        }
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) / self.as_f64()
    }

    /// Seconds to a signed frame count, rounded half away from zero.
    ///
    /// Non-finite input maps to 0 so callers can treat the result as "nothing to schedule".
    pub fn secs_to_frames_round(self, secs: f64) -> i64 {
        let frames = (secs * self.as_f64()).round();
        if frames.is_finite() { frames as i64 } else { 0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
