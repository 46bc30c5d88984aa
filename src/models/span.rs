//! Time span model.
//!
//! # Time Model
//! All times are integer minutes relative to a single rostering anchor
//! (t=0). The consumer defines what the anchor means (e.g., midnight of the
//! first rostered day). Minutes are used everywhere; there is no hour or
//! fractional-hour arithmetic inside the crate.

use serde::{Deserialize, Serialize};

/// Minutes in one day, used to bucket offsets into calendar days.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// A time interval [start, end).
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TimeSpan {
    /// Interval start (minutes, inclusive).
    pub start_min: i64,
    /// Interval end (minutes, exclusive).
    pub end_min: i64,
}

impl TimeSpan {
    /// Creates a new span without checking its orientation.
    pub fn new(start_min: i64, end_min: i64) -> Self {
        Self { start_min, end_min }
    }

    /// Creates a span only if `end_min > start_min`.
    pub fn try_new(start_min: i64, end_min: i64) -> Option<Self> {
        (end_min > start_min).then_some(Self { start_min, end_min })
    }

    /// Whether the span has positive length.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.end_min > self.start_min
    }

    /// Length of this span (minutes).
    #[inline]
    pub fn duration_min(&self) -> i64 {
        self.end_min - self.start_min
    }

    /// Whether an instant falls within this span.
    #[inline]
    pub fn contains(&self, time_min: i64) -> bool {
        time_min >= self.start_min && time_min < self.end_min
    }

    /// Whether `other` lies entirely inside this span.
    pub fn encloses(&self, other: &Self) -> bool {
        other.start_min >= self.start_min && other.end_min <= self.end_min
    }

    /// Intersection `[max(starts), min(ends))`, or `None` when empty.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        Self::try_new(
            self.start_min.max(other.start_min),
            self.end_min.min(other.end_min),
        )
    }

    /// Zero-based day index of the span start.
    pub fn start_day(&self) -> i64 {
        self.start_min.div_euclid(MINUTES_PER_DAY)
    }
}
