//! Team member availability and shift preferences.
//!
//! A member may publish several availability intervals across the
//! horizon. Preferences optionally narrow which shift shapes the member
//! can be offered.

use serde::{Deserialize, Serialize};

use super::TimeSpan;

/// A period during which a team member can be rostered.
///
/// Immutable input owned by the member. `end_min > start_min` is checked
/// by validation, not by the constructor, so malformed input is reported
/// instead of silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvailabilityInterval {
    /// Team member identifier.
    pub member_id: String,
    /// Interval start (minutes from anchor, inclusive).
    pub start_min: i64,
    /// Interval end (minutes from anchor, exclusive).
    pub end_min: i64,
}

impl AvailabilityInterval {
    /// Creates a new availability interval.
    pub fn new(member_id: impl Into<String>, start_min: i64, end_min: i64) -> Self {
        Self {
            member_id: member_id.into(),
            start_min,
            end_min,
        }
    }

    /// The interval as a [`TimeSpan`].
    #[inline]
    pub fn span(&self) -> TimeSpan {
        TimeSpan::new(self.start_min, self.end_min)
    }

    /// Length of the interval (minutes).
    #[inline]
    pub fn duration_min(&self) -> i64 {
        self.end_min - self.start_min
    }
}

/// A member's preferred shift shape.
///
/// When a member has at least one preference, only candidates matching
/// one of them are generated for that member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShiftPreference {
    /// Team member identifier.
    pub member_id: String,
    /// Preferred shift duration; must exist in the shift catalog.
    pub duration_min: i64,
    /// Earliest acceptable start (minutes from anchor).
    pub earliest_start_min: Option<i64>,
    /// Latest acceptable start (minutes from anchor).
    pub latest_start_min: Option<i64>,
}

impl ShiftPreference {
    /// Creates a preference for a duration at any start time.
    pub fn new(member_id: impl Into<String>, duration_min: i64) -> Self {
        Self {
            member_id: member_id.into(),
            duration_min,
            earliest_start_min: None,
            latest_start_min: None,
        }
    }

    /// Restricts the start time to `[earliest, latest]`.
    pub fn with_start_range(mut self, earliest_min: i64, latest_min: i64) -> Self {
        self.earliest_start_min = Some(earliest_min);
        self.latest_start_min = Some(latest_min);
        self
    }

    /// Whether a shift starting at `start_min` lasting `duration_min` matches.
    pub fn admits(&self, start_min: i64, duration_min: i64) -> bool {
        duration_min == self.duration_min
            && self.earliest_start_min.map_or(true, |e| start_min >= e)
            && self.latest_start_min.map_or(true, |l| start_min <= l)
    }
}
