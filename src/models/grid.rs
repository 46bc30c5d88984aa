//! Start time grid.
//!
//! The canonical set of instants at which a shift may begin. Typically a
//! handful of hourly anchors repeated for every day of the horizon.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::span::MINUTES_PER_DAY;
use super::TimeSpan;

/// Sorted, de-duplicated shift start offsets (minutes from anchor).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartTimeGrid {
    offsets: BTreeSet<i64>,
}

impl StartTimeGrid {
    /// Creates an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a grid from arbitrary offsets.
    pub fn from_offsets(offsets: impl IntoIterator<Item = i64>) -> Self {
        Self {
            offsets: offsets.into_iter().collect(),
        }
    }

    /// Hour-of-day anchors repeated for `days` consecutive days.
    ///
    /// ```
    /// use u_roster::models::StartTimeGrid;
    ///
    /// let grid = StartTimeGrid::daily_anchors(&[6, 14], 2);
    /// let offsets: Vec<i64> = grid.iter().collect();
    /// assert_eq!(offsets, vec![360, 840, 1800, 2280]);
    /// ```
    pub fn daily_anchors(hours: &[i64], days: u32) -> Self {
        Self::from_offsets(
            (0..days as i64)
                .flat_map(|day| hours.iter().map(move |h| day * MINUTES_PER_DAY + h * 60)),
        )
    }

    /// Every `step_min` minutes across `[span.start, span.end)`.
    ///
    /// A non-positive step yields an empty grid.
    pub fn every(step_min: i64, span: TimeSpan) -> Self {
        if step_min <= 0 {
            return Self::new();
        }
        Self::from_offsets(
            (0..)
                .map(|k| span.start_min + k * step_min)
                .take_while(|t| *t < span.end_min),
        )
    }

    /// Grid points `s` with `span.start <= s < span.end`, ascending.
    pub fn points_within(&self, span: TimeSpan) -> impl Iterator<Item = i64> + '_ {
        let range = if span.is_well_formed() {
            span.start_min..span.end_min
        } else {
            span.start_min..span.start_min
        };
        self.offsets.range(range).copied()
    }

    /// All offsets, ascending.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.offsets.iter().copied()
    }

    /// Whether an offset is on the grid.
    pub fn contains(&self, offset_min: i64) -> bool {
        self.offsets.contains(&offset_min)
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Whether the grid is empty.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
