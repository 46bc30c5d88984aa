//! Open operating windows.
//!
//! An open window is a span during which the workplace requires staffing,
//! bounded by a minimum and maximum concurrent headcount.

use serde::{Deserialize, Serialize};

use super::TimeSpan;

/// A staffed operating window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpenWindow {
    /// Unique window identifier.
    pub id: String,
    /// Window start (minutes from anchor, inclusive).
    pub start_min: i64,
    /// Window end (minutes from anchor).
    pub end_min: i64,
    /// Minimum members on the floor at every sampled instant.
    pub min_staffing: i32,
    /// Maximum members on the floor at every sampled instant.
    pub max_staffing: i32,
}

impl OpenWindow {
    /// Creates a window requiring one member on the floor.
    pub fn new(id: impl Into<String>, start_min: i64, end_min: i64) -> Self {
        Self {
            id: id.into(),
            start_min,
            end_min,
            min_staffing: 1,
            max_staffing: 1,
        }
    }

    /// Sets the staffing bounds.
    pub fn with_staffing(mut self, min_staffing: i32, max_staffing: i32) -> Self {
        self.min_staffing = min_staffing;
        self.max_staffing = max_staffing;
        self
    }

    /// The window as a [`TimeSpan`].
    #[inline]
    pub fn span(&self) -> TimeSpan {
        TimeSpan::new(self.start_min, self.end_min)
    }

    /// Length of the window (minutes).
    #[inline]
    pub fn duration_min(&self) -> i64 {
        self.end_min - self.start_min
    }
}
