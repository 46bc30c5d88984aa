//! Build-time records: shift candidates, periods and coverage samples.
//!
//! These are produced once per build and referenced by index afterwards.
//! Variable handles point into whatever [`ModelSink`](crate::solver::ModelSink)
//! the build was emitted to.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::TimeSpan;
use crate::solver::{LinearExpr, VarRef};

/// A (member, window, start, duration) combination gated by a selection boolean.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftCandidate {
    /// Member holding the shift.
    pub member_id: String,
    /// Window the shift was generated for.
    pub window_id: String,
    /// Index into the build's member list.
    pub member_index: usize,
    /// Index into the build's window list.
    pub window_index: usize,
    /// Shift start (minutes).
    pub start_min: i64,
    /// Shift end (minutes).
    pub end_min: i64,
    /// Duration class (minutes).
    pub duration_min: i64,
    /// Breaks required by the duration class.
    pub break_count: u8,
    /// Length of each break (minutes).
    pub break_length_min: i64,
    /// 1 iff the candidate is rostered.
    pub selection: VarRef,
    /// Indices of this candidate's periods, in ordinal order.
    pub periods: Range<usize>,
}

impl ShiftCandidate {
    /// The shift as a span.
    #[inline]
    pub fn span(&self) -> TimeSpan {
        TimeSpan::new(self.start_min, self.end_min)
    }

    /// Whether `[start, end]` (closed) contains the instant.
    #[inline]
    pub fn could_cover(&self, instant_min: i64) -> bool {
        self.start_min <= instant_min && instant_min <= self.end_min
    }

    /// Day bucket of the shift start.
    pub fn day(&self) -> i64 {
        self.span().start_day()
    }
}

/// What a period is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodKind {
    Work,
    FirstBreak,
    SecondBreak,
}

impl PeriodKind {
    /// Whether this is a break.
    pub fn is_break(self) -> bool {
        !matches!(self, PeriodKind::Work)
    }
}

/// One work or break segment of a candidate.
///
/// Start and end are continuous variables; `work`, `break1` and `break2`
/// are mutually exclusive booleans whose sum equals the owning candidate's
/// selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    /// Owning candidate index.
    pub candidate: usize,
    /// Position within the candidate (0-based).
    pub ordinal: usize,
    /// Start instant.
    pub start: VarRef,
    /// End instant.
    pub end: VarRef,
    /// 1 iff this is a work period of a selected candidate.
    pub work: VarRef,
    /// 1 iff this is the first break.
    pub break1: VarRef,
    /// 1 iff this is the second break.
    pub break2: VarRef,
}

impl Period {
    /// The indicator for a period kind.
    pub fn indicator(&self, kind: PeriodKind) -> VarRef {
        match kind {
            PeriodKind::Work => self.work,
            PeriodKind::FirstBreak => self.break1,
            PeriodKind::SecondBreak => self.break2,
        }
    }

    /// `end - start`.
    pub fn span_expr(&self) -> LinearExpr {
        LinearExpr::var(self.end) - LinearExpr::var(self.start)
    }
}

/// Compiled "period covers instant" predicate.
///
/// `cover` is 1 only if the period is a work period with
/// `start <= instant <= end`. `late`/`early` exist when exact coverage
/// linkage is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverLink {
    /// Period index.
    pub period: usize,
    /// Sampled instant (minutes).
    pub instant_min: i64,
    /// Predicate variable.
    pub cover: VarRef,
    /// 1 only if the period starts after the instant.
    pub late: Option<VarRef>,
    /// 1 only if the period ends before the instant.
    pub early: Option<VarRef>,
}

/// "Member is on the floor at instant" for a member with several cover
/// predicates at that instant (touching shifts or touching work periods).
///
/// `present` is at most the sum of `covers` and at most 1, so the member
/// counts once however many of their periods touch the instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloorLink {
    /// Index into the build's member list.
    pub member_index: usize,
    /// Sampled instant (minutes).
    pub instant_min: i64,
    /// Presence variable.
    pub present: VarRef,
    /// Cover predicates of the member's periods at the instant.
    pub covers: Vec<VarRef>,
}

/// One sampled instant of an open window.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageSample {
    /// Index into the build's window list.
    pub window_index: usize,
    /// Window id.
    pub window_id: String,
    /// Sampled instant (minutes).
    pub instant_min: i64,
    /// Required headcount.
    pub min_staffing: i32,
    /// Allowed headcount.
    pub max_staffing: i32,
    /// Shortfall below `min_staffing`, integer in `[0, min_staffing]`.
    pub slack: VarRef,
    /// Number of distinct members working at the instant.
    pub on_floor: LinearExpr,
}
