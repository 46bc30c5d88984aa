//! Solved rosters.
//!
//! Read-only projections of a solver assignment onto the build records:
//! which shifts were rostered, how each splits into work and breaks, and
//! how many members were on the floor at every sampled instant.

mod kpi;

pub use kpi::RosterKpi;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::builder::RosterModel;
use crate::models::PeriodKind;
use crate::solver::Assignment;

/// One work or break segment of a rostered shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosteredPeriod {
    /// Work or break.
    pub kind: PeriodKind,
    /// Start (minutes).
    pub start_min: i64,
    /// End (minutes).
    pub end_min: i64,
}

impl RosteredPeriod {
    /// Length in minutes.
    pub fn duration_min(&self) -> i64 {
        self.end_min - self.start_min
    }
}

/// A selected candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosteredShift {
    /// Candidate index within the build.
    pub candidate: usize,
    /// Member holding the shift.
    pub member_id: String,
    /// Window the shift was generated for.
    pub window_id: String,
    /// Start (minutes).
    pub start_min: i64,
    /// End (minutes).
    pub end_min: i64,
    /// Periods in order.
    pub periods: Vec<RosteredPeriod>,
}

impl RosteredShift {
    /// Shift length in minutes.
    pub fn duration_min(&self) -> i64 {
        self.end_min - self.start_min
    }

    /// Minutes spent on breaks.
    pub fn break_minutes(&self) -> i64 {
        self.periods
            .iter()
            .filter(|p| p.kind.is_break())
            .map(RosteredPeriod::duration_min)
            .sum()
    }

    /// Whether the member is working (not on a break) at the instant.
    /// Period ends are inclusive.
    pub fn is_working_at(&self, instant_min: i64) -> bool {
        self.periods.iter().any(|p| {
            p.kind == PeriodKind::Work && p.start_min <= instant_min && instant_min <= p.end_min
        })
    }
}

/// Staffing at one sampled instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageReading {
    /// Window id.
    pub window_id: String,
    /// Sampled instant (minutes).
    pub instant_min: i64,
    /// Required headcount.
    pub min_staffing: i32,
    /// Allowed headcount.
    pub max_staffing: i32,
    /// Distinct members working at the instant.
    pub on_floor: i32,
    /// Slack value reported by the solver.
    pub slack: i32,
}

impl CoverageReading {
    /// Members missing below the minimum.
    pub fn unfilled(&self) -> i32 {
        (self.min_staffing - self.on_floor).max(0)
    }

    /// Whether the maximum is exceeded.
    pub fn is_overstaffed(&self) -> bool {
        self.on_floor > self.max_staffing
    }
}

/// A decoded roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    /// Rostered shifts in candidate order.
    pub shifts: Vec<RosteredShift>,
    /// One reading per coverage sample.
    pub coverage: Vec<CoverageReading>,
}

impl Roster {
    /// Number of rostered shifts.
    pub fn shift_count(&self) -> usize {
        self.shifts.len()
    }

    /// Distinct members holding at least one shift.
    pub fn assigned_members(&self) -> BTreeSet<&str> {
        self.shifts.iter().map(|s| s.member_id.as_str()).collect()
    }

    /// Whether every reading meets its minimum.
    pub fn is_fully_staffed(&self) -> bool {
        self.coverage.iter().all(|r| r.unfilled() == 0)
    }
}

/// Result of a build-and-solve run.
#[derive(Debug, Clone, PartialEq)]
pub enum RosterOutcome {
    /// The solver returned an assignment.
    Solved {
        roster: Roster,
        proven_optimal: bool,
    },
    /// No roster satisfies the structural constraints.
    Infeasible,
    /// The deadline passed first.
    TimedOut { incumbent: Option<Roster> },
}

impl RosterOutcome {
    /// The roster, if any (solved or incumbent).
    pub fn roster(&self) -> Option<&Roster> {
        match self {
            RosterOutcome::Solved { roster, .. } => Some(roster),
            RosterOutcome::TimedOut { incumbent } => incumbent.as_ref(),
            RosterOutcome::Infeasible => None,
        }
    }
}

impl RosterModel {
    /// Projects an assignment onto the build records.
    ///
    /// Times are rounded to whole minutes. On-floor counts are recomputed
    /// from the decoded shifts, so they never depend on how the solver set
    /// the cover predicates.
    pub fn decode(&self, values: &Assignment) -> Roster {
        let shifts: Vec<RosteredShift> = self
            .candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| values.is_true(c.selection))
            .map(|(index, c)| RosteredShift {
                candidate: index,
                member_id: c.member_id.clone(),
                window_id: c.window_id.clone(),
                start_min: c.start_min,
                end_min: c.end_min,
                periods: self.periods[c.periods.clone()]
                    .iter()
                    .map(|p| RosteredPeriod {
                        kind: if values.is_true(p.break1) {
                            PeriodKind::FirstBreak
                        } else if values.is_true(p.break2) {
                            PeriodKind::SecondBreak
                        } else {
                            PeriodKind::Work
                        },
                        start_min: values.value(p.start).round() as i64,
                        end_min: values.value(p.end).round() as i64,
                    })
                    .collect(),
            })
            .collect();

        let coverage = self
            .samples
            .iter()
            .map(|s| {
                let working: BTreeSet<&str> = shifts
                    .iter()
                    .filter(|shift| shift.is_working_at(s.instant_min))
                    .map(|shift| shift.member_id.as_str())
                    .collect();
                CoverageReading {
                    window_id: s.window_id.clone(),
                    instant_min: s.instant_min,
                    min_staffing: s.min_staffing,
                    max_staffing: s.max_staffing,
                    on_floor: working.len() as i32,
                    slack: values.value(s.slack).round() as i32,
                }
            })
            .collect();

        Roster { shifts, coverage }
    }
}
