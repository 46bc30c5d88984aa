//! Shift plans.
//!
//! A [`ShiftPlan`] picks one candidate and the start of each of its breaks.
//! [`RosterModel::complete_assignment`] turns a set of plans into a value for
//! every variable of the model: selections, period geometry, indicators,
//! cover predicates, presence flags, slack and member flags. The result can be handed to a
//! solver as a warm start or checked with
//! [`LinearModel::violations`](crate::solver::LinearModel::violations).
//!
//! Plans are only checked for shape (break count, order, containment).
//! Placement windows and work-block lengths are left to the model.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::RosterModel;
use crate::error::BuildError;
use crate::models::{PeriodKind, ShiftCandidate};
use crate::solver::Assignment;

/// A chosen candidate with the start instant of each break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftPlan {
    /// Candidate index within the build.
    pub candidate: usize,
    /// Absolute break start instants (minutes), ascending.
    pub breaks: Vec<i64>,
}

impl ShiftPlan {
    /// A plan without breaks.
    pub fn new(candidate: usize) -> Self {
        Self {
            candidate,
            breaks: Vec::new(),
        }
    }

    /// Adds a break starting at `start_min`.
    pub fn with_break(mut self, start_min: i64) -> Self {
        self.breaks.push(start_min);
        self
    }
}

/// Concrete geometry of one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    kind: PeriodKind,
    start_min: i64,
    end_min: i64,
}

impl RosterModel {
    /// Derives a full assignment from shift plans.
    ///
    /// Candidates without a plan are left unselected. Slack takes the
    /// smallest value the coverage rows allow.
    ///
    /// # Errors
    /// [`BuildError::InvalidPlan`] for an unknown or repeated candidate, a
    /// wrong number of breaks, breaks out of order or outside the shift, or
    /// a candidate whose period count is not `2 · breaks + 1`.
    pub fn complete_assignment(&self, plans: &[ShiftPlan]) -> Result<Assignment, BuildError> {
        let mut values = Assignment::default();
        let mut seen = HashSet::new();

        for plan in plans {
            let candidate = self.candidates.get(plan.candidate).ok_or_else(|| {
                BuildError::InvalidPlan(format!("unknown candidate {}", plan.candidate))
            })?;
            if !seen.insert(plan.candidate) {
                return Err(BuildError::InvalidPlan(format!(
                    "candidate {} planned twice",
                    plan.candidate
                )));
            }
            let segments = layout(plan, candidate)?;

            values.set(candidate.selection, 1.0);
            if let Some(&flag) = self.member_assigned.get(candidate.member_index) {
                values.set(flag, 1.0);
            }
            for (period, segment) in self.periods[candidate.periods.clone()].iter().zip(&segments) {
                values.set(period.start, segment.start_min as f64);
                values.set(period.end, segment.end_min as f64);
                values.set(period.indicator(segment.kind), 1.0);
            }
        }

        for link in &self.cover_links {
            let period = self.periods[link.period];
            let working = values.is_true(period.work);
            let start = values.value(period.start);
            let end = values.value(period.end);
            let at = link.instant_min as f64;
            let covers = working && start <= at && at <= end;
            values.set(link.cover, if covers { 1.0 } else { 0.0 });
            if let (Some(late), Some(early)) = (link.late, link.early) {
                let r = self.resolution_min;
                let is_late = working && !covers && start >= at + r;
                let is_early = working && !covers && !is_late && end <= at - r;
                values.set(late, if is_late { 1.0 } else { 0.0 });
                values.set(early, if is_early { 1.0 } else { 0.0 });
            }
        }

        for link in &self.floor_links {
            let present = link.covers.iter().any(|&c| values.is_true(c));
            values.set(link.present, if present { 1.0 } else { 0.0 });
        }

        for sample in &self.samples {
            let on_floor = sample.on_floor.evaluate(&values);
            let short = (sample.min_staffing as f64 - on_floor).max(0.0);
            values.set(sample.slack, short);
        }

        Ok(values)
    }
}

/// Alternating work/break segments of a planned candidate.
fn layout(plan: &ShiftPlan, candidate: &ShiftCandidate) -> Result<Vec<Segment>, BuildError> {
    let breaks = candidate.break_count as usize;
    if plan.breaks.len() != breaks {
        return Err(BuildError::InvalidPlan(format!(
            "candidate {} takes {} break(s), plan gives {}",
            plan.candidate,
            breaks,
            plan.breaks.len()
        )));
    }
    if candidate.periods.len() != 2 * breaks + 1 {
        return Err(BuildError::InvalidPlan(format!(
            "candidate {} has {} periods, cannot alternate around {} break(s)",
            plan.candidate,
            candidate.periods.len(),
            breaks
        )));
    }

    let mut segments = Vec::with_capacity(2 * breaks + 1);
    let mut cursor = candidate.start_min;
    for (slot, &start) in plan.breaks.iter().enumerate() {
        let end = start + candidate.break_length_min;
        if start < cursor || end > candidate.end_min {
            return Err(BuildError::InvalidPlan(format!(
                "break at {start} of candidate {} is out of order or outside [{}, {}]",
                plan.candidate, candidate.start_min, candidate.end_min
            )));
        }
        segments.push(Segment {
            kind: PeriodKind::Work,
            start_min: cursor,
            end_min: start,
        });
        segments.push(Segment {
            kind: if slot == 0 {
                PeriodKind::FirstBreak
            } else {
                PeriodKind::SecondBreak
            },
            start_min: start,
            end_min: end,
        });
        cursor = end;
    }
    segments.push(Segment {
        kind: PeriodKind::Work,
        start_min: cursor,
        end_min: candidate.end_min,
    });
    Ok(segments)
}
