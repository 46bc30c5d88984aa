//! Objective composition.
//!
//! The build stores one expression per [`ObjectiveTerm`] together with an
//! upper bound on its value. Any [`ObjectivePolicy`] is then composed from
//! those expressions without touching the constraints, so callers can
//! rebuild the objective for a different policy from the same model.

use serde::{Deserialize, Serialize};

use crate::solver::{LinearExpr, Sense};

/// A quantity the objective can weigh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectiveTerm {
    /// Total slack over all coverage samples. Naturally minimized.
    UnfilledStaffing,
    /// Number of selected candidates. Naturally minimized.
    AssignedShifts,
    /// Number of members holding at least one shift. Naturally maximized.
    AssignedMembers,
}

impl ObjectiveTerm {
    /// `1.0` for terms that are minimized, `-1.0` for maximized ones.
    pub fn direction(self) -> f64 {
        match self {
            ObjectiveTerm::UnfilledStaffing | ObjectiveTerm::AssignedShifts => 1.0,
            ObjectiveTerm::AssignedMembers => -1.0,
        }
    }
}

/// How terms are combined into the minimized objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectivePolicy {
    /// `Σ weight · term`. A negative weight maximizes the term.
    Weighted(Vec<(ObjectiveTerm, f64)>),
    /// Terms in priority order, each in its natural direction. A better
    /// value of an earlier term always beats any change in later ones.
    Lexicographic(Vec<ObjectiveTerm>),
}

impl Default for ObjectivePolicy {
    fn default() -> Self {
        ObjectivePolicy::Weighted(vec![(ObjectiveTerm::UnfilledStaffing, 1.0)])
    }
}

/// Per-term expressions and upper bounds recorded by a build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectiveTerms {
    /// `Σ slack`.
    pub unfilled: LinearExpr,
    /// `Σ selection`.
    pub shifts: LinearExpr,
    /// `Σ assigned`.
    pub members: LinearExpr,
    /// Largest possible total slack.
    pub unfilled_bound: i64,
    /// Number of candidates.
    pub shifts_bound: i64,
    /// Number of members.
    pub members_bound: i64,
}

impl ObjectiveTerms {
    /// Expression of a term.
    pub fn expr(&self, term: ObjectiveTerm) -> &LinearExpr {
        match term {
            ObjectiveTerm::UnfilledStaffing => &self.unfilled,
            ObjectiveTerm::AssignedShifts => &self.shifts,
            ObjectiveTerm::AssignedMembers => &self.members,
        }
    }

    /// Upper bound on a term's value (all terms are non-negative integers).
    pub fn bound(&self, term: ObjectiveTerm) -> i64 {
        match term {
            ObjectiveTerm::UnfilledStaffing => self.unfilled_bound,
            ObjectiveTerm::AssignedShifts => self.shifts_bound,
            ObjectiveTerm::AssignedMembers => self.members_bound,
        }
    }

    /// Composes the objective for a policy. The result is always minimized.
    pub fn compose(&self, policy: &ObjectivePolicy) -> (LinearExpr, Sense) {
        let expr = match policy {
            ObjectivePolicy::Weighted(weights) => weights
                .iter()
                .map(|&(term, weight)| self.expr(term).clone() * weight)
                .sum(),
            ObjectivePolicy::Lexicographic(order) => {
                lexicographic_weights(order, |t| self.bound(t))
                    .into_iter()
                    .map(|(term, weight)| self.expr(term).clone() * (weight * term.direction()))
                    .sum()
            }
        };
        (expr, Sense::Minimize)
    }
}

/// Hierarchical weights: the last term gets 1, each earlier term one more
/// than the largest total swing of everything after it.
///
/// ```
/// use u_roster::builder::{lexicographic_weights, ObjectiveTerm};
///
/// let w = lexicographic_weights(
///     &[ObjectiveTerm::UnfilledStaffing, ObjectiveTerm::AssignedShifts],
///     |t| if t == ObjectiveTerm::AssignedShifts { 10 } else { 98 },
/// );
/// assert_eq!(w, vec![
///     (ObjectiveTerm::UnfilledStaffing, 11.0),
///     (ObjectiveTerm::AssignedShifts, 1.0),
/// ]);
/// ```
pub fn lexicographic_weights(
    order: &[ObjectiveTerm],
    bound: impl Fn(ObjectiveTerm) -> i64,
) -> Vec<(ObjectiveTerm, f64)> {
    let mut weights = vec![0.0; order.len()];
    let mut swing = 0.0;
    for (i, &term) in order.iter().enumerate().rev() {
        weights[i] = swing + 1.0;
        swing += weights[i] * bound(term).max(0) as f64;
    }
    order.iter().copied().zip(weights).collect()
}
