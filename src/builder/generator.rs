//! Shift candidate enumeration.
//!
//! Candidates are produced in (member, window, start, duration) order.
//! Members are ordered by first appearance in the availability list,
//! windows by input order, starts and durations ascending.

use std::collections::BTreeSet;

use tracing::debug;

use super::{RosterBuilder, RosterModel};
use crate::error::{BuildError, BuildLimit};
use crate::models::{ShiftCandidate, TimeSpan};
use crate::solver::ModelSink;

/// A candidate before any variable exists for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandidateKey {
    pub member_index: usize,
    pub window_index: usize,
    pub start_min: i64,
    pub duration_min: i64,
}

/// Distinct member ids in order of first appearance.
pub(crate) fn member_order(builder: &RosterBuilder<'_>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    builder
        .availability
        .iter()
        .filter(|a| seen.insert(a.member_id.as_str()))
        .map(|a| a.member_id.clone())
        .collect()
}

/// Upper bound on the number of candidates: members × (grid points inside
/// each window) × durations.
pub(crate) fn candidate_bound(builder: &RosterBuilder<'_>, member_count: usize) -> usize {
    let grid_points: usize = builder
        .windows
        .iter()
        .map(|w| builder.grid.points_within(w.span()).count())
        .sum();
    member_count
        .saturating_mul(grid_points)
        .saturating_mul(builder.catalog.len())
}

/// Enumerates every feasible (member, window, start, duration).
///
/// Fails with [`BuildError::LimitExceeded`] before enumerating if the
/// candidate bound exceeds the configured cap.
pub(crate) fn enumerate(
    builder: &RosterBuilder<'_>,
    members: &[String],
) -> Result<Vec<CandidateKey>, BuildError> {
    let bound = candidate_bound(builder, members.len());
    let max = builder.config.limits.max_candidates;
    if bound > max {
        return Err(BuildError::LimitExceeded {
            limit: BuildLimit::Candidates,
            actual: bound,
            max,
        });
    }

    let mut keys = Vec::new();
    for (member_index, member) in members.iter().enumerate() {
        let preferences: Vec<_> = builder
            .preferences
            .iter()
            .filter(|p| p.member_id == *member)
            .collect();

        for (window_index, window) in builder.windows.iter().enumerate() {
            // (start, duration) pairs; several availability intervals may
            // yield the same pair
            let mut pairs = BTreeSet::new();
            for availability in builder.availability.iter().filter(|a| a.member_id == *member) {
                let Some(clipped) =
                    super::clip(availability, window).map_err(|e| BuildError::Validation(vec![e]))?
                else {
                    continue;
                };
                for start in builder.grid.points_within(clipped) {
                    for duration in builder.catalog.durations() {
                        // the clipped span already lies inside the window
                        if !clipped.encloses(&TimeSpan::new(start, start + duration)) {
                            continue;
                        }
                        if !preferences.is_empty()
                            && !preferences.iter().any(|p| p.admits(start, duration))
                        {
                            continue;
                        }
                        pairs.insert((start, duration));
                    }
                }
            }
            keys.extend(pairs.into_iter().map(|(start_min, duration_min)| CandidateKey {
                member_index,
                window_index,
                start_min,
                duration_min,
            }));
        }
    }

    debug!(bound, candidates = keys.len(), "enumerated shift candidates");
    Ok(keys)
}

/// Declares one selection boolean per key and records the candidates.
///
/// Periods are attached later by the decomposer.
pub(crate) fn emit<S: ModelSink + ?Sized>(
    builder: &RosterBuilder<'_>,
    keys: &[CandidateKey],
    model: &mut RosterModel,
    sink: &mut S,
) -> Result<(), BuildError> {
    model.candidates.reserve(keys.len());
    for key in keys {
        let class = super::class_of(builder.catalog, key.duration_min)?;
        let member_id = model.members[key.member_index].clone();
        let window_id = builder.windows[key.window_index].id.clone();
        let selection = sink.declare_boolean(&format!(
            "select[{member_id}/{window_id}@{}+{}]",
            key.start_min, key.duration_min
        ));
        model.candidates.push(ShiftCandidate {
            member_id,
            window_id,
            member_index: key.member_index,
            window_index: key.window_index,
            start_min: key.start_min,
            end_min: key.start_min + key.duration_min,
            duration_min: key.duration_min,
            break_count: class.break_count,
            break_length_min: class.break_length_min,
            selection,
            periods: 0..0,
        });
    }
    Ok(())
}
