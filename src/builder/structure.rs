//! Structural constraints.
//!
//! Per candidate: selection gating, period bounds scaled by the selection,
//! contiguity, break counts, order and placement, break and work lengths,
//! total duration. Per member: selection policy, duration limit and the
//! "member is assigned" flag.
//!
//! All conditional geometry is written as indicator constraints on the
//! period booleans. Because a period boolean can only be 1 when its
//! candidate is selected, the candidate's start can appear as a constant
//! on the right-hand side.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::{class_of, RosterModel};
use crate::config::{LimitScope, RosterConfig, SelectionPolicy};
use crate::error::BuildError;
use crate::models::{BreakSlot, Period, ShiftCandidate, ShiftCatalog, ShiftClass};
use crate::solver::{LinearExpr, ModelSink, VarRef};

/// Emits every structural constraint of the model.
pub(crate) fn emit<S: ModelSink + ?Sized>(
    catalog: &ShiftCatalog,
    config: &RosterConfig,
    model: &mut RosterModel,
    sink: &mut S,
) -> Result<(), BuildError> {
    for candidate in &model.candidates {
        let class = class_of(catalog, candidate.duration_min)?;
        let periods = &model.periods[candidate.periods.clone()];
        shift_rows(candidate, class, periods, sink);
    }

    selection_rows(config.selection, &model.candidates, sink);
    if let Some(limit) = config.day_limit_min {
        limit_rows(limit, config.day_limit_scope, &model.candidates, sink);
    }

    model.member_assigned = model
        .members
        .iter()
        .map(|m| sink.declare_boolean(&format!("assigned[{m}]")))
        .collect();
    assigned_rows(&model.member_assigned, &model.candidates, sink);

    debug!(
        candidates = model.candidates.len(),
        members = model.members.len(),
        "emitted structural constraints"
    );
    Ok(())
}

fn shift_rows<S: ModelSink + ?Sized>(
    candidate: &ShiftCandidate,
    class: &ShiftClass,
    periods: &[Period],
    sink: &mut S,
) {
    let x = candidate.selection;
    let start = candidate.start_min as f64;
    let end = candidate.end_min as f64;

    for p in periods {
        sink.add_linear(
            (LinearExpr::sum_of([p.work, p.break1, p.break2]) - LinearExpr::var(x))
                .equals(0.0)
                .labeled("period.exclusive"),
        );
        for indicator in [p.work, p.break1, p.break2] {
            sink.add_linear(
                (LinearExpr::var(indicator) - LinearExpr::var(x))
                    .at_most(0.0)
                    .labeled("period.gate"),
            );
        }
        for bound in [p.start, p.end] {
            sink.add_linear(
                (LinearExpr::var(bound) - LinearExpr::term(x, start))
                    .at_least(0.0)
                    .labeled("period.bounds"),
            );
            sink.add_linear(
                (LinearExpr::var(bound) - LinearExpr::term(x, end))
                    .at_most(0.0)
                    .labeled("period.bounds"),
            );
        }
        sink.add_linear(p.span_expr().at_least(0.0).labeled("period.order"));

        for slot in BreakSlot::ALL {
            if !class.takes(slot) {
                continue;
            }
            let indicator = match slot {
                BreakSlot::First => p.break1,
                BreakSlot::Second => p.break2,
            };
            sink.add_indicator(
                indicator,
                p.span_expr()
                    .equals(class.break_length_min as f64)
                    .labeled("break.length"),
                true,
            );
            if let Some(range) = class.placement.range(slot) {
                sink.add_indicator(
                    indicator,
                    LinearExpr::var(p.start)
                        .at_least((candidate.start_min + range.earliest_min) as f64)
                        .labeled("break.placement"),
                    true,
                );
                if let Some(latest) = range.latest_min {
                    sink.add_indicator(
                        indicator,
                        LinearExpr::var(p.start)
                            .at_most((candidate.start_min + latest) as f64)
                            .labeled("break.placement"),
                        true,
                    );
                }
            }
        }

        if class.work.min_block_min > 0 {
            sink.add_indicator(
                p.work,
                p.span_expr()
                    .at_least(class.work.min_block_min as f64)
                    .labeled("work.block"),
                true,
            );
        }
        if let Some(max_block) = class.work.max_block_min {
            sink.add_indicator(
                p.work,
                p.span_expr().at_most(max_block as f64).labeled("work.block"),
                true,
            );
        }
    }

    // contiguity
    if let (Some(first), Some(last)) = (periods.first(), periods.last()) {
        sink.add_linear(
            (LinearExpr::var(first.start) - LinearExpr::term(x, start))
                .equals(0.0)
                .labeled("period.contiguity"),
        );
        for pair in periods.windows(2) {
            sink.add_linear(
                (LinearExpr::var(pair[0].end) - LinearExpr::var(pair[1].start))
                    .equals(0.0)
                    .labeled("period.contiguity"),
            );
        }
        sink.add_linear(
            (LinearExpr::var(last.end) - LinearExpr::term(x, end))
                .equals(0.0)
                .labeled("period.contiguity"),
        );
    }

    // no two adjacent breaks
    for pair in periods.windows(2) {
        sink.add_linear(
            (LinearExpr::sum_of([pair[0].break1, pair[0].break2, pair[1].break1, pair[1].break2])
                - LinearExpr::var(x))
            .at_most(0.0)
            .labeled("break.alternation"),
        );
    }

    for slot in BreakSlot::ALL {
        let taken = if class.takes(slot) { 1.0 } else { 0.0 };
        let count = LinearExpr::sum_of(periods.iter().map(|p| match slot {
            BreakSlot::First => p.break1,
            BreakSlot::Second => p.break2,
        }));
        sink.add_linear(
            (count - LinearExpr::term(x, taken))
                .equals(0.0)
                .labeled("break.count"),
        );
    }

    if class.takes(BreakSlot::Second) {
        // ordinal(break2) - ordinal(break1) >= 1 when selected
        let mut order = LinearExpr::term(x, -1.0);
        for p in periods {
            order.add_term(p.break2, p.ordinal as f64);
            order.add_term(p.break1, -(p.ordinal as f64));
        }
        sink.add_linear(order.at_least(0.0).labeled("break.order"));
    }

    let total: LinearExpr = periods.iter().map(Period::span_expr).sum();
    sink.add_linear(
        (total - LinearExpr::term(x, candidate.duration_min as f64))
            .equals(0.0)
            .labeled("shift.duration"),
    );
}

fn selection_rows<S: ModelSink + ?Sized>(
    policy: SelectionPolicy,
    candidates: &[ShiftCandidate],
    sink: &mut S,
) {
    match policy {
        SelectionPolicy::OnePerMember => {
            for group in group_by(candidates, |c| (c.member_index, 0)).into_values() {
                at_most_one(&group, candidates, "member.one_shift", sink);
            }
        }
        SelectionPolicy::OnePerMemberWindow => {
            for group in group_by(candidates, |c| (c.member_index, c.window_index)).into_values() {
                at_most_one(&group, candidates, "member.one_per_window", sink);
            }
        }
        SelectionPolicy::NonOverlapping => {
            for group in group_by(candidates, |c| (c.member_index, 0)).into_values() {
                let starts: BTreeSet<i64> = group.iter().map(|&i| candidates[i].start_min).collect();
                for t in starts {
                    // every pair of overlapping shifts shares the later start
                    let clique: Vec<usize> = group
                        .iter()
                        .copied()
                        .filter(|&i| candidates[i].span().contains(t))
                        .collect();
                    if clique.len() > 1 {
                        at_most_one(&clique, candidates, "member.no_overlap", sink);
                    }
                }
            }
        }
    }
}

fn limit_rows<S: ModelSink + ?Sized>(
    limit_min: i64,
    scope: LimitScope,
    candidates: &[ShiftCandidate],
    sink: &mut S,
) {
    let groups = match scope {
        LimitScope::Horizon => group_by(candidates, |c| (c.member_index, 0)),
        LimitScope::Daily => group_by(candidates, |c| (c.member_index, c.day())),
    };
    for group in groups.into_values() {
        let mut rostered = LinearExpr::new();
        for &i in &group {
            rostered.add_term(candidates[i].selection, candidates[i].duration_min as f64);
        }
        sink.add_linear(rostered.at_most(limit_min as f64).labeled("member.day_limit"));
    }
}

fn assigned_rows<S: ModelSink + ?Sized>(
    assigned: &[VarRef],
    candidates: &[ShiftCandidate],
    sink: &mut S,
) {
    for (member, &flag) in assigned.iter().enumerate() {
        let mut any = LinearExpr::new();
        for c in candidates.iter().filter(|c| c.member_index == member) {
            sink.add_linear(
                (LinearExpr::var(c.selection) - LinearExpr::var(flag))
                    .at_most(0.0)
                    .labeled("member.assigned"),
            );
            any.add_term(c.selection, 1.0);
        }
        sink.add_linear(
            (LinearExpr::var(flag) - any)
                .at_most(0.0)
                .labeled("member.assigned"),
        );
    }
}

fn at_most_one<S: ModelSink + ?Sized>(
    group: &[usize],
    candidates: &[ShiftCandidate],
    label: &'static str,
    sink: &mut S,
) {
    let sum = LinearExpr::sum_of(group.iter().map(|&i| candidates[i].selection));
    sink.add_linear(sum.at_most(1.0).labeled(label));
}

/// Candidate indices grouped by key, keys ascending, indices in order.
fn group_by<K: Ord>(
    candidates: &[ShiftCandidate],
    key: impl Fn(&ShiftCandidate) -> K,
) -> BTreeMap<K, Vec<usize>> {
    let mut groups: BTreeMap<K, Vec<usize>> = BTreeMap::new();
    for (i, c) in candidates.iter().enumerate() {
        groups.entry(key(c)).or_default().push(i);
    }
    groups
}
