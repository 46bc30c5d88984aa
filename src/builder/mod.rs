//! Rostering model builder.
//!
//! Turns availability, open windows, a shift catalog and a start grid into
//! a mixed-integer model emitted on any [`ModelSink`]:
//!
//! 1. Enumerate shift candidates (one selection boolean each)
//! 2. Decompose candidates into work/break periods
//! 3. Emit structural constraints (gating, contiguity, breaks, limits)
//! 4. Sample coverage and emit staffing rows with slack
//! 5. Compose the objective
//!
//! The build is single-threaded and deterministic: identical input yields
//! identical variable and constraint streams. Everything it creates lives
//! in the returned [`RosterModel`] and the sink; there is no shared state
//! between builds.
//!
//! # Reference
//! Dantzig (1954), "A Comment on Edie's Traffic Delays at Toll Booths"
//! (set-covering shift scheduling); Aykin (1996), "Optimal Shift Scheduling
//! with Multiple Break Windows".

mod clip;
mod coverage;
mod decompose;
mod generator;
mod objective;
mod plan;
mod structure;

#[cfg(test)]
pub(crate) mod fixtures;

pub use clip::clip;
pub use coverage::sample_instants;
pub use generator::CandidateKey;
pub use objective::{lexicographic_weights, ObjectivePolicy, ObjectiveTerm, ObjectiveTerms};
pub use plan::ShiftPlan;

use std::time::Duration;

use tracing::{info, warn};

use crate::config::RosterConfig;
use crate::error::{BuildError, RosterError};
use crate::models::{
    AvailabilityInterval, CoverLink, CoverageSample, FloorLink, OpenWindow, Period, ShiftCandidate,
    ShiftCatalog, ShiftClass, ShiftPreference, StartTimeGrid,
};
use crate::roster::RosterOutcome;
use crate::solver::{LinearExpr, LinearModel, ModelSink, Sense, SolveOutcome, SolverAdapter, VarRef};
use crate::validation::{validate_input, ValidationError, ValidationErrorKind, ValidationResult};

/// Builds a rostering model from domain inputs.
///
/// # Example
/// ```
/// use u_roster::builder::RosterBuilder;
/// use u_roster::models::{AvailabilityInterval, OpenWindow, ShiftCatalog, StartTimeGrid};
///
/// let availability = vec![
///     AvailabilityInterval::new("alice", 300, 1320),
///     AvailabilityInterval::new("bob", 300, 1320),
/// ];
/// let windows = vec![OpenWindow::new("day", 360, 1080).with_staffing(1, 2)];
/// let catalog = ShiftCatalog::standard();
/// let grid = StartTimeGrid::daily_anchors(&[5, 6, 7, 8, 9, 10, 13, 14, 15, 16], 1);
///
/// let (model, recorded) = RosterBuilder::new(&availability, &windows, &catalog, &grid)
///     .build()
///     .unwrap();
/// assert!(!model.candidates().is_empty());
/// assert!(recorded.constraint_count() > 0);
/// ```
#[derive(Debug, Clone)]
pub struct RosterBuilder<'a> {
    availability: &'a [AvailabilityInterval],
    windows: &'a [OpenWindow],
    catalog: &'a ShiftCatalog,
    grid: &'a StartTimeGrid,
    preferences: &'a [ShiftPreference],
    config: RosterConfig,
}

impl<'a> RosterBuilder<'a> {
    /// Creates a builder with the default configuration.
    pub fn new(
        availability: &'a [AvailabilityInterval],
        windows: &'a [OpenWindow],
        catalog: &'a ShiftCatalog,
        grid: &'a StartTimeGrid,
    ) -> Self {
        Self {
            availability,
            windows,
            catalog,
            grid,
            preferences: &[],
            config: RosterConfig::default(),
        }
    }

    /// Restricts members with preferences to matching candidates.
    pub fn with_preferences(mut self, preferences: &'a [ShiftPreference]) -> Self {
        self.preferences = preferences;
        self
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: RosterConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    /// Validates the inputs without building.
    pub fn validate(&self) -> ValidationResult {
        validate_input(
            self.availability,
            self.windows,
            self.catalog,
            self.preferences,
            &self.config,
        )
    }

    /// Emits the model on `sink` and returns the build records.
    ///
    /// # Errors
    /// [`BuildError::Validation`] for malformed input,
    /// [`BuildError::LimitExceeded`] when the candidate or period cap is hit.
    /// Nothing is emitted in either case.
    pub fn build_into<S: ModelSink + ?Sized>(&self, sink: &mut S) -> Result<RosterModel, BuildError> {
        self.validate().map_err(BuildError::Validation)?;

        let members = generator::member_order(self);
        let keys = generator::enumerate(self, &members)?;
        decompose::check_period_cap(
            self.catalog,
            keys.iter().map(|k| k.duration_min),
            &self.config.limits,
        )?;

        let mut model = RosterModel::empty(members);
        generator::emit(self, &keys, &mut model, sink)?;
        decompose::decompose(self.catalog, &mut model, sink)?;
        structure::emit(self.catalog, &self.config, &mut model, sink)?;
        coverage::emit(self.windows, &self.config.sampling, &mut model, sink);

        model.terms = ObjectiveTerms {
            unfilled: LinearExpr::sum_of(model.samples.iter().map(|s| s.slack)),
            shifts: LinearExpr::sum_of(model.candidates.iter().map(|c| c.selection)),
            members: LinearExpr::sum_of(model.member_assigned.iter().copied()),
            unfilled_bound: model
                .samples
                .iter()
                .map(|s| s.min_staffing.max(0) as i64)
                .sum(),
            shifts_bound: model.candidates.len() as i64,
            members_bound: model.members.len() as i64,
        };
        let (objective, sense) = model.objective_for(&self.config.objective);
        sink.set_objective(objective, sense);

        info!(
            members = model.members.len(),
            candidates = model.candidates.len(),
            periods = model.periods.len(),
            samples = model.samples.len(),
            cover_predicates = model.cover_links.len(),
            presence_flags = model.floor_links.len(),
            "rostering model built"
        );
        Ok(model)
    }

    /// Builds into a fresh [`LinearModel`].
    pub fn build(&self) -> Result<(RosterModel, LinearModel), BuildError> {
        let mut recorded = LinearModel::new();
        let model = self.build_into(&mut recorded)?;
        Ok((model, recorded))
    }

    /// Builds into `adapter`, solves, and projects the result.
    ///
    /// Infeasibility and timeouts are outcomes, not errors.
    pub fn solve<A: SolverAdapter + ?Sized>(
        &self,
        adapter: &mut A,
        deadline: Option<Duration>,
    ) -> Result<RosterOutcome, RosterError> {
        let model = self.build_into(adapter)?;
        let outcome = adapter.solve(deadline)?;
        info!(status = outcome.status(), ?deadline, "solver returned");

        Ok(match outcome {
            SolveOutcome::Optimal(values) => RosterOutcome::Solved {
                roster: model.decode(&values),
                proven_optimal: true,
            },
            SolveOutcome::Feasible(values) => RosterOutcome::Solved {
                roster: model.decode(&values),
                proven_optimal: false,
            },
            SolveOutcome::Infeasible => {
                warn!(
                    candidates = model.candidates.len(),
                    "no roster satisfies the structural constraints"
                );
                RosterOutcome::Infeasible
            }
            SolveOutcome::TimedOut(incumbent) => {
                warn!(has_incumbent = incumbent.is_some(), "solver deadline reached");
                RosterOutcome::TimedOut {
                    incumbent: incumbent.map(|values| model.decode(&values)),
                }
            }
        })
    }
}

/// Everything one build created, indexed the way the sink saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterModel {
    pub(crate) members: Vec<String>,
    pub(crate) candidates: Vec<ShiftCandidate>,
    pub(crate) periods: Vec<Period>,
    pub(crate) samples: Vec<CoverageSample>,
    pub(crate) cover_links: Vec<CoverLink>,
    pub(crate) floor_links: Vec<FloorLink>,
    pub(crate) member_assigned: Vec<VarRef>,
    pub(crate) terms: ObjectiveTerms,
    pub(crate) resolution_min: f64,
}

impl RosterModel {
    pub(crate) fn empty(members: Vec<String>) -> Self {
        Self {
            members,
            candidates: Vec::new(),
            periods: Vec::new(),
            samples: Vec::new(),
            cover_links: Vec::new(),
            floor_links: Vec::new(),
            member_assigned: Vec::new(),
            terms: ObjectiveTerms::default(),
            resolution_min: 1.0,
        }
    }

    /// Member ids in build order.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Candidates in (member, window, start, duration) order.
    pub fn candidates(&self) -> &[ShiftCandidate] {
        &self.candidates
    }

    /// All periods, grouped by candidate.
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Periods of one candidate, in ordinal order.
    pub fn periods_of(&self, candidate: usize) -> &[Period] {
        self.candidates
            .get(candidate)
            .map_or(&[][..], |c| &self.periods[c.periods.clone()])
    }

    /// Coverage samples in window order.
    pub fn samples(&self) -> &[CoverageSample] {
        &self.samples
    }

    /// Compiled cover predicates, one per distinct (period, instant).
    pub fn cover_links(&self) -> &[CoverLink] {
        &self.cover_links
    }

    /// Presence flags of members with several cover predicates at one
    /// instant.
    pub fn floor_links(&self) -> &[FloorLink] {
        &self.floor_links
    }

    /// "Member holds a shift" flags, parallel to [`members`](Self::members).
    pub fn member_assigned(&self) -> &[VarRef] {
        &self.member_assigned
    }

    /// Per-term expressions and bounds.
    pub fn objective_terms(&self) -> &ObjectiveTerms {
        &self.terms
    }

    /// Objective for another policy over the same constraints.
    pub fn objective_for(&self, policy: &ObjectivePolicy) -> (LinearExpr, Sense) {
        self.terms.compose(policy)
    }

    /// Index of the candidate matching a (member, window, start, duration),
    /// if it was generated.
    pub fn find_candidate(
        &self,
        member_id: &str,
        window_id: &str,
        start_min: i64,
        duration_min: i64,
    ) -> Option<usize> {
        self.candidates.iter().position(|c| {
            c.member_id == member_id
                && c.window_id == window_id
                && c.start_min == start_min
                && c.duration_min == duration_min
        })
    }
}

pub(crate) fn class_of(catalog: &ShiftCatalog, duration_min: i64) -> Result<&ShiftClass, BuildError> {
    catalog.get(duration_min).ok_or_else(|| {
        BuildError::Validation(vec![ValidationError::new(
            ValidationErrorKind::UnknownDuration,
            format!("Duration {duration_min} is not in the catalog"),
        )])
    })
}

#[cfg(test)]
mod tests {
    use super::fixtures::{self, ScriptedSolver};
    use super::*;
    use crate::config::{LimitScope, SelectionPolicy};
    use crate::error::BuildLimit;
    use crate::models::{BreakSlot, OffsetRange};
    use crate::solver::{Assignment, ModelViolation, DEFAULT_TOLERANCE};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn relay_config() -> RosterConfig {
        RosterConfig::default().with_selection(SelectionPolicy::NonOverlapping)
    }

    fn labels(violations: &[ModelViolation]) -> Vec<&str> {
        violations.iter().map(|v| v.label.as_str()).collect()
    }

    #[test]
    fn test_relay_plan_is_feasible_and_fully_staffed() {
        let (model, recorded) = fixtures::scenario_with(3, relay_config()).build().unwrap();
        let values = model.complete_assignment(&fixtures::relay_plans(&model)).unwrap();

        let violations = recorded.violations(&values, DEFAULT_TOLERANCE);
        assert!(violations.is_empty(), "{violations:?}");

        assert_eq!(model.samples().len(), 49);
        for sample in model.samples() {
            let on_floor = sample.on_floor.evaluate(&values);
            assert!(on_floor >= 2.0, "{} has {on_floor}", sample.instant_min);
            assert!(on_floor <= 4.0);
            assert_eq!(values.value(sample.slack), 0.0);
        }
        assert_eq!(recorded.objective_value(&values), Some(0.0));
    }

    #[test]
    fn test_selected_periods_partition_shift() {
        let (model, recorded) = fixtures::scenario_builder(3).build().unwrap();
        let plans = fixtures::staggered_break_plans(&model);
        let values = model.complete_assignment(&plans).unwrap();
        assert!(recorded.is_satisfied_by(&values, DEFAULT_TOLERANCE));

        for plan in &plans {
            let candidate = &model.candidates()[plan.candidate];
            let periods = model.periods_of(plan.candidate);
            let spans: f64 = periods
                .iter()
                .map(|p| values.value(p.end) - values.value(p.start))
                .sum();
            assert_eq!(spans, candidate.duration_min as f64);
            assert_eq!(values.value(periods[0].start), candidate.start_min as f64);
            for pair in periods.windows(2) {
                assert_eq!(values.value(pair[0].end), values.value(pair[1].start));
            }
            let breaks: Vec<_> = periods.iter().filter(|p| values.is_true(p.break1)).collect();
            assert_eq!(breaks.len(), 1);
            assert_eq!(values.value(breaks[0].end) - values.value(breaks[0].start), 30.0);
        }
    }

    #[test]
    fn test_unselected_candidate_is_inert() {
        let (model, recorded) = fixtures::scenario_builder(3).build().unwrap();
        let values = model.complete_assignment(&[]).unwrap();
        assert!(recorded.is_satisfied_by(&values, DEFAULT_TOLERANCE));

        let p = model.periods_of(0)[0];
        let mut phantom_work = values.clone();
        phantom_work.set(p.work, 1.0);
        let found = recorded.violations(&phantom_work, DEFAULT_TOLERANCE);
        assert!(labels(&found).contains(&"period.exclusive"));
        assert!(labels(&found).contains(&"period.gate"));

        let mut phantom_span = values.clone();
        phantom_span.set(p.end, 400.0);
        let found = recorded.violations(&phantom_span, DEFAULT_TOLERANCE);
        assert!(labels(&found).contains(&"period.bounds"));

        // no phantom coverage: a cover predicate of an idle period must stay 0
        let link = model.cover_links()[0];
        let mut phantom_cover = values.clone();
        phantom_cover.set(link.cover, 1.0);
        let found = recorded.violations(&phantom_cover, DEFAULT_TOLERANCE);
        assert!(labels(&found).contains(&"cover.work"));
    }

    #[test]
    fn test_break_outside_window_is_flagged() {
        let (model, recorded) = fixtures::scenario_builder(1).build().unwrap();
        let c = model.find_candidate("m1", "day", 360, 480).unwrap();
        // 60 minutes in, the window opens at 240
        let values = model
            .complete_assignment(&[ShiftPlan::new(c).with_break(420)])
            .unwrap();
        let found = recorded.violations(&values, DEFAULT_TOLERANCE);
        assert!(labels(&found).contains(&"break.placement"));
        assert!(!labels(&found).contains(&"period.contiguity"));
    }

    #[test]
    fn test_short_work_block_is_flagged() {
        let catalog = fixtures::scenario_catalog().with_class(
            ShiftClass::new(480)
                .with_breaks(1, 30)
                .with_break_window(BreakSlot::First, OffsetRange::not_before(0))
                .with_work_block(60, Some(300)),
        );
        let avail = fixtures::scenario_availability(1);
        let windows = fixtures::scenario_windows();
        let grid = fixtures::hourly_grid();
        let (model, recorded) = RosterBuilder::new(&avail, &windows, &catalog, &grid)
            .build()
            .unwrap();
        let c = model.find_candidate("m1", "day", 360, 480).unwrap();

        // first work block of 30 minutes, second of 420
        let values = model
            .complete_assignment(&[ShiftPlan::new(c).with_break(390)])
            .unwrap();
        let found = recorded.violations(&values, DEFAULT_TOLERANCE);
        assert_eq!(labels(&found).iter().filter(|l| **l == "work.block").count(), 2);
    }

    #[test]
    fn test_plan_errors() {
        let (model, _) = fixtures::scenario_builder(2).build().unwrap();
        let long = model.find_candidate("m1", "day", 360, 480).unwrap();
        let short = model.find_candidate("m1", "day", 360, 240).unwrap();

        let bad = [
            vec![ShiftPlan::new(model.candidates().len())],
            vec![ShiftPlan::new(long)],
            vec![ShiftPlan::new(short).with_break(400)],
            vec![ShiftPlan::new(long).with_break(830)],
            vec![ShiftPlan::new(short), ShiftPlan::new(short)],
        ];
        for plans in &bad {
            assert!(matches!(
                model.complete_assignment(plans),
                Err(BuildError::InvalidPlan(_))
            ));
        }
    }

    #[test]
    fn test_understaffing_reports_slack() {
        let windows = vec![OpenWindow::new("day", 360, 1080).with_staffing(3, 4)];
        let avail = fixtures::scenario_availability(2);
        let catalog = fixtures::scenario_catalog();
        let grid = fixtures::hourly_grid();
        let (model, recorded) = RosterBuilder::new(&avail, &windows, &catalog, &grid)
            .build()
            .unwrap();

        // two members can never reach three
        let plans: Vec<ShiftPlan> = [("m1", 360), ("m2", 360)]
            .iter()
            .map(|&(m, s)| ShiftPlan::new(model.find_candidate(m, "day", s, 240).unwrap()))
            .collect();
        let values = model.complete_assignment(&plans).unwrap();
        assert!(recorded.is_satisfied_by(&values, DEFAULT_TOLERANCE));

        for sample in model.samples() {
            assert!(values.value(sample.slack) >= 1.0, "silent shortfall at {}", sample.instant_min);
        }
        assert!(recorded.objective_value(&values).unwrap_or(0.0) > 0.0);

        // slack cannot be hidden
        let mut hidden = values.clone();
        hidden.set(model.samples()[0].slack, 0.0);
        let found = recorded.violations(&hidden, DEFAULT_TOLERANCE);
        assert!(labels(&found).contains(&"coverage.min"));
    }

    #[test]
    fn test_selection_policies() {
        let one_per_window = fixtures::scenario_builder(3).build().unwrap().1;
        assert_eq!(one_per_window.count_labeled("member.one_per_window"), 3);
        assert_eq!(one_per_window.count_labeled("member.no_overlap"), 0);

        let one_per_member = fixtures::scenario_with(
            3,
            RosterConfig::default().with_selection(SelectionPolicy::OnePerMember),
        )
        .build()
        .unwrap()
        .1;
        assert_eq!(one_per_member.count_labeled("member.one_shift"), 3);

        let (model, recorded) = fixtures::scenario_with(3, relay_config()).build().unwrap();
        assert!(recorded.count_labeled("member.no_overlap") > 0);
        let a = model.find_candidate("m1", "day", 360, 240).unwrap();
        let b = model.find_candidate("m1", "day", 480, 240).unwrap();
        let values = model
            .complete_assignment(&[ShiftPlan::new(a), ShiftPlan::new(b)])
            .unwrap();
        let found = recorded.violations(&values, DEFAULT_TOLERANCE);
        assert!(labels(&found).contains(&"member.no_overlap"));
    }

    #[test]
    fn test_day_limit_scopes() {
        let avail = vec![AvailabilityInterval::new("m1", 300, 2640)];
        let windows = vec![
            OpenWindow::new("mon", 360, 1080).with_staffing(0, 2),
            OpenWindow::new("tue", 1800, 2520).with_staffing(0, 2),
        ];
        let catalog = fixtures::scenario_catalog();
        let grid = StartTimeGrid::every(60, crate::models::TimeSpan::new(0, 2880));
        let plans = |model: &RosterModel| {
            vec![
                ShiftPlan::new(model.find_candidate("m1", "mon", 360, 480).unwrap()).with_break(600),
                ShiftPlan::new(model.find_candidate("m1", "tue", 1800, 480).unwrap())
                    .with_break(2040),
            ]
        };

        let horizon = RosterBuilder::new(&avail, &windows, &catalog, &grid);
        let (model, recorded) = horizon.build().unwrap();
        let values = model.complete_assignment(&plans(&model)).unwrap();
        let found = recorded.violations(&values, DEFAULT_TOLERANCE);
        assert_eq!(labels(&found), vec!["member.day_limit"]);

        let daily = horizon.with_config(
            RosterConfig::default().with_day_limit(Some(600), LimitScope::Daily),
        );
        let (model, recorded) = daily.build().unwrap();
        assert_eq!(recorded.count_labeled("member.day_limit"), 2);
        let values = model.complete_assignment(&plans(&model)).unwrap();
        assert!(recorded.is_satisfied_by(&values, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_exact_coverage_linkage() {
        let config = relay_config().with_exact_coverage(true);
        let (model, recorded) = fixtures::scenario_with(3, config).build().unwrap();
        assert_eq!(recorded.count_labeled("cover.exact"), model.cover_links().len());
        let values = model.complete_assignment(&fixtures::relay_plans(&model)).unwrap();
        assert!(recorded.is_satisfied_by(&values, DEFAULT_TOLERANCE));

        // m2's shifts touch at 600, so one of its two true predicates can
        // be hidden while m2 stays present
        let hidden_link = m2_cover_at_600(&model, &values);
        let mut hidden = values.clone();
        hidden.set(hidden_link.cover, 0.0);
        let found = recorded.violations(&hidden, DEFAULT_TOLERANCE);
        assert_eq!(labels(&found), vec!["cover.exact"]);

        // without the linkage the same assignment passes
        let (loose_model, loose) = fixtures::scenario_with(3, relay_config()).build().unwrap();
        let mut loose_values = loose_model
            .complete_assignment(&fixtures::relay_plans(&loose_model))
            .unwrap();
        let loose_link = m2_cover_at_600(&loose_model, &loose_values);
        loose_values.set(loose_link.cover, 0.0);
        assert!(loose.is_satisfied_by(&loose_values, DEFAULT_TOLERANCE));
    }

    fn m2_cover_at_600(model: &RosterModel, values: &Assignment) -> CoverLink {
        model
            .cover_links()
            .iter()
            .find(|l| {
                let candidate = model.periods()[l.period].candidate;
                l.instant_min == 600
                    && values.is_true(l.cover)
                    && model.candidates()[candidate].member_id == "m2"
            })
            .copied()
            .unwrap()
    }

    #[test]
    fn test_back_to_back_shifts_count_once() {
        let avail = vec![AvailabilityInterval::new("solo", 300, 1320)];
        let windows = vec![OpenWindow::new("day", 360, 840).with_staffing(2, 4)];
        let catalog = fixtures::scenario_catalog();
        let grid = fixtures::hourly_grid();
        let (model, recorded) = RosterBuilder::new(&avail, &windows, &catalog, &grid)
            .with_config(relay_config())
            .build()
            .unwrap();

        let plans: Vec<ShiftPlan> = [360, 600]
            .iter()
            .map(|&s| ShiftPlan::new(model.find_candidate("solo", "day", s, 240).unwrap()))
            .collect();
        let values = model.complete_assignment(&plans).unwrap();
        assert!(recorded.is_satisfied_by(&values, DEFAULT_TOLERANCE));

        let at_600 = model.samples().iter().find(|s| s.instant_min == 600).unwrap();
        assert_eq!(at_600.on_floor.evaluate(&values), 1.0);
        assert_eq!(values.value(at_600.slack), 1.0);
        assert!(model
            .floor_links()
            .iter()
            .any(|l| l.instant_min == 600 && values.is_true(l.present)));

        // one person cannot be counted twice to close the gap
        let mut doubled = values.clone();
        doubled.set(at_600.slack, 0.0);
        let found = recorded.violations(&doubled, DEFAULT_TOLERANCE);
        assert_eq!(labels(&found), vec!["coverage.min"]);

        let reading = model
            .decode(&values)
            .coverage
            .into_iter()
            .find(|r| r.instant_min == 600)
            .unwrap();
        assert_eq!(reading.on_floor, 1);
        assert_eq!(reading.slack, reading.unfilled());
    }

    #[test]
    fn test_shared_boundary_counts_member_once() {
        let windows = vec![
            OpenWindow::new("am", 360, 720).with_staffing(2, 4),
            OpenWindow::new("pm", 720, 1080).with_staffing(2, 4),
        ];
        let avail = fixtures::scenario_availability(1);
        let catalog = fixtures::scenario_catalog();
        let grid = fixtures::hourly_grid();
        let (model, recorded) = RosterBuilder::new(&avail, &windows, &catalog, &grid)
            .build()
            .unwrap();

        // one shift per window is allowed; they touch at 720
        let plans = vec![
            ShiftPlan::new(model.find_candidate("m1", "am", 480, 240).unwrap()),
            ShiftPlan::new(model.find_candidate("m1", "pm", 720, 240).unwrap()),
        ];
        let values = model.complete_assignment(&plans).unwrap();
        assert!(recorded.is_satisfied_by(&values, DEFAULT_TOLERANCE));

        let at_720: Vec<_> = model.samples().iter().filter(|s| s.instant_min == 720).collect();
        assert_eq!(at_720.len(), 2);
        for sample in at_720 {
            assert_eq!(sample.on_floor.evaluate(&values), 1.0);
            assert_eq!(values.value(sample.slack), 1.0);
        }
    }

    #[test]
    fn test_presence_flag_follows_covers() {
        let config = relay_config().with_exact_coverage(true);
        let (model, recorded) = fixtures::scenario_with(3, config).build().unwrap();
        assert!(recorded.count_labeled("floor.member") > 0);
        assert!(recorded.count_labeled("floor.exact") > 0);

        let values = model.complete_assignment(&fixtures::relay_plans(&model)).unwrap();
        let link = model
            .floor_links()
            .iter()
            .find(|l| values.is_true(l.present))
            .unwrap();

        // a present member cannot be dropped from the count
        let mut dropped = values.clone();
        dropped.set(link.present, 0.0);
        let found = recorded.violations(&dropped, DEFAULT_TOLERANCE);
        assert!(labels(&found).contains(&"floor.exact"));

        // an absent member cannot be added to it
        let mut idle = model.complete_assignment(&[]).unwrap();
        idle.set(model.floor_links()[0].present, 1.0);
        let found = recorded.violations(&idle, DEFAULT_TOLERANCE);
        assert_eq!(labels(&found), vec!["floor.member"]);
    }

    #[test]
    fn test_cover_predicates_are_shared() {
        // two windows sharing the instant 720
        let windows = vec![
            OpenWindow::new("am", 360, 720).with_staffing(1, 4),
            OpenWindow::new("pm", 720, 1080).with_staffing(1, 4),
        ];
        let avail = fixtures::scenario_availability(2);
        let catalog = fixtures::scenario_catalog();
        let grid = fixtures::hourly_grid();
        let (model, _) = RosterBuilder::new(&avail, &windows, &catalog, &grid)
            .build()
            .unwrap();

        let at_720: Vec<_> = model.samples().iter().filter(|s| s.instant_min == 720).collect();
        assert_eq!(at_720.len(), 2);
        let shared: Vec<_> = at_720[0]
            .on_floor
            .terms()
            .iter()
            .filter(|t| at_720[1].on_floor.terms().contains(t))
            .collect();
        assert!(!shared.is_empty());

        let mut pairs: Vec<(usize, i64)> = model
            .cover_links()
            .iter()
            .map(|l| (l.period, l.instant_min))
            .collect();
        let total = pairs.len();
        pairs.sort();
        pairs.dedup();
        assert_eq!(pairs.len(), total);
    }

    #[test]
    fn test_deterministic_rebuild() {
        let builder = fixtures::scenario_builder(3);
        let (a_model, a) = builder.build().unwrap();
        let (b_model, b) = builder.build().unwrap();
        assert_eq!(a, b);
        assert_eq!(a_model, b_model);
    }

    #[test]
    fn test_deterministic_random_instances() {
        let mut rng = StdRng::seed_from_u64(42);
        let catalog = ShiftCatalog::standard();
        let grid = StartTimeGrid::daily_anchors(&[5, 6, 7, 8, 9, 10, 13, 14, 15, 16], 2);
        for _ in 0..5 {
            let avail: Vec<AvailabilityInterval> = (0..rng.random_range(1..6))
                .map(|i| {
                    let start = rng.random_range(0..24) * 60;
                    let len = rng.random_range(4..16) * 60;
                    AvailabilityInterval::new(format!("m{i}"), start, start + len)
                })
                .collect();
            let windows: Vec<OpenWindow> = (0..rng.random_range(1..3))
                .map(|i| {
                    let start = 1440 * i + rng.random_range(4..10) * 60;
                    OpenWindow::new(format!("w{i}"), start, start + 720)
                        .with_staffing(rng.random_range(0..3), 3)
                })
                .collect();

            let builder = RosterBuilder::new(&avail, &windows, &catalog, &grid);
            let (first_model, first) = builder.build().unwrap();
            let (second_model, second) = builder.build().unwrap();
            assert_eq!(first, second);
            let order: Vec<_> = first_model
                .candidates()
                .iter()
                .map(|c| (c.member_index, c.window_index, c.start_min, c.duration_min))
                .collect();
            let mut sorted = order.clone();
            sorted.sort();
            assert_eq!(order, sorted);
            assert_eq!(first_model.candidates(), second_model.candidates());

            // doing nothing is always feasible thanks to slack
            let idle = first_model.complete_assignment(&[]).unwrap();
            assert!(first.is_satisfied_by(&idle, DEFAULT_TOLERANCE));
        }
    }

    #[test]
    fn test_limit_exceeded_emits_nothing() {
        let builder = fixtures::scenario_with(3, RosterConfig::default().with_limits(20, 500_000));
        let mut sink = LinearModel::new();
        let err = builder.build_into(&mut sink).unwrap_err();
        assert!(matches!(
            err,
            BuildError::LimitExceeded {
                limit: BuildLimit::Candidates,
                ..
            }
        ));
        assert_eq!(sink.var_count(), 0);

        let builder = fixtures::scenario_with(3, RosterConfig::default().with_limits(1000, 50));
        let err = builder.build_into(&mut sink).unwrap_err();
        assert!(matches!(
            err,
            BuildError::LimitExceeded {
                limit: BuildLimit::Periods,
                ..
            }
        ));
        assert_eq!(sink.var_count(), 0);
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let windows = vec![OpenWindow::new("day", 1080, 360)];
        let avail = fixtures::scenario_availability(1);
        let catalog = fixtures::scenario_catalog();
        let grid = fixtures::hourly_grid();
        let err = RosterBuilder::new(&avail, &windows, &catalog, &grid)
            .build()
            .unwrap_err();
        match err {
            BuildError::Validation(errors) => {
                assert_eq!(errors[0].kind, ValidationErrorKind::InvalidInterval)
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_objective_recomposition() {
        let (model, recorded) = fixtures::scenario_builder(3).build().unwrap();
        let stored = recorded.objective().cloned();
        assert_eq!(stored, Some(model.objective_for(&ObjectivePolicy::default())));

        let lex = ObjectivePolicy::Lexicographic(vec![
            ObjectiveTerm::UnfilledStaffing,
            ObjectiveTerm::AssignedShifts,
        ]);
        let (expr, sense) = model.objective_for(&lex);
        assert_eq!(sense, Sense::Minimize);
        let terms = model.objective_terms();
        let expected_weight = 1.0 + terms.shifts_bound as f64;
        let first_slack = model.samples()[0].slack;
        assert!(expr
            .terms()
            .iter()
            .any(|&(v, c)| v == first_slack && c == expected_weight));
    }

    #[test]
    fn test_member_flags() {
        let (model, recorded) = fixtures::scenario_builder(3).build().unwrap();
        let plans = fixtures::staggered_break_plans(&model);
        let mut values = model.complete_assignment(&plans[..2]).unwrap();
        let flags = model.member_assigned();
        assert!(values.is_true(flags[0]));
        assert!(values.is_true(flags[1]));
        assert!(!values.is_true(flags[2]));
        assert_eq!(model.objective_terms().members.evaluate(&values), 2.0);

        values.set(flags[2], 1.0);
        let found = recorded.violations(&values, DEFAULT_TOLERANCE);
        assert_eq!(labels(&found), vec!["member.assigned"]);
    }

    #[test]
    fn test_solve_optimal() {
        let builder = fixtures::scenario_with(3, relay_config());
        let (model, _) = builder.build().unwrap();
        let values = model.complete_assignment(&fixtures::relay_plans(&model)).unwrap();

        let mut solver = ScriptedSolver::new(SolveOutcome::Optimal(values));
        let outcome = builder
            .solve(&mut solver, Some(Duration::from_secs(30)))
            .unwrap();
        assert_eq!(solver.deadline, Some(Duration::from_secs(30)));
        match outcome {
            RosterOutcome::Solved {
                roster,
                proven_optimal,
            } => {
                assert!(proven_optimal);
                assert_eq!(roster.shift_count(), 6);
                assert!(roster.is_fully_staffed());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_solve_infeasible_and_timeout() {
        let builder = fixtures::scenario_builder(3);

        let mut solver = ScriptedSolver::new(SolveOutcome::Infeasible);
        assert_eq!(builder.solve(&mut solver, None).unwrap(), RosterOutcome::Infeasible);
        assert!(solver.recorded.var_count() > 0);

        let mut solver = ScriptedSolver::new(SolveOutcome::TimedOut(None));
        assert_eq!(
            builder.solve(&mut solver, None).unwrap(),
            RosterOutcome::TimedOut { incumbent: None }
        );

        let mut solver = ScriptedSolver::new(SolveOutcome::TimedOut(Some(Assignment::default())));
        match builder.solve(&mut solver, None).unwrap() {
            RosterOutcome::TimedOut {
                incumbent: Some(roster),
            } => assert_eq!(roster.shift_count(), 0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_solver_failure_is_error() {
        let builder = fixtures::scenario_builder(3);
        let mut solver = ScriptedSolver::failing("out of memory");
        let err = builder.solve(&mut solver, None).unwrap_err();
        assert!(matches!(err, RosterError::Solver(_)));
    }
}
