//! Shared test inputs.
//!
//! The reference scenario: members available `[300, 1320)`, one open
//! window `[360, 1080)` needing 2 to 4 people, a 4 h break-free class and
//! an 8 h class with one 30-minute break taken 4 to 6 hours in.

use std::sync::OnceLock;
use std::time::Duration;

use super::{RosterBuilder, RosterModel, ShiftPlan};
use crate::config::RosterConfig;
use crate::error::SolverError;
use crate::models::{
    AvailabilityInterval, BreakSlot, OffsetRange, OpenWindow, ShiftCatalog, ShiftClass,
    StartTimeGrid, TimeSpan,
};
use crate::solver::{
    LinearConstraint, LinearExpr, LinearModel, ModelSink, Sense, SolveOutcome, SolverAdapter,
    VarRef,
};

pub(crate) const MEMBERS: [&str; 4] = ["m1", "m2", "m3", "m4"];

pub(crate) fn scenario_catalog() -> ShiftCatalog {
    ShiftCatalog::new()
        .with_class(ShiftClass::new(240))
        .with_class(
            ShiftClass::new(480)
                .with_breaks(1, 30)
                .with_break_window(BreakSlot::First, OffsetRange::between(240, 360))
                .with_work_block(60, None),
        )
}

pub(crate) fn hourly_grid() -> StartTimeGrid {
    StartTimeGrid::every(60, TimeSpan::new(0, 1440))
}

pub(crate) fn scenario_availability(members: usize) -> Vec<AvailabilityInterval> {
    MEMBERS
        .iter()
        .take(members)
        .map(|m| AvailabilityInterval::new(*m, 300, 1320))
        .collect()
}

pub(crate) fn scenario_windows() -> Vec<OpenWindow> {
    vec![OpenWindow::new("day", 360, 1080).with_staffing(2, 4)]
}

struct Inputs {
    availability: Vec<Vec<AvailabilityInterval>>,
    windows: Vec<OpenWindow>,
    catalog: ShiftCatalog,
    grid: StartTimeGrid,
}

fn inputs() -> &'static Inputs {
    static INPUTS: OnceLock<Inputs> = OnceLock::new();
    INPUTS.get_or_init(|| Inputs {
        availability: (0..=MEMBERS.len()).map(scenario_availability).collect(),
        windows: scenario_windows(),
        catalog: scenario_catalog(),
        grid: hourly_grid(),
    })
}

/// Scenario builder over the first `members` members, default config.
pub(crate) fn scenario_builder(members: usize) -> RosterBuilder<'static> {
    let inputs = inputs();
    RosterBuilder::new(
        &inputs.availability[members],
        &inputs.windows,
        &inputs.catalog,
        &inputs.grid,
    )
}

/// Scenario builder with a custom config.
pub(crate) fn scenario_with(members: usize, config: RosterConfig) -> RosterBuilder<'static> {
    scenario_builder(members).with_config(config)
}

fn candidate(model: &RosterModel, member: &str, start: i64, duration: i64) -> usize {
    model
        .find_candidate(member, "day", start, duration)
        .unwrap_or_else(|| panic!("no candidate {member}@{start}+{duration}"))
}

/// Three 8 h shifts from 360 with breaks at 600, 630 and 660.
pub(crate) fn staggered_break_plans(model: &RosterModel) -> Vec<ShiftPlan> {
    ["m1", "m2", "m3"]
        .iter()
        .zip([600, 630, 660])
        .map(|(m, b)| ShiftPlan::new(candidate(model, m, 360, 480)).with_break(b))
        .collect()
}

/// Two staggered chains of 4 h shifts covering `[360, 1080]` with two
/// members at every instant; each member works two shifts (480 min).
pub(crate) fn relay_plans(model: &RosterModel) -> Vec<ShiftPlan> {
    [
        ("m1", 360),
        ("m2", 600),
        ("m3", 840),
        ("m2", 360),
        ("m3", 600),
        ("m1", 840),
    ]
    .iter()
    .map(|&(m, s)| ShiftPlan::new(candidate(model, m, s, 240)))
    .collect()
}

/// A sink that records the model and answers `solve` with a fixed outcome.
pub(crate) struct ScriptedSolver {
    pub recorded: LinearModel,
    pub outcome: Result<SolveOutcome, String>,
    pub deadline: Option<Duration>,
}

impl ScriptedSolver {
    pub(crate) fn new(outcome: SolveOutcome) -> Self {
        Self {
            recorded: LinearModel::new(),
            outcome: Ok(outcome),
            deadline: None,
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            recorded: LinearModel::new(),
            outcome: Err(message.to_string()),
            deadline: None,
        }
    }
}

impl ModelSink for ScriptedSolver {
    fn declare_boolean(&mut self, label: &str) -> VarRef {
        self.recorded.declare_boolean(label)
    }

    fn declare_integer(&mut self, label: &str, lb: i64, ub: i64) -> VarRef {
        self.recorded.declare_integer(label, lb, ub)
    }

    fn declare_continuous(&mut self, label: &str, lb: f64, ub: f64) -> VarRef {
        self.recorded.declare_continuous(label, lb, ub)
    }

    fn add_linear(&mut self, constraint: LinearConstraint) {
        self.recorded.add_linear(constraint);
    }

    fn add_indicator(&mut self, indicator: VarRef, constraint: LinearConstraint, active_on: bool) {
        self.recorded.add_indicator(indicator, constraint, active_on);
    }

    fn set_objective(&mut self, expr: LinearExpr, sense: Sense) {
        self.recorded.set_objective(expr, sense);
    }
}

impl SolverAdapter for ScriptedSolver {
    fn solve(&mut self, deadline: Option<Duration>) -> Result<SolveOutcome, SolverError> {
        self.deadline = deadline;
        self.outcome.clone().map_err(SolverError::Backend)
    }
}
