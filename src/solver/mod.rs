//! Generic mixed-integer model surface.
//!
//! The rostering builder never solves anything itself. It declares
//! variables and constraints on a [`ModelSink`] and hands the finished
//! model to a [`SolverAdapter`], which wraps whatever MIP/CP engine the
//! consumer uses.
//!
//! [`LinearModel`] is an in-memory sink: it records the model so it can be
//! inspected, compared between builds, checked against an assignment, or
//! replayed into a real backend later.

mod expr;
mod linear_model;

pub use expr::{Comparator, LinearConstraint, LinearExpr, VarRef};
pub use linear_model::{
    IndicatorConstraint, LinearModel, ModelViolation, ModelViolationKind, VarDecl,
    DEFAULT_TOLERANCE,
};

use std::time::Duration;

use crate::error::SolverError;

/// Domain of a declared variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VarKind {
    /// 0/1 variable.
    Boolean,
    /// Integer in `[lb, ub]`.
    Integer { lb: i64, ub: i64 },
    /// Real in `[lb, ub]`.
    Continuous { lb: f64, ub: f64 },
}

impl VarKind {
    /// Lower and upper bound as reals.
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            VarKind::Boolean => (0.0, 1.0),
            VarKind::Integer { lb, ub } => (lb as f64, ub as f64),
            VarKind::Continuous { lb, ub } => (lb, ub),
        }
    }

    /// Whether values must be integral.
    pub fn is_integral(&self) -> bool {
        !matches!(self, VarKind::Continuous { .. })
    }
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// Concrete values for declared variables, indexed by [`VarRef`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    values: Vec<f64>,
}

impl Assignment {
    /// Wraps a dense value vector (`values[v.index()]`).
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// `len` zero-valued variables.
    pub fn zeros(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }

    /// Value of a variable, if set.
    pub fn get(&self, var: VarRef) -> Option<f64> {
        self.values.get(var.index()).copied()
    }

    /// Value of a variable; unset variables read as 0.
    #[inline]
    pub fn value(&self, var: VarRef) -> f64 {
        self.get(var).unwrap_or(0.0)
    }

    /// Whether a boolean variable is set to 1.
    #[inline]
    pub fn is_true(&self, var: VarRef) -> bool {
        self.value(var) > 0.5
    }

    /// Sets a variable, growing the vector as needed.
    pub fn set(&mut self, var: VarRef, value: f64) {
        if var.index() >= self.values.len() {
            self.values.resize(var.index() + 1, 0.0);
        }
        self.values[var.index()] = value;
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no values are stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stored values in index order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Result of a solve call.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// Proven optimal assignment.
    Optimal(Assignment),
    /// Feasible assignment returned without an optimality proof (e.g. a
    /// gap limit stopped the search).
    Feasible(Assignment),
    /// No assignment satisfies the model.
    Infeasible,
    /// Deadline hit before optimality or infeasibility was proven. Carries
    /// the best incumbent if the backend exposes one.
    TimedOut(Option<Assignment>),
}

impl SolveOutcome {
    /// The returned assignment, if any.
    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            SolveOutcome::Optimal(a)
            | SolveOutcome::Feasible(a)
            | SolveOutcome::TimedOut(Some(a)) => Some(a),
            SolveOutcome::Infeasible | SolveOutcome::TimedOut(None) => None,
        }
    }

    /// Short status name for logs.
    pub fn status(&self) -> &'static str {
        match self {
            SolveOutcome::Optimal(_) => "optimal",
            SolveOutcome::Feasible(_) => "feasible",
            SolveOutcome::Infeasible => "infeasible",
            SolveOutcome::TimedOut(_) => "timed_out",
        }
    }
}

/// Receives variable declarations, constraints and the objective.
///
/// Implementations must hand out [`VarRef`]s densely in declaration order.
pub trait ModelSink {
    /// Declares a 0/1 variable.
    fn declare_boolean(&mut self, label: &str) -> VarRef;

    /// Declares an integer variable in `[lb, ub]`.
    fn declare_integer(&mut self, label: &str, lb: i64, ub: i64) -> VarRef;

    /// Declares a real variable in `[lb, ub]`.
    fn declare_continuous(&mut self, label: &str, lb: f64, ub: f64) -> VarRef;

    /// Adds `expr (<=|>=|==) rhs`.
    fn add_linear(&mut self, constraint: LinearConstraint);

    /// Adds "if `indicator == active_on` then `constraint` holds".
    fn add_indicator(&mut self, indicator: VarRef, constraint: LinearConstraint, active_on: bool);

    /// Replaces the objective.
    fn set_objective(&mut self, expr: LinearExpr, sense: Sense);
}

/// A sink that can also solve what it received.
pub trait SolverAdapter: ModelSink {
    /// Solves the model, optionally bounded by a wall-clock deadline.
    ///
    /// Infeasibility and timeouts are outcomes; `Err` is reserved for
    /// backend failures.
    fn solve(&mut self, deadline: Option<Duration>) -> Result<SolveOutcome, SolverError>;
}
