//! In-memory recording model.

use super::{Assignment, LinearConstraint, LinearExpr, ModelSink, Sense, VarKind, VarRef};

/// Default feasibility tolerance used by [`LinearModel::violations`] callers.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// A declared variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    /// Human-readable name.
    pub label: String,
    /// Domain.
    pub kind: VarKind,
}

/// "if `indicator == active_on` then `constraint`".
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConstraint {
    /// Controlling boolean.
    pub indicator: VarRef,
    /// Value of `indicator` that activates the constraint.
    pub active_on: bool,
    /// Conditional constraint.
    pub constraint: LinearConstraint,
}

/// Classification of assignment violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelViolationKind {
    /// Value outside the declared bounds.
    Bound,
    /// Fractional value on an integral variable.
    Integrality,
    /// Unconditional linear constraint broken.
    Linear,
    /// Active indicator constraint broken.
    Indicator,
}

/// A constraint or domain broken by an assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelViolation {
    /// What was broken.
    pub kind: ModelViolationKind,
    /// Variable index (bound/integrality) or constraint index within its list.
    pub index: usize,
    /// Variable label or constraint family label.
    pub label: String,
    /// Amount by which the check failed.
    pub excess: f64,
}

/// Records a model in declaration order.
///
/// Two builds from identical input produce equal `LinearModel`s, which is
/// what determinism tests compare.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearModel {
    vars: Vec<VarDecl>,
    linear: Vec<LinearConstraint>,
    indicators: Vec<IndicatorConstraint>,
    objective: Option<(LinearExpr, Sense)>,
}

impl LinearModel {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declared variables.
    pub fn vars(&self) -> &[VarDecl] {
        &self.vars
    }

    /// Declaration of one variable.
    pub fn var(&self, var: VarRef) -> Option<&VarDecl> {
        self.vars.get(var.index())
    }

    /// Number of declared variables.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Number of declared variables of a given domain shape.
    pub fn count_vars(&self, pred: impl Fn(&VarKind) -> bool) -> usize {
        self.vars.iter().filter(|d| pred(&d.kind)).count()
    }

    /// Number of boolean variables.
    pub fn boolean_count(&self) -> usize {
        self.count_vars(|k| matches!(k, VarKind::Boolean))
    }

    /// Unconditional constraints.
    pub fn linear_constraints(&self) -> &[LinearConstraint] {
        &self.linear
    }

    /// Indicator constraints.
    pub fn indicator_constraints(&self) -> &[IndicatorConstraint] {
        &self.indicators
    }

    /// Total number of constraints (linear + indicator).
    pub fn constraint_count(&self) -> usize {
        self.linear.len() + self.indicators.len()
    }

    /// Number of constraints (of both kinds) carrying `label`.
    pub fn count_labeled(&self, label: &str) -> usize {
        self.linear.iter().filter(|c| c.label == label).count()
            + self
                .indicators
                .iter()
                .filter(|i| i.constraint.label == label)
                .count()
    }

    /// The objective, if set.
    pub fn objective(&self) -> Option<&(LinearExpr, Sense)> {
        self.objective.as_ref()
    }

    /// Objective value under an assignment.
    pub fn objective_value(&self, values: &Assignment) -> Option<f64> {
        self.objective.as_ref().map(|(e, _)| e.evaluate(values))
    }

    /// Re-emits the whole model into another sink.
    ///
    /// Returns the sink-side handle for each recorded variable, indexed by
    /// the recorded handle.
    pub fn replay_into<S: ModelSink + ?Sized>(&self, sink: &mut S) -> Vec<VarRef> {
        let map: Vec<VarRef> = self
            .vars
            .iter()
            .map(|d| match d.kind {
                VarKind::Boolean => sink.declare_boolean(&d.label),
                VarKind::Integer { lb, ub } => sink.declare_integer(&d.label, lb, ub),
                VarKind::Continuous { lb, ub } => sink.declare_continuous(&d.label, lb, ub),
            })
            .collect();
        for c in &self.linear {
            sink.add_linear(c.remap(&map));
        }
        for ind in &self.indicators {
            let indicator = map
                .get(ind.indicator.index())
                .copied()
                .unwrap_or(ind.indicator);
            sink.add_indicator(indicator, ind.constraint.remap(&map), ind.active_on);
        }
        if let Some((expr, sense)) = &self.objective {
            sink.set_objective(expr.remap(&map), *sense);
        }
        map
    }

    /// Every domain and constraint broken by `values`.
    ///
    /// Checks variable bounds, integrality, linear rows and active
    /// indicator rows, each within `tolerance`.
    pub fn violations(&self, values: &Assignment, tolerance: f64) -> Vec<ModelViolation> {
        let mut out = Vec::new();

        for (i, decl) in self.vars.iter().enumerate() {
            let x = values.value(VarRef::new(i));
            let (lb, ub) = decl.kind.bounds();
            let outside = (lb - x).max(x - ub);
            if outside > tolerance {
                out.push(ModelViolation {
                    kind: ModelViolationKind::Bound,
                    index: i,
                    label: decl.label.clone(),
                    excess: outside,
                });
            }
            let frac = (x - x.round()).abs();
            if decl.kind.is_integral() && frac > tolerance {
                out.push(ModelViolation {
                    kind: ModelViolationKind::Integrality,
                    index: i,
                    label: decl.label.clone(),
                    excess: frac,
                });
            }
        }

        for (i, c) in self.linear.iter().enumerate() {
            let excess = c.excess(values);
            if excess > tolerance {
                out.push(ModelViolation {
                    kind: ModelViolationKind::Linear,
                    index: i,
                    label: c.label.to_string(),
                    excess,
                });
            }
        }

        for (i, ind) in self.indicators.iter().enumerate() {
            if values.is_true(ind.indicator) != ind.active_on {
                continue;
            }
            let excess = ind.constraint.excess(values);
            if excess > tolerance {
                out.push(ModelViolation {
                    kind: ModelViolationKind::Indicator,
                    index: i,
                    label: ind.constraint.label.to_string(),
                    excess,
                });
            }
        }

        out
    }

    /// Whether `values` satisfies every domain and constraint.
    pub fn is_satisfied_by(&self, values: &Assignment, tolerance: f64) -> bool {
        self.violations(values, tolerance).is_empty()
    }

    fn declare(&mut self, label: &str, kind: VarKind) -> VarRef {
        let var = VarRef::new(self.vars.len());
        self.vars.push(VarDecl {
            label: label.to_string(),
            kind,
        });
        var
    }
}

impl ModelSink for LinearModel {
    fn declare_boolean(&mut self, label: &str) -> VarRef {
        self.declare(label, VarKind::Boolean)
    }

    fn declare_integer(&mut self, label: &str, lb: i64, ub: i64) -> VarRef {
        self.declare(label, VarKind::Integer { lb, ub })
    }

    fn declare_continuous(&mut self, label: &str, lb: f64, ub: f64) -> VarRef {
        self.declare(label, VarKind::Continuous { lb, ub })
    }

    fn add_linear(&mut self, constraint: LinearConstraint) {
        self.linear.push(constraint);
    }

    fn add_indicator(&mut self, indicator: VarRef, constraint: LinearConstraint, active_on: bool) {
        self.indicators.push(IndicatorConstraint {
            indicator,
            active_on,
            constraint,
        });
    }

    fn set_objective(&mut self, expr: LinearExpr, sense: Sense) {
        self.objective = Some((expr, sense));
    }
}
