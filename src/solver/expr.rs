//! Variable handles, linear expressions and linear constraints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

use super::Assignment;

/// Handle to a variable declared on a [`ModelSink`](super::ModelSink).
///
/// Handles are dense indices handed out by the sink in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarRef(usize);

impl VarRef {
    /// Wraps a sink-side index.
    #[inline]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// The sink-side index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// `Σ coef·var + constant`.
///
/// Terms keep insertion order so that two identical builds emit identical
/// expressions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VarRef, f64)>,
    constant: f64,
}

impl LinearExpr {
    /// The empty expression (value 0).
    pub fn new() -> Self {
        Self::default()
    }

    /// A constant expression.
    pub fn constant(value: f64) -> Self {
        Self {
            terms: Vec::new(),
            constant: value,
        }
    }

    /// `1·var`.
    pub fn var(var: VarRef) -> Self {
        Self::term(var, 1.0)
    }

    /// `coef·var`.
    pub fn term(var: VarRef, coef: f64) -> Self {
        Self {
            terms: vec![(var, coef)],
            constant: 0.0,
        }
    }

    /// `Σ var` over the given variables.
    pub fn sum_of(vars: impl IntoIterator<Item = VarRef>) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
            constant: 0.0,
        }
    }

    /// Appends `coef·var`.
    pub fn add_term(&mut self, var: VarRef, coef: f64) {
        self.terms.push((var, coef));
    }

    /// Builder form of [`add_term`](Self::add_term).
    pub fn with_term(mut self, var: VarRef, coef: f64) -> Self {
        self.add_term(var, coef);
        self
    }

    /// Variable terms in insertion order.
    pub fn terms(&self) -> &[(VarRef, f64)] {
        &self.terms
    }

    /// Constant part.
    pub fn offset(&self) -> f64 {
        self.constant
    }

    /// Whether the expression has no variable terms.
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// Value under an assignment. Unset variables read as 0.
    pub fn evaluate(&self, values: &Assignment) -> f64 {
        self.terms
            .iter()
            .map(|(v, c)| c * values.value(*v))
            .sum::<f64>()
            + self.constant
    }

    /// Rewrites every variable through `map[var.index()]`.
    ///
    /// Variables outside `map` are kept as-is.
    pub fn remap(&self, map: &[VarRef]) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .map(|(v, c)| (map.get(v.index()).copied().unwrap_or(*v), *c))
                .collect(),
            constant: self.constant,
        }
    }

    /// `self <= rhs`.
    pub fn at_most(self, rhs: f64) -> LinearConstraint {
        LinearConstraint::new(self, Comparator::Le, rhs)
    }

    /// `self >= rhs`.
    pub fn at_least(self, rhs: f64) -> LinearConstraint {
        LinearConstraint::new(self, Comparator::Ge, rhs)
    }

    /// `self == rhs`.
    pub fn equals(self, rhs: f64) -> LinearConstraint {
        LinearConstraint::new(self, Comparator::Eq, rhs)
    }
}

impl From<VarRef> for LinearExpr {
    fn from(var: VarRef) -> Self {
        Self::var(var)
    }
}

impl AddAssign for LinearExpr {
    fn add_assign(&mut self, rhs: Self) {
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
    }
}

impl Add for LinearExpr {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl Sub for LinearExpr {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self.terms
            .extend(rhs.terms.into_iter().map(|(v, c)| (v, -c)));
        self.constant -= rhs.constant;
        self
    }
}

impl Mul<f64> for LinearExpr {
    type Output = Self;

    fn mul(mut self, k: f64) -> Self {
        for (_, c) in &mut self.terms {
            *c *= k;
        }
        self.constant *= k;
        self
    }
}

impl Sum for LinearExpr {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::new(), |acc, e| acc + e)
    }
}

/// Relation between the left and right side of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// `==`
    Eq,
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Comparator::Le => "<=",
            Comparator::Ge => ">=",
            Comparator::Eq => "==",
        })
    }
}

/// `expr (<=|>=|==) rhs`.
///
/// The constant part of `expr` is folded into `rhs` on construction, so
/// `expr.offset()` is always 0.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    /// Variable side.
    pub expr: LinearExpr,
    /// Relation.
    pub cmp: Comparator,
    /// Constant side.
    pub rhs: f64,
    /// Family name used in diagnostics (e.g. `"period.contiguity"`).
    pub label: &'static str,
}

impl LinearConstraint {
    /// Creates a constraint, folding the expression constant into `rhs`.
    pub fn new(mut expr: LinearExpr, cmp: Comparator, rhs: f64) -> Self {
        let rhs = rhs - expr.constant;
        expr.constant = 0.0;
        Self {
            expr,
            cmp,
            rhs,
            label: "",
        }
    }

    /// Attaches a diagnostic label.
    pub fn labeled(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    /// How far the constraint is from holding under `values` (0 if it holds).
    pub fn excess(&self, values: &Assignment) -> f64 {
        let lhs = self.expr.evaluate(values);
        match self.cmp {
            Comparator::Le => (lhs - self.rhs).max(0.0),
            Comparator::Ge => (self.rhs - lhs).max(0.0),
            Comparator::Eq => (lhs - self.rhs).abs(),
        }
    }

    /// Whether the constraint holds within `tolerance`.
    pub fn is_satisfied(&self, values: &Assignment, tolerance: f64) -> bool {
        self.excess(values) <= tolerance
    }

    /// Rewrites variables; see [`LinearExpr::remap`].
    pub fn remap(&self, map: &[VarRef]) -> Self {
        Self {
            expr: self.expr.remap(map),
            cmp: self.cmp,
            rhs: self.rhs,
            label: self.label,
        }
    }
}

impl fmt::Display for LinearConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (v, c)) in self.expr.terms().iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{c}*{v}")?;
        }
        if self.expr.is_constant() {
            f.write_str("0")?;
        }
        write!(f, " {} {}", self.cmp, self.rhs)
    }
}
