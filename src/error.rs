//! Error types.
//!
//! Build-phase problems (bad input, runaway candidate counts, bad plans)
//! are [`BuildError`]s. A crashing solver backend is a [`SolverError`].
//! Infeasibility and solver timeouts are *not* errors; they are reported
//! through [`RosterOutcome`](crate::roster::RosterOutcome).

use thiserror::Error;

use crate::validation::ValidationError;

/// Which build cap was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildLimit {
    /// Shift candidates (or the members × windows × grid × durations bound).
    Candidates,
    /// Work/break periods across all candidates.
    Periods,
}

impl std::fmt::Display for BuildLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            BuildLimit::Candidates => "candidate",
            BuildLimit::Periods => "period",
        })
    }
}

/// Fatal model-build failure.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Input failed validation; every detected problem is listed.
    #[error("invalid rostering input ({} problem(s)): {}", .0.len(), summarize(.0))]
    Validation(Vec<ValidationError>),

    /// A build cap was exceeded; narrow the input and retry.
    #[error("{limit} limit exceeded: {actual} > {max}")]
    LimitExceeded {
        limit: BuildLimit,
        actual: usize,
        max: usize,
    },

    /// A shift plan does not describe a realizable roster.
    #[error("invalid shift plan: {0}")]
    InvalidPlan(String),
}

/// Failure inside the external solver backend.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The backend reported an error unrelated to feasibility.
    #[error("solver backend failure: {0}")]
    Backend(String),
}

/// Any failure of a build-and-solve run.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Solver(#[from] SolverError),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
