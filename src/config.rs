//! Build configuration.
//!
//! Every field has a default matching the reference deployment: 15-minute
//! sampling including the window end, a 10-hour limit per member over the
//! horizon, at most one shift per member and window, and an objective that
//! minimizes unfilled staffing.

use serde::{Deserialize, Serialize};

use crate::builder::ObjectivePolicy;

/// Coverage sampling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Distance between sampled instants (minutes).
    pub granularity_min: i64,
    /// Whether the window end itself is sampled.
    pub include_window_end: bool,
    /// Force cover predicates to 1 whenever a work period contains the
    /// instant, not only to 0 when it does not.
    pub exact_coverage: bool,
    /// Separation used by the exact linkage ("strictly after" becomes
    /// "at least `resolution_min` after").
    pub resolution_min: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            granularity_min: 15,
            include_window_end: true,
            exact_coverage: false,
            resolution_min: 1.0,
        }
    }
}

/// Scope of the per-member duration limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitScope {
    /// One limit over the whole horizon.
    #[default]
    Horizon,
    /// One limit per calendar day of the shift start.
    Daily,
}

/// Which candidates of a member may be selected together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionPolicy {
    /// At most one shift per member over the horizon.
    OnePerMember,
    /// At most one shift per member and open window.
    #[default]
    OnePerMemberWindow,
    /// Any number of shifts per member as long as none overlap.
    NonOverlapping,
}

/// Hard caps on build size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildLimits {
    /// Upper bound on enumerated shift candidates.
    pub max_candidates: usize,
    /// Upper bound on decomposed periods.
    pub max_periods: usize,
}

impl Default for BuildLimits {
    fn default() -> Self {
        Self {
            max_candidates: 100_000,
            max_periods: 500_000,
        }
    }
}

/// Rostering build configuration.
///
/// # Example
/// ```
/// use u_roster::config::{RosterConfig, SelectionPolicy};
///
/// let config = RosterConfig::default()
///     .with_granularity(30)
///     .with_selection(SelectionPolicy::NonOverlapping);
/// assert_eq!(config.sampling.granularity_min, 30);
/// assert_eq!(config.day_limit_min, Some(600));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Coverage sampling.
    pub sampling: SamplingConfig,
    /// Maximum rostered minutes per member. `None` disables the limit.
    pub day_limit_min: Option<i64>,
    /// What the limit is counted over.
    pub day_limit_scope: LimitScope,
    /// Selection policy.
    pub selection: SelectionPolicy,
    /// Build caps.
    pub limits: BuildLimits,
    /// Objective composition.
    pub objective: ObjectivePolicy,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            sampling: SamplingConfig::default(),
            day_limit_min: Some(600),
            day_limit_scope: LimitScope::Horizon,
            selection: SelectionPolicy::default(),
            limits: BuildLimits::default(),
            objective: ObjectivePolicy::default(),
        }
    }
}

impl RosterConfig {
    /// Sets the sampling granularity (minutes).
    pub fn with_granularity(mut self, granularity_min: i64) -> Self {
        self.sampling.granularity_min = granularity_min;
        self
    }

    /// Replaces the sampling settings.
    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    /// Enables or disables exact coverage linkage.
    pub fn with_exact_coverage(mut self, exact: bool) -> Self {
        self.sampling.exact_coverage = exact;
        self
    }

    /// Sets the per-member limit and its scope.
    pub fn with_day_limit(mut self, limit_min: Option<i64>, scope: LimitScope) -> Self {
        self.day_limit_min = limit_min;
        self.day_limit_scope = scope;
        self
    }

    /// Sets the selection policy.
    pub fn with_selection(mut self, selection: SelectionPolicy) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the build caps.
    pub fn with_limits(mut self, max_candidates: usize, max_periods: usize) -> Self {
        self.limits = BuildLimits {
            max_candidates,
            max_periods,
        };
        self
    }

    /// Sets the objective policy.
    pub fn with_objective(mut self, objective: ObjectivePolicy) -> Self {
        self.objective = objective;
        self
    }
}
