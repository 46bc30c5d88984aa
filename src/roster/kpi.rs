//! Roster quality metrics (KPIs).
//!
//! Computes staffing indicators from a decoded roster.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total Shifts | Number of rostered shifts |
//! | Assigned Members | Members holding at least one shift |
//! | Rostered Minutes | Sum of shift lengths |
//! | Break Minutes | Sum of break lengths |
//! | Total Unfilled | Sum over samples of max(0, min - on floor) |
//! | Worst Shortfall | Largest single-sample shortfall |
//! | Staffed Rate | Fraction of samples meeting the minimum |
//! | Overstaffed Samples | Samples above the maximum |

use super::Roster;

/// Roster performance indicators.
///
/// All time values are in minutes.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterKpi {
    /// Number of rostered shifts.
    pub total_shifts: usize,
    /// Members holding at least one shift.
    pub assigned_members: usize,
    /// Sum of shift lengths (minutes).
    pub rostered_min: i64,
    /// Sum of break lengths (minutes).
    pub break_min: i64,
    /// Sum of per-sample shortfalls (member-samples).
    pub total_unfilled: i64,
    /// Largest shortfall at any sample.
    pub worst_shortfall: i32,
    /// Fraction of samples meeting their minimum (0.0..1.0).
    pub staffed_rate: f64,
    /// Samples whose headcount exceeds the maximum.
    pub overstaffed_samples: usize,
}

impl RosterKpi {
    /// Computes KPIs from a decoded roster.
    pub fn calculate(roster: &Roster) -> Self {
        let rostered_min = roster.shifts.iter().map(|s| s.duration_min()).sum();
        let break_min = roster.shifts.iter().map(|s| s.break_minutes()).sum();

        let mut total_unfilled: i64 = 0;
        let mut worst_shortfall: i32 = 0;
        let mut staffed: usize = 0;
        let mut overstaffed_samples: usize = 0;
        for reading in &roster.coverage {
            let unfilled = reading.unfilled();
            total_unfilled += unfilled as i64;
            worst_shortfall = worst_shortfall.max(unfilled);
            if unfilled == 0 {
                staffed += 1;
            }
            if reading.is_overstaffed() {
                overstaffed_samples += 1;
            }
        }

        // No samples → nothing to miss
        let staffed_rate = if roster.coverage.is_empty() {
            1.0
        } else {
            staffed as f64 / roster.coverage.len() as f64
        };

        Self {
            total_shifts: roster.shifts.len(),
            assigned_members: roster.assigned_members().len(),
            rostered_min,
            break_min,
            total_unfilled,
            worst_shortfall,
            staffed_rate,
            overstaffed_samples,
        }
    }
}
