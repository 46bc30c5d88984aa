//! Period decomposition.
//!
//! Every candidate gets `period_count` periods, each with continuous
//! start/end variables and work/break1/break2 booleans. Geometry is left
//! entirely to the structural constraints.

use tracing::debug;

use super::{class_of, RosterModel};
use crate::config::BuildLimits;
use crate::error::{BuildError, BuildLimit};
use crate::models::{Period, ShiftCatalog};
use crate::solver::ModelSink;

/// Total periods the given durations decompose into, or
/// [`BuildError::LimitExceeded`] if that exceeds the cap.
pub(crate) fn check_period_cap(
    catalog: &ShiftCatalog,
    durations: impl IntoIterator<Item = i64>,
    limits: &BuildLimits,
) -> Result<usize, BuildError> {
    let mut total = 0usize;
    for duration in durations {
        total = total.saturating_add(class_of(catalog, duration)?.period_count);
    }
    if total > limits.max_periods {
        return Err(BuildError::LimitExceeded {
            limit: BuildLimit::Periods,
            actual: total,
            max: limits.max_periods,
        });
    }
    Ok(total)
}

/// Creates the periods of every candidate in candidate order.
pub(crate) fn decompose<S: ModelSink + ?Sized>(
    catalog: &ShiftCatalog,
    model: &mut RosterModel,
    sink: &mut S,
) -> Result<(), BuildError> {
    for index in 0..model.candidates.len() {
        let candidate = &model.candidates[index];
        let count = class_of(catalog, candidate.duration_min)?.period_count;
        let lb = candidate.start_min.min(0) as f64;
        let ub = candidate.end_min.max(0) as f64;

        let first = model.periods.len();
        for ordinal in 0..count {
            let period = Period {
                candidate: index,
                ordinal,
                start: sink.declare_continuous(&format!("c{index}.p{ordinal}.start"), lb, ub),
                end: sink.declare_continuous(&format!("c{index}.p{ordinal}.end"), lb, ub),
                work: sink.declare_boolean(&format!("c{index}.p{ordinal}.work")),
                break1: sink.declare_boolean(&format!("c{index}.p{ordinal}.break1")),
                break2: sink.declare_boolean(&format!("c{index}.p{ordinal}.break2")),
            };
            model.periods.push(period);
        }
        model.candidates[index].periods = first..model.periods.len();
    }

    debug!(periods = model.periods.len(), "decomposed candidates into periods");
    Ok(())
}
