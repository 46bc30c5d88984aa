//! Coverage sampling.
//!
//! Each open window is sampled at a fixed granularity. For every sample,
//! the periods of candidates whose closed span contains the instant are
//! probed; each (period, instant) pair is compiled once into a cover
//! predicate and reused by every sample at that instant. The predicates
//! are grouped by member: a member with one predicate at the instant
//! contributes it directly, a member with several (touching shifts or
//! touching work periods) contributes a single presence boolean. The
//! on-floor count is the sum over members, which must reach the window
//! minimum (up to slack) and stay below its maximum.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::RosterModel;
use crate::config::SamplingConfig;
use crate::models::{CoverLink, CoverageSample, FloorLink, OpenWindow, ShiftCandidate};
use crate::solver::{LinearExpr, ModelSink, VarRef};

/// A sampled instant before any variable exists for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SamplePoint {
    pub window_index: usize,
    pub instant_min: i64,
}

/// One (sample, candidate, period) triple whose candidate could cover the
/// sampled instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Probe {
    pub sample: usize,
    pub candidate: usize,
    pub period: usize,
}

/// Sampled instants of one window: `start, start + g, ...` below the end,
/// plus the end itself when requested.
pub fn sample_instants(window: &OpenWindow, sampling: &SamplingConfig) -> Vec<i64> {
    if sampling.granularity_min <= 0 || window.end_min <= window.start_min {
        return Vec::new();
    }
    let mut instants: Vec<i64> = (0..)
        .map(|k| window.start_min + k * sampling.granularity_min)
        .take_while(|t| *t < window.end_min)
        .collect();
    if sampling.include_window_end {
        instants.push(window.end_min);
    }
    instants
}

pub(crate) fn sample_points(windows: &[OpenWindow], sampling: &SamplingConfig) -> Vec<SamplePoint> {
    windows
        .iter()
        .enumerate()
        .flat_map(|(window_index, w)| {
            sample_instants(w, sampling)
                .into_iter()
                .map(move |instant_min| SamplePoint {
                    window_index,
                    instant_min,
                })
        })
        .collect()
}

/// Lazily yields every probe in (sample, candidate start, candidate, period)
/// order.
///
/// `by_start` holds candidate indices sorted by start; `max_duration` bounds
/// how far back a covering candidate can start. Calling again restarts the
/// stream.
pub(crate) fn probes<'m>(
    points: &'m [SamplePoint],
    candidates: &'m [ShiftCandidate],
    by_start: &'m [usize],
    max_duration: i64,
) -> impl Iterator<Item = Probe> + 'm {
    points.iter().enumerate().flat_map(move |(sample, point)| {
        let h = point.instant_min;
        let lo = by_start.partition_point(|&c| candidates[c].start_min < h - max_duration);
        let hi = by_start.partition_point(|&c| candidates[c].start_min <= h);
        by_start[lo..hi]
            .iter()
            .copied()
            .filter(move |&c| candidates[c].could_cover(h))
            .flat_map(move |candidate| {
                candidates[candidate].periods.clone().map(move |period| Probe {
                    sample,
                    candidate,
                    period,
                })
            })
    })
}

/// Emits cover predicates, slack variables and coverage rows.
pub(crate) fn emit<S: ModelSink + ?Sized>(
    windows: &[OpenWindow],
    sampling: &SamplingConfig,
    model: &mut RosterModel,
    sink: &mut S,
) {
    let points = sample_points(windows, sampling);
    let mut by_start: Vec<usize> = (0..model.candidates.len()).collect();
    by_start.sort_by_key(|&c| (model.candidates[c].start_min, c));
    let max_duration = model
        .candidates
        .iter()
        .map(|c| c.duration_min)
        .max()
        .unwrap_or(0);

    let mut cache: HashMap<(usize, i64), VarRef> = HashMap::new();
    let mut presence: HashMap<(usize, i64), VarRef> = HashMap::new();
    let mut cover_links = Vec::new();
    let mut floor_links = Vec::new();
    let mut samples = Vec::with_capacity(points.len());
    let mut stream = probes(&points, &model.candidates, &by_start, max_duration).peekable();

    for (index, point) in points.iter().enumerate() {
        let window = &windows[point.window_index];
        let h = point.instant_min;

        let mut by_member: BTreeMap<usize, Vec<VarRef>> = BTreeMap::new();
        while let Some(probe) = stream.next_if(|p| p.sample == index) {
            let cover = *cache.entry((probe.period, h)).or_insert_with(|| {
                let link = compile_cover(model, probe.period, h, sampling, sink);
                cover_links.push(link);
                link.cover
            });
            by_member
                .entry(model.candidates[probe.candidate].member_index)
                .or_default()
                .push(cover);
        }

        let mut on_floor = LinearExpr::new();
        for (member_index, covers) in by_member {
            let present = if covers.len() == 1 {
                covers[0]
            } else {
                *presence.entry((member_index, h)).or_insert_with(|| {
                    let link = compile_presence(model, member_index, h, covers, sampling, sink);
                    let present = link.present;
                    floor_links.push(link);
                    present
                })
            };
            on_floor.add_term(present, 1.0);
        }

        let slack = sink.declare_integer(
            &format!("slack[{}@{h}]", window.id),
            0,
            window.min_staffing.max(0) as i64,
        );
        sink.add_linear(
            (on_floor.clone() + LinearExpr::var(slack))
                .at_least(window.min_staffing as f64)
                .labeled("coverage.min"),
        );
        sink.add_linear(
            on_floor
                .clone()
                .at_most(window.max_staffing as f64)
                .labeled("coverage.max"),
        );
        samples.push(CoverageSample {
            window_index: point.window_index,
            window_id: window.id.clone(),
            instant_min: h,
            min_staffing: window.min_staffing,
            max_staffing: window.max_staffing,
            slack,
            on_floor,
        });
    }

    drop(stream);

    debug!(
        samples = samples.len(),
        cover_predicates = cover_links.len(),
        presence_flags = floor_links.len(),
        exact = sampling.exact_coverage,
        "emitted coverage constraints"
    );
    model.samples = samples;
    model.cover_links = cover_links;
    model.floor_links = floor_links;
    model.resolution_min = sampling.resolution_min;
}

/// Compiles "period is a work period and `start <= h <= end`" into a
/// boolean.
///
/// The predicate can only be 1 when the geometry agrees. With exact
/// linkage it must also be 1 whenever the geometry agrees.
fn compile_cover<S: ModelSink + ?Sized>(
    model: &RosterModel,
    period: usize,
    h: i64,
    sampling: &SamplingConfig,
    sink: &mut S,
) -> CoverLink {
    let p = model.periods[period];
    let at = h as f64;
    let cover = sink.declare_boolean(&format!("cover[p{period}@{h}]"));

    sink.add_linear(
        (LinearExpr::var(cover) - LinearExpr::var(p.work))
            .at_most(0.0)
            .labeled("cover.work"),
    );
    sink.add_indicator(
        cover,
        LinearExpr::var(p.start).at_most(at).labeled("cover.start"),
        true,
    );
    sink.add_indicator(
        cover,
        LinearExpr::var(p.end).at_least(at).labeled("cover.end"),
        true,
    );

    let (late, early) = if sampling.exact_coverage {
        let r = sampling.resolution_min;
        let late = sink.declare_boolean(&format!("late[p{period}@{h}]"));
        let early = sink.declare_boolean(&format!("early[p{period}@{h}]"));
        sink.add_indicator(
            late,
            LinearExpr::var(p.start).at_least(at + r).labeled("cover.late"),
            true,
        );
        sink.add_indicator(
            early,
            LinearExpr::var(p.end).at_most(at - r).labeled("cover.early"),
            true,
        );
        // work and neither late nor early => cover
        sink.add_linear(
            (LinearExpr::var(cover) - LinearExpr::var(p.work)
                + LinearExpr::var(late)
                + LinearExpr::var(early))
            .at_least(0.0)
            .labeled("cover.exact"),
        );
        (Some(late), Some(early))
    } else {
        (None, None)
    };

    CoverLink {
        period,
        instant_min: h,
        cover,
        late,
        early,
    }
}

/// Compiles "member is on the floor at `h`" over several cover predicates.
///
/// The presence flag is 1 only if one of the predicates is. With exact
/// linkage it must also be 1 whenever one of them is.
fn compile_presence<S: ModelSink + ?Sized>(
    model: &RosterModel,
    member_index: usize,
    h: i64,
    covers: Vec<VarRef>,
    sampling: &SamplingConfig,
    sink: &mut S,
) -> FloorLink {
    let present = sink.declare_boolean(&format!("present[{}@{h}]", model.members[member_index]));
    sink.add_linear(
        (LinearExpr::var(present) - LinearExpr::sum_of(covers.iter().copied()))
            .at_most(0.0)
            .labeled("floor.member"),
    );
    if sampling.exact_coverage {
        for &cover in &covers {
            sink.add_linear(
                (LinearExpr::var(present) - LinearExpr::var(cover))
                    .at_least(0.0)
                    .labeled("floor.exact"),
            );
        }
    }
    FloorLink {
        member_index,
        instant_min: h,
        present,
        covers,
    }
}
