//! Shift catalog: permitted shift durations and their break rules.
//!
//! Each duration class fixes how many breaks a shift of that length takes,
//! how many work/break periods it decomposes into, how long a break lasts,
//! and where in the shift each break may start. Break placement is plain
//! configuration; the builder hard-codes no placement policy.
//!
//! # Example
//!
//! ```
//! use u_roster::models::{BreakSlot, OffsetRange, ShiftCatalog, ShiftClass};
//!
//! let catalog = ShiftCatalog::new()
//!     .with_class(ShiftClass::new(240))
//!     .with_class(
//!         ShiftClass::new(480)
//!             .with_breaks(1, 30)
//!             .with_break_window(BreakSlot::First, OffsetRange::between(240, 360)),
//!     );
//! assert_eq!(catalog.get(480).map(|c| c.period_count), Some(3));
//! assert!(catalog.get(300).is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which break of a shift a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreakSlot {
    /// The first break.
    First,
    /// The second break (longest duration classes only).
    Second,
}

impl BreakSlot {
    /// Both slots, in order.
    pub const ALL: [BreakSlot; 2] = [BreakSlot::First, BreakSlot::Second];

    /// Number of breaks a class needs for this slot to be used.
    #[inline]
    pub fn ordinal(self) -> u8 {
        match self {
            BreakSlot::First => 1,
            BreakSlot::Second => 2,
        }
    }
}

/// Offset range relative to the shift start (minutes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetRange {
    /// Earliest offset from the shift start.
    pub earliest_min: i64,
    /// Latest offset from the shift start. `None` = unbounded.
    pub latest_min: Option<i64>,
}

impl OffsetRange {
    /// Offset in `[earliest, latest]`.
    pub fn between(earliest_min: i64, latest_min: i64) -> Self {
        Self {
            earliest_min,
            latest_min: Some(latest_min),
        }
    }

    /// Offset of at least `earliest`.
    pub fn not_before(earliest_min: i64) -> Self {
        Self {
            earliest_min,
            latest_min: None,
        }
    }

    /// Whether an offset satisfies the range.
    pub fn contains(&self, offset_min: i64) -> bool {
        offset_min >= self.earliest_min && self.latest_min.map_or(true, |l| offset_min <= l)
    }
}

/// Where each break of a class may start.
///
/// A slot without a range may start anywhere inside the shift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakPlacement {
    /// Start window of the first break.
    pub first: Option<OffsetRange>,
    /// Start window of the second break.
    pub second: Option<OffsetRange>,
}

impl BreakPlacement {
    /// Start window for a slot.
    pub fn range(&self, slot: BreakSlot) -> Option<OffsetRange> {
        match slot {
            BreakSlot::First => self.first,
            BreakSlot::Second => self.second,
        }
    }
}

/// Length bounds for a single work period of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkAllotment {
    /// Shortest allowed work period (minutes).
    pub min_block_min: i64,
    /// Longest allowed work period (minutes). `None` = up to the shift length.
    pub max_block_min: Option<i64>,
}

impl Default for WorkAllotment {
    fn default() -> Self {
        Self {
            min_block_min: 0,
            max_block_min: None,
        }
    }
}

/// One permitted shift duration and its break rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftClass {
    /// Shift length (minutes).
    pub duration_min: i64,
    /// Breaks taken during the shift (0, 1 or 2).
    pub break_count: u8,
    /// Work and break periods the shift decomposes into.
    pub period_count: usize,
    /// Fixed length of each break (minutes).
    pub break_length_min: i64,
    /// Where breaks may start.
    pub placement: BreakPlacement,
    /// Length bounds on work periods.
    pub work: WorkAllotment,
}

impl ShiftClass {
    /// Creates a break-free class made of a single work period.
    pub fn new(duration_min: i64) -> Self {
        Self {
            duration_min,
            break_count: 0,
            period_count: 1,
            break_length_min: 0,
            placement: BreakPlacement::default(),
            work: WorkAllotment::default(),
        }
    }

    /// Sets the break count and length; periods alternate work/break.
    pub fn with_breaks(mut self, break_count: u8, break_length_min: i64) -> Self {
        self.break_count = break_count;
        self.break_length_min = break_length_min;
        self.period_count = 2 * break_count as usize + 1;
        self
    }

    /// Overrides the period count.
    pub fn with_period_count(mut self, period_count: usize) -> Self {
        self.period_count = period_count;
        self
    }

    /// Sets the start window of one break.
    pub fn with_break_window(mut self, slot: BreakSlot, range: OffsetRange) -> Self {
        match slot {
            BreakSlot::First => self.placement.first = Some(range),
            BreakSlot::Second => self.placement.second = Some(range),
        }
        self
    }

    /// Sets the work period length bounds.
    pub fn with_work_block(mut self, min_block_min: i64, max_block_min: Option<i64>) -> Self {
        self.work = WorkAllotment {
            min_block_min,
            max_block_min,
        };
        self
    }

    /// Whether this class takes the given break.
    #[inline]
    pub fn takes(&self, slot: BreakSlot) -> bool {
        self.break_count >= slot.ordinal()
    }

    /// Total break time of one shift (minutes).
    #[inline]
    pub fn break_minutes(&self) -> i64 {
        self.break_count as i64 * self.break_length_min
    }

    /// Paid working time of one shift (minutes).
    #[inline]
    pub fn work_minutes(&self) -> i64 {
        self.duration_min - self.break_minutes()
    }
}

/// Permitted shift durations, keyed and iterated by duration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCatalog {
    classes: BTreeMap<i64, ShiftClass>,
}

impl ShiftCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog used by the reference rostering deployment.
    ///
    /// | Duration | Breaks | Periods |
    /// |----------|--------|---------|
    /// | 4 h | 0 | 1 |
    /// | 6 h | 1 | 3 |
    /// | 8 h | 1 | 3 |
    /// | 10 h | 2 | 5 |
    ///
    /// Breaks last 30 minutes. The first break starts 4 to 6 hours into the
    /// shift, the second no earlier than the 8th hour. Work periods last at
    /// least an hour.
    pub fn standard() -> Self {
        let first = OffsetRange::between(240, 360);
        let second = OffsetRange::not_before(480);
        Self::new()
            .with_class(ShiftClass::new(240).with_work_block(60, None))
            .with_class(
                ShiftClass::new(360)
                    .with_breaks(1, 30)
                    .with_break_window(BreakSlot::First, first)
                    .with_work_block(60, None),
            )
            .with_class(
                ShiftClass::new(480)
                    .with_breaks(1, 30)
                    .with_break_window(BreakSlot::First, first)
                    .with_work_block(60, None),
            )
            .with_class(
                ShiftClass::new(600)
                    .with_breaks(2, 30)
                    .with_break_window(BreakSlot::First, first)
                    .with_break_window(BreakSlot::Second, second)
                    .with_work_block(60, None),
            )
    }

    /// Adds (or replaces) a class.
    pub fn with_class(mut self, class: ShiftClass) -> Self {
        self.insert(class);
        self
    }

    /// Adds (or replaces) a class.
    pub fn insert(&mut self, class: ShiftClass) {
        self.classes.insert(class.duration_min, class);
    }

    /// Looks up the class for a duration.
    pub fn get(&self, duration_min: i64) -> Option<&ShiftClass> {
        self.classes.get(&duration_min)
    }

    /// Whether a duration is permitted.
    pub fn contains(&self, duration_min: i64) -> bool {
        self.classes.contains_key(&duration_min)
    }

    /// (key, class) pairs in ascending key order. A deserialized catalog
    /// may carry a key that disagrees with the class's own duration.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (i64, &ShiftClass)> {
        self.classes.iter().map(|(&key, class)| (key, class))
    }

    /// Durations in ascending order.
    pub fn durations(&self) -> impl Iterator<Item = i64> + '_ {
        self.classes.keys().copied()
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
