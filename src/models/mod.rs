//! Rostering domain models.
//!
//! Inputs (availability, open windows, shift catalog, start grid,
//! preferences) and the records a build produces from them (candidates,
//! periods, coverage samples).
//!
//! # Domain Mappings
//!
//! | u-roster | Retail | Contact Center | Healthcare |
//! |----------|--------|----------------|------------|
//! | AvailabilityInterval | Staff availability | Agent availability | Nurse availability |
//! | OpenWindow | Opening hours | Service hours | Ward cover |
//! | ShiftClass | Shift pattern | Shift type | Duty type |
//! | CoverageSample | Floor check | Interval staffing | Head count |

mod availability;
mod candidate;
mod catalog;
mod grid;
mod span;
mod window;

pub use availability::{AvailabilityInterval, ShiftPreference};
pub use candidate::{CoverLink, CoverageSample, FloorLink, Period, PeriodKind, ShiftCandidate};
pub use catalog::{BreakPlacement, BreakSlot, OffsetRange, ShiftCatalog, ShiftClass, WorkAllotment};
pub use grid::StartTimeGrid;
pub use span::{TimeSpan, MINUTES_PER_DAY};
pub use window::OpenWindow;
