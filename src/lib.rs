//! Workforce rostering model builder for the U-Engine ecosystem.
//!
//! Turns member availability, open windows with staffing bounds, a catalog
//! of permitted shift lengths and a start-time grid into a mixed-integer
//! model: which shifts to roster, where to put their breaks, and how far
//! staffing falls short at every sampled instant. The model is emitted on a
//! generic solver surface; any MIP/CP engine can sit behind it.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `AvailabilityInterval`, `OpenWindow`,
//!   `ShiftCatalog`, `StartTimeGrid`, and the build records
//!   (`ShiftCandidate`, `Period`, `CoverageSample`)
//! - **`config`**: Sampling, limits, selection policy and objective policy
//! - **`validation`**: Input integrity checks (intervals, ids, staffing, catalog)
//! - **`solver`**: `ModelSink`/`SolverAdapter` traits and an in-memory `LinearModel`
//! - **`builder`**: `RosterBuilder`: candidates, periods, constraints, coverage, objective
//! - **`roster`**: Decoded rosters and KPIs
//!
//! # Example
//!
//! ```
//! use u_roster::builder::RosterBuilder;
//! use u_roster::models::{AvailabilityInterval, OpenWindow, ShiftCatalog, StartTimeGrid};
//! use u_roster::solver::DEFAULT_TOLERANCE;
//!
//! let availability = vec![AvailabilityInterval::new("alice", 300, 1320)];
//! let windows = vec![OpenWindow::new("day", 360, 1080).with_staffing(1, 1)];
//! let catalog = ShiftCatalog::standard();
//! let grid = StartTimeGrid::daily_anchors(&[6, 8, 10], 1);
//!
//! let (model, recorded) = RosterBuilder::new(&availability, &windows, &catalog, &grid)
//!     .build()
//!     .unwrap();
//!
//! // rostering nobody is always feasible; the shortfall lands in slack
//! let idle = model.complete_assignment(&[]).unwrap();
//! assert!(recorded.is_satisfied_by(&idle, DEFAULT_TOLERANCE));
//! assert!(model.decode(&idle).shifts.is_empty());
//! ```
//!
//! # References
//!
//! - Dantzig (1954), "A Comment on Edie's Traffic Delays at Toll Booths"
//! - Aykin (1996), "Optimal Shift Scheduling with Multiple Break Windows"
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"

pub mod builder;
pub mod config;
pub mod error;
pub mod models;
pub mod roster;
pub mod solver;
pub mod validation;
