//! Input validation for rostering problems.
//!
//! Checks structural integrity of availability, open windows, the shift
//! catalog, member preferences and the build configuration before any
//! candidate is generated. Detects:
//! - Backwards or empty intervals
//! - Duplicate window IDs
//! - Negative or inverted staffing bounds
//! - Shift classes whose break rules cannot fit
//! - Preferences naming unknown durations or members
//! - Non-positive sampling granularity or limits
//!
//! All problems are collected; validation never stops at the first one.

use crate::config::RosterConfig;
use crate::models::{AvailabilityInterval, OpenWindow, ShiftCatalog, ShiftClass, ShiftPreference};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// An interval has `end <= start`.
    InvalidInterval,
    /// Two windows share the same ID.
    DuplicateId,
    /// A staffing bound is negative.
    NegativeStaffing,
    /// `min_staffing > max_staffing`.
    StaffingBoundsInverted,
    /// The catalog has no shift classes.
    EmptyCatalog,
    /// A shift class cannot hold its breaks.
    InvalidShiftClass,
    /// A duration is not in the catalog.
    UnknownDuration,
    /// A preference names a member without availability.
    InvalidMemberReference,
    /// A configuration value is out of range.
    InvalidConfig,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a rostering build.
///
/// Checks:
/// 1. Every availability interval and window has `end > start`
/// 2. No duplicate window IDs
/// 3. Staffing bounds are non-negative and `min <= max`
/// 4. The catalog is non-empty and every class can hold its breaks
/// 5. Preferences name catalog durations and known members
/// 6. Sampling granularity, resolution and day limit are positive
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    availability: &[AvailabilityInterval],
    windows: &[OpenWindow],
    catalog: &ShiftCatalog,
    preferences: &[ShiftPreference],
    config: &RosterConfig,
) -> ValidationResult {
    let mut errors = Vec::new();

    for a in availability {
        if a.end_min <= a.start_min {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidInterval,
                format!(
                    "Availability of '{}' ends at {} before it starts at {}",
                    a.member_id, a.end_min, a.start_min
                ),
            ));
        }
    }

    let mut window_ids = HashSet::new();
    for w in windows {
        if !window_ids.insert(w.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate window ID: {}", w.id),
            ));
        }
        if w.end_min <= w.start_min {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidInterval,
                format!(
                    "Window '{}' ends at {} before it starts at {}",
                    w.id, w.end_min, w.start_min
                ),
            ));
        }
        if w.min_staffing < 0 || w.max_staffing < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeStaffing,
                format!(
                    "Window '{}' has negative staffing bounds [{}, {}]",
                    w.id, w.min_staffing, w.max_staffing
                ),
            ));
        } else if w.min_staffing > w.max_staffing {
            errors.push(ValidationError::new(
                ValidationErrorKind::StaffingBoundsInverted,
                format!(
                    "Window '{}' requires {} but allows only {}",
                    w.id, w.min_staffing, w.max_staffing
                ),
            ));
        }
    }

    if catalog.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyCatalog,
            "Shift catalog has no classes",
        ));
    }
    for (key, class) in catalog.entries() {
        if key != class.duration_min {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidShiftClass,
                format!(
                    "Shift class listed under {key} min declares a duration of {} min",
                    class.duration_min
                ),
            ));
        }
        if let Some(reason) = shift_class_problem(class) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidShiftClass,
                format!("Shift class {} min: {reason}", class.duration_min),
            ));
        }
    }

    let members: HashSet<&str> = availability.iter().map(|a| a.member_id.as_str()).collect();
    for p in preferences {
        if !catalog.contains(p.duration_min) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownDuration,
                format!(
                    "Preference of '{}' names duration {} which is not in the catalog",
                    p.member_id, p.duration_min
                ),
            ));
        }
        if !members.contains(p.member_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidMemberReference,
                format!("Preference references member '{}' without availability", p.member_id),
            ));
        }
        if let (Some(lo), Some(hi)) = (p.earliest_start_min, p.latest_start_min) {
            if lo > hi {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidInterval,
                    format!(
                        "Preference of '{}' has start range [{lo}, {hi}] reversed",
                        p.member_id
                    ),
                ));
            }
        }
    }

    errors.extend(config_problems(config));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Why a class cannot be realized, if it cannot.
fn shift_class_problem(class: &ShiftClass) -> Option<String> {
    let breaks = class.break_count as usize;
    if class.duration_min <= 0 {
        return Some("duration must be positive".into());
    }
    if class.break_count > 2 {
        return Some(format!("{} breaks requested, at most 2 supported", class.break_count));
    }
    if class.period_count < 2 * breaks + 1 {
        return Some(format!(
            "{} periods cannot alternate around {} break(s)",
            class.period_count, breaks
        ));
    }
    if breaks > 0 && class.break_length_min <= 0 {
        return Some("break length must be positive".into());
    }
    if class.break_minutes() >= class.duration_min {
        return Some("breaks fill the whole shift".into());
    }
    None
}

fn config_problems(config: &RosterConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if config.sampling.granularity_min <= 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidConfig,
            format!(
                "Sampling granularity must be positive, got {}",
                config.sampling.granularity_min
            ),
        ));
    }
    if config.sampling.resolution_min <= 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidConfig,
            format!(
                "Coverage resolution must be positive, got {}",
                config.sampling.resolution_min
            ),
        ));
    }
    if let Some(limit) = config.day_limit_min {
        if limit <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidConfig,
                format!("Day limit must be positive, got {limit}"),
            ));
        }
    }
    errors
}
