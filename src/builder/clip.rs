//! Availability clipping.

use crate::models::{AvailabilityInterval, OpenWindow, TimeSpan};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Intersects a member's availability with an open window.
///
/// Returns `Ok(None)` when the two do not overlap. Malformed input
/// (`end <= start` on either side) is a validation error rather than an
/// empty result.
///
/// # Example
/// ```
/// use u_roster::builder::clip;
/// use u_roster::models::{AvailabilityInterval, OpenWindow, TimeSpan};
///
/// let avail = AvailabilityInterval::new("alice", 300, 1320);
/// let window = OpenWindow::new("day", 360, 1080);
/// assert_eq!(clip(&avail, &window).unwrap(), Some(TimeSpan::new(360, 1080)));
/// ```
pub fn clip(
    availability: &AvailabilityInterval,
    window: &OpenWindow,
) -> Result<Option<TimeSpan>, ValidationError> {
    if !availability.span().is_well_formed() {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidInterval,
            format!(
                "Availability of '{}' is empty or backwards: [{}, {})",
                availability.member_id, availability.start_min, availability.end_min
            ),
        ));
    }
    if !window.span().is_well_formed() {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidInterval,
            format!(
                "Window '{}' is empty or backwards: [{}, {})",
                window.id, window.start_min, window.end_min
            ),
        ));
    }
    Ok(availability.span().intersect(&window.span()))
}
