//! Break length rule.
//!
//! The required break scales with the worked duration: up to 2 hours none,
//! up to 6 hours 15 minutes, up to 9 hours 30 minutes, beyond that 45. The
//! rule fails when the recorded break is below the requirement.

use crate::models::{EntryDetails, TimeEntry};

use super::Verdict;

/// Returns the required break in minutes for a worked duration.
///
/// # Example
///
/// ```
/// use timesheet_engine::validation::required_break_minutes;
///
/// assert_eq!(required_break_minutes(120), 0);
/// assert_eq!(required_break_minutes(121), 15);
/// assert_eq!(required_break_minutes(360), 15);
/// assert_eq!(required_break_minutes(361), 30);
/// assert_eq!(required_break_minutes(540), 30);
/// assert_eq!(required_break_minutes(541), 45);
/// ```
pub fn required_break_minutes(duration_minutes: i64) -> i64 {
    if duration_minutes <= 120 {
        0
    } else if duration_minutes <= 360 {
        15
    } else if duration_minutes <= 540 {
        30
    } else {
        45
    }
}

/// Evaluates the break length rule for one entry.
///
/// Vacation entries carry no break and always pass.
pub fn evaluate(entry: &TimeEntry) -> Verdict {
    let break_minutes = match entry.details {
        EntryDetails::Work { break_minutes, .. } => break_minutes,
        EntryDetails::Vacation => return Verdict::Success,
    };

    let required = required_break_minutes(entry.duration_minutes());
    if break_minutes < required {
        Verdict::Failure {
            message: format!(
                "a break of {} minutes is required, got {}",
                required, break_minutes
            ),
        }
    } else {
        Verdict::Success
    }
}
