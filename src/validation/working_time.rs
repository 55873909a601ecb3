//! Working time rule.
//!
//! Warns when a work entry starts before 08:00 or ends after 18:00, warns
//! when it exceeds 8 worked hours, and fails when it exceeds 10. Only the
//! first applicable warning is reported.

use chrono::NaiveTime;

use crate::models::TimeEntry;

use super::Verdict;

/// Hour at which the regular working window opens.
pub const WORKDAY_START_HOUR: u32 = 8;

/// Hour at which the regular working window closes.
pub const WORKDAY_END_HOUR: u32 = 18;

/// Worked minutes above which the rule warns (8 hours).
pub const WARN_WORK_MINUTES: i64 = 480;

/// Worked minutes above which the rule fails (10 hours).
pub const MAX_WORK_MINUTES: i64 = 600;

/// Evaluates the working time rule for one entry.
pub fn evaluate(entry: &TimeEntry) -> Verdict {
    let duration = entry.duration_minutes();
    if duration > MAX_WORK_MINUTES {
        return Verdict::Failure {
            message: format!(
                "worked {} hours, more than the permitted maximum of 10 hours",
                entry.duration_display()
            ),
        };
    }

    let window_start = NaiveTime::from_hms_opt(WORKDAY_START_HOUR, 0, 0).unwrap();
    let window_end = NaiveTime::from_hms_opt(WORKDAY_END_HOUR, 0, 0).unwrap();
    if entry.start.time() < window_start || entry.end.time() > window_end {
        return Verdict::Warning {
            message: format!(
                "entry lies outside the regular working hours of {:02}:00-{:02}:00",
                WORKDAY_START_HOUR, WORKDAY_END_HOUR
            ),
        };
    }

    if duration > WARN_WORK_MINUTES {
        return Verdict::Warning {
            message: format!(
                "worked {} hours, more than the regular 8 hours",
                entry.duration_display()
            ),
        };
    }

    Verdict::Success
}
