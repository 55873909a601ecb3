//! Weekly hours cap.
//!
//! Groups a month's entries by ISO week number and fails when any week's
//! summed duration exceeds the configured cap. Checked when a timesheet is
//! signed.

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::error::{EngineError, EngineResult};
use crate::models::TimeEntry;

/// Default weekly cap in minutes (20 hours, part-time contracts).
pub const DEFAULT_WEEKLY_CAP_MINUTES: i64 = 1200;

/// Checks that no ISO week of the given entries exceeds the cap.
///
/// # Arguments
///
/// * `entries` - The month's entries.
/// * `cap_minutes` - The per-week cap in minutes.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] naming the first offending ISO week
/// and its summed minutes.
pub fn check_weekly_hours(entries: &[TimeEntry], cap_minutes: i64) -> EngineResult<()> {
    let mut weeks: BTreeMap<(i32, u32), i64> = BTreeMap::new();
    for entry in entries {
        let week = entry.day().iso_week();
        *weeks.entry((week.year(), week.week())).or_default() += entry.duration_minutes();
    }

    for ((_, week), minutes) in weeks {
        if minutes > cap_minutes {
            return Err(EngineError::Validation {
                rule: "weekly_hours",
                message: format!(
                    "week {} sums to {} minutes, above the cap of {} minutes",
                    week, minutes, cap_minutes
                ),
            });
        }
    }
    Ok(())
}
