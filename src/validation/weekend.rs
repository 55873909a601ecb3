//! Weekend rule.
//!
//! Fails when the entry's date falls on a Saturday or Sunday, regardless of
//! entry kind.

use chrono::Weekday;

use crate::models::TimeEntry;

use super::Verdict;

/// Evaluates the weekend rule for one entry.
pub fn evaluate(entry: &TimeEntry) -> Verdict {
    match entry.weekday() {
        Weekday::Sat | Weekday::Sun => Verdict::Failure {
            message: format!("{} falls on a weekend", entry.day()),
        },
        _ => Verdict::Success,
    }
}
