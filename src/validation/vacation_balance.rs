//! Vacation balance rule.
//!
//! Fails when consuming a vacation entry would drive the user's vacation
//! balance negative. Work entries always pass.

use crate::models::{EntryDetails, TimeEntry};

use super::Verdict;

/// Evaluates the vacation balance rule for one entry.
pub fn evaluate(entry: &TimeEntry, available_minutes: i64) -> Verdict {
    if !matches!(entry.details, EntryDetails::Vacation) {
        return Verdict::Success;
    }

    let requested = entry.duration_minutes();
    if requested > available_minutes {
        Verdict::Failure {
            message: format!(
                "vacation balance of {} minutes does not cover the requested {} minutes",
                available_minutes, requested
            ),
        }
    } else {
        Verdict::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use uuid::Uuid;

    fn make_datetime(time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(
            &format!("2026-03-12 {}", time_str),
            "%Y-%m-%d %H:%M:%S",
        )
        .unwrap()
    }

    fn vacation(start: &str, end: &str) -> TimeEntry {
        TimeEntry {
            id: Uuid::new_v4(),
            timesheet_id: Uuid::new_v4(),
            username: "hmuster".to_string(),
            start: make_datetime(start),
            end: make_datetime(end),
            details: EntryDetails::Vacation,
        }
    }

    #[test]
    fn test_sufficient_balance_passes() {
        // 3 hours requested against 4 hours available
        assert_eq!(
            evaluate(&vacation("09:00:00", "12:00:00"), 240),
            Verdict::Success
        );
    }

    #[test]
    fn test_exact_balance_passes() {
        assert_eq!(
            evaluate(&vacation("09:00:00", "12:00:00"), 180),
            Verdict::Success
        );
    }

    #[test]
    fn test_insufficient_balance_fails() {
        let verdict = evaluate(&vacation("09:00:00", "12:00:00"), 179);
        match verdict {
            Verdict::Failure { message } => {
                assert!(message.contains("179"));
                assert!(message.contains("180"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_work_entries_ignore_balance() {
        let mut entry = vacation("09:00:00", "12:00:00");
        entry.details = EntryDetails::Work {
            break_minutes: 0,
            activity: "tutoring".to_string(),
            project: "algorithms".to_string(),
        };
        assert_eq!(evaluate(&entry, 0), Verdict::Success);
    }
}
