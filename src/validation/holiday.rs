//! Public holiday rule.
//!
//! Fails when the entry's date is a public holiday in the employer's
//! jurisdiction, as reported by the injected holiday calendar.

use crate::models::TimeEntry;
use crate::store::HolidayCalendar;

use super::Verdict;

/// Evaluates the holiday rule for one entry.
pub fn evaluate(entry: &TimeEntry, calendar: &dyn HolidayCalendar) -> Verdict {
    match calendar.holiday_name(entry.day()) {
        Some(name) => Verdict::Failure {
            message: format!("{} is a public holiday ({})", entry.day(), name),
        },
        None => Verdict::Success,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryDetails;
    use crate::store::memory::StaticHolidayCalendar;
    use chrono::{NaiveDate, NaiveDateTime};
    use uuid::Uuid;

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn entry_on(date: &str) -> TimeEntry {
        TimeEntry {
            id: Uuid::new_v4(),
            timesheet_id: Uuid::new_v4(),
            username: "hmuster".to_string(),
            start: make_datetime(date, "09:00:00"),
            end: make_datetime(date, "12:00:00"),
            details: EntryDetails::Vacation,
        }
    }

    #[test]
    fn test_holiday_fails_with_name() {
        let calendar = StaticHolidayCalendar::new([(
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            "Tag der Arbeit",
        )]);
        let verdict = evaluate(&entry_on("2026-05-01"), &calendar);
        match verdict {
            Verdict::Failure { message } => {
                assert!(message.contains("2026-05-01"));
                assert!(message.contains("Tag der Arbeit"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_regular_day_passes() {
        let calendar = StaticHolidayCalendar::new([(
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            "Tag der Arbeit",
        )]);
        assert_eq!(evaluate(&entry_on("2026-05-04"), &calendar), Verdict::Success);
    }
}
