//! Monthly sequencing of approvals.
//!
//! A timesheet may only be signed once every chronologically earlier
//! timesheet of the same user is complete; approvals therefore proceed
//! strictly month by month.

use crate::error::{EngineError, EngineResult};
use crate::models::{Timesheet, TimesheetStatus};

/// Checks that all prior timesheets are complete.
///
/// # Arguments
///
/// * `prior` - The user's timesheets strictly before the month being signed,
///   in chronological order.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] naming the first month that is not
/// yet `COMPLETE`.
pub fn check_prior_timesheets(prior: &[Timesheet]) -> EngineResult<()> {
    for sheet in prior {
        if sheet.status != TimesheetStatus::Complete {
            return Err(EngineError::Validation {
                rule: "prior_timesheets",
                message: format!(
                    "the timesheet for {}/{} is still {}; months must be approved in order",
                    sheet.month, sheet.year, sheet.status
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2026-04-01 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn sheet(month: u32, year: i32, status: TimesheetStatus) -> Timesheet {
        let mut sheet = Timesheet::new("hmuster", month, year, 0, now());
        sheet.status = status;
        sheet
    }

    #[test]
    fn test_no_prior_months_passes() {
        assert!(check_prior_timesheets(&[]).is_ok());
    }

    #[test]
    fn test_all_complete_passes() {
        let prior = vec![
            sheet(1, 2026, TimesheetStatus::Complete),
            sheet(2, 2026, TimesheetStatus::Complete),
        ];
        assert!(check_prior_timesheets(&prior).is_ok());
    }

    #[test]
    fn test_preceding_month_in_revision_fails() {
        let prior = vec![
            sheet(1, 2026, TimesheetStatus::Complete),
            sheet(2, 2026, TimesheetStatus::Revision),
        ];
        let err = check_prior_timesheets(&prior).unwrap_err();
        match err {
            EngineError::Validation { rule, message } => {
                assert_eq!(rule, "prior_timesheets");
                assert!(message.contains("2/2026"));
                assert!(message.contains("REVISION"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_earliest_incomplete_month_is_reported() {
        let prior = vec![
            sheet(1, 2026, TimesheetStatus::NotSubmitted),
            sheet(2, 2026, TimesheetStatus::WaitingForApproval),
        ];
        let err = check_prior_timesheets(&prior).unwrap_err();
        assert!(err.to_string().contains("1/2026"));
    }
}
