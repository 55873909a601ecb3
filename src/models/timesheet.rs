//! Timesheet aggregate and its approval state machine.
//!
//! A timesheet is the per-(username, month, year) record that accumulates
//! entry durations and carries the month's vacation and overtime ledgers.
//! Its status moves through a fixed approval workflow; every transition is
//! guarded by the source state and fails with a state conflict otherwise.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// The approval state of a timesheet.
///
/// ```text
/// NOT_SUBMITTED --sign--> WAITING_FOR_APPROVAL --approve--> COMPLETE
///                              |        ^
///                   request_change      sign
///                              v        |
///                            REVISION --+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimesheetStatus {
    /// Initial state; the employee is still editing entries.
    NotSubmitted,
    /// Signed by the employee, awaiting the supervisor's decision.
    WaitingForApproval,
    /// Sent back by the supervisor for changes.
    Revision,
    /// Approved by the supervisor; terminal, ledger frozen.
    Complete,
}

impl TimesheetStatus {
    /// Returns the workflow name of the status, as used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimesheetStatus::NotSubmitted => "NOT_SUBMITTED",
            TimesheetStatus::WaitingForApproval => "WAITING_FOR_APPROVAL",
            TimesheetStatus::Revision => "REVISION",
            TimesheetStatus::Complete => "COMPLETE",
        }
    }

    /// Whether entries of a timesheet in this state may be mutated.
    ///
    /// Only the two employee-editable states allow entry mutation; a pending
    /// or complete timesheet is read-only.
    pub fn allows_entry_mutation(&self) -> bool {
        matches!(
            self,
            TimesheetStatus::NotSubmitted | TimesheetStatus::Revision
        )
    }
}

impl std::fmt::Display for TimesheetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The monthly aggregate record for one user.
///
/// `total_minutes` is a derived sum over the month's entries and is re-summed
/// after every entry mutation. `vacation_minutes` and `overtime_minutes` are
/// ledgers, not sums: the vacation balance is granted at creation and
/// consumed by vacation entries, and the overtime value carries the previous
/// month's overtime forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timesheet {
    /// Unique identifier, assigned at construction.
    pub id: Uuid,
    /// The owning username. Unique together with (month, year).
    pub username: String,
    /// The calendar month (1-12).
    pub month: u32,
    /// The calendar year.
    pub year: i32,
    /// The approval state.
    pub status: TimesheetStatus,
    /// Sum of all entry durations, in minutes.
    pub total_minutes: i64,
    /// Running vacation balance for this month, in minutes.
    pub vacation_minutes: i64,
    /// Signed overtime ledger value, in minutes.
    pub overtime_minutes: i64,
    /// When the status last changed.
    pub last_status_change: NaiveDateTime,
}

impl Timesheet {
    /// Creates a fresh timesheet in the initial state.
    pub fn new(
        username: &str,
        month: u32,
        year: i32,
        vacation_grant_minutes: i64,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            month,
            year,
            status: TimesheetStatus::NotSubmitted,
            total_minutes: 0,
            vacation_minutes: vacation_grant_minutes,
            overtime_minutes: 0,
            last_status_change: now,
        }
    }

    /// Transitions the timesheet to `WAITING_FOR_APPROVAL`.
    ///
    /// Allowed only from `NOT_SUBMITTED` or `REVISION`. The service layers
    /// the signature, total-time and prior-month guards on top of this.
    pub fn sign(&mut self, now: NaiveDateTime) -> EngineResult<()> {
        match self.status {
            TimesheetStatus::NotSubmitted | TimesheetStatus::Revision => {
                self.status = TimesheetStatus::WaitingForApproval;
                self.last_status_change = now;
                Ok(())
            }
            other => Err(EngineError::StateConflict {
                operation: "sign",
                status: other.as_str().to_string(),
            }),
        }
    }

    /// Transitions the timesheet to `COMPLETE`.
    ///
    /// Allowed only from `WAITING_FOR_APPROVAL`. Once complete, the month's
    /// ledger is frozen and no further recalculation is permitted.
    pub fn approve(&mut self, now: NaiveDateTime) -> EngineResult<()> {
        match self.status {
            TimesheetStatus::WaitingForApproval => {
                self.status = TimesheetStatus::Complete;
                self.last_status_change = now;
                Ok(())
            }
            other => Err(EngineError::StateConflict {
                operation: "approve",
                status: other.as_str().to_string(),
            }),
        }
    }

    /// Transitions the timesheet back to `REVISION`.
    ///
    /// Allowed only from `WAITING_FOR_APPROVAL`.
    pub fn request_change(&mut self, now: NaiveDateTime) -> EngineResult<()> {
        match self.status {
            TimesheetStatus::WaitingForApproval => {
                self.status = TimesheetStatus::Revision;
                self.last_status_change = now;
                Ok(())
            }
            other => Err(EngineError::StateConflict {
                operation: "request changes on",
                status: other.as_str().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2026-04-01 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn later() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2026-04-02 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn sheet_in(status: TimesheetStatus) -> Timesheet {
        let mut sheet = Timesheet::new("hmuster", 3, 2026, 120, now());
        sheet.status = status;
        sheet
    }

    #[test]
    fn test_new_timesheet_starts_not_submitted() {
        let sheet = Timesheet::new("hmuster", 3, 2026, 120, now());
        assert_eq!(sheet.status, TimesheetStatus::NotSubmitted);
        assert_eq!(sheet.total_minutes, 0);
        assert_eq!(sheet.vacation_minutes, 120);
        assert_eq!(sheet.overtime_minutes, 0);
    }

    #[test]
    fn test_sign_from_not_submitted() {
        let mut sheet = sheet_in(TimesheetStatus::NotSubmitted);
        sheet.sign(later()).unwrap();
        assert_eq!(sheet.status, TimesheetStatus::WaitingForApproval);
        assert_eq!(sheet.last_status_change, later());
    }

    #[test]
    fn test_sign_from_revision() {
        let mut sheet = sheet_in(TimesheetStatus::Revision);
        sheet.sign(later()).unwrap();
        assert_eq!(sheet.status, TimesheetStatus::WaitingForApproval);
    }

    #[test]
    fn test_sign_rejected_from_waiting_and_complete() {
        for status in [
            TimesheetStatus::WaitingForApproval,
            TimesheetStatus::Complete,
        ] {
            let mut sheet = sheet_in(status);
            let err = sheet.sign(later()).unwrap_err();
            assert!(matches!(err, EngineError::StateConflict { .. }));
            // status unchanged on conflict
            assert_eq!(sheet.status, status);
            assert_eq!(sheet.last_status_change, now());
        }
    }

    #[test]
    fn test_approve_only_from_waiting() {
        let mut sheet = sheet_in(TimesheetStatus::WaitingForApproval);
        sheet.approve(later()).unwrap();
        assert_eq!(sheet.status, TimesheetStatus::Complete);

        for status in [
            TimesheetStatus::NotSubmitted,
            TimesheetStatus::Revision,
            TimesheetStatus::Complete,
        ] {
            let mut sheet = sheet_in(status);
            let err = sheet.approve(later()).unwrap_err();
            assert!(matches!(
                err,
                EngineError::StateConflict {
                    operation: "approve",
                    ..
                }
            ));
            assert_eq!(sheet.status, status);
        }
    }

    #[test]
    fn test_request_change_only_from_waiting() {
        let mut sheet = sheet_in(TimesheetStatus::WaitingForApproval);
        sheet.request_change(later()).unwrap();
        assert_eq!(sheet.status, TimesheetStatus::Revision);

        for status in [
            TimesheetStatus::NotSubmitted,
            TimesheetStatus::Revision,
            TimesheetStatus::Complete,
        ] {
            let mut sheet = sheet_in(status);
            assert!(sheet.request_change(later()).is_err());
            assert_eq!(sheet.status, status);
        }
    }

    #[test]
    fn test_revision_loop_back_to_waiting() {
        let mut sheet = sheet_in(TimesheetStatus::NotSubmitted);
        sheet.sign(later()).unwrap();
        sheet.request_change(later()).unwrap();
        assert_eq!(sheet.status, TimesheetStatus::Revision);
        sheet.sign(later()).unwrap();
        assert_eq!(sheet.status, TimesheetStatus::WaitingForApproval);
        sheet.approve(later()).unwrap();
        assert_eq!(sheet.status, TimesheetStatus::Complete);
    }

    #[test]
    fn test_entry_mutation_allowed_only_while_editable() {
        assert!(TimesheetStatus::NotSubmitted.allows_entry_mutation());
        assert!(TimesheetStatus::Revision.allows_entry_mutation());
        assert!(!TimesheetStatus::WaitingForApproval.allows_entry_mutation());
        assert!(!TimesheetStatus::Complete.allows_entry_mutation());
    }

    #[test]
    fn test_status_display_names() {
        assert_eq!(TimesheetStatus::NotSubmitted.to_string(), "NOT_SUBMITTED");
        assert_eq!(
            TimesheetStatus::WaitingForApproval.to_string(),
            "WAITING_FOR_APPROVAL"
        );
        assert_eq!(TimesheetStatus::Revision.to_string(), "REVISION");
        assert_eq!(TimesheetStatus::Complete.to_string(), "COMPLETE");
    }

    #[test]
    fn test_timesheet_serialization_round_trip() {
        let sheet = sheet_in(TimesheetStatus::Revision);
        let json = serde_json::to_string(&sheet).unwrap();
        let deserialized: Timesheet = serde_json::from_str(&json).unwrap();
        assert_eq!(sheet, deserialized);
    }
}
