//! Orchestration of entry mutations and the approval workflow.
//!
//! [`TimesheetService`] coordinates the validator chains, model mutation,
//! ledger updates and notification dispatch for every public operation.
//! All collaborators are injected at construction; the service itself holds
//! no state beyond its settings.

use std::sync::Arc;

use chrono::{Datelike, NaiveDateTime};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::accounting::{AccountingEngine, monthly_vacation_grant_minutes};
use crate::config::EngineSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Contract, EngineWarning, EntryDetails, EntryKind, NewEntry, Outcome, TimeEntry, Timesheet,
    WarningKind,
};
use crate::store::{
    Clock, ContractStore, HolidayCalendar, NotificationKind, NotificationSink, SignatureKind,
    SignatureStore, TimesheetStore,
};
use crate::validation::{ValidationContext, check_prior_timesheets, check_weekly_hours, run_chain};

/// Replacement fields for an existing entry.
///
/// An update replaces the span and kind-specific details; the entry stays
/// with its user and its owning timesheet, so the new span must remain in
/// the same calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryUpdate {
    /// The new start of the span.
    pub start: NaiveDateTime,
    /// The new end of the span.
    pub end: NaiveDateTime,
    /// The new kind-specific fields.
    pub details: EntryDetails,
}

/// The orchestration service for timesheet and entry operations.
///
/// Every operation executes as an independent, short-lived unit of work:
/// load the target timesheet, check its state, run the validators, persist,
/// update the ledgers and cascade the overtime recalculation. Failures are
/// returned synchronously; nothing is retried.
pub struct TimesheetService {
    sheets: Arc<dyn TimesheetStore>,
    contracts: Arc<dyn ContractStore>,
    signatures: Arc<dyn SignatureStore>,
    notifications: Arc<dyn NotificationSink>,
    calendar: Arc<dyn HolidayCalendar>,
    clock: Arc<dyn Clock>,
    accounting: AccountingEngine,
    settings: EngineSettings,
}

impl TimesheetService {
    /// Creates a service over the given collaborators.
    pub fn new(
        sheets: Arc<dyn TimesheetStore>,
        contracts: Arc<dyn ContractStore>,
        signatures: Arc<dyn SignatureStore>,
        notifications: Arc<dyn NotificationSink>,
        calendar: Arc<dyn HolidayCalendar>,
        clock: Arc<dyn Clock>,
        settings: EngineSettings,
    ) -> Self {
        let accounting = AccountingEngine::new(sheets.clone(), contracts.clone());
        Self {
            sheets,
            contracts,
            signatures,
            notifications,
            calendar,
            clock,
            accounting,
            settings,
        }
    }

    // ------------------------------------------------------------------
    // Entry operations
    // ------------------------------------------------------------------

    /// Creates a time entry after validation, updating the ledgers.
    ///
    /// The owning timesheet is created lazily for the entry's month. The
    /// returned outcome carries the persisted entry and any validator
    /// warnings.
    pub fn create_entry(&self, new: NewEntry) -> EngineResult<Outcome<TimeEntry>> {
        check_span(new.start, new.end, &new.details)?;

        let contract = self.load_contract(&new.username)?;
        let month = new.start.date().month();
        let year = new.start.date().year();
        let sheet = self.ensure_timesheet_for(&contract, month, year)?;
        self.check_mutable(&sheet, "add entries to")?;

        let entry = TimeEntry {
            id: Uuid::new_v4(),
            timesheet_id: sheet.id,
            username: new.username,
            start: new.start,
            end: new.end,
            details: new.details,
        };
        if !entry.within_month(sheet.month, sheet.year) {
            return Err(EngineError::InvalidEntry {
                message: format!("the entry must lie within {}/{}", sheet.month, sheet.year),
            });
        }

        // the lazy creation above may have granted vacation; use the fresh
        // balance for validation
        let contract = self.load_contract(&entry.username)?;
        let ctx = ValidationContext {
            calendar: self.calendar.as_ref(),
            available_vacation_minutes: contract.vacation_minutes,
        };
        let warnings = run_chain(&entry, &ctx)?;

        self.sheets.insert_entry(&entry)?;
        if entry.kind() == EntryKind::Vacation {
            self.contracts
                .adjust_vacation_minutes(&entry.username, -entry.duration_minutes())?;
        }
        self.accounting.recalculate_with_cascade(&sheet, &contract)?;

        info!(
            username = %entry.username,
            entry_id = %entry.id,
            date = %entry.day(),
            duration = entry.duration_minutes(),
            warnings = warnings.len(),
            "Entry created"
        );
        Ok(Outcome::with_warnings(entry, warnings))
    }

    /// Replaces an entry's span and details after validation.
    pub fn update_entry(&self, id: Uuid, update: EntryUpdate) -> EngineResult<Outcome<TimeEntry>> {
        check_span(update.start, update.end, &update.details)?;

        let old = self
            .sheets
            .entry_by_id(id)?
            .ok_or(EngineError::EntryNotFound { id })?;
        let sheet = self.owning_sheet(&old)?;
        self.check_mutable(&sheet, "edit entries of")?;

        let updated = TimeEntry {
            id: old.id,
            timesheet_id: old.timesheet_id,
            username: old.username.clone(),
            start: update.start,
            end: update.end,
            details: update.details,
        };
        if !updated.within_month(sheet.month, sheet.year) {
            return Err(EngineError::InvalidEntry {
                message: format!("the entry must stay within {}/{}", sheet.month, sheet.year),
            });
        }

        let contract = self.load_contract(&old.username)?;
        // validate against the balance as it would be with the old entry
        // refunded
        let old_vacation = vacation_minutes_of(&old);
        let ctx = ValidationContext {
            calendar: self.calendar.as_ref(),
            available_vacation_minutes: contract.vacation_minutes + old_vacation,
        };
        let warnings = run_chain(&updated, &ctx)?;

        self.sheets.update_entry(&updated)?;
        let delta = old_vacation - vacation_minutes_of(&updated);
        if delta != 0 {
            self.contracts
                .adjust_vacation_minutes(&updated.username, delta)?;
        }
        self.accounting.recalculate_with_cascade(&sheet, &contract)?;

        info!(
            username = %updated.username,
            entry_id = %updated.id,
            duration = updated.duration_minutes(),
            "Entry updated"
        );
        Ok(Outcome::with_warnings(updated, warnings))
    }

    /// Deletes an entry, refunding consumed vacation and recalculating.
    ///
    /// A ledger update that fails after the deletion has been committed does
    /// not undo the deletion; the inconsistency is appended as a warning on
    /// the successful outcome.
    pub fn delete_entry(&self, id: Uuid) -> EngineResult<Outcome<()>> {
        let entry = self
            .sheets
            .entry_by_id(id)?
            .ok_or(EngineError::EntryNotFound { id })?;
        let sheet = self.owning_sheet(&entry)?;
        self.check_mutable(&sheet, "delete entries of")?;

        self.sheets.delete_entry(id)?;

        let mut warnings = Vec::new();
        let refund = vacation_minutes_of(&entry);
        if refund != 0 {
            if let Err(err) = self
                .contracts
                .adjust_vacation_minutes(&entry.username, refund)
            {
                warn!(username = %entry.username, error = %err, "Vacation refund failed after deletion");
                warnings.push(ledger_warning(&err));
            }
        }
        match self.load_contract(&entry.username) {
            Ok(contract) => {
                if let Err(err) = self.accounting.recalculate_with_cascade(&sheet, &contract) {
                    warn!(username = %entry.username, error = %err, "Recalculation failed after deletion");
                    warnings.push(ledger_warning(&err));
                }
            }
            Err(err) => warnings.push(ledger_warning(&err)),
        }

        info!(
            username = %entry.username,
            entry_id = %entry.id,
            warnings = warnings.len(),
            "Entry deleted"
        );
        Ok(Outcome::with_warnings((), warnings))
    }

    // ------------------------------------------------------------------
    // Timesheet lifecycle
    // ------------------------------------------------------------------

    /// Returns the user's timesheet for (month, year), creating it if absent.
    ///
    /// Creation grants the monthly vacation minutes to the contract and
    /// seeds the month's overtime ledger.
    pub fn ensure_timesheet(
        &self,
        username: &str,
        month: u32,
        year: i32,
    ) -> EngineResult<Timesheet> {
        let contract = self.load_contract(username)?;
        self.ensure_timesheet_for(&contract, month, year)
    }

    fn ensure_timesheet_for(
        &self,
        contract: &Contract,
        month: u32,
        year: i32,
    ) -> EngineResult<Timesheet> {
        if let Some(sheet) = self
            .sheets
            .timesheet_for_month(&contract.username, month, year)?
        {
            return Ok(sheet);
        }

        self.check_month_bounds(contract, month, year)?;

        let grant = monthly_vacation_grant_minutes(contract.monthly_hours);
        let sheet = Timesheet::new(&contract.username, month, year, grant, self.clock.now());
        self.sheets.insert_timesheet(&sheet)?;
        self.contracts
            .adjust_vacation_minutes(&contract.username, grant)?;
        self.accounting.recalculate_with_cascade(&sheet, contract)?;

        info!(
            username = %contract.username,
            month,
            year,
            vacation_grant = grant,
            "Timesheet created"
        );
        self.sheets
            .timesheet_by_id(sheet.id)?
            .ok_or(EngineError::Persistence {
                message: format!("timesheet {} vanished after creation", sheet.id),
            })
    }

    /// Deletes all of a user's timesheets and entries, reversing the ledgers.
    ///
    /// Part of user deletion: every month's vacation grant is taken back,
    /// consumed vacation is refunded, and the contract's overtime balance is
    /// re-mirrored from the remaining (none) timesheets.
    pub fn delete_user_data(&self, username: &str) -> EngineResult<()> {
        let contract = self.load_contract(username)?;
        for sheet in self.sheets.timesheets_for_user(username)? {
            let entries = self.sheets.entries_for_timesheet(sheet.id)?;
            let consumed: i64 = entries.iter().map(vacation_minutes_of).sum();
            let grant = monthly_vacation_grant_minutes(contract.monthly_hours);

            self.sheets.delete_entries_for_timesheet(sheet.id)?;
            self.sheets.delete_timesheet(sheet.id)?;
            // refund what the month's entries consumed, take back its grant
            self.contracts
                .adjust_vacation_minutes(username, consumed - grant)?;

            info!(username, month = sheet.month, year = sheet.year, "Timesheet deleted");
        }
        self.accounting.mirror_contract_overtime(username)
    }

    // ------------------------------------------------------------------
    // Approval workflow
    // ------------------------------------------------------------------

    /// Signs a timesheet, submitting it for approval.
    ///
    /// Guards, in order: source state, stored employee signature, recorded
    /// total of at least 80% of the contracted weekly minutes, all prior
    /// months complete, weekly cap. On success the supervisor is notified;
    /// a failed notification is surfaced as a warning, not an error.
    pub fn sign(&self, username: &str, month: u32, year: i32) -> EngineResult<Outcome<Timesheet>> {
        let contract = self.load_contract(username)?;
        let mut sheet = self.load_sheet(username, month, year)?;
        let now = self.clock.now();
        sheet.sign(now)?;

        if !self
            .signatures
            .has_signature(username, SignatureKind::Employee)?
        {
            return Err(EngineError::SignatureMissing {
                username: username.to_string(),
                kind: SignatureKind::Employee.as_str(),
            });
        }

        let threshold = contract.weekly_minutes() * Decimal::new(8, 1);
        if Decimal::from(sheet.total_minutes) < threshold {
            return Err(EngineError::Validation {
                rule: "minimum_total_time",
                message: format!(
                    "recorded {} minutes are below 80% of the contracted weekly {} minutes",
                    sheet.total_minutes,
                    contract.weekly_minutes()
                ),
            });
        }

        let prior: Vec<Timesheet> = self
            .sheets
            .timesheets_for_user(username)?
            .into_iter()
            .filter(|s| (s.year, s.month) < (year, month))
            .collect();
        check_prior_timesheets(&prior)?;

        let entries = self.sheets.entries_for_timesheet(sheet.id)?;
        check_weekly_hours(&entries, self.settings.weekly_cap_minutes)?;

        self.sheets.update_status(sheet.id, sheet.status, now)?;
        info!(username, month, year, "Timesheet signed");

        let warnings = self.dispatch(
            &contract.supervisor,
            NotificationKind::TimesheetSigned,
            &format!("{} signed the timesheet for {}/{}", username, month, year),
        );
        Ok(Outcome::with_warnings(sheet, warnings))
    }

    /// Approves a signed timesheet, completing the month.
    ///
    /// Requires a stored supervisor signature. Once complete, the month's
    /// ledger is frozen.
    pub fn approve(
        &self,
        username: &str,
        month: u32,
        year: i32,
    ) -> EngineResult<Outcome<Timesheet>> {
        let contract = self.load_contract(username)?;
        let mut sheet = self.load_sheet(username, month, year)?;
        let now = self.clock.now();
        sheet.approve(now)?;

        if !self
            .signatures
            .has_signature(&contract.supervisor, SignatureKind::Supervisor)?
        {
            return Err(EngineError::SignatureMissing {
                username: contract.supervisor.clone(),
                kind: SignatureKind::Supervisor.as_str(),
            });
        }

        self.sheets.update_status(sheet.id, sheet.status, now)?;
        info!(username, month, year, "Timesheet approved");

        let warnings = self.dispatch(
            username,
            NotificationKind::TimesheetApproved,
            &format!("your timesheet for {}/{} was approved", month, year),
        );
        Ok(Outcome::with_warnings(sheet, warnings))
    }

    /// Sends a timesheet back to the employee for changes.
    pub fn request_change(
        &self,
        username: &str,
        month: u32,
        year: i32,
        message: &str,
    ) -> EngineResult<Outcome<Timesheet>> {
        let mut sheet = self.load_sheet(username, month, year)?;
        let now = self.clock.now();
        sheet.request_change(now)?;

        self.sheets.update_status(sheet.id, sheet.status, now)?;
        info!(username, month, year, "Changes requested");

        let warnings = self.dispatch(username, NotificationKind::ChangeRequested, message);
        Ok(Outcome::with_warnings(sheet, warnings))
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn load_contract(&self, username: &str) -> EngineResult<Contract> {
        self.contracts
            .contract(username)?
            .ok_or_else(|| EngineError::ContractNotFound {
                username: username.to_string(),
            })
    }

    fn load_sheet(&self, username: &str, month: u32, year: i32) -> EngineResult<Timesheet> {
        self.sheets
            .timesheet_for_month(username, month, year)?
            .ok_or_else(|| EngineError::TimesheetNotFound {
                username: username.to_string(),
                month,
                year,
            })
    }

    fn owning_sheet(&self, entry: &TimeEntry) -> EngineResult<Timesheet> {
        self.sheets
            .timesheet_by_id(entry.timesheet_id)?
            .ok_or_else(|| EngineError::Persistence {
                message: format!("timesheet {} of entry {} is missing", entry.timesheet_id, entry.id),
            })
    }

    fn check_mutable(&self, sheet: &Timesheet, operation: &'static str) -> EngineResult<()> {
        if sheet.status.allows_entry_mutation() {
            Ok(())
        } else {
            Err(EngineError::StateConflict {
                operation,
                status: sheet.status.as_str().to_string(),
            })
        }
    }

    fn check_month_bounds(&self, contract: &Contract, month: u32, year: i32) -> EngineResult<()> {
        let today = self.clock.today();
        if (year, month) > (today.year(), today.month()) {
            return Err(EngineError::InvalidMonth {
                month,
                year,
                message: "the month lies in the future".to_string(),
            });
        }
        let start = contract.start_date;
        if (year, month) < (start.year(), start.month()) {
            return Err(EngineError::InvalidMonth {
                month,
                year,
                message: format!(
                    "the month precedes the employment start in {}/{}",
                    start.month(),
                    start.year()
                ),
            });
        }
        Ok(())
    }

    fn dispatch(
        &self,
        receiver: &str,
        kind: NotificationKind,
        message: &str,
    ) -> Vec<EngineWarning> {
        match self.notifications.notify(receiver, kind, message) {
            Ok(()) => Vec::new(),
            Err(err) => {
                warn!(receiver, error = %err, "Notification dispatch failed");
                vec![EngineWarning {
                    kind: WarningKind::NotificationFailed,
                    source: "notification".to_string(),
                    message: err.to_string(),
                }]
            }
        }
    }
}

/// Rejects spans that cannot produce a positive worked duration.
///
/// The break of a work entry must be non-negative and strictly shorter than
/// the span, otherwise `duration_minutes()` would go to zero or negative and
/// corrupt the ledgers downstream.
fn check_span(start: NaiveDateTime, end: NaiveDateTime, details: &EntryDetails) -> EngineResult<()> {
    if start >= end {
        return Err(EngineError::InvalidEntry {
            message: "the entry must end after it starts".to_string(),
        });
    }
    if let EntryDetails::Work { break_minutes, .. } = details {
        if *break_minutes < 0 {
            return Err(EngineError::InvalidEntry {
                message: "the break cannot be negative".to_string(),
            });
        }
        let span = (end - start).num_minutes();
        if *break_minutes >= span {
            return Err(EngineError::InvalidEntry {
                message: format!(
                    "a break of {} minutes leaves no worked time in a {} minute span",
                    break_minutes, span
                ),
            });
        }
    }
    Ok(())
}

fn vacation_minutes_of(entry: &TimeEntry) -> i64 {
    match entry.kind() {
        EntryKind::Vacation => entry.duration_minutes(),
        EntryKind::Work => 0,
    }
}

fn ledger_warning(err: &EngineError) -> EngineWarning {
    EngineWarning {
        kind: WarningKind::LedgerInconsistency,
        source: "accounting".to_string(),
        message: err.to_string(),
    }
}
