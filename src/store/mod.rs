//! Collaborator contracts of the engine.
//!
//! The engine never talks to a database, mail server or file store directly;
//! it is handed implementations of the traits in this module at construction
//! time. The in-memory implementations in [`memory`] back the test suite and
//! document the expected store semantics (uniqueness enforcement, atomic
//! ledger adjustment).

pub mod memory;

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{Contract, TimeEntry, Timesheet, TimesheetStatus};

/// The kind of a stored signature asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureKind {
    /// The employee's signature, required to sign a timesheet.
    Employee,
    /// The supervisor's signature, required to approve one.
    Supervisor,
}

impl SignatureKind {
    /// Returns the kind's name as used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureKind::Employee => "employee",
            SignatureKind::Supervisor => "supervisor",
        }
    }
}

/// The kind of a dispatched notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// A timesheet was signed and awaits the supervisor's decision.
    TimesheetSigned,
    /// A timesheet was approved.
    TimesheetApproved,
    /// The supervisor requested changes on a timesheet.
    ChangeRequested,
}

/// Persistence for timesheets and their entries.
///
/// Implementations must enforce the one-entry-per-user-per-day constraint in
/// [`insert_entry`](TimesheetStore::insert_entry) and
/// [`update_entry`](TimesheetStore::update_entry) (returning
/// [`EngineError::EntryDayConflict`](crate::error::EngineError::EntryDayConflict)),
/// so two concurrent creations cannot race past an application-level check.
pub trait TimesheetStore: Send + Sync {
    /// Persists a new timesheet.
    fn insert_timesheet(&self, sheet: &Timesheet) -> EngineResult<()>;

    /// Looks a timesheet up by id.
    fn timesheet_by_id(&self, id: Uuid) -> EngineResult<Option<Timesheet>>;

    /// Looks a timesheet up by its unique (username, month, year) key.
    fn timesheet_for_month(
        &self,
        username: &str,
        month: u32,
        year: i32,
    ) -> EngineResult<Option<Timesheet>>;

    /// Returns all of a user's timesheets in chronological order.
    fn timesheets_for_user(&self, username: &str) -> EngineResult<Vec<Timesheet>>;

    /// Returns a user's timesheets with the given status, chronological.
    fn timesheets_with_status(
        &self,
        username: &str,
        status: TimesheetStatus,
    ) -> EngineResult<Vec<Timesheet>>;

    /// Atomically updates a timesheet's status and status-change timestamp.
    fn update_status(
        &self,
        id: Uuid,
        status: TimesheetStatus,
        at: NaiveDateTime,
    ) -> EngineResult<()>;

    /// Atomically updates a timesheet's ledger fields.
    fn update_ledgers(
        &self,
        id: Uuid,
        total_minutes: i64,
        vacation_minutes: i64,
        overtime_minutes: i64,
    ) -> EngineResult<()>;

    /// Deletes a timesheet record. Entries are deleted separately via
    /// [`delete_entries_for_timesheet`](TimesheetStore::delete_entries_for_timesheet).
    fn delete_timesheet(&self, id: Uuid) -> EngineResult<()>;

    /// Persists a new entry, enforcing day uniqueness per user.
    fn insert_entry(&self, entry: &TimeEntry) -> EngineResult<()>;

    /// Looks an entry up by id.
    fn entry_by_id(&self, id: Uuid) -> EngineResult<Option<TimeEntry>>;

    /// Returns all entries of a timesheet, ordered by start time.
    fn entries_for_timesheet(&self, timesheet_id: Uuid) -> EngineResult<Vec<TimeEntry>>;

    /// Returns the user's entry on the given calendar day, if any.
    fn entry_for_day(&self, username: &str, day: NaiveDate) -> EngineResult<Option<TimeEntry>>;

    /// Replaces a stored entry, enforcing day uniqueness per user.
    fn update_entry(&self, entry: &TimeEntry) -> EngineResult<()>;

    /// Deletes a single entry.
    fn delete_entry(&self, id: Uuid) -> EngineResult<()>;

    /// Deletes all entries of a timesheet (timesheet-deletion cascade).
    fn delete_entries_for_timesheet(&self, timesheet_id: Uuid) -> EngineResult<()>;
}

/// Access to the contract fields of the user aggregate.
///
/// Ledger mutation goes through atomic adjust/set primitives rather than
/// read-modify-write on a fetched [`Contract`], so concurrent mutations
/// cannot lose updates.
pub trait ContractStore: Send + Sync {
    /// Fetches a user's contract fields.
    fn contract(&self, username: &str) -> EngineResult<Option<Contract>>;

    /// Atomically adds `delta` to the vacation balance, returning the new
    /// balance.
    fn adjust_vacation_minutes(&self, username: &str, delta: i64) -> EngineResult<i64>;

    /// Atomically sets the overtime balance.
    fn set_overtime_minutes(&self, username: &str, minutes: i64) -> EngineResult<()>;
}

/// Existence checks for stored signature assets.
pub trait SignatureStore: Send + Sync {
    /// Whether a signature of the given kind is stored for the user.
    fn has_signature(&self, username: &str, kind: SignatureKind) -> EngineResult<bool>;
}

/// Fire-and-forget notification dispatch.
///
/// A failed notification never rolls back the state change that triggered
/// it; the engine surfaces the failure as a warning on the outcome.
pub trait NotificationSink: Send + Sync {
    /// Delivers a notification to the receiver.
    fn notify(&self, receiver: &str, kind: NotificationKind, message: &str) -> EngineResult<()>;
}

/// Region-specific public holiday lookup.
pub trait HolidayCalendar: Send + Sync {
    /// Returns the holiday's name if the date is a public holiday.
    fn holiday_name(&self, date: NaiveDate) -> Option<String>;
}

/// Wall-clock source, injectable for tests.
pub trait Clock: Send + Sync {
    /// The current local date and time.
    fn now(&self) -> NaiveDateTime;

    /// The current calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// The production clock, backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}
