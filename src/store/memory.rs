//! In-memory collaborator implementations.
//!
//! These back the test suite and serve as the reference implementation of
//! the store contracts: day uniqueness is enforced inside the entry writes,
//! ledger adjustments are atomic under the store's lock, and all reads
//! return owned copies. Each store can be switched into a failing mode to
//! exercise persistence-failure paths.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Contract, TimeEntry, Timesheet, TimesheetStatus};

use super::{
    Clock, ContractStore, HolidayCalendar, NotificationKind, NotificationSink, SignatureKind,
    SignatureStore, TimesheetStore,
};

#[derive(Debug, Default)]
struct StoreInner {
    sheets: HashMap<Uuid, Timesheet>,
    entries: HashMap<Uuid, TimeEntry>,
}

/// In-memory timesheet and entry store.
///
/// A single `RwLock` guards both maps, so every mutation is serialized and
/// the uniqueness check inside [`insert_entry`](TimesheetStore::insert_entry)
/// cannot race a concurrent write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail with a persistence error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> EngineResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(EngineError::Persistence {
                message: "timesheet store unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn day_conflict(inner: &StoreInner, entry: &TimeEntry) -> bool {
        inner
            .entries
            .values()
            .any(|e| e.id != entry.id && e.username == entry.username && e.day() == entry.day())
    }
}

impl TimesheetStore for MemoryStore {
    fn insert_timesheet(&self, sheet: &Timesheet) -> EngineResult<()> {
        self.check_writable()?;
        let mut inner = self.inner.write().unwrap();
        if inner.sheets.values().any(|s| {
            s.username == sheet.username && s.month == sheet.month && s.year == sheet.year
        }) {
            return Err(EngineError::Persistence {
                message: format!(
                    "timesheet for '{}' in {}/{} already exists",
                    sheet.username, sheet.month, sheet.year
                ),
            });
        }
        inner.sheets.insert(sheet.id, sheet.clone());
        Ok(())
    }

    fn timesheet_by_id(&self, id: Uuid) -> EngineResult<Option<Timesheet>> {
        Ok(self.inner.read().unwrap().sheets.get(&id).cloned())
    }

    fn timesheet_for_month(
        &self,
        username: &str,
        month: u32,
        year: i32,
    ) -> EngineResult<Option<Timesheet>> {
        Ok(self
            .inner
            .read()
            .unwrap()
            .sheets
            .values()
            .find(|s| s.username == username && s.month == month && s.year == year)
            .cloned())
    }

    fn timesheets_for_user(&self, username: &str) -> EngineResult<Vec<Timesheet>> {
        let mut sheets: Vec<Timesheet> = self
            .inner
            .read()
            .unwrap()
            .sheets
            .values()
            .filter(|s| s.username == username)
            .cloned()
            .collect();
        sheets.sort_by_key(|s| (s.year, s.month));
        Ok(sheets)
    }

    fn timesheets_with_status(
        &self,
        username: &str,
        status: TimesheetStatus,
    ) -> EngineResult<Vec<Timesheet>> {
        let mut sheets = self.timesheets_for_user(username)?;
        sheets.retain(|s| s.status == status);
        Ok(sheets)
    }

    fn update_status(
        &self,
        id: Uuid,
        status: TimesheetStatus,
        at: NaiveDateTime,
    ) -> EngineResult<()> {
        self.check_writable()?;
        let mut inner = self.inner.write().unwrap();
        let sheet = inner
            .sheets
            .get_mut(&id)
            .ok_or_else(|| EngineError::Persistence {
                message: format!("status update for unknown timesheet {}", id),
            })?;
        sheet.status = status;
        sheet.last_status_change = at;
        Ok(())
    }

    fn update_ledgers(
        &self,
        id: Uuid,
        total_minutes: i64,
        vacation_minutes: i64,
        overtime_minutes: i64,
    ) -> EngineResult<()> {
        self.check_writable()?;
        let mut inner = self.inner.write().unwrap();
        let sheet = inner
            .sheets
            .get_mut(&id)
            .ok_or_else(|| EngineError::Persistence {
                message: format!("ledger update for unknown timesheet {}", id),
            })?;
        sheet.total_minutes = total_minutes;
        sheet.vacation_minutes = vacation_minutes;
        sheet.overtime_minutes = overtime_minutes;
        Ok(())
    }

    fn delete_timesheet(&self, id: Uuid) -> EngineResult<()> {
        self.check_writable()?;
        self.inner.write().unwrap().sheets.remove(&id);
        Ok(())
    }

    fn insert_entry(&self, entry: &TimeEntry) -> EngineResult<()> {
        self.check_writable()?;
        let mut inner = self.inner.write().unwrap();
        if Self::day_conflict(&inner, entry) {
            return Err(EngineError::EntryDayConflict {
                username: entry.username.clone(),
                date: entry.day(),
            });
        }
        inner.entries.insert(entry.id, entry.clone());
        Ok(())
    }

    fn entry_by_id(&self, id: Uuid) -> EngineResult<Option<TimeEntry>> {
        Ok(self.inner.read().unwrap().entries.get(&id).cloned())
    }

    fn entries_for_timesheet(&self, timesheet_id: Uuid) -> EngineResult<Vec<TimeEntry>> {
        let mut entries: Vec<TimeEntry> = self
            .inner
            .read()
            .unwrap()
            .entries
            .values()
            .filter(|e| e.timesheet_id == timesheet_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.start);
        Ok(entries)
    }

    fn entry_for_day(&self, username: &str, day: NaiveDate) -> EngineResult<Option<TimeEntry>> {
        Ok(self
            .inner
            .read()
            .unwrap()
            .entries
            .values()
            .find(|e| e.username == username && e.day() == day)
            .cloned())
    }

    fn update_entry(&self, entry: &TimeEntry) -> EngineResult<()> {
        self.check_writable()?;
        let mut inner = self.inner.write().unwrap();
        if !inner.entries.contains_key(&entry.id) {
            return Err(EngineError::EntryNotFound { id: entry.id });
        }
        if Self::day_conflict(&inner, entry) {
            return Err(EngineError::EntryDayConflict {
                username: entry.username.clone(),
                date: entry.day(),
            });
        }
        inner.entries.insert(entry.id, entry.clone());
        Ok(())
    }

    fn delete_entry(&self, id: Uuid) -> EngineResult<()> {
        self.check_writable()?;
        self.inner.write().unwrap().entries.remove(&id);
        Ok(())
    }

    fn delete_entries_for_timesheet(&self, timesheet_id: Uuid) -> EngineResult<()> {
        self.check_writable()?;
        self.inner
            .write()
            .unwrap()
            .entries
            .retain(|_, e| e.timesheet_id != timesheet_id);
        Ok(())
    }
}

/// In-memory contract store with atomic ledger primitives.
#[derive(Debug, Default)]
pub struct MemoryContracts {
    contracts: RwLock<HashMap<String, Contract>>,
    fail_mutations: AtomicBool,
}

impl MemoryContracts {
    /// Creates an empty contract store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores (or replaces) a contract.
    pub fn put(&self, contract: Contract) {
        self.contracts
            .write()
            .unwrap()
            .insert(contract.username.clone(), contract);
    }

    /// Makes every subsequent ledger mutation fail.
    pub fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    fn check_mutable(&self) -> EngineResult<()> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(EngineError::Persistence {
                message: "contract store unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl ContractStore for MemoryContracts {
    fn contract(&self, username: &str) -> EngineResult<Option<Contract>> {
        Ok(self.contracts.read().unwrap().get(username).cloned())
    }

    fn adjust_vacation_minutes(&self, username: &str, delta: i64) -> EngineResult<i64> {
        self.check_mutable()?;
        let mut contracts = self.contracts.write().unwrap();
        let contract = contracts
            .get_mut(username)
            .ok_or_else(|| EngineError::ContractNotFound {
                username: username.to_string(),
            })?;
        contract.vacation_minutes += delta;
        Ok(contract.vacation_minutes)
    }

    fn set_overtime_minutes(&self, username: &str, minutes: i64) -> EngineResult<()> {
        self.check_mutable()?;
        let mut contracts = self.contracts.write().unwrap();
        let contract = contracts
            .get_mut(username)
            .ok_or_else(|| EngineError::ContractNotFound {
                username: username.to_string(),
            })?;
        contract.overtime_minutes = minutes;
        Ok(())
    }
}

/// In-memory signature asset store.
#[derive(Debug, Default)]
pub struct MemorySignatures {
    assets: RwLock<HashSet<(String, SignatureKind)>>,
}

impl MemorySignatures {
    /// Creates an empty signature store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a signature asset for the user.
    pub fn add(&self, username: &str, kind: SignatureKind) {
        self.assets
            .write()
            .unwrap()
            .insert((username.to_string(), kind));
    }
}

impl SignatureStore for MemorySignatures {
    fn has_signature(&self, username: &str, kind: SignatureKind) -> EngineResult<bool> {
        Ok(self
            .assets
            .read()
            .unwrap()
            .contains(&(username.to_string(), kind)))
    }
}

/// A dispatched notification captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    /// The receiving username.
    pub receiver: String,
    /// The notification kind.
    pub kind: NotificationKind,
    /// The message body.
    pub message: String,
}

/// Notification sink that records every dispatch for assertions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<SentNotification>>,
    fail: AtomicBool,
}

impl RecordingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent dispatch fail.
    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Returns all notifications sent so far.
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, receiver: &str, kind: NotificationKind, message: &str) -> EngineResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(EngineError::Persistence {
                message: "notification sink unavailable".to_string(),
            });
        }
        self.sent.lock().unwrap().push(SentNotification {
            receiver: receiver.to_string(),
            kind,
            message: message.to_string(),
        });
        Ok(())
    }
}

/// Holiday calendar backed by a fixed date set.
#[derive(Debug, Default)]
pub struct StaticHolidayCalendar {
    holidays: HashMap<NaiveDate, String>,
}

impl StaticHolidayCalendar {
    /// Creates a calendar from (date, name) pairs.
    pub fn new<I, S>(holidays: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, S)>,
        S: Into<String>,
    {
        Self {
            holidays: holidays
                .into_iter()
                .map(|(d, n)| (d, n.into()))
                .collect(),
        }
    }

    /// Creates a calendar with no holidays.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl HolidayCalendar for StaticHolidayCalendar {
    fn holiday_name(&self, date: NaiveDate) -> Option<String> {
        self.holidays.get(&date).cloned()
    }
}

/// A clock pinned to a fixed instant, for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    /// Creates a clock that always reports the given instant.
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }
}
