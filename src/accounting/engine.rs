//! Ledger recalculation and the cross-month cascade.

use std::sync::Arc;

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{Contract, EntryKind, Timesheet, TimesheetStatus};
use crate::store::{ContractStore, TimesheetStore};

use super::{monthly_vacation_grant_minutes, next_month, prev_month};

/// How many months a recalculation propagates forward.
///
/// The walk stops early at a missing month or a `COMPLETE` timesheet; the
/// bound keeps a handful of trailing months consistent without unbounded
/// retroactive recomputation.
pub const CASCADE_BOUND: usize = 4;

/// Recomputes the per-month ledgers after entry mutations.
///
/// The engine re-sums `total_minutes` and the vacation balance over the
/// sheet's current entries (idempotent), recomputes overtime from the
/// previous month's carry, and walks the cascade forward. The contract's
/// overtime balance mirrors the chronologically latest sheet afterwards.
pub struct AccountingEngine {
    sheets: Arc<dyn TimesheetStore>,
    contracts: Arc<dyn ContractStore>,
}

impl AccountingEngine {
    /// Creates an engine over the given stores.
    pub fn new(sheets: Arc<dyn TimesheetStore>, contracts: Arc<dyn ContractStore>) -> Self {
        Self { sheets, contracts }
    }

    /// Recalculates one timesheet's ledgers.
    ///
    /// `COMPLETE` timesheets are frozen: recalculating one is an explicit
    /// state conflict, never a silent no-op.
    ///
    /// # Errors
    ///
    /// [`EngineError::StateConflict`] for a complete sheet; persistence
    /// errors from the store.
    pub fn recalculate(&self, sheet: &Timesheet, contract: &Contract) -> EngineResult<()> {
        if sheet.status == TimesheetStatus::Complete {
            return Err(EngineError::StateConflict {
                operation: "recalculate",
                status: sheet.status.as_str().to_string(),
            });
        }

        let entries = self.sheets.entries_for_timesheet(sheet.id)?;
        let total_minutes: i64 = entries.iter().map(|e| e.duration_minutes()).sum();
        let consumed_vacation: i64 = entries
            .iter()
            .filter(|e| e.kind() == EntryKind::Vacation)
            .map(|e| e.duration_minutes())
            .sum();
        let vacation_minutes =
            monthly_vacation_grant_minutes(contract.monthly_hours) - consumed_vacation;

        let (prev_m, prev_y) = prev_month(sheet.month, sheet.year);
        let carry = self
            .sheets
            .timesheet_for_month(&sheet.username, prev_m, prev_y)?
            .map(|prev| prev.overtime_minutes)
            .unwrap_or(0);
        let overtime_minutes = total_minutes - contract.monthly_minutes() + carry;

        debug!(
            username = %sheet.username,
            month = sheet.month,
            year = sheet.year,
            total_minutes,
            overtime_minutes,
            "Recalculated timesheet ledgers"
        );

        self.sheets
            .update_ledgers(sheet.id, total_minutes, vacation_minutes, overtime_minutes)
    }

    /// Recalculates a timesheet and cascades forward.
    ///
    /// Walks up to [`CASCADE_BOUND`] consecutive months after the given one,
    /// recalculating each existing sheet and stopping at a gap or a
    /// `COMPLETE` month. Convergence beyond the bound is not guaranteed.
    pub fn recalculate_with_cascade(
        &self,
        sheet: &Timesheet,
        contract: &Contract,
    ) -> EngineResult<()> {
        self.recalculate(sheet, contract)?;

        let (mut month, mut year) = (sheet.month, sheet.year);
        for _ in 0..CASCADE_BOUND {
            (month, year) = next_month(month, year);
            let Some(next) = self
                .sheets
                .timesheet_for_month(&sheet.username, month, year)?
            else {
                break;
            };
            if next.status == TimesheetStatus::Complete {
                break;
            }
            self.recalculate(&next, contract)?;
        }

        self.mirror_contract_overtime(&sheet.username)
    }

    /// Sets the contract's overtime balance to the latest sheet's value.
    pub fn mirror_contract_overtime(&self, username: &str) -> EngineResult<()> {
        let latest = self
            .sheets
            .timesheets_for_user(username)?
            .last()
            .map(|s| s.overtime_minutes)
            .unwrap_or(0);
        self.contracts.set_overtime_minutes(username, latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntryDetails, TimeEntry};
    use crate::store::memory::{MemoryContracts, MemoryStore};
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn contract() -> Contract {
        Contract {
            username: "hmuster".to_string(),
            supervisor: "pdoe".to_string(),
            weekly_hours: Decimal::from(10),
            monthly_hours: Decimal::from(40),
            hourly_wage: Decimal::from(12),
            vacation_minutes: 0,
            overtime_minutes: 0,
            start_date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
        }
    }

    fn setup() -> (Arc<MemoryStore>, Arc<MemoryContracts>, AccountingEngine) {
        let store = Arc::new(MemoryStore::new());
        let contracts = Arc::new(MemoryContracts::new());
        contracts.put(contract());
        let engine = AccountingEngine::new(store.clone(), contracts.clone());
        (store, contracts, engine)
    }

    fn insert_sheet(store: &MemoryStore, month: u32, year: i32) -> Timesheet {
        let sheet = Timesheet::new(
            "hmuster",
            month,
            year,
            180,
            make_datetime("2026-04-01", "09:00:00"),
        );
        store.insert_timesheet(&sheet).unwrap();
        sheet
    }

    fn insert_work(store: &MemoryStore, sheet: &Timesheet, date: &str, hours: u32) {
        let entry = TimeEntry {
            id: Uuid::new_v4(),
            timesheet_id: sheet.id,
            username: sheet.username.clone(),
            start: make_datetime(date, "08:00:00"),
            end: make_datetime(date, &format!("{:02}:00:00", 8 + hours)),
            details: EntryDetails::Work {
                break_minutes: 0,
                activity: "tutoring".to_string(),
                project: "algorithms".to_string(),
            },
        };
        store.insert_entry(&entry).unwrap();
    }

    #[test]
    fn test_recalculate_sums_totals_and_overtime() {
        let (store, _, engine) = setup();
        let sheet = insert_sheet(&store, 3, 2026);
        insert_work(&store, &sheet, "2026-03-09", 8);
        insert_work(&store, &sheet, "2026-03-10", 8);

        engine.recalculate(&sheet, &contract()).unwrap();

        let updated = store.timesheet_by_id(sheet.id).unwrap().unwrap();
        assert_eq!(updated.total_minutes, 960);
        // 960 worked - 2400 contracted, no carry
        assert_eq!(updated.overtime_minutes, -1440);
        // untouched vacation grant for a 40h contract
        assert_eq!(updated.vacation_minutes, 180);
    }

    #[test]
    fn test_recalculate_subtracts_consumed_vacation() {
        let (store, _, engine) = setup();
        let sheet = insert_sheet(&store, 3, 2026);
        let entry = TimeEntry {
            id: Uuid::new_v4(),
            timesheet_id: sheet.id,
            username: "hmuster".to_string(),
            start: make_datetime("2026-03-09", "08:00:00"),
            end: make_datetime("2026-03-09", "09:00:00"),
            details: EntryDetails::Vacation,
        };
        store.insert_entry(&entry).unwrap();

        engine.recalculate(&sheet, &contract()).unwrap();

        let updated = store.timesheet_by_id(sheet.id).unwrap().unwrap();
        assert_eq!(updated.vacation_minutes, 120); // 180 grant - 60 consumed
        assert_eq!(updated.total_minutes, 60);
    }

    #[test]
    fn test_recalculate_carries_previous_month_overtime() {
        let (store, _, engine) = setup();
        let feb = insert_sheet(&store, 2, 2026);
        insert_work(&store, &feb, "2026-02-09", 9);
        engine.recalculate(&feb, &contract()).unwrap();
        let feb_overtime = store
            .timesheet_by_id(feb.id)
            .unwrap()
            .unwrap()
            .overtime_minutes;
        assert_eq!(feb_overtime, 540 - 2400);

        let mar = insert_sheet(&store, 3, 2026);
        insert_work(&store, &mar, "2026-03-09", 8);
        engine.recalculate(&mar, &contract()).unwrap();
        let mar_sheet = store.timesheet_by_id(mar.id).unwrap().unwrap();
        assert_eq!(mar_sheet.overtime_minutes, 480 - 2400 + feb_overtime);
    }

    #[test]
    fn test_recalculate_complete_sheet_is_a_conflict_and_leaves_totals_alone() {
        let (store, _, engine) = setup();
        let mut sheet = insert_sheet(&store, 3, 2026);
        store.update_ledgers(sheet.id, 1234, 180, -100).unwrap();
        store
            .update_status(
                sheet.id,
                TimesheetStatus::Complete,
                make_datetime("2026-04-01", "10:00:00"),
            )
            .unwrap();
        sheet.status = TimesheetStatus::Complete;

        let err = engine.recalculate(&sheet, &contract()).unwrap_err();
        assert!(matches!(err, EngineError::StateConflict { .. }));

        let stored = store.timesheet_by_id(sheet.id).unwrap().unwrap();
        assert_eq!(stored.total_minutes, 1234);
        assert_eq!(stored.overtime_minutes, -100);
    }

    #[test]
    fn test_cascade_propagates_forward_and_stops_at_complete() {
        let (store, _, engine) = setup();
        let jan = insert_sheet(&store, 1, 2026);
        let feb = insert_sheet(&store, 2, 2026);
        let mar = insert_sheet(&store, 3, 2026);
        store
            .update_status(
                mar.id,
                TimesheetStatus::Complete,
                make_datetime("2026-04-01", "10:00:00"),
            )
            .unwrap();
        insert_work(&store, &jan, "2026-01-05", 10);
        insert_work(&store, &feb, "2026-02-05", 10);

        engine.recalculate_with_cascade(&jan, &contract()).unwrap();

        let jan_overtime = store
            .timesheet_by_id(jan.id)
            .unwrap()
            .unwrap()
            .overtime_minutes;
        let feb_sheet = store.timesheet_by_id(feb.id).unwrap().unwrap();
        assert_eq!(jan_overtime, 600 - 2400);
        // February picked up January's carry through the cascade
        assert_eq!(feb_sheet.overtime_minutes, 600 - 2400 + jan_overtime);
        // March was complete and untouched
        let mar_sheet = store.timesheet_by_id(mar.id).unwrap().unwrap();
        assert_eq!(mar_sheet.overtime_minutes, 0);
    }

    #[test]
    fn test_cascade_stops_at_missing_month() {
        let (store, _, engine) = setup();
        let jan = insert_sheet(&store, 1, 2026);
        // no February; April exists but is out of reach through the gap
        let apr = insert_sheet(&store, 4, 2026);
        insert_work(&store, &jan, "2026-01-05", 10);
        insert_work(&store, &apr, "2026-04-06", 10);

        engine.recalculate_with_cascade(&jan, &contract()).unwrap();

        let apr_sheet = store.timesheet_by_id(apr.id).unwrap().unwrap();
        assert_eq!(apr_sheet.total_minutes, 0, "gap must stop the cascade");
    }

    #[test]
    fn test_cascade_is_bounded() {
        let (store, _, engine) = setup();
        let start = insert_sheet(&store, 1, 2026);
        let mut sheets = vec![start.clone()];
        for month in 2..=6 {
            sheets.push(insert_sheet(&store, month, 2026));
        }
        insert_work(&store, &start, "2026-01-05", 10);

        engine.recalculate_with_cascade(&start, &contract()).unwrap();

        // months 2-5 were recalculated (carry applied), month 6 was not
        let may = store.timesheet_by_id(sheets[4].id).unwrap().unwrap();
        let june = store.timesheet_by_id(sheets[5].id).unwrap().unwrap();
        assert_ne!(may.overtime_minutes, 0);
        assert_eq!(june.overtime_minutes, 0);
    }

    #[test]
    fn test_contract_overtime_mirrors_latest_sheet() {
        let (store, contracts, engine) = setup();
        let jan = insert_sheet(&store, 1, 2026);
        insert_sheet(&store, 2, 2026);
        insert_work(&store, &jan, "2026-01-05", 10);

        engine.recalculate_with_cascade(&jan, &contract()).unwrap();

        let stored = contracts.contract("hmuster").unwrap().unwrap();
        let feb_sheet = store.timesheet_for_month("hmuster", 2, 2026).unwrap().unwrap();
        assert_eq!(stored.overtime_minutes, feb_sheet.overtime_minutes);
    }
}
