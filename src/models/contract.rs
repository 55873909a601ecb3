//! Contract fields of the user aggregate.
//!
//! The contract is owned by the user store; the accounting engine reads the
//! contracted hours and mutates the vacation and overtime balances.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The contract fields the engine reads and mutates on the user aggregate.
///
/// # Example
///
/// ```
/// use timesheet_engine::models::Contract;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let contract = Contract {
///     username: "hmuster".to_string(),
///     supervisor: "pdoe".to_string(),
///     weekly_hours: Decimal::from_str("10").unwrap(),
///     monthly_hours: Decimal::from_str("40").unwrap(),
///     hourly_wage: Decimal::from_str("12.51").unwrap(),
///     vacation_minutes: 0,
///     overtime_minutes: 0,
///     start_date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
/// };
/// assert_eq!(contract.monthly_minutes(), 2400);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// The employee's username.
    pub username: String,
    /// The supervisor's username (receives sign notifications).
    pub supervisor: String,
    /// Contracted hours per week.
    pub weekly_hours: Decimal,
    /// Contracted hours per month.
    pub monthly_hours: Decimal,
    /// Hourly wage.
    pub hourly_wage: Decimal,
    /// Running vacation balance, in minutes.
    pub vacation_minutes: i64,
    /// Running overtime balance, in minutes (signed).
    pub overtime_minutes: i64,
    /// First day of employment; timesheets cannot precede its month.
    pub start_date: NaiveDate,
}

impl Contract {
    /// Returns the contracted minutes per month.
    ///
    /// Truncates sub-minute precision, which cannot occur for realistic
    /// contracted hours.
    pub fn monthly_minutes(&self) -> i64 {
        use rust_decimal::prelude::ToPrimitive;
        (self.monthly_hours * Decimal::from(60))
            .trunc()
            .to_i64()
            .unwrap_or(0)
    }

    /// Returns the contracted minutes per week as a `Decimal`.
    ///
    /// Kept as a decimal so the 80% sign threshold compares exactly at the
    /// boundary.
    pub fn weekly_minutes(&self) -> Decimal {
        self.weekly_hours * Decimal::from(60)
    }
}
