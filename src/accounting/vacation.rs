//! Monthly vacation grant.
//!
//! Every new timesheet grants vacation proportional to the contracted
//! monthly hours. The grant is computed in hours rounded to the nearest
//! half hour, then converted to minutes.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Computes the monthly vacation grant in minutes.
///
/// The grant in hours is `round(monthly_hours * 20 * 3.95 / (85 * 12) * 2) / 2`
/// (20 vacation days over a 85-hour reference contract and a 3.95-week
/// month, rounded to the nearest half hour, midpoints away from zero).
///
/// # Example
///
/// ```
/// use timesheet_engine::accounting::monthly_vacation_grant_minutes;
/// use rust_decimal::Decimal;
///
/// // 40 contracted hours a month grant 3 hours of vacation
/// assert_eq!(monthly_vacation_grant_minutes(Decimal::from(40)), 180);
/// // 86 contracted hours grant 6.5 hours
/// assert_eq!(monthly_vacation_grant_minutes(Decimal::from(86)), 390);
/// ```
pub fn monthly_vacation_grant_minutes(monthly_hours: Decimal) -> i64 {
    let reference = Decimal::from(85 * 12);
    let doubled_hours = monthly_hours * Decimal::from(20) * Decimal::new(395, 2) / reference
        * Decimal::from(2);
    let hours = doubled_hours
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        / Decimal::from(2);
    (hours * Decimal::from(60)).to_i64().unwrap_or(0)
}
