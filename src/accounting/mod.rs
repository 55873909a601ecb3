//! Overtime and vacation ledger accounting.
//!
//! The vacation ledger is granted monthly from the contracted hours and
//! consumed by vacation entries; the overtime ledger carries each month's
//! worked-minus-contracted minutes forward into the next. Because month N's
//! overtime depends on month N-1's, every recalculation propagates forward
//! through a bounded cascade.

mod engine;
mod vacation;

pub use engine::{AccountingEngine, CASCADE_BOUND};
pub use vacation::monthly_vacation_grant_minutes;

/// Returns the calendar month after (month, year).
pub(crate) fn next_month(month: u32, year: i32) -> (u32, i32) {
    if month == 12 { (1, year + 1) } else { (month + 1, year) }
}

/// Returns the calendar month before (month, year).
pub(crate) fn prev_month(month: u32, year: i32) -> (u32, i32) {
    if month == 1 { (12, year - 1) } else { (month - 1, year) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_arithmetic_wraps_at_year_boundaries() {
        assert_eq!(next_month(12, 2025), (1, 2026));
        assert_eq!(next_month(3, 2026), (4, 2026));
        assert_eq!(prev_month(1, 2026), (12, 2025));
        assert_eq!(prev_month(4, 2026), (3, 2026));
    }
}
