//! Validation rules for time entries and timesheets.
//!
//! Entry rules are independent judges of one constraint each, run as an
//! ordered chain before an entry is accepted: the first [`Verdict::Failure`]
//! aborts the operation with the failing rule's message, while warnings are
//! collected and surfaced without blocking persistence. Each rule emits at
//! most its first warning, so the collected list is not an exhaustive audit
//! of the input.
//!
//! Timesheet rules ([`check_weekly_hours`], [`check_prior_timesheets`]) span
//! multiple entries or months and gate the sign transition.

mod break_length;
mod holiday;
mod prior_timesheets;
mod vacation_balance;
mod weekend;
mod weekly_hours;
mod working_time;

pub use break_length::required_break_minutes;
pub use prior_timesheets::check_prior_timesheets;
pub use weekly_hours::{DEFAULT_WEEKLY_CAP_MINUTES, check_weekly_hours};
pub use working_time::{
    MAX_WORK_MINUTES, WARN_WORK_MINUTES, WORKDAY_END_HOUR, WORKDAY_START_HOUR,
};

use crate::error::{EngineError, EngineResult};
use crate::models::{EngineWarning, EntryKind, TimeEntry, WarningKind};
use crate::store::HolidayCalendar;

/// The judgement of a single validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The entry satisfies the rule.
    Success,
    /// The entry is acceptable but noteworthy; does not block persistence.
    Warning {
        /// The rule's warning message.
        message: String,
    },
    /// The entry violates the rule; the operation is aborted.
    Failure {
        /// The rule's failure message.
        message: String,
    },
}

/// Shared context the rules evaluate against.
pub struct ValidationContext<'a> {
    /// The employer's public holiday calendar.
    pub calendar: &'a dyn HolidayCalendar,
    /// Vacation minutes available to the entry being validated.
    ///
    /// For updates the caller adds the refund of the old duration, so the
    /// rule sees the balance as it would be without the old entry.
    pub available_vacation_minutes: i64,
}

/// A single entry validation rule.
///
/// Rules are fieldless variants dispatching to one module each; an ordered
/// slice of them models the chain for an entry kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryValidator {
    /// Warns outside 08:00-18:00 or above 8h; fails above 10h.
    WorkingTime,
    /// Fails when the recorded break is below the duration-scaled minimum.
    BreakLength,
    /// Fails on public holidays.
    Holiday,
    /// Fails on Saturdays and Sundays.
    Weekend,
    /// Fails when a vacation entry would overdraw the vacation balance.
    VacationBalance,
}

impl EntryValidator {
    /// Returns the rule's name, used in error and warning messages.
    pub fn name(&self) -> &'static str {
        match self {
            EntryValidator::WorkingTime => "working_time",
            EntryValidator::BreakLength => "break_length",
            EntryValidator::Holiday => "holiday",
            EntryValidator::Weekend => "weekend",
            EntryValidator::VacationBalance => "vacation_balance",
        }
    }

    /// Evaluates the rule against one entry.
    pub fn evaluate(&self, entry: &TimeEntry, ctx: &ValidationContext<'_>) -> Verdict {
        match self {
            EntryValidator::WorkingTime => working_time::evaluate(entry),
            EntryValidator::BreakLength => break_length::evaluate(entry),
            EntryValidator::Holiday => holiday::evaluate(entry, ctx.calendar),
            EntryValidator::Weekend => weekend::evaluate(entry),
            EntryValidator::VacationBalance => {
                vacation_balance::evaluate(entry, ctx.available_vacation_minutes)
            }
        }
    }
}

/// The chain applied to work entries, in order.
pub const WORK_ENTRY_CHAIN: &[EntryValidator] = &[
    EntryValidator::WorkingTime,
    EntryValidator::BreakLength,
    EntryValidator::Holiday,
    EntryValidator::Weekend,
];

/// The chain applied to vacation entries, in order.
pub const VACATION_ENTRY_CHAIN: &[EntryValidator] = &[
    EntryValidator::Holiday,
    EntryValidator::VacationBalance,
    EntryValidator::Weekend,
];

/// Returns the validator chain for an entry kind.
pub fn chain_for(kind: EntryKind) -> &'static [EntryValidator] {
    match kind {
        EntryKind::Work => WORK_ENTRY_CHAIN,
        EntryKind::Vacation => VACATION_ENTRY_CHAIN,
    }
}

/// Runs the chain for the entry's kind.
///
/// Returns the collected warnings on success, or the first failure as an
/// [`EngineError::Validation`] carrying the failing rule's name and message.
pub fn run_chain(
    entry: &TimeEntry,
    ctx: &ValidationContext<'_>,
) -> EngineResult<Vec<EngineWarning>> {
    let mut warnings = Vec::new();
    for validator in chain_for(entry.kind()) {
        match validator.evaluate(entry, ctx) {
            Verdict::Success => {}
            Verdict::Warning { message } => warnings.push(EngineWarning {
                kind: WarningKind::Validation,
                source: validator.name().to_string(),
                message,
            }),
            Verdict::Failure { message } => {
                return Err(EngineError::Validation {
                    rule: validator.name(),
                    message,
                });
            }
        }
    }
    Ok(warnings)
}
