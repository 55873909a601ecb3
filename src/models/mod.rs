//! Domain models for the timesheet engine.
//!
//! This module defines the time entry variants, the monthly timesheet
//! aggregate with its approval state machine, the user contract fields the
//! accounting engine reads and mutates, and the outcome wrapper returned by
//! every public operation.

mod contract;
mod entry;
mod outcome;
mod timesheet;

pub use contract::Contract;
pub use entry::{EntryDetails, EntryKind, NewEntry, TimeEntry};
pub use outcome::{EngineWarning, Outcome, WarningKind};
pub use timesheet::{Timesheet, TimesheetStatus};
