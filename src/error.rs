//! Error types for the timesheet engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all failure conditions the engine can report. The taxonomy keeps
//! validation failures, state conflicts, missing records and persistence
//! failures distinct so callers can react to each kind differently.

use thiserror::Error;
use uuid::Uuid;

/// The main error type for the timesheet engine.
///
/// Validation failures and state conflicts are recoverable by the caller
/// (fix the input, retry the operation later); persistence failures are
/// reported as-is and never retried by the engine itself.
///
/// # Example
///
/// ```
/// use timesheet_engine::error::EngineError;
///
/// let error = EngineError::TimesheetNotFound {
///     username: "hmuster".to_string(),
///     month: 3,
///     year: 2026,
/// };
/// assert_eq!(
///     error.to_string(),
///     "Timesheet not found for 'hmuster' in 3/2026"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A validation rule rejected an entry or timesheet.
    #[error("Validation failed ({rule}): {message}")]
    Validation {
        /// The name of the rule that failed.
        rule: &'static str,
        /// The rule's failure message.
        message: String,
    },

    /// An operation was attempted from a disallowed timesheet state.
    #[error("Cannot {operation} a timesheet in state {status}")]
    StateConflict {
        /// The operation that was attempted.
        operation: &'static str,
        /// The timesheet's current status, as a display string.
        status: String,
    },

    /// Another entry already exists for the same user and calendar day.
    #[error("An entry for '{username}' on {date} already exists")]
    EntryDayConflict {
        /// The owning username.
        username: String,
        /// The conflicting calendar day.
        date: chrono::NaiveDate,
    },

    /// The referenced timesheet does not exist.
    #[error("Timesheet not found for '{username}' in {month}/{year}")]
    TimesheetNotFound {
        /// The owning username.
        username: String,
        /// The requested month (1-12).
        month: u32,
        /// The requested year.
        year: i32,
    },

    /// The referenced time entry does not exist.
    #[error("Time entry not found: {id}")]
    EntryNotFound {
        /// The entry id that was looked up.
        id: Uuid,
    },

    /// No contract is stored for the given user.
    #[error("Contract not found for user '{username}'")]
    ContractNotFound {
        /// The username without a contract.
        username: String,
    },

    /// A required signature asset is missing.
    #[error("No {kind} signature stored for '{username}'")]
    SignatureMissing {
        /// The username whose signature was required.
        username: String,
        /// The signature kind ("employee" or "supervisor").
        kind: &'static str,
    },

    /// A timesheet month is outside the allowed range for the user.
    #[error("Invalid timesheet month {month}/{year}: {message}")]
    InvalidMonth {
        /// The requested month (1-12).
        month: u32,
        /// The requested year.
        year: i32,
        /// Why the month was rejected.
        message: String,
    },

    /// An entry's fields were inconsistent (e.g. end before start).
    #[error("Invalid entry: {message}")]
    InvalidEntry {
        /// What made the entry invalid.
        message: String,
    },

    /// The persistent store failed or did not acknowledge a write.
    #[error("Persistence failure: {message}")]
    Persistence {
        /// A description of the store failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
