//! Time entry model and duration semantics.
//!
//! This module defines the [`TimeEntry`] record with its work/vacation
//! variants. Work entries subtract their break from the worked span;
//! vacation entries round their span up to whole minutes.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of a time entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A worked span with break, activity and project details.
    Work,
    /// A consumed vacation span.
    Vacation,
}

/// Kind-specific fields of a time entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryDetails {
    /// Details of a work entry.
    Work {
        /// Unpaid break during the span, in minutes.
        break_minutes: i64,
        /// What was worked on (free text).
        activity: String,
        /// The project the work belongs to (free text).
        project: String,
    },
    /// A vacation entry carries no extra fields.
    Vacation,
}

/// A single dated record of work or vacation time.
///
/// Entries are created through the orchestration service after validation;
/// the service assigns the id before handing the entry to the store.
///
/// # Example
///
/// ```
/// use timesheet_engine::models::{EntryDetails, TimeEntry};
/// use chrono::NaiveDateTime;
/// use uuid::Uuid;
///
/// let entry = TimeEntry {
///     id: Uuid::new_v4(),
///     timesheet_id: Uuid::new_v4(),
///     username: "hmuster".to_string(),
///     start: NaiveDateTime::parse_from_str("2026-03-12 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
///     end: NaiveDateTime::parse_from_str("2026-03-12 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
///     details: EntryDetails::Work {
///         break_minutes: 10,
///         activity: "lab session".to_string(),
///         project: "spectroscopy".to_string(),
///     },
/// };
/// assert_eq!(entry.duration_minutes(), 110);
/// assert_eq!(entry.duration_display(), "1.50");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Unique identifier, assigned at construction.
    pub id: Uuid,
    /// The id of the owning monthly timesheet.
    pub timesheet_id: Uuid,
    /// The owning username.
    pub username: String,
    /// The start of the span.
    pub start: NaiveDateTime,
    /// The end of the span (must be after `start`).
    pub end: NaiveDateTime,
    /// Kind-specific fields.
    pub details: EntryDetails,
}

impl TimeEntry {
    /// Returns the entry kind.
    pub fn kind(&self) -> EntryKind {
        match self.details {
            EntryDetails::Work { .. } => EntryKind::Work,
            EntryDetails::Vacation => EntryKind::Vacation,
        }
    }

    /// Returns the calendar day the entry counts against.
    ///
    /// The one-entry-per-day invariant is keyed on this date, which is the
    /// entry's start date, not its timesheet.
    pub fn day(&self) -> NaiveDate {
        self.start.date()
    }

    /// Returns the weekday of the entry's date.
    pub fn weekday(&self) -> Weekday {
        self.day().weekday()
    }

    /// Returns the entry's duration in minutes.
    ///
    /// Work entries subtract their break from the span; vacation entries
    /// round the span up to whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        let span = self.end - self.start;
        match self.details {
            EntryDetails::Work { break_minutes, .. } => span.num_minutes() - break_minutes,
            // ceil to whole minutes
            EntryDetails::Vacation => span.num_seconds().div_euclid(60)
                + i64::from(span.num_seconds().rem_euclid(60) != 0),
        }
    }

    /// Renders the duration as `H.MM` for display to callers.
    ///
    /// # Example
    ///
    /// ```
    /// # use timesheet_engine::models::{EntryDetails, TimeEntry};
    /// # use chrono::NaiveDateTime;
    /// # use uuid::Uuid;
    /// let entry = TimeEntry {
    ///     id: Uuid::new_v4(),
    ///     timesheet_id: Uuid::new_v4(),
    ///     username: "hmuster".to_string(),
    ///     start: NaiveDateTime::parse_from_str("2026-03-12 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
    ///     end: NaiveDateTime::parse_from_str("2026-03-12 17:05:00", "%Y-%m-%d %H:%M:%S").unwrap(),
    ///     details: EntryDetails::Vacation,
    /// };
    /// assert_eq!(entry.duration_display(), "8.05");
    /// ```
    pub fn duration_display(&self) -> String {
        let minutes = self.duration_minutes();
        format!("{}.{:02}", minutes / 60, minutes % 60)
    }

    /// Checks that the entry's span lies within the given (month, year).
    ///
    /// Both the start and the end date must fall in the owning timesheet's
    /// calendar month.
    pub fn within_month(&self, month: u32, year: i32) -> bool {
        let in_month = |d: NaiveDate| d.month() == month && d.year() == year;
        in_month(self.start.date()) && in_month(self.end.date())
    }
}

/// The caller-supplied fields for a new time entry.
///
/// The orchestration service turns this into a persisted [`TimeEntry`] after
/// running the validation chain; ids and the owning timesheet are resolved
/// by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    /// The owning username.
    pub username: String,
    /// The start of the span.
    pub start: NaiveDateTime,
    /// The end of the span.
    pub end: NaiveDateTime,
    /// Kind-specific fields.
    pub details: EntryDetails,
}
