//! Configuration types.
//!
//! Strongly-typed structures for the engine settings and the YAML holiday
//! calendar files.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::validation::DEFAULT_WEEKLY_CAP_MINUTES;

/// Tunable settings of the orchestration service.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Per-week cap on summed entry durations, in minutes.
    pub weekly_cap_minutes: i64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            weekly_cap_minutes: DEFAULT_WEEKLY_CAP_MINUTES,
        }
    }
}

/// A single public holiday in a holiday file.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayDate {
    /// The date of the holiday.
    pub date: NaiveDate,
    /// The name of the holiday (e.g., "Tag der Arbeit").
    pub name: String,
}

/// Holiday calendar file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayFile {
    /// The region the calendar applies to (e.g., "de-bw").
    pub region: String,
    /// The public holidays of the region.
    pub holidays: Vec<HolidayDate>,
}
