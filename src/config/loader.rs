//! Holiday calendar loading.
//!
//! This module provides the [`HolidayLoader`] type for loading a region's
//! public holiday calendar from a YAML file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};
use crate::store::HolidayCalendar;

use super::types::HolidayFile;

/// Loads and answers public holiday lookups for one region.
///
/// # File Structure
///
/// ```text
/// region: "de-bw"
/// holidays:
///   - date: 2026-01-01
///     name: "Neujahr"
///   - date: 2026-05-01
///     name: "Tag der Arbeit"
/// ```
///
/// # Example
///
/// ```no_run
/// use timesheet_engine::config::HolidayLoader;
/// use timesheet_engine::store::HolidayCalendar;
/// use chrono::NaiveDate;
///
/// let loader = HolidayLoader::load("./config/holidays/de_bw.yaml").unwrap();
/// let date = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
/// assert_eq!(loader.holiday_name(date), Some("Tag der Arbeit".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct HolidayLoader {
    region: String,
    holidays: HashMap<NaiveDate, String>,
}

impl HolidayLoader {
    /// Loads a holiday calendar from the specified YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigNotFound`] if the file is missing and
    /// [`EngineError::ConfigParseError`] if it contains invalid YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let file: HolidayFile =
            serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
                path: path_str,
                message: e.to_string(),
            })?;

        Ok(Self {
            region: file.region,
            holidays: file
                .holidays
                .into_iter()
                .map(|h| (h.date, h.name))
                .collect(),
        })
    }

    /// Returns the region the calendar applies to.
    pub fn region(&self) -> &str {
        &self.region
    }
}

impl HolidayCalendar for HolidayLoader {
    fn holiday_name(&self, date: NaiveDate) -> Option<String> {
        self.holidays.get(&date).cloned()
    }
}
