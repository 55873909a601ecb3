//! Engine configuration.
//!
//! This module provides the engine's tunable settings and the
//! [`HolidayLoader`] type for loading region-specific public holiday
//! calendars from YAML files.

mod loader;
mod types;

pub use loader::HolidayLoader;
pub use types::{EngineSettings, HolidayDate, HolidayFile};
