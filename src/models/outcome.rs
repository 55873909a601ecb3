//! Operation outcomes with non-blocking warnings.
//!
//! Validator warnings, notification failures and ledger partial failures do
//! not abort an operation; they ride along on the returned [`Outcome`].

use serde::{Deserialize, Serialize};

/// The origin of a non-blocking warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A validator returned a warning verdict.
    Validation,
    /// The notification sink failed after a committed state change.
    NotificationFailed,
    /// A ledger update failed after a committed entry mutation.
    LedgerInconsistency,
}

/// A non-blocking warning attached to a successful operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineWarning {
    /// What produced the warning.
    pub kind: WarningKind,
    /// The rule or collaborator that raised it.
    pub source: String,
    /// The warning message.
    pub message: String,
}

/// The result of a successful engine operation.
///
/// `warnings` is ordered but not exhaustive: each validator reports at most
/// its first warning, and the chain stops early on failure, so callers must
/// not treat the list as a complete audit of the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome<T> {
    /// The operation's value (created entry, transitioned timesheet, ...).
    pub value: T,
    /// Non-blocking warnings collected along the way.
    pub warnings: Vec<EngineWarning>,
}

impl<T> Outcome<T> {
    /// Wraps a value with no warnings.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Wraps a value with the given warnings.
    pub fn with_warnings(value: T, warnings: Vec<EngineWarning>) -> Self {
        Self { value, warnings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_outcome_has_no_warnings() {
        let outcome = Outcome::clean(42);
        assert_eq!(outcome.value, 42);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_warnings_preserve_order() {
        let warnings = vec![
            EngineWarning {
                kind: WarningKind::Validation,
                source: "working_time".to_string(),
                message: "outside regular hours".to_string(),
            },
            EngineWarning {
                kind: WarningKind::NotificationFailed,
                source: "notification".to_string(),
                message: "sink unavailable".to_string(),
            },
        ];
        let outcome = Outcome::with_warnings((), warnings.clone());
        assert_eq!(outcome.warnings, warnings);
    }
}
