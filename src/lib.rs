//! Timesheet lifecycle and time-accounting engine for student employees.
//!
//! This crate owns a user's monthly timesheet record, the approval workflow
//! between employee and supervisor, the validation chain that gates every
//! time entry, and the cross-month overtime/vacation ledgers. Persistence,
//! signatures, notifications and the holiday calendar are injected through
//! the traits in [`store`].

#![warn(missing_docs)]

pub mod accounting;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
pub mod validation;
