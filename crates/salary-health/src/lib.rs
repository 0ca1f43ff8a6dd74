//! Salary health diagnostics over employee compensation records.
//!
//! [`diagnosis`] holds the deterministic analytics engine; [`roster`] reads
//! spreadsheet exports into engine input. Configuration, telemetry and the
//! application error type are shared with the API service.

pub mod config;
pub mod diagnosis;
pub mod error;
pub mod roster;
pub mod telemetry;

pub use diagnosis::{compose, DiagnosisResult, DiagnosticPolicy, EmployeeRecord};
pub use error::AppError;
