//! CLI command implementations.
//!
//! Commands orchestrate the library components to perform user tasks.

pub mod report;

// Re-export main command functions
pub use report::{derive_report_path, execute_report, ReportArgs};
