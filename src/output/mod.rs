//! Report output.
//!
//! This module turns the drained aggregation table into the final sorted
//! folded-stack report and writes it to disk.

pub mod report;

// Re-export main functions
pub use report::{render, write_report, ReportRow};
