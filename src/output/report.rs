//! Folded report rendering and persistence.
//!
//! Each row of the report is one folded stack and the total bytes allocated
//! through it, serialized as `<key> <total>` per line.

use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::utils::error::OutputError;

/// One line of the final report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// Folded stack key
    pub stack: String,

    /// Total bytes allocated through this stack
    pub total_bytes: u64,
}

impl ReportRow {
    pub fn new(stack: String, total_bytes: u64) -> Self {
        Self { stack, total_bytes }
    }
}

/// Order drained table rows for emission
///
/// **Public** - main entry point for report rendering
///
/// Strictly descending by total; ties ordered by ascending key so repeated
/// runs over the same input emit byte-identical reports.
pub fn render(rows: Vec<(String, u64)>) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = rows
        .into_iter()
        .map(|(stack, total_bytes)| ReportRow::new(stack, total_bytes))
        .collect();

    rows.sort_by(|a, b| {
        b.total_bytes
            .cmp(&a.total_bytes)
            .then_with(|| a.stack.cmp(&b.stack))
    });

    rows
}

/// Write the report to `output_path`
///
/// **Public** - main entry point for report output
///
/// Rows are written to a temporary file in the target directory and
/// atomically renamed over the destination on success, so a failed run
/// never leaves a truncated report behind.
///
/// # Errors
/// * `OutputError::InvalidPath` - empty path or existing directory
/// * `OutputError::WriteFailed` - I/O error during the write
/// * `OutputError::PersistFailed` - the final rename failed
pub fn write_report(rows: &[ReportRow], output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());
    validate_output_path(output_path)?;

    let dir = output_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        for row in rows {
            writeln!(writer, "{} {}", row.stack, row.total_bytes)?;
        }
        writer.flush()?;
    }

    tmp.persist(output_path)
        .map_err(|e| OutputError::PersistFailed(e.to_string()))?;

    debug!("Report written ({} rows)", rows.len());
    Ok(())
}

/// Validate that the output path is usable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
