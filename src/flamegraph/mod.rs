//! Optional SVG flamegraph rendering of the folded report.
//!
//! The folded text file is the primary artifact and already feeds any
//! flamegraph toolchain; rendering here delegates to `inferno`, the same
//! engine `cargo flamegraph` uses.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use inferno::flamegraph::{self, Options};
use log::info;

use crate::output::ReportRow;
use crate::utils::error::FlamegraphError;

/// Default title when the CLI does not supply one
pub const DEFAULT_TITLE: &str = "Memory Allocations";

/// Render report rows as an SVG flamegraph
///
/// # Arguments
/// * `rows` - rendered report rows, already sorted
/// * `output_path` - destination SVG file
/// * `title` - flamegraph title, defaults to [`DEFAULT_TITLE`]
///
/// # Errors
/// * `FlamegraphError::EmptyStacks` - no rows to render
/// * `FlamegraphError::IoError` - the SVG file cannot be created
/// * `FlamegraphError::RenderFailed` - inferno rejected the folded data
pub fn write_svg(
    rows: &[ReportRow],
    output_path: impl AsRef<Path>,
    title: Option<&str>,
) -> Result<(), FlamegraphError> {
    if rows.is_empty() {
        return Err(FlamegraphError::EmptyStacks);
    }
    let output_path = output_path.as_ref();

    let mut options = Options::default();
    options.title = title.unwrap_or(DEFAULT_TITLE).to_string();
    options.count_name = "bytes".to_string();

    let lines: Vec<String> = rows
        .iter()
        .map(|row| format!("{} {}", row.stack, row.total_bytes))
        .collect();

    let file = File::create(output_path)?;
    let writer = BufWriter::new(file);
    flamegraph::from_lines(&mut options, lines.iter().map(|line| line.as_str()), writer)
        .map_err(|e| FlamegraphError::RenderFailed(e.to_string()))?;

    info!("Flamegraph written to: {}", output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rows_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_svg(&[], dir.path().join("out.svg"), None);
        assert!(matches!(result, Err(FlamegraphError::EmptyStacks)));
    }

    #[test]
    fn test_renders_svg_for_folded_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg");

        let rows = vec![
            ReportRow::new("java;A:.a;B:.b;int".to_string(), 350),
            ReportRow::new("java;A:.a;C:.c;long".to_string(), 16),
        ];
        write_svg(&rows, &path, Some("Test Profile")).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("Test Profile"));
    }
}
