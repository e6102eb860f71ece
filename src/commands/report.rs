//! Report command implementation.
//!
//! The report command:
//! 1. Derives the output path from the recording name
//! 2. Opens the exported recording
//! 3. Feeds allocation events through the worker pool
//! 4. Waits for the pool to drain
//! 5. Sorts and writes the folded report
//! 6. Optionally renders an SVG flamegraph

use crate::aggregator::{AggregationTable, IncludeFilter};
use crate::flamegraph;
use crate::output::{render, write_report};
use crate::pool::{CancelToken, ReportContext, WorkerPool};
use crate::source::{EventSource, JsonEventSource};
use crate::utils::config::{
    DRAIN_TIMEOUT, QUEUE_SLOTS_PER_WORKER, REPORT_FILE_PREFIX, REPORT_FILE_SUFFIX,
};
use crate::utils::error::PoolError;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Arguments for the report command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, Default)]
pub struct ReportArgs {
    /// Path to the exported recording (line-delimited JSON events)
    pub recording: PathBuf,

    /// Raw include terms; only stacks containing one are reported
    pub includes: Vec<String>,

    /// Override for the derived output path
    pub output: Option<PathBuf>,

    /// Override for the worker count (defaults to available CPUs)
    pub workers: Option<usize>,

    /// Optional SVG flamegraph output path
    pub svg: Option<PathBuf>,

    /// Flamegraph title
    pub title: Option<String>,
}

/// Execute the report command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Recording open/read failures
/// * Pool drain timeout or cancellation
/// * Report write failures
pub fn execute_report(args: ReportArgs) -> Result<()> {
    let start_time = Instant::now();

    let output_path = match &args.output {
        Some(path) => path.clone(),
        None => derive_report_path(&args.recording)?,
    };

    info!("Aggregating allocations from: {}", args.recording.display());

    let filter = IncludeFilter::new(&args.includes);
    if !filter.is_empty() {
        debug!("Include filter active: {} terms", filter.len());
    }

    let workers = args
        .workers
        .filter(|count| *count > 0)
        .unwrap_or_else(num_cpus::get);

    let table = Arc::new(AggregationTable::new());
    let cancel = CancelToken::new();
    let ctx = Arc::new(ReportContext::new(filter, Arc::clone(&table), cancel.clone()));
    let pool = WorkerPool::new(workers, workers * QUEUE_SLOTS_PER_WORKER, Arc::clone(&ctx))
        .context("Failed to start worker pool")?;

    let mut source = JsonEventSource::open(&args.recording)
        .with_context(|| format!("Failed to open recording {}", args.recording.display()))?;

    // The source is single-pass and not safely readable concurrently, so
    // this thread is the only producer; workers fan out behind the queue.
    let mut submitted: u64 = 0;
    while let Some(event) = source
        .next_event()
        .context("Failed to read event stream")?
    {
        if cancel.is_cancelled() {
            return Err(PoolError::Cancelled.into());
        }
        if event.is_allocation() {
            pool.submit(event);
            submitted += 1;
        }
    }

    if source.skipped_lines() > 0 {
        warn!("Skipped {} undecodable lines in recording", source.skipped_lines());
    }
    debug!("Submitted {} allocation events, waiting for drain", submitted);

    pool.finish(DRAIN_TIMEOUT)
        .context("Aggregation did not complete")?;

    // The pool and the workers are gone; after dropping the context the
    // driver holds the only reference and the table becomes read-only input
    let accepted = ctx.accepted();
    let dropped = ctx.dropped();
    drop(ctx);
    let table = Arc::try_unwrap(table)
        .map_err(|_| anyhow::anyhow!("Aggregation table still shared after drain"))?;

    info!(
        "Aggregated {} events into {} unique stacks",
        accepted,
        table.len()
    );
    if dropped > 0 {
        debug!("Dropped {} events with unusable stack keys", dropped);
    }

    let rows = render(table.into_rows());

    write_report(&rows, &output_path).context("Failed to write report")?;
    info!("✓ Report written to: {}", output_path.display());

    if let Some(svg_path) = &args.svg {
        if rows.is_empty() {
            warn!("No stacks aggregated, skipping flamegraph");
        } else {
            flamegraph::write_svg(&rows, svg_path, args.title.as_deref())
                .context("Failed to render flamegraph")?;
            info!("✓ Flamegraph written to: {}", svg_path.display());
        }
    }

    info!("Report completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(())
}

/// Derive the report file name from the recording file name
///
/// **Public** - exposed for tests and callers that pre-compute the path
///
/// A numeric id sits between the last `-` and the first `.` after it
/// (`recording-1234.jfr` becomes `mem-info-1234.txt`); when the markers are
/// absent the id defaults to 0. The file lands in the current directory.
///
/// # Errors
/// * A non-numeric id between the markers is an invalid argument
pub fn derive_report_path(recording: &Path) -> Result<PathBuf> {
    let name = recording
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let id: u64 = match name.rfind('-') {
        Some(dash) => {
            let rest = &name[dash + 1..];
            match rest.find('.') {
                Some(dot) => {
                    let digits = &rest[..dot];
                    digits.parse().with_context(|| {
                        format!("Recording name {name:?} has a non-numeric id {digits:?}")
                    })?
                }
                None => 0,
            }
        }
        None => 0,
    };

    Ok(PathBuf::from(format!(
        "{REPORT_FILE_PREFIX}{id}{REPORT_FILE_SUFFIX}"
    )))
}
