//! Memflame CLI
//!
//! Turns a JVM allocation-profiling recording (exported as line-delimited
//! JSON events) into a folded-stack report for flamegraph rendering.

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;

use memflame::commands::{execute_report, ReportArgs};

/// Memflame - folded-stack reports for JVM memory allocations
#[derive(Parser, Debug)]
#[command(name = "memflame")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Recording to aggregate (line-delimited JSON allocation events)
    recording: PathBuf,

    /// Comma-separated substrings; only stacks containing one are reported
    #[arg(value_delimiter = ',')]
    includes: Vec<String>,

    /// Output path (defaults to mem-info-<id>.txt derived from the input name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of worker threads (defaults to available CPUs)
    #[arg(long)]
    workers: Option<usize>,

    /// Also render an SVG flamegraph to this path
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Flamegraph title (used with --svg)
    #[arg(long)]
    title: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse CLI arguments; with no arguments clap prints usage and exits
    // with a non-zero code before any work starts
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let args = ReportArgs {
        recording: cli.recording,
        includes: cli.includes,
        output: cli.output,
        workers: cli.workers,
        svg: cli.svg,
        title: cli.title,
    };

    execute_report(args)
}
