//! Memflame
//!
//! Folded-stack report generation for JVM memory-allocation recordings.
//!
//! The pipeline reads structured allocation events from an exported
//! recording, folds each event's call stack into a canonical key,
//! accumulates byte totals per key across a pool of workers, and emits a
//! sorted `<stack> <bytes>` report ready for flamegraph rendering.
//!
//! This crate provides the core implementation for the `memflame` CLI tool.

pub mod aggregator;
pub mod commands;
pub mod flamegraph;
pub mod output;
pub mod pool;
pub mod source;
pub mod utils;
