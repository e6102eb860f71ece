//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while reading the event stream
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to open recording: {0}")]
    OpenFailed(#[source] std::io::Error),

    #[error("Failed to read event stream: {0}")]
    ReadFailed(#[from] std::io::Error),
}

/// Errors that can occur while building a folded stack key
///
/// These are local to a single event: the worker drops the event and the
/// run continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Empty type descriptor")]
    EmptyDescriptor,

    #[error("Empty stack trace")]
    EmptyStack,
}

/// Errors that can occur in the worker pool
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Failed to spawn worker thread: {0}")]
    SpawnFailed(#[from] std::io::Error),

    #[error("Submitted tasks did not drain within {0:?}")]
    DrainTimeout(std::time::Duration),

    #[error("A worker thread terminated abnormally")]
    WorkerFailed,

    #[error("Run cancelled before completion")]
    Cancelled,
}

/// Errors that can occur during report output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write report: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to persist report: {0}")]
    PersistFailed(String),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur during flamegraph rendering
#[derive(Error, Debug)]
pub enum FlamegraphError {
    #[error("Empty stack data")]
    EmptyStacks,

    #[error("Failed to render flamegraph: {0}")]
    RenderFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
