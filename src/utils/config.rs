//! Configuration and constants for the CLI.

use std::time::Duration;

/// Tag identifying the source runtime's stack format, prepended to every key
pub const STACK_ROOT_TAG: &str = "java;";

// Event kinds that describe a memory allocation
pub const EVENT_ALLOC_IN_TLAB: &str = "jdk.ObjectAllocationInNewTLAB";
pub const EVENT_ALLOC_OUTSIDE_TLAB: &str = "jdk.ObjectAllocationOutsideTLAB";

/// Pending queue slots per worker before the producer runs tasks itself
pub const QUEUE_SLOTS_PER_WORKER: usize = 2;

/// Upper bound on waiting for submitted tasks to drain after end of input
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

// Shape of the derived report file name: mem-info-<id>.txt
pub const REPORT_FILE_PREFIX: &str = "mem-info-";
pub const REPORT_FILE_SUFFIX: &str = ".txt";
