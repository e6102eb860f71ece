//! Structured allocation events consumed from an exported recording.
//!
//! Decoding the binary recording format is not this crate's job: the
//! recording is expected to have been exported as structured events
//! beforehand (one JSON object per line, `jfr print --json` style).
//! Events are immutable once read.

use serde::Deserialize;

use crate::utils::config::{EVENT_ALLOC_IN_TLAB, EVENT_ALLOC_OUTSIDE_TLAB};

/// One frame of a captured call stack
#[derive(Debug, Clone, Deserialize)]
pub struct Frame {
    /// Fully qualified name of the declaring type (dot- or slash-separated)
    #[serde(rename = "type", alias = "class")]
    pub declaring_type: String,

    /// Method name within the declaring type
    pub method: String,
}

/// Captured call stack, innermost (allocation site) frame first
#[derive(Debug, Clone, Deserialize)]
pub struct StackTrace {
    #[serde(default)]
    pub frames: Vec<Frame>,
}

/// A single allocation profiling event
///
/// Fields other than the kind tag are optional: events recorded without a
/// stack trace, object class, or size are "not applicable" and skipped by
/// the workers, never treated as errors.
#[derive(Debug, Clone, Deserialize)]
pub struct AllocationEvent {
    /// Event kind tag, e.g. "jdk.ObjectAllocationInNewTLAB"
    #[serde(rename = "eventType", alias = "type")]
    pub event_type: String,

    /// Captured call stack
    #[serde(default, rename = "stackTrace")]
    pub stack_trace: Option<StackTrace>,

    /// Type descriptor of the allocated object
    #[serde(default, rename = "objectClass")]
    pub object_class: Option<String>,

    /// Size of the allocation in bytes
    #[serde(default, rename = "allocationSize")]
    pub allocation_size: Option<u64>,
}

impl AllocationEvent {
    /// Whether this event is one of the two recognized allocation kinds
    pub fn is_allocation(&self) -> bool {
        self.event_type == EVENT_ALLOC_IN_TLAB || self.event_type == EVENT_ALLOC_OUTSIDE_TLAB
    }

    /// Frames of the captured stack, or `None` if absent or empty
    pub fn frames(&self) -> Option<&[Frame]> {
        self.stack_trace
            .as_ref()
            .map(|st| st.frames.as_slice())
            .filter(|frames| !frames.is_empty())
    }
}
