//! Allocation event model and event sources.
//!
//! This module handles:
//! - The structured allocation event consumed by the pipeline
//! - Reading events sequentially from an exported recording

pub mod events;
pub mod reader;

// Re-export main types
pub use events::{AllocationEvent, Frame, StackTrace};
pub use reader::{EventSource, JsonEventSource};
