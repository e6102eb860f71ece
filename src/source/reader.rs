//! Line-delimited JSON event source.
//!
//! The source is sequential, exhaustible, and single-pass: events are read
//! one at a time until end of stream, which is a normal terminal condition.
//! Lines that fail to deserialize are logged and skipped (malformed-event
//! policy); I/O failures are fatal.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};

use crate::source::events::AllocationEvent;
use crate::utils::error::SourceError;

/// A sequential, single-pass source of allocation events
pub trait EventSource {
    /// Read the next event; `None` marks end of stream
    fn next_event(&mut self) -> Result<Option<AllocationEvent>, SourceError>;
}

/// Event source over a line-delimited JSON export of a recording
pub struct JsonEventSource<R> {
    reader: R,
    line: String,
    line_no: u64,
    skipped_lines: u64,
}

impl JsonEventSource<BufReader<File>> {
    /// Open an exported recording from disk
    ///
    /// # Errors
    /// * `SourceError::OpenFailed` - the file cannot be opened
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        debug!("Opening recording: {}", path.display());

        let file = File::open(path).map_err(SourceError::OpenFailed)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonEventSource<R> {
    /// Wrap any buffered reader producing one JSON event object per line
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_no: 0,
            skipped_lines: 0,
        }
    }

    /// Number of undecodable lines skipped so far
    pub fn skipped_lines(&self) -> u64 {
        self.skipped_lines
    }
}

impl<R: BufRead> EventSource for JsonEventSource<R> {
    fn next_event(&mut self) -> Result<Option<AllocationEvent>, SourceError> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let trimmed = self.line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match serde_json::from_str::<AllocationEvent>(trimmed) {
                Ok(event) => return Ok(Some(event)),
                Err(e) => {
                    warn!("Skipping undecodable event at line {}: {}", self.line_no, e);
                    self.skipped_lines += 1;
                }
            }
        }
    }
}
