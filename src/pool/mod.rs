//! Bounded worker pool for event aggregation.
//!
//! One producer submits one task per qualifying event; a fixed set of
//! worker threads executes them against a shared [`ReportContext`]. The
//! task queue is bounded: when it is full the producer runs the task on its
//! own thread (caller-runs backpressure) instead of blocking indefinitely
//! or dropping work, so no event is ever lost and the queue cannot grow
//! without bound.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use log::{debug, trace};

use crate::aggregator::{build_key, AggregationTable, IncludeFilter};
use crate::source::AllocationEvent;
use crate::utils::error::PoolError;

/// Cooperative cancellation token
///
/// Checked by workers at task start and by the producer in its read loop,
/// so a cancelled run aborts gracefully instead of hanging until the drain
/// bound.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a graceful abort of the run
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Shared state each aggregation task runs against
///
/// Tasks own their event; everything shared flows through here. The filter
/// is read-only and the table is only touched through its atomic `add`, so
/// workers never block on each other.
#[derive(Debug)]
pub struct ReportContext {
    filter: IncludeFilter,
    table: Arc<AggregationTable>,
    cancel: CancelToken,
    accepted: AtomicU64,
    dropped: AtomicU64,
}

impl ReportContext {
    pub fn new(filter: IncludeFilter, table: Arc<AggregationTable>, cancel: CancelToken) -> Self {
        Self {
            filter,
            table,
            cancel,
            accepted: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Aggregate one allocation event
    ///
    /// Events of an unrecognized kind, or missing a stack, object class, or
    /// size, are not applicable and contribute nothing. A malformed type
    /// descriptor drops just that event.
    pub fn process(&self, event: AllocationEvent) {
        if self.cancel.is_cancelled() {
            return;
        }
        if !event.is_allocation() {
            return;
        }

        let (Some(frames), Some(object_class), Some(size)) = (
            event.frames(),
            event.object_class.as_deref(),
            event.allocation_size,
        ) else {
            return;
        };

        match build_key(frames, object_class) {
            Ok(key) => {
                if self.filter.accepts(&key) {
                    self.table.add(key, size);
                    self.accepted.fetch_add(1, Ordering::Relaxed);
                }
            }
            Err(e) => {
                trace!("Dropping event with unusable stack key: {}", e);
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Events accepted into the table so far
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    /// Events dropped for unusable keys so far
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Fixed-size pool of worker threads fed from a bounded queue
pub struct WorkerPool {
    ctx: Arc<ReportContext>,
    sender: Option<Sender<AllocationEvent>>,
    done_rx: Receiver<()>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `workers` threads behind a queue of `queue_cap` pending tasks
    ///
    /// # Errors
    /// * `PoolError::SpawnFailed` - the OS refused a worker thread
    pub fn new(
        workers: usize,
        queue_cap: usize,
        ctx: Arc<ReportContext>,
    ) -> Result<Self, PoolError> {
        let workers = workers.max(1);
        let (tx, rx) = bounded::<AllocationEvent>(queue_cap.max(1));
        let (done_tx, done_rx) = bounded::<()>(workers);

        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let rx = rx.clone();
            let done = done_tx.clone();
            let ctx = Arc::clone(&ctx);
            let handle = std::thread::Builder::new()
                .name(format!("memflame-worker-{id}"))
                .spawn(move || {
                    for event in rx.iter() {
                        ctx.process(event);
                    }
                    let _ = done.send(());
                })?;
            handles.push(handle);
        }

        debug!("Worker pool started: {} workers", workers);

        Ok(Self {
            ctx,
            sender: Some(tx),
            done_rx,
            handles,
        })
    }

    /// Submit one event for aggregation
    ///
    /// If the queue is full the event is processed synchronously on the
    /// calling thread - the caller-runs overflow policy. Nothing is dropped.
    pub fn submit(&self, event: AllocationEvent) {
        let Some(sender) = &self.sender else {
            return;
        };

        match sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                trace!("Task queue full, running task on submitting thread");
                self.ctx.process(event);
            }
            Err(TrySendError::Disconnected(event)) => {
                // Workers already gone; still honor the no-loss contract
                self.ctx.process(event);
            }
        }
    }

    /// Close the queue and wait for every worker to finish its backlog
    ///
    /// The table must not be read until this returns: only then is every
    /// submitted-but-not-yet-executed task guaranteed complete.
    ///
    /// # Errors
    /// * `PoolError::DrainTimeout` - the backlog did not drain within `timeout`
    /// * `PoolError::WorkerFailed` - a worker exited without signalling
    pub fn finish(mut self, timeout: Duration) -> Result<(), PoolError> {
        // No more tasks will arrive; workers exit once the queue is empty
        drop(self.sender.take());

        let deadline = Instant::now() + timeout;
        for _ in 0..self.handles.len() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.done_rx.recv_timeout(remaining) {
                Ok(()) => {}
                Err(RecvTimeoutError::Timeout) => return Err(PoolError::DrainTimeout(timeout)),
                Err(RecvTimeoutError::Disconnected) => return Err(PoolError::WorkerFailed),
            }
        }

        for handle in self.handles.drain(..) {
            handle.join().map_err(|_| PoolError::WorkerFailed)?;
        }

        debug!("Worker pool drained");
        Ok(())
    }
}
