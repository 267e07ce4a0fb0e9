//! Progress reporting and cancellation.
//!
//! The orchestrator pushes `ProgressEvent` values to a `ProgressSink`; how
//! the consumer renders them (text bar, GUI callback, nothing) is the
//! caller's concern. Delivery is always serialized: even when tasks run in
//! parallel, a single thread drains outcomes and notifies the sink.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One progress notification. `current` is the 1-based count of tasks
/// processed so far; a pre-run informational event carries `current = 0`
/// (and `total = 0` when discovery found nothing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub current: usize,
    pub total: usize,
    pub message: String,
}

impl ProgressEvent {
    pub fn new(current: usize, total: usize, message: impl Into<String>) -> Self {
        Self {
            current,
            total,
            message: message.into(),
        }
    }
}

pub trait ProgressSink: Send {
    fn notify(&mut self, event: &ProgressEvent);
}

/// Discards every event. Used when the caller supplies no sink; the batch
/// result comes out identical either way.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn notify(&mut self, _event: &ProgressEvent) {}
}

/// Adapts a closure into a sink, the shape GUI callbacks arrive in.
pub struct FnSink<F>(pub F);

impl<F> ProgressSink for FnSink<F>
where
    F: FnMut(&ProgressEvent) + Send,
{
    fn notify(&mut self, event: &ProgressEvent) {
        (self.0)(event)
    }
}

/// Caller-supplied cancellation signal, checked between tasks. Cloning
/// shares the underlying flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
