//! Inbound queue port.

use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::message::domain::QueuePayload;

/// Convenience alias for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Failures surfaced by an inbound queue.
#[derive(Debug, Error, Clone)]
pub enum QueueError {
    /// The queue is at capacity and rejected the payload.
    #[error("queue is full")]
    Full,
    /// The queue has been closed; no further payloads can move through it.
    #[error("queue is closed")]
    Closed,
    /// The queue backend failed.
    #[error("queue backend error: {0}")]
    Backend(Arc<dyn Error + Send + Sync>),
}

impl QueueError {
    /// Wraps a backend error.
    #[must_use]
    pub fn backend(err: impl Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}

/// Transport for encoded entries between producers and the relay worker.
///
/// Producers enqueue without waiting for delivery; the relay worker is the
/// sole consumer. Implementations must hand payloads to the consumer in
/// enqueue order.
#[async_trait]
pub trait InboundQueue: Send + Sync {
    /// Adds an encoded entry to the queue.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Full`] when the queue is at capacity, so the
    /// producer can apply its own backpressure policy, and
    /// [`QueueError::Closed`] when the queue no longer accepts payloads.
    async fn enqueue(&self, payload: QueuePayload) -> QueueResult<()>;

    /// Removes and returns the oldest entry, waiting until one is available.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] once the queue shuts down and drains.
    async fn dequeue(&self) -> QueueResult<QueuePayload>;
}
