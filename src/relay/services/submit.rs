//! Producer-facing submission service.

use std::sync::Arc;

use thiserror::Error;

use crate::message::domain::RawEntry;
use crate::relay::ports::queue::{InboundQueue, QueueError};

/// Failures surfaced to a producer at submission time.
#[derive(Debug, Error, Clone)]
pub enum SubmitError {
    /// The inbound queue refused the entry.
    #[error("inbound queue unavailable: {0}")]
    Queue(#[from] QueueError),
    /// The entry could not be serialised for transport.
    #[error("entry could not be encoded: {0}")]
    Encode(String),
}

/// Accepts raw chat entries and places them on the inbound queue.
///
/// Submission is fire-and-forget: success means the entry was queued, not
/// that it was committed. Validation happens later in the relay worker, so
/// a submission with an invalid participant or empty body still succeeds
/// here and surfaces as a dead letter instead.
#[derive(Debug)]
pub struct SubmitService<Q> {
    queue: Arc<Q>,
}

impl<Q> SubmitService<Q>
where
    Q: InboundQueue,
{
    /// Creates a service submitting to `queue`.
    #[must_use]
    pub const fn new(queue: Arc<Q>) -> Self {
        Self { queue }
    }

    /// Encodes one entry and enqueues it for the relay worker.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Encode`] when serialisation fails and
    /// [`SubmitError::Queue`] when the queue is full or closed.
    pub async fn submit(
        &self,
        sender: &str,
        recipient: &str,
        content: &str,
    ) -> Result<(), SubmitError> {
        let entry = RawEntry::new(sender, recipient, content);
        let entry_id = entry.id();
        let payload = entry
            .encode()
            .map_err(|err| SubmitError::Encode(err.to_string()))?;
        self.queue.enqueue(payload).await?;
        tracing::debug!(id = %entry_id, sender, recipient, "entry queued");
        Ok(())
    }
}
