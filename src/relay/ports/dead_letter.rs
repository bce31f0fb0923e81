//! Dead-letter port for entries the relay cannot commit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::message::domain::QueuePayload;
use crate::message::error::EntryError;

/// Why an entry was consigned rather than committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeadLetterReason {
    /// The entry failed decoding or validation and was never eligible.
    Rejected(EntryError),
    /// Every append attempt against the store failed.
    StoreFailed {
        /// Attempts made before giving up.
        attempts: u32,
        /// Rendering of the final error.
        last_error: String,
    },
    /// The pipeline itself failed to route the entry.
    PipelineFault(String),
}

/// An entry the relay gave up on, kept for inspection.
#[derive(Debug, Clone)]
pub struct DeadLetter {
    /// The payload exactly as it was dequeued.
    pub payload: QueuePayload,
    /// Why the relay consigned it.
    pub reason: DeadLetterReason,
    /// When the relay gave up.
    pub failed_at: DateTime<Utc>,
}

/// Terminal destination for entries the relay cannot commit.
///
/// Consignment is best effort: implementations log and drop on internal
/// failure rather than erroring, so the worker loop never stalls on its
/// own failure path.
#[async_trait]
pub trait DeadLetterSink: Send + Sync {
    /// Records a failed entry.
    async fn consign(&self, letter: DeadLetter);
}
