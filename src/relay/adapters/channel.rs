//! Bounded in-process queue backed by a Tokio channel.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use crate::message::domain::QueuePayload;
use crate::relay::ports::queue::{InboundQueue, QueueError, QueueResult};

/// Default capacity for [`ChannelQueue::new`].
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// In-process [`InboundQueue`] over a bounded mpsc channel.
///
/// Clones share the same channel, so producers hold clones while the relay
/// worker holds another. Enqueue never waits: at capacity it returns
/// [`QueueError::Full`] immediately. The receiver sits behind a mutex to
/// keep the type `Sync`; the relay worker is the only consumer, so the
/// lock is uncontended in practice.
#[derive(Debug, Clone)]
pub struct ChannelQueue {
    tx: mpsc::Sender<QueuePayload>,
    rx: Arc<Mutex<mpsc::Receiver<QueuePayload>>>,
}

impl ChannelQueue {
    /// Creates a queue with [`DEFAULT_QUEUE_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Creates a queue holding at most `capacity` payloads (minimum 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
        }
    }
}

impl Default for ChannelQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InboundQueue for ChannelQueue {
    async fn enqueue(&self, payload: QueuePayload) -> QueueResult<()> {
        self.tx.try_send(payload).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => QueueError::Full,
            mpsc::error::TrySendError::Closed(_) => QueueError::Closed,
        })
    }

    async fn dequeue(&self) -> QueueResult<QueuePayload> {
        let mut rx = self.rx.lock().await;
        rx.recv().await.ok_or(QueueError::Closed)
    }
}
