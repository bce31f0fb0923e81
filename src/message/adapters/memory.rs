//! In-memory implementations of the message context ports.
//!
//! Provide simple, thread-safe adapters for unit testing and single-process
//! deployments without database dependencies.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::message::{
    domain::{ConversationKey, Message, MessageId, ParticipantId},
    error::{FeedError, StoreError},
    ports::{
        feed::DeliveryFeed,
        store::{ConversationStore, StoreResult},
    },
};

#[derive(Debug, Default)]
struct StoreInner {
    conversations: HashMap<ConversationKey, Vec<Message>>,
    committed_ids: HashSet<MessageId>,
}

/// In-memory implementation of [`ConversationStore`].
///
/// Thread-safe via internal [`RwLock`]; per-key ordering follows from
/// appends running under the write lock. Duplicate message ids are
/// absorbed silently, matching the idempotent-append contract.
///
/// # Example
///
/// ```
/// use rohrpost::message::adapters::memory::InMemoryConversationStore;
///
/// let store = InMemoryConversationStore::new();
/// assert_eq!(store.message_count(), 0);
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryConversationStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl InMemoryConversationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of committed messages.
    ///
    /// Returns `0` if the internal lock is poisoned, matching the fallback
    /// behaviour of an empty store. For error-propagating access, use the
    /// store trait methods instead.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.inner
            .read()
            .map(|guard| guard.committed_ids.len())
            .unwrap_or(0)
    }

    /// Returns the number of conversations with at least one message.
    ///
    /// Returns `0` if the internal lock is poisoned.
    #[must_use]
    pub fn conversation_count(&self) -> usize {
        self.inner
            .read()
            .map(|guard| guard.conversations.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn append(&self, key: &ConversationKey, message: Message) -> StoreResult<()> {
        let mut guard = self
            .inner
            .write()
            .map_err(|e| StoreError::unavailable(format!("lock poisoned: {e}")))?;

        if !guard.committed_ids.insert(message.id()) {
            // Redelivered entry; the first commit stands.
            return Ok(());
        }

        guard
            .conversations
            .entry(key.clone())
            .or_default()
            .push(message);
        Ok(())
    }

    async fn history(&self, key: &ConversationKey) -> StoreResult<Vec<Message>> {
        let guard = self
            .inner
            .read()
            .map_err(|e| StoreError::unavailable(format!("lock poisoned: {e}")))?;

        Ok(guard.conversations.get(key).cloned().unwrap_or_default())
    }

    async fn history_involving(&self, participant: &ParticipantId) -> StoreResult<Vec<Message>> {
        let guard = self
            .inner
            .read()
            .map_err(|e| StoreError::unavailable(format!("lock poisoned: {e}")))?;

        let mut messages: Vec<Message> = guard
            .conversations
            .iter()
            .filter(|(key, _)| key.involves(participant))
            .flat_map(|(_, history)| history.iter().cloned())
            .collect();

        // Cross-conversation order is commit-time order.
        messages.sort_by_key(Message::committed_at);

        Ok(messages)
    }
}

/// In-memory implementation of [`DeliveryFeed`].
///
/// Collects published messages per recipient for inspection in tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDeliveryFeed {
    feeds: Arc<RwLock<HashMap<ParticipantId, Vec<Message>>>>,
}

impl InMemoryDeliveryFeed {
    /// Creates an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the messages published to a recipient, in publish order.
    ///
    /// Returns an empty vector for unknown recipients or a poisoned lock.
    #[must_use]
    pub fn feed_for(&self, recipient: &ParticipantId) -> Vec<Message> {
        self.feeds
            .read()
            .ok()
            .and_then(|guard| guard.get(recipient).cloned())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DeliveryFeed for InMemoryDeliveryFeed {
    async fn publish(&self, recipient: &ParticipantId, message: &Message) -> Result<(), FeedError> {
        let mut guard = self
            .feeds
            .write()
            .map_err(|e| FeedError::new(format!("lock poisoned: {e}")))?;

        guard
            .entry(recipient.clone())
            .or_default()
            .push(message.clone());
        Ok(())
    }
}
