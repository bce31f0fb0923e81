//! Read-side conversation queries.

use std::sync::Arc;

use thiserror::Error;

use crate::message::domain::{ConversationKey, Message, ParticipantId};
use crate::message::error::{ParticipantIdError, StoreError};
use crate::message::ports::store::ConversationStore;

/// Failures surfaced by conversation queries.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A supplied participant identifier failed validation.
    #[error("invalid participant: {0}")]
    Participant(#[from] ParticipantIdError),
    /// The conversation store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Answers history queries against the conversation store.
///
/// Queries are independent of the relay worker: they read whatever has
/// been committed so far and never touch the inbound queue.
#[derive(Debug)]
pub struct QueryService<S> {
    store: Arc<S>,
}

impl<S> QueryService<S>
where
    S: ConversationStore,
{
    /// Creates a service reading from `store`.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the committed history between two participants, oldest first.
    ///
    /// The pair is unordered: `conversation("alice", "bob")` and
    /// `conversation("bob", "alice")` return the same transcript. An
    /// unknown pair yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Participant`] for invalid identifiers and
    /// [`QueryError::Store`] when the store fails.
    pub async fn conversation(&self, one: &str, other: &str) -> Result<Vec<Message>, QueryError> {
        let first = ParticipantId::new(one)?;
        let second = ParticipantId::new(other)?;
        let key = ConversationKey::between(first, second);
        let messages = self.store.history(&key).await?;
        tracing::debug!(key = %key, count = messages.len(), "conversation history read");
        Ok(messages)
    }

    /// Returns every committed message the participant sent or received,
    /// across all of their conversations, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Participant`] for an invalid identifier and
    /// [`QueryError::Store`] when the store fails.
    pub async fn involving(&self, participant: &str) -> Result<Vec<Message>, QueryError> {
        let id = ParticipantId::new(participant)?;
        let messages = self.store.history_involving(&id).await?;
        tracing::debug!(participant = %id, count = messages.len(), "participant history read");
        Ok(messages)
    }
}
