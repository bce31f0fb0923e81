//! Conversation store port.
//!
//! Defines the abstract interface for the durable, queryable home of
//! committed messages, allowing different persistence implementations
//! (`PostgreSQL`, in-memory, etc.).

use crate::message::{
    domain::{ConversationKey, Message, ParticipantId},
    error::StoreError,
};
use async_trait::async_trait;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Port for conversation history persistence.
///
/// # Implementation Notes
///
/// Implementations must ensure:
/// - Appends to the same conversation key are serialized, so each key's
///   history is totally ordered with no interleaved partial writes
/// - Appends to different keys are safe to run concurrently
/// - Appends are idempotent on [`Message::id`]: re-appending an
///   already-committed id succeeds without creating a second copy
/// - Committed messages are immutable (no update or delete operations)
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Appends a message to the end of the key's ordered history.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be reached or rejects
    /// the write. [`StoreError::is_transient`] distinguishes failures worth
    /// retrying from permanent ones.
    async fn append(&self, key: &ConversationKey, message: Message) -> StoreResult<()>;

    /// Returns the key's history in commit order, oldest first.
    ///
    /// A conversation with no messages yet yields an empty vector, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails.
    async fn history(&self, key: &ConversationKey) -> StoreResult<Vec<Message>>;

    /// Returns every message the participant sent or received, across all
    /// of their conversations, in commit-time order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails.
    async fn history_involving(&self, participant: &ParticipantId) -> StoreResult<Vec<Message>>;
}
