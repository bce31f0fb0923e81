//! Diesel row models for committed relay messages.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::messages;
use crate::message::{
    domain::{ConversationKey, Message, MessageBody, MessageId, ParticipantId, PersistedMessage},
    error::StoreError,
};

/// Query result row for committed messages.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    /// Message identifier.
    pub id: uuid::Uuid,
    /// Lexicographically smaller participant of the conversation key.
    pub participant_low: String,
    /// Lexicographically larger participant of the conversation key.
    pub participant_high: String,
    /// Sending participant.
    pub sender: String,
    /// Receiving participant.
    pub recipient: String,
    /// Message text payload.
    pub body: String,
    /// Commit timestamp.
    pub committed_at: DateTime<Utc>,
    /// Per-conversation commit sequence.
    pub position: i64,
}

impl MessageRow {
    /// Converts the row back into a domain message.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] when stored data no longer
    /// satisfies domain validation, which indicates a corrupt row.
    pub fn into_domain(self) -> Result<Message, StoreError> {
        let sender = ParticipantId::new(self.sender)
            .map_err(|e| StoreError::serialization(format!("corrupt sender: {e}")))?;
        let recipient = ParticipantId::new(self.recipient)
            .map_err(|e| StoreError::serialization(format!("corrupt recipient: {e}")))?;
        let body = MessageBody::new(self.body)
            .map_err(|e| StoreError::serialization(format!("corrupt body: {e}")))?;

        Ok(Message::from_persisted(PersistedMessage {
            id: MessageId::from_uuid(self.id),
            sender,
            recipient,
            body,
            committed_at: self.committed_at,
        }))
    }
}

/// Insert model for committed messages.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessageRow {
    /// Message identifier.
    pub id: uuid::Uuid,
    /// Lexicographically smaller participant of the conversation key.
    pub participant_low: String,
    /// Lexicographically larger participant of the conversation key.
    pub participant_high: String,
    /// Sending participant.
    pub sender: String,
    /// Receiving participant.
    pub recipient: String,
    /// Message text payload.
    pub body: String,
    /// Commit timestamp.
    pub committed_at: DateTime<Utc>,
    /// Per-conversation commit sequence.
    pub position: i64,
}

impl NewMessageRow {
    /// Builds an insert row from a domain message and its assigned position.
    #[must_use]
    pub fn from_domain(key: &ConversationKey, message: &Message, position: i64) -> Self {
        Self {
            id: message.id().into_inner(),
            participant_low: key.low().as_str().to_owned(),
            participant_high: key.high().as_str().to_owned(),
            sender: message.sender().as_str().to_owned(),
            recipient: message.recipient().as_str().to_owned(),
            body: message.body().as_str().to_owned(),
            committed_at: message.committed_at(),
            position,
        }
    }
}
