//! Committed message aggregate and its body type.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ConversationKey, MessageId, ParticipantId};
use crate::message::error::EmptyBodyError;

/// Validated message text payload.
///
/// The original text is preserved byte-for-byte, including surrounding
/// whitespace; validation only requires that something non-whitespace
/// remains after trimming. Length limits are applied at relay time against
/// the configured [`EntryLimits`](super::EntryLimits).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageBody(String);

impl MessageBody {
    /// Creates a message body from raw text.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyBodyError`] when the text is empty after trimming.
    pub fn new(text: impl Into<String>) -> Result<Self, EmptyBodyError> {
        let raw = text.into();
        if raw.trim().is_empty() {
            return Err(EmptyBodyError);
        }
        Ok(Self(raw))
    }

    /// Returns the body text as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the number of characters in the body.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl AsRef<str> for MessageBody {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for MessageBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Field set for rebuilding a [`Message`] from persistent storage.
///
/// Store adapters reconstruct committed messages with their original
/// timestamps via [`Message::from_persisted`]; this struct carries the
/// already-validated parts.
#[derive(Debug, Clone)]
pub struct PersistedMessage {
    /// Message identifier as committed.
    pub id: MessageId,
    /// Sending participant.
    pub sender: ParticipantId,
    /// Receiving participant.
    pub recipient: ParticipantId,
    /// Message text payload.
    pub body: MessageBody,
    /// Commit timestamp recorded by the relay worker.
    pub committed_at: DateTime<Utc>,
}

/// An immutable message committed into a conversation history.
///
/// Messages exist only on the far side of the relay worker: a raw queue
/// entry becomes a `Message` when it is validated and stamped, and from
/// then on it never changes. The commit timestamp comes from the injected
/// [`Clock`] at stamping time, not from submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    sender: ParticipantId,
    recipient: ParticipantId,
    body: MessageBody,
    committed_at: DateTime<Utc>,
}

impl Message {
    /// Stamps a validated entry into a committed message.
    ///
    /// The commit timestamp is read from `clock` at the moment of the call.
    #[must_use]
    pub fn commit(
        id: MessageId,
        sender: ParticipantId,
        recipient: ParticipantId,
        body: MessageBody,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id,
            sender,
            recipient,
            body,
            committed_at: clock.utc(),
        }
    }

    /// Rebuilds a message from persisted parts, keeping its original
    /// commit timestamp.
    #[must_use]
    pub fn from_persisted(parts: PersistedMessage) -> Self {
        Self {
            id: parts.id,
            sender: parts.sender,
            recipient: parts.recipient,
            body: parts.body,
            committed_at: parts.committed_at,
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the sending participant.
    #[must_use]
    pub const fn sender(&self) -> &ParticipantId {
        &self.sender
    }

    /// Returns the receiving participant.
    #[must_use]
    pub const fn recipient(&self) -> &ParticipantId {
        &self.recipient
    }

    /// Returns the message body.
    #[must_use]
    pub const fn body(&self) -> &MessageBody {
        &self.body
    }

    /// Returns the commit timestamp.
    #[must_use]
    pub const fn committed_at(&self) -> DateTime<Utc> {
        self.committed_at
    }

    /// Returns the normalized conversation key this message belongs to.
    #[must_use]
    pub fn conversation_key(&self) -> ConversationKey {
        ConversationKey::between(self.sender.clone(), self.recipient.clone())
    }
}
