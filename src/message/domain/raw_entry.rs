//! Raw queue entries and their wire encoding.
//!
//! A [`RawEntry`] is the unvalidated, unstamped tuple a producer places on
//! the inbound queue. The queue itself carries an opaque [`QueuePayload`];
//! the JSON codec on `RawEntry` is the only party that interprets those
//! bytes. Structural serialisation keeps field boundaries unambiguous for
//! any content, so a body containing `|`, quotes, or newlines survives the
//! round trip unchanged.

use mockable::Clock;
use serde::{Deserialize, Serialize};

use super::{ConversationKey, Message, MessageBody, MessageId, ParticipantId};
use crate::message::error::EntryError;

/// Default cap on message body length, in characters.
pub const DEFAULT_MAX_BODY_CHARS: usize = 10_000;

/// Relay-time limits applied when a raw entry is validated.
///
/// # Examples
///
/// ```
/// use rohrpost::message::domain::EntryLimits;
///
/// let limits = EntryLimits::default().with_max_body_chars(280);
/// assert_eq!(limits.max_body_chars, 280);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryLimits {
    /// Maximum number of characters allowed in a message body.
    pub max_body_chars: usize,
}

impl EntryLimits {
    /// Limits suitable for short-form messaging.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            max_body_chars: 512,
        }
    }

    /// Replaces the body length cap.
    #[must_use]
    pub const fn with_max_body_chars(mut self, max_body_chars: usize) -> Self {
        self.max_body_chars = max_body_chars;
        self
    }
}

impl Default for EntryLimits {
    fn default() -> Self {
        Self {
            max_body_chars: DEFAULT_MAX_BODY_CHARS,
        }
    }
}

/// Opaque serialized bytes as carried by the inbound queue.
///
/// The queue has no knowledge of entry semantics; producers encode a
/// [`RawEntry`] into a payload and the relay worker decodes it back out.
/// Anything else found inside is a malformed entry by definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuePayload(Vec<u8>);

impl QueuePayload {
    /// Wraps raw bytes as a queue payload.
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Returns the payload bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the payload holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Unwraps the payload into its bytes.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for QueuePayload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

/// Unvalidated queue entry: the `(sender, recipient, content)` tuple plus
/// the idempotency id assigned at submission.
///
/// A `RawEntry` carries no timestamp and makes no validity promises; it
/// becomes a [`Message`] only through [`into_message`](Self::into_message)
/// in the relay worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    id: MessageId,
    sender: String,
    recipient: String,
    content: String,
}

impl RawEntry {
    /// Creates a raw entry with a freshly assigned idempotency id.
    #[must_use]
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::with_id(MessageId::new(), sender, recipient, content)
    }

    /// Creates a raw entry with a caller-supplied id.
    #[must_use]
    pub fn with_id(
        id: MessageId,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            sender: sender.into(),
            recipient: recipient.into(),
            content: content.into(),
        }
    }

    /// Returns the idempotency id.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the claimed sender token.
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the claimed recipient token.
    #[must_use]
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Returns the unvalidated content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Encodes the entry into an opaque queue payload.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] if serialisation fails.
    pub fn encode(&self) -> Result<QueuePayload, serde_json::Error> {
        serde_json::to_vec(self).map(QueuePayload::new)
    }

    /// Decodes a queue payload back into a raw entry.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::MalformedPayload`] when the bytes are not a
    /// well-formed entry (truncated JSON, wrong shape, missing fields).
    pub fn decode(payload: &QueuePayload) -> Result<Self, EntryError> {
        serde_json::from_slice(payload.as_bytes())
            .map_err(|e| EntryError::MalformedPayload(e.to_string()))
    }

    /// Validates the entry and stamps it into a committed [`Message`].
    ///
    /// Participant tokens are validated, the body must be non-empty after
    /// trimming and within `limits`, the conversation key is normalized,
    /// and the commit timestamp is read from `clock`.
    ///
    /// # Errors
    ///
    /// Returns the [`EntryError`] describing the first failed check. All
    /// entry errors are permanent: the relay worker dead-letters the entry
    /// rather than retrying it.
    pub fn into_message(
        self,
        limits: &EntryLimits,
        clock: &impl Clock,
    ) -> Result<(ConversationKey, Message), EntryError> {
        let sender = ParticipantId::new(self.sender).map_err(EntryError::Sender)?;
        let recipient = ParticipantId::new(self.recipient).map_err(EntryError::Recipient)?;

        let body = MessageBody::new(self.content)?;
        let chars = body.char_count();
        if chars > limits.max_body_chars {
            return Err(EntryError::BodyTooLong {
                chars,
                max: limits.max_body_chars,
            });
        }

        let key = ConversationKey::between(sender.clone(), recipient.clone());
        let message = Message::commit(self.id, sender, recipient, body, clock);
        Ok((key, message))
    }
}
