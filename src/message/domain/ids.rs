//! Identifier newtypes for messages and participants.
//!
//! [`MessageId`] wraps a UUID to prevent accidental mixing with other
//! identifier types; it is assigned at submission and doubles as the
//! idempotency key for store appends. [`ParticipantId`] is a validated
//! string token naming one side of a conversation.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::message::error::ParticipantIdError;

/// Maximum byte length of a participant identifier.
pub const MAX_PARTICIPANT_LENGTH: usize = 64;

/// Unique identifier for a message flowing through the relay.
///
/// Assigned by the submitting producer and carried in the raw queue entry,
/// so a redelivered entry commits under the same identity. Store adapters
/// treat an append with an already-committed id as a no-op success.
///
/// # Examples
///
/// ```
/// use rohrpost::message::domain::MessageId;
///
/// let id = MessageId::new();
/// assert!(!id.as_ref().is_nil());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Creates a new random message identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a message identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

/// Note: This implementation generates a new random UUID on each call,
/// which is non-standard behaviour for `Default`. Use `MessageId::new()`
/// if the intent to generate a random ID should be explicit.
impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for MessageId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated participant identifier.
///
/// Participants are opaque string tokens chosen by the layers above the
/// relay. The input is trimmed; what remains must be non-empty, at most
/// [`MAX_PARTICIPANT_LENGTH`] bytes, and free of whitespace and control
/// characters. Case is preserved, so `"Alice"` and `"alice"` are distinct
/// participants.
///
/// # Examples
///
/// ```
/// use rohrpost::message::domain::ParticipantId;
///
/// let alice = ParticipantId::new("  alice ").expect("valid token");
/// assert_eq!(alice.as_str(), "alice");
/// assert!(ParticipantId::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Creates a validated participant identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ParticipantIdError::Empty`] when the value is empty after
    /// trimming, [`ParticipantIdError::TooLong`] when it exceeds
    /// [`MAX_PARTICIPANT_LENGTH`] bytes, or [`ParticipantIdError::InvalidToken`]
    /// when it contains whitespace or control characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ParticipantIdError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(ParticipantIdError::Empty);
        }

        if trimmed.len() > MAX_PARTICIPANT_LENGTH {
            return Err(ParticipantIdError::TooLong {
                length: trimmed.len(),
                max: MAX_PARTICIPANT_LENGTH,
            });
        }

        let is_token = trimmed
            .chars()
            .all(|c| !c.is_whitespace() && !c.is_control());

        if !is_token {
            return Err(ParticipantIdError::InvalidToken(raw));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the participant identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ParticipantId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
