//! Normalized conversation key for two-party message histories.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ParticipantId;

/// Normalized unordered pair of participants identifying one conversation.
///
/// The pair is ordered lexicographically at construction, so the key built
/// from `(A, B)` equals the key built from `(B, A)` and both index the same
/// history. Self-conversations (`A` with `A`) are legal and normalize to a
/// key whose two sides are equal.
///
/// # Examples
///
/// ```
/// use rohrpost::message::domain::{ConversationKey, ParticipantId};
///
/// let alice = ParticipantId::new("alice").expect("valid token");
/// let bob = ParticipantId::new("bob").expect("valid token");
///
/// let forward = ConversationKey::between(alice.clone(), bob.clone());
/// let reverse = ConversationKey::between(bob, alice);
/// assert_eq!(forward, reverse);
/// assert_eq!(forward.low().as_str(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationKey {
    low: ParticipantId,
    high: ParticipantId,
}

impl ConversationKey {
    /// Creates the normalized key for a conversation between two participants.
    ///
    /// Argument order does not matter; the lexicographically smaller token
    /// becomes [`low`](Self::low).
    #[must_use]
    pub fn between(a: ParticipantId, b: ParticipantId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// Returns the lexicographically smaller participant of the pair.
    #[must_use]
    pub const fn low(&self) -> &ParticipantId {
        &self.low
    }

    /// Returns the lexicographically larger participant of the pair.
    #[must_use]
    pub const fn high(&self) -> &ParticipantId {
        &self.high
    }

    /// Returns `true` when the participant is one side of this conversation.
    #[must_use]
    pub fn involves(&self, participant: &ParticipantId) -> bool {
        &self.low == participant || &self.high == participant
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<->{}", self.low, self.high)
    }
}
