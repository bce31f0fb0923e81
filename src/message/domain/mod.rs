//! Domain types for the message context.
//!
//! This module contains pure domain types with no infrastructure
//! dependencies. All types are immutable after construction and
//! serialisable via serde where they touch the wire.

mod conversation;
mod ids;
mod message;
mod raw_entry;

pub use conversation::ConversationKey;
pub use ids::{MAX_PARTICIPANT_LENGTH, MessageId, ParticipantId};
pub use message::{Message, MessageBody, PersistedMessage};
pub use raw_entry::{DEFAULT_MAX_BODY_CHARS, EntryLimits, QueuePayload, RawEntry};
