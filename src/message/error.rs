//! Error types for message validation and persistence.
//!
//! Uses `thiserror` for ergonomic error handling with typed variants
//! that can be inspected by callers.

use std::sync::Arc;
use thiserror::Error;

/// Errors produced when validating a participant identifier token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParticipantIdError {
    /// The token is empty after trimming.
    #[error("participant identifier is empty")]
    Empty,

    /// The token exceeds the maximum length.
    #[error("participant identifier is {length} bytes, exceeds limit of {max}")]
    TooLong {
        /// The actual byte length after trimming.
        length: usize,
        /// The maximum allowed byte length.
        max: usize,
    },

    /// The token contains whitespace or control characters.
    #[error("participant identifier contains whitespace or control characters: {0:?}")]
    InvalidToken(String),
}

/// Error for a message body that is empty after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("message body is empty after trimming")]
pub struct EmptyBodyError;

/// Permanent validation failures for raw queue entries.
///
/// Every variant classifies the entry as unrecoverable: the relay worker
/// logs the reason, dead-letters the entry, and moves on. Nothing here is
/// retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    /// The payload bytes do not decode into a raw entry.
    #[error("malformed queue payload: {0}")]
    MalformedPayload(String),

    /// The sender token failed validation.
    #[error("invalid sender: {0}")]
    Sender(ParticipantIdError),

    /// The recipient token failed validation.
    #[error("invalid recipient: {0}")]
    Recipient(ParticipantIdError),

    /// The body is empty after trimming.
    #[error(transparent)]
    EmptyBody(#[from] EmptyBodyError),

    /// The body exceeds the configured length cap.
    #[error("message body has {chars} characters, exceeds limit of {max}")]
    BodyTooLong {
        /// The actual character count.
        chars: usize,
        /// The configured maximum.
        max: usize,
    },
}

/// Errors that can occur during conversation store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store backend cannot currently be reached.
    ///
    /// This is the transient class: the relay worker retries appends that
    /// fail this way before giving up.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store backend rejected or failed the operation.
    #[error("store backend error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),

    /// Stored data could not be converted to or from the domain model.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Creates an unavailability error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Creates a backend error from any error type.
    #[must_use]
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Returns `true` when retrying the same operation may succeed.
    ///
    /// Only unavailability is transient; backend and serialization errors
    /// reproduce deterministically and go straight to the dead-letter path.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> Self {
        // Diesel query errors reproduce on retry, so they classify as
        // backend errors. Pool acquisition failures are mapped to
        // Unavailable separately by the adapter.
        Self::backend(err)
    }
}

/// Error from a delivery feed publish.
///
/// Feed delivery is best-effort: the relay worker logs this error and
/// continues, it never fails a commit.
#[derive(Debug, Clone, Error)]
#[error("delivery feed error: {0}")]
pub struct FeedError(String);

impl FeedError {
    /// Creates a feed error from a description.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
