//! Delivery feed port.
//!
//! After a message commits, the relay worker optionally fans it out to a
//! per-recipient feed so recipient-side consumers can observe new arrivals
//! without polling conversation histories.

use crate::message::{
    domain::{Message, ParticipantId},
    error::FeedError,
};
use async_trait::async_trait;

/// Port for best-effort post-commit delivery fan-out.
///
/// Feed delivery is strictly weaker than the store contract: a publish
/// failure is logged by the relay worker and otherwise ignored, so
/// implementations may drop on overload without affecting committed
/// history.
#[async_trait]
pub trait DeliveryFeed: Send + Sync {
    /// Publishes a committed message to the recipient's feed.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] if the feed backend rejects the publish. The
    /// caller treats this as best-effort and does not retry.
    async fn publish(&self, recipient: &ParticipantId, message: &Message) -> Result<(), FeedError>;
}
