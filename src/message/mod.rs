//! Message model and persistence for the relay core.
//!
//! This context owns everything a committed message is made of and where
//! it lives: participant and conversation identity, the raw wire entry
//! producers submit, the validated immutable [`domain::Message`], and the
//! conversation store it commits into.
//!
//! # Architecture
//!
//! The context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure domain types ([`domain::Message`],
//!   [`domain::ConversationKey`], [`domain::RawEntry`], etc.)
//! - **Ports**: Abstract trait interfaces
//!   ([`ports::store::ConversationStore`], [`ports::feed::DeliveryFeed`])
//! - **Adapters**: Concrete implementations
//!   ([`adapters::memory::InMemoryConversationStore`],
//!   [`adapters::postgres::PostgresConversationStore`])
//!
//! # Example
//!
//! ```
//! use rohrpost::message::domain::{EntryLimits, RawEntry};
//! use mockable::DefaultClock;
//!
//! let clock = DefaultClock;
//! let entry = RawEntry::new("alice", "bob", "hello");
//! let (key, message) = entry
//!     .into_message(&EntryLimits::default(), &clock)
//!     .expect("valid entry");
//!
//! assert_eq!(key.low().as_str(), "alice");
//! assert_eq!(message.body().as_str(), "hello");
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
