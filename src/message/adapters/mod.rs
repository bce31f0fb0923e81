//! Persistence adapters for the message context.
//!
//! Concrete implementations of the [`ConversationStore`] and
//! [`DeliveryFeed`] ports. Adapters handle all infrastructure concerns
//! while the domain remains pure.
//!
//! # Available Adapters
//!
//! - [`memory::InMemoryConversationStore`] and
//!   [`memory::InMemoryDeliveryFeed`]: thread-safe in-memory
//!   implementations for tests and single-process use
//! - [`postgres::PostgresConversationStore`]: production-grade
//!   `PostgreSQL` persistence using Diesel ORM
//!
//! [`ConversationStore`]: crate::message::ports::store::ConversationStore
//! [`DeliveryFeed`]: crate::message::ports::feed::DeliveryFeed

pub mod memory;
pub mod postgres;
