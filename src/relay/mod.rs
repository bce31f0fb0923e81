//! Relay bounded context: the pipeline between producers and history.
//!
//! Producers hand entries to [`services::SubmitService`], which encodes
//! them onto an [`ports::queue::InboundQueue`]. The
//! [`services::RelayWorker`] drains that queue, validates and stamps each
//! entry, and appends it to the message context's conversation store,
//! consigning anything uncommittable to a
//! [`ports::dead_letter::DeadLetterSink`]. [`services::QueryService`]
//! serves reads over the committed history.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use mockable::DefaultClock;
//! use rohrpost::message::adapters::memory::InMemoryConversationStore;
//! use rohrpost::relay::adapters::channel::ChannelQueue;
//! use rohrpost::relay::adapters::dead_letter::InMemoryDeadLetterSink;
//! use rohrpost::relay::config::RelayConfig;
//! use rohrpost::relay::services::{QueryService, RelayWorker, SubmitService};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let queue = Arc::new(ChannelQueue::new());
//! let store = Arc::new(InMemoryConversationStore::new());
//! let worker = RelayWorker::new(
//!     Arc::clone(&queue),
//!     Arc::clone(&store),
//!     Arc::new(InMemoryDeadLetterSink::new()),
//!     Arc::new(DefaultClock),
//!     RelayConfig::default(),
//! );
//! let handle = worker.spawn();
//!
//! let submit = SubmitService::new(queue);
//! submit.submit("alice", "bob", "hello").await.expect("queued");
//! while handle.stats().processed() < 1 {
//!     tokio::time::sleep(std::time::Duration::from_millis(5)).await;
//! }
//!
//! let query = QueryService::new(store);
//! let history = query.conversation("alice", "bob").await.expect("history");
//! assert_eq!(history.len(), 1);
//! handle.shutdown().await;
//! # }
//! ```

pub mod adapters;
pub mod config;
pub mod ports;
pub mod services;
