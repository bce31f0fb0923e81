//! Rohrpost: two-party chat relay core.
//!
//! This crate provides the asynchronous hand-off from "message submitted" to
//! "message durably ordered and retrievable by conversation": producers
//! enqueue raw entries, a relay worker validates and commits them into a
//! conversation store, and a query service answers ordered history lookups.
//! Transport and rendering layers sit above this crate; it defines the
//! queueing and storage contract they build on.
//!
//! # Architecture
//!
//! Rohrpost follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, channels, etc.)
//!
//! # Modules
//!
//! - [`message`]: Participant, conversation, and message model plus the
//!   conversation store and delivery feed ports and their adapters
//! - [`relay`]: Inbound queue, relay worker, submission and query services,
//!   and pipeline configuration

pub mod message;
pub mod relay;
