//! Abstract trait interfaces for the message context.

pub mod feed;
pub mod store;
