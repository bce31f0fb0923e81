//! Concrete adapters for the relay's ports.

pub mod channel;
pub mod dead_letter;
