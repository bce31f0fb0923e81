//! Ports consumed by the relay pipeline.

pub mod dead_letter;
pub mod queue;
