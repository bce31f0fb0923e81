//! Application services for the relay pipeline.
//!
//! [`SubmitService`] is the producer edge, [`RelayWorker`] the pipeline
//! itself, and [`QueryService`] the read side. Wiring the three together
//! with a shared queue and store yields the full submit-to-history flow.

mod query;
mod submit;
mod worker;

pub use query::{QueryError, QueryService};
pub use submit::{SubmitError, SubmitService};
pub use worker::{RelayStats, RelayWorker, RelayWorkerHandle};
