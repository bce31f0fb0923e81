//! In-memory dead-letter sink.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::relay::ports::dead_letter::{DeadLetter, DeadLetterSink};

/// [`DeadLetterSink`] that collects letters in memory for inspection.
///
/// Clones share the same backing store, so tests can keep one clone and
/// hand another to the worker.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDeadLetterSink {
    letters: Arc<RwLock<Vec<DeadLetter>>>,
}

impl InMemoryDeadLetterSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the consigned letters in arrival order.
    #[must_use]
    pub fn letters(&self) -> Vec<DeadLetter> {
        self.letters
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Returns the number of consigned letters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.letters.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Returns `true` when nothing has been consigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DeadLetterSink for InMemoryDeadLetterSink {
    async fn consign(&self, letter: DeadLetter) {
        self.letters.write().map_or_else(
            |err| {
                tracing::error!(error = %err, "dead-letter store poisoned; letter dropped");
            },
            |mut guard| guard.push(letter),
        );
    }
}
