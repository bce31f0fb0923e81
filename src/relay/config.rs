//! Relay pipeline configuration.
//!
//! All tunables are supplied by the embedding application; nothing in the
//! pipeline hardcodes endpoints, limits, or concurrency. Backend locations
//! live with the adapters (a database URL builds the store, a capacity
//! builds the channel queue); this module carries the behavioural knobs.

use std::time::Duration;

use crate::message::domain::EntryLimits;

/// Largest exponent applied when doubling the backoff delay.
const MAX_BACKOFF_EXPONENT: u32 = 16;

/// Bounded retry budget with exponential backoff.
///
/// Attempts are counted from one: the first failure consumes attempt 1,
/// and no further attempt is made once `max_attempts` is reached. Delays
/// double per attempt from `base_delay` and never exceed `max_delay`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use rohrpost::relay::config::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert!(policy.delay_for(1) < policy.delay_for(3));
/// assert!(policy.delay_for(60) <= policy.max_delay);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total append attempts per entry, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// A policy that never retries: one attempt, then dead-letter.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Returns the backoff delay after the given failed attempt (1-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
        let factor = 1_u32 << exponent;
        let delay = self.base_delay.saturating_mul(factor);
        delay.min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(2),
        }
    }
}

/// Configuration for the relay worker and its validation stage.
///
/// # Examples
///
/// ```
/// use rohrpost::message::domain::EntryLimits;
/// use rohrpost::relay::config::RelayConfig;
///
/// let config = RelayConfig::default()
///     .with_worker_lanes(4)
///     .with_limits(EntryLimits::strict());
/// assert_eq!(config.worker_lanes, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayConfig {
    /// Number of concurrent commit lanes (clamped to at least 1 at spawn).
    ///
    /// Entries are routed to lanes by conversation key, so per-key order
    /// holds for any lane count while distinct keys commit in parallel.
    pub worker_lanes: usize,
    /// Validation limits applied to each dequeued entry.
    pub limits: EntryLimits,
    /// Retry budget for transient store failures.
    pub retry: RetryPolicy,
}

impl RelayConfig {
    /// Replaces the lane count.
    #[must_use]
    pub const fn with_worker_lanes(mut self, worker_lanes: usize) -> Self {
        self.worker_lanes = worker_lanes;
        self
    }

    /// Replaces the validation limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: EntryLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Replaces the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            worker_lanes: 1,
            limits: EntryLimits::default(),
            retry: RetryPolicy::default(),
        }
    }
}
