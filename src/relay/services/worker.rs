//! The relay worker: the single consumer of the inbound queue.
//!
//! One dispatcher task dequeues payloads, decodes and validates them, and
//! stamps commit timestamps. Validated entries are routed to commit lanes
//! by conversation key, so messages of the same conversation always commit
//! through the same lane, in dequeue order, while distinct conversations
//! proceed in parallel. Entries that cannot be committed are consigned to
//! the dead-letter sink rather than dropped.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use mockable::Clock;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::message::domain::{ConversationKey, EntryLimits, Message, QueuePayload, RawEntry};
use crate::message::error::EntryError;
use crate::message::ports::feed::DeliveryFeed;
use crate::message::ports::store::ConversationStore;
use crate::relay::config::{RelayConfig, RetryPolicy};
use crate::relay::ports::dead_letter::{DeadLetter, DeadLetterReason, DeadLetterSink};
use crate::relay::ports::queue::{InboundQueue, QueueError};

/// Per-lane buffer of validated entries awaiting commit.
const LANE_BUFFER: usize = 32;

/// Pause after a transient dequeue failure before polling again.
const DEQUEUE_ERROR_BACKOFF: Duration = Duration::from_millis(250);

/// Snapshot of the worker's terminal-outcome counters.
///
/// The three counters are disjoint: every dequeued entry ends up in
/// exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelayStats {
    /// Entries validated and appended to the conversation store.
    pub committed: u64,
    /// Entries refused by decoding or validation.
    pub rejected: u64,
    /// Entries consigned after store or pipeline failures.
    pub dead_lettered: u64,
}

impl RelayStats {
    /// Total entries that reached a terminal outcome.
    #[must_use]
    pub const fn processed(&self) -> u64 {
        self.committed + self.rejected + self.dead_lettered
    }
}

#[derive(Debug, Default)]
struct RelayCounters {
    committed: AtomicU64,
    rejected: AtomicU64,
    dead_lettered: AtomicU64,
}

impl RelayCounters {
    fn snapshot(&self) -> RelayStats {
        RelayStats {
            committed: self.committed.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            dead_lettered: self.dead_lettered.load(Ordering::Relaxed),
        }
    }
}

/// A validated entry on its way to a commit lane.
///
/// The original payload rides along so a store failure can still
/// dead-letter the exact bytes that were dequeued.
struct LaneWork {
    key: ConversationKey,
    message: Message,
    payload: QueuePayload,
}

/// Relay pipeline between an inbound queue and a conversation store.
///
/// The worker owns nothing until [`spawn`](Self::spawn); construction just
/// collects the ports. The optional delivery feed receives a copy of each
/// committed message for the recipient; feed failures are logged, never
/// propagated, and never affect the committed history.
pub struct RelayWorker<Q, S, D, C> {
    queue: Arc<Q>,
    store: Arc<S>,
    sink: Arc<D>,
    feed: Option<Arc<dyn DeliveryFeed>>,
    clock: Arc<C>,
    config: RelayConfig,
}

impl<Q, S, D, C> RelayWorker<Q, S, D, C>
where
    Q: InboundQueue + 'static,
    S: ConversationStore + 'static,
    D: DeadLetterSink + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Assembles a worker over the given ports.
    #[must_use]
    pub const fn new(
        queue: Arc<Q>,
        store: Arc<S>,
        sink: Arc<D>,
        clock: Arc<C>,
        config: RelayConfig,
    ) -> Self {
        Self {
            queue,
            store,
            sink,
            feed: None,
            clock,
            config,
        }
    }

    /// Attaches a per-recipient delivery feed.
    #[must_use]
    pub fn with_delivery_feed(mut self, feed: Arc<dyn DeliveryFeed>) -> Self {
        self.feed = Some(feed);
        self
    }

    /// Starts the dispatcher and commit-lane tasks.
    ///
    /// Must be called from within a Tokio runtime. Dropping the returned
    /// handle without calling [`RelayWorkerHandle::shutdown`] also stops
    /// the worker, but without waiting for in-flight entries.
    #[must_use]
    pub fn spawn(self) -> RelayWorkerHandle {
        let Self {
            queue,
            store,
            sink,
            feed,
            clock,
            config,
        } = self;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let counters = Arc::new(RelayCounters::default());
        let lane_count = config.worker_lanes.max(1);

        let mut lane_senders = Vec::with_capacity(lane_count);
        let mut lane_tasks = Vec::with_capacity(lane_count);
        for lane in 0..lane_count {
            let (work_tx, work_rx) = mpsc::channel(LANE_BUFFER);
            let shared = LaneShared {
                lane,
                store: Arc::clone(&store),
                sink: Arc::clone(&sink),
                feed: feed.clone(),
                clock: Arc::clone(&clock),
                retry: config.retry,
                counters: Arc::clone(&counters),
            };
            lane_tasks.push(tokio::spawn(run_lane(shared, work_rx)));
            lane_senders.push(work_tx);
        }

        let router = EntryRouter {
            sink,
            clock,
            limits: config.limits,
            counters: Arc::clone(&counters),
            lane_senders,
        };
        let dispatcher = tokio::spawn(run_dispatcher(queue, router, shutdown_rx));
        tracing::info!(lanes = lane_count, "relay worker started");

        RelayWorkerHandle {
            shutdown: shutdown_tx,
            dispatcher,
            lanes: lane_tasks,
            counters,
        }
    }
}

/// Control handle for a spawned relay worker.
#[derive(Debug)]
pub struct RelayWorkerHandle {
    shutdown: watch::Sender<bool>,
    dispatcher: JoinHandle<()>,
    lanes: Vec<JoinHandle<()>>,
    counters: Arc<RelayCounters>,
}

impl RelayWorkerHandle {
    /// Reads the current progress counters.
    #[must_use]
    pub fn stats(&self) -> RelayStats {
        self.counters.snapshot()
    }

    /// Stops the worker and waits for in-flight entries to settle.
    ///
    /// The dispatcher stops dequeuing immediately; everything already
    /// dequeued still runs to a terminal outcome before the lanes exit.
    /// Entries left on the queue stay there.
    pub async fn shutdown(self) -> RelayStats {
        if self.shutdown.send(true).is_err() {
            tracing::debug!("relay dispatcher already stopped");
        }
        if let Err(error) = self.dispatcher.await {
            tracing::error!(error = %error, "relay dispatcher task failed");
        }
        for (lane, task) in self.lanes.into_iter().enumerate() {
            if let Err(error) = task.await {
                tracing::error!(lane, error = %error, "commit lane task failed");
            }
        }
        let stats = self.counters.snapshot();
        tracing::info!(
            committed = stats.committed,
            rejected = stats.rejected,
            dead_lettered = stats.dead_lettered,
            "relay worker stopped"
        );
        stats
    }
}

/// Dispatcher-side state for turning payloads into routed lane work.
struct EntryRouter<D, C> {
    sink: Arc<D>,
    clock: Arc<C>,
    limits: EntryLimits,
    counters: Arc<RelayCounters>,
    lane_senders: Vec<mpsc::Sender<LaneWork>>,
}

impl<D, C> EntryRouter<D, C>
where
    D: DeadLetterSink,
    C: Clock,
{
    async fn route(&self, payload: QueuePayload) {
        match decode_entry(&self.limits, self.clock.as_ref(), payload) {
            Ok(work) => self.forward(work).await,
            Err((returned, error)) => self.reject(returned, error).await,
        }
    }

    async fn forward(&self, work: LaneWork) {
        let lane = lane_for(&work.key, self.lane_senders.len());
        let Some(sender) = self.lane_senders.get(lane) else {
            self.fault(work.payload, format!("no commit lane at slot {lane}"))
                .await;
            return;
        };
        if let Err(send_error) = sender.send(work).await {
            let lost = send_error.0;
            self.fault(lost.payload, format!("commit lane {lane} closed"))
                .await;
        }
    }

    async fn reject(&self, payload: QueuePayload, error: EntryError) {
        tracing::warn!(error = %error, "entry rejected");
        self.counters.rejected.fetch_add(1, Ordering::Relaxed);
        self.sink
            .consign(DeadLetter {
                payload,
                reason: DeadLetterReason::Rejected(error),
                failed_at: self.clock.utc(),
            })
            .await;
    }

    async fn fault(&self, payload: QueuePayload, detail: String) {
        tracing::error!(%detail, "pipeline fault; entry dead-lettered");
        self.counters.dead_lettered.fetch_add(1, Ordering::Relaxed);
        self.sink
            .consign(DeadLetter {
                payload,
                reason: DeadLetterReason::PipelineFault(detail),
                failed_at: self.clock.utc(),
            })
            .await;
    }
}

async fn run_dispatcher<Q, D, C>(
    queue: Arc<Q>,
    router: EntryRouter<D, C>,
    mut shutdown: watch::Receiver<bool>,
) where
    Q: InboundQueue,
    D: DeadLetterSink,
    C: Clock,
{
    loop {
        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() {
                    tracing::debug!("relay handle dropped");
                }
                tracing::debug!("relay dispatcher stopping");
                break;
            }
            dequeued = queue.dequeue() => match dequeued {
                Ok(payload) => router.route(payload).await,
                Err(QueueError::Closed) => {
                    tracing::debug!("inbound queue closed; relay dispatcher stopping");
                    break;
                }
                Err(error) => {
                    tracing::warn!(error = %error, "dequeue failed; backing off");
                    tokio::time::sleep(DEQUEUE_ERROR_BACKOFF).await;
                }
            },
        }
    }
    // Returning drops the lane senders, which lets every lane drain and exit.
}

/// Decodes and validates a payload, stamping the commit timestamp.
///
/// Stamping happens here, on the single dispatcher task, so commit
/// timestamps within one conversation never run backwards.
fn decode_entry<C>(
    limits: &EntryLimits,
    clock: &C,
    payload: QueuePayload,
) -> Result<LaneWork, (QueuePayload, EntryError)>
where
    C: Clock,
{
    let entry = match RawEntry::decode(&payload) {
        Ok(entry) => entry,
        Err(error) => return Err((payload, error)),
    };
    let (key, message) = match entry.into_message(limits, clock) {
        Ok(parts) => parts,
        Err(error) => return Err((payload, error)),
    };
    Ok(LaneWork {
        key,
        message,
        payload,
    })
}

/// Maps a conversation key to a commit lane.
fn lane_for(key: &ConversationKey, lane_count: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    let lanes = u64::try_from(lane_count).unwrap_or(1).max(1);
    let slot = hasher.finish().checked_rem(lanes).unwrap_or(0);
    usize::try_from(slot).unwrap_or(0)
}

/// State shared by one commit lane.
struct LaneShared<S, D, C> {
    lane: usize,
    store: Arc<S>,
    sink: Arc<D>,
    feed: Option<Arc<dyn DeliveryFeed>>,
    clock: Arc<C>,
    retry: RetryPolicy,
    counters: Arc<RelayCounters>,
}

async fn run_lane<S, D, C>(shared: LaneShared<S, D, C>, mut work_rx: mpsc::Receiver<LaneWork>)
where
    S: ConversationStore,
    D: DeadLetterSink,
    C: Clock,
{
    while let Some(work) = work_rx.recv().await {
        commit_entry(&shared, work).await;
    }
    tracing::debug!(lane = shared.lane, "commit lane drained");
}

/// Appends one entry, retrying transient store failures within the budget.
async fn commit_entry<S, D, C>(shared: &LaneShared<S, D, C>, work: LaneWork)
where
    S: ConversationStore,
    D: DeadLetterSink,
    C: Clock,
{
    let LaneWork {
        key,
        message,
        payload,
    } = work;
    let mut attempt: u32 = 1;
    loop {
        match shared.store.append(&key, message.clone()).await {
            Ok(()) => {
                shared.counters.committed.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(lane = shared.lane, id = %message.id(), key = %key, "entry committed");
                publish_delivery(shared, &message).await;
                return;
            }
            Err(error) if error.is_transient() && attempt < shared.retry.max_attempts => {
                let delay = shared.retry.delay_for(attempt);
                tracing::warn!(
                    lane = shared.lane,
                    attempt,
                    delay = ?delay,
                    error = %error,
                    "append failed; retrying"
                );
                tokio::time::sleep(delay).await;
                attempt = attempt.saturating_add(1);
            }
            Err(error) => {
                tracing::warn!(
                    lane = shared.lane,
                    attempts = attempt,
                    error = %error,
                    "append failed; entry dead-lettered"
                );
                shared.counters.dead_lettered.fetch_add(1, Ordering::Relaxed);
                shared
                    .sink
                    .consign(DeadLetter {
                        payload,
                        reason: DeadLetterReason::StoreFailed {
                            attempts: attempt,
                            last_error: error.to_string(),
                        },
                        failed_at: shared.clock.utc(),
                    })
                    .await;
                return;
            }
        }
    }
}

/// Offers a committed message to the recipient's delivery feed, if any.
async fn publish_delivery<S, D, C>(shared: &LaneShared<S, D, C>, message: &Message) {
    let Some(feed) = shared.feed.as_ref() else {
        return;
    };
    if let Err(error) = feed.publish(message.recipient(), message).await {
        tracing::warn!(id = %message.id(), error = %error, "delivery feed publish failed");
    }
}
