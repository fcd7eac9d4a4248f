//! Dispatcher module for the trail indexer pipeline.
//!
//! Fans records out to the document sink, one task per record. Dispatch
//! returns as soon as every task has been spawned; it never waits for a
//! delivery to finish.
//!
//! ## In-flight policy
//!
//! The returned [`InFlightDeliveries`] decides what happens to deliveries
//! that are still running once the invocation has reported its outcome:
//!
//! - [`InFlightDeliveries::drain`] waits for them up to a deadline and
//!   aborts the rest.
//! - Dropping the handle (or calling [`InFlightDeliveries::detach`]) leaves
//!   them running in the background with no further tracking.
//!
//! Neither path affects the invocation outcome.
//!
//! Without a concurrency cap every task starts its request straight away.
//! With a cap, tasks beyond it queue for a permit; a drain deadline that
//! arrives while records are still queued reports them as never attempted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, instrument, warn, Instrument};

use trail_indexer_repository::DocumentSink;
use trail_indexer_shared::EventRecord;

/// Configuration for the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct DispatcherConfig {
    /// Maximum number of deliveries executing at the same time; `None` for no cap.
    pub max_in_flight: Option<usize>,
}

/// How one delivery task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// The backend answered with a 2xx status.
    Delivered,
    /// The backend answered, with a non-success status.
    Rejected(u16),
    /// The record never reached the backend.
    Failed,
}

/// Per-invocation tally of delivery results, used for logging only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainSummary {
    pub delivered: usize,
    pub rejected: usize,
    pub failed: usize,
    /// Requests started but still running at the deadline, aborted.
    pub abandoned: usize,
    /// Records still waiting for a permit at the deadline; no request was made.
    pub never_attempted: usize,
}

impl DrainSummary {
    fn record(&mut self, status: DeliveryStatus) {
        match status {
            DeliveryStatus::Delivered => self.delivered += 1,
            DeliveryStatus::Rejected(_) => self.rejected += 1,
            DeliveryStatus::Failed => self.failed += 1,
        }
    }
}

/// Spawns one delivery task per record.
pub struct Dispatcher {
    sink: Arc<dyn DocumentSink>,
    permits: Option<Arc<Semaphore>>,
}

impl Dispatcher {
    /// Create a dispatcher with the default configuration.
    pub fn new(sink: Arc<dyn DocumentSink>) -> Self {
        Self::with_config(sink, DispatcherConfig::default())
    }

    /// Create a dispatcher with custom configuration.
    pub fn with_config(sink: Arc<dyn DocumentSink>, config: DispatcherConfig) -> Self {
        Self {
            sink,
            permits: config
                .max_in_flight
                .map(|limit| Arc::new(Semaphore::new(limit.max(1)))),
        }
    }

    /// Spawn a delivery task for every record, in record order.
    ///
    /// Must be called from within a Tokio runtime. Returns immediately; the
    /// concurrency limit, if any, is applied inside the tasks.
    #[instrument(skip(self, records), fields(record_count = records.len()))]
    pub fn dispatch(&self, records: Vec<EventRecord>) -> InFlightDeliveries {
        info!("Pushing records");

        let mut tasks = JoinSet::new();
        let mut started = Vec::with_capacity(records.len());

        for (sequence, record) in records.into_iter().enumerate() {
            let sink = self.sink.clone();
            let permits = self.permits.clone();
            let flag = Arc::new(AtomicBool::new(false));
            started.push(flag.clone());
            let span = info_span!("delivery", sequence, event_name = record.event_name());

            tasks.spawn(
                async move {
                    // A closed semaphore only happens at teardown; deliver regardless.
                    let _permit = match permits {
                        Some(permits) => permits.acquire_owned().await.ok(),
                        None => None,
                    };
                    flag.store(true, Ordering::SeqCst);
                    deliver_record(sink.as_ref(), record).await
                }
                .instrument(span),
            );
        }

        InFlightDeliveries { tasks, started }
    }
}

async fn deliver_record(sink: &dyn DocumentSink, record: EventRecord) -> DeliveryStatus {
    let document = match record.to_json() {
        Ok(document) => document,
        Err(e) => {
            error!(error = %e, "Failed to serialize record");
            return DeliveryStatus::Failed;
        }
    };

    match sink.deliver(document).await {
        Ok(report) if report.is_success() => DeliveryStatus::Delivered,
        Ok(report) => DeliveryStatus::Rejected(report.status),
        Err(e) => {
            error!(error = %e, "Failed to push record");
            DeliveryStatus::Failed
        }
    }
}

/// Handle to the delivery tasks of one invocation.
///
/// Dropping it detaches the tasks; they keep running.
pub struct InFlightDeliveries {
    tasks: JoinSet<DeliveryStatus>,
    /// One flag per record, indexed by sequence, set once its request starts.
    started: Vec<Arc<AtomicBool>>,
}

impl InFlightDeliveries {
    /// A handle with no tasks, for invocations that failed before dispatching.
    pub fn empty() -> Self {
        Self {
            tasks: JoinSet::new(),
            started: Vec::new(),
        }
    }

    /// Number of tasks not yet collected.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for outstanding deliveries, for at most `timeout`.
    ///
    /// At the deadline every remaining task is aborted. Those whose request
    /// had started count as abandoned; those still queued for a permit count
    /// as never attempted and their sequence numbers are logged.
    pub async fn drain(mut self, timeout: Duration) -> DrainSummary {
        let deadline = tokio::time::Instant::now() + timeout;
        let mut summary = DrainSummary::default();

        loop {
            match tokio::time::timeout_at(deadline, self.tasks.join_next()).await {
                Ok(Some(Ok(status))) => summary.record(status),
                Ok(Some(Err(e))) => {
                    warn!(error = %e, "Delivery task did not complete");
                    summary.failed += 1;
                }
                Ok(None) => break,
                Err(_) => {
                    self.abort_remaining(&mut summary).await;
                    break;
                }
            }
        }

        debug!(?summary, "Drained deliveries");
        summary
    }

    async fn abort_remaining(&mut self, summary: &mut DrainSummary) {
        self.tasks.abort_all();

        let mut cancelled = 0;
        while let Some(result) = self.tasks.join_next().await {
            match result {
                Ok(status) => summary.record(status),
                Err(_) => cancelled += 1,
            }
        }

        let never_attempted: Vec<usize> = self
            .started
            .iter()
            .enumerate()
            .filter(|(_, flag)| !flag.load(Ordering::SeqCst))
            .map(|(sequence, _)| sequence)
            .collect();

        summary.never_attempted = never_attempted.len();
        summary.abandoned = cancelled - summary.never_attempted.min(cancelled);

        warn!(
            abandoned = summary.abandoned,
            "Drain deadline reached; aborted in-flight deliveries"
        );
        if !never_attempted.is_empty() {
            error!(
                never_attempted = summary.never_attempted,
                sequences = ?never_attempted,
                "Records were still queued at the drain deadline and were not sent"
            );
        }
    }

    /// Stop tracking the tasks and let them run to completion in the background.
    pub fn detach(self) {}
}

impl Drop for InFlightDeliveries {
    fn drop(&mut self) {
        self.tasks.detach_all();
    }
}
