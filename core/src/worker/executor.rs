//! Worker execution loop

use crate::metrics::Aggregator;
use crate::outcome::Outcome;
use crate::request::Request;
use crate::signal::RunSignal;
use crate::traits::{Target, TargetError};

use super::stats::WorkerStats;
use super::IndexQueue;

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Worker executes requests in a loop: take index -> perform -> record -> repeat
///
/// Workers are tokio tasks managed by the Orchestrator. They share the
/// request list, the Target and the Aggregator via Arc, and steal indices
/// from one shared queue so no index is handled twice.
pub struct Worker {
    /// Unique worker identifier
    id: usize,

    /// System under test (shared across workers via Arc)
    target: Arc<dyn Target>,

    /// Immutable request list
    requests: Arc<[Request]>,

    /// Shared index queue fed by the Feeder
    queue: IndexQueue,

    /// Shared statistics
    aggregator: Arc<Aggregator>,

    /// Upper bound for one Target call
    timeout: Duration,

    /// Attach the measured latency to lost outcomes
    include_lost_latency: bool,
}

impl Worker {
    /// Create a new worker
    pub fn new(
        id: usize,
        target: Arc<dyn Target>,
        requests: Arc<[Request]>,
        queue: IndexQueue,
        aggregator: Arc<Aggregator>,
        timeout: Duration,
    ) -> Self {
        Self {
            id,
            target,
            requests,
            queue,
            aggregator,
            timeout,
            include_lost_latency: false,
        }
    }

    /// Attach the measured latency to lost outcomes
    pub fn with_lost_latency(mut self, enabled: bool) -> Self {
        self.include_lost_latency = enabled;
        self
    }

    /// Run the worker loop
    ///
    /// Indices already queued are processed even after the signal fires;
    /// the worker stops once the queue is closed, or is empty with the
    /// signal triggered. An in-flight call is never abandoned.
    pub async fn run(self, signal: RunSignal) -> WorkerStats {
        let mut stats = WorkerStats::new();
        stats.start();

        tracing::debug!(worker_id = self.id, "Worker started");

        loop {
            let next = tokio::select! {
                biased;

                index = self.next_index() => index,

                _ = signal.cancelled() => {
                    tracing::debug!(worker_id = self.id, "Worker received shutdown signal");
                    break;
                }
            };

            let Some(index) = next else {
                tracing::debug!(worker_id = self.id, "Index queue closed, worker stopping");
                break;
            };

            let Some(request) = self.requests.get(index) else {
                tracing::warn!(
                    worker_id = self.id,
                    index,
                    len = self.requests.len(),
                    "Index out of range, skipping"
                );
                continue;
            };

            let outcome = self.perform(request).await;
            stats.record(&outcome);
            self.aggregator.record(request, &outcome);
        }

        stats.stop();
        tracing::debug!(
            worker_id = self.id,
            dispatched = stats.dispatched,
            completed = stats.completed,
            lost = stats.lost,
            elapsed_ms = ?stats.elapsed().map(|d| d.as_millis()),
            "Worker finished"
        );

        stats
    }

    /// Take the next index from the shared queue
    async fn next_index(&self) -> Option<usize> {
        self.queue.lock().await.recv().await
    }

    /// Call the Target once and classify the result
    ///
    /// Timeouts, transport errors and panics all become lost outcomes.
    async fn perform(&self, request: &Request) -> Outcome {
        let start = Instant::now();

        let call = AssertUnwindSafe(self.target.perform(request, self.timeout)).catch_unwind();
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(TargetError::Panicked),
            Err(_) => Err(TargetError::Timeout(self.timeout)),
        };
        let latency = start.elapsed();

        match result {
            Ok(reply) => Outcome::completed(request, reply, latency),
            Err(e) => {
                if matches!(e, TargetError::Panicked) {
                    tracing::error!(
                        worker_id = self.id,
                        key = request.key(),
                        target_name = self.target.name(),
                        "Target call panicked"
                    );
                } else if e.is_timeout() {
                    tracing::trace!(
                        worker_id = self.id,
                        key = request.key(),
                        timeout_ms = self.timeout.as_millis(),
                        "Request timed out"
                    );
                } else {
                    tracing::trace!(
                        worker_id = self.id,
                        key = request.key(),
                        error = %e,
                        "Request lost"
                    );
                }
                Outcome::lost(request, self.include_lost_latency.then_some(latency))
            }
        }
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("target", &self.target.name())
            .field("requests", &self.requests.len())
            .field("timeout", &self.timeout)
            .field("include_lost_latency", &self.include_lost_latency)
            .finish()
    }
}
