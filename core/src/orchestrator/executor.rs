//! Orchestrator execution logic

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::channel::ChannelConfig;
use crate::config::{ConfigError, RunConfig};
use crate::error::{BenchError, BenchResult};
use crate::feeder::{Feeder, FeederStats, IndexSelector, RequestRateLimiter};
use crate::metrics::{Aggregator, OverallReport, Snapshot};
use crate::request::Request;
use crate::signal::{RunSignal, StopReason};
use crate::traits::Target;
use crate::worker::{IndexQueue, WorkerBuilder};

use super::state::RunState;
use super::summary::{summarize_workers, PoolSummary};

/// Result of a finished run
#[derive(Debug, Clone, Serialize)]
pub struct CompletedRun {
    /// First stop trigger
    pub reason: StopReason,

    /// Final statistics
    pub report: OverallReport,

    /// Worker pool totals
    pub pool: PoolSummary,

    /// Feeder totals
    pub feeder: FeederStats,
}

/// Orchestrator manages the run lifecycle
///
/// Owns the request list, the Aggregator and the run signal. Responsible
/// for spawning the feeder, the workers, the deadline timer and the live
/// reporter, then for the ordered shutdown once the signal fires.
pub struct Orchestrator {
    /// Run configuration
    pub(crate) config: RunConfig,

    /// Immutable request list (shared with workers)
    pub(crate) requests: Arc<[Request]>,

    /// System under test (shared across workers)
    pub(crate) target: Arc<dyn Target>,

    /// Shared statistics
    pub(crate) aggregator: Arc<Aggregator>,

    /// Index queue sizing
    pub(crate) channel_config: ChannelConfig,

    /// Shared stop signal
    pub(crate) signal: RunSignal,

    /// Lifecycle state publisher
    pub(crate) state_tx: watch::Sender<RunState>,

    /// Live snapshot sender
    pub(crate) snapshot_tx: mpsc::UnboundedSender<Snapshot>,
}

impl Orchestrator {
    /// Create a new orchestrator
    ///
    /// The configuration is validated when [`Orchestrator::run`] starts;
    /// `OrchestratorBuilder` validates it earlier.
    pub fn new(
        config: RunConfig,
        requests: Arc<[Request]>,
        target: Arc<dyn Target>,
        channel_config: ChannelConfig,
        snapshot_tx: mpsc::UnboundedSender<Snapshot>,
    ) -> Self {
        let aggregator = Arc::new(Aggregator::new(config.per_key_stats));
        let (state_tx, _) = watch::channel(RunState::Idle);

        Self {
            config,
            requests,
            target,
            aggregator,
            channel_config,
            signal: RunSignal::new(),
            state_tx,
            snapshot_tx,
        }
    }

    /// Handle to the run signal, usable from other tasks
    pub fn signal(&self) -> RunSignal {
        self.signal.clone()
    }

    /// Request an early stop
    pub fn shutdown(&self) {
        self.signal.trigger(StopReason::Interrupted);
    }

    /// Observe lifecycle transitions
    pub fn state_receiver(&self) -> watch::Receiver<RunState> {
        self.state_tx.subscribe()
    }

    /// Current lifecycle state
    pub fn state(&self) -> RunState {
        *self.state_tx.borrow()
    }

    /// Get the run configuration
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    fn set_state(&self, state: RunState) {
        self.state_tx.send_replace(state);
        tracing::debug!(state = %state, "Run state changed");
    }

    /// Run to completion
    ///
    /// Returns once the deadline passes, the loop cap is reached, or the
    /// signal is triggered externally, and every in-flight call has been
    /// recorded. A run can only be started once.
    ///
    /// # Errors
    ///
    /// A rejected configuration is reported before any task is spawned and
    /// leaves the state at `Idle`.
    pub async fn run(&self) -> BenchResult<CompletedRun> {
        if self.state() != RunState::Idle {
            return Err(BenchError::orchestration("run already started"));
        }

        let len = self.requests.len();
        if len == 0 {
            return Err(ConfigError::EmptyRequestSet.into());
        }

        // Everything fallible happens before the first task is spawned.
        self.config.validate()?;
        let limiter = RequestRateLimiter::new(self.config.rate_limit)?;
        let selector = IndexSelector::new(self.config.selection, len, self.config.seed)?;
        let (index_tx, index_rx) = mpsc::channel(self.channel_config.index_buffer());
        let queue: IndexQueue = Arc::new(Mutex::new(index_rx));

        let workers = (0..self.config.workers)
            .map(|worker_id| {
                WorkerBuilder::new(worker_id)
                    .target(Arc::clone(&self.target))
                    .requests(Arc::clone(&self.requests))
                    .queue(Arc::clone(&queue))
                    .aggregator(Arc::clone(&self.aggregator))
                    .timeout(self.config.timeout)
                    .include_lost_latency(self.config.include_lost_latency)
                    .build()
            })
            .collect::<BenchResult<Vec<_>>>()?;
        drop(queue);

        let feeder = Feeder::new(limiter, selector, self.config.dispatch_cap(len), index_tx);

        self.set_state(RunState::Running);
        tracing::info!(
            target_name = self.target.name(),
            requests = len,
            workers = self.config.workers,
            rate_limit = self.config.rate_limit,
            duration_secs = self.config.duration.as_secs_f64(),
            loops = self.config.loops,
            selection = ?self.config.selection,
            "Starting run"
        );

        let start = Instant::now();
        self.aggregator.mark_start();

        let deadline = self.spawn_deadline();
        let worker_handles: Vec<_> = workers
            .into_iter()
            .map(|worker| tokio::spawn(worker.run(self.signal.clone())))
            .collect();
        let feeder_handle = tokio::spawn(feeder.run(self.signal.clone()));
        let reporter = self.config.report_interval.map(|every| self.spawn_reporter(every));

        self.signal.cancelled().await;
        let reason = self.signal.reason().unwrap_or(StopReason::Interrupted);

        self.set_state(RunState::Draining);
        tracing::info!(reason = %reason, "Stopping run, draining in-flight requests");

        let feeder_result = feeder_handle.await;

        // Wait for all workers to finish their in-flight call
        let mut results = Vec::with_capacity(worker_handles.len());
        let mut worker_failures = 0;
        for (idx, handle) in worker_handles.into_iter().enumerate() {
            match handle.await {
                Ok(stats) => results.push(stats),
                Err(e) => {
                    worker_failures += 1;
                    tracing::error!(worker_id = idx, error = %e, "Worker task panicked");
                }
            }
        }

        if let Some(reporter) = reporter {
            if let Err(e) = reporter.await {
                tracing::warn!(error = %e, "Reporter task failed");
            }
            // deltas up to here sum to the final totals
            let _ = self.snapshot_tx.send(self.aggregator.snapshot());
        }
        deadline.abort();

        let feeder = match feeder_result {
            Ok(feeder) => feeder,
            Err(e) => {
                self.set_state(RunState::Completed);
                return Err(BenchError::orchestration(format!("feeder task failed: {e}")));
            }
        };

        // If all workers failed, return an error
        if results.is_empty() && worker_failures > 0 {
            self.set_state(RunState::Completed);
            return Err(BenchError::orchestration(format!(
                "All {} workers failed to complete",
                worker_failures
            )));
        }

        let elapsed = start.elapsed();
        let report = self.aggregator.overall(elapsed);
        let pool = summarize_workers(&results);

        self.set_state(RunState::Completed);
        tracing::info!(
            reason = %reason,
            elapsed_secs = elapsed.as_secs_f64(),
            sent = report.sent,
            lost = report.lost,
            rps = report.requests_per_second,
            emitted = feeder.emitted,
            "Run completed"
        );

        Ok(CompletedRun {
            reason,
            report,
            pool,
            feeder,
        })
    }

    /// Run with Ctrl+C and SIGTERM handling
    ///
    /// Either signal is treated exactly like the deadline: a graceful drain
    /// followed by the full report.
    pub async fn run_with_signal_handling(&self) -> BenchResult<CompletedRun> {
        let signal = self.signal.clone();

        // registered before the run starts so an early SIGTERM is not fatal
        let terminate = terminate_listener();

        let signal_handle = tokio::spawn(async move {
            tokio::select! {
                result = tokio::signal::ctrl_c() => match result {
                    Ok(()) => {
                        if signal.trigger(StopReason::Interrupted) {
                            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                    }
                },
                _ = terminated(terminate) => {
                    if signal.trigger(StopReason::Interrupted) {
                        tracing::info!("Received SIGTERM, initiating graceful shutdown...");
                    }
                }
                _ = signal.cancelled() => {}
            }
        });

        let result = self.run().await;

        signal_handle.abort();

        result
    }

    fn spawn_deadline(&self) -> JoinHandle<()> {
        let signal = self.signal.clone();
        let duration = self.config.duration;

        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(duration) => {
                    if signal.trigger(StopReason::Deadline) {
                        tracing::debug!("Run duration elapsed");
                    }
                }
                _ = signal.cancelled() => {}
            }
        })
    }

    fn spawn_reporter(&self, every: Duration) -> JoinHandle<()> {
        let signal = self.signal.clone();
        let aggregator = Arc::clone(&self.aggregator);
        let snapshot_tx = self.snapshot_tx.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = signal.cancelled() => break,
                    _ = ticker.tick() => {
                        if snapshot_tx.send(aggregator.snapshot()).is_err() {
                            tracing::debug!("Snapshot receiver dropped, reporter stopping");
                            break;
                        }
                    }
                }
            }
        })
    }
}

#[cfg(unix)]
type TerminateListener = Option<tokio::signal::unix::Signal>;

#[cfg(not(unix))]
type TerminateListener = ();

#[cfg(unix)]
fn terminate_listener() -> TerminateListener {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(listener) => Some(listener),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to listen for SIGTERM");
            None
        }
    }
}

#[cfg(not(unix))]
fn terminate_listener() -> TerminateListener {}

/// Resolves on SIGTERM, never on platforms without it
#[cfg(unix)]
async fn terminated(listener: TerminateListener) {
    if let Some(mut listener) = listener {
        if listener.recv().await.is_some() {
            return;
        }
    }
    std::future::pending::<()>().await
}

#[cfg(not(unix))]
async fn terminated(_listener: TerminateListener) {
    std::future::pending::<()>().await
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("target", &self.target.name())
            .field("requests", &self.requests.len())
            .field("state", &self.state())
            .finish()
    }
}
