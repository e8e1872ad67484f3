//! Builder pattern for Orchestrator construction

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::channel::ChannelConfig;
use crate::config::{ConfigError, RunConfig};
use crate::error::{BenchError, BenchResult};
use crate::metrics::Snapshot;
use crate::request::Request;
use crate::traits::Target;

use super::executor::Orchestrator;

/// Builder for creating an Orchestrator with proper configuration
///
/// # Example
///
/// ```ignore
/// let (orchestrator, snapshots) = OrchestratorBuilder::new()
///     .workers(10)
///     .rate_limit(500.0)
///     .duration(Duration::from_secs(30))
///     .requests(requests)
///     .target(target)
///     .build()?;
/// ```
pub struct OrchestratorBuilder {
    config: RunConfig,
    requests: Option<Arc<[Request]>>,
    target: Option<Arc<dyn Target>>,
    channel_config: ChannelConfig,
}

impl OrchestratorBuilder {
    /// Create a new orchestrator builder with default configuration
    pub fn new() -> Self {
        Self {
            config: RunConfig::default(),
            requests: None,
            target: None,
            channel_config: ChannelConfig::default(),
        }
    }

    /// Set the full run configuration
    pub fn config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the worker count
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Set the rate limit (requests per second)
    pub fn rate_limit(mut self, rps: f64) -> Self {
        self.config.rate_limit = rps;
        self
    }

    /// Set the run duration
    pub fn duration(mut self, duration: Duration) -> Self {
        self.config.duration = duration;
        self
    }

    /// Set the request list
    pub fn requests(mut self, requests: impl Into<Arc<[Request]>>) -> Self {
        self.requests = Some(requests.into());
        self
    }

    /// Set the target
    pub fn target(mut self, target: Arc<dyn Target>) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the channel configuration
    pub fn channel_config(mut self, config: ChannelConfig) -> Self {
        self.channel_config = config;
        self
    }

    /// Build the orchestrator and return it along with the live snapshot receiver
    ///
    /// Snapshots only flow when a report interval is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the target or requests are not set, the request
    /// list is empty, or configuration validation fails.
    pub fn build(self) -> BenchResult<(Orchestrator, mpsc::UnboundedReceiver<Snapshot>)> {
        let target = self
            .target
            .ok_or_else(|| BenchError::missing_config("target"))?;

        let requests = self
            .requests
            .ok_or_else(|| BenchError::missing_config("requests"))?;

        if requests.is_empty() {
            return Err(ConfigError::EmptyRequestSet.into());
        }

        self.config.validate()?;

        let (snapshot_tx, snapshot_rx) = mpsc::unbounded_channel();

        let orchestrator = Orchestrator::new(
            self.config,
            requests,
            target,
            self.channel_config,
            snapshot_tx,
        );

        Ok((orchestrator, snapshot_rx))
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
