//! Run configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the feeder picks the next request index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Cycle `0, 1, ..., M-1, 0, 1, ...` in order
    #[default]
    Sequential,
    /// Draw every index uniformly at random from `[0, M)`
    Shuffled,
}

/// Run configuration
///
/// Immutable inputs of one run. Everything here is checked by
/// [`RunConfig::validate`] before any task is spawned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Wall-clock budget of the run
    pub duration: Duration,

    /// Upper bound for a single Target call
    pub timeout: Duration,

    /// Number of concurrent workers
    pub workers: usize,

    /// Global dispatch rate in requests per second, shared by all workers
    pub rate_limit: f64,

    /// Maximum passes over the request list (0 = unlimited)
    #[serde(default)]
    pub loops: u64,

    /// Index selection policy
    #[serde(default)]
    pub selection: SelectionPolicy,

    /// Live snapshot interval (None disables live reporting)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_interval: Option<Duration>,

    /// Keep a per-request-key breakdown
    #[serde(default)]
    pub per_key_stats: bool,

    /// Feed the latency of lost outcomes into the latency statistics
    #[serde(default)]
    pub include_lost_latency: bool,

    /// Seed for the shuffled policy (None seeds from entropy)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(10),
            timeout: Duration::from_secs(1),
            workers: 1,
            rate_limit: 1.0,
            loops: 0,
            selection: SelectionPolicy::Sequential,
            report_interval: None,
            per_key_stats: false,
            include_lost_latency: false,
            seed: None,
        }
    }
}

impl RunConfig {
    /// Create a new config with the given worker count and rate
    pub fn new(workers: usize, rate_limit: f64) -> Self {
        Self {
            workers,
            rate_limit,
            ..Default::default()
        }
    }

    /// Set the run duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the loop cap
    pub fn with_loops(mut self, loops: u64) -> Self {
        self.loops = loops;
        self
    }

    /// Set the selection policy
    pub fn with_selection(mut self, selection: SelectionPolicy) -> Self {
        self.selection = selection;
        self
    }

    /// Enable live reporting at the given interval
    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = Some(interval);
        self
    }

    /// Enable the per-key breakdown
    pub fn with_per_key_stats(mut self, enabled: bool) -> Self {
        self.per_key_stats = enabled;
        self
    }

    /// Count the latency of lost outcomes
    pub fn with_lost_latency(mut self, enabled: bool) -> Self {
        self.include_lost_latency = enabled;
        self
    }

    /// Seed the shuffled policy
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Total dispatch cap for a request list of `len` entries, if any
    pub fn dispatch_cap(&self, len: usize) -> Option<u64> {
        if self.loops == 0 {
            return None;
        }
        Some(self.loops.saturating_mul(len as u64))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::InvalidWorkers(
                "worker count must be at least 1".into(),
            ));
        }

        if !self.rate_limit.is_finite() || self.rate_limit <= 0.0 {
            return Err(ConfigError::InvalidRateLimit(format!(
                "rate limit must be a positive number, got {}",
                self.rate_limit
            )));
        }

        if self.duration.is_zero() {
            return Err(ConfigError::InvalidDuration(
                "duration must be positive".into(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "timeout must be positive".into(),
            ));
        }

        if let Some(interval) = self.report_interval {
            if interval.is_zero() {
                return Err(ConfigError::InvalidReportInterval(
                    "report interval must be positive when set".into(),
                ));
            }
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The request list is empty
    #[error("no requests to send")]
    EmptyRequestSet,

    /// Invalid worker count
    #[error("Invalid worker count: {0}")]
    InvalidWorkers(String),

    /// Invalid rate limit
    #[error("Invalid rate limit: {0}")]
    InvalidRateLimit(String),

    /// Invalid duration
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    /// Invalid per-request timeout
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),

    /// Invalid live report interval
    #[error("Invalid report interval: {0}")]
    InvalidReportInterval(String),
}
