//! Error types for ratebench-core

use thiserror::Error;

use crate::config::ConfigError;

/// Core error type
///
/// Per-request failures never show up here: they are absorbed by the worker
/// pool and counted as lost outcomes. A `BenchError` means the run could not
/// start, or the coordinator itself failed.
#[derive(Error, Debug)]
pub enum BenchError {
    /// Configuration rejected before the run started
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A required builder field was never set
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),

    /// The run coordinator could not complete the run
    #[error("orchestration error: {0}")]
    Orchestration(String),
}

impl BenchError {
    /// Error for a builder field that was never provided
    pub fn missing_config(field: &'static str) -> Self {
        Self::MissingConfig(field)
    }

    /// Error raised by the run coordinator
    pub fn orchestration(message: impl Into<String>) -> Self {
        Self::Orchestration(message.into())
    }

    /// Whether this error was raised by configuration validation
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::MissingConfig(_))
    }
}

/// Result type alias
pub type BenchResult<T> = std::result::Result<T, BenchError>;
