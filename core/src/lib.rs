//! ratebench-core: the dispatch-and-measurement engine of ratebench
//!
//! This crate provides everything needed to drive a rate-controlled load run
//! against an arbitrary [`Target`]:
//!
//! - The [`feeder`], a globally rate-limited source of request indices
//! - The [`worker`] pool, which turns indices into Target calls
//! - The [`metrics`] aggregator with live deltas and a final report
//! - The [`orchestrator`], which owns the deadline, cancellation and drain
//!
//! Protocol specifics live behind the [`Target`] trait; configuration parsing
//! and report rendering are left to the consumer.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod config;
pub mod error;
pub mod feeder;
pub mod metrics;
pub mod orchestrator;
pub mod outcome;
pub mod request;
pub mod signal;
pub mod traits;
pub mod worker;

pub use channel::ChannelConfig;
pub use config::{ConfigError, RunConfig, SelectionPolicy};
pub use error::*;
pub use feeder::{Feeder, FeederExit, FeederStats, RequestRateLimiter};
pub use metrics::*;
pub use orchestrator::{CompletedRun, Orchestrator, OrchestratorBuilder, PoolSummary, RunState};
pub use outcome::*;
pub use request::*;
pub use signal::{RunSignal, StopReason};
pub use traits::*;
pub use worker::{Worker, WorkerBuilder, WorkerStats};
