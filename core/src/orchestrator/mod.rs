//! Orchestrator for run lifecycle management
//!
//! The Orchestrator coordinates one complete run:
//! - Validating the configuration before anything starts
//! - Spawning the feeder, the worker pool and the live reporter
//! - Merging deadline, loop cap and external interrupts into one stop signal
//! - Draining in-flight requests before computing the final report
//!
//! # Example
//!
//! ```ignore
//! use ratebench_core::OrchestratorBuilder;
//!
//! let (orchestrator, mut snapshots) = OrchestratorBuilder::new()
//!     .config(config)
//!     .requests(requests)
//!     .target(target)
//!     .build()?;
//!
//! let run = orchestrator.run_with_signal_handling().await?;
//! println!("{} sent, {} lost", run.report.sent, run.report.lost);
//! ```

mod builder;
mod executor;
mod state;
mod summary;

pub use builder::OrchestratorBuilder;
pub use executor::{CompletedRun, Orchestrator};
pub use state::RunState;
pub use summary::{summarize_workers, PoolSummary};
