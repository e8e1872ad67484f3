//! Worker module for dispatching requests against the Target
//!
//! The Worker is the execution unit of the pool, responsible for one simple
//! loop: **take index -> perform -> record -> repeat**.
//!
//! Each Worker is a tokio task that:
//!
//! 1. Steals the next index from the queue shared with every other worker
//! 2. Resolves it against the immutable request list
//! 3. Calls the Target, bounded by the per-request timeout
//! 4. Turns timeouts, transport errors and panics into lost outcomes
//! 5. Records the outcome in the shared Aggregator
//! 6. Repeats until the queue closes or the run signal fires
//!
//! # Example
//!
//! ```ignore
//! use ratebench_core::worker::WorkerBuilder;
//!
//! let worker = WorkerBuilder::new(0)
//!     .target(target)
//!     .requests(requests)
//!     .queue(queue)
//!     .aggregator(aggregator)
//!     .timeout(Duration::from_secs(1))
//!     .build()?;
//!
//! let stats = worker.run(signal).await;
//! println!("Lost: {}", stats.lost);
//! ```

mod builder;
mod executor;
mod stats;

pub use builder::WorkerBuilder;
pub use executor::Worker;
pub use stats::WorkerStats;

use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Index queue shared by all workers of a pool
pub type IndexQueue = Arc<Mutex<mpsc::Receiver<usize>>>;
