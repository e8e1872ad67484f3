//! Run statistics
//!
//! The [`Aggregator`] is the only mutable state shared across workers. It
//! keeps two generations of [`Counters`] (cumulative and previous-snapshot)
//! for the live delta view, streaming [`LatencyStats`] for exact moments and
//! a bounded [`LatencyHistogram`] for percentiles.

mod aggregator;
mod counters;
mod latency;
mod report;

pub use aggregator::Aggregator;
pub use counters::Counters;
pub use latency::{LatencyHistogram, LatencyStats, LatencySummary};
pub use report::{KeyBreakdown, OverallReport, Snapshot};
