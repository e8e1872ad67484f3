//! Pool-level summary of worker results

use serde::Serialize;
use std::time::Duration;

use crate::worker::WorkerStats;

/// Aggregated statistics from all workers
#[derive(Debug, Clone, Default, Serialize)]
pub struct PoolSummary {
    /// Number of workers that returned stats
    pub total_workers: usize,

    /// Total Target calls
    pub dispatched: u64,

    /// Calls that returned a reply
    pub completed: u64,

    /// Calls that were lost
    pub lost: u64,

    /// Maximum worker lifetime
    pub total_duration: Duration,

    /// Calls per second over the longest worker lifetime
    pub dispatch_rate: f64,
}

impl PoolSummary {
    /// Get the completion rate (0.0 - 1.0)
    pub fn completion_rate(&self) -> f64 {
        if self.dispatched > 0 {
            self.completed as f64 / self.dispatched as f64
        } else {
            0.0
        }
    }
}

/// Aggregate statistics from multiple workers
pub fn summarize_workers(stats: &[WorkerStats]) -> PoolSummary {
    if stats.is_empty() {
        return PoolSummary::default();
    }

    let mut total = WorkerStats::new();
    for worker in stats {
        total.merge(worker);
    }

    let total_duration = stats
        .iter()
        .filter_map(|s| s.elapsed())
        .max()
        .unwrap_or(Duration::ZERO);

    let secs = total_duration.as_secs_f64();
    let dispatch_rate = if secs > 0.0 {
        total.dispatched as f64 / secs
    } else {
        0.0
    };

    PoolSummary {
        total_workers: stats.len(),
        dispatched: total.dispatched,
        completed: total.completed,
        lost: total.lost,
        total_duration,
        dispatch_rate,
    }
}
