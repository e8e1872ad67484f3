//! Worker statistics tracking

use std::time::Instant;

use crate::outcome::Outcome;

/// Statistics tracked by each worker
#[derive(Debug, Default, Clone)]
pub struct WorkerStats {
    /// Target calls made
    pub dispatched: u64,

    /// Calls that returned a reply
    pub completed: u64,

    /// Calls that timed out, failed or panicked
    pub lost: u64,

    /// Worker start time
    pub started_at: Option<Instant>,

    /// Worker end time
    pub ended_at: Option<Instant>,
}

impl WorkerStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking (records start time)
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Stop tracking (records end time)
    pub fn stop(&mut self) {
        self.ended_at = Some(Instant::now());
    }

    /// Count one outcome
    pub fn record(&mut self, outcome: &Outcome) {
        self.dispatched += 1;
        if outcome.is_lost() {
            self.lost += 1;
        } else {
            self.completed += 1;
        }
    }

    /// Get elapsed time since start
    pub fn elapsed(&self) -> Option<std::time::Duration> {
        self.started_at.map(|start| {
            self.ended_at
                .map(|end| end.duration_since(start))
                .unwrap_or_else(|| start.elapsed())
        })
    }

    /// Merge stats from another worker
    pub fn merge(&mut self, other: &WorkerStats) {
        self.dispatched += other.dispatched;
        self.completed += other.completed;
        self.lost += other.lost;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Reply;
    use crate::request::Request;
    use std::time::Duration;

    #[test]
    fn test_worker_stats_defaults() {
        let stats = WorkerStats::default();
        assert_eq!(stats.dispatched, 0);
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.lost, 0);
        assert!(stats.started_at.is_none());
        assert!(stats.ended_at.is_none());
    }

    #[test]
    fn test_worker_stats_record() {
        let request = Request::from_key("a");
        let mut stats = WorkerStats::new();

        stats.record(&Outcome::completed(&request, Reply::new(0, 1), Duration::from_millis(1)));
        stats.record(&Outcome::completed(&request, Reply::new(2, 1), Duration::from_millis(1)));
        stats.record(&Outcome::lost(&request, None));
        stats.record(&Outcome::lost(&request, None));

        assert_eq!(stats.dispatched, 4);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.lost, 2);
    }

    #[test]
    fn test_worker_stats_merge() {
        let mut stats1 = WorkerStats {
            dispatched: 11,
            completed: 10,
            lost: 1,
            ..Default::default()
        };
        let stats2 = WorkerStats {
            dispatched: 7,
            completed: 5,
            lost: 2,
            ..Default::default()
        };

        stats1.merge(&stats2);

        assert_eq!(stats1.dispatched, 18);
        assert_eq!(stats1.completed, 15);
        assert_eq!(stats1.lost, 3);
    }

    #[test]
    fn test_worker_stats_start_stop() {
        let mut stats = WorkerStats::new();
        assert!(stats.elapsed().is_none());

        stats.start();
        assert!(stats.started_at.is_some());
        assert!(stats.elapsed().is_some());

        std::thread::sleep(Duration::from_millis(10));
        stats.stop();

        let elapsed = stats.elapsed().unwrap();
        assert!(elapsed >= Duration::from_millis(10));
    }
}
