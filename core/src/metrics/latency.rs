//! Streaming latency statistics

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Streaming latency accumulators in microseconds
///
/// O(1) per update and per derivation, no raw samples retained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatencyStats {
    count: u64,
    sum: u128,
    sum_sq: u128,
    min: Option<u64>,
    max: u64,
}

impl LatencyStats {
    /// Add one latency sample
    pub fn record(&mut self, latency: Duration) {
        let micros = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX);
        let wide = u128::from(micros);

        self.count += 1;
        self.sum = self.sum.saturating_add(wide);
        self.sum_sq = self.sum_sq.saturating_add(wide * wide);
        self.min = Some(self.min.map_or(micros, |min| min.min(micros)));
        self.max = self.max.max(micros);
    }

    /// Number of samples
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Smallest sample in microseconds (0 when empty)
    pub fn min_micros(&self) -> u64 {
        self.min.unwrap_or(0)
    }

    /// Largest sample in microseconds
    pub fn max_micros(&self) -> u64 {
        self.max
    }

    /// Arithmetic mean in microseconds
    pub fn mean_micros(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum as f64 / self.count as f64
    }

    /// Population standard deviation in microseconds
    ///
    /// `sqrt(E[x^2] - E[x]^2)`, with the variance clamped at zero.
    pub fn stddev_micros(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let n = self.count as f64;
        let mean = self.sum as f64 / n;
        let variance = self.sum_sq as f64 / n - mean * mean;
        variance.max(0.0).sqrt()
    }
}

/// Latency summary in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencySummary {
    /// Number of latency samples behind this summary
    pub samples: u64,
    /// Minimum value
    pub min: f64,
    /// Mean value
    pub mean: f64,
    /// Maximum value
    pub max: f64,
    /// Standard deviation
    pub stddev: f64,
    /// 50th percentile (median)
    pub p50: f64,
    /// 90th percentile
    pub p90: f64,
    /// 99th percentile
    pub p99: f64,
}

impl LatencySummary {
    /// Combine exact moments with histogram percentiles
    pub fn from_parts(stats: &LatencyStats, histogram: &LatencyHistogram) -> Self {
        if stats.count() == 0 {
            return Self::default();
        }

        Self {
            samples: stats.count(),
            min: stats.min_micros() as f64 / 1000.0,
            mean: stats.mean_micros() / 1000.0,
            max: stats.max_micros() as f64 / 1000.0,
            stddev: stats.stddev_micros() / 1000.0,
            p50: histogram.quantile_ms(0.50),
            p90: histogram.quantile_ms(0.90),
            p99: histogram.quantile_ms(0.99),
        }
    }
}

/// In-memory histogram for percentile calculation
/// Uses HdrHistogram so memory stays bounded on long runs
pub struct LatencyHistogram {
    histogram: hdrhistogram::Histogram<u64>,
}

impl LatencyHistogram {
    /// Create a new histogram
    /// Configured for microsecond precision with max 1 hour latency
    pub fn new() -> Self {
        // 1us .. 1h, three significant digits; constant bounds always succeed
        let histogram = hdrhistogram::Histogram::new_with_bounds(1, 3_600_000_000, 3)
            .expect("valid histogram bounds");
        Self { histogram }
    }

    /// Record a duration
    ///
    /// Values beyond the bounds are clamped.
    pub fn record(&mut self, duration: Duration) {
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        self.histogram.saturating_record(micros.max(1));
    }

    /// Get the number of recorded values
    pub fn len(&self) -> u64 {
        self.histogram.len()
    }

    /// Check if the histogram is empty
    pub fn is_empty(&self) -> bool {
        self.histogram.is_empty()
    }

    /// Value at quantile `q` in milliseconds
    pub fn quantile_ms(&self, q: f64) -> f64 {
        if self.histogram.is_empty() {
            return 0.0;
        }
        self.histogram.value_at_quantile(q) as f64 / 1000.0
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LatencyHistogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LatencyHistogram")
            .field("len", &self.histogram.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let stats = LatencyStats::default();
        assert_eq!(stats.count(), 0);
        assert_eq!(stats.min_micros(), 0);
        assert_eq!(stats.max_micros(), 0);
        assert_eq!(stats.mean_micros(), 0.0);
        assert_eq!(stats.stddev_micros(), 0.0);
    }

    #[test]
    fn test_mean_and_stddev() {
        let mut stats = LatencyStats::default();
        for micros in [2u64, 4, 4, 4, 5, 5, 7, 9] {
            stats.record(Duration::from_micros(micros));
        }

        assert_eq!(stats.count(), 8);
        assert_eq!(stats.min_micros(), 2);
        assert_eq!(stats.max_micros(), 9);
        assert!((stats.mean_micros() - 5.0).abs() < 1e-9);
        assert!((stats.stddev_micros() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_identical_samples_never_negative() {
        let mut stats = LatencyStats::default();
        for _ in 0..10_000 {
            stats.record(Duration::from_micros(123_457));
        }

        let stddev = stats.stddev_micros();
        assert!(stddev >= 0.0);
        assert!(stddev < 1e-3);
    }

    #[test]
    fn test_sub_microsecond_sample_counts_as_zero() {
        let mut stats = LatencyStats::default();
        stats.record(Duration::from_nanos(300));
        stats.record(Duration::from_micros(10));

        assert_eq!(stats.min_micros(), 0);
        assert_eq!(stats.max_micros(), 10);
    }

    #[test]
    fn test_histogram_percentiles() {
        let mut histogram = LatencyHistogram::new();
        for ms in 1..=100 {
            histogram.record(Duration::from_millis(ms));
        }

        assert_eq!(histogram.len(), 100);
        assert!((histogram.quantile_ms(0.5) - 50.0).abs() < 1.0);
        assert!((histogram.quantile_ms(0.99) - 99.0).abs() < 1.0);
    }

    #[test]
    fn test_histogram_saturates_out_of_range() {
        let mut histogram = LatencyHistogram::new();
        histogram.record(Duration::from_secs(7200));
        histogram.record(Duration::ZERO);

        assert_eq!(histogram.len(), 2);
        assert!(!histogram.is_empty());
    }

    #[test]
    fn test_summary_from_parts() {
        let mut stats = LatencyStats::default();
        let mut histogram = LatencyHistogram::new();
        for ms in [10u64, 20, 30] {
            stats.record(Duration::from_millis(ms));
            histogram.record(Duration::from_millis(ms));
        }

        let summary = LatencySummary::from_parts(&stats, &histogram);
        assert_eq!(summary.samples, 3);
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.max, 30.0);
        assert!((summary.mean - 20.0).abs() < 1e-9);
        assert!((summary.p50 - 20.0).abs() < 0.1);
    }

    #[test]
    fn test_summary_empty() {
        let summary = LatencySummary::from_parts(&LatencyStats::default(), &LatencyHistogram::new());
        assert_eq!(summary, LatencySummary::default());
    }
}
