//! Structured views produced by the aggregator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::latency::LatencySummary;

/// Delta statistics since the previous snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Seconds covered by this snapshot
    pub interval_secs: f64,

    /// Requests accounted for in the interval
    pub sent: u64,

    /// Losses in the interval
    pub lost: u64,

    /// Per-code counts in the interval (only codes that moved)
    pub codes: BTreeMap<u16, u64>,

    /// `sent / interval_secs`
    pub rate: f64,
}

/// Per-key counters in the final report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBreakdown {
    /// Request key
    pub key: String,
    /// Requests with this key
    pub sent: u64,
    /// Losses with this key
    pub lost: u64,
    /// Per-code counts with this key
    pub codes: BTreeMap<u16, u64>,
}

/// Final whole-run statistics
///
/// Every derived value is zero when nothing was sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallReport {
    /// Run time the rates were computed against
    pub elapsed_secs: f64,

    /// Total requests
    pub sent: u64,

    /// Requests that received a reply
    pub received: u64,

    /// Requests without a usable reply
    pub lost: u64,

    /// `lost / sent`
    pub loss_rate: f64,

    /// `sent / elapsed`
    pub requests_per_second: f64,

    /// `received / elapsed`
    pub completed_per_second: f64,

    /// Latency statistics in milliseconds
    pub latency: LatencySummary,

    /// Mean request size over completed requests
    pub avg_request_size: f64,

    /// Mean response size over completed requests
    pub avg_response_size: f64,

    /// Completed requests per result code
    pub codes: BTreeMap<u16, u64>,

    /// Per-key counters sorted by key (empty unless enabled)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub per_key: Vec<KeyBreakdown>,
}

impl OverallReport {
    /// Fraction of requests that received a reply
    pub fn completion_rate(&self) -> f64 {
        if self.sent == 0 {
            0.0
        } else {
            self.received as f64 / self.sent as f64
        }
    }
}
