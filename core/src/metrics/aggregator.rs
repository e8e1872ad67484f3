//! Race-free accumulation of run statistics

use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use super::counters::Counters;
use super::latency::{LatencyHistogram, LatencyStats, LatencySummary};
use super::report::{KeyBreakdown, OverallReport, Snapshot};
use crate::outcome::Outcome;
use crate::request::Request;

/// Thread-safe accumulator shared by every worker
///
/// All state sits behind one mutex; every method holds it for O(1) work
/// (O(codes) for snapshots), so contention is bounded by the worker count.
#[derive(Debug)]
pub struct Aggregator {
    state: Mutex<AggregatorState>,
    per_key: bool,
}

#[derive(Debug)]
struct AggregatorState {
    current: Counters,
    previous: Counters,
    last_snapshot: Instant,
    latency: LatencyStats,
    histogram: LatencyHistogram,
    request_bytes: u128,
    response_bytes: u128,
    keys: BTreeMap<String, Counters>,
}

impl Aggregator {
    /// Create an empty aggregator
    pub fn new(per_key: bool) -> Self {
        Self {
            state: Mutex::new(AggregatorState {
                current: Counters::default(),
                previous: Counters::default(),
                last_snapshot: Instant::now(),
                latency: LatencyStats::default(),
                histogram: LatencyHistogram::new(),
                request_bytes: 0,
                response_bytes: 0,
                keys: BTreeMap::new(),
            }),
            per_key,
        }
    }

    // A panic elsewhere cannot leave the counters half-updated, so a
    // poisoned lock is still safe to read.
    fn lock(&self) -> MutexGuard<'_, AggregatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Restart the live-snapshot clock
    ///
    /// Called when the run starts, so the first snapshot covers only run
    /// time. Counters recorded so far are treated as already reported.
    pub fn mark_start(&self) {
        let mut state = self.lock();
        state.previous = state.current.clone();
        state.last_snapshot = Instant::now();
    }

    /// Account for one outcome
    pub fn record(&self, request: &Request, outcome: &Outcome) {
        let mut state = self.lock();

        state.current.record(outcome.status);

        if !outcome.is_lost() {
            state.request_bytes += outcome.request_size as u128;
            state.response_bytes += outcome.response_size as u128;
        }

        if let Some(latency) = outcome.latency {
            state.latency.record(latency);
            state.histogram.record(latency);
        }

        if self.per_key {
            match state.keys.get_mut(request.key()) {
                Some(counters) => counters.record(outcome.status),
                None => {
                    let mut counters = Counters::default();
                    counters.record(outcome.status);
                    state.keys.insert(request.key().to_owned(), counters);
                }
            }
        }
    }

    /// Delta view since the previous call, then advance the previous sample
    pub fn snapshot(&self) -> Snapshot {
        let mut state = self.lock();

        let now = Instant::now();
        let interval = now.duration_since(state.last_snapshot);
        let delta = state.current.delta_since(&state.previous);

        state.previous = state.current.clone();
        state.last_snapshot = now;

        let interval_secs = interval.as_secs_f64();
        let rate = if interval_secs > 0.0 {
            delta.sent as f64 / interval_secs
        } else {
            0.0
        };

        Snapshot {
            timestamp: Utc::now(),
            interval_secs,
            sent: delta.sent,
            lost: delta.lost,
            codes: delta.codes,
            rate,
        }
    }

    /// Cumulative counters
    pub fn counters(&self) -> Counters {
        self.lock().current.clone()
    }

    /// Final view over the whole run
    pub fn overall(&self, elapsed: Duration) -> OverallReport {
        let state = self.lock();

        let per_key = state
            .keys
            .iter()
            .map(|(key, counters)| KeyBreakdown {
                key: key.clone(),
                sent: counters.sent,
                lost: counters.lost,
                codes: counters.codes.clone(),
            })
            .collect();

        let counters = &state.current;
        if counters.sent == 0 {
            return OverallReport {
                elapsed_secs: elapsed.as_secs_f64(),
                per_key,
                ..Default::default()
            };
        }

        let received = counters.received();
        let secs = elapsed.as_secs_f64();
        let per_second = |count: u64| if secs > 0.0 { count as f64 / secs } else { 0.0 };
        let per_received = |bytes: u128| {
            if received > 0 {
                bytes as f64 / received as f64
            } else {
                0.0
            }
        };

        OverallReport {
            elapsed_secs: secs,
            sent: counters.sent,
            received,
            lost: counters.lost,
            loss_rate: counters.lost as f64 / counters.sent as f64,
            requests_per_second: per_second(counters.sent),
            completed_per_second: per_second(received),
            latency: LatencySummary::from_parts(&state.latency, &state.histogram),
            avg_request_size: per_received(state.request_bytes),
            avg_response_size: per_received(state.response_bytes),
            codes: counters.codes.clone(),
            per_key,
        }
    }
}
