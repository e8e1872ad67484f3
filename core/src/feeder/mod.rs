//! Feeder: the rate-paced source of request indices
//!
//! The feeder is the only producer on the index queue. It waits on the
//! global [`RequestRateLimiter`] before every emission, picks the next index
//! with an [`IndexSelector`], and pushes it to whichever worker is free.
//!
//! It stops when the run signal fires, when the optional loop cap
//! (`loops * len` emissions) is reached, or when every worker has gone away.
//! The last two also trigger the run signal so the rest of the run winds
//! down. Dropping the sender on exit closes the queue, so workers drain
//! whatever is still buffered and then stop.

mod rate_limiter;
mod selection;

pub use rate_limiter::RequestRateLimiter;
pub use selection::IndexSelector;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::signal::{RunSignal, StopReason};

/// Why the feeder stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeederExit {
    /// The run signal fired
    Cancelled,
    /// The dispatch cap was reached
    LoopCapReached,
    /// The index queue has no receivers left
    QueueClosed,
}

/// Feeder results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeederStats {
    /// Indices handed to the queue
    pub emitted: u64,
    /// Exit cause
    pub exit: FeederExit,
}

/// Rate-paced index producer
#[derive(Debug)]
pub struct Feeder {
    limiter: RequestRateLimiter,
    selector: IndexSelector,
    cap: Option<u64>,
    tx: mpsc::Sender<usize>,
}

impl Feeder {
    /// Create a new feeder
    ///
    /// `cap` is the total number of emissions allowed (`None` = unlimited).
    pub fn new(
        limiter: RequestRateLimiter,
        selector: IndexSelector,
        cap: Option<u64>,
        tx: mpsc::Sender<usize>,
    ) -> Self {
        Self {
            limiter,
            selector,
            cap,
            tx,
        }
    }

    /// Emit indices until cancelled, capped, or orphaned
    pub async fn run(mut self, signal: RunSignal) -> FeederStats {
        let mut emitted = 0u64;

        tracing::debug!(
            rate_limit = self.limiter.rate_limit(),
            cap = ?self.cap,
            "Feeder started"
        );

        let exit = loop {
            if self.cap.is_some_and(|cap| emitted >= cap) {
                break FeederExit::LoopCapReached;
            }

            tokio::select! {
                biased;
                _ = signal.cancelled() => break FeederExit::Cancelled,
                _ = self.limiter.wait() => {}
            }

            let Some(index) = self.selector.next() else {
                break FeederExit::Cancelled;
            };

            tokio::select! {
                biased;
                _ = signal.cancelled() => break FeederExit::Cancelled,
                sent = self.tx.send(index) => {
                    if sent.is_err() {
                        break FeederExit::QueueClosed;
                    }
                }
            }

            emitted += 1;
        };

        match exit {
            FeederExit::LoopCapReached => {
                signal.trigger(StopReason::LoopCapReached);
            }
            FeederExit::QueueClosed => {
                tracing::warn!(emitted, "Index queue closed, no workers left");
                signal.trigger(StopReason::WorkersExited);
            }
            FeederExit::Cancelled => {}
        }

        tracing::debug!(emitted, exit = ?exit, "Feeder finished");

        FeederStats { emitted, exit }
    }
}

#[cfg(test)]
mod tests;
