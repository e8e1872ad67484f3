//! Shared run termination signal

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, OnceLock};
use tokio_util::sync::CancellationToken;

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The configured duration elapsed
    Deadline,
    /// An external interrupt (Ctrl+C, SIGTERM or an explicit shutdown)
    Interrupted,
    /// The feeder emitted `loops * len` indices
    LoopCapReached,
    /// Every worker went away before the run ended
    WorkersExited,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::Deadline => "duration elapsed",
            StopReason::Interrupted => "interrupted",
            StopReason::LoopCapReached => "loop cap reached",
            StopReason::WorkersExited => "workers exited",
        };
        f.write_str(text)
    }
}

/// One-shot termination signal shared by every task of a run
///
/// Any holder may trigger it; only the first trigger records its reason,
/// later ones are no-ops. Observed by the feeder, the workers, the reporter
/// and the coordinator.
#[derive(Debug, Clone, Default)]
pub struct RunSignal {
    token: CancellationToken,
    reason: Arc<OnceLock<StopReason>>,
}

impl RunSignal {
    /// Create a new untriggered signal
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger the signal
    ///
    /// Returns `true` if this call was the one that triggered it.
    pub fn trigger(&self, reason: StopReason) -> bool {
        let first = self.reason.set(reason).is_ok();
        self.token.cancel();
        first
    }

    /// Wait until the signal is triggered
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Check if the signal has been triggered
    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Reason recorded by the first trigger
    pub fn reason(&self) -> Option<StopReason> {
        self.reason.get().copied()
    }
}
