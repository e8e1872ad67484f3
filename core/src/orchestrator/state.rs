//! Run lifecycle states

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of one run: `Idle -> Running -> Draining -> Completed`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Built but not started
    #[default]
    Idle,
    /// Feeder, workers and reporter are active
    Running,
    /// Stop signal observed, waiting for in-flight work
    Draining,
    /// Run finished; the final report is available unless `run` failed
    Completed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Draining => "draining",
            RunState::Completed => "completed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(RunState::default(), RunState::Idle);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(RunState::Draining.to_string(), "draining");
        assert_eq!(
            serde_json::to_string(&RunState::Running).unwrap(),
            "\"running\""
        );
    }
}
