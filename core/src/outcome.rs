//! Outcome types produced by one dispatch

use crate::request::Request;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reply returned by a target for a delivered request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Result code of the received response
    pub code: u16,

    /// Response size in bytes
    pub size: usize,
}

impl Reply {
    /// Create a new reply
    pub fn new(code: u16, size: usize) -> Self {
        Self { code, size }
    }
}

/// Classification of one dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// No usable response within the timeout
    Lost,
    /// A response was received and classified under this result code
    Completed(u16),
}

impl Status {
    /// Check if this status is a loss
    pub fn is_lost(&self) -> bool {
        matches!(self, Status::Lost)
    }

    /// Result code, if a response was received
    pub fn code(&self) -> Option<u16> {
        match self {
            Status::Lost => None,
            Status::Completed(code) => Some(*code),
        }
    }
}

/// Result of one target invocation
///
/// Created once per dispatch and consumed exactly once by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Lost or completed with a code
    pub status: Status,

    /// Measured latency, when it should feed the latency statistics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<Duration>,

    /// Size of the originating request in bytes
    pub request_size: usize,

    /// Size of the response in bytes (0 when lost)
    pub response_size: usize,
}

impl Outcome {
    /// Outcome for a request that received a reply
    pub fn completed(request: &Request, reply: Reply, latency: Duration) -> Self {
        Self {
            status: Status::Completed(reply.code),
            latency: Some(latency),
            request_size: request.size(),
            response_size: reply.size,
        }
    }

    /// Outcome for a request that got no usable reply
    pub fn lost(request: &Request, latency: Option<Duration>) -> Self {
        Self {
            status: Status::Lost,
            latency,
            request_size: request.size(),
            response_size: 0,
        }
    }

    /// Check if this outcome is a loss
    pub fn is_lost(&self) -> bool {
        self.status.is_lost()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_outcome() {
        let request = Request::from_key("abc");
        let outcome = Outcome::completed(&request, Reply::new(3, 42), Duration::from_millis(5));

        assert_eq!(outcome.status, Status::Completed(3));
        assert_eq!(outcome.status.code(), Some(3));
        assert!(!outcome.is_lost());
        assert_eq!(outcome.latency, Some(Duration::from_millis(5)));
        assert_eq!(outcome.request_size, 3);
        assert_eq!(outcome.response_size, 42);
    }

    #[test]
    fn test_lost_outcome() {
        let request = Request::from_key("abcd");
        let outcome = Outcome::lost(&request, None);

        assert!(outcome.is_lost());
        assert_eq!(outcome.status.code(), None);
        assert!(outcome.latency.is_none());
        assert_eq!(outcome.request_size, 4);
        assert_eq!(outcome.response_size, 0);
    }

    #[test]
    fn test_status_json_format() {
        assert_eq!(serde_json::to_string(&Status::Lost).unwrap(), "\"lost\"");
        assert_eq!(
            serde_json::to_string(&Status::Completed(2)).unwrap(),
            "{\"completed\":2}"
        );
    }
}
