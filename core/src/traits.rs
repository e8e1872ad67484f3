//! Core trait for the system under test
//!
//! Defined in core so that protocol implementations (targets/) depend on the
//! engine and not the other way around.

use crate::outcome::Reply;
use crate::request::Request;
use async_trait::async_trait;
use std::time::Duration;

// ============================================================================
// Target Trait
// ============================================================================

/// The system under test
///
/// Implementations handle protocol details (wire format, transport) while
/// presenting a single request/reply call to the worker pool. A target is
/// shared by every worker, so it must be safe to call concurrently.
#[async_trait]
pub trait Target: Send + Sync {
    /// Target identifier used in logs (e.g. `"udp://127.0.0.1:53"`)
    fn name(&self) -> &str;

    /// Send one request and wait for its reply
    ///
    /// The worker also enforces `timeout` around this call, so an
    /// implementation that ignores it still cannot stall the pool.
    async fn perform(&self, request: &Request, timeout: Duration) -> Result<Reply, TargetError>;

    /// Human-readable label for a result code
    fn code_label(&self, code: u16) -> String {
        code.to_string()
    }
}

/// Target-specific errors
///
/// Every variant is absorbed by the worker and recorded as a lost outcome.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// No reply within the deadline
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Transport error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Reply could not be decoded
    #[error("Malformed reply: {0}")]
    Malformed(String),

    /// The target call panicked
    #[error("Target call panicked")]
    Panicked,
}

impl TargetError {
    /// Check if the request ran out of time
    pub fn is_timeout(&self) -> bool {
        match self {
            TargetError::Timeout(_) => true,
            TargetError::Io(err) => err.kind() == std::io::ErrorKind::TimedOut,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    #[async_trait]
    impl Target for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn perform(&self, request: &Request, _timeout: Duration) -> Result<Reply, TargetError> {
            Ok(Reply::new(0, request.size()))
        }
    }

    #[tokio::test]
    async fn test_default_code_label() {
        let target = Fixed;
        assert_eq!(target.code_label(3), "3");

        let reply = target
            .perform(&Request::from_key("abc"), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(reply, Reply::new(0, 3));
    }

    #[test]
    fn test_target_error_timeout() {
        assert!(TargetError::Timeout(Duration::from_secs(1)).is_timeout());
        assert!(TargetError::Io(std::io::ErrorKind::TimedOut.into()).is_timeout());
        assert!(!TargetError::Io(std::io::ErrorKind::ConnectionRefused.into()).is_timeout());
        assert!(!TargetError::Malformed("short frame".into()).is_timeout());
        assert!(!TargetError::Panicked.is_timeout());
    }
}
