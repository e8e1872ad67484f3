//! Request type dispatched against a target

use serde::{Deserialize, Serialize};

/// A single unit of work
///
/// The key groups requests in the per-key breakdown; the payload is opaque to
/// the engine and only interpreted by the [`Target`](crate::traits::Target).
/// Requests are loaded once and shared read-only by every worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Grouping key (e.g. `"example.com A"`)
    key: String,

    /// Protocol-specific payload
    payload: Vec<u8>,
}

impl Request {
    /// Create a new request
    pub fn new(key: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            payload: payload.into(),
        }
    }

    /// Create a request whose payload is the key itself
    pub fn from_key(key: impl Into<String>) -> Self {
        let key = key.into();
        let payload = key.clone().into_bytes();
        Self { key, payload }
    }

    /// Grouping key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload size in bytes
    pub fn size(&self) -> usize {
        self.payload.len()
    }
}

impl std::fmt::Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} bytes)", self.key, self.payload.len())
    }
}
