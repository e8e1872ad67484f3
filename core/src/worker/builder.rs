//! Builder pattern for Worker construction

use crate::error::{BenchError, BenchResult};
use crate::metrics::Aggregator;
use crate::request::Request;
use crate::traits::Target;

use super::executor::Worker;
use super::IndexQueue;

use std::sync::Arc;
use std::time::Duration;

/// Builder for creating Worker instances
///
/// # Example
/// ```ignore
/// let worker = WorkerBuilder::new(0)
///     .target(target)
///     .requests(requests)
///     .queue(queue)
///     .aggregator(aggregator)
///     .timeout(Duration::from_secs(1))
///     .build()?;
/// ```
pub struct WorkerBuilder {
    id: usize,
    target: Option<Arc<dyn Target>>,
    requests: Option<Arc<[Request]>>,
    queue: Option<IndexQueue>,
    aggregator: Option<Arc<Aggregator>>,
    timeout: Option<Duration>,
    include_lost_latency: bool,
}

impl WorkerBuilder {
    /// Create a new builder with the given worker ID
    pub fn new(id: usize) -> Self {
        Self {
            id,
            target: None,
            requests: None,
            queue: None,
            aggregator: None,
            timeout: None,
            include_lost_latency: false,
        }
    }

    /// Set the target
    pub fn target(mut self, target: Arc<dyn Target>) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the shared request list
    pub fn requests(mut self, requests: Arc<[Request]>) -> Self {
        self.requests = Some(requests);
        self
    }

    /// Set the shared index queue
    pub fn queue(mut self, queue: IndexQueue) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Set the shared aggregator
    pub fn aggregator(mut self, aggregator: Arc<Aggregator>) -> Self {
        self.aggregator = Some(aggregator);
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach the measured latency to lost outcomes
    pub fn include_lost_latency(mut self, enabled: bool) -> Self {
        self.include_lost_latency = enabled;
        self
    }

    /// Build the Worker
    ///
    /// # Errors
    /// Returns an error if any required field is missing.
    pub fn build(self) -> BenchResult<Worker> {
        let target = self.target.ok_or(BenchError::missing_config("target"))?;
        let requests = self
            .requests
            .ok_or(BenchError::missing_config("requests"))?;
        let queue = self.queue.ok_or(BenchError::missing_config("queue"))?;
        let aggregator = self
            .aggregator
            .ok_or(BenchError::missing_config("aggregator"))?;
        let timeout = self.timeout.ok_or(BenchError::missing_config("timeout"))?;

        Ok(
            Worker::new(self.id, target, requests, queue, aggregator, timeout)
                .with_lost_latency(self.include_lost_latency),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::{mpsc, Mutex};

    fn queue() -> IndexQueue {
        let (_tx, rx) = mpsc::channel(1);
        Arc::new(Mutex::new(rx))
    }

    #[test]
    fn test_builder_missing_target() {
        let result = WorkerBuilder::new(0)
            .requests(Arc::from(vec![Request::from_key("a")]))
            .queue(queue())
            .aggregator(Arc::new(Aggregator::new(false)))
            .timeout(Duration::from_secs(1))
            .build();

        let err = result.unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("target"));
    }

    #[test]
    fn test_builder_missing_queue() {
        let result = WorkerBuilder::new(0)
            .requests(Arc::from(vec![Request::from_key("a")]))
            .aggregator(Arc::new(Aggregator::new(false)))
            .timeout(Duration::from_secs(1))
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_builder_missing_timeout() {
        let result = WorkerBuilder::new(0)
            .requests(Arc::from(vec![Request::from_key("a")]))
            .queue(queue())
            .aggregator(Arc::new(Aggregator::new(false)))
            .build();

        assert!(result.is_err());
    }
}
