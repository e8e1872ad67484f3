//! Channel configuration for feeder/worker communication

/// Channel buffer configuration
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Index queue capacity (feeder -> workers), never zero
    ///
    /// Indices sitting in the queue when the run is cancelled are still
    /// dispatched, so a small capacity keeps the hand-off tight.
    index_buffer: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self { index_buffer: 1 }
    }
}

impl ChannelConfig {
    /// Create a new channel config with a custom index queue capacity
    ///
    /// Zero is bumped to one, tokio channels need room for one message.
    pub fn with_index_buffer(mut self, size: usize) -> Self {
        self.index_buffer = size.max(1);
        self
    }

    /// Index queue capacity
    pub fn index_buffer(&self) -> usize {
        self.index_buffer
    }
}
