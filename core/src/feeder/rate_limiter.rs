//! Global dispatch rate limiting

use governor::{clock::DefaultClock, state::InMemoryState, state::NotKeyed, Quota, RateLimiter};
use std::time::Duration;

use crate::config::ConfigError;

/// Rate limiter using token bucket algorithm via governor crate
///
/// One instance paces the whole run: it lives in the feeder, so the rate
/// bounds aggregate throughput no matter how many workers consume indices.
pub struct RequestRateLimiter {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    rate_limit: f64,
}

impl RequestRateLimiter {
    /// Create a new rate limiter for `rate_limit` requests per second
    ///
    /// The bucket replenishes one cell every `1 / rate_limit` seconds with a
    /// burst of one, so fractional rates such as `0.5` are honoured exactly.
    ///
    /// # Examples
    /// ```
    /// use ratebench_core::feeder::RequestRateLimiter;
    ///
    /// let limiter = RequestRateLimiter::new(100.0).unwrap();
    /// assert_eq!(limiter.rate_limit(), 100.0);
    ///
    /// assert!(RequestRateLimiter::new(0.0).is_err());
    /// ```
    pub fn new(rate_limit: f64) -> Result<Self, ConfigError> {
        if !rate_limit.is_finite() || rate_limit <= 0.0 {
            return Err(ConfigError::InvalidRateLimit(format!(
                "rate limit must be a positive number, got {rate_limit}"
            )));
        }

        let period = Duration::try_from_secs_f64(1.0 / rate_limit)
            .map_err(|e| ConfigError::InvalidRateLimit(format!("{rate_limit}: {e}")))?
            .max(Duration::from_nanos(1));
        let quota = Quota::with_period(period).ok_or_else(|| {
            ConfigError::InvalidRateLimit(format!("rate limit {rate_limit} is out of range"))
        })?;

        Ok(Self {
            limiter: RateLimiter::direct(quota),
            rate_limit,
        })
    }

    /// Wait until the next dispatch is allowed
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Get the configured rate limit (requests per second)
    pub fn rate_limit(&self) -> f64 {
        self.rate_limit
    }
}

impl std::fmt::Debug for RequestRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestRateLimiter")
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}
