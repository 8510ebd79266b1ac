//! Bounded fixed-delay retry configuration for adapter-internal retries.
//!
//! The wait engine never retries; only vendor adapters do, and only for
//! statuses the vendor documents as transient (rate limiting, mostly).

use backon::ConstantBuilder;
use std::time::Duration;

/// Configuration for a bounded, fixed-delay retry.
///
/// ```rust
/// use sms_verify::RetryConfig;
/// use std::time::Duration;
///
/// let config = RetryConfig::default()
///     .with_delay(Duration::from_secs(5))
///     .with_max_retries(2);
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Delay between attempts (default: 20 seconds).
    pub delay: Duration,
    /// Maximum number of retry attempts after the first (default: 2).
    pub max_retries: usize,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(20),
            max_retries: 2,
        }
    }
}

impl RetryConfig {
    /// Set the delay between attempts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the maximum number of retry attempts.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Build a backoff strategy from this configuration.
    pub fn build_strategy(&self) -> ConstantBuilder {
        ConstantBuilder::default()
            .with_delay(self.delay)
            .with_max_times(self.max_retries)
    }
}
