//! Retry helper for transient NCBI API failures
//!
//! Wraps `tokio-retry` with an exponential backoff plus jitter strategy and
//! only retries errors classified as transient by
//! [`PubMedError::is_retryable`](crate::PubMedError::is_retryable).

use crate::error::{PubMedError, Result};
use std::future::Future;
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::warn;

/// Backoff settings for retried requests
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt
    pub max_retries: usize,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound on the backoff delay
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryConfig {
    /// Disable retries entirely
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// Run `operation`, retrying transient failures with exponential backoff
pub async fn with_retry<F, Fut, T>(
    operation: F,
    config: &RetryConfig,
    description: &str,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    // `from_millis` sets the exponent base, so delays double starting at
    // `initial_delay` (2ms * factor, 4ms * factor, ...)
    let strategy = ExponentialBackoff::from_millis(2)
        .factor((config.initial_delay.as_millis() as u64 / 2).max(1))
        .max_delay(config.max_delay)
        .map(jitter)
        .take(config.max_retries);

    RetryIf::spawn(strategy, operation, |err: &PubMedError| {
        let retry = err.is_retryable();
        if retry {
            warn!(operation = description, error = %err, "Transient failure, retrying");
        }
        retry
    })
    .await
}
