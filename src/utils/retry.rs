//! Retry logic with exponential backoff
//!
//! Only resource-manager calls go through here. Storage listing pages are
//! never retried; a failed page ends its listing.

use crate::error::Result;
use crate::utils::network::is_retryable_error;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct RetryOptions {
    pub max_retries: usize,
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub multiplier: f64,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

/// Run a resource-manager call, retrying transient failures.
///
/// The wait between attempts grows by `multiplier` up to `max_interval`.
/// A throttled response that names a `Retry-After` delay is honoured
/// instead, still capped at `max_interval`.
pub async fn retry_with_backoff<T, F, Fut>(mut operation: F, options: RetryOptions) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut backoff = options.initial_interval;
    let mut attempt = 0;

    loop {
        let error = match operation().await {
            Ok(result) => return Ok(result),
            Err(error) => error,
        };

        if attempt >= options.max_retries || !is_retryable_error(&error) {
            return Err(error);
        }
        attempt += 1;

        let wait = error
            .retry_after()
            .unwrap_or(backoff)
            .min(options.max_interval);
        debug!("{}; retrying in {:?} (attempt {})", error, wait, attempt);
        sleep(wait).await;

        backoff = Duration::from_secs_f64(backoff.as_secs_f64() * options.multiplier)
            .min(options.max_interval);
    }
}

/// Parse a `Retry-After` header given in whole seconds
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
