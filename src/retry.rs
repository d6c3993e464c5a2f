//! Exponential backoff around a single catalog request
//!
//! Delays are `tokio::time::sleep`, so other tasks keep running while a
//! request waits for its next attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::ApiError;

/// Number of retries after the first attempt
pub const DEFAULT_RETRIES: u32 = 3;

/// Delay before the first retry; doubled for every retry after it
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);

/// How often and how patiently a request is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (total attempts = retries + 1)
    pub retries: u32,
    /// Wait before the first retry
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            initial_delay: DEFAULT_INITIAL_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given retry count and initial delay
    pub fn new(retries: u32, initial_delay: Duration) -> Self {
        Self {
            retries,
            initial_delay,
        }
    }

    /// A policy that never retries
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// The sequence of waits between attempts: `initial`, `2 * initial`, ...
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let initial = self.initial_delay;
        (0..self.retries).map(move |n| initial.saturating_mul(2u32.saturating_pow(n)))
    }
}

/// Runs `request` until it succeeds, fails with a non-retryable error, or the
/// policy's retries are used up.
///
/// # Returns
/// * `Ok(T)` from the first successful attempt
/// * `Err(ApiError)` from the last attempt otherwise
pub async fn with_retries<T, F, Fut>(policy: &RetryPolicy, mut request: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut delays = policy.delays();
    let mut attempt = 1u32;

    loop {
        match request().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_retryable() => return Err(err),
            Err(err) => {
                let Some(delay) = delays.next() else {
                    tracing::warn!(attempts = attempt, error = %err, "giving up on request");
                    return Err(err);
                };
                tracing::warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "request failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
