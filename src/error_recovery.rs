// src/error_recovery.rs
//! Retry with server-directed or exponential backoff for API operations.
//!
//! Every Notion call made during an export goes through [`RetryPolicy::execute`].
//! Failures are retried only when classified as rate limiting or transient
//! unavailability; the final failure is returned unchanged.

use crate::constants::{
    RETRY_INITIAL_DELAY, RETRY_MAX_ATTEMPTS, RETRY_MAX_DELAY, RETRY_MAX_JITTER,
};
use crate::error::AppError;
use rand::Rng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Decides how long to sleep before the next attempt.
pub trait WaitStrategy: Send + Sync {
    /// `attempt` is the 1-based number of the attempt that just failed.
    fn wait_after(&self, attempt: u32, error: &AppError) -> Duration;
}

/// Doubling delay with a random jitter, capped at `max_delay`.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub max_jitter: Duration,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            initial_delay: RETRY_INITIAL_DELAY,
            max_delay: RETRY_MAX_DELAY,
            max_jitter: RETRY_MAX_JITTER,
        }
    }
}

impl ExponentialBackoff {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let base = self
            .initial_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay);

        let jitter_ms = self.max_jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return base;
        }
        base + Duration::from_millis(rand::rng().random_range(0..=jitter_ms))
    }
}

impl WaitStrategy for ExponentialBackoff {
    fn wait_after(&self, attempt: u32, _error: &AppError) -> Duration {
        self.delay_for(attempt)
    }
}

/// Waits exactly as long as the server's `Retry-After` hint says, and
/// falls back to another strategy when there is no hint.
#[derive(Debug, Clone, Default)]
pub struct RetryAfterHeader<W> {
    pub fallback: W,
}

impl<W: WaitStrategy> WaitStrategy for RetryAfterHeader<W> {
    fn wait_after(&self, attempt: u32, error: &AppError) -> Duration {
        error
            .retry_after()
            .unwrap_or_else(|| self.fallback.wait_after(attempt, error))
    }
}

/// Bounded retry applied uniformly to gateway calls.
#[derive(Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    wait: Arc<dyn WaitStrategy>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            RETRY_MAX_ATTEMPTS,
            RetryAfterHeader {
                fallback: ExponentialBackoff::default(),
            },
        )
    }
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, wait: impl WaitStrategy + 'static) -> Self {
        Self {
            max_attempts,
            wait: Arc::new(wait),
        }
    }

    /// Runs `operation`, retrying rate-limited and transiently unavailable failures.
    pub async fn execute<F, T, Fut>(&self, label: &str, operation: F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        retry_with_backoff(
            operation,
            AppError::is_retryable,
            self.wait.as_ref(),
            self.max_attempts,
            label,
        )
        .await
    }
}

/// Retries an async operation while `should_retry` accepts the failure and
/// attempts remain, sleeping for whatever `wait` prescribes in between.
pub async fn retry_with_backoff<F, T, Fut, P>(
    mut operation: F,
    should_retry: P,
    wait: &dyn WaitStrategy,
    max_attempts: u32,
    label: &str,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
    P: Fn(&AppError) -> bool,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt < max_attempts && should_retry(&e) => {
                let delay = wait.wait_after(attempt, &e);
                log::warn!(
                    "{} failed: {} ({}). Waiting {:?} before attempt {}/{}",
                    label,
                    e.retry_reason(),
                    e,
                    delay,
                    attempt + 1,
                    max_attempts
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
