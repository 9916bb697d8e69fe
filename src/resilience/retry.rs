//! Bounded retry with exponential backoff.
//!
//! # Responsibilities
//! - Execute an async operation up to `max_retries + 1` times
//! - Wait an exponentially growing, capped delay between failed attempts
//! - Let the caller decide which errors warrant a retry
//!
//! # Design Decisions
//! - Attempts run strictly sequentially, never overlapping
//! - The last observed error propagates unchanged (no wrapping)
//! - A rejecting predicate short-circuits without any delay

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::resilience::backoff::calculate_delay;

type RetryPredicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;
type RetryHook<E> = Arc<dyn Fn(u32, &E) + Send + Sync>;

/// Retry policy for an async operation failing with error type `E`.
///
/// Defaults: 3 retries, 1000ms initial delay, 10000ms cap, 2.0 multiplier,
/// every error retryable.
pub struct RetryPolicy<E> {
    max_retries: u32,
    initial_delay: Duration,
    max_delay: Duration,
    backoff_multiplier: f64,
    should_retry: RetryPredicate<E>,
    on_retry: Option<RetryHook<E>>,
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        Self {
            max_retries: self.max_retries,
            initial_delay: self.initial_delay,
            max_delay: self.max_delay,
            backoff_multiplier: self.backoff_multiplier,
            should_retry: Arc::clone(&self.should_retry),
            on_retry: self.on_retry.as_ref().map(Arc::clone),
        }
    }
}

impl<E> RetryPolicy<E> {
    /// Create a policy with default settings.
    pub fn new() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
            backoff_multiplier: 2.0,
            should_retry: Arc::new(|_| true),
            on_retry: None,
        }
    }

    /// Create a policy from configuration values.
    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new()
            .max_retries(config.max_retries)
            .initial_delay(Duration::from_millis(config.initial_delay_ms))
            .max_delay(Duration::from_millis(config.max_delay_ms))
            .backoff_multiplier(config.backoff_multiplier)
    }

    /// Maximum number of retries after the initial attempt.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Delay before the first retry.
    pub fn initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    /// Ceiling on the computed delay.
    pub fn max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Multiplicative delay growth factor.
    pub fn backoff_multiplier(mut self, backoff_multiplier: f64) -> Self {
        self.backoff_multiplier = backoff_multiplier;
        self
    }

    /// Predicate deciding whether a failure warrants another attempt.
    pub fn should_retry<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.should_retry = Arc::new(predicate);
        self
    }

    /// Hook invoked with `(attempt_number, error)` before each retry wait.
    pub fn on_retry<F>(mut self, hook: F) -> Self
    where
        F: Fn(u32, &E) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(hook));
        self
    }

    /// Execute `operation`, retrying per this policy.
    ///
    /// Returns the first successful result, or the error from the final
    /// failing attempt. An error rejected by the predicate propagates
    /// immediately.
    pub async fn execute<T, Fut, Op>(&self, mut operation: Op) -> Result<T, E>
    where
        Op: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0u32;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt >= self.max_retries || !(self.should_retry)(&error) {
                        return Err(error);
                    }

                    let delay = calculate_delay(
                        attempt,
                        self.initial_delay,
                        self.backoff_multiplier,
                        self.max_delay,
                    );
                    if let Some(hook) = &self.on_retry {
                        hook(attempt + 1, &error);
                    }
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl<E> Default for RetryPolicy<E> {
    fn default() -> Self {
        Self::new()
    }
}
