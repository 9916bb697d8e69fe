//! Upstream concurrency limiting.
//!
//! # Responsibilities
//! - Admit at most `max_concurrent` operations at once
//! - Park excess submissions and resume them in arrival order
//! - Space admissions by waiting `min_delay` before releasing a slot
//!
//! # Design Decisions
//! - A fair counting semaphore guards entry; tokio queues waiters FIFO
//! - Slot release is a timer-delayed permit drop in a spawned task, so the
//!   caller gets its result immediately while the slot cools down
//! - The wrapped operation's output is forwarded unchanged; a failure still
//!   reclaims the slot and never affects queued or active peers

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::config::LimiterConfig;

/// Bounds the number of simultaneously in-flight upstream operations.
pub struct RequestLimiter {
    permits: Arc<Semaphore>,
    active: Arc<AtomicUsize>,
    max_concurrent: usize,
    min_delay: Duration,
}

impl RequestLimiter {
    /// Create a limiter admitting `max_concurrent` operations, with
    /// `min_delay` between an operation's completion and its slot release.
    pub fn new(max_concurrent: usize, min_delay: Duration) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent)),
            active: Arc::new(AtomicUsize::new(0)),
            max_concurrent,
            min_delay,
        }
    }

    /// Create a limiter from configuration values.
    pub fn from_config(config: &LimiterConfig) -> Self {
        Self::new(
            config.max_concurrent,
            Duration::from_millis(config.min_delay_ms),
        )
    }

    /// Number of operations currently holding a slot, including those in
    /// their post-completion cooldown.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Configured concurrency ceiling.
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Run `operation` under a concurrency slot.
    ///
    /// Suspends until a slot is free when `max_concurrent` operations are
    /// already active; waiting submissions resume in the order they arrived.
    pub async fn run<F: Future>(&self, operation: F) -> F::Output {
        // The semaphore is never closed, so acquisition cannot fail.
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .expect("limiter semaphore closed");
        self.active.fetch_add(1, Ordering::SeqCst);

        let output = operation.await;

        let active = Arc::clone(&self.active);
        let min_delay = self.min_delay;
        tokio::spawn(async move {
            tokio::time::sleep(min_delay).await;
            active.fetch_sub(1, Ordering::SeqCst);
            drop(permit);
        });

        output
    }
}
