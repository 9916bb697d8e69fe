//! Deterministic exponential backoff.

use std::time::Duration;

/// Calculate the delay before the retry that follows attempt `attempt` (0-based).
///
/// Grows as `initial * multiplier^attempt`, capped at `max`.
pub fn calculate_delay(attempt: u32, initial: Duration, multiplier: f64, max: Duration) -> Duration {
    let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
    let exact_ms = initial.as_millis() as f64 * multiplier.powi(exponent);
    let capped_ms = exact_ms.min(max.as_millis() as f64);

    Duration::from_millis(capped_ms as u64)
}
