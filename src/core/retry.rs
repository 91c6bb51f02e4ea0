//! Bounded retry with exponential backoff
//!
//! Shared by the indexer (per-frame embedding and store writes) and the
//! search service (query-time store reads). Retries are always bounded;
//! exhaustion fails the single frame or request, never the whole batch.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry policy with exponential backoff and jitter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Base delay for exponential backoff (milliseconds)
    pub base_delay_ms: u64,
    /// Maximum delay cap (milliseconds)
    pub max_delay_ms: u64,
    /// Whether to apply ±25% jitter
    pub use_jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 250,
            max_delay_ms: 4000,
            use_jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Check whether another attempt should be made
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    /// Delay before the given retry attempt (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let delay = self.delay_for_with_jitter(attempt, rand::random::<f64>());
        Duration::from_millis(delay)
    }

    /// Delay calculation with an explicit jitter value (for testing)
    ///
    /// `jitter_random` must be in [0, 1]; the resulting factor spans
    /// 0.75..=1.25.
    pub fn delay_for_with_jitter(&self, attempt: u32, jitter_random: f64) -> u64 {
        let multiplier = 1u64 << attempt.min(10);
        let capped = self
            .base_delay_ms
            .saturating_mul(multiplier)
            .min(self.max_delay_ms);

        if self.use_jitter {
            let factor = 0.75 + jitter_random * 0.5;
            (capped as f64 * factor) as u64
        } else {
            capped
        }
    }
}

/// Run an async operation with bounded retries
///
/// `is_retryable` decides per error whether another attempt makes
/// sense; non-retryable errors are returned immediately.
pub async fn with_retry<T, E, F, Fut, R>(
    policy: &RetryPolicy,
    is_retryable: R,
    mut op: F,
) -> std::result::Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = std::result::Result<T, E>>,
    E: std::fmt::Display,
    R: Fn(&E) -> bool,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retryable(&err) || !policy.should_retry(attempt) {
                    return Err(err);
                }
                let delay = policy.delay_for(attempt);
                tracing::debug!(
                    "Retryable failure (attempt {}): {}; retrying in {:?}",
                    attempt + 1,
                    err,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
