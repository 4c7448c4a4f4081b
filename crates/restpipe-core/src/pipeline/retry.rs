//! Exponential backoff retry policy with optional jitter.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::request::HttpRequest;
use crate::response::HttpResponse;

use super::{Next, Policy};

/// Configuration for the retry policy.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of attempts, including the first try. Values below 1
    /// behave as 1.
    pub max_attempts: u32,
    /// Initial backoff delay.
    pub initial_backoff: Duration,
    /// Maximum backoff delay (caps exponential growth).
    pub max_backoff: Duration,
    /// Multiplier applied to backoff on each retry.
    pub multiplier: f64,
    /// Add `jitter_fraction * backoff / 2` extra delay (0.0 = no jitter).
    pub jitter_fraction: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            multiplier: 2.0,
            jitter_fraction: 0.1,
        }
    }
}

/// Retries transient failures by re-entering the chain from its own position.
///
/// Only errors classified retryable by [`Error::is_retryable`] are retried;
/// validation and cancellation errors pass straight through. Between
/// attempts the policy observes the request's cancellation token and
/// deadline, so a cancelled request skips its pending retry and surfaces
/// [`Error::Cancelled`] instead. Each failed attempt is logged; only the
/// final outcome reaches the caller.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Returns the delay before the retry following the `attempt`-th failure
    /// (1-based). Returns `None` once no attempts remain.
    fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.config.max_attempts {
            return None;
        }
        let base_ms = self.config.initial_backoff.as_millis() as f64
            * self.config.multiplier.powi(attempt.saturating_sub(1) as i32);
        let cap_ms = self.config.max_backoff.as_millis() as f64;
        let capped = base_ms.min(cap_ms);

        // Deterministic pseudo-jitter: half the configured fraction.
        let jitter_ms = capped * self.config.jitter_fraction * 0.5;
        let total_ms = (capped + jitter_ms) as u64;

        Some(Duration::from_millis(total_ms))
    }
}

#[async_trait]
impl Policy for RetryPolicy {
    async fn send(&self, request: &mut HttpRequest, next: Next<'_>) -> Result<HttpResponse> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match next.run(request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() => match self.next_delay(attempt) {
                    Some(delay) => {
                        if request.context().is_cancelled() {
                            return Err(Error::cancelled(request));
                        }
                        tracing::warn!(
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            url = request.url(),
                            "retrying request"
                        );
                        tokio::time::sleep(delay).await;
                        if request.context().is_cancelled() {
                            return Err(Error::cancelled(request));
                        }
                    }
                    None => {
                        tracing::error!(
                            attempt,
                            error = %e,
                            url = request.url(),
                            "retry attempts exhausted"
                        );
                        return Err(e);
                    }
                },
                Err(e) => return Err(e),
            }
        }
    }
}
