//! Caller-side retry with exponential backoff and jitter.
//!
//! The gateway never retries on its own. Callers that want to ride out a
//! throttle notice wrap [`MarketDataGateway::fetch`] with [`fetch_with_retry`];
//! each attempt is an independent gateway call.

use std::time::Duration;

use tracing::info;

use crate::gateway::{GatewayError, GatewayResult, MarketDataGateway};
use crate::Query;

/// Wait between consecutive attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    Fixed { delay: Duration },
    /// `base * factor^attempt`, capped at `max`. With `jitter` the result is
    /// spread uniformly over 50%..150% of that value.
    Exponential {
        base: Duration,
        factor: f64,
        max: Duration,
        jitter: bool,
    },
}

impl Default for Backoff {
    /// Tuned for the upstream free tier, whose throttle window is one minute.
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_secs(1),
            factor: 2.0,
            max: Duration::from_secs(60),
            jitter: true,
        }
    }
}

impl Backoff {
    /// Delay before retry number `attempt` (0-based).
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
                let seconds = base.as_secs_f64() * factor.powi(exponent);
                let capped_seconds = seconds.min(max.as_secs_f64());

                // Negative, NaN or unrepresentable values fall back to the cap.
                let mut delay = Duration::try_from_secs_f64(capped_seconds).unwrap_or(max);

                if jitter {
                    let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                    let spread = millis / 2;
                    let offset = fastrand::u64(0..=spread.saturating_mul(2));
                    delay = Duration::from_millis(
                        millis.saturating_sub(spread).saturating_add(offset),
                    );
                }

                delay
            }
        }
    }
}

/// Retry settings for [`fetch_with_retry`].
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt. Zero disables retrying.
    pub max_retries: u32,
    pub backoff: Backoff,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::no_retry()
    }
}

impl RetryConfig {
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            backoff: Backoff::default(),
        }
    }

    pub fn exponential(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Backoff::default(),
        }
    }

    pub fn fixed(delay: Duration, max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Backoff::Fixed { delay },
        }
    }

    pub fn should_retry(&self, error: &GatewayError, attempt: u32) -> bool {
        error.retryable() && attempt < self.max_retries
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }
}

/// Runs `gateway.fetch(query)`, retrying retryable failures per `config`.
pub async fn fetch_with_retry(
    gateway: &MarketDataGateway,
    query: &Query,
    config: &RetryConfig,
) -> GatewayResult {
    let mut attempt = 0;
    loop {
        match gateway.fetch(query).await {
            Ok(series) => return Ok(series),
            Err(error) if config.should_retry(&error, attempt) => {
                let delay = config.delay_for_attempt(attempt);
                info!(
                    code = error.code(),
                    attempt = attempt + 1,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "retrying after retryable gateway error"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}
