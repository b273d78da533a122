//! Capped exponential backoff for transient Gateway errors.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::GatewayError;

/// Backoff strategy between retry attempts.
#[derive(Debug, Clone, Copy)]
pub enum BackoffStrategy {
    Fixed { delay_ms: u64 },
    Exponential { base_ms: u64, multiplier: f64, max_delay_ms: u64 },
    Linear { base_ms: u64, increment_ms: u64 },
}

impl BackoffStrategy {
    fn calculate_delay(&self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay_ms } => Duration::from_millis(*delay_ms),
            Self::Exponential { base_ms, multiplier, max_delay_ms } => {
                let delay = (*base_ms as f64) * multiplier.powi(attempt as i32);
                Duration::from_millis(delay.min(*max_delay_ms as f64) as u64)
            }
            Self::Linear { base_ms, increment_ms } => Duration::from_millis(base_ms + increment_ms * u64::from(attempt)),
        }
    }

    /// Delay with +/-25% jitter to avoid synchronised retry storms.
    fn with_jitter(&self, attempt: u32) -> Duration {
        let base = self.calculate_delay(attempt).as_millis() as u64;
        let jitter_range = (base / 4).max(1);
        let jitter = rand::random::<u64>() % (jitter_range * 2);
        Duration::from_millis(base + jitter - jitter_range)
    }
}

/// Retries a fallible async operation up to `max_retries` times, honouring
/// each error's `is_retryable()` verdict.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: BackoffStrategy,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    /// Capped exponential backoff, max 3 attempts.
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: BackoffStrategy::Exponential { base_ms: 200, multiplier: 2.0, max_delay_ms: 5_000 },
            jitter: true,
        }
    }
}

impl RetryPolicy {
    pub async fn execute<F, Fut, T>(&self, mut f: F) -> Result<T, GatewayError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GatewayError>>,
    {
        let mut attempt = 0;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = if self.jitter {
                        self.backoff.with_jitter(attempt - 1)
                    } else {
                        self.backoff.calculate_delay(attempt - 1)
                    };
                    warn!(attempt, delay_ms = delay.as_millis(), error = %err, "retrying gateway call");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    debug!(error = %err, "gateway call exhausted retries or failed permanently");
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn retries_transient_errors_up_to_the_cap() {
        let policy = RetryPolicy {
            max_retries: 3,
            backoff: BackoffStrategy::Fixed { delay_ms: 1 },
            jitter: false,
        };
        let calls = AtomicU32::new(0);
        let result: Result<(), GatewayError> = policy
            .execute(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(GatewayError::Transient("boom".into())) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 4); // initial attempt + 3 retries
    }

    #[tokio::test]
    async fn does_not_retry_permanent_errors() {
        let policy = RetryPolicy { max_retries: 3, backoff: BackoffStrategy::Fixed { delay_ms: 1 }, jitter: false };
        let calls = AtomicU32::new(0);
        let result: Result<(), GatewayError> = policy
            .execute(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(GatewayError::Permanent("nope".into())) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn succeeds_after_a_transient_failure() {
        let policy = RetryPolicy { max_retries: 3, backoff: BackoffStrategy::Fixed { delay_ms: 1 }, jitter: false };
        let calls = AtomicU32::new(0);
        let result = policy
            .execute(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { if n == 0 { Err(GatewayError::Transient("flaky".into())) } else { Ok(42) } }
            })
            .await;
        assert_eq!(result.unwrap(), 42);
    }
}
