//! Outbound request pacing and retry for the market-data API
//!
//! One `RateLimiter` instance is owned by the API client, so every endpoint
//! funnels through the same gate and independent clients (tests) do not
//! interfere with each other. The gate is a semaphore of one plus the last
//! dispatch instant: callers are serialized and spaced by `min_interval`.
use crate::errors::ApiError;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};

pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
    last_request: Arc<Mutex<Option<Instant>>>,
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(1)), // only 1 concurrent request
            last_request: Arc::new(Mutex::new(None)),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait until a request may be dispatched
    pub async fn acquire(&self) -> Result<RateLimitGuard, ApiError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| ApiError::Network(format!("rate limiter closed: {}", e)))?;

        if !self.min_interval.is_zero() {
            let mut last = self.last_request.lock().await;
            let now = Instant::now();

            if let Some(last_time) = *last {
                let elapsed = last_time.elapsed();
                if elapsed < self.min_interval {
                    let sleep_duration = self.min_interval - elapsed;
                    drop(last);
                    tokio::time::sleep(sleep_duration).await;
                    let mut last_relocked = self.last_request.lock().await;
                    *last_relocked = Some(Instant::now());
                } else {
                    *last = Some(now);
                }
            } else {
                *last = Some(now);
            }
        }

        Ok(RateLimitGuard { _permit: permit })
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// RAII guard returned by [`RateLimiter::acquire`]
pub struct RateLimitGuard {
    _permit: OwnedSemaphorePermit,
}

/// Exponential-backoff retry for transient failures
///
/// Attempt `n` (0-based) waits `base_delay * 2^n` before the next attempt.
/// Non-retryable errors (NotFound, 4xx) surface immediately; after the last
/// attempt the final error surfaces to the caller.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let attempts = self.max_retries.max(1);
        let mut last_err = None;

        for attempt in 0..attempts {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if !err.is_retryable() {
                        return Err(err);
                    }
                    if attempt + 1 < attempts {
                        let delay = self.base_delay * 2u32.pow(attempt);
                        tokio::time::sleep(delay).await;
                    }
                    last_err = Some(err);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| ApiError::Network("retry exhausted".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn back_to_back_calls_are_paced() {
        let limiter = RateLimiter::new(100);

        let start = Instant::now();
        for _ in 0..4 {
            limiter.acquire().await.unwrap();
        }

        // 4 calls must span at least 3 full intervals
        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test]
    async fn first_call_is_immediate() {
        let limiter = RateLimiter::new(500);

        let start = Instant::now();
        limiter.acquire().await.unwrap();
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn retry_succeeds_after_transient_failures_with_backoff() {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(50),
        };
        let calls = AtomicU32::new(0);

        let start = Instant::now();
        let result = policy
            .run(|| {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 2 {
                        Err(ApiError::Network("connection reset".to_string()))
                    } else {
                        Ok(42u32)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // cumulative backoff: base + 2*base
        assert!(start.elapsed() >= Duration::from_millis(150));
    }

    #[tokio::test]
    async fn exhausted_retries_surface_the_last_error() {
        let policy = RetryPolicy {
            max_retries: 2,
            base_delay: Duration::from_millis(10),
        };
        let calls = AtomicU32::new(0);

        let result: Result<(), ApiError> = policy
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ApiError::Timeout) }
            })
            .await;

        assert!(matches!(result, Err(ApiError::Timeout)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn not_found_is_not_retried() {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(10),
        };
        let calls = AtomicU32::new(0);

        let result: Result<(), ApiError> = policy
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ApiError::NotFound) }
            })
            .await;

        assert!(matches!(result, Err(ApiError::NotFound)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
