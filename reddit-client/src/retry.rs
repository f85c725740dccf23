use mentionlens_core::{CoreError, ErrorExt, RedditApiError};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first)
    pub max_attempts: u32,
    /// Base delay for exponential backoff (in milliseconds)
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds)
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Maximum jitter factor (0.0 to 1.0)
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

impl RetryConfig {
    /// Retry config tuned for the Reddit API
    pub fn reddit() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 2000,
            max_delay_ms: 60000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.2, // Jitter to prevent thundering herd
        }
    }

    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exp = self.base_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32 - 1);
        let capped = exp.min(self.max_delay_ms as f64);
        let jitter = capped * self.jitter_factor * fastrand::f64();
        Duration::from_millis((capped + jitter) as u64)
    }
}

/// Run `operation` until it succeeds, the error is non-retryable, or the
/// attempt budget is exhausted. Rate-limit errors override the backoff delay
/// with the server-provided retry-after.
pub async fn with_retry<T, F, Fut>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T, CoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CoreError>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if !error.is_retryable() || attempt >= config.max_attempts {
                    return Err(error);
                }

                // Rate limits carry a server-mandated delay; everything else
                // follows the backoff schedule.
                let delay = match &error {
                    CoreError::RedditApi(RedditApiError::RateLimitExceeded { retry_after }) => {
                        Duration::from_secs(*retry_after)
                    }
                    _ => config.delay_for_attempt(attempt),
                };
                warn!(
                    "{} failed (attempt {}/{}): {}. Retrying in {:?}",
                    operation_name, attempt, config.max_attempts, error, delay
                );
                sleep(delay).await;
                attempt += 1;
                debug!("Retrying {} (attempt {})", operation_name, attempt);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentionlens_core::RedditApiError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            base_delay_ms: 1,
            max_delay_ms: 5,
            backoff_multiplier: 2.0,
            jitter_factor: 0.0,
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failure() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&fast_config(), "test op", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(CoreError::RedditApi(RedditApiError::ServerError {
                        status_code: 502,
                    }))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_does_not_retry_permanent_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&fast_config(), "test op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(CoreError::RedditApi(RedditApiError::InvalidToken)) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_attempt_budget_exhausted() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&fast_config(), "test op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(CoreError::RedditApi(RedditApiError::ServerError {
                    status_code: 503,
                }))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_backoff_delay_is_capped() {
        let config = RetryConfig {
            max_attempts: 10,
            base_delay_ms: 1000,
            max_delay_ms: 4000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.0,
        };
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(2000));
        assert_eq!(config.delay_for_attempt(5), Duration::from_millis(4000));
    }
}
