use crate::SyncError;

use retro_config::RetryConfig;

use std::time::Duration;

use tokio::time::sleep;

pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for SyncError {
    fn is_retryable(&self) -> bool {
        SyncError::is_retryable(self)
    }
}

/// Runs `operation` until it succeeds, fails with a non-retryable error, or
/// `config.max_attempts` is reached. Delays grow by `backoff_multiplier`
/// up to `max_delay`, with optional 0.5x-1.5x jitter.
pub async fn with_retry<F, Fut, T, E>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display + IsRetryable,
{
    let mut attempt = 0;
    let mut delay = config.initial_delay();

    loop {
        attempt += 1;

        let error = match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    log::info!("{} succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(value);
            }
            Err(e) => e,
        };

        if !error.is_retryable() || attempt >= config.max_attempts {
            log::warn!(
                "{} gave up after {} attempt(s): {}",
                operation_name,
                attempt,
                error
            );
            return Err(error);
        }

        let wait = if config.jitter {
            delay.mul_f64(0.5 + rand::random::<f64>())
        } else {
            delay
        };
        log::debug!(
            "{} attempt {} failed: {}. Retrying in {:?}",
            operation_name,
            attempt,
            error,
            wait
        );
        sleep(wait).await;

        delay = next_delay(delay, config);
    }
}

fn next_delay(current: Duration, config: &RetryConfig) -> Duration {
    current
        .mul_f64(config.backoff_multiplier)
        .min(config.max_delay())
}
