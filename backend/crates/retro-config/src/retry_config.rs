use crate::{ConfigError, ConfigErrorResult};

use std::fmt::Display;
use std::ops::RangeInclusive;
use std::time::Duration;

use serde::Deserialize;

const MAX_ATTEMPTS_RANGE: RangeInclusive<u32> = 1..=10;
const INITIAL_DELAY_MS_RANGE: RangeInclusive<u64> = 10..=10_000;
const MAX_DELAY_SECS_RANGE: RangeInclusive<u64> = 1..=60;
const BACKOFF_MULTIPLIER_RANGE: RangeInclusive<f64> = 1.0..=10.0;

/// Backoff for provider calls that fail with a retryable error.
/// Configuration and not-found failures are never retried.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, the first call included.
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_secs: u64,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 200,
            max_delay_secs: 10,
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_secs(self.max_delay_secs)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        check_range("retry.max_attempts", self.max_attempts, MAX_ATTEMPTS_RANGE)?;
        check_range(
            "retry.initial_delay_ms",
            self.initial_delay_ms,
            INITIAL_DELAY_MS_RANGE,
        )?;
        check_range("retry.max_delay_secs", self.max_delay_secs, MAX_DELAY_SECS_RANGE)?;
        check_range(
            "retry.backoff_multiplier",
            self.backoff_multiplier,
            BACKOFF_MULTIPLIER_RANGE,
        )?;

        if self.initial_delay() > self.max_delay() {
            return Err(ConfigError::config(
                "retry.initial_delay_ms cannot exceed retry.max_delay_secs",
            ));
        }

        Ok(())
    }
}

#[track_caller]
fn check_range<T>(name: &str, value: T, range: RangeInclusive<T>) -> ConfigErrorResult<()>
where
    T: PartialOrd + Display,
{
    if range.contains(&value) {
        return Ok(());
    }
    Err(ConfigError::config(format!(
        "{} must be {}-{}, got {}",
        name,
        range.start(),
        range.end(),
        value
    )))
}
