use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_MAX_CONCURRENT_JOBS, DEFAULT_POLL_INTERVAL_MS,
    MAX_MAX_CONCURRENT_JOBS, MAX_POLL_INTERVAL_MS, MIN_MAX_CONCURRENT_JOBS, MIN_POLL_INTERVAL_MS,
};

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Sleep between queue polls when the queue is empty.
    pub poll_interval_ms: u64,
    pub max_concurrent_jobs: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_concurrent_jobs: DEFAULT_MAX_CONCURRENT_JOBS,
        }
    }
}

impl WorkerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.poll_interval_ms < MIN_POLL_INTERVAL_MS
            || self.poll_interval_ms > MAX_POLL_INTERVAL_MS
        {
            return Err(ConfigError::worker(format!(
                "worker.poll_interval_ms must be {}-{}, got {}",
                MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS, self.poll_interval_ms
            )));
        }

        if self.max_concurrent_jobs < MIN_MAX_CONCURRENT_JOBS
            || self.max_concurrent_jobs > MAX_MAX_CONCURRENT_JOBS
        {
            return Err(ConfigError::worker(format!(
                "worker.max_concurrent_jobs must be {}-{}, got {}",
                MIN_MAX_CONCURRENT_JOBS, MAX_MAX_CONCURRENT_JOBS, self.max_concurrent_jobs
            )));
        }

        Ok(())
    }
}
