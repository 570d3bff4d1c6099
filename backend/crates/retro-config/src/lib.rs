mod config;
mod database_config;
mod error;
mod log_level;
mod logging_config;
mod retry_config;
mod sync_config;
mod worker_config;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use database_config::DatabaseConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use retry_config::RetryConfig;
pub use sync_config::SyncConfig;
pub use worker_config::WorkerConfig;

pub const CONFIG_DIR_ENV: &str = "RETRO_CONFIG_DIR";
const DEFAULT_CONFIG_DIR_NAME: &str = ".retro";
const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_DATABASE_FILENAME: &str = "retro.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const MIN_MAX_CONNECTIONS: u32 = 1;
const MAX_MAX_CONNECTIONS: u32 = 100;

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";

const DEFAULT_INCLUDE_COMPLETED_SPRINTS: bool = true;

const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
const MIN_POLL_INTERVAL_MS: u64 = 50;
const MAX_POLL_INTERVAL_MS: u64 = 60_000;
const DEFAULT_MAX_CONCURRENT_JOBS: usize = 4;
const MIN_MAX_CONCURRENT_JOBS: usize = 1;
const MAX_MAX_CONCURRENT_JOBS: usize = 64;
