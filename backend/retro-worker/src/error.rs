use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Config error: {0}")]
    Config(#[from] retro_config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] retro_db::DbError),

    #[error("Sync engine error: {0}")]
    Sync(#[from] retro_sync::SyncError),

    #[error("Failed to prepare log directory {path}: {source}")]
    LogDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Logger error: {message}")]
    Logger { message: String },
}

pub type Result<T> = std::result::Result<T, WorkerError>;
