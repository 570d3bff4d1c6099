use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {message} {location}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("Invalid sprint status: {value} {location}")]
    InvalidSprintStatus {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid sync status: {value} {location}")]
    InvalidSyncStatus {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid job status: {value} {location}")]
    InvalidJobStatus {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid provider config: {message} {location}")]
    InvalidProviderConfig {
        message: String,
        location: ErrorLocation,
    },
}

pub type Result<T> = StdResult<T, CoreError>;
