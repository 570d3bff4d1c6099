use retro_core::CoreError;
use retro_db::DbError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    /// Missing sprint dates, unusable provider config, unknown provider.
    /// Retrying will not help until someone fixes the data.
    #[error("Configuration error: {message} {location}")]
    Configuration {
        message: String,
        location: ErrorLocation,
    },

    #[error("{service} call failed: {message} {location}")]
    ExternalService {
        service: &'static str,
        message: String,
        retryable: bool,
        location: ErrorLocation,
    },

    #[error("Database error: {source}")]
    Database {
        #[source]
        source: DbError,
        location: ErrorLocation,
    },

    #[error("{entity} not found: {id} {location}")]
    NotFound {
        entity: &'static str,
        id: String,
        location: ErrorLocation,
    },

    #[error("Domain error: {source}")]
    Core {
        #[source]
        source: CoreError,
        location: ErrorLocation,
    },
}

impl SyncError {
    #[track_caller]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// A provider failure that may succeed on a later attempt (timeouts,
    /// rate limits, 5xx).
    #[track_caller]
    pub fn transient<S: Into<String>>(service: &'static str, message: S) -> Self {
        Self::ExternalService {
            service,
            message: message.into(),
            retryable: true,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn external<S: Into<String>>(service: &'static str, message: S) -> Self {
        Self::ExternalService {
            service,
            message: message.into(),
            retryable: false,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ExternalService { retryable: true, .. })
    }
}

impl From<DbError> for SyncError {
    #[track_caller]
    fn from(source: DbError) -> Self {
        Self::Database {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<sqlx::Error> for SyncError {
    #[track_caller]
    fn from(source: sqlx::Error) -> Self {
        Self::Database {
            source: DbError::from(source),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CoreError> for SyncError {
    #[track_caller]
    fn from(source: CoreError) -> Self {
        match source {
            CoreError::InvalidProviderConfig { message, location } => {
                Self::Configuration { message, location }
            }
            other => Self::Core {
                source: other,
                location: ErrorLocation::from(Location::caller()),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
