use crate::{CoreError, CoreResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Lifecycle of a sprint's reconciliation pass.
///
/// `Queued -> Syncing -> Synced | SyncFailed`. `NotSynced` is only reached
/// from a failed pre-check, before `Syncing` is ever entered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    NotSynced,
    Queued,
    Syncing,
    Synced,
    SyncFailed,
}

impl SyncStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::NotSynced => "not_synced",
            Self::Queued => "queued",
            Self::Syncing => "syncing",
            Self::Synced => "synced",
            Self::SyncFailed => "sync_failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::NotSynced | Self::Synced | Self::SyncFailed)
    }
}

impl FromStr for SyncStatus {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "not_synced" => Ok(Self::NotSynced),
            "queued" => Ok(Self::Queued),
            "syncing" => Ok(Self::Syncing),
            "synced" => Ok(Self::Synced),
            "sync_failed" => Ok(Self::SyncFailed),
            _ => Err(CoreError::InvalidSyncStatus {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
