use crate::{CoreError, CoreResult};

use std::collections::BTreeMap;
use std::fmt;
use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Ciphertext of a credential field. Decryption belongs to a `CredentialCipher`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptedSecret(pub String);

impl fmt::Debug for EncryptedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptedSecret(***)")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskTrackerProvider {
    Jira,
    Linear,
    YouTrack,
}

impl TaskTrackerProvider {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Jira => "jira",
            Self::Linear => "linear",
            Self::YouTrack => "you_track",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TimeTrackerProvider {
    Toggl,
    Clockify,
    Harvest,
}

impl TimeTrackerProvider {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Toggl => "toggl",
            Self::Clockify => "clockify",
            Self::Harvest => "harvest",
        }
    }
}

/// Per-retrospective task tracker settings, resolved once into a typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskTrackerConfig {
    pub provider: TaskTrackerProvider,
    #[serde(default)]
    pub base_url: Option<String>,
    pub project_ref: String,
    #[serde(default)]
    pub board_ref: Option<String>,
    #[serde(default)]
    pub credentials: BTreeMap<String, EncryptedSecret>,
}

/// Per-member time tracker settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeTrackerConfig {
    pub provider: TimeTrackerProvider,
    pub project: String,
    /// Identity of the member on the time tracker; logs by others are ignored.
    #[serde(default)]
    pub user_ref: Option<String>,
    #[serde(default)]
    pub credentials: BTreeMap<String, EncryptedSecret>,
}

impl TaskTrackerConfig {
    #[track_caller]
    pub fn from_json(raw: &str) -> CoreResult<Self> {
        let config: Self = serde_json::from_str(raw).map_err(|e| invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    #[track_caller]
    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string(self).map_err(|e| invalid_config(e.to_string()))
    }

    #[track_caller]
    pub fn validate(&self) -> CoreResult<()> {
        if self.project_ref.trim().is_empty() {
            return Err(invalid_config(format!(
                "{} config has an empty project_ref",
                self.provider.as_str()
            )));
        }
        Ok(())
    }
}

impl TimeTrackerConfig {
    #[track_caller]
    pub fn from_json(raw: &str) -> CoreResult<Self> {
        let config: Self = serde_json::from_str(raw).map_err(|e| invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    #[track_caller]
    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string(self).map_err(|e| invalid_config(e.to_string()))
    }

    #[track_caller]
    pub fn validate(&self) -> CoreResult<()> {
        if self.project.trim().is_empty() {
            return Err(invalid_config(format!(
                "{} config has an empty project",
                self.provider.as_str()
            )));
        }
        Ok(())
    }
}

#[track_caller]
fn invalid_config(message: String) -> CoreError {
    CoreError::InvalidProviderConfig {
        message,
        location: ErrorLocation::from(Location::caller()),
    }
}
