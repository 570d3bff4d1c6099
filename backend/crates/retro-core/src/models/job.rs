use crate::{CoreError, CoreResult};

use std::collections::BTreeMap;
use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const SYNC_SPRINT_JOB: &str = "sync_sprint";
pub const SYNC_SPRINT_MEMBER_JOB: &str = "sync_sprint_member";
pub const ASSIGN_POINTS_JOB: &str = "assign_points";

/// Unit of background work. `(job_name, args)` is the deduplication key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncJob {
    SyncSprint { sprint_id: Uuid },
    SyncSprintMember { sprint_member_id: Uuid },
    AssignPoints { sprint_id: Uuid },
}

impl SyncJob {
    pub fn job_name(&self) -> &'static str {
        match self {
            Self::SyncSprint { .. } => SYNC_SPRINT_JOB,
            Self::SyncSprintMember { .. } => SYNC_SPRINT_MEMBER_JOB,
            Self::AssignPoints { .. } => ASSIGN_POINTS_JOB,
        }
    }

    pub fn args(&self) -> BTreeMap<String, String> {
        let mut args = BTreeMap::new();
        match self {
            Self::SyncSprint { sprint_id } | Self::AssignPoints { sprint_id } => {
                args.insert("sprint_id".to_string(), sprint_id.to_string());
            }
            Self::SyncSprintMember { sprint_member_id } => {
                args.insert("sprint_member_id".to_string(), sprint_member_id.to_string());
            }
        }
        args
    }

    /// Canonical argument encoding; `BTreeMap` keeps keys ordered so equal
    /// argument sets always produce the same string.
    pub fn args_key(&self) -> String {
        self.args()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    #[track_caller]
    pub fn from_parts(job_name: &str, args: &BTreeMap<String, String>) -> CoreResult<Self> {
        let uuid_arg = |name: &str| -> CoreResult<Uuid> {
            let raw = args.get(name).ok_or_else(|| CoreError::Validation {
                message: format!("job {} is missing argument {}", job_name, name),
                field: Some(name.to_string()),
                location: ErrorLocation::from(Location::caller()),
            })?;
            Uuid::parse_str(raw).map_err(|_| CoreError::Validation {
                message: format!("Invalid UUID for {}: {}", name, raw),
                field: Some(name.to_string()),
                location: ErrorLocation::from(Location::caller()),
            })
        };

        match job_name {
            SYNC_SPRINT_JOB => Ok(Self::SyncSprint {
                sprint_id: uuid_arg("sprint_id")?,
            }),
            SYNC_SPRINT_MEMBER_JOB => Ok(Self::SyncSprintMember {
                sprint_member_id: uuid_arg("sprint_member_id")?,
            }),
            ASSIGN_POINTS_JOB => Ok(Self::AssignPoints {
                sprint_id: uuid_arg("sprint_id")?,
            }),
            other => Err(CoreError::Validation {
                message: format!("Unknown job name: {}", other),
                field: Some("job_name".to_string()),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Done,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for JobStatus {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "queued" => Ok(Self::Queued),
            "running" => Ok(Self::Running),
            "done" => Ok(Self::Done),
            "failed" => Ok(Self::Failed),
            _ => Err(CoreError::InvalidJobStatus {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
