use crate::SyncStatus;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One append-only ledger row; rows are never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintSyncStatus {
    pub id: Uuid,
    pub sprint_id: Uuid,
    pub status: SyncStatus,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SprintSyncStatus {
    pub fn new(sprint_id: Uuid, status: SyncStatus, message: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sprint_id,
            status,
            message,
            created_at: Utc::now(),
        }
    }
}
