use crate::TaskTrackerConfig;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Retrospective {
    pub id: Uuid,
    pub name: String,

    /// Exactly one tracker configuration per retrospective; secrets stay encrypted.
    pub task_tracker_config: TaskTrackerConfig,

    // Audit
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Retrospective {
    pub fn new(name: String, task_tracker_config: TaskTrackerConfig) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            task_tracker_config,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}
