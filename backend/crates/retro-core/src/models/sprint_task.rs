use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprintTask {
    pub id: Uuid,
    pub sprint_id: Uuid,
    pub task_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl SprintTask {
    pub fn new(sprint_id: Uuid, task_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            sprint_id,
            task_id,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }
}
