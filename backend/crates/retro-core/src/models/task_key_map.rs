use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Alias from an external key string to a task. A task may own many keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskKeyMap {
    pub id: Uuid,
    pub task_id: Uuid,
    pub key: String,
    pub created_at: DateTime<Utc>,
}

impl TaskKeyMap {
    pub fn new(task_id: Uuid, key: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id,
            key,
            created_at: Utc::now(),
        }
    }
}
