use crate::TimeTrackerConfig;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub time_tracker_config: Option<TimeTrackerConfig>,

    // Audit
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TeamMember {
    pub fn new(name: String, email: String, time_tracker_config: Option<TimeTrackerConfig>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            time_tracker_config,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}
