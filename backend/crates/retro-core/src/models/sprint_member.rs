use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprintMember {
    pub id: Uuid,
    pub sprint_id: Uuid,
    pub member_id: Uuid,

    pub allocation_percent: f64,
    pub expectation_percent: f64,
    pub vacation_days: i32,
    pub rating: Option<i32>,

    // Audit
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl SprintMember {
    pub fn new(sprint_id: Uuid, member_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            sprint_id,
            member_id,
            allocation_percent: 100.0,
            expectation_percent: 100.0,
            vacation_days: 0,
            rating: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}
