use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A member's contribution to a task inside one sprint.
///
/// `time_spent_minutes` is owned by time-log reconciliation. `points_earned`
/// and `points_assigned` are only written by the allocator and rebalancer.
/// `points_assigned` is `None` until the allocator has run for the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintMemberTask {
    pub id: Uuid,
    pub sprint_member_id: Uuid,
    pub sprint_task_id: Uuid,

    pub time_spent_minutes: i64,
    pub points_earned: f64,
    pub points_assigned: Option<f64>,
    pub rating: Option<i32>,

    // Audit
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl SprintMemberTask {
    pub fn new(sprint_member_id: Uuid, sprint_task_id: Uuid, time_spent_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            sprint_member_id,
            sprint_task_id,
            time_spent_minutes,
            points_earned: 0.0,
            points_assigned: None,
            rating: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}
