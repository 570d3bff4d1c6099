use crate::TaskRecord;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unit of work, unique per `(retrospective_id, tracker_unique_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub retrospective_id: Uuid,
    pub tracker_unique_id: String,

    pub summary: String,
    pub description: Option<String>,
    pub task_type: String,
    pub status: String,
    pub priority: String,
    pub assignee: Option<String>,
    pub resolution: Option<String>,

    pub estimate: f64,
    pub is_done: bool,
    /// False for stubs created from time logs the tracker could not resolve.
    pub is_tracker_task: bool,

    // Audit
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn from_record(retrospective_id: Uuid, record: &TaskRecord) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            retrospective_id,
            tracker_unique_id: record.tracker_unique_id.clone(),
            summary: record.summary.clone(),
            description: record.description.clone(),
            task_type: record.task_type.clone(),
            status: record.status.clone(),
            priority: record.priority.clone(),
            assignee: record.assignee.clone(),
            resolution: record.resolution.clone(),
            estimate: record.estimate.unwrap_or(0.0).max(0.0),
            is_done: record.resolution.is_some(),
            is_tracker_task: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Placeholder for a time-log key nobody can resolve, so logged time is never dropped.
    pub fn stub(retrospective_id: Uuid, key: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            retrospective_id,
            tracker_unique_id: key.to_string(),
            summary: String::new(),
            description: None,
            task_type: String::new(),
            status: String::new(),
            priority: String::new(),
            assignee: None,
            resolution: None,
            estimate: 0.0,
            is_done: false,
            is_tracker_task: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Copies the tracker's descriptive fields onto this task.
    ///
    /// The estimate is deliberately left alone: it only changes through the
    /// rebalancer. Returns whether anything changed.
    pub fn refresh_from_record(&mut self, record: &TaskRecord) -> bool {
        let before = self.clone();

        self.tracker_unique_id = record.tracker_unique_id.clone();
        self.summary = record.summary.clone();
        self.description = record.description.clone();
        self.task_type = record.task_type.clone();
        self.status = record.status.clone();
        self.priority = record.priority.clone();
        self.assignee = record.assignee.clone();
        self.resolution = record.resolution.clone();
        self.is_done = record.resolution.is_some();
        self.is_tracker_task = true;

        let changed = *self != before;
        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }
}
