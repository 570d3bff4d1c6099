use serde::{Deserialize, Serialize};

/// A ticket as reported by the task tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub external_key: String,
    pub tracker_unique_id: String,
    pub summary: String,
    pub description: Option<String>,
    pub task_type: String,
    pub priority: String,
    pub assignee: Option<String>,
    pub status: String,
    pub resolution: Option<String>,
    pub estimate: Option<f64>,
}

/// A time entry pulled from the time tracker. Never persisted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLog {
    pub task_key: String,
    pub minutes: i64,
    pub logged_by: Option<String>,
}
