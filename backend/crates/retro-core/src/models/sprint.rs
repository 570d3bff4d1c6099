use crate::{SprintStatus, SyncStatus};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprint {
    pub id: Uuid,
    pub retrospective_id: Uuid,

    pub title: String,
    /// Sprint identifier on the task tracker side (board sprint id).
    pub external_ref: Option<String>,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    pub status: SprintStatus,
    pub sync_status: SyncStatus,
    pub last_synced_at: Option<DateTime<Utc>>,

    // Audit
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Inclusive date window used for tracker queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Sprint {
    pub fn new(retrospective_id: Uuid, title: String, status: SprintStatus) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            retrospective_id,
            title,
            external_ref: None,
            start_date: None,
            end_date: None,
            status,
            sync_status: SyncStatus::NotSynced,
            last_synced_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Both dates are required before the sprint can be reconciled.
    pub fn date_range(&self) -> Option<DateRange> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(DateRange { start, end }),
            _ => None,
        }
    }

    /// Start date an Active sprint must have when it follows `previous`.
    pub fn start_date_after(previous: &Sprint) -> Option<NaiveDate> {
        previous.end_date.and_then(|end| end.succ_opt())
    }
}
