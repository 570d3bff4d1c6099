pub mod error;
pub mod models;
pub mod points;

#[cfg(test)]
mod tests;

pub use error::{CoreError, Result as CoreResult};
pub use models::external_records::{TaskRecord, TimeLog};
pub use models::job::{JobStatus, SyncJob};
pub use models::provider_config::{
    EncryptedSecret, TaskTrackerConfig, TaskTrackerProvider, TimeTrackerConfig,
    TimeTrackerProvider,
};
pub use models::retrospective::Retrospective;
pub use models::sprint::{DateRange, Sprint};
pub use models::sprint_member::SprintMember;
pub use models::sprint_member_task::SprintMemberTask;
pub use models::sprint_status::SprintStatus;
pub use models::sprint_sync_status::SprintSyncStatus;
pub use models::sprint_task::SprintTask;
pub use models::sync_status::SyncStatus;
pub use models::task::Task;
pub use models::task_key_map::TaskKeyMap;
pub use models::team_member::TeamMember;

pub use error_location::ErrorLocation;
