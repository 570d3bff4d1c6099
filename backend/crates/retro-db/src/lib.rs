pub mod connection;
pub mod error;
pub mod repositories;

mod row_decode;

pub use connection::database::{connect, run_migrations};
pub use error::{DbError, Result};
pub use repositories::job_repository::{JobRecord, JobRepository};
pub use repositories::retrospective_repository::RetrospectiveRepository;
pub use repositories::sprint_member_repository::SprintMemberRepository;
pub use repositories::sprint_member_task_repository::{
    MemberTaskPoints, SprintMemberTaskRepository,
};
pub use repositories::sprint_repository::SprintRepository;
pub use repositories::sprint_sync_status_repository::SprintSyncStatusRepository;
pub use repositories::sprint_task_repository::SprintTaskRepository;
pub use repositories::task_key_map_repository::TaskKeyMapRepository;
pub use repositories::task_repository::TaskRepository;
pub use repositories::team_member_repository::TeamMemberRepository;
