pub mod external_records;
pub mod job;
pub mod provider_config;
pub mod retrospective;
pub mod sprint;
pub mod sprint_member;
pub mod sprint_member_task;
pub mod sprint_status;
pub mod sprint_sync_status;
pub mod sprint_task;
pub mod sync_status;
pub mod task;
pub mod task_key_map;
pub mod team_member;
