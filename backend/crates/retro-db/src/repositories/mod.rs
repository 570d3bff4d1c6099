pub mod job_repository;
pub mod retrospective_repository;
pub mod sprint_member_repository;
pub mod sprint_member_task_repository;
pub mod sprint_repository;
pub mod sprint_sync_status_repository;
pub mod sprint_task_repository;
pub mod task_key_map_repository;
pub mod task_repository;
pub mod team_member_repository;
