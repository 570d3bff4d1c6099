#![allow(dead_code)]

use super::{FakeTaskTracker, FakeTaskTrackerFactory, FakeTimeTracker, FakeTimeTrackerFactory};

use retro_config::{RetryConfig, SyncConfig};
use retro_core::{
    Retrospective, Sprint, SprintMember, SprintMemberTask, SprintStatus, SprintTask, Task,
    TaskRecord, TaskTrackerConfig, TaskTrackerProvider, TeamMember, TimeLog, TimeTrackerConfig,
    TimeTrackerProvider,
};
use retro_db::{
    RetrospectiveRepository, SprintMemberRepository, SprintMemberTaskRepository, SprintRepository,
    SprintTaskRepository, TaskRepository, TeamMemberRepository,
};
use retro_sync::{PlaintextCipher, ProviderRegistry, SyncEngine};

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::SqlitePool;
use uuid::Uuid;

pub struct TestEngine {
    pub pool: SqlitePool,
    pub engine: SyncEngine,
    pub task_tracker: Arc<FakeTaskTracker>,
    pub time_tracker: Arc<FakeTimeTracker>,
}

/// Fast retries so transient-failure tests do not sleep.
pub fn test_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        initial_delay_ms: 1,
        max_delay_secs: 1,
        backoff_multiplier: 1.0,
        jitter: false,
    }
}

pub fn build_engine(pool: &SqlitePool, include_completed_sprints: bool) -> TestEngine {
    let task_tracker = FakeTaskTracker::new();
    let time_tracker = FakeTimeTracker::new();

    let mut registry = ProviderRegistry::new();
    registry
        .register_task_tracker(
            TaskTrackerProvider::Jira,
            Arc::new(FakeTaskTrackerFactory(task_tracker.clone())),
        )
        .register_time_tracker(
            TimeTrackerProvider::Toggl,
            Arc::new(FakeTimeTrackerFactory(time_tracker.clone())),
        );

    let engine = SyncEngine::new(
        pool.clone(),
        registry,
        Arc::new(PlaintextCipher),
        &SyncConfig {
            include_completed_sprints,
        },
        test_retry(),
    );

    TestEngine {
        pool: pool.clone(),
        engine,
        task_tracker,
        time_tracker,
    }
}

pub fn jira_config() -> TaskTrackerConfig {
    TaskTrackerConfig {
        provider: TaskTrackerProvider::Jira,
        base_url: Some("https://jira.example.com".to_string()),
        project_ref: "PROJ".to_string(),
        board_ref: Some("42".to_string()),
        credentials: BTreeMap::new(),
    }
}

pub fn toggl_config(user_ref: &str) -> TimeTrackerConfig {
    TimeTrackerConfig {
        provider: TimeTrackerProvider::Toggl,
        project: "PROJ".to_string(),
        user_ref: Some(user_ref.to_string()),
        credentials: BTreeMap::new(),
    }
}

pub async fn insert_retrospective(pool: &SqlitePool) -> Retrospective {
    insert_retrospective_with(pool, jira_config()).await
}

pub async fn insert_retrospective_with(
    pool: &SqlitePool,
    config: TaskTrackerConfig,
) -> Retrospective {
    let retro = Retrospective::new("Platform team".to_string(), config);
    RetrospectiveRepository::create(pool, &retro).await.unwrap();
    retro
}

pub fn test_sprint(retrospective_id: Uuid, status: SprintStatus) -> Sprint {
    let mut sprint = Sprint::new(retrospective_id, "Sprint 1".to_string(), status);
    sprint.external_ref = Some("101".to_string());
    sprint.start_date = NaiveDate::from_ymd_opt(2026, 3, 2);
    sprint.end_date = NaiveDate::from_ymd_opt(2026, 3, 13);
    sprint
}

pub async fn insert_sprint(pool: &SqlitePool, retrospective_id: Uuid, status: SprintStatus) -> Sprint {
    let sprint = test_sprint(retrospective_id, status);
    SprintRepository::create(pool, &sprint).await.unwrap();
    sprint
}

/// Sprint member whose team member logs time on Toggl as `user_ref`.
pub async fn insert_tracked_member(
    pool: &SqlitePool,
    sprint_id: Uuid,
    name: &str,
    user_ref: &str,
) -> SprintMember {
    insert_member(pool, sprint_id, name, Some(toggl_config(user_ref))).await
}

pub async fn insert_member(
    pool: &SqlitePool,
    sprint_id: Uuid,
    name: &str,
    time_tracker_config: Option<TimeTrackerConfig>,
) -> SprintMember {
    let member = TeamMember::new(
        name.to_string(),
        format!("{}@example.com", name.to_lowercase()),
        time_tracker_config,
    );
    TeamMemberRepository::create(pool, &member).await.unwrap();

    let sprint_member = SprintMember::new(sprint_id, member.id);
    SprintMemberRepository::create(pool, &sprint_member)
        .await
        .unwrap();
    sprint_member
}

pub async fn insert_task(pool: &SqlitePool, retrospective_id: Uuid, tracker_id: &str, estimate: f64) -> Task {
    let mut task = Task::stub(retrospective_id, tracker_id);
    task.summary = format!("Task {}", tracker_id);
    task.is_tracker_task = true;
    task.estimate = estimate;
    TaskRepository::create(pool, &task).await.unwrap();
    task
}

pub async fn link_task(pool: &SqlitePool, sprint_id: Uuid, task_id: Uuid) -> SprintTask {
    let mut tx = pool.begin().await.unwrap();
    let (link, _) = SprintTaskRepository::ensure(&mut tx, sprint_id, task_id)
        .await
        .unwrap();
    tx.commit().await.unwrap();
    link
}

pub async fn insert_member_task(
    pool: &SqlitePool,
    sprint_member_id: Uuid,
    sprint_task_id: Uuid,
    minutes: i64,
    earned: f64,
    assigned: Option<f64>,
) -> SprintMemberTask {
    let mut row = SprintMemberTask::new(sprint_member_id, sprint_task_id, minutes);
    row.points_earned = earned;
    row.points_assigned = assigned;
    SprintMemberTaskRepository::create(pool, &row).await.unwrap();
    row
}

pub async fn member_task(pool: &SqlitePool, id: Uuid) -> SprintMemberTask {
    SprintMemberTaskRepository::find_by_id(pool, id)
        .await
        .unwrap()
        .unwrap()
}

pub fn record(key: &str, tracker_id: &str, estimate: Option<f64>) -> TaskRecord {
    TaskRecord {
        external_key: key.to_string(),
        tracker_unique_id: tracker_id.to_string(),
        summary: format!("Summary of {}", key),
        description: None,
        task_type: "Story".to_string(),
        priority: "Medium".to_string(),
        assignee: Some("alice".to_string()),
        status: "In Progress".to_string(),
        resolution: None,
        estimate,
    }
}

pub fn time_log(key: &str, minutes: i64, logged_by: &str) -> TimeLog {
    TimeLog {
        task_key: key.to_string(),
        minutes,
        logged_by: Some(logged_by.to_string()),
    }
}
