#![allow(dead_code)]

use retro_core::{
    Retrospective, Sprint, SprintMember, SprintStatus, Task, TaskTrackerConfig,
    TaskTrackerProvider, TeamMember,
};
use retro_db::{
    RetrospectiveRepository, SprintMemberRepository, SprintRepository, TaskRepository,
    TeamMemberRepository,
};

use std::collections::BTreeMap;

use chrono::NaiveDate;
use sqlx::SqlitePool;
use uuid::Uuid;

pub fn jira_config() -> TaskTrackerConfig {
    TaskTrackerConfig {
        provider: TaskTrackerProvider::Jira,
        base_url: Some("https://jira.example.com".to_string()),
        project_ref: "PROJ".to_string(),
        board_ref: Some("42".to_string()),
        credentials: BTreeMap::new(),
    }
}

pub async fn insert_retrospective(pool: &SqlitePool) -> Retrospective {
    let retro = Retrospective::new("Platform team".to_string(), jira_config());
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

pub async fn insert_sprint_member(pool: &SqlitePool, sprint_id: Uuid) -> SprintMember {
    let member = TeamMember::new("Alice".to_string(), "alice@example.com".to_string(), None);
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
