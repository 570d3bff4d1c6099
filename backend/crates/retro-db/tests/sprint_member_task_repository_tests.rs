mod common;

use common::{create_test_pool, insert_retrospective, insert_sprint, insert_sprint_member, insert_task};

use retro_core::{SprintMemberTask, SprintStatus};
use retro_db::{SprintMemberTaskRepository, SprintTaskRepository};

use chrono::Utc;
use googletest::prelude::*;

#[tokio::test]
async fn given_member_tasks_in_two_sprints_when_loading_points_then_sprint_status_is_joined() {
    // Given
    let pool = create_test_pool().await;
    let retro = insert_retrospective(&pool).await;
    let completed = insert_sprint(&pool, retro.id, SprintStatus::Completed).await;
    let active = insert_sprint(&pool, retro.id, SprintStatus::Active).await;
    let task = insert_task(&pool, retro.id, "10001", 10.0).await;

    let mut tx = pool.begin().await.unwrap();
    let (completed_link, _) = SprintTaskRepository::ensure(&mut tx, completed.id, task.id)
        .await
        .unwrap();
    let (active_link, _) = SprintTaskRepository::ensure(&mut tx, active.id, task.id)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let alice = insert_sprint_member(&pool, completed.id).await;
    let bob = insert_sprint_member(&pool, active.id).await;
    let mut earlier = SprintMemberTask::new(alice.id, completed_link.id, 60);
    earlier.points_earned = 4.0;
    earlier.points_assigned = Some(4.0);
    SprintMemberTaskRepository::create(&pool, &earlier).await.unwrap();
    let later = SprintMemberTask::new(bob.id, active_link.id, 30);
    SprintMemberTaskRepository::create(&pool, &later).await.unwrap();

    // When
    let rows = SprintMemberTaskRepository::find_points_by_task(&pool, task.id)
        .await
        .unwrap();

    // Then
    assert_that!(rows.len(), eq(2));
    let frozen = rows.iter().find(|r| r.member_task_id == earlier.id).unwrap();
    assert_that!(frozen.sprint_status, eq(SprintStatus::Completed));
    assert_that!(frozen.points_assigned, some(eq(4.0)));
    let open = rows.iter().find(|r| r.member_task_id == later.id).unwrap();
    assert_that!(open.sprint_id, eq(active.id));
    assert_that!(open.points_assigned, none());
}

#[tokio::test]
async fn given_linked_task_when_ensured_twice_then_same_link_returned() {
    // Given
    let pool = create_test_pool().await;
    let retro = insert_retrospective(&pool).await;
    let sprint = insert_sprint(&pool, retro.id, SprintStatus::Active).await;
    let task = insert_task(&pool, retro.id, "10001", 1.0).await;

    // When
    let mut tx = pool.begin().await.unwrap();
    let (first, created_first) = SprintTaskRepository::ensure(&mut tx, sprint.id, task.id)
        .await
        .unwrap();
    let (second, created_second) = SprintTaskRepository::ensure(&mut tx, sprint.id, task.id)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    // Then
    assert_that!(second.id, eq(first.id));
    assert_that!(created_first, eq(true));
    assert_that!(created_second, eq(false));
    let uncovered = SprintTaskRepository::find_uncovered_sprint_ids(&pool, task.id)
        .await
        .unwrap();
    assert_that!(uncovered, eq(&vec![sprint.id]));
}

#[tokio::test]
async fn given_member_task_when_points_updated_then_values_persist() {
    // Given
    let pool = create_test_pool().await;
    let retro = insert_retrospective(&pool).await;
    let sprint = insert_sprint(&pool, retro.id, SprintStatus::Active).await;
    let task = insert_task(&pool, retro.id, "10001", 1.0).await;
    let mut tx = pool.begin().await.unwrap();
    let (link, _) = SprintTaskRepository::ensure(&mut tx, sprint.id, task.id)
        .await
        .unwrap();
    tx.commit().await.unwrap();
    let member = insert_sprint_member(&pool, sprint.id).await;
    let member_task = SprintMemberTask::new(member.id, link.id, 15);
    SprintMemberTaskRepository::create(&pool, &member_task).await.unwrap();

    // When
    SprintMemberTaskRepository::update_points(&pool, member_task.id, 0.75, Some(0.75), Utc::now())
        .await
        .unwrap();

    // Then
    let found = SprintMemberTaskRepository::find_by_id(&pool, member_task.id)
        .await
        .unwrap()
        .unwrap();
    assert_that!(found.points_earned, eq(0.75));
    assert_that!(found.points_assigned, some(eq(0.75)));
    assert_that!(found.time_spent_minutes, eq(15));
}
