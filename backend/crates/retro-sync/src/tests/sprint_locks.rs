use crate::SprintLocks;

use std::time::Duration;

use googletest::prelude::*;
use tokio::time::timeout;
use uuid::Uuid;

#[tokio::test]
async fn given_held_sprint_lock_when_same_sprint_acquired_then_it_waits() {
    // Given
    let locks = SprintLocks::new();
    let sprint_id = Uuid::new_v4();
    let _held = locks.acquire(sprint_id).await;

    // When
    let second = timeout(Duration::from_millis(50), locks.acquire(sprint_id)).await;

    // Then
    assert_that!(second.is_err(), eq(true));
}

#[tokio::test]
async fn given_held_sprint_lock_when_other_sprint_acquired_then_it_proceeds() {
    // Given
    let locks = SprintLocks::new();
    let _held = locks.acquire(Uuid::new_v4()).await;

    // When
    let other = timeout(Duration::from_millis(50), locks.acquire(Uuid::new_v4())).await;

    // Then
    assert_that!(other.is_ok(), eq(true));
}

#[tokio::test]
async fn given_released_lock_when_clone_acquires_then_it_proceeds() {
    // Given
    let locks = SprintLocks::new();
    let sprint_id = Uuid::new_v4();
    drop(locks.acquire(sprint_id).await);
    let shared = locks.clone();

    // When
    let again = timeout(Duration::from_millis(50), shared.acquire(sprint_id)).await;

    // Then
    assert_that!(again.is_ok(), eq(true));
}

#[tokio::test]
async fn given_released_locks_when_new_sprint_acquired_then_idle_entries_pruned() {
    // Given
    let locks = SprintLocks::new();
    for _ in 0..3 {
        drop(locks.acquire(Uuid::new_v4()).await);
    }
    let held_id = Uuid::new_v4();
    let _held = locks.acquire(held_id).await;

    // When
    let _fresh = locks.acquire(Uuid::new_v4()).await;

    // Then
    assert_that!(locks.tracked().await, eq(2));
}
