use crate::{Task, TaskRecord};

use googletest::prelude::*;
use uuid::Uuid;

fn record() -> TaskRecord {
    TaskRecord {
        external_key: "PROJ-1".to_string(),
        tracker_unique_id: "10001".to_string(),
        summary: "Login page".to_string(),
        description: None,
        task_type: "story".to_string(),
        priority: "high".to_string(),
        assignee: Some("alice".to_string()),
        status: "in_progress".to_string(),
        resolution: None,
        estimate: Some(5.0),
    }
}

#[test]
fn given_record_when_task_built_then_tracker_task_with_estimate() {
    let task = Task::from_record(Uuid::new_v4(), &record());

    assert_that!(task.is_tracker_task, eq(true));
    assert_that!(task.estimate, eq(5.0));
    assert_that!(task.is_done, eq(false));
}

#[test]
fn given_stub_when_refreshed_from_record_then_promoted_and_estimate_kept() {
    let mut task = Task::stub(Uuid::new_v4(), "PROJ-1");
    let mut rec = record();
    rec.resolution = Some("fixed".to_string());

    let changed = task.refresh_from_record(&rec);

    assert_that!(changed, eq(true));
    assert_that!(task.is_tracker_task, eq(true));
    assert_that!(task.is_done, eq(true));
    assert_that!(task.tracker_unique_id, eq("10001"));
    assert_that!(task.estimate, eq(0.0));
}

#[test]
fn given_unchanged_record_when_refreshed_then_reports_no_change() {
    let rec = record();
    let mut task = Task::from_record(Uuid::new_v4(), &rec);
    let updated_at = task.updated_at;

    assert_that!(task.refresh_from_record(&rec), eq(false));
    assert_that!(task.updated_at, eq(updated_at));
}
