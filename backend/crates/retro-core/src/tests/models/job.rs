use crate::SyncJob;

use googletest::prelude::*;
use uuid::Uuid;

#[test]
fn given_same_arguments_when_keyed_then_keys_match() {
    let sprint_id = Uuid::new_v4();
    let a = SyncJob::SyncSprint { sprint_id };
    let b = SyncJob::SyncSprint { sprint_id };

    assert_that!(a.job_name(), eq(b.job_name()));
    assert_that!(a.args_key(), eq(&b.args_key()));
}

#[test]
fn given_sync_and_assign_for_same_sprint_when_named_then_differ() {
    let sprint_id = Uuid::new_v4();

    assert_that!(
        SyncJob::SyncSprint { sprint_id }.job_name(),
        not(eq(SyncJob::AssignPoints { sprint_id }.job_name()))
    );
}

#[test]
fn given_job_parts_when_rebuilt_then_same_job() {
    let job = SyncJob::SyncSprintMember {
        sprint_member_id: Uuid::new_v4(),
    };

    let rebuilt = SyncJob::from_parts(job.job_name(), &job.args()).unwrap();

    assert_that!(rebuilt, eq(job));
}

#[test]
fn given_unknown_job_name_when_rebuilt_then_error() {
    let job = SyncJob::SyncSprint {
        sprint_id: Uuid::new_v4(),
    };

    assert_that!(SyncJob::from_parts("reindex", &job.args()), err(anything()));
}
