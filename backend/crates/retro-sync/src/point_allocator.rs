//! `AssignPoints`: for each dirty task of a sprint, splits what the task's
//! other sprints leave of its estimate across this sprint's member-tasks by
//! time spent. Only the target sprint's rows are written, so the sprint lock
//! covers every write. Re-running with no new time logs writes nothing.

use crate::{Result as SyncResult, SprintLocks, SyncError, SyncMetrics};

use retro_core::points::{self, PointsRow};
use retro_core::{Sprint, SprintStatus, Task};
use retro_db::{
    MemberTaskPoints, SprintMemberTaskRepository, SprintRepository, SprintTaskRepository,
    TaskRepository,
};

use chrono::Utc;
use log::info;
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationReport {
    pub tasks_considered: usize,
    pub tasks_allocated: usize,
    /// Tasks whose allocation was already consistent.
    pub tasks_skipped: usize,
    pub rows_written: usize,
}

#[derive(Clone)]
pub struct PointAllocator {
    pool: SqlitePool,
    locks: SprintLocks,
    include_completed_sprints: bool,
    metrics: SyncMetrics,
}

impl PointAllocator {
    pub fn new(
        pool: SqlitePool,
        locks: SprintLocks,
        include_completed_sprints: bool,
        metrics: SyncMetrics,
    ) -> Self {
        Self {
            pool,
            locks,
            include_completed_sprints,
            metrics,
        }
    }

    pub async fn assign_points(&self, sprint_id: Uuid) -> SyncResult<AllocationReport> {
        let sprint = SprintRepository::find_by_id(&self.pool, sprint_id)
            .await?
            .ok_or_else(|| SyncError::not_found("Sprint", sprint_id))?;
        if sprint.status == SprintStatus::Deleted {
            return Err(SyncError::configuration(format!(
                "sprint {} is deleted and cannot be allocated",
                sprint.id
            )));
        }
        let _guard = self.locks.acquire(sprint.id).await;

        let tasks = TaskRepository::find_by_sprint(&self.pool, sprint.id).await?;
        let mut report = AllocationReport {
            tasks_considered: tasks.len(),
            ..Default::default()
        };

        for task in &tasks {
            match self.allocate_task(&sprint, task).await? {
                Some(written) => {
                    report.tasks_allocated += 1;
                    report.rows_written += written;
                }
                None => report.tasks_skipped += 1,
            }
        }

        self.metrics.allocation_written(report.rows_written);
        info!(
            "[sprint {}] assign points: {} task(s), {} allocated, {} row(s) written",
            sprint.id, report.tasks_considered, report.tasks_allocated, report.rows_written
        );

        Ok(report)
    }

    /// Returns the number of rows written, or `None` when the task was clean.
    async fn allocate_task(&self, sprint: &Sprint, task: &Task) -> SyncResult<Option<usize>> {
        let mut tx = self.pool.begin().await?;

        let loaded = SprintMemberTaskRepository::find_points_by_task(&mut *tx, task.id).await?;
        let mut rows: Vec<PointsRow> = loaded
            .iter()
            .filter(|r| self.in_scope(sprint, r.sprint_id, r.sprint_status))
            .map(|r| self.to_points_row(r))
            .collect();

        let mut uncovered = false;
        for sprint_id in SprintTaskRepository::find_uncovered_sprint_ids(&mut *tx, task.id).await? {
            let status = if sprint_id == sprint.id {
                Some(sprint.status)
            } else {
                SprintRepository::find_by_id(&mut *tx, sprint_id)
                    .await?
                    .map(|s| s.status)
            };
            if status.is_some_and(|s| self.in_scope(sprint, sprint_id, s)) {
                uncovered = true;
                break;
            }
        }

        if !uncovered && !points::needs_allocation(&rows) {
            return Ok(None);
        }

        let before = rows.clone();
        points::allocate(&mut rows, sprint.id, task.estimate);

        let now = Utc::now();
        let mut written = 0;
        for (old, new) in before.iter().zip(&rows) {
            if old == new || new.sprint_id != sprint.id {
                continue;
            }
            SprintMemberTaskRepository::update_points(
                &mut *tx,
                new.member_task_id,
                new.points_earned,
                new.points_assigned,
                now,
            )
            .await?;
            written += 1;
        }

        tx.commit().await?;
        Ok(Some(written))
    }

    /// Non-draft sprints, plus the sprint being allocated even while Draft.
    /// Deleted sprints are rejected before this is reached.
    fn in_scope(&self, current: &Sprint, sprint_id: Uuid, status: SprintStatus) -> bool {
        sprint_id == current.id || status.is_non_draft()
    }

    fn to_points_row(&self, row: &MemberTaskPoints) -> PointsRow {
        PointsRow {
            member_task_id: row.member_task_id,
            sprint_id: row.sprint_id,
            time_spent_minutes: row.time_spent_minutes,
            points_earned: row.points_earned,
            points_assigned: row.points_assigned,
            frozen: row.sprint_status == SprintStatus::Completed && !self.include_completed_sprints,
        }
    }
}
