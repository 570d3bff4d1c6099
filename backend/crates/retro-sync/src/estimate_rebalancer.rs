//! Keeps earned points consistent with a task's estimate when the estimate
//! changes. The estimate write and the point rewrite share one transaction.

use crate::{Result as SyncResult, SyncError, SyncMetrics};

use retro_core::points::{self, PointsRow, RebalanceReport};
use retro_core::{SprintStatus, Task};
use retro_db::{MemberTaskPoints, SprintMemberTaskRepository, TaskRepository};

use chrono::Utc;
use log::{debug, warn};
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

#[derive(Clone)]
pub struct EstimateRebalancer {
    pool: SqlitePool,
    include_completed_sprints: bool,
    metrics: SyncMetrics,
}

impl EstimateRebalancer {
    pub fn new(pool: SqlitePool, include_completed_sprints: bool, metrics: SyncMetrics) -> Self {
        Self {
            pool,
            include_completed_sprints,
            metrics,
        }
    }

    /// Standalone entry point for estimate edits made outside a sync.
    pub async fn rebalance(&self, task_id: Uuid, new_estimate: f64) -> SyncResult<RebalanceReport> {
        let mut tx = self.pool.begin().await?;
        let mut task = TaskRepository::find_by_id(&mut *tx, task_id)
            .await?
            .ok_or_else(|| SyncError::not_found("Task", task_id))?;
        let report = self.apply(&mut tx, &mut task, new_estimate).await?;
        tx.commit().await?;
        Ok(report)
    }

    /// Writes `new_estimate` to `task` and rescales the earned points of its
    /// member-tasks in non-draft sprints. Does nothing when the estimate is
    /// unchanged. The caller owns the transaction.
    pub async fn apply(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        task: &mut Task,
        new_estimate: f64,
    ) -> SyncResult<RebalanceReport> {
        let new_estimate = new_estimate.max(0.0);
        if points::points_equal(task.estimate, new_estimate) {
            return Ok(RebalanceReport::default());
        }

        let now = Utc::now();
        TaskRepository::update_estimate(&mut **tx, task.id, new_estimate, now).await?;
        debug!(
            "[task {}] estimate {} -> {}",
            task.tracker_unique_id, task.estimate, new_estimate
        );
        task.estimate = new_estimate;
        task.updated_at = now;

        let loaded = SprintMemberTaskRepository::find_points_by_task(&mut **tx, task.id).await?;
        let mut rows: Vec<PointsRow> = loaded
            .iter()
            .filter(|r| r.sprint_status.is_non_draft())
            .map(|r| self.to_points_row(r))
            .collect();
        if rows.is_empty() {
            return Ok(RebalanceReport::default());
        }

        let before = rows.clone();
        let report = points::rebalance(&mut rows, new_estimate);

        if report.negative_remaining {
            warn!(
                "[task {}] frozen points exceed the new estimate {}; rewritable rows set to 0",
                task.tracker_unique_id, new_estimate
            );
        }

        let mut written = 0;
        for (old, new) in before.iter().zip(&rows) {
            if points::points_equal(old.points_earned, new.points_earned) {
                continue;
            }
            SprintMemberTaskRepository::update_points(
                &mut **tx,
                new.member_task_id,
                new.points_earned,
                new.points_assigned,
                now,
            )
            .await?;
            written += 1;
        }

        if written > 0 {
            self.metrics.rebalance_applied(written);
            debug!(
                "[task {}] rebalanced {} member-task(s) (shrunk {}, redistributed {})",
                task.tracker_unique_id, written, report.shrunk, report.redistributed
            );
        }

        Ok(report)
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
