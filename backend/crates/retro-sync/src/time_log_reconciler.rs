//! Folds a member's time logs into `time_spent_minutes`, discovering tasks
//! the tracker's sprint listing did not include on the way.

use crate::providers::{TaskTracker, TimeTracker};
use crate::retry::with_retry;
use crate::{Result as SyncResult, SyncError, SyncMetrics, TaskReconciler};

use retro_config::RetryConfig;
use retro_core::{Sprint, SprintMember, SprintMemberTask, TimeLog, TimeTrackerConfig};
use retro_db::{SprintMemberTaskRepository, SprintTaskRepository, TaskRepository};

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::Utc;
use log::{debug, info, warn};
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberTimeReport {
    pub logs: usize,
    pub keys_resolved: usize,
    pub stubs_created: usize,
    pub rows_created: usize,
    pub rows_updated: usize,
    pub minutes: i64,
}

/// What one member's pass needs besides the database.
pub struct MemberTimeSource<'a> {
    pub sprint_member: &'a SprintMember,
    pub config: &'a TimeTrackerConfig,
    pub time_tracker: &'a dyn TimeTracker,
}

#[derive(Clone)]
pub struct TimeLogReconciler {
    pool: SqlitePool,
    task_reconciler: TaskReconciler,
    metrics: SyncMetrics,
}

impl TimeLogReconciler {
    pub fn new(pool: SqlitePool, task_reconciler: TaskReconciler, metrics: SyncMetrics) -> Self {
        Self {
            pool,
            task_reconciler,
            metrics,
        }
    }

    /// `known_keys` holds every key already handled in this pass; keys this
    /// call resolves or stubs are added to it.
    pub async fn reconcile_member(
        &self,
        sprint: &Sprint,
        source: MemberTimeSource<'_>,
        task_tracker: &dyn TaskTracker,
        known_keys: &mut HashSet<String>,
        retry: &RetryConfig,
    ) -> SyncResult<MemberTimeReport> {
        let range = sprint.date_range().ok_or_else(|| {
            SyncError::configuration(format!("sprint {} has no start or end date", sprint.id))
        })?;
        let member_id = source.sprint_member.id;

        let logs = with_retry(retry, "list_project_time_logs", || {
            source
                .time_tracker
                .list_project_time_logs(&source.config.project, range.start, range.end)
        })
        .await?;
        let logs = own_logs(logs, source.config.user_ref.as_deref());

        let mut report = MemberTimeReport {
            logs: logs.len(),
            ..Default::default()
        };

        let missing: Vec<String> = logs
            .iter()
            .map(|l| l.task_key.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter(|k| !known_keys.contains(*k))
            .map(str::to_string)
            .collect();
        for key in missing {
            self.discover_key(sprint, &key, task_tracker, retry, &mut report)
                .await?;
            known_keys.insert(key);
        }

        let minutes = self.minutes_by_sprint_task(sprint, &logs).await?;
        report.minutes = minutes.values().sum();
        self.rebuild_time(member_id, minutes, &mut report).await?;

        info!(
            "[sprint {}] member {}: {} log(s), {} min, {} resolved, {} stubbed, {} row(s) written",
            sprint.id,
            member_id,
            report.logs,
            report.minutes,
            report.keys_resolved,
            report.stubs_created,
            report.rows_created + report.rows_updated
        );

        Ok(report)
    }

    /// Asks the tracker about a key the sprint listing did not mention. A
    /// known ticket gets the key as an extra alias; an unknown one becomes a
    /// stub so its time is not dropped.
    async fn discover_key(
        &self,
        sprint: &Sprint,
        key: &str,
        task_tracker: &dyn TaskTracker,
        retry: &RetryConfig,
        report: &mut MemberTimeReport,
    ) -> SyncResult<()> {
        let details = with_retry(retry, "get_task_details", || {
            task_tracker.get_task_details(key)
        })
        .await?;

        let mut tx = self.pool.begin().await?;
        match details {
            Some(record) => {
                self.task_reconciler
                    .upsert_record(&mut tx, sprint.retrospective_id, sprint.id, &record, Some(key))
                    .await?;
                report.keys_resolved += 1;
                self.metrics.key_resolved();
                debug!("[sprint {}] key {} resolved to {}", sprint.id, key, record.external_key);
            }
            None => {
                let outcome = self
                    .task_reconciler
                    .ensure_stub(&mut tx, sprint.retrospective_id, sprint.id, key)
                    .await?;
                if outcome.created {
                    report.stubs_created += 1;
                }
            }
        }
        tx.commit().await?;

        Ok(())
    }

    /// Sums minutes per sprint-task. Aliases of one task land on the same row.
    async fn minutes_by_sprint_task(
        &self,
        sprint: &Sprint,
        logs: &[TimeLog],
    ) -> SyncResult<BTreeMap<Uuid, i64>> {
        let mut minutes: BTreeMap<Uuid, i64> = BTreeMap::new();
        let mut tx = self.pool.begin().await?;

        for log in logs {
            let Some(task) =
                TaskRepository::find_by_key(&mut *tx, sprint.retrospective_id, &log.task_key)
                    .await?
            else {
                warn!(
                    "[sprint {}] time log key {} has no task, skipped",
                    sprint.id, log.task_key
                );
                continue;
            };
            let (sprint_task, _) = SprintTaskRepository::ensure(&mut tx, sprint.id, task.id).await?;
            *minutes.entry(sprint_task.id).or_insert(0) += log.minutes.max(0);
        }

        tx.commit().await?;
        Ok(minutes)
    }

    /// Zeroes the member's time for the sprint and rebuilds it from
    /// `minutes`, in one transaction. Rows whose value is unchanged are not
    /// rewritten.
    async fn rebuild_time(
        &self,
        sprint_member_id: Uuid,
        mut minutes: BTreeMap<Uuid, i64>,
        report: &mut MemberTimeReport,
    ) -> SyncResult<()> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let existing =
            SprintMemberTaskRepository::find_by_sprint_member(&mut *tx, sprint_member_id).await?;
        for row in existing {
            let target = minutes.remove(&row.sprint_task_id).unwrap_or(0);
            if row.time_spent_minutes != target {
                SprintMemberTaskRepository::update_time(&mut *tx, row.id, target, now).await?;
                report.rows_updated += 1;
            }
        }

        for (sprint_task_id, spent) in minutes {
            let row = SprintMemberTask::new(sprint_member_id, sprint_task_id, spent);
            SprintMemberTaskRepository::create(&mut *tx, &row).await?;
            report.rows_created += 1;
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Drops logs booked by someone other than `user_ref`. Logs without an
/// author are kept.
fn own_logs(logs: Vec<TimeLog>, user_ref: Option<&str>) -> Vec<TimeLog> {
    match user_ref {
        None => logs,
        Some(user) => logs
            .into_iter()
            .filter(|l| l.logged_by.as_deref().is_none_or(|by| by == user))
            .collect(),
    }
}
