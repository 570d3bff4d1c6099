//! Pulls the sprint's tickets from the task tracker and upserts them as
//! Task, TaskKeyMap and SprintTask rows, one transaction per ticket.

use crate::providers::TaskTracker;
use crate::retry::with_retry;
use crate::{EstimateRebalancer, Result as SyncResult, SyncError, SyncMetrics};

use retro_config::RetryConfig;
use retro_core::{Retrospective, Sprint, Task, TaskRecord};
use retro_db::{SprintTaskRepository, TaskKeyMapRepository, TaskRepository};

use std::collections::HashSet;

use log::{debug, info};
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskReconcileReport {
    /// External keys the tracker reported for the sprint.
    pub known_keys: HashSet<String>,
    pub created: usize,
    pub updated: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub task_id: Uuid,
    pub created: bool,
    pub changed: bool,
}

#[derive(Clone)]
pub struct TaskReconciler {
    pool: SqlitePool,
    rebalancer: EstimateRebalancer,
    metrics: SyncMetrics,
}

impl TaskReconciler {
    pub fn new(pool: SqlitePool, rebalancer: EstimateRebalancer, metrics: SyncMetrics) -> Self {
        Self {
            pool,
            rebalancer,
            metrics,
        }
    }

    pub async fn reconcile(
        &self,
        retrospective: &Retrospective,
        sprint: &Sprint,
        tracker: &dyn TaskTracker,
        retry: &RetryConfig,
    ) -> SyncResult<TaskReconcileReport> {
        let sprint_ref = sprint.external_ref.as_deref().ok_or_else(|| {
            SyncError::configuration(format!("sprint {} has no external reference", sprint.id))
        })?;
        let range = sprint.date_range().ok_or_else(|| {
            SyncError::configuration(format!("sprint {} has no start or end date", sprint.id))
        })?;

        let records = with_retry(retry, "list_sprint_tasks", || {
            tracker.list_sprint_tasks(sprint_ref, range)
        })
        .await?;

        let mut report = TaskReconcileReport::default();
        for record in &records {
            let mut tx = self.pool.begin().await?;
            let outcome = self
                .upsert_record(&mut tx, retrospective.id, sprint.id, record, None)
                .await?;
            tx.commit().await?;

            if outcome.created {
                report.created += 1;
            } else if outcome.changed {
                report.updated += 1;
            }
            report.known_keys.insert(record.external_key.clone());
        }

        self.metrics.tasks_reconciled(records.len());
        info!(
            "[sprint {}] task tracker listed {} ticket(s): {} new, {} updated",
            sprint.id,
            records.len(),
            report.created,
            report.updated
        );

        Ok(report)
    }

    /// Upserts one tracker record into `sprint_id`. `alias` is an extra key
    /// the record was looked up by, kept next to its canonical key.
    pub async fn upsert_record(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        retrospective_id: Uuid,
        sprint_id: Uuid,
        record: &TaskRecord,
        alias: Option<&str>,
    ) -> SyncResult<UpsertOutcome> {
        let existing = self
            .find_existing(tx, retrospective_id, record, alias)
            .await?;

        let (task, created, mut changed) = match existing {
            Some(mut task) => {
                let refreshed = task.refresh_from_record(record);
                if refreshed {
                    TaskRepository::update(&mut **tx, &task).await?;
                }
                let rebalanced = match record.estimate {
                    Some(estimate) => {
                        let before = task.estimate;
                        self.rebalancer.apply(tx, &mut task, estimate).await?;
                        before != task.estimate
                    }
                    None => false,
                };
                (task, false, refreshed || rebalanced)
            }
            None => {
                let task = Task::from_record(retrospective_id, record);
                TaskRepository::create(&mut **tx, &task).await?;
                debug!("[task {}] created", task.tracker_unique_id);
                (task, true, true)
            }
        };

        for key in std::iter::once(record.external_key.as_str()).chain(alias) {
            changed |= TaskKeyMapRepository::claim(tx, retrospective_id, task.id, key).await?;
        }
        let (_, linked) = SprintTaskRepository::ensure(tx, sprint_id, task.id).await?;

        Ok(UpsertOutcome {
            task_id: task.id,
            created,
            changed: changed || linked,
        })
    }

    /// Returns the task aliased by `key`, creating an untracked stub when no
    /// task holds it yet, and links it to the sprint.
    pub async fn ensure_stub(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        retrospective_id: Uuid,
        sprint_id: Uuid,
        key: &str,
    ) -> SyncResult<UpsertOutcome> {
        let (task_id, created) =
            match TaskRepository::find_by_key(&mut **tx, retrospective_id, key).await? {
                Some(task) => (task.id, false),
                None => {
                    let stub = Task::stub(retrospective_id, key);
                    TaskRepository::create(&mut **tx, &stub).await?;
                    TaskKeyMapRepository::claim(tx, retrospective_id, stub.id, key).await?;
                    self.metrics.stub_created();
                    debug!("[task {}] stub created from time log", key);
                    (stub.id, true)
                }
            };
        let (_, linked) = SprintTaskRepository::ensure(tx, sprint_id, task_id).await?;

        Ok(UpsertOutcome {
            task_id,
            created,
            changed: created || linked,
        })
    }

    /// Matches by tracker id first. Failing that, a stub already holding one
    /// of the record's keys is adopted so a key never splits across tasks.
    async fn find_existing(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        retrospective_id: Uuid,
        record: &TaskRecord,
        alias: Option<&str>,
    ) -> SyncResult<Option<Task>> {
        if let Some(task) =
            TaskRepository::find_by_tracker_id(&mut **tx, retrospective_id, &record.tracker_unique_id)
                .await?
        {
            return Ok(Some(task));
        }

        for key in std::iter::once(record.external_key.as_str()).chain(alias) {
            if let Some(task) = TaskRepository::find_by_key(&mut **tx, retrospective_id, key).await?
                && !task.is_tracker_task
            {
                return Ok(Some(task));
            }
        }

        Ok(None)
    }
}
