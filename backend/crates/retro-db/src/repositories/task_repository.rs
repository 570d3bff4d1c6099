use crate::{Result as DbErrorResult, row_decode};

use retro_core::Task;

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub struct TaskRepository;

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: String,
    retrospective_id: String,
    tracker_unique_id: String,
    summary: String,
    description: Option<String>,
    task_type: String,
    status: String,
    priority: String,
    assignee: Option<String>,
    resolution: Option<String>,
    estimate: f64,
    is_done: bool,
    is_tracker_task: bool,
    created_at: i64,
    updated_at: i64,
    deleted_at: Option<i64>,
}

impl TaskRow {
    fn into_model(self) -> DbErrorResult<Task> {
        Ok(Task {
            id: row_decode::uuid(&self.id, "task.id")?,
            retrospective_id: row_decode::uuid(&self.retrospective_id, "task.retrospective_id")?,
            tracker_unique_id: self.tracker_unique_id,
            summary: self.summary,
            description: self.description,
            task_type: self.task_type,
            status: self.status,
            priority: self.priority,
            assignee: self.assignee,
            resolution: self.resolution,
            estimate: self.estimate,
            is_done: self.is_done,
            is_tracker_task: self.is_tracker_task,
            created_at: row_decode::timestamp(self.created_at, "task.created_at")?,
            updated_at: row_decode::timestamp(self.updated_at, "task.updated_at")?,
            deleted_at: row_decode::opt_timestamp(self.deleted_at, "task.deleted_at")?,
        })
    }
}

const TASK_COLUMNS: &str = r#"
    t.id, t.retrospective_id, t.tracker_unique_id, t.summary, t.description,
    t.task_type, t.status, t.priority, t.assignee, t.resolution, t.estimate,
    t.is_done, t.is_tracker_task, t.created_at, t.updated_at, t.deleted_at
"#;

impl TaskRepository {
    pub async fn create<'e, E>(executor: E, task: &Task) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
                INSERT INTO retro_tasks (
                    id, retrospective_id, tracker_unique_id, summary, description,
                    task_type, status, priority, assignee, resolution, estimate,
                    is_done, is_tracker_task, created_at, updated_at, deleted_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(task.id.to_string())
        .bind(task.retrospective_id.to_string())
        .bind(&task.tracker_unique_id)
        .bind(&task.summary)
        .bind(&task.description)
        .bind(&task.task_type)
        .bind(&task.status)
        .bind(&task.priority)
        .bind(&task.assignee)
        .bind(&task.resolution)
        .bind(task.estimate)
        .bind(task.is_done)
        .bind(task.is_tracker_task)
        .bind(task.created_at.timestamp())
        .bind(task.updated_at.timestamp())
        .bind(task.deleted_at.map(|dt| dt.timestamp()))
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Writes every descriptive field. The estimate goes through
    /// [`TaskRepository::update_estimate`] so it stays paired with a rebalance.
    pub async fn update<'e, E>(executor: E, task: &Task) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
                UPDATE retro_tasks
                SET tracker_unique_id = ?, summary = ?, description = ?, task_type = ?,
                    status = ?, priority = ?, assignee = ?, resolution = ?,
                    is_done = ?, is_tracker_task = ?, updated_at = ?
                WHERE id = ?
            "#,
        )
        .bind(&task.tracker_unique_id)
        .bind(&task.summary)
        .bind(&task.description)
        .bind(&task.task_type)
        .bind(&task.status)
        .bind(&task.priority)
        .bind(&task.assignee)
        .bind(&task.resolution)
        .bind(task.is_done)
        .bind(task.is_tracker_task)
        .bind(task.updated_at.timestamp())
        .bind(task.id.to_string())
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn update_estimate<'e, E>(
        executor: E,
        id: Uuid,
        estimate: f64,
        updated_at: DateTime<Utc>,
    ) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query("UPDATE retro_tasks SET estimate = ?, updated_at = ? WHERE id = ?")
            .bind(estimate)
            .bind(updated_at.timestamp())
            .bind(id.to_string())
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> DbErrorResult<Option<Task>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let sql = format!(
            "SELECT {} FROM retro_tasks t WHERE t.id = ? AND t.deleted_at IS NULL",
            TASK_COLUMNS
        );
        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(executor)
            .await?;

        row.map(TaskRow::into_model).transpose()
    }

    pub async fn find_by_tracker_id<'e, E>(
        executor: E,
        retrospective_id: Uuid,
        tracker_unique_id: &str,
    ) -> DbErrorResult<Option<Task>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let sql = format!(
            r#"
                SELECT {} FROM retro_tasks t
                WHERE t.retrospective_id = ? AND t.tracker_unique_id = ?
                  AND t.deleted_at IS NULL
            "#,
            TASK_COLUMNS
        );
        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(retrospective_id.to_string())
            .bind(tracker_unique_id)
            .fetch_optional(executor)
            .await?;

        row.map(TaskRow::into_model).transpose()
    }

    /// Resolves an external key through the alias table. Tracker tasks win
    /// over stubs if a key was ever aliased twice.
    pub async fn find_by_key<'e, E>(
        executor: E,
        retrospective_id: Uuid,
        key: &str,
    ) -> DbErrorResult<Option<Task>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let sql = format!(
            r#"
                SELECT {} FROM retro_tasks t
                JOIN retro_task_key_maps k ON k.task_id = t.id
                WHERE t.retrospective_id = ? AND k.key = ? AND t.deleted_at IS NULL
                ORDER BY t.is_tracker_task DESC, t.created_at
                LIMIT 1
            "#,
            TASK_COLUMNS
        );
        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(retrospective_id.to_string())
            .bind(key)
            .fetch_optional(executor)
            .await?;

        row.map(TaskRow::into_model).transpose()
    }

    pub async fn find_by_sprint<'e, E>(executor: E, sprint_id: Uuid) -> DbErrorResult<Vec<Task>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let sql = format!(
            r#"
                SELECT {} FROM retro_tasks t
                JOIN retro_sprint_tasks st ON st.task_id = t.id
                WHERE st.sprint_id = ? AND st.deleted_at IS NULL AND t.deleted_at IS NULL
                ORDER BY t.created_at, t.id
            "#,
            TASK_COLUMNS
        );
        let rows = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(sprint_id.to_string())
            .fetch_all(executor)
            .await?;

        rows.into_iter().map(TaskRow::into_model).collect()
    }
}
