use crate::{Result as DbErrorResult, row_decode};

use retro_core::SprintTask;

use uuid::Uuid;

pub struct SprintTaskRepository;

#[derive(sqlx::FromRow)]
struct SprintTaskRow {
    id: String,
    sprint_id: String,
    task_id: String,
    created_at: i64,
    deleted_at: Option<i64>,
}

impl SprintTaskRow {
    fn into_model(self) -> DbErrorResult<SprintTask> {
        Ok(SprintTask {
            id: row_decode::uuid(&self.id, "sprint_task.id")?,
            sprint_id: row_decode::uuid(&self.sprint_id, "sprint_task.sprint_id")?,
            task_id: row_decode::uuid(&self.task_id, "sprint_task.task_id")?,
            created_at: row_decode::timestamp(self.created_at, "sprint_task.created_at")?,
            deleted_at: row_decode::opt_timestamp(self.deleted_at, "sprint_task.deleted_at")?,
        })
    }
}

impl SprintTaskRepository {
    /// Returns the (sprint, task) link, creating it on first sighting.
    /// The flag is true when a row was inserted.
    pub async fn ensure(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        sprint_id: Uuid,
        task_id: Uuid,
    ) -> DbErrorResult<(SprintTask, bool)> {
        let candidate = SprintTask::new(sprint_id, task_id);

        let inserted = sqlx::query(
            r#"
                INSERT OR IGNORE INTO retro_sprint_tasks (id, sprint_id, task_id, created_at, deleted_at)
                VALUES (?, ?, ?, ?, NULL)
            "#,
        )
        .bind(candidate.id.to_string())
        .bind(sprint_id.to_string())
        .bind(task_id.to_string())
        .bind(candidate.created_at.timestamp())
        .execute(&mut **tx)
        .await?
        .rows_affected();

        let row = sqlx::query_as::<_, SprintTaskRow>(
            r#"
                SELECT id, sprint_id, task_id, created_at, deleted_at
                FROM retro_sprint_tasks
                WHERE sprint_id = ? AND task_id = ?
            "#,
        )
        .bind(sprint_id.to_string())
        .bind(task_id.to_string())
        .fetch_one(&mut **tx)
        .await?;

        Ok((row.into_model()?, inserted > 0))
    }

    pub async fn find_by_sprint<'e, E>(executor: E, sprint_id: Uuid) -> DbErrorResult<Vec<SprintTask>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let rows = sqlx::query_as::<_, SprintTaskRow>(
            r#"
                SELECT id, sprint_id, task_id, created_at, deleted_at
                FROM retro_sprint_tasks
                WHERE sprint_id = ? AND deleted_at IS NULL
                ORDER BY created_at, id
            "#,
        )
        .bind(sprint_id.to_string())
        .fetch_all(executor)
        .await?;

        rows.into_iter().map(SprintTaskRow::into_model).collect()
    }

    /// Sprints linking `task_id` that have no member-task rows yet.
    pub async fn find_uncovered_sprint_ids<'e, E>(
        executor: E,
        task_id: Uuid,
    ) -> DbErrorResult<Vec<Uuid>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let ids: Vec<String> = sqlx::query_scalar(
            r#"
                SELECT st.sprint_id
                FROM retro_sprint_tasks st
                WHERE st.task_id = ? AND st.deleted_at IS NULL
                  AND NOT EXISTS (
                      SELECT 1 FROM retro_sprint_member_tasks smt
                      WHERE smt.sprint_task_id = st.id AND smt.deleted_at IS NULL
                  )
            "#,
        )
        .bind(task_id.to_string())
        .fetch_all(executor)
        .await?;

        ids.iter()
            .map(|id| row_decode::uuid(id, "sprint_task.sprint_id"))
            .collect()
    }
}
