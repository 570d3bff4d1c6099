use crate::{Result as DbErrorResult, row_decode};

use retro_core::TaskKeyMap;

use chrono::Utc;
use uuid::Uuid;

pub struct TaskKeyMapRepository;

#[derive(sqlx::FromRow)]
struct TaskKeyMapRow {
    id: String,
    task_id: String,
    key: String,
    created_at: i64,
}

impl TaskKeyMapRow {
    fn into_model(self) -> DbErrorResult<TaskKeyMap> {
        Ok(TaskKeyMap {
            id: row_decode::uuid(&self.id, "task_key_map.id")?,
            task_id: row_decode::uuid(&self.task_id, "task_key_map.task_id")?,
            key: self.key,
            created_at: row_decode::timestamp(self.created_at, "task_key_map.created_at")?,
        })
    }
}

impl TaskKeyMapRepository {
    /// Points `key` at `task_id` within the retrospective: adds the alias if
    /// missing and drops it from any other task that held it.
    /// Returns true when anything changed.
    pub async fn claim(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        retrospective_id: Uuid,
        task_id: Uuid,
        key: &str,
    ) -> DbErrorResult<bool> {
        let retrospective_id = retrospective_id.to_string();
        let task_id = task_id.to_string();

        let released = sqlx::query(
            r#"
                DELETE FROM retro_task_key_maps
                WHERE key = ? AND task_id <> ?
                  AND task_id IN (SELECT id FROM retro_tasks WHERE retrospective_id = ?)
            "#,
        )
        .bind(key)
        .bind(&task_id)
        .bind(&retrospective_id)
        .execute(&mut **tx)
        .await?
        .rows_affected();

        let inserted = sqlx::query(
            r#"
                INSERT OR IGNORE INTO retro_task_key_maps (id, task_id, key, created_at)
                VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&task_id)
        .bind(key)
        .bind(Utc::now().timestamp())
        .execute(&mut **tx)
        .await?
        .rows_affected();

        Ok(released > 0 || inserted > 0)
    }

    pub async fn find_by_task<'e, E>(executor: E, task_id: Uuid) -> DbErrorResult<Vec<TaskKeyMap>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let rows = sqlx::query_as::<_, TaskKeyMapRow>(
            r#"
                SELECT id, task_id, key, created_at
                FROM retro_task_key_maps
                WHERE task_id = ?
                ORDER BY created_at, key
            "#,
        )
        .bind(task_id.to_string())
        .fetch_all(executor)
        .await?;

        rows.into_iter().map(TaskKeyMapRow::into_model).collect()
    }
}
