use crate::{Result as DbErrorResult, row_decode};

use retro_core::SprintSyncStatus;

use uuid::Uuid;

/// Append-only access to `retro_sprint_sync_statuses`. There is deliberately
/// no update or delete.
pub struct SprintSyncStatusRepository;

#[derive(sqlx::FromRow)]
struct SprintSyncStatusRow {
    id: String,
    sprint_id: String,
    status: String,
    message: Option<String>,
    created_at: i64,
}

impl SprintSyncStatusRow {
    fn into_model(self) -> DbErrorResult<SprintSyncStatus> {
        Ok(SprintSyncStatus {
            id: row_decode::uuid(&self.id, "sprint_sync_status.id")?,
            sprint_id: row_decode::uuid(&self.sprint_id, "sprint_sync_status.sprint_id")?,
            status: row_decode::parse(&self.status, "sprint_sync_status.status")?,
            message: self.message,
            created_at: row_decode::timestamp(self.created_at, "sprint_sync_status.created_at")?,
        })
    }
}

impl SprintSyncStatusRepository {
    pub async fn append<'e, E>(executor: E, entry: &SprintSyncStatus) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
                INSERT INTO retro_sprint_sync_statuses (id, sprint_id, status, message, created_at)
                VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(entry.sprint_id.to_string())
        .bind(entry.status.as_str())
        .bind(&entry.message)
        .bind(entry.created_at.timestamp())
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn latest<'e, E>(executor: E, sprint_id: Uuid) -> DbErrorResult<Option<SprintSyncStatus>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let row = sqlx::query_as::<_, SprintSyncStatusRow>(
            r#"
                SELECT id, sprint_id, status, message, created_at
                FROM retro_sprint_sync_statuses
                WHERE sprint_id = ?
                ORDER BY created_at DESC, rowid DESC
                LIMIT 1
            "#,
        )
        .bind(sprint_id.to_string())
        .fetch_optional(executor)
        .await?;

        row.map(SprintSyncStatusRow::into_model).transpose()
    }

    /// Oldest first.
    pub async fn history<'e, E>(executor: E, sprint_id: Uuid) -> DbErrorResult<Vec<SprintSyncStatus>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let rows = sqlx::query_as::<_, SprintSyncStatusRow>(
            r#"
                SELECT id, sprint_id, status, message, created_at
                FROM retro_sprint_sync_statuses
                WHERE sprint_id = ?
                ORDER BY created_at, rowid
            "#,
        )
        .bind(sprint_id.to_string())
        .fetch_all(executor)
        .await?;

        rows.into_iter().map(SprintSyncStatusRow::into_model).collect()
    }
}
