use crate::{Result as DbErrorResult, row_decode};

use retro_core::{Sprint, SyncStatus};

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub struct SprintRepository;

#[derive(sqlx::FromRow)]
struct SprintRow {
    id: String,
    retrospective_id: String,
    title: String,
    external_ref: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    status: String,
    sync_status: String,
    last_synced_at: Option<i64>,
    created_at: i64,
    updated_at: i64,
    deleted_at: Option<i64>,
}

impl SprintRow {
    fn into_model(self) -> DbErrorResult<Sprint> {
        Ok(Sprint {
            id: row_decode::uuid(&self.id, "sprint.id")?,
            retrospective_id: row_decode::uuid(&self.retrospective_id, "sprint.retrospective_id")?,
            title: self.title,
            external_ref: self.external_ref,
            start_date: row_decode::opt_date(self.start_date.as_deref(), "sprint.start_date")?,
            end_date: row_decode::opt_date(self.end_date.as_deref(), "sprint.end_date")?,
            status: row_decode::parse(&self.status, "sprint.status")?,
            sync_status: row_decode::parse(&self.sync_status, "sprint.sync_status")?,
            last_synced_at: row_decode::opt_timestamp(self.last_synced_at, "sprint.last_synced_at")?,
            created_at: row_decode::timestamp(self.created_at, "sprint.created_at")?,
            updated_at: row_decode::timestamp(self.updated_at, "sprint.updated_at")?,
            deleted_at: row_decode::opt_timestamp(self.deleted_at, "sprint.deleted_at")?,
        })
    }
}

const SELECT_SPRINT: &str = r#"
    SELECT id, retrospective_id, title, external_ref, start_date, end_date,
           status, sync_status, last_synced_at, created_at, updated_at, deleted_at
    FROM retro_sprints
"#;

impl SprintRepository {
    pub async fn create<'e, E>(executor: E, sprint: &Sprint) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
                INSERT INTO retro_sprints (
                    id, retrospective_id, title, external_ref, start_date, end_date,
                    status, sync_status, last_synced_at, created_at, updated_at, deleted_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(sprint.id.to_string())
        .bind(sprint.retrospective_id.to_string())
        .bind(&sprint.title)
        .bind(&sprint.external_ref)
        .bind(row_decode::format_date(sprint.start_date))
        .bind(row_decode::format_date(sprint.end_date))
        .bind(sprint.status.as_str())
        .bind(sprint.sync_status.as_str())
        .bind(sprint.last_synced_at.map(|dt| dt.timestamp()))
        .bind(sprint.created_at.timestamp())
        .bind(sprint.updated_at.timestamp())
        .bind(sprint.deleted_at.map(|dt| dt.timestamp()))
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> DbErrorResult<Option<Sprint>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let sql = format!("{} WHERE id = ? AND deleted_at IS NULL", SELECT_SPRINT);
        let row = sqlx::query_as::<_, SprintRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(executor)
            .await?;

        row.map(SprintRow::into_model).transpose()
    }

    pub async fn find_by_retrospective<'e, E>(
        executor: E,
        retrospective_id: Uuid,
    ) -> DbErrorResult<Vec<Sprint>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let sql = format!(
            "{} WHERE retrospective_id = ? AND deleted_at IS NULL ORDER BY start_date, created_at",
            SELECT_SPRINT
        );
        let rows = sqlx::query_as::<_, SprintRow>(&sql)
            .bind(retrospective_id.to_string())
            .fetch_all(executor)
            .await?;

        rows.into_iter().map(SprintRow::into_model).collect()
    }

    /// Mirrors the latest ledger state onto the sprint row. `last_synced_at`
    /// is only overwritten when a value is given.
    pub async fn update_sync_state<'e, E>(
        executor: E,
        id: Uuid,
        sync_status: SyncStatus,
        last_synced_at: Option<DateTime<Utc>>,
    ) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
                UPDATE retro_sprints
                SET sync_status = ?,
                    last_synced_at = COALESCE(?, last_synced_at)
                WHERE id = ?
            "#,
        )
        .bind(sync_status.as_str())
        .bind(last_synced_at.map(|dt| dt.timestamp()))
        .bind(id.to_string())
        .execute(executor)
        .await?;

        Ok(())
    }
}
