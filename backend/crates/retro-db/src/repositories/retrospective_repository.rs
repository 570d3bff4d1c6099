use crate::{DbError, Result as DbErrorResult, row_decode};

use retro_core::{Retrospective, TaskTrackerConfig};

use std::panic::Location;

use error_location::ErrorLocation;
use uuid::Uuid;

pub struct RetrospectiveRepository;

#[derive(sqlx::FromRow)]
struct RetrospectiveRow {
    id: String,
    name: String,
    task_tracker_config: String,
    created_at: i64,
    updated_at: i64,
    deleted_at: Option<i64>,
}

impl RetrospectiveRow {
    fn into_model(self) -> DbErrorResult<Retrospective> {
        let task_tracker_config =
            TaskTrackerConfig::from_json(&self.task_tracker_config).map_err(|e| {
                DbError::Decode {
                    message: format!("Invalid retrospective.task_tracker_config: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;

        Ok(Retrospective {
            id: row_decode::uuid(&self.id, "retrospective.id")?,
            name: self.name,
            task_tracker_config,
            created_at: row_decode::timestamp(self.created_at, "retrospective.created_at")?,
            updated_at: row_decode::timestamp(self.updated_at, "retrospective.updated_at")?,
            deleted_at: row_decode::opt_timestamp(self.deleted_at, "retrospective.deleted_at")?,
        })
    }
}

impl RetrospectiveRepository {
    pub async fn create<'e, E>(executor: E, retrospective: &Retrospective) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let config = retrospective
            .task_tracker_config
            .to_json()
            .map_err(|e| DbError::Decode {
                message: format!("Cannot encode task tracker config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        sqlx::query(
            r#"
                INSERT INTO retro_retrospectives (
                    id, name, task_tracker_config, created_at, updated_at, deleted_at
                ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(retrospective.id.to_string())
        .bind(&retrospective.name)
        .bind(config)
        .bind(retrospective.created_at.timestamp())
        .bind(retrospective.updated_at.timestamp())
        .bind(retrospective.deleted_at.map(|dt| dt.timestamp()))
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> DbErrorResult<Option<Retrospective>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let row = sqlx::query_as::<_, RetrospectiveRow>(
            r#"
                SELECT id, name, task_tracker_config, created_at, updated_at, deleted_at
                FROM retro_retrospectives
                WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(executor)
        .await?;

        row.map(RetrospectiveRow::into_model).transpose()
    }
}
