use crate::{DbError, Result as DbErrorResult, row_decode};

use retro_core::{TeamMember, TimeTrackerConfig};

use std::panic::Location;

use error_location::ErrorLocation;
use uuid::Uuid;

pub struct TeamMemberRepository;

#[derive(sqlx::FromRow)]
struct TeamMemberRow {
    id: String,
    name: String,
    email: String,
    time_tracker_config: Option<String>,
    created_at: i64,
    updated_at: i64,
    deleted_at: Option<i64>,
}

impl TeamMemberRow {
    fn into_model(self) -> DbErrorResult<TeamMember> {
        let time_tracker_config = self
            .time_tracker_config
            .as_deref()
            .map(TimeTrackerConfig::from_json)
            .transpose()
            .map_err(|e| DbError::Decode {
                message: format!("Invalid team_member.time_tracker_config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(TeamMember {
            id: row_decode::uuid(&self.id, "team_member.id")?,
            name: self.name,
            email: self.email,
            time_tracker_config,
            created_at: row_decode::timestamp(self.created_at, "team_member.created_at")?,
            updated_at: row_decode::timestamp(self.updated_at, "team_member.updated_at")?,
            deleted_at: row_decode::opt_timestamp(self.deleted_at, "team_member.deleted_at")?,
        })
    }
}

impl TeamMemberRepository {
    pub async fn create<'e, E>(executor: E, member: &TeamMember) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let config = member
            .time_tracker_config
            .as_ref()
            .map(TimeTrackerConfig::to_json)
            .transpose()
            .map_err(|e| DbError::Decode {
                message: format!("Cannot encode time tracker config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        sqlx::query(
            r#"
                INSERT INTO retro_team_members (
                    id, name, email, time_tracker_config, created_at, updated_at, deleted_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(member.id.to_string())
        .bind(&member.name)
        .bind(&member.email)
        .bind(config)
        .bind(member.created_at.timestamp())
        .bind(member.updated_at.timestamp())
        .bind(member.deleted_at.map(|dt| dt.timestamp()))
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> DbErrorResult<Option<TeamMember>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let row = sqlx::query_as::<_, TeamMemberRow>(
            r#"
                SELECT id, name, email, time_tracker_config, created_at, updated_at, deleted_at
                FROM retro_team_members
                WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(executor)
        .await?;

        row.map(TeamMemberRow::into_model).transpose()
    }
}
