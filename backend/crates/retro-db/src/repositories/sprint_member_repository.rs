use crate::{Result as DbErrorResult, row_decode};

use retro_core::SprintMember;

use uuid::Uuid;

pub struct SprintMemberRepository;

#[derive(sqlx::FromRow)]
struct SprintMemberRow {
    id: String,
    sprint_id: String,
    member_id: String,
    allocation_percent: f64,
    expectation_percent: f64,
    vacation_days: i64,
    rating: Option<i64>,
    created_at: i64,
    updated_at: i64,
    deleted_at: Option<i64>,
}

impl SprintMemberRow {
    fn into_model(self) -> DbErrorResult<SprintMember> {
        Ok(SprintMember {
            id: row_decode::uuid(&self.id, "sprint_member.id")?,
            sprint_id: row_decode::uuid(&self.sprint_id, "sprint_member.sprint_id")?,
            member_id: row_decode::uuid(&self.member_id, "sprint_member.member_id")?,
            allocation_percent: self.allocation_percent,
            expectation_percent: self.expectation_percent,
            vacation_days: self.vacation_days as i32,
            rating: self.rating.map(|r| r as i32),
            created_at: row_decode::timestamp(self.created_at, "sprint_member.created_at")?,
            updated_at: row_decode::timestamp(self.updated_at, "sprint_member.updated_at")?,
            deleted_at: row_decode::opt_timestamp(self.deleted_at, "sprint_member.deleted_at")?,
        })
    }
}

const SELECT_SPRINT_MEMBER: &str = r#"
    SELECT id, sprint_id, member_id, allocation_percent, expectation_percent,
           vacation_days, rating, created_at, updated_at, deleted_at
    FROM retro_sprint_members
"#;

impl SprintMemberRepository {
    pub async fn create<'e, E>(executor: E, member: &SprintMember) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
                INSERT INTO retro_sprint_members (
                    id, sprint_id, member_id, allocation_percent, expectation_percent,
                    vacation_days, rating, created_at, updated_at, deleted_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(member.id.to_string())
        .bind(member.sprint_id.to_string())
        .bind(member.member_id.to_string())
        .bind(member.allocation_percent)
        .bind(member.expectation_percent)
        .bind(member.vacation_days)
        .bind(member.rating)
        .bind(member.created_at.timestamp())
        .bind(member.updated_at.timestamp())
        .bind(member.deleted_at.map(|dt| dt.timestamp()))
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> DbErrorResult<Option<SprintMember>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let sql = format!("{} WHERE id = ? AND deleted_at IS NULL", SELECT_SPRINT_MEMBER);
        let row = sqlx::query_as::<_, SprintMemberRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(executor)
            .await?;

        row.map(SprintMemberRow::into_model).transpose()
    }

    pub async fn find_by_sprint<'e, E>(executor: E, sprint_id: Uuid) -> DbErrorResult<Vec<SprintMember>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let sql = format!(
            "{} WHERE sprint_id = ? AND deleted_at IS NULL ORDER BY created_at, id",
            SELECT_SPRINT_MEMBER
        );
        let rows = sqlx::query_as::<_, SprintMemberRow>(&sql)
            .bind(sprint_id.to_string())
            .fetch_all(executor)
            .await?;

        rows.into_iter().map(SprintMemberRow::into_model).collect()
    }
}
