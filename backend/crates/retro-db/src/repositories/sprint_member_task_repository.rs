use crate::{Result as DbErrorResult, row_decode};

use retro_core::{SprintMemberTask, SprintStatus};

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub struct SprintMemberTaskRepository;

/// A member-task joined with the sprint it belongs to, as needed by the
/// rebalancer and the allocator.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberTaskPoints {
    pub member_task_id: Uuid,
    pub sprint_id: Uuid,
    pub sprint_status: SprintStatus,
    pub time_spent_minutes: i64,
    pub points_earned: f64,
    pub points_assigned: Option<f64>,
}

#[derive(sqlx::FromRow)]
struct SprintMemberTaskRow {
    id: String,
    sprint_member_id: String,
    sprint_task_id: String,
    time_spent_minutes: i64,
    points_earned: f64,
    points_assigned: Option<f64>,
    rating: Option<i64>,
    created_at: i64,
    updated_at: i64,
    deleted_at: Option<i64>,
}

impl SprintMemberTaskRow {
    fn into_model(self) -> DbErrorResult<SprintMemberTask> {
        Ok(SprintMemberTask {
            id: row_decode::uuid(&self.id, "sprint_member_task.id")?,
            sprint_member_id: row_decode::uuid(
                &self.sprint_member_id,
                "sprint_member_task.sprint_member_id",
            )?,
            sprint_task_id: row_decode::uuid(
                &self.sprint_task_id,
                "sprint_member_task.sprint_task_id",
            )?,
            time_spent_minutes: self.time_spent_minutes,
            points_earned: self.points_earned,
            points_assigned: self.points_assigned,
            rating: self.rating.map(|r| r as i32),
            created_at: row_decode::timestamp(self.created_at, "sprint_member_task.created_at")?,
            updated_at: row_decode::timestamp(self.updated_at, "sprint_member_task.updated_at")?,
            deleted_at: row_decode::opt_timestamp(
                self.deleted_at,
                "sprint_member_task.deleted_at",
            )?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct MemberTaskPointsRow {
    member_task_id: String,
    sprint_id: String,
    sprint_status: String,
    time_spent_minutes: i64,
    points_earned: f64,
    points_assigned: Option<f64>,
}

const SELECT_MEMBER_TASK: &str = r#"
    SELECT id, sprint_member_id, sprint_task_id, time_spent_minutes, points_earned,
           points_assigned, rating, created_at, updated_at, deleted_at
    FROM retro_sprint_member_tasks
"#;

impl SprintMemberTaskRepository {
    pub async fn create<'e, E>(executor: E, member_task: &SprintMemberTask) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
                INSERT INTO retro_sprint_member_tasks (
                    id, sprint_member_id, sprint_task_id, time_spent_minutes, points_earned,
                    points_assigned, rating, created_at, updated_at, deleted_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(member_task.id.to_string())
        .bind(member_task.sprint_member_id.to_string())
        .bind(member_task.sprint_task_id.to_string())
        .bind(member_task.time_spent_minutes)
        .bind(member_task.points_earned)
        .bind(member_task.points_assigned)
        .bind(member_task.rating)
        .bind(member_task.created_at.timestamp())
        .bind(member_task.updated_at.timestamp())
        .bind(member_task.deleted_at.map(|dt| dt.timestamp()))
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn find_by_id<'e, E>(
        executor: E,
        id: Uuid,
    ) -> DbErrorResult<Option<SprintMemberTask>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let sql = format!("{} WHERE id = ? AND deleted_at IS NULL", SELECT_MEMBER_TASK);
        let row = sqlx::query_as::<_, SprintMemberTaskRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(executor)
            .await?;

        row.map(SprintMemberTaskRow::into_model).transpose()
    }

    pub async fn find_by_sprint_member<'e, E>(
        executor: E,
        sprint_member_id: Uuid,
    ) -> DbErrorResult<Vec<SprintMemberTask>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let sql = format!(
            "{} WHERE sprint_member_id = ? AND deleted_at IS NULL ORDER BY created_at, id",
            SELECT_MEMBER_TASK
        );
        let rows = sqlx::query_as::<_, SprintMemberTaskRow>(&sql)
            .bind(sprint_member_id.to_string())
            .fetch_all(executor)
            .await?;

        rows.into_iter().map(SprintMemberTaskRow::into_model).collect()
    }

    pub async fn update_time<'e, E>(
        executor: E,
        id: Uuid,
        time_spent_minutes: i64,
        updated_at: DateTime<Utc>,
    ) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            "UPDATE retro_sprint_member_tasks SET time_spent_minutes = ?, updated_at = ? WHERE id = ?",
        )
        .bind(time_spent_minutes)
        .bind(updated_at.timestamp())
        .bind(id.to_string())
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn update_points<'e, E>(
        executor: E,
        id: Uuid,
        points_earned: f64,
        points_assigned: Option<f64>,
        updated_at: DateTime<Utc>,
    ) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
                UPDATE retro_sprint_member_tasks
                SET points_earned = ?, points_assigned = ?, updated_at = ?
                WHERE id = ?
            "#,
        )
        .bind(points_earned)
        .bind(points_assigned)
        .bind(updated_at.timestamp())
        .bind(id.to_string())
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Every live member-task of `task_id`, across all sprints, with the
    /// owning sprint's status. Deleted sprints are left out.
    pub async fn find_points_by_task<'e, E>(
        executor: E,
        task_id: Uuid,
    ) -> DbErrorResult<Vec<MemberTaskPoints>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let rows = sqlx::query_as::<_, MemberTaskPointsRow>(
            r#"
                SELECT smt.id AS member_task_id,
                       s.id AS sprint_id,
                       s.status AS sprint_status,
                       smt.time_spent_minutes,
                       smt.points_earned,
                       smt.points_assigned
                FROM retro_sprint_member_tasks smt
                JOIN retro_sprint_tasks st ON st.id = smt.sprint_task_id
                JOIN retro_sprints s ON s.id = st.sprint_id
                WHERE st.task_id = ?
                  AND smt.deleted_at IS NULL
                  AND st.deleted_at IS NULL
                  AND s.deleted_at IS NULL
                  AND s.status <> 'deleted'
                ORDER BY s.start_date, s.created_at, smt.created_at, smt.id
            "#,
        )
        .bind(task_id.to_string())
        .fetch_all(executor)
        .await?;

        rows.into_iter()
            .map(|r| {
                Ok(MemberTaskPoints {
                    member_task_id: row_decode::uuid(&r.member_task_id, "sprint_member_task.id")?,
                    sprint_id: row_decode::uuid(&r.sprint_id, "sprint.id")?,
                    sprint_status: row_decode::parse(&r.sprint_status, "sprint.status")?,
                    time_spent_minutes: r.time_spent_minutes,
                    points_earned: r.points_earned,
                    points_assigned: r.points_assigned,
                })
            })
            .collect()
    }
}
