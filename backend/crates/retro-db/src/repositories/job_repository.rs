use crate::{DbError, Result as DbErrorResult, row_decode};

use retro_core::{JobStatus, SyncJob};

use std::collections::BTreeMap;
use std::panic::Location;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use uuid::Uuid;

pub struct JobRepository;

#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub id: Uuid,
    pub job: SyncJob,
    pub status: JobStatus,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow)]
struct JobRow {
    id: String,
    job_name: String,
    args_json: String,
    status: String,
    error: Option<String>,
    created_at: i64,
    started_at: Option<i64>,
    finished_at: Option<i64>,
}

impl JobRow {
    fn into_model(self) -> DbErrorResult<JobRecord> {
        let args: BTreeMap<String, String> =
            serde_json::from_str(&self.args_json).map_err(|e| DbError::Decode {
                message: format!("Invalid job.args_json: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        let job = SyncJob::from_parts(&self.job_name, &args).map_err(|e| DbError::Decode {
            message: format!("Invalid job {}: {}", self.job_name, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(JobRecord {
            id: row_decode::uuid(&self.id, "job.id")?,
            job,
            status: row_decode::parse(&self.status, "job.status")?,
            error: self.error,
            created_at: row_decode::timestamp(self.created_at, "job.created_at")?,
            started_at: row_decode::opt_timestamp(self.started_at, "job.started_at")?,
            finished_at: row_decode::opt_timestamp(self.finished_at, "job.finished_at")?,
        })
    }
}

const SELECT_JOB: &str = r#"
    SELECT id, job_name, args_json, status, error, created_at, started_at, finished_at
    FROM retro_jobs
"#;

impl JobRepository {
    /// Queues `job` unless an identical job is already waiting.
    /// Returns `None` when deduplicated.
    pub async fn enqueue<'e, E>(executor: E, job: &SyncJob) -> DbErrorResult<Option<JobRecord>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let args_json = serde_json::to_string(&job.args()).map_err(|e| DbError::Decode {
            message: format!("Cannot encode job args: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;
        let record = JobRecord {
            id: Uuid::new_v4(),
            job: *job,
            status: JobStatus::Queued,
            error: None,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        };

        let inserted = sqlx::query(
            r#"
                INSERT OR IGNORE INTO retro_jobs (
                    id, job_name, args_key, args_json, status, error,
                    created_at, started_at, finished_at
                ) VALUES (?, ?, ?, ?, ?, NULL, ?, NULL, NULL)
            "#,
        )
        .bind(record.id.to_string())
        .bind(job.job_name())
        .bind(job.args_key())
        .bind(args_json)
        .bind(JobStatus::Queued.as_str())
        .bind(record.created_at.timestamp())
        .execute(executor)
        .await?
        .rows_affected();

        Ok((inserted > 0).then_some(record))
    }

    /// Moves the oldest queued job to `running` and returns it.
    pub async fn claim_next(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    ) -> DbErrorResult<Option<JobRecord>> {
        let sql = format!(
            "{} WHERE status = 'queued' ORDER BY created_at, rowid LIMIT 1",
            SELECT_JOB
        );
        let Some(row) = sqlx::query_as::<_, JobRow>(&sql)
            .fetch_optional(&mut **tx)
            .await?
        else {
            return Ok(None);
        };

        let started_at = Utc::now();
        let claimed = sqlx::query(
            "UPDATE retro_jobs SET status = 'running', started_at = ? WHERE id = ? AND status = 'queued'",
        )
        .bind(started_at.timestamp())
        .bind(&row.id)
        .execute(&mut **tx)
        .await?
        .rows_affected();

        if claimed == 0 {
            return Ok(None);
        }

        let mut record = row.into_model()?;
        record.status = JobStatus::Running;
        record.started_at = Some(started_at);
        Ok(Some(record))
    }

    pub async fn mark_done<'e, E>(executor: E, id: Uuid) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query("UPDATE retro_jobs SET status = 'done', finished_at = ? WHERE id = ?")
            .bind(Utc::now().timestamp())
            .bind(id.to_string())
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn mark_failed<'e, E>(executor: E, id: Uuid, error: &str) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            "UPDATE retro_jobs SET status = 'failed', error = ?, finished_at = ? WHERE id = ?",
        )
        .bind(error)
        .bind(Utc::now().timestamp())
        .bind(id.to_string())
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Fails jobs left `running` by a previous process. Returns how many.
    pub async fn fail_abandoned<'e, E>(executor: E) -> DbErrorResult<u64>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let affected = sqlx::query(
            r#"
                UPDATE retro_jobs
                SET status = 'failed', error = 'worker stopped before completion', finished_at = ?
                WHERE status = 'running'
            "#,
        )
        .bind(Utc::now().timestamp())
        .execute(executor)
        .await?
        .rows_affected();

        Ok(affected)
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> DbErrorResult<Option<JobRecord>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let sql = format!("{} WHERE id = ?", SELECT_JOB);
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(executor)
            .await?;

        row.map(JobRow::into_model).transpose()
    }
}
