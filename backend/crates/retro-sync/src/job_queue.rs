//! Persistent job queue. An identical job that is still waiting absorbs new
//! enqueues; a job that already started does not.

use crate::{Result as SyncResult, SyncError, SyncMetrics, SyncStatusLedger};

use retro_core::{SyncJob, SyncStatus};
use retro_db::{JobRecord, JobRepository, SprintMemberRepository, SprintRepository};

use log::{debug, info, warn};
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Clone)]
pub struct JobQueue {
    pool: SqlitePool,
    ledger: SyncStatusLedger,
    metrics: SyncMetrics,
}

impl JobQueue {
    pub fn new(pool: SqlitePool, ledger: SyncStatusLedger, metrics: SyncMetrics) -> Self {
        Self {
            pool,
            ledger,
            metrics,
        }
    }

    /// Returns `None` when an identical job is already queued. A fresh sync
    /// job also appends `Queued` to its sprint's ledger.
    pub async fn enqueue(&self, job: SyncJob) -> SyncResult<Option<JobRecord>> {
        let ledger_sprint = self.ledger_sprint(&job).await?;

        let Some(record) = JobRepository::enqueue(&self.pool, &job).await? else {
            self.metrics.job_deduplicated(job.job_name());
            debug!("job {} {} already queued", job.job_name(), job.args_key());
            return Ok(None);
        };

        if let Some(sprint_id) = ledger_sprint {
            self.ledger.append(sprint_id, SyncStatus::Queued, None).await?;
        }
        self.metrics.job_enqueued(job.job_name());
        info!("job {} queued: {} {}", record.id, job.job_name(), job.args_key());

        Ok(Some(record))
    }

    /// Claims the oldest queued job, marking it running.
    pub async fn dequeue(&self) -> SyncResult<Option<JobRecord>> {
        let mut tx = self.pool.begin().await?;
        let record = JobRepository::claim_next(&mut tx).await?;
        tx.commit().await?;
        Ok(record)
    }

    pub async fn complete(&self, job_id: Uuid) -> SyncResult<()> {
        JobRepository::mark_done(&self.pool, job_id).await?;
        Ok(())
    }

    pub async fn fail(&self, job_id: Uuid, error: &str) -> SyncResult<()> {
        JobRepository::mark_failed(&self.pool, job_id, error).await?;
        Ok(())
    }

    pub async fn find(&self, job_id: Uuid) -> SyncResult<Option<JobRecord>> {
        Ok(JobRepository::find_by_id(&self.pool, job_id).await?)
    }

    /// Fails jobs a previous process left running. Call before starting a
    /// worker.
    pub async fn recover_abandoned(&self) -> SyncResult<u64> {
        let count = JobRepository::fail_abandoned(&self.pool).await?;
        if count > 0 {
            warn!("{} job(s) were running when the last worker stopped; marked failed", count);
        }
        Ok(count)
    }

    /// Sprint whose ledger tracks `job`; allocation jobs have none.
    async fn ledger_sprint(&self, job: &SyncJob) -> SyncResult<Option<Uuid>> {
        match *job {
            SyncJob::SyncSprint { sprint_id } => {
                let sprint = SprintRepository::find_by_id(&self.pool, sprint_id)
                    .await?
                    .ok_or_else(|| SyncError::not_found("Sprint", sprint_id))?;
                Ok(Some(sprint.id))
            }
            SyncJob::SyncSprintMember { sprint_member_id } => {
                let member = SprintMemberRepository::find_by_id(&self.pool, sprint_member_id)
                    .await?
                    .ok_or_else(|| SyncError::not_found("SprintMember", sprint_member_id))?;
                Ok(Some(member.sprint_id))
            }
            SyncJob::AssignPoints { .. } => Ok(None),
        }
    }
}
