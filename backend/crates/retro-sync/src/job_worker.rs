use crate::{
    JobQueue, PointAllocator, Result as SyncResult, ShutdownCoordinator, SyncMetrics,
    SyncOrchestrator,
};

use retro_config::WorkerConfig;
use retro_core::SyncJob;
use retro_db::JobRecord;

use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::sleep;

/// Polls the job queue and runs up to `max_concurrent_jobs` jobs at once.
/// Jobs for the same sprint still serialize on the sprint lock.
#[derive(Clone)]
pub struct JobWorker {
    queue: JobQueue,
    orchestrator: Arc<SyncOrchestrator>,
    allocator: Arc<PointAllocator>,
    config: WorkerConfig,
    metrics: SyncMetrics,
}

impl JobWorker {
    pub fn new(
        queue: JobQueue,
        orchestrator: Arc<SyncOrchestrator>,
        allocator: Arc<PointAllocator>,
        config: WorkerConfig,
        metrics: SyncMetrics,
    ) -> Self {
        Self {
            queue,
            orchestrator,
            allocator,
            config,
            metrics,
        }
    }

    /// Runs until `shutdown` fires, then waits for in-flight jobs to finish.
    pub async fn run(&self, shutdown: &ShutdownCoordinator) {
        let mut shutdown_guard = shutdown.subscribe_guard();
        let slots = Arc::new(Semaphore::new(self.config.max_concurrent_jobs));
        let mut in_flight = JoinSet::new();

        info!(
            "Job worker started ({} slot(s), poll every {:?})",
            self.config.max_concurrent_jobs,
            self.config.poll_interval()
        );

        loop {
            while let Some(joined) = in_flight.try_join_next() {
                if let Err(e) = joined {
                    error!("Job task panicked: {}", e);
                }
            }

            let permit = tokio::select! {
                permit = Arc::clone(&slots).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
                _ = shutdown_guard.wait() => break,
            };

            let claimed = match self.queue.dequeue().await {
                Ok(claimed) => claimed,
                Err(e) => {
                    error!("Failed to claim next job: {}", e);
                    None
                }
            };

            match claimed {
                Some(record) => {
                    let worker = self.clone();
                    in_flight.spawn(async move {
                        worker.process(record).await;
                        drop(permit);
                    });
                }
                None => {
                    drop(permit);
                    tokio::select! {
                        _ = sleep(self.config.poll_interval()) => {}
                        _ = shutdown_guard.wait() => break,
                    }
                }
            }
        }

        if !in_flight.is_empty() {
            info!("Waiting for {} in-flight job(s)", in_flight.len());
        }
        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                error!("Job task panicked: {}", e);
            }
        }
        info!("Job worker stopped");
    }

    /// Claims and runs a single job. Returns the job as stored afterwards, or
    /// `None` when the queue was empty.
    pub async fn run_next(&self) -> SyncResult<Option<JobRecord>> {
        let Some(record) = self.queue.dequeue().await? else {
            return Ok(None);
        };
        let id = record.id;
        self.process(record).await;
        self.queue.find(id).await
    }

    async fn process(&self, record: JobRecord) {
        let job_name = record.job.job_name();
        debug!("job {} started: {} {}", record.id, job_name, record.job.args_key());

        let outcome = self.execute(record.job).await;
        self.metrics.job_finished(job_name, outcome.is_ok());

        let stored = match &outcome {
            Ok(()) => self.queue.complete(record.id).await,
            Err(e) => {
                warn!("job {} ({}) failed: {}", record.id, job_name, e);
                self.queue.fail(record.id, &e.to_string()).await
            }
        };
        if let Err(e) = stored {
            error!("Failed to record outcome of job {}: {}", record.id, e);
        }
    }

    async fn execute(&self, job: SyncJob) -> SyncResult<()> {
        match job {
            SyncJob::SyncSprint { sprint_id } => {
                self.orchestrator.sync_sprint(sprint_id).await?;
            }
            SyncJob::SyncSprintMember { sprint_member_id } => {
                self.orchestrator.sync_sprint_member(sprint_member_id).await?;
            }
            SyncJob::AssignPoints { sprint_id } => {
                self.allocator.assign_points(sprint_id).await?;
            }
        }
        Ok(())
    }
}
