use crate::providers::{CredentialCipher, ProviderRegistry};
use crate::{
    EstimateRebalancer, JobQueue, JobWorker, PointAllocator, SprintLocks, SyncMetrics,
    SyncOrchestrator, SyncStatusLedger, TaskReconciler, TimeLogReconciler,
};

use retro_config::{RetryConfig, SyncConfig, WorkerConfig};

use std::sync::Arc;

use sqlx::SqlitePool;

/// Wires every component to one pool, one set of sprint locks and one
/// provider registry.
#[derive(Clone)]
pub struct SyncEngine {
    ledger: SyncStatusLedger,
    rebalancer: EstimateRebalancer,
    orchestrator: Arc<SyncOrchestrator>,
    allocator: Arc<PointAllocator>,
    queue: JobQueue,
    metrics: SyncMetrics,
}

impl SyncEngine {
    pub fn new(
        pool: SqlitePool,
        registry: ProviderRegistry,
        cipher: Arc<dyn CredentialCipher>,
        sync_config: &SyncConfig,
        retry: RetryConfig,
    ) -> Self {
        let metrics = SyncMetrics::new();
        let locks = SprintLocks::new();
        let include_completed = sync_config.include_completed_sprints;

        let ledger = SyncStatusLedger::new(pool.clone());
        let rebalancer = EstimateRebalancer::new(pool.clone(), include_completed, metrics.clone());
        let task_reconciler = TaskReconciler::new(pool.clone(), rebalancer.clone(), metrics.clone());
        let time_log_reconciler =
            TimeLogReconciler::new(pool.clone(), task_reconciler.clone(), metrics.clone());

        let orchestrator = SyncOrchestrator::new(
            pool.clone(),
            Arc::new(registry),
            cipher,
            ledger.clone(),
            task_reconciler,
            time_log_reconciler,
            locks.clone(),
            retry,
            metrics.clone(),
        );
        let allocator = PointAllocator::new(pool.clone(), locks, include_completed, metrics.clone());
        let queue = JobQueue::new(pool, ledger.clone(), metrics.clone());

        Self {
            ledger,
            rebalancer,
            orchestrator: Arc::new(orchestrator),
            allocator: Arc::new(allocator),
            queue,
            metrics,
        }
    }

    pub fn ledger(&self) -> &SyncStatusLedger {
        &self.ledger
    }

    pub fn rebalancer(&self) -> &EstimateRebalancer {
        &self.rebalancer
    }

    pub fn orchestrator(&self) -> &SyncOrchestrator {
        &self.orchestrator
    }

    pub fn allocator(&self) -> &PointAllocator {
        &self.allocator
    }

    pub fn queue(&self) -> &JobQueue {
        &self.queue
    }

    pub fn worker(&self, config: WorkerConfig) -> JobWorker {
        JobWorker::new(
            self.queue.clone(),
            Arc::clone(&self.orchestrator),
            Arc::clone(&self.allocator),
            config,
            self.metrics.clone(),
        )
    }
}
