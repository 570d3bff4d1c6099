//! Sprint synchronization and point allocation.
//!
//! A sync pass pulls tickets from the task tracker, folds each member's time
//! logs into member-task rows and records its outcome in the sync status
//! ledger. Point allocation runs separately, per sprint, on demand.

pub mod engine;
pub mod error;
pub mod estimate_rebalancer;
pub mod job_queue;
pub mod job_worker;
pub mod metrics;
pub mod point_allocator;
pub mod providers;
pub mod retry;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod sprint_locks;
pub mod sync_orchestrator;
pub mod sync_status_ledger;
pub mod task_reconciler;
pub mod time_log_reconciler;

#[cfg(test)]
mod tests;

pub use engine::SyncEngine;
pub use error::{Result, SyncError};
pub use estimate_rebalancer::EstimateRebalancer;
pub use job_queue::JobQueue;
pub use job_worker::JobWorker;
pub use metrics::SyncMetrics;
pub use point_allocator::{AllocationReport, PointAllocator};
pub use providers::{
    CredentialCipher, Credentials, PlaintextCipher, ProviderRegistry, TaskTracker,
    TaskTrackerFactory, TimeTracker, TimeTrackerFactory,
};
pub use retry::{IsRetryable, with_retry};
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use sprint_locks::SprintLocks;
pub use sync_orchestrator::{SyncOrchestrator, SyncReport, SyncScope};
pub use sync_status_ledger::SyncStatusLedger;
pub use task_reconciler::{TaskReconcileReport, TaskReconciler, UpsertOutcome};
pub use time_log_reconciler::{MemberTimeReport, MemberTimeSource, TimeLogReconciler};
