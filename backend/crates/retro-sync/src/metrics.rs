use std::time::Duration;

use metrics::{counter, histogram};
use retro_core::SyncStatus;

/// Counters and histograms for the sync engine, all under `retro_sync.`.
#[derive(Clone)]
pub struct SyncMetrics {
    prefix: &'static str,
}

impl SyncMetrics {
    pub fn new() -> Self {
        Self {
            prefix: "retro_sync",
        }
    }

    pub fn sync_started(&self, scope: &str) {
        counter!(format!("{}.sync.started", self.prefix)).increment(1);
        counter!(format!("{}.sync.started.{}", self.prefix, scope)).increment(1);
    }

    pub fn sync_finished(&self, status: SyncStatus, duration: Duration) {
        counter!(format!("{}.sync.{}", self.prefix, status.as_str())).increment(1);
        histogram!(format!("{}.sync.duration_ms", self.prefix))
            .record(duration.as_millis() as f64);
    }

    pub fn tasks_reconciled(&self, count: usize) {
        counter!(format!("{}.tasks.reconciled", self.prefix)).increment(count as u64);
    }

    pub fn stub_created(&self) {
        counter!(format!("{}.tasks.stubbed", self.prefix)).increment(1);
    }

    pub fn key_resolved(&self) {
        counter!(format!("{}.time_logs.keys_resolved", self.prefix)).increment(1);
    }

    pub fn rebalance_applied(&self, rows: usize) {
        counter!(format!("{}.rebalance.applied", self.prefix)).increment(1);
        counter!(format!("{}.rebalance.rows", self.prefix)).increment(rows as u64);
    }

    pub fn allocation_written(&self, rows: usize) {
        counter!(format!("{}.allocation.rows", self.prefix)).increment(rows as u64);
    }

    pub fn job_enqueued(&self, job_name: &str) {
        counter!(format!("{}.jobs.enqueued.{}", self.prefix, job_name)).increment(1);
    }

    pub fn job_deduplicated(&self, job_name: &str) {
        counter!(format!("{}.jobs.deduplicated.{}", self.prefix, job_name)).increment(1);
    }

    pub fn job_finished(&self, job_name: &str, succeeded: bool) {
        let outcome = if succeeded { "done" } else { "failed" };
        counter!(format!("{}.jobs.{}.{}", self.prefix, outcome, job_name)).increment(1);
    }
}

impl Default for SyncMetrics {
    fn default() -> Self {
        Self::new()
    }
}
