#![allow(dead_code)]

use retro_core::{DateRange, TaskRecord, TaskTrackerConfig, TimeLog, TimeTrackerConfig};
use retro_sync::providers::{TASK_TRACKER_SERVICE, TIME_TRACKER_SERVICE};
use retro_sync::{
    Credentials, Result as SyncResult, SyncError, TaskTracker, TaskTrackerFactory, TimeTracker,
    TimeTrackerFactory,
};

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

/// In-memory task tracker. Failures are injected per call.
#[derive(Default)]
pub struct FakeTaskTracker {
    sprint_tasks: Mutex<Vec<TaskRecord>>,
    details: Mutex<HashMap<String, TaskRecord>>,
    /// Fail every listing with a non-retryable error.
    fail_listing: Mutex<bool>,
    /// Fail this many listings with a retryable error first.
    transient_failures: AtomicUsize,
    list_calls: AtomicUsize,
    detail_calls: AtomicUsize,
}

impl FakeTaskTracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_sprint_tasks(&self, records: Vec<TaskRecord>) {
        *self.sprint_tasks.lock().unwrap() = records;
    }

    /// Makes `key` resolvable through `get_task_details`.
    pub fn add_details(&self, key: &str, record: TaskRecord) {
        self.details.lock().unwrap().insert(key.to_string(), record);
    }

    pub fn fail_listing(&self, fail: bool) {
        *self.fail_listing.lock().unwrap() = fail;
    }

    pub fn fail_transiently(&self, times: usize) {
        self.transient_failures.store(times, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskTracker for FakeTaskTracker {
    async fn list_sprint_tasks(
        &self,
        _sprint_ref: &str,
        _range: DateRange,
    ) -> SyncResult<Vec<TaskRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_listing.lock().unwrap() {
            return Err(SyncError::external(TASK_TRACKER_SERVICE, "board is unavailable"));
        }
        let pending = self.transient_failures.load(Ordering::SeqCst);
        if pending > 0 {
            self.transient_failures.store(pending - 1, Ordering::SeqCst);
            return Err(SyncError::transient(TASK_TRACKER_SERVICE, "503 Service Unavailable"));
        }
        Ok(self.sprint_tasks.lock().unwrap().clone())
    }

    async fn get_task_details(&self, key: &str) -> SyncResult<Option<TaskRecord>> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.details.lock().unwrap().get(key).cloned())
    }

    async fn validate_config(&self) -> SyncResult<()> {
        Ok(())
    }
}

/// In-memory time tracker returning the same logs for any project and window.
#[derive(Default)]
pub struct FakeTimeTracker {
    logs: Mutex<Vec<TimeLog>>,
    fail: Mutex<bool>,
    calls: AtomicUsize,
}

impl FakeTimeTracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_logs(&self, logs: Vec<TimeLog>) {
        *self.logs.lock().unwrap() = logs;
    }

    pub fn fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TimeTracker for FakeTimeTracker {
    async fn list_project_time_logs(
        &self,
        _project: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> SyncResult<Vec<TimeLog>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail.lock().unwrap() {
            return Err(SyncError::external(TIME_TRACKER_SERVICE, "401 Unauthorized"));
        }
        Ok(self.logs.lock().unwrap().clone())
    }
}

pub struct FakeTaskTrackerFactory(pub Arc<FakeTaskTracker>);

impl TaskTrackerFactory for FakeTaskTrackerFactory {
    fn create(
        &self,
        _config: &TaskTrackerConfig,
        _credentials: Credentials,
    ) -> SyncResult<Arc<dyn TaskTracker>> {
        Ok(self.0.clone())
    }
}

pub struct FakeTimeTrackerFactory(pub Arc<FakeTimeTracker>);

impl TimeTrackerFactory for FakeTimeTrackerFactory {
    fn create(
        &self,
        _config: &TimeTrackerConfig,
        _credentials: Credentials,
    ) -> SyncResult<Arc<dyn TimeTracker>> {
        Ok(self.0.clone())
    }
}
