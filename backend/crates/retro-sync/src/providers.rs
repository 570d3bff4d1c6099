//! Capability boundary towards the external task tracker and time tracker.
//!
//! Wire adapters live outside this crate. They register a factory per
//! provider tag in a [`ProviderRegistry`], which turns a stored config into a
//! ready client after the [`CredentialCipher`] has decrypted its secrets.

use crate::{Result as SyncResult, SyncError};

use retro_core::{
    DateRange, EncryptedSecret, TaskRecord, TaskTrackerConfig, TaskTrackerProvider, TimeLog,
    TimeTrackerConfig, TimeTrackerProvider,
};

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

pub const TASK_TRACKER_SERVICE: &str = "task tracker";
pub const TIME_TRACKER_SERVICE: &str = "time tracker";

#[async_trait]
pub trait TaskTracker: Send + Sync {
    async fn list_sprint_tasks(
        &self,
        sprint_ref: &str,
        range: DateRange,
    ) -> SyncResult<Vec<TaskRecord>>;

    /// `Ok(None)` when the tracker does not know `key`.
    async fn get_task_details(&self, key: &str) -> SyncResult<Option<TaskRecord>>;

    async fn validate_config(&self) -> SyncResult<()>;
}

#[async_trait]
pub trait TimeTracker: Send + Sync {
    async fn list_project_time_logs(
        &self,
        project: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SyncResult<Vec<TimeLog>>;
}

/// Decrypts credential fields. Key management is the implementor's concern.
pub trait CredentialCipher: Send + Sync {
    fn decrypt(&self, secret: &EncryptedSecret) -> SyncResult<String>;
}

/// Treats stored credentials as plaintext, for deployments that keep the
/// database itself encrypted.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextCipher;

impl CredentialCipher for PlaintextCipher {
    fn decrypt(&self, secret: &EncryptedSecret) -> SyncResult<String> {
        Ok(secret.0.clone())
    }
}

/// Decrypted credential values, keyed like the stored config. Debug output
/// never shows the values.
#[derive(Clone, Default)]
pub struct Credentials(BTreeMap<String, String>);

impl Credentials {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    fn decrypt(
        encrypted: &BTreeMap<String, EncryptedSecret>,
        cipher: &dyn CredentialCipher,
    ) -> SyncResult<Self> {
        let mut values = BTreeMap::new();
        for (name, secret) in encrypted {
            let value = cipher.decrypt(secret).map_err(|e| {
                SyncError::configuration(format!("Cannot decrypt credential {}: {}", name, e))
            })?;
            values.insert(name.clone(), value);
        }
        Ok(Self(values))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.keys()).finish()
    }
}

pub trait TaskTrackerFactory: Send + Sync {
    fn create(
        &self,
        config: &TaskTrackerConfig,
        credentials: Credentials,
    ) -> SyncResult<Arc<dyn TaskTracker>>;
}

pub trait TimeTrackerFactory: Send + Sync {
    fn create(
        &self,
        config: &TimeTrackerConfig,
        credentials: Credentials,
    ) -> SyncResult<Arc<dyn TimeTracker>>;
}

#[derive(Clone, Default)]
pub struct ProviderRegistry {
    task_trackers: HashMap<TaskTrackerProvider, Arc<dyn TaskTrackerFactory>>,
    time_trackers: HashMap<TimeTrackerProvider, Arc<dyn TimeTrackerFactory>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_task_tracker(
        &mut self,
        provider: TaskTrackerProvider,
        factory: Arc<dyn TaskTrackerFactory>,
    ) -> &mut Self {
        self.task_trackers.insert(provider, factory);
        self
    }

    pub fn register_time_tracker(
        &mut self,
        provider: TimeTrackerProvider,
        factory: Arc<dyn TimeTrackerFactory>,
    ) -> &mut Self {
        self.time_trackers.insert(provider, factory);
        self
    }

    pub fn task_tracker(
        &self,
        config: &TaskTrackerConfig,
        cipher: &dyn CredentialCipher,
    ) -> SyncResult<Arc<dyn TaskTracker>> {
        config.validate()?;
        let factory = self.task_trackers.get(&config.provider).ok_or_else(|| {
            SyncError::configuration(format!(
                "No task tracker adapter registered for {}",
                config.provider.as_str()
            ))
        })?;
        let credentials = Credentials::decrypt(&config.credentials, cipher)?;
        factory.create(config, credentials)
    }

    pub fn time_tracker(
        &self,
        config: &TimeTrackerConfig,
        cipher: &dyn CredentialCipher,
    ) -> SyncResult<Arc<dyn TimeTracker>> {
        config.validate()?;
        let factory = self.time_trackers.get(&config.provider).ok_or_else(|| {
            SyncError::configuration(format!(
                "No time tracker adapter registered for {}",
                config.provider.as_str()
            ))
        })?;
        let credentials = Credentials::decrypt(&config.credentials, cipher)?;
        factory.create(config, credentials)
    }
}
