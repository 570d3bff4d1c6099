use crate::Result as SyncResult;

use retro_core::{SprintSyncStatus, SyncStatus};
use retro_db::{SprintRepository, SprintSyncStatusRepository};

use chrono::Utc;
use log::debug;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Append-only history of sync transitions per sprint. Each append also
/// mirrors the state onto the sprint row, and stamps `last_synced_at` when
/// the new state is `Synced`.
#[derive(Clone)]
pub struct SyncStatusLedger {
    pool: SqlitePool,
}

impl SyncStatusLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn append(
        &self,
        sprint_id: Uuid,
        status: SyncStatus,
        message: Option<String>,
    ) -> SyncResult<SprintSyncStatus> {
        let entry = SprintSyncStatus::new(sprint_id, status, message);
        let synced_at = (status == SyncStatus::Synced).then(Utc::now);

        let mut tx = self.pool.begin().await?;
        SprintSyncStatusRepository::append(&mut *tx, &entry).await?;
        SprintRepository::update_sync_state(&mut *tx, sprint_id, status, synced_at).await?;
        tx.commit().await?;

        debug!("[sprint {}] sync status -> {}", sprint_id, status.as_str());
        Ok(entry)
    }

    pub async fn latest(&self, sprint_id: Uuid) -> SyncResult<Option<SprintSyncStatus>> {
        Ok(SprintSyncStatusRepository::latest(&self.pool, sprint_id).await?)
    }

    pub async fn history(&self, sprint_id: Uuid) -> SyncResult<Vec<SprintSyncStatus>> {
        Ok(SprintSyncStatusRepository::history(&self.pool, sprint_id).await?)
    }
}
