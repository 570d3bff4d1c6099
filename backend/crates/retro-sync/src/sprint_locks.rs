use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

/// One async mutex per sprint. Sprint sync, member sync and point
/// allocation for the same sprint never interleave inside this process.
/// Idle entries are pruned whenever a new sprint is locked, so the map holds
/// the sprints in use plus at most the ones released since the last insert.
#[derive(Clone, Default)]
pub struct SprintLocks {
    locks: Arc<RwLock<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl SprintLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, sprint_id: Uuid) -> OwnedMutexGuard<()> {
        self.lock_for(sprint_id).await.lock_owned().await
    }

    async fn lock_for(&self, sprint_id: Uuid) -> Arc<Mutex<()>> {
        {
            let locks = self.locks.read().await;
            if let Some(lock) = locks.get(&sprint_id) {
                return lock.clone();
            }
        }

        let mut locks = self.locks.write().await;
        // Entries only the map references are neither held nor awaited.
        locks.retain(|id, lock| *id == sprint_id || Arc::strong_count(lock) > 1);
        locks
            .entry(sprint_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    #[cfg(test)]
    pub(crate) async fn tracked(&self) -> usize {
        self.locks.read().await.len()
    }
}
