use crate::DEFAULT_INCLUDE_COMPLETED_SPRINTS;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Let estimate rebalancing and point allocation rewrite points in
    /// Completed sprints. When false those points stay as they are but
    /// still count against the task estimate.
    pub include_completed_sprints: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            include_completed_sprints: DEFAULT_INCLUDE_COMPLETED_SPRINTS,
        }
    }
}
