use crate::SyncStatus;

use std::str::FromStr;

#[test]
fn test_sync_status_round_trips_through_str() {
    for status in [
        SyncStatus::NotSynced,
        SyncStatus::Queued,
        SyncStatus::Syncing,
        SyncStatus::Synced,
        SyncStatus::SyncFailed,
    ] {
        assert_eq!(SyncStatus::from_str(status.as_str()).unwrap(), status);
    }
    assert!(SyncStatus::from_str("failed").is_err());
}

#[test]
fn test_sync_status_terminal_states() {
    assert!(SyncStatus::Synced.is_terminal());
    assert!(SyncStatus::SyncFailed.is_terminal());
    assert!(SyncStatus::NotSynced.is_terminal());
    assert!(!SyncStatus::Queued.is_terminal());
    assert!(!SyncStatus::Syncing.is_terminal());
}

#[test]
fn test_sync_status_default() {
    assert_eq!(SyncStatus::default(), SyncStatus::NotSynced);
}
