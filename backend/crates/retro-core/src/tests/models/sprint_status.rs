use crate::SprintStatus;

use std::str::FromStr;

#[test]
fn test_sprint_status_as_str() {
    assert_eq!(SprintStatus::Draft.as_str(), "draft");
    assert_eq!(SprintStatus::Active.as_str(), "active");
    assert_eq!(SprintStatus::Completed.as_str(), "completed");
    assert_eq!(SprintStatus::Deleted.as_str(), "deleted");
}

#[test]
fn test_sprint_status_from_str() {
    assert_eq!(SprintStatus::from_str("draft").unwrap(), SprintStatus::Draft);
    assert_eq!(
        SprintStatus::from_str("completed").unwrap(),
        SprintStatus::Completed
    );
    assert!(SprintStatus::from_str("planned").is_err());
}

#[test]
fn test_sprint_status_non_draft() {
    assert!(SprintStatus::Active.is_non_draft());
    assert!(SprintStatus::Completed.is_non_draft());
    assert!(!SprintStatus::Draft.is_non_draft());
    assert!(!SprintStatus::Deleted.is_non_draft());
}
