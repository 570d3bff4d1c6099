use crate::{TaskTrackerConfig, TaskTrackerProvider, TimeTrackerConfig, TimeTrackerProvider};

use googletest::prelude::*;

#[test]
fn given_tagged_json_when_parsed_then_provider_resolved() {
    let raw = r#"{
        "provider": "jira",
        "base_url": "https://tracker.example.com",
        "project_ref": "PROJ",
        "board_ref": "42",
        "credentials": { "api_token": "c2VjcmV0" }
    }"#;

    let config = TaskTrackerConfig::from_json(raw).unwrap();

    assert_that!(config.provider, eq(TaskTrackerProvider::Jira));
    assert_that!(config.board_ref, some(eq("42")));
    assert_that!(config.credentials.len(), eq(1));
}

#[test]
fn given_unknown_provider_when_parsed_then_error() {
    let raw = r#"{ "provider": "trello", "project_ref": "PROJ" }"#;

    assert_that!(TaskTrackerConfig::from_json(raw), err(anything()));
}

#[test]
fn given_empty_project_when_time_config_parsed_then_error() {
    let raw = r#"{ "provider": "toggl", "project": "  " }"#;

    assert_that!(TimeTrackerConfig::from_json(raw), err(anything()));
}

#[test]
fn given_time_config_when_serialized_then_secrets_not_in_debug() {
    let raw = r#"{ "provider": "clockify", "project": "P", "credentials": { "key": "abc" } }"#;
    let config = TimeTrackerConfig::from_json(raw).unwrap();

    assert_that!(config.provider, eq(TimeTrackerProvider::Clockify));
    assert_that!(format!("{:?}", config), not(contains_substring("abc")));
    assert_that!(
        TimeTrackerConfig::from_json(&config.to_json().unwrap()).unwrap(),
        eq(&config)
    );
}
