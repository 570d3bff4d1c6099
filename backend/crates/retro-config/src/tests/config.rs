use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, eq, err, none, ok, some};
use log::LevelFilter;
use serial_test::serial;

#[test]
#[serial]
fn given_no_config_file_when_load_then_defaults_are_used() {
    // Given
    let (_temp, _guard) = setup_config_dir();

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.database.path, eq("retro.db"));
    assert_that!(config.database.max_connections, eq(5));
    assert_that!(config.sync.include_completed_sprints, eq(true));
    assert_that!(config.worker.max_concurrent_jobs, eq(4));
    assert_that!(config.logging.file, none());
    assert_that!(config.validate(), ok(anything()));
}

#[test]
#[serial]
fn given_toml_file_when_load_then_file_values_are_used() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        r#"
            [database]
            path = "data/retro.db"

            [logging]
            level = "debug"
            file = "worker.log"

            [sync]
            include_completed_sprints = false

            [worker]
            poll_interval_ms = 250
        "#,
    )
    .unwrap();

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.database.path, eq("data/retro.db"));
    assert_that!(*config.logging.level, eq(LevelFilter::Debug));
    assert_that!(config.logging.file, some(eq("worker.log")));
    assert_that!(config.sync.include_completed_sprints, eq(false));
    assert_that!(config.worker.poll_interval_ms, eq(250));
    assert_that!(config.retry.max_attempts, eq(3));
}

#[test]
#[serial]
fn given_env_var_and_toml_when_load_then_env_var_wins() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        "[sync]\ninclude_completed_sprints = true\n",
    )
    .unwrap();
    let _flag = EnvGuard::set("RETRO_SYNC_INCLUDE_COMPLETED_SPRINTS", "false");
    let _jobs = EnvGuard::set("RETRO_WORKER_MAX_CONCURRENT_JOBS", "8");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.sync.include_completed_sprints, eq(false));
    assert_that!(config.worker.max_concurrent_jobs, eq(8));
}

#[test]
#[serial]
fn given_unparseable_env_var_when_load_then_value_is_unchanged() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _attempts = EnvGuard::set("RETRO_RETRY_MAX_ATTEMPTS", "many");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.retry.max_attempts, eq(3));
}

#[test]
#[serial]
fn given_unknown_log_level_when_load_then_falls_back_to_info() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _level = EnvGuard::set("RETRO_LOG_LEVEL", "chatty");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(*config.logging.level, eq(LevelFilter::Info));
}

#[test]
#[serial]
fn given_malformed_toml_when_load_then_error() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(temp.path().join("config.toml"), "[database\npath = 1").unwrap();

    // When
    let result = Config::load();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_config_dir_when_resolving_database_path_then_joined_to_dir() {
    // Given
    let (temp, _guard) = setup_config_dir();

    // When
    let config = Config::load().unwrap();
    let path = config.database_path().unwrap();

    // Then
    assert_that!(path, eq(&temp.path().join("retro.db")));
}
