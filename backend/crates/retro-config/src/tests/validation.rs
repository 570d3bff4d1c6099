use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, err, ok};
use serial_test::serial;

fn validate_with(key: &'static str, value: &str) -> crate::ConfigErrorResult<()> {
    let _guard = EnvGuard::set(key, value);
    Config::load().unwrap().validate()
}

#[test]
#[serial]
fn given_absolute_database_path_when_validate_then_error() {
    let (_temp, _guard) = setup_config_dir();
    assert_that!(validate_with("RETRO_DATABASE_PATH", "/etc/retro.db"), err(anything()));
}

#[test]
#[serial]
fn given_parent_escape_in_database_path_when_validate_then_error() {
    let (_temp, _guard) = setup_config_dir();
    assert_that!(validate_with("RETRO_DATABASE_PATH", "../retro.db"), err(anything()));
}

#[test]
#[serial]
fn given_zero_max_connections_when_validate_then_error() {
    let (_temp, _guard) = setup_config_dir();
    assert_that!(
        validate_with("RETRO_DATABASE_MAX_CONNECTIONS", "0"),
        err(anything())
    );
}

#[test]
#[serial]
fn given_retry_attempts_over_max_when_validate_then_error() {
    let (_temp, _guard) = setup_config_dir();
    assert_that!(validate_with("RETRO_RETRY_MAX_ATTEMPTS", "11"), err(anything()));
}

#[test]
#[serial]
fn given_retry_attempts_at_max_when_validate_then_ok() {
    let (_temp, _guard) = setup_config_dir();
    assert_that!(validate_with("RETRO_RETRY_MAX_ATTEMPTS", "10"), ok(anything()));
}

#[test]
#[serial]
fn given_backoff_below_one_when_validate_then_error() {
    let (_temp, _guard) = setup_config_dir();
    assert_that!(
        validate_with("RETRO_RETRY_BACKOFF_MULTIPLIER", "0.5"),
        err(anything())
    );
}

#[test]
#[serial]
fn given_initial_delay_above_max_delay_when_validate_then_error() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _max = EnvGuard::set("RETRO_RETRY_MAX_DELAY_SECS", "1");
    let _initial = EnvGuard::set("RETRO_RETRY_INITIAL_DELAY_MS", "5000");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_poll_interval_below_min_when_validate_then_error() {
    let (_temp, _guard) = setup_config_dir();
    assert_that!(
        validate_with("RETRO_WORKER_POLL_INTERVAL_MS", "10"),
        err(anything())
    );
}

#[test]
#[serial]
fn given_too_many_concurrent_jobs_when_validate_then_error() {
    let (_temp, _guard) = setup_config_dir();
    assert_that!(
        validate_with("RETRO_WORKER_MAX_CONCURRENT_JOBS", "65"),
        err(anything())
    );
}
