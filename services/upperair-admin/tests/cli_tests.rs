//! End-to-end tests of the admin binaries that need no external services.

use assert_cmd::Command;
use predicates::prelude::*;

fn admin(bin: &str) -> Command {
    let mut cmd = Command::cargo_bin(bin).unwrap();
    for var in [
        "DATABASE_URL",
        "CACHE_URL",
        "CACHE_KEY_PREFIX",
        "TASK_RUNNER_URL",
        "TASK_TIMEOUT_SECS",
        "UPPERAIR_ADMIN_CONFIG",
        "LOG_FORMAT",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_clear_cache_with_dummy_backend() {
    admin("clear_cache")
        .args(["--keys", "--cache-url", "dummy://", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Cache backend does not support key listing",
        ))
        .stdout(predicate::str::contains("✓ Cache cleared successfully!"))
        .stdout(predicate::str::contains("All other cached data cleared"));
}

#[test]
fn test_no_color_env_does_not_break_startup() {
    for value in ["1", "true", "yes"] {
        admin("clear_cache")
            .env("NO_COLOR", value)
            .args(["--cache-url", "dummy://"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Cache cleared successfully"))
            .stdout(predicate::str::contains("\u{1b}[").not());
    }
}

#[test]
fn test_fetch_upperair_exits_zero_with_no_color_env() {
    admin("fetch_upperair")
        .env("NO_COLOR", "1")
        .args([
            "--task-runner-url",
            "http://127.0.0.1:9/internal/tasks",
            "--timeout-secs",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Error fetching upper air data:"));
}

#[test]
fn test_clear_cache_rejects_unknown_backend() {
    admin("clear_cache")
        .args(["--cache-url", "memcached://localhost:11211", "--no-color"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("memcached"));
}

#[test]
fn test_clear_cache_reads_config_file() {
    let file = test_utils::config_file("cache_url: dummy://\n");

    admin("clear_cache")
        .arg("--config")
        .arg(file.path())
        .arg("--no-color")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache cleared successfully"));
}

#[test]
fn test_fetch_upperair_never_fails() {
    admin("fetch_upperair")
        .args([
            "--task-runner-url",
            "http://127.0.0.1:9/internal/tasks",
            "--timeout-secs",
            "2",
            "--no-color",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting upper air data fetch..."))
        .stdout(predicate::str::contains("Error fetching upper air data:"));
}

#[test]
fn test_migrate_plan_needs_no_database() {
    admin("migrate_upperair")
        .args(["--plan", "--no-color"])
        .env("DATABASE_URL", "postgresql://nobody@127.0.0.1:9/none")
        .assert()
        .success()
        .stdout(predicate::str::contains("0009_add_upperairmap_level"))
        .stdout(predicate::str::contains("UPPERAIRMAP (Upper Air Map)"));
}

#[test]
fn test_help_lists_command_flags() {
    admin("check_upperair_data")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--database-url"))
        .stdout(predicate::str::contains("--config"));
}
