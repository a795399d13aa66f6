//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `hotelbook` run from an empty directory with a clean environment
fn hotelbook(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hotelbook").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("HOTELBOOK_CONFIG")
        .env_remove("HOTELBOOK_ENVIRONMENT")
        .env_remove("HOTELBOOK_BIND")
        .env_remove("DATABASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    hotelbook(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_serve_help() {
    let dir = TempDir::new().unwrap();
    hotelbook(&dir)
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--bind"))
        .stdout(predicate::str::contains("--skip-migrations"));
}

#[test]
fn test_config_show_defaults_without_file() {
    let dir = TempDir::new().unwrap();
    hotelbook(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("environment = \"Production\""))
        .stdout(predicate::str::contains("127.0.0.1:5000"));
}

#[test]
fn test_config_show_merges_overlay_and_masks_secrets() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("appsettings.toml"),
        r#"
environment = "Development"

[database]
connection_string = "postgres://app:hunter2@db/hotelbook"

[auth]
api_keys = ["s3cret"]
"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("appsettings.Development.toml"),
        "[server]\nbind = \"0.0.0.0:8080\"\n",
    )
    .unwrap();

    hotelbook(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("environment = \"Development\""))
        .stdout(predicate::str::contains("0.0.0.0:8080"))
        .stdout(predicate::str::contains("app:***@db"))
        .stdout(predicate::str::contains("hunter2").not())
        .stdout(predicate::str::contains("s3cret").not());
}

#[test]
fn test_config_env_overrides_file() {
    let dir = TempDir::new().unwrap();
    hotelbook(&dir)
        .env("HOTELBOOK_BIND", "127.0.0.1:9999")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("127.0.0.1:9999"));
}

#[test]
fn test_config_show_rejects_invalid_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("broken.toml"), "[server\nbind = 1").unwrap();

    hotelbook(&dir)
        .args(["--config", "broken.toml", "config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.toml"));
}

#[test]
fn test_config_path_reports_overlay() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("hotel.toml"), "environment = \"Staging\"\n").unwrap();
    std::fs::write(dir.path().join("hotel.Staging.toml"), "").unwrap();

    hotelbook(&dir)
        .args(["config", "path", "--config", "hotel.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hotel.toml"))
        .stdout(predicate::str::contains("hotel.Staging.toml"));
}

#[test]
fn test_config_path_without_file() {
    let dir = TempDir::new().unwrap();
    hotelbook(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("appsettings.toml (not found, using defaults)"));
}
