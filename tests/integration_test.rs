use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated HOME with its own store
struct Sandbox {
    home: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            home: tempfile::tempdir().unwrap(),
        }
    }

    /// Sandbox whose simulated runs always succeed without warnings
    fn always_succeeding() -> Self {
        let sandbox = Self::new();
        sandbox.write_config("success_rate = 1.0\ndata_warning_rate = 0.0\npermissions_warning_rate = 0.0\n");
        sandbox
    }

    fn write_config(&self, toml: &str) {
        let dir = self.home.path().join(".schemashift");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), toml).unwrap();
    }

    fn store_path(&self) -> PathBuf {
        self.home.path().join("store.json")
    }

    fn home(&self) -> &Path {
        self.home.path()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("schemashift").unwrap();
        cmd.env("HOME", self.home())
            .env("NO_COLOR", "1")
            .env("CLICOLOR", "0")
            .env_remove("RUST_LOG")
            .arg("--store")
            .arg(self.store_path())
            .arg("--fast");
        cmd
    }

    fn create_add_email(&self) {
        self.cmd()
            .args(["create", "add_email", "--type", "add_field", "--config"])
            .arg(r#"{"collection": "users", "field": "email"}"#)
            .assert()
            .success()
            .stdout(predicate::str::contains("Created migration #1"));
    }
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("schemashift").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Schema migration lifecycle manager"))
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("schemashift").unwrap();
    cmd.arg("--version").assert().success();
}

#[test]
fn test_missing_command() {
    let mut cmd = Command::cargo_bin("schemashift").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_create_and_list() {
    let sandbox = Sandbox::new();
    sandbox.create_add_email();

    sandbox
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("add_email"))
        .stdout(predicate::str::contains("[Pending]"));

    assert!(sandbox.store_path().exists());
}

#[test]
fn test_create_rejects_empty_name() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["create", "  ", "--type", "add_field", "--config", "{}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn test_create_rejects_malformed_config() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["create", "broken", "--type", "add_field", "--config", "{ not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn test_create_from_template() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["create", "email_index", "--template", "create_index"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Create Index"));

    sandbox
        .cmd()
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sparse\": false"));
}

#[test]
fn test_show_missing_migration() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["show", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Migration not found: 42"));
}

#[test]
fn test_execute_resolves_to_terminal_status() {
    let sandbox = Sandbox::new();
    sandbox.create_add_email();

    sandbox
        .cmd()
        .args(["execute", "1", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("completed").or(predicate::str::contains("failed")));

    sandbox
        .cmd()
        .args(["validations", "--migration", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pre-check Passed"));
}

#[test]
fn test_execute_then_rollback() {
    let sandbox = Sandbox::always_succeeding();
    sandbox.create_add_email();

    sandbox
        .cmd()
        .args(["execute", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Commit: feat: add_email"));

    sandbox
        .cmd()
        .args(["rollback", "1", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Commit: revert: add_email"));

    sandbox
        .cmd()
        .args(["commits", "--migration", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("feat: add_email"))
        .stdout(predicate::str::contains("revert: add_email"));

    sandbox
        .cmd()
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Pending]"))
        .stdout(predicate::str::contains("  8. Reverting schema changes..."))
        .stdout(predicate::str::contains("  9. Rollback completed successfully"))
        .stdout(predicate::str::contains(" 10. ").not());
}

#[test]
fn test_strict_rollback_of_pending_is_rejected() {
    let sandbox = Sandbox::new();
    sandbox.create_add_email();

    sandbox
        .cmd()
        .args(["rollback", "1", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot roll back migration 1 while it is pending"));
}

#[test]
fn test_forced_rollback_of_pending() {
    let sandbox = Sandbox::new();
    sandbox.create_add_email();

    sandbox
        .cmd()
        .args(["rollback", "1", "-y", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rolled back"));
}

#[test]
fn test_templates() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("templates")
        .assert()
        .success()
        .stdout(predicate::str::contains("Create Users Collection"))
        .stdout(predicate::str::contains("Create Email Index"));
}

#[test]
fn test_invalid_config_file() {
    let sandbox = Sandbox::new();
    sandbox.write_config("success_rate = 3.0\n");

    sandbox
        .cmd()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("success_rate must be between 0 and 1"));
}
