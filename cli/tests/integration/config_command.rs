//! Integration tests for `cats config`.
//!
//! Every test points `CONFIG` at a temp file so `~/.cats/config.yaml` is
//! never read.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const VALID: &str = "\
api: api.example.com
apps_domain: apps.example.com
admin_user: admin
admin_password: hunter2
org: cats-org
space: cats-space
";

fn cats() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cats"));
    cmd.env("NO_COLOR", "1");
    for var in [
        "CATS_API",
        "CATS_APPS_DOMAIN",
        "CATS_ADMIN_USER",
        "CATS_ADMIN_PASSWORD",
        "CATS_TIMEOUT_SEC",
        "CATS_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Returns a `TempDir` and the path of a config file inside it.
fn write_config(contents: &str) -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, contents).expect("write config");
    (dir, path.to_string_lossy().into_owned())
}

#[test]
fn test_config_help_shows_show_and_validate() {
    cats()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_config_show_masks_passwords() {
    let (_dir, path) = write_config(VALID);
    cats()
        .args(["config", "show"])
        .env("CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("api.example.com"))
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_config_show_json_applies_env_override() {
    let (_dir, path) = write_config(VALID);
    let output = cats()
        .args(["config", "show", "--json"])
        .env("CONFIG", &path)
        .env("CATS_API", "api.other.example.com")
        .output()
        .expect("run cats");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["config"]["api"], "api.other.example.com");
    assert_eq!(value["config"]["admin_password"], "********");
    assert_eq!(value["path"], path.as_str());
}

#[test]
fn test_config_flag_wins_over_env() {
    let (_dir, path) = write_config(VALID);
    cats()
        .args(["config", "show", "--config", &path])
        .env("CONFIG", "/nonexistent/cats.yaml")
        .assert()
        .success()
        .stdout(predicate::str::contains("cats-org"));
}

#[test]
fn test_config_validate_accepts_complete_config() {
    let (_dir, path) = write_config(VALID);
    cats()
        .args(["config", "validate"])
        .env("CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn test_config_validate_lists_every_problem() {
    let (_dir, path) = write_config("backend: warden\ndefault_timeout: 0\n");
    cats()
        .args(["config", "validate"])
        .env("CONFIG", &path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Missing required setting: api"))
        .stderr(predicate::str::contains("Unknown backend 'warden'"))
        .stderr(predicate::str::contains("default_timeout"));
}

#[test]
fn test_config_validate_json_reports_problems() {
    let (_dir, path) = write_config("org: o\n");
    let output = cats()
        .args(["config", "validate", "--json"])
        .env("CONFIG", &path)
        .output()
        .expect("run cats");
    assert_eq!(output.status.code(), Some(2));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["valid"], false);
    assert!(!value["problems"].as_array().unwrap().is_empty());
}

#[test]
fn test_missing_config_named_by_env_fails() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("absent.yaml");
    cats()
        .args(["config", "show"])
        .env("CONFIG", &path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_bad_timeout_override_is_config_error() {
    let (_dir, path) = write_config(VALID);
    cats()
        .args(["config", "show", "--json"])
        .env("CONFIG", &path)
        .env("CATS_TIMEOUT_SEC", "soon")
        .assert()
        .code(2)
        .stdout(predicate::str::contains(r#""code": "config_invalid""#));
}
