//! Integration tests for `cats run` that need no platform: selection,
//! validation and all-skipped suites.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const BASE: &str = "\
api: api.example.com
apps_domain: apps.example.com
admin_password: admin
org: cats-org
space: cats-space
";

fn cats_with_config(contents: &str) -> (TempDir, Command) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, contents).expect("write config");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cats"));
    cmd.env("NO_COLOR", "1")
        .env("CONFIG", &path)
        .env_remove("CATS_API")
        .env_remove("CATS_TIMEOUT_SEC");
    (dir, cmd)
}

#[test]
fn test_run_all_disabled_skips_without_platform() {
    let config = format!("{BASE}include_routing: false\ninclude_security_groups: false\ncf_binary: /nonexistent/cf\n");
    let (_dir, mut cmd) = cats_with_config(&config);
    cmd.arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 passed, 0 failed, 3 skipped"));
}

#[test]
fn test_run_json_reports_skipped_scenarios() {
    let config = format!("{BASE}include_routing: false\ninclude_security_groups: false\n");
    let (_dir, mut cmd) = cats_with_config(&config);
    let output = cmd
        .args(["run", "multiple-app-ports", "--json"])
        .output()
        .expect("run cats");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let scenarios = value["scenarios"].as_array().unwrap();
    assert_eq!(scenarios.len(), 1);
    assert_eq!(scenarios[0]["name"], "multiple-app-ports");
    assert_eq!(scenarios[0]["verdict"], "skipped");
}

#[test]
fn test_run_unknown_scenario_is_config_error() {
    let (_dir, mut cmd) = cats_with_config(BASE);
    cmd.args(["run", "diego-ssh"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown scenario 'diego-ssh'"))
        .stderr(predicate::str::contains("multiple-app-ports"));
}

#[test]
fn test_run_invalid_config_exits_two() {
    let (_dir, mut cmd) = cats_with_config("org: o\n");
    cmd.args(["run", "--json"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains(r#""code": "config_invalid""#));
}

#[test]
fn test_run_missing_cli_binary_fails_login() {
    let config = format!("{BASE}include_security_groups: false\ncf_binary: /nonexistent/cf\n");
    let (_dir, mut cmd) = cats_with_config(&config);
    cmd.arg("run")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("targeting api api.example.com"));
}
