//! Integration tests for `cats list`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cats_with_config(contents: &str) -> (TempDir, Command) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, contents).expect("write config");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cats"));
    cmd.env("NO_COLOR", "1").env("CONFIG", &path);
    (dir, cmd)
}

#[test]
fn test_list_shows_all_scenarios() {
    let (_dir, mut cmd) = cats_with_config("api: api.example.com\n");
    cmd.arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("multiple-app-ports"))
        .stdout(predicate::str::contains("running-security-groups"))
        .stdout(predicate::str::contains("staging-security-groups"));
}

#[test]
fn test_list_marks_disabled_scenarios() {
    let (_dir, mut cmd) = cats_with_config("include_security_groups: false\n");
    cmd.arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("disabled"))
        .stdout(predicate::str::contains("include_security_groups: false"));
}

#[test]
fn test_list_json_has_enabled_flags() {
    let (_dir, mut cmd) = cats_with_config("backend: dea\n");
    let output = cmd.args(["list", "--json"]).output().expect("run cats");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let scenarios = value.as_array().unwrap();
    assert_eq!(scenarios.len(), 3);
    let ports = scenarios
        .iter()
        .find(|s| s["name"] == "multiple-app-ports")
        .unwrap();
    assert_eq!(ports["enabled"], false);
    assert!(ports["skip_reason"].as_str().unwrap().contains("diego"));
}
