//! Integration tests for the CLI skeleton: help, version and global flags.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn cats() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cats"));
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    // clap with arg_required_else_help shows help on stderr and exits 2
    cats().assert().code(2).stderr(predicate::str::contains(
        "Acceptance tests for a Cloud Foundry style platform",
    ));
}

#[test]
fn test_cli_help_lists_commands() {
    cats()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("eventually"))
        .stdout(predicate::str::contains("consistently"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_command_shows_version() {
    cats()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "cats {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let output = cats()
        .args(["version", "--json"])
        .output()
        .expect("run cats");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_unknown_subcommand_is_a_usage_error() {
    cats()
        .arg("deploy")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
