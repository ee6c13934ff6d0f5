//! Integration tests for `cats eventually` and `cats consistently` with
//! command probes.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn cats() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cats"));
    cmd.env("NO_COLOR", "1");
    cmd
}

// ---------------------------------------------------------------------------
// Argument validation
// ---------------------------------------------------------------------------

#[test]
fn test_eventually_requires_a_matcher() {
    cats()
        .args(["eventually", "--", "echo", "hi"])
        .assert()
        .code(2);
}

#[test]
fn test_not_without_an_expectation_is_rejected() {
    cats()
        .args(["eventually", "--not", "--", "echo", "a"])
        .assert()
        .code(2);
}

#[test]
fn test_url_and_command_conflict() {
    cats()
        .args(["eventually", "--contains", "a", "--url", "http://localhost/", "--", "echo", "a"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_eventually_requires_a_probe() {
    cats().args(["eventually", "--contains", "a"]).assert().code(2);
}

#[test]
fn test_zero_interval_is_policy_error() {
    cats()
        .args(["eventually", "--interval", "0", "--contains", "a", "--", "echo", "a"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("interval must be greater than zero"));
}

#[test]
fn test_zero_interval_json_error_code() {
    let output = cats()
        .args([
            "--json",
            "consistently",
            "--duration",
            "1",
            "--interval",
            "0",
            "--contains",
            "a",
            "--",
            "echo",
            "a",
        ])
        .output()
        .expect("run cats");
    assert_eq!(output.status.code(), Some(2));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "policy_invalid");
}

#[test]
fn test_invalid_regex_is_config_error() {
    cats()
        .args(["--json", "eventually", "--matches", "CURL_EXIT=[", "--", "echo", "a"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains(r#""code": "config_invalid""#));
}

// ---------------------------------------------------------------------------
// Verdicts
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn test_eventually_satisfied_on_first_attempt() {
    cats()
        .args(["eventually", "--contains", "hello", "--", "echo", "hello world"])
        .assert()
        .success()
        .stdout(predicate::str::contains("satisfied"))
        .stdout(predicate::str::contains("1 attempt"));
}

#[cfg(unix)]
#[test]
fn test_eventually_equals_ignores_trailing_newline() {
    let output = cats()
        .args(["--json", "eventually", "--equals", "8080", "--", "echo", "8080"])
        .output()
        .expect("run cats");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["mode"], "eventually");
    assert_eq!(value["satisfied"], true);
    assert_eq!(value["attempts"], 1);
    assert_eq!(value["last"], "8080");
}

#[cfg(unix)]
#[test]
fn test_eventually_not_accepts_output_without_needle() {
    cats()
        .args(["eventually", "--not", "--contains", "CURL_EXIT=0", "--", "echo", "CURL_EXIT=7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not (contains"));
}

#[cfg(unix)]
#[test]
fn test_eventually_never_true_times_out() {
    cats()
        .args([
            "eventually",
            "--timeout",
            "0.3",
            "--interval",
            "0.1",
            "--equals",
            "200",
            "--",
            "echo",
            "403",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("timed out"))
        .stderr(predicate::str::contains("equals \"200\""))
        .stdout(predicate::str::contains("403"));
}

#[cfg(unix)]
#[test]
fn test_eventually_failing_command_is_retried_then_reported() {
    let output = cats()
        .args([
            "--json",
            "eventually",
            "--timeout",
            "0.2",
            "--interval",
            "0.1",
            "--contains",
            "x",
            "--",
            "false",
        ])
        .output()
        .expect("run cats");
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["satisfied"], false);
    assert!(value["attempts"].as_u64().unwrap() >= 2);
    assert!(value["last"].as_str().unwrap().starts_with("probe error: false exited"));
}

#[cfg(unix)]
#[test]
fn test_consistently_holds_for_window() {
    let output = cats()
        .args([
            "--json",
            "consistently",
            "--duration",
            "0.3",
            "--interval",
            "0.1",
            "--contains",
            "ok",
            "--",
            "echo",
            "ok",
        ])
        .output()
        .expect("run cats");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["mode"], "consistently");
    assert_eq!(value["satisfied"], true);
    assert!(value["elapsed_ms"].as_u64().unwrap() >= 300);
}

#[cfg(unix)]
#[test]
fn test_consistently_violation_fails_fast() {
    cats()
        .args([
            "consistently",
            "--duration",
            "60",
            "--interval",
            "1",
            "--contains",
            "ok",
            "--",
            "echo",
            "not ready",
        ])
        .timeout(std::time::Duration::from_secs(20))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("violated on attempt 1"));
}
