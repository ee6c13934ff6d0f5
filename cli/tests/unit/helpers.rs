//! Shared test helpers: output constructors and a ready-made suite config.

#![allow(dead_code)]

use std::process::{ExitStatus, Output};

use cats_cli::domain::SuiteConfig;

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
/// On Windows `ExitStatusExt::from_raw` takes the exit code directly.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Config ───────────────────────────────────────────────────────────────────

/// A complete, valid configuration pointing at a fictional platform.
pub fn test_config() -> SuiteConfig {
    SuiteConfig {
        api: "api.example.com".to_string(),
        apps_domain: "apps.example.com".to_string(),
        admin_user: "admin".to_string(),
        admin_password: "s3cret".to_string(),
        org: "cats-org".to_string(),
        space: "cats-space".to_string(),
        ..SuiteConfig::default()
    }
}

// ── Canned platform responses ────────────────────────────────────────────────

/// `/v2/apps?q=name:` listing with a single app.
pub const APPS_LISTING: &str =
    r#"{"total_results":1,"resources":[{"metadata":{"guid":"app-guid","url":"/v2/apps/app-guid"}}]}"#;

/// `/v2/routes?q=host:` listing with a single route.
pub const ROUTES_LISTING: &str =
    r#"{"total_results":1,"resources":[{"metadata":{"guid":"route-guid","url":"/v2/routes/route-guid"}}]}"#;

/// `/v2/apps/<guid>/stats` for one running instance.
pub const STATS: &str = r#"{"0":{"state":"RUNNING","stats":{"host":"10.0.16.4","port":61012}}}"#;

pub const CURL_BLOCKED: &str = r#"{"stdout":"","stderr":"curl: (7) couldn't connect","return_code":7}"#;
pub const CURL_CONNECTED: &str = r#"{"stdout":"Hi, I'm Dora!","stderr":"","return_code":0}"#;
