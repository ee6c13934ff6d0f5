//! JSON output helpers.
//!
//! `JsonRenderer` prints reports as pretty JSON on stdout. `format_error`
//! builds the error object every `--json` code path prints when a command
//! fails.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use cats_common::{PollReport, ScenarioInfo, SuiteReport};

use crate::domain::{ConfigError, SuiteConfig};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

fn print_pretty<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("JSON serialization failed")?
    );
    Ok(())
}

/// Renders reports as JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_version(version: &str) -> Result<()> {
        print_pretty(&serde_json::json!({ "version": version }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_suite(report: &SuiteReport) -> Result<()> {
        print_pretty(report)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_scenarios(scenarios: &[ScenarioInfo]) -> Result<()> {
        print_pretty(scenarios)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_config(config: &SuiteConfig, path: &Path) -> Result<()> {
        print_pretty(&serde_json::json!({
            "path": path.display().to_string(),
            "config": config.redacted(),
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_validation(path: &Path, problems: &[ConfigError]) -> Result<()> {
        let problems: Vec<String> = problems.iter().map(ToString::to_string).collect();
        print_pretty(&serde_json::json!({
            "path": path.display().to_string(),
            "valid": problems.is_empty(),
            "problems": problems,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_poll(report: &PollReport) -> Result<()> {
        print_pretty(report)
    }
}
