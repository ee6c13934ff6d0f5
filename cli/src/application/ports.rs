//! Port trait definitions for the application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::SuiteConfig;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── HTTP Fetch Port ───────────────────────────────────────────────────────────

/// Abstracts plain HTTP GETs against deployed apps.
#[allow(async_fn_in_trait)]
pub trait HttpFetcher {
    /// Fetch `url` and return the response body.
    ///
    /// Non-2xx responses still return their body; only transport failures
    /// (DNS, refused, timeout) are errors.
    async fn fetch(&self, url: &str) -> Result<String>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the presentation layer.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Config and Filesystem Ports ───────────────────────────────────────────────

/// Abstracts loading the suite configuration.
pub trait ConfigStore {
    /// Load the configuration, with environment overrides applied.
    fn load(&self) -> Result<SuiteConfig>;
    /// Path the configuration is read from.
    fn path(&self) -> Result<PathBuf>;
}

/// Abstracts writing a security-group rules document to disk for
/// `cf create-security-group`.
pub trait RulesFileWriter {
    /// Write `contents` to a fresh file.
    ///
    /// Returns `(path, guard)`; the file is removed when `guard` is dropped.
    fn write_rules(&self, contents: &str) -> Result<(PathBuf, Box<dyn std::any::Any>)>;
}
