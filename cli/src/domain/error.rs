//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Poll policy errors ────────────────────────────────────────────────────────

/// A poll policy that cannot be evaluated. Raised before any probe runs.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Invalid poll policy: interval must be greater than zero")]
    NonPositiveInterval,

    #[error("Invalid poll policy: timeout must be greater than zero")]
    NonPositiveTimeout,

    #[error("Invalid poll policy: duration must be greater than zero")]
    NonPositiveDuration,
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to suite configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Unknown backend '{value}'\n\nValid backends: {valid}")]
    UnknownBackend { value: String, valid: String },

    #[error("Unknown scenario '{name}'\n\nValid scenarios: {valid}")]
    UnknownScenario { name: String, valid: String },
}

// ── Platform CLI errors ───────────────────────────────────────────────────────

/// A `cf` invocation that did not end with the expected exit code.
#[derive(Debug, Error)]
pub enum CfError {
    #[error("`{command}` exited with {actual} (expected {expected}): {stderr}")]
    UnexpectedExit {
        command: String,
        expected: i32,
        actual: String,
        stderr: String,
    },
}

// ── Response decoding errors ──────────────────────────────────────────────────

/// A platform or sample-app response that does not have the expected shape.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot decode {what}: {source}")]
    Malformed {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{what} response has no {field}")]
    Missing {
        what: &'static str,
        field: &'static str,
    },
}
