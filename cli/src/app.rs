//! Application context: the state passed to every command handler.
//!
//! Built once in `Cli::run()` from the global flags. Commands take
//! `&AppContext` instead of constructing output contexts or stores
//! themselves.

use std::path::PathBuf;

use crate::domain::{ConfigError, PolicyError};
use crate::infra::YamlConfigStore;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Config file given with `--config`.
    pub config: Option<PathBuf>,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context for final results.
    pub output: OutputContext,
    /// Output context for progress events; quiet in JSON mode so stdout
    /// carries only the JSON document.
    pub progress: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Where the suite configuration is read from.
    pub config_store: YamlConfigStore,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: AppFlags) -> Self {
        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            progress: OutputContext::new(
                flags.output.no_color,
                flags.output.quiet || flags.output.json,
            ),
            mode,
            config_store: YamlConfigStore::new(flags.config),
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }
}

/// Exit code and JSON error code for an error that escaped a command.
///
/// Invalid poll policies and configuration are usage errors (2); anything
/// else is a runtime failure (1).
#[must_use]
pub fn classify_error(err: &anyhow::Error) -> (u8, &'static str) {
    if err.chain().any(|cause| cause.is::<PolicyError>()) {
        (2, "policy_invalid")
    } else if err.chain().any(|cause| cause.is::<ConfigError>()) {
        (2, "config_invalid")
    } else {
        (1, "error")
    }
}
