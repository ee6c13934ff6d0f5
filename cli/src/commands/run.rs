//! `cats run`: run acceptance scenarios against the configured platform.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::{ScenarioContext, ScenarioId, run_suite};
use crate::infra::{TempRulesWriter, TokioCommandRunner, UreqFetcher};
use crate::output::TerminalReporter;

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Scenarios to run (default: all). See `cats list`.
    pub scenarios: Vec<String>,
}

/// Entry point for `cats run`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, a scenario name is
/// unknown, or logging in to the platform fails.
pub async fn run(app: &AppContext, args: &RunArgs) -> Result<ExitCode> {
    let config = app.config_store.load()?;
    config.validate()?;
    let ids = ScenarioId::select(&args.scenarios)?;

    let runner = TokioCommandRunner::new(config.default_timeout_duration());
    let fetcher = UreqFetcher::new(config.default_timeout_duration());
    let rules = TempRulesWriter;
    let reporter = TerminalReporter::new(&app.progress);
    let ctx = ScenarioContext::new(&config, &runner, &fetcher, &rules, &reporter);

    let report = run_suite(&ctx, &ids).await?;
    drop(reporter);

    app.renderer().render_suite(&report)?;
    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
