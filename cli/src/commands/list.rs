//! `cats list`: show the scenarios and whether the configuration enables them.

use std::process::ExitCode;

use anyhow::Result;
use cats_common::ScenarioInfo;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::ScenarioId;
use crate::domain::SuiteConfig;

/// Scenario catalogue as seen under `config`.
#[must_use]
pub fn scenario_infos(config: &SuiteConfig) -> Vec<ScenarioInfo> {
    ScenarioId::ALL
        .iter()
        .map(|id| {
            let skip_reason = id.skip_reason(config);
            ScenarioInfo {
                name: id.name().to_string(),
                description: id.description().to_string(),
                enabled: skip_reason.is_none(),
                skip_reason,
            }
        })
        .collect()
}

/// Entry point for `cats list`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let config = app.config_store.load()?;
    app.renderer().render_scenarios(&scenario_infos(&config))?;
    Ok(ExitCode::SUCCESS)
}
