//! Acceptance scenarios and the suite runner.
//!
//! A scenario deploys throwaway apps under random names, asserts on their
//! observable behaviour through the poller, and always tears down what it
//! created. Assertion failures decide the verdict; cleanup failures are only
//! reported as warnings.

pub mod multiple_app_ports;
pub mod running_security_groups;
pub mod staging_security_groups;

use anyhow::{Context, Result};
use cats_common::{InstanceEndpoint, ScenarioReport, SuiteReport, Verdict};
use chrono::Utc;
use tokio::time::Instant;

use crate::application::ports::{CommandRunner, HttpFetcher, ProgressReporter, RulesFileWriter};
use crate::application::services::cf::{CfCli, PushSpec, Role};
use crate::domain::error::ConfigError;
use crate::domain::naming::{NameKind, random_name};
use crate::domain::SuiteConfig;

// ── Registry ──────────────────────────────────────────────────────────────────

/// One acceptance scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    MultipleAppPorts,
    RunningSecurityGroups,
    StagingSecurityGroups,
}

impl ScenarioId {
    /// Every scenario, in run order.
    pub const ALL: [Self; 3] = [
        Self::MultipleAppPorts,
        Self::RunningSecurityGroups,
        Self::StagingSecurityGroups,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::MultipleAppPorts => "multiple-app-ports",
            Self::RunningSecurityGroups => "running-security-groups",
            Self::StagingSecurityGroups => "staging-security-groups",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::MultipleAppPorts => {
                "an app listening on several ports is reachable on each mapped route"
            }
            Self::RunningSecurityGroups => {
                "binding a running security group opens app-to-app traffic; unbinding closes it"
            }
            Self::StagingSecurityGroups => {
                "staging blocks internal addresses and allows external ones by default"
            }
        }
    }

    /// Why this scenario will not run under `config`, if it will not.
    #[must_use]
    pub fn skip_reason(self, config: &SuiteConfig) -> Option<String> {
        match self {
            Self::MultipleAppPorts if !config.include_routing => {
                Some("routing scenarios are disabled (include_routing: false)".to_string())
            }
            Self::MultipleAppPorts if config.backend != "diego" => Some(format!(
                "requires the diego backend (configured: {})",
                config.backend
            )),
            Self::RunningSecurityGroups | Self::StagingSecurityGroups
                if !config.include_security_groups =>
            {
                Some(
                    "security group scenarios are disabled (include_security_groups: false)"
                        .to_string(),
                )
            }
            _ => None,
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownScenario`] listing the valid names.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|id| id.name() == name)
            .ok_or_else(|| ConfigError::UnknownScenario {
                name: name.to_string(),
                valid: Self::ALL.map(Self::name).join(", "),
            })
    }

    /// Resolve requested names in order, dropping duplicates. No names means
    /// every scenario.
    ///
    /// # Errors
    ///
    /// Returns an error for the first unknown name.
    pub fn select(names: &[String]) -> Result<Vec<Self>, ConfigError> {
        if names.is_empty() {
            return Ok(Self::ALL.to_vec());
        }
        let mut selected = Vec::new();
        for name in names {
            let id = Self::from_name(name)?;
            if !selected.contains(&id) {
                selected.push(id);
            }
        }
        Ok(selected)
    }

    async fn exercise<R, H, W, P>(
        self,
        ctx: &ScenarioContext<'_, R, H, W, P>,
        cleanup: &mut Cleanup,
    ) -> Result<()>
    where
        R: CommandRunner,
        H: HttpFetcher,
        W: RulesFileWriter,
        P: ProgressReporter,
    {
        match self {
            Self::MultipleAppPorts => multiple_app_ports::run(ctx, cleanup).await,
            Self::RunningSecurityGroups => running_security_groups::run(ctx, cleanup).await,
            Self::StagingSecurityGroups => staging_security_groups::run(ctx, cleanup).await,
        }
    }

    /// Run the scenario body, then its cleanup regardless of the outcome.
    pub async fn run<R, H, W, P>(self, ctx: &ScenarioContext<'_, R, H, W, P>) -> ScenarioRun
    where
        R: CommandRunner,
        H: HttpFetcher,
        W: RulesFileWriter,
        P: ProgressReporter,
    {
        let mut cleanup = Cleanup::default();
        let result = self.exercise(ctx, &mut cleanup).await;
        let warnings = cleanup.run(&ctx.cf).await;
        ScenarioRun { result, warnings }
    }
}

// ── Context ───────────────────────────────────────────────────────────────────

/// Everything a scenario talks to. Built once per `cats run`.
pub struct ScenarioContext<'a, R, H, W, P>
where
    R: CommandRunner,
    H: HttpFetcher,
    W: RulesFileWriter,
    P: ProgressReporter,
{
    pub config: &'a SuiteConfig,
    pub cf: CfCli<'a, R>,
    pub fetcher: &'a H,
    pub rules: &'a W,
    pub reporter: &'a P,
}

impl<'a, R, H, W, P> ScenarioContext<'a, R, H, W, P>
where
    R: CommandRunner,
    H: HttpFetcher,
    W: RulesFileWriter,
    P: ProgressReporter,
{
    #[must_use]
    pub fn new(
        config: &'a SuiteConfig,
        runner: &'a R,
        fetcher: &'a H,
        rules: &'a W,
        reporter: &'a P,
    ) -> Self {
        Self {
            config,
            cf: CfCli::new(runner, config),
            fetcher,
            rules,
            reporter,
        }
    }

    fn app_name(&self) -> String {
        random_name(&self.config.name_prefix, NameKind::App)
    }

    /// Push the sample `dora` app with `buildpack` and move it onto the
    /// configured backend. The app is registered for cleanup before the push.
    async fn push_dora(&self, cleanup: &mut Cleanup, buildpack: &str) -> Result<String> {
        let app = self.app_name();
        cleanup.app(&app);
        self.reporter.step(&format!("pushing {app}"));
        let path = self.config.dora_path();
        self.cf
            .push_app(
                &app,
                &PushSpec {
                    buildpack,
                    memory: &self.config.memory_limit,
                    path: &path,
                    domain: &self.config.apps_domain,
                    start_command: None,
                },
            )
            .await?;
        self.cf.set_backend(&app).await?;
        Ok(app)
    }

    /// Push and start a `dora` server and look up its cell-private address.
    async fn start_server(&self, cleanup: &mut Cleanup) -> Result<(String, InstanceEndpoint)> {
        let server = self
            .push_dora(cleanup, &self.config.ruby_buildpack_name)
            .await?;
        self.cf.start(&server, 0).await?;
        let endpoint = self
            .cf
            .instance_endpoint(&server)
            .await
            .with_context(|| format!("looking up the private address of {server}"))?;
        tracing::debug!(app = %server, host = %endpoint.host, port = endpoint.port, "server is up");
        Ok((server, endpoint))
    }
}

// ── Cleanup ───────────────────────────────────────────────────────────────────

/// Resources a scenario created, torn down after the body finishes.
#[derive(Debug, Default)]
pub struct Cleanup {
    apps: Vec<String>,
    security_groups: Vec<String>,
    buildpacks: Vec<String>,
}

impl Cleanup {
    pub fn app(&mut self, name: &str) {
        self.apps.push(name.to_string());
    }

    pub fn security_group(&mut self, name: &str) {
        self.security_groups.push(name.to_string());
    }

    pub fn buildpack(&mut self, name: &str) {
        self.buildpacks.push(name.to_string());
    }

    /// Delete apps (newest first), then the admin-owned security groups and
    /// buildpacks, and finish as the regular user. Never fails; every problem
    /// becomes a warning.
    pub async fn run<R: CommandRunner>(self, cf: &CfCli<'_, R>) -> Vec<String> {
        let mut warnings = Vec::new();
        for app in self.apps.iter().rev() {
            cf.app_report(app).await;
            if let Err(e) = cf.delete_app(app).await {
                warnings.push(format!("failed to delete app {app}: {e:#}"));
            }
        }

        if self.security_groups.is_empty() && self.buildpacks.is_empty() {
            return warnings;
        }
        if let Err(e) = cf.as_role(Role::Admin).await {
            warnings.push(format!("cannot switch to admin for cleanup: {e:#}"));
            for name in self.security_groups.iter().chain(&self.buildpacks) {
                warnings.push(format!("{name} was not deleted"));
            }
            return warnings;
        }
        for group in self.security_groups.iter().rev() {
            if let Err(e) = cf.delete_security_group(group).await {
                warnings.push(format!("failed to delete security group {group}: {e:#}"));
            }
        }
        for buildpack in self.buildpacks.iter().rev() {
            if let Err(e) = cf.delete_buildpack(buildpack).await {
                warnings.push(format!("failed to delete buildpack {buildpack}: {e:#}"));
            }
        }
        if let Err(e) = cf.as_role(Role::Regular).await {
            warnings.push(format!("cannot switch back to the regular user: {e:#}"));
        }
        warnings
    }
}

/// Body result plus cleanup warnings.
#[derive(Debug)]
pub struct ScenarioRun {
    pub result: Result<()>,
    pub warnings: Vec<String>,
}

// ── Suite runner ──────────────────────────────────────────────────────────────

/// Run one scenario (or record why it was skipped).
pub async fn run_scenario<R, H, W, P>(
    ctx: &ScenarioContext<'_, R, H, W, P>,
    id: ScenarioId,
) -> ScenarioReport
where
    R: CommandRunner,
    H: HttpFetcher,
    W: RulesFileWriter,
    P: ProgressReporter,
{
    let started_at = Utc::now();
    let timer = Instant::now();

    let (verdict, message, warnings) = match id.skip_reason(ctx.config) {
        Some(reason) => {
            tracing::info!(scenario = id.name(), %reason, "skipping scenario");
            (Verdict::Skipped, Some(reason), Vec::new())
        }
        None => {
            tracing::info!(scenario = id.name(), "running scenario");
            let run = id.run(ctx).await;
            match run.result {
                Ok(()) => (Verdict::Passed, None, run.warnings),
                Err(e) => {
                    tracing::warn!(scenario = id.name(), "scenario failed: {e:#}");
                    (Verdict::Failed, Some(format!("{e:#}")), run.warnings)
                }
            }
        }
    };

    ScenarioReport {
        name: id.name().to_string(),
        verdict,
        started_at,
        duration_ms: u64::try_from(timer.elapsed().as_millis()).unwrap_or(u64::MAX),
        message,
        warnings,
    }
}

/// Log in once, then run `ids` one after another.
///
/// # Errors
///
/// Returns an error only if logging in fails; scenario failures are part of
/// the report.
pub async fn run_suite<R, H, W, P>(
    ctx: &ScenarioContext<'_, R, H, W, P>,
    ids: &[ScenarioId],
) -> Result<SuiteReport>
where
    R: CommandRunner,
    H: HttpFetcher,
    W: RulesFileWriter,
    P: ProgressReporter,
{
    if ids.iter().any(|id| id.skip_reason(ctx.config).is_none()) {
        ctx.reporter
            .step(&format!("logging in to {}", ctx.config.api));
        ctx.cf
            .api()
            .await
            .with_context(|| format!("targeting api {}", ctx.config.api))?;
        ctx.cf
            .as_role(Role::Regular)
            .await
            .context("logging in as the regular user")?;
    }

    let mut report = SuiteReport::default();
    for &id in ids {
        ctx.reporter.step(&format!("{}: {}", id.name(), id.description()));
        let scenario = run_scenario(ctx, id).await;
        match scenario.verdict {
            Verdict::Passed => ctx.reporter.success(&format!("{} passed", id.name())),
            Verdict::Failed => ctx.reporter.warn(&format!("{} failed", id.name())),
            Verdict::Skipped => ctx.reporter.warn(&format!("{} skipped", id.name())),
        }
        for warning in &scenario.warnings {
            ctx.reporter.warn(warning);
        }
        report.scenarios.push(scenario);
    }
    Ok(report)
}
