//! An app listening on several ports: the default route reaches port 8080,
//! and a second route mapped to port 7777 reaches that port.

use std::time::Duration;

use anyhow::{Context, Result};

use super::{Cleanup, ScenarioContext};
use crate::application::ports::{CommandRunner, HttpFetcher, ProgressReporter, RulesFileWriter};
use crate::application::services::cf::PushSpec;
use crate::application::services::poller::{holds_throughout, poll_until};
use crate::application::services::probes::curl_app;
use crate::domain::matcher::contains_substring;
use crate::domain::PollPolicy;

/// Ports the lattice app listens on and is configured with.
pub const APP_PORTS: [u16; 3] = [7777, 8888, 8080];

/// Port the second route is mapped to.
pub const SECOND_ROUTE_PORT: u16 = 7777;

const START_COMMAND: &str = "lattice-app --ports=7777,8888,8080";
const POLL_INTERVAL: Duration = Duration::from_secs(5);

pub(super) async fn run<R, H, W, P>(
    ctx: &ScenarioContext<'_, R, H, W, P>,
    cleanup: &mut Cleanup,
) -> Result<()>
where
    R: CommandRunner,
    H: HttpFetcher,
    W: RulesFileWriter,
    P: ProgressReporter,
{
    let config = ctx.config;
    let app = ctx.app_name();
    cleanup.app(&app);

    ctx.reporter.step(&format!("pushing {app}"));
    let path = config.lattice_app_path();
    ctx.cf
        .push_app(
            &app,
            &PushSpec {
                buildpack: &config.go_buildpack_name,
                memory: &config.memory_limit,
                path: &path,
                domain: &config.apps_domain,
                start_command: Some(START_COMMAND),
            },
        )
        .await?;
    ctx.cf.set_backend(&app).await?;
    ctx.cf.start(&app, 0).await?;

    let eventually = PollPolicy::eventually(config.default_timeout_duration(), POLL_INTERVAL)?;

    ctx.reporter.step("checking the default port");
    poll_until(
        || curl_app(ctx.fetcher, config, &app, "/port"),
        &contains_substring("8080"),
        eventually,
    )
    .await
    .context("app with a single route should listen on the default port")?;

    ctx.reporter.step("mapping a second route to port 7777");
    ctx.cf.update_ports(&app, &APP_PORTS).await?;
    let second_route = format!("{app}-two");
    ctx.cf.create_route(&second_route).await?;
    ctx.cf
        .create_route_mapping(&app, &second_route, SECOND_ROUTE_PORT)
        .await?;

    poll_until(
        || curl_app(ctx.fetcher, config, &app, "/"),
        &contains_substring("Lattice"),
        eventually,
    )
    .await
    .context("app should keep serving on its default route")?;

    let window = PollPolicy::consistently(config.sleep_timeout_duration(), POLL_INTERVAL)?;
    holds_throughout(
        || curl_app(ctx.fetcher, config, &app, "/port"),
        &contains_substring("8080"),
        window,
    )
    .await
    .context("default route should stay on port 8080")?;

    poll_until(
        || curl_app(ctx.fetcher, config, &second_route, "/port"),
        &contains_substring("7777"),
        eventually,
    )
    .await
    .context("second route should reach port 7777")?;

    Ok(())
}
