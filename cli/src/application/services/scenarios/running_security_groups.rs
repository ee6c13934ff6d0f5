//! Running security groups: app-to-app traffic is blocked by default, allowed
//! while a security group for the server's addresses is bound, and blocked
//! again once it is unbound.
//!
//! "Blocked" is checked once, right after the client (re)starts. Only the
//! transition to "connected" is polled.

use std::time::Duration;

use anyhow::{Context, Result, ensure};
use cats_common::CurlResponse;

use super::{Cleanup, ScenarioContext};
use crate::application::ports::{CommandRunner, HttpFetcher, ProgressReporter, RulesFileWriter};
use crate::application::services::cf::Role;
use crate::application::services::poller::poll_until;
use crate::application::services::probes::{connectivity, container_endpoint};
use crate::domain::matcher::{PredicateMatcher, predicate};
use crate::domain::naming::{NameKind, random_name};
use crate::domain::security_group::{SecurityRule, render_rules};
use crate::domain::PollPolicy;

pub const BLOCKED_BY_DEFAULT: &str = "Expected running security groups not to allow internal \
     communication between app containers. Configure your running security groups to not allow \
     traffic on internal networks, or disable this test by setting 'include_security_groups' to \
     'false' in the suite configuration.";

const POLL_INTERVAL: Duration = Duration::from_secs(5);

fn connected() -> PredicateMatcher<impl Fn(&CurlResponse) -> bool> {
    predicate("curl return code 0", CurlResponse::connected)
}

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
    let (server, private) = ctx.start_server(cleanup).await?;

    let client = ctx
        .push_dora(cleanup, &config.ruby_buildpack_name)
        .await?;
    ctx.cf.start(&client, 0).await?;

    let eventually = PollPolicy::eventually(config.default_timeout_duration(), POLL_INTERVAL)?;
    let probe = || connectivity(ctx.fetcher, config, &client, &private);

    ctx.reporter
        .step("asserting default running security group configuration");
    ensure!(!probe().await?.connected(), BLOCKED_BY_DEFAULT);

    let container = container_endpoint(ctx.fetcher, config, &server).await?;
    let rules = render_rules(&[
        SecurityRule::tcp(&private.host, private.port),
        SecurityRule::tcp(&container.host, container.port),
    ])?;
    let (rules_path, _rules_file) = ctx.rules.write_rules(&rules)?;
    let group = random_name(&config.name_prefix, NameKind::SecurityGroup);

    ctx.reporter.step(&format!("applying security group {group}"));
    ctx.cf.as_role(Role::Admin).await?;
    cleanup.security_group(&group);
    ctx.cf.create_security_group(&group, &rules_path).await?;
    ctx.cf
        .bind_security_group(&group, &config.org, &config.space)
        .await?;
    ctx.cf.as_role(Role::Regular).await?;
    ctx.cf.restart(&client, 0).await?;

    poll_until(probe, &connected(), eventually)
        .await
        .context("app should connect once the security group is bound")?;

    ctx.reporter.step(&format!("removing security group {group}"));
    ctx.cf.as_role(Role::Admin).await?;
    ctx.cf
        .unbind_security_group(&group, &config.org, &config.space)
        .await?;
    ctx.cf.as_role(Role::Regular).await?;
    ctx.cf.restart(&client, 0).await?;

    ensure!(
        !probe().await?.connected(),
        "app should no longer connect once the security group is unbound"
    );

    Ok(())
}
