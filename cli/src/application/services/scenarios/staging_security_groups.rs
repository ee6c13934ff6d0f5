//! Staging security groups: a buildpack that curls `$TESTURI` during staging
//! cannot reach a cell-private address but can reach the internet.
//!
//! The buildpack always fails staging on purpose, so `start` and `restart`
//! are expected to exit 1 and the verdict is read from the staging logs.

use std::time::Duration;

use anyhow::{Context, Result};

use super::{Cleanup, ScenarioContext};
use crate::application::ports::{CommandRunner, HttpFetcher, ProgressReporter, RulesFileWriter};
use crate::application::services::cf::Role;
use crate::application::services::poller::poll_until;
use crate::application::services::probes::recent_logs;
use crate::domain::matcher::matches_regex;
use crate::domain::naming::{NameKind, random_name};
use crate::domain::PollPolicy;

pub const BLOCKED_DURING_STAGING: &str = "Expected staging security groups not to allow \
     internal communication between app containers. Configure your staging security groups to \
     not allow traffic on internal networks, or disable this test by setting \
     'include_security_groups' to 'false' in the suite configuration.";

/// Position the throwaway buildpack is created at.
pub const BUILDPACK_POSITION: u32 = 999;

/// Host outside the platform that staging must be able to reach.
pub const EXTERNAL_URI: &str = "www.google.com";

const STAGING_EXIT: i32 = 1;
const LOG_TIMEOUT: Duration = Duration::from_secs(5);
const LOG_INTERVAL: Duration = Duration::from_secs(1);

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
    let (_server, private) = ctx.start_server(cleanup).await?;

    let buildpack = random_name(&config.name_prefix, NameKind::Buildpack);
    ctx.reporter.step(&format!("creating buildpack {buildpack}"));
    ctx.cf.as_role(Role::Admin).await?;
    cleanup.buildpack(&buildpack);
    ctx.cf
        .create_buildpack(
            &buildpack,
            &config.security_group_buildpack_path(),
            BUILDPACK_POSITION,
        )
        .await?;
    ctx.cf.as_role(Role::Regular).await?;

    let app = ctx.push_dora(cleanup, &buildpack).await?;
    let logs = || recent_logs(&ctx.cf, &app);
    let policy = PollPolicy::eventually(LOG_TIMEOUT, LOG_INTERVAL)?;

    ctx.reporter
        .step("asserting default staging security group configuration");
    let private_uri = format!("{}:{}", private.host, private.port);
    ctx.cf.set_env(&app, "TESTURI", &private_uri).await?;
    ctx.cf.start(&app, STAGING_EXIT).await?;
    poll_until(logs, &matches_regex("CURL_EXIT=[^0]")?, policy)
        .await
        .context(BLOCKED_DURING_STAGING)?;

    ctx.reporter.step("checking external traffic during staging");
    ctx.cf.set_env(&app, "TESTURI", EXTERNAL_URI).await?;
    ctx.cf.restart(&app, STAGING_EXIT).await?;
    poll_until(logs, &matches_regex("CURL_EXIT=0")?, policy)
        .await
        .context("staging should reach external hosts")?;

    Ok(())
}
