//! Probes the scenarios poll: HTTP fetches against deployed apps, the sample
//! app's connectivity endpoints, and staging logs.
//!
//! Each probe is a plain async fn returning `anyhow::Result`; the poller turns
//! errors into "not yet satisfied" observations.

use std::time::Duration;

use anyhow::{Context, Result};
use cats_common::{CurlResponse, InstanceEndpoint};

use crate::application::ports::{CommandRunner, HttpFetcher};
use crate::application::services::cf::CfCli;
use crate::domain::platform::{decode_curl_response, decode_vcap_port};
use crate::domain::SuiteConfig;

/// Body of `path` on the app routed at `host`.
///
/// # Errors
///
/// Returns an error on transport failure.
pub async fn curl_app(
    fetcher: &impl HttpFetcher,
    config: &SuiteConfig,
    host: &str,
    path: &str,
) -> Result<String> {
    let url = config.app_url(host, path);
    fetcher
        .fetch(&url)
        .await
        .with_context(|| format!("fetching {url}"))
}

/// Ask `client` to curl `target` from inside its container.
///
/// # Errors
///
/// Returns an error on transport failure or when the body is not a curl
/// result.
pub async fn connectivity(
    fetcher: &impl HttpFetcher,
    config: &SuiteConfig,
    client: &str,
    target: &InstanceEndpoint,
) -> Result<CurlResponse> {
    let body = curl_app(
        fetcher,
        config,
        client,
        &format!("/curl/{}/{}", target.host, target.port),
    )
    .await?;
    Ok(decode_curl_response(body.as_bytes())?)
}

/// Container IP (`/myip`) and container port (`VCAP_APPLICATION.port`) of `app`.
///
/// # Errors
///
/// Returns an error on transport failure, an empty IP, or a malformed
/// `VCAP_APPLICATION`.
pub async fn container_endpoint(
    fetcher: &impl HttpFetcher,
    config: &SuiteConfig,
    app: &str,
) -> Result<InstanceEndpoint> {
    let ip = curl_app(fetcher, config, app, "/myip").await?;
    let host = ip.trim().to_string();
    anyhow::ensure!(!host.is_empty(), "{app} reported an empty container ip");
    let env = curl_app(fetcher, config, app, "/env/VCAP_APPLICATION").await?;
    let port = decode_vcap_port(env.as_bytes())?;
    Ok(InstanceEndpoint { host, port })
}

/// Recent logs of `app`. A failing `cf logs` is a probe error.
///
/// # Errors
///
/// Returns an error if `cf logs --recent` exits non-zero.
pub async fn recent_logs<R: CommandRunner>(cf: &CfCli<'_, R>, app: &str) -> Result<String> {
    cf.recent_logs(app).await
}

// ── Ad-hoc probes ─────────────────────────────────────────────────────────────

/// What `cats eventually` / `cats consistently` observe on each attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeTarget {
    /// Body of a GET to this URL.
    Url(String),
    /// Stdout of a command, bounded by `timeout`.
    Command {
        program: String,
        args: Vec<String>,
        timeout: Duration,
    },
}

impl ProbeTarget {
    /// Build a command target from `argv` (program first).
    ///
    /// # Errors
    ///
    /// Returns an error if `argv` is empty.
    pub fn command(argv: &[String], timeout: Duration) -> Result<Self> {
        let (program, args) = argv
            .split_first()
            .context("a command to run is required")?;
        Ok(Self::Command {
            program: program.clone(),
            args: args.to_vec(),
            timeout,
        })
    }

    /// Observe the target once.
    ///
    /// Command output has trailing newlines stripped. A command that exits
    /// non-zero is a probe error carrying its stderr.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, spawn failure, timeout or a
    /// non-zero exit.
    pub async fn observe(
        &self,
        runner: &impl CommandRunner,
        fetcher: &impl HttpFetcher,
    ) -> Result<String> {
        match self {
            Self::Url(url) => fetcher.fetch(url).await,
            Self::Command {
                program,
                args,
                timeout,
            } => {
                let argv: Vec<&str> = args.iter().map(String::as_str).collect();
                let output = runner.run_with_timeout(program, &argv, *timeout).await?;
                if !output.status.success() {
                    anyhow::bail!(
                        "{program} exited with {}: {}",
                        output
                            .status
                            .code()
                            .map_or_else(|| "a signal".to_string(), |c| format!("code {c}")),
                        String::from_utf8_lossy(&output.stderr).trim()
                    );
                }
                Ok(String::from_utf8_lossy(&output.stdout)
                    .trim_end_matches(['\n', '\r'])
                    .to_string())
            }
        }
    }
}
