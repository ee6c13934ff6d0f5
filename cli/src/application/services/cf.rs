//! Typed operations over the platform CLI (`cf`).
//!
//! Every call goes through [`CfCli::cf`], which runs the configured binary
//! through the injected [`CommandRunner`] and turns an unexpected exit code
//! into a [`CfError`].

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};
use cats_common::InstanceEndpoint;

use crate::application::ports::CommandRunner;
use crate::domain::error::CfError;
use crate::domain::platform::{
    decode_app_url, decode_first_guid, decode_instance_endpoint, diego_update_body,
    ports_update_body, route_mapping_body,
};
use crate::domain::SuiteConfig;

/// Identity a block of CLI calls runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Platform administrator; needed for security groups and buildpacks.
    Admin,
    /// The user scenarios deploy apps as.
    Regular,
}

/// Arguments of `cf push`. Apps are always pushed with `--no-start`.
#[derive(Debug, Clone)]
pub struct PushSpec<'a> {
    pub buildpack: &'a str,
    pub memory: &'a str,
    pub path: &'a Path,
    pub domain: &'a str,
    pub start_command: Option<&'a str>,
}

/// Platform CLI bound to one suite configuration.
pub struct CfCli<'a, R: CommandRunner> {
    runner: &'a R,
    config: &'a SuiteConfig,
}

/// Render a command line for error messages, hiding `cf auth` passwords.
fn display_command(args: &[&str]) -> String {
    let shown: Vec<&str> = args
        .iter()
        .enumerate()
        .map(|(i, arg)| {
            if args.first() == Some(&"auth") && i == 2 {
                "********"
            } else {
                *arg
            }
        })
        .collect();
    format!("cf {}", shown.join(" "))
}

impl<'a, R: CommandRunner> CfCli<'a, R> {
    #[must_use]
    pub fn new(runner: &'a R, config: &'a SuiteConfig) -> Self {
        Self { runner, config }
    }

    fn default_timeout(&self) -> Duration {
        self.config.default_timeout_duration()
    }

    fn push_timeout(&self) -> Duration {
        self.config.cf_push_timeout_duration()
    }

    /// Run `cf ARGS...` and require exit code `expected`.
    ///
    /// # Errors
    ///
    /// Returns an error if the binary cannot be run, exceeds `timeout`, or
    /// exits with any other code.
    pub async fn cf(&self, args: &[&str], timeout: Duration, expected: i32) -> Result<Output> {
        let command = display_command(args);
        tracing::debug!(%command, ?timeout, "running platform cli");
        let output = self
            .runner
            .run_with_timeout(&self.config.cf_binary, args, timeout)
            .await
            .with_context(|| format!("running `{command}`"))?;

        if output.status.code() != Some(expected) {
            let actual = output
                .status
                .code()
                .map_or_else(|| "a signal".to_string(), |c| format!("exit code {c}"));
            return Err(CfError::UnexpectedExit {
                command,
                expected,
                actual,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(output)
    }

    async fn cf_ok(&self, args: &[&str]) -> Result<Output> {
        self.cf(args, self.default_timeout(), 0).await
    }

    // ── Session ───────────────────────────────────────────────────────────────

    /// Point the CLI at the configured API endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if `cf api` fails.
    pub async fn api(&self) -> Result<()> {
        let mut args = vec!["api", self.config.api.as_str()];
        if self.config.skip_ssl_validation {
            args.push("--skip-ssl-validation");
        }
        self.cf_ok(&args).await?;
        Ok(())
    }

    /// Authenticate as `role` and re-target the configured org and space.
    ///
    /// # Errors
    ///
    /// Returns an error if `cf auth` or `cf target` fails.
    pub async fn as_role(&self, role: Role) -> Result<()> {
        let creds = match role {
            Role::Admin => self.config.admin_credentials(),
            Role::Regular => self.config.regular_credentials(),
        };
        tracing::debug!(?role, user = %creds.user, "switching platform user");
        self.cf_ok(&["auth", &creds.user, &creds.password]).await?;
        self.target(&self.config.org, &self.config.space).await
    }

    /// # Errors
    ///
    /// Returns an error if `cf target` fails.
    pub async fn target(&self, org: &str, space: &str) -> Result<()> {
        self.cf_ok(&["target", "-o", org, "-s", space]).await?;
        Ok(())
    }

    // ── Apps ──────────────────────────────────────────────────────────────────

    /// Push `name` without starting it.
    ///
    /// # Errors
    ///
    /// Returns an error if `cf push` fails.
    pub async fn push_app(&self, name: &str, spec: &PushSpec<'_>) -> Result<()> {
        let path = spec.path.to_string_lossy();
        let mut args = vec![
            "push",
            name,
            "--no-start",
            "-b",
            spec.buildpack,
            "-m",
            spec.memory,
            "-p",
            path.as_ref(),
            "-d",
            spec.domain,
        ];
        if let Some(command) = spec.start_command {
            args.extend(["-c", command]);
        }
        self.cf(&args, self.push_timeout(), 0).await?;
        Ok(())
    }

    /// Start `name`, expecting exit code `expected` (1 when staging must fail).
    ///
    /// # Errors
    ///
    /// Returns an error if `cf start` exits with any other code.
    pub async fn start(&self, name: &str, expected: i32) -> Result<()> {
        self.cf(&["start", name], self.push_timeout(), expected).await?;
        Ok(())
    }

    /// Restart `name`, expecting exit code `expected`.
    ///
    /// # Errors
    ///
    /// Returns an error if `cf restart` exits with any other code.
    pub async fn restart(&self, name: &str, expected: i32) -> Result<()> {
        self.cf(&["restart", name], self.push_timeout(), expected).await?;
        Ok(())
    }

    /// Delete `name` and the routes mapped to it.
    ///
    /// # Errors
    ///
    /// Returns an error if `cf delete` fails.
    pub async fn delete_app(&self, name: &str) -> Result<()> {
        self.cf(&["delete", name, "-f", "-r"], self.push_timeout(), 0)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if `cf set-env` fails.
    pub async fn set_env(&self, name: &str, key: &str, value: &str) -> Result<()> {
        self.cf_ok(&["set-env", name, key, value]).await?;
        Ok(())
    }

    /// Recent log lines of `name` (`cf logs --recent`).
    ///
    /// # Errors
    ///
    /// Returns an error if `cf logs` exits non-zero.
    pub async fn recent_logs(&self, name: &str) -> Result<String> {
        let output = self.cf_ok(&["logs", "--recent", name]).await?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Print `cf app` and recent logs for `name` into the log stream.
    ///
    /// Diagnostics only: failures are logged and otherwise ignored.
    pub async fn app_report(&self, name: &str) {
        let reports: [&[&str]; 2] = [&["app", name], &["logs", "--recent", name]];
        for args in reports {
            match self.cf_ok(args).await {
                Ok(output) => tracing::info!(
                    app = name,
                    report = %String::from_utf8_lossy(&output.stdout),
                    "{}",
                    display_command(args)
                ),
                Err(e) => tracing::warn!(app = name, "app report failed: {e:#}"),
            }
        }
    }

    // ── Raw API ───────────────────────────────────────────────────────────────

    /// `cf curl PATH [EXTRA...]`, returning the response body.
    ///
    /// # Errors
    ///
    /// Returns an error if `cf curl` exits non-zero.
    pub async fn curl(&self, path: &str, extra: &[&str]) -> Result<String> {
        let mut args = vec!["curl", path];
        args.extend_from_slice(extra);
        let output = self.cf_ok(&args).await?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// # Errors
    ///
    /// Returns an error if the lookup fails or finds no app called `name`.
    pub async fn app_guid(&self, name: &str) -> Result<String> {
        let body = self.curl(&format!("/v2/apps?q=name:{name}"), &[]).await?;
        Ok(decode_first_guid("apps", body.as_bytes())?)
    }

    /// API path (`/v2/apps/<guid>`) of the app called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails or finds no app called `name`.
    pub async fn app_url(&self, name: &str) -> Result<String> {
        let body = self.curl(&format!("/v2/apps?q=name:{name}"), &[]).await?;
        Ok(decode_app_url(body.as_bytes())?)
    }

    /// Cell-private host and port of instance `0` of `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if either lookup fails or the stats have no instance `0`.
    pub async fn instance_endpoint(&self, name: &str) -> Result<InstanceEndpoint> {
        let url = self.app_url(name).await?;
        let body = self.curl(&format!("{url}/stats"), &[]).await?;
        Ok(decode_instance_endpoint(body.as_bytes())?)
    }

    /// Move `name` onto the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the app cannot be found or updated.
    pub async fn set_backend(&self, name: &str) -> Result<()> {
        let enabled = self.config.backend == "diego";
        let guid = self.app_guid(name).await?;
        self.curl(
            &format!("/v2/apps/{guid}"),
            &["-X", "PUT", "-d", &diego_update_body(enabled)],
        )
        .await?;
        Ok(())
    }

    /// Set the ports `name` listens on.
    ///
    /// # Errors
    ///
    /// Returns an error if the app cannot be found or updated.
    pub async fn update_ports(&self, name: &str, ports: &[u16]) -> Result<()> {
        let guid = self.app_guid(name).await?;
        self.curl(
            &format!("/v2/apps/{guid}"),
            &["-X", "PUT", "-d", &ports_update_body(ports)],
        )
        .await?;
        Ok(())
    }

    // ── Routes ────────────────────────────────────────────────────────────────

    /// Create `HOST.APPS_DOMAIN` in the configured space.
    ///
    /// # Errors
    ///
    /// Returns an error if `cf create-route` fails.
    pub async fn create_route(&self, host: &str) -> Result<()> {
        self.cf_ok(&[
            "create-route",
            &self.config.space,
            &self.config.apps_domain,
            "--hostname",
            host,
        ])
        .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the lookup fails or finds no route for `host`.
    pub async fn route_guid(&self, host: &str) -> Result<String> {
        let body = self.curl(&format!("/v2/routes?q=host:{host}"), &[]).await?;
        Ok(decode_first_guid("routes", body.as_bytes())?)
    }

    /// Map route `host` to `app_port` of app `app`.
    ///
    /// # Errors
    ///
    /// Returns an error if either lookup or the mapping request fails.
    pub async fn create_route_mapping(&self, app: &str, host: &str, app_port: u16) -> Result<()> {
        let app_guid = self.app_guid(app).await?;
        let route_guid = self.route_guid(host).await?;
        self.curl(
            "/v3/route_mappings",
            &[
                "-X",
                "POST",
                "-d",
                &route_mapping_body(&app_guid, &route_guid, app_port),
            ],
        )
        .await?;
        Ok(())
    }

    // ── Security groups (admin) ───────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns an error if `cf create-security-group` fails.
    pub async fn create_security_group(&self, name: &str, rules_path: &Path) -> Result<()> {
        let path = rules_path.to_string_lossy();
        self.cf_ok(&["create-security-group", name, path.as_ref()])
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if `cf bind-security-group` fails.
    pub async fn bind_security_group(&self, name: &str, org: &str, space: &str) -> Result<()> {
        self.cf_ok(&["bind-security-group", name, org, space]).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if `cf unbind-security-group` fails.
    pub async fn unbind_security_group(&self, name: &str, org: &str, space: &str) -> Result<()> {
        self.cf_ok(&["unbind-security-group", name, org, space])
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if `cf delete-security-group` fails.
    pub async fn delete_security_group(&self, name: &str) -> Result<()> {
        self.cf_ok(&["delete-security-group", name, "-f"]).await?;
        Ok(())
    }

    // ── Buildpacks (admin) ────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns an error if `cf create-buildpack` fails.
    pub async fn create_buildpack(&self, name: &str, zip: &Path, position: u32) -> Result<()> {
        let zip = zip.to_string_lossy();
        let position = position.to_string();
        self.cf_ok(&["create-buildpack", name, zip.as_ref(), &position])
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if `cf delete-buildpack` fails.
    pub async fn delete_buildpack(&self, name: &str) -> Result<()> {
        self.cf_ok(&["delete-buildpack", name, "-f"]).await?;
        Ok(())
    }
}
