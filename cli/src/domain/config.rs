//! Domain types and validators for suite configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access. Environment
//! overrides are applied through an injected lookup so tests never touch the
//! process environment.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_BACKENDS: &[&str] = &["diego", "dea"];

/// Consistently window used when `sleep_timeout` is not configured.
pub const DEFAULT_SLEEP_TIMEOUT: Duration = Duration::from_secs(45);

/// Environment overrides, applied on top of the config file.
pub const ENV_API: &str = "CATS_API";
pub const ENV_APPS_DOMAIN: &str = "CATS_APPS_DOMAIN";
pub const ENV_ADMIN_USER: &str = "CATS_ADMIN_USER";
pub const ENV_ADMIN_PASSWORD: &str = "CATS_ADMIN_PASSWORD";
pub const ENV_TIMEOUT_SECS: &str = "CATS_TIMEOUT_SEC";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration, read from the file named by `CONFIG` or
/// `~/.cats/config.yaml`. JSON config files parse as well.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Platform API endpoint, e.g. `api.example.com`.
    pub api: String,
    /// Shared domain apps are routed under, e.g. `apps.example.com`.
    pub apps_domain: String,
    pub admin_user: String,
    pub admin_password: String,
    /// Regular (non-admin) user. Falls back to the admin user when unset.
    pub existing_user: Option<String>,
    pub existing_user_password: Option<String>,
    /// Org and space scenarios deploy into. Must already exist.
    pub org: String,
    pub space: String,
    pub skip_ssl_validation: bool,
    /// Reach apps over `https` instead of `http`.
    pub use_https: bool,
    /// `diego` or `dea`.
    pub backend: String,
    /// Path or name of the platform CLI binary.
    pub cf_binary: String,
    pub ruby_buildpack_name: String,
    pub go_buildpack_name: String,
    /// Memory limit passed to `cf push -m`.
    pub memory_limit: String,
    /// Directory holding the sample apps and the staging buildpack zip.
    pub assets_dir: PathBuf,
    /// Seconds; bound on ordinary CLI calls and eventually checks.
    pub default_timeout: u64,
    /// Seconds; bound on push/start/restart.
    pub cf_push_timeout: u64,
    /// Seconds; consistently window for routing checks.
    pub sleep_timeout: Option<u64>,
    pub include_routing: bool,
    pub include_security_groups: bool,
    /// Prefix for random resource names.
    pub name_prefix: String,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            api: String::new(),
            apps_domain: String::new(),
            admin_user: "admin".to_string(),
            admin_password: String::new(),
            existing_user: None,
            existing_user_password: None,
            org: String::new(),
            space: String::new(),
            skip_ssl_validation: false,
            use_https: false,
            backend: "diego".to_string(),
            cf_binary: "cf".to_string(),
            ruby_buildpack_name: "ruby_buildpack".to_string(),
            go_buildpack_name: "go_buildpack".to_string(),
            memory_limit: "256M".to_string(),
            assets_dir: PathBuf::from("assets"),
            default_timeout: 30,
            cf_push_timeout: 120,
            sleep_timeout: None,
            include_routing: true,
            include_security_groups: true,
            name_prefix: "CATS".to_string(),
        }
    }
}

/// Login identity for one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl SuiteConfig {
    #[must_use]
    pub fn default_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.default_timeout)
    }

    #[must_use]
    pub fn cf_push_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.cf_push_timeout)
    }

    /// Consistently window for routing checks.
    #[must_use]
    pub fn sleep_timeout_duration(&self) -> Duration {
        match self.sleep_timeout {
            Some(secs) if secs > 0 => Duration::from_secs(secs),
            _ => DEFAULT_SLEEP_TIMEOUT,
        }
    }

    #[must_use]
    pub fn admin_credentials(&self) -> Credentials {
        Credentials {
            user: self.admin_user.clone(),
            password: self.admin_password.clone(),
        }
    }

    #[must_use]
    pub fn regular_credentials(&self) -> Credentials {
        match (&self.existing_user, &self.existing_user_password) {
            (Some(user), Some(password)) => Credentials {
                user: user.clone(),
                password: password.clone(),
            },
            _ => self.admin_credentials(),
        }
    }

    /// URL of `path` on the app routed at `host`.
    #[must_use]
    pub fn app_url(&self, host: &str, path: &str) -> String {
        let scheme = if self.use_https { "https" } else { "http" };
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{scheme}://{host}.{}/{path}", self.apps_domain)
    }

    #[must_use]
    pub fn dora_path(&self) -> PathBuf {
        self.assets_dir.join("dora")
    }

    #[must_use]
    pub fn lattice_app_path(&self) -> PathBuf {
        self.assets_dir.join("lattice-app")
    }

    #[must_use]
    pub fn security_group_buildpack_path(&self) -> PathBuf {
        self.assets_dir.join("security_group_buildpack.zip")
    }

    /// Copy safe to print: passwords are masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mask = |secret: &str| {
            if secret.is_empty() {
                String::new()
            } else {
                "********".to_string()
            }
        };
        Self {
            admin_password: mask(&self.admin_password),
            existing_user_password: self.existing_user_password.as_deref().map(mask),
            ..self.clone()
        }
    }

    /// Apply `CATS_*` overrides using `lookup` (normally `std::env::var`).
    ///
    /// # Errors
    ///
    /// Returns an error if `CATS_TIMEOUT_SEC` is not a positive integer.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let nonempty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = nonempty(ENV_API) {
            self.api = v;
        }
        if let Some(v) = nonempty(ENV_APPS_DOMAIN) {
            self.apps_domain = v;
        }
        if let Some(v) = nonempty(ENV_ADMIN_USER) {
            self.admin_user = v;
        }
        if let Some(v) = nonempty(ENV_ADMIN_PASSWORD) {
            self.admin_password = v;
        }
        if let Some(v) = nonempty(ENV_TIMEOUT_SECS) {
            self.default_timeout = parse_positive_secs(ENV_TIMEOUT_SECS, &v)?;
        }
        Ok(())
    }

    /// Every problem with this configuration, in field order.
    #[must_use]
    pub fn problems(&self) -> Vec<ConfigError> {
        let mut problems = Vec::new();
        let required = [
            ("api", &self.api),
            ("apps_domain", &self.apps_domain),
            ("admin_user", &self.admin_user),
            ("org", &self.org),
            ("space", &self.space),
            ("cf_binary", &self.cf_binary),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                problems.push(ConfigError::MissingField(key));
            }
        }
        if !VALID_BACKENDS.contains(&self.backend.as_str()) {
            problems.push(ConfigError::UnknownBackend {
                value: self.backend.clone(),
                valid: VALID_BACKENDS.join(", "),
            });
        }
        for (key, secs) in [
            ("default_timeout", self.default_timeout),
            ("cf_push_timeout", self.cf_push_timeout),
        ] {
            if secs == 0 {
                problems.push(ConfigError::InvalidValue {
                    key: key.to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
        }
        if self.existing_user.is_some() != self.existing_user_password.is_some() {
            problems.push(ConfigError::InvalidValue {
                key: "existing_user".to_string(),
                reason: "existing_user and existing_user_password must be set together"
                    .to_string(),
            });
        }
        problems
    }

    /// Validate the configuration, failing on the first problem.
    ///
    /// # Errors
    ///
    /// Returns the first entry of [`SuiteConfig::problems`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.problems().into_iter().next() {
            Some(problem) => Err(problem),
            None => Ok(()),
        }
    }
}

/// Parses a positive number of seconds.
///
/// # Errors
///
/// Returns an error when the value is non-numeric or zero.
pub fn parse_positive_secs(key: &str, raw: &str) -> Result<u64, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    };
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("must be a positive integer number of seconds"))?;
    if secs == 0 {
        return Err(invalid("must be greater than zero"));
    }
    Ok(secs)
}

// ── Unit tests ───────────────────────────────────────────────────────────────
