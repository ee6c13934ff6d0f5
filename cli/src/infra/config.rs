//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::SuiteConfig;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "CONFIG";

/// Production implementation of `ConfigStore`: a YAML (or JSON) file on disk
/// with `CATS_*` environment overrides applied on top.
#[derive(Debug, Default)]
pub struct YamlConfigStore {
    explicit: Option<PathBuf>,
}

impl YamlConfigStore {
    /// Store reading `path` when given, else `$CONFIG`, else
    /// `~/.cats/config.yaml`.
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { explicit: path }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<SuiteConfig> {
        let path = self.path()?;
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("cannot parse {}", path.display()))?
        } else if self.explicit.is_some() || std::env::var_os(CONFIG_ENV).is_some() {
            anyhow::bail!("config file {} does not exist", path.display());
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            SuiteConfig::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.explicit {
            return Ok(path.clone());
        }
        if let Ok(val) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".cats").join("config.yaml"))
    }
}
