//! Security group rule documents passed to `cf create-security-group`.

use serde::{Deserialize, Serialize};

/// Transport a rule applies to. The scenarios only open TCP ports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
}

/// One egress rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecurityRule {
    /// Single IP, CIDR or range (`10.0.0.1-10.0.0.9`).
    pub destination: String,
    /// Port, list (`80,443`) or range (`8000-9000`).
    pub ports: String,
    pub protocol: Protocol,
}

impl SecurityRule {
    /// Allow TCP traffic to a single `destination:port`.
    #[must_use]
    pub fn tcp(destination: impl Into<String>, port: u16) -> Self {
        Self {
            destination: destination.into(),
            ports: port.to_string(),
            protocol: Protocol::Tcp,
        }
    }
}

/// Render rules as the JSON array the platform CLI expects.
///
/// # Errors
///
/// Returns an error if a rule has an empty destination or serialization fails.
pub fn render_rules(rules: &[SecurityRule]) -> anyhow::Result<String> {
    if let Some(rule) = rules.iter().find(|r| r.destination.trim().is_empty()) {
        anyhow::bail!("security rule has empty destination: {rule:?}");
    }
    Ok(serde_json::to_string_pretty(rules)?)
}
