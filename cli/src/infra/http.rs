//! Infrastructure implementation of the `HttpFetcher` port.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::HttpFetcher;

/// Blocking `ureq` agent driven from `spawn_blocking`.
///
/// Every request is bounded by the agent timeout, so a hanging app never
/// stalls the poller beyond one interval plus this timeout.
pub struct UreqFetcher {
    agent: ureq::Agent,
}

impl UreqFetcher {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl HttpFetcher for UreqFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let agent = self.agent.clone();
        let owned = url.to_string();
        tokio::task::spawn_blocking(move || {
            let request = agent.get(&owned).set("User-Agent", "cats-cli");
            let response = match request.call() {
                Ok(response) => response,
                // Status errors still carry a body the probe may assert on.
                Err(ureq::Error::Status(code, response)) => {
                    tracing::debug!(url = %owned, code, "non-success status");
                    response
                }
                Err(e) => anyhow::bail!("GET {owned}: {e}"),
            };
            response
                .into_string()
                .with_context(|| format!("reading body of {owned}"))
        })
        .await
        .context("spawn_blocking for http fetch")?
    }
}
