use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Final verdict of one scenario.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Passed,
    Failed,
    Skipped,
}

/// Outcome of a single scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    pub verdict: Verdict,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Failure or skip reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Cleanup problems that did not change the verdict.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Aggregated outcome of `cats run`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteReport {
    pub scenarios: Vec<ScenarioReport>,
}

impl SuiteReport {
    /// Count scenarios with the given verdict.
    #[must_use]
    pub fn count(&self, verdict: Verdict) -> usize {
        self.scenarios.iter().filter(|s| s.verdict == verdict).count()
    }

    /// `true` when no scenario failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.count(Verdict::Failed) == 0
    }
}

/// One row of `cats list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScenarioInfo {
    pub name: String,
    pub description: String,
    pub enabled: bool,
    /// Why the scenario would be skipped under the current configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
}

/// Which polling semantics produced a [`PollReport`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PollMode {
    Eventually,
    Consistently,
}

/// Outcome of `cats eventually` / `cats consistently`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollReport {
    pub mode: PollMode,
    pub satisfied: bool,
    pub attempts: u32,
    pub elapsed_ms: u64,
    pub expected: String,
    /// Last observed value (or probe error) rendered as text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}
