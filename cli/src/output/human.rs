//! Human-readable terminal renderer.

use std::path::Path;

use cats_common::{PollMode, PollReport, ScenarioInfo, ScenarioReport, SuiteReport, Verdict};
use owo_colors::OwoColorize as _;

use crate::domain::{ConfigError, SuiteConfig};
use crate::output::OutputContext;

/// Renders reports as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version.
    pub fn render_version(&self, version: &str) {
        println!("cats {version}");
    }

    /// Render per-scenario verdicts and the suite summary.
    pub fn render_suite(&self, report: &SuiteReport) {
        if !self.ctx.quiet {
            println!();
            for scenario in &report.scenarios {
                self.render_scenario(scenario);
            }
            println!();
        }

        let warnings: usize = report.scenarios.iter().map(|s| s.warnings.len()).sum();
        if warnings > 0 {
            self.ctx.warn(&format!(
                "{warnings} cleanup warning{}",
                if warnings == 1 { "" } else { "s" }
            ));
        }

        let summary = format_summary(report);
        if report.is_success() {
            self.ctx.success(&summary);
        } else {
            self.ctx.error(&summary);
        }
    }

    fn render_scenario(&self, scenario: &ScenarioReport) {
        let style = self.ctx.styles.verdict(scenario.verdict);
        println!(
            "  {:<8} {:<26} {}",
            verdict_label(scenario.verdict).style(style),
            scenario.name,
            format_duration_ms(scenario.duration_ms).style(self.ctx.styles.dim),
        );
        if let Some(message) = &scenario.message {
            for line in message.lines() {
                println!("           {line}");
            }
        }
        for warning in &scenario.warnings {
            println!("           {} {warning}", "!".style(self.ctx.styles.warning));
        }
    }

    /// Render `cats list`.
    pub fn render_scenarios(&self, scenarios: &[ScenarioInfo]) {
        println!("Scenarios:\n");
        for info in scenarios {
            let state = if info.enabled {
                "enabled".style(self.ctx.styles.success).to_string()
            } else {
                "disabled".style(self.ctx.styles.warning).to_string()
            };
            println!("  {:<26} {state:<8}  {}", info.name, info.description);
            if let Some(reason) = &info.skip_reason {
                println!("  {:<26} {}", "", reason.style(self.ctx.styles.dim));
            }
        }
        println!("\nRun one: cats run <name>");
    }

    /// Render the effective configuration. Passwords are masked.
    pub fn render_config(&self, config: &SuiteConfig, path: &Path) {
        let shown = config.redacted();
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        let rows: [(&str, String); 14] = [
            ("api:", shown.api.clone()),
            ("apps_domain:", shown.apps_domain.clone()),
            ("admin_user:", shown.admin_user.clone()),
            ("admin_password:", shown.admin_password.clone()),
            (
                "existing_user:",
                shown.existing_user.clone().unwrap_or_else(|| "(admin)".to_string()),
            ),
            ("org / space:", format!("{} / {}", shown.org, shown.space)),
            ("backend:", shown.backend.clone()),
            ("cf_binary:", shown.cf_binary.clone()),
            ("assets_dir:", shown.assets_dir.display().to_string()),
            ("default_timeout:", format!("{}s", shown.default_timeout)),
            ("cf_push_timeout:", format!("{}s", shown.cf_push_timeout)),
            (
                "sleep_timeout:",
                format!("{}s", shown.sleep_timeout_duration().as_secs()),
            ),
            ("include_routing:", shown.include_routing.to_string()),
            (
                "include_security_groups:",
                shown.include_security_groups.to_string(),
            ),
        ];
        for (key, value) in &rows {
            println!("  {key:<26} {value}");
        }
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["CONFIG", "CATS_API", "CATS_APPS_DOMAIN", "CATS_LOG", "NO_COLOR"] {
            println!(
                "    {:<24} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
    }

    /// Render the outcome of `cats config validate`.
    pub fn render_validation(&self, path: &Path, problems: &[ConfigError]) {
        if problems.is_empty() {
            self.ctx
                .success(&format!("{} is valid", path.display()));
            return;
        }
        self.ctx.error(&format!(
            "{} has {} problem{}",
            path.display(),
            problems.len(),
            if problems.len() == 1 { "" } else { "s" }
        ));
        for problem in problems {
            eprintln!("    {} {problem}", "✗".style(self.ctx.styles.error));
        }
    }

    /// Render the outcome of `cats eventually` / `cats consistently`.
    pub fn render_poll(&self, report: &PollReport) {
        let line = format_poll(report);
        if report.satisfied {
            self.ctx.success(&line);
        } else {
            self.ctx.error(&line);
        }
        if let Some(last) = &report.last
            && !self.ctx.quiet
        {
            println!("    {} {last}", "last:".style(self.ctx.styles.dim));
        }
    }
}

// ── Display helpers ───────────────────────────────────────────────────────────

#[must_use]
pub fn verdict_label(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Passed => "PASS",
        Verdict::Failed => "FAIL",
        Verdict::Skipped => "SKIP",
    }
}

/// `950ms`, `12.3s`, `2m 05s`.
#[must_use]
pub fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        return format!("{ms}ms");
    }
    let secs = ms / 1000;
    if secs < 60 {
        return format!("{secs}.{}s", (ms % 1000) / 100);
    }
    format!("{}m {:02}s", secs / 60, secs % 60)
}

#[must_use]
pub fn format_summary(report: &SuiteReport) -> String {
    format!(
        "{} passed, {} failed, {} skipped",
        report.count(Verdict::Passed),
        report.count(Verdict::Failed),
        report.count(Verdict::Skipped),
    )
}

#[must_use]
pub fn format_poll(report: &PollReport) -> String {
    let attempts = format!(
        "{} attempt{}",
        report.attempts,
        if report.attempts == 1 { "" } else { "s" }
    );
    let elapsed = format_duration_ms(report.elapsed_ms);
    match (report.mode, report.satisfied) {
        (PollMode::Eventually, true) => {
            format!("satisfied ({}) after {attempts} in {elapsed}", report.expected)
        }
        (PollMode::Eventually, false) => {
            format!("timed out after {attempts} in {elapsed}: expected {}", report.expected)
        }
        (PollMode::Consistently, true) => {
            format!("held ({}) for {elapsed} over {attempts}", report.expected)
        }
        (PollMode::Consistently, false) => format!(
            "violated on attempt {} after {elapsed}: expected {}",
            report.attempts, report.expected
        ),
    }
}
