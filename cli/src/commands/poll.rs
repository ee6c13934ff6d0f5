//! `cats eventually` / `cats consistently`: poll an ad-hoc probe from the
//! command line.
//!
//! The probe is either a URL (`--url`) or a command after `--`. Its output is
//! checked against `--contains`, `--equals` and `--matches`; several of them
//! must all hold unless `--any` is given, and `--not` inverts the result.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use cats_common::{PollMode, PollReport};
use clap::Args;

use crate::app::AppContext;
use crate::application::services::probes::ProbeTarget;
use crate::application::services::{holds_throughout, poll_until};
use crate::domain::matcher::{all_of, any_of, contains_substring, eq, matches_regex, not};
use crate::domain::{ConfigError, Matcher, Observation, PollFailure, PollPolicy, secs_f64};
use crate::infra::{TokioCommandRunner, UreqFetcher};

/// What to observe on each attempt.
#[derive(Args)]
pub struct ProbeArgs {
    /// Fetch this URL and match the response body
    #[arg(long, conflicts_with = "command")]
    pub url: Option<String>,

    /// Bound on a single probe, in seconds
    #[arg(long, default_value_t = 30.0)]
    pub probe_timeout: f64,

    /// Command to run; its stdout is matched
    #[arg(last = true, required_unless_present = "url")]
    pub command: Vec<String>,
}

/// How to judge each observation.
#[derive(Args)]
#[group(required = true, multiple = true)]
pub struct MatchArgs {
    /// Output contains this text
    #[arg(long)]
    pub contains: Option<String>,

    /// Output equals this text exactly
    #[arg(long)]
    pub equals: Option<String>,

    /// Output matches this regular expression
    #[arg(long)]
    pub matches: Option<String>,
}

/// How several expectations combine.
#[derive(Args, Default)]
pub struct MatchMode {
    /// Accept output that meets any one expectation
    #[arg(long)]
    pub any: bool,

    /// Invert the combined expectation
    #[arg(long = "not")]
    pub negate: bool,
}

/// Arguments for `cats eventually`.
#[derive(Args)]
pub struct EventuallyArgs {
    /// Give up after this many seconds
    #[arg(long, default_value_t = 30.0)]
    pub timeout: f64,

    /// Seconds between attempts
    #[arg(long, default_value_t = 1.0)]
    pub interval: f64,

    #[command(flatten)]
    pub matcher: MatchArgs,

    #[command(flatten)]
    pub mode: MatchMode,

    #[command(flatten)]
    pub probe: ProbeArgs,
}

/// Arguments for `cats consistently`.
#[derive(Args)]
pub struct ConsistentlyArgs {
    /// Window, in seconds, the condition must hold for
    #[arg(long)]
    pub duration: f64,

    /// Seconds between attempts
    #[arg(long, default_value_t = 1.0)]
    pub interval: f64,

    #[command(flatten)]
    pub matcher: MatchArgs,

    #[command(flatten)]
    pub mode: MatchMode,

    #[command(flatten)]
    pub probe: ProbeArgs,
}

impl MatchArgs {
    /// Build the matcher selected on the command line.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a malformed `--matches`
    /// pattern, or [`ConfigError::MissingField`] when no expectation was given.
    pub fn build(&self, mode: &MatchMode) -> Result<Box<dyn Matcher<String>>, ConfigError> {
        let mut matchers: Vec<Box<dyn Matcher<String>>> = Vec::new();
        if let Some(needle) = &self.contains {
            matchers.push(Box::new(contains_substring(needle.clone())));
        }
        if let Some(expected) = &self.equals {
            matchers.push(Box::new(eq(expected.clone())));
        }
        if let Some(pattern) = &self.matches {
            let regex = matches_regex(pattern).map_err(|e| ConfigError::InvalidValue {
                key: "--matches".to_string(),
                reason: e.to_string(),
            })?;
            matchers.push(Box::new(regex));
        }

        let combined: Box<dyn Matcher<String>> = match matchers.len() {
            0 => return Err(ConfigError::MissingField("--contains, --equals or --matches")),
            1 => matchers.remove(0),
            _ if mode.any => Box::new(any_of(matchers)),
            _ => Box::new(all_of(matchers)),
        };
        Ok(if mode.negate {
            Box::new(not(combined))
        } else {
            combined
        })
    }
}

impl ProbeArgs {
    /// Resolve the probe target.
    ///
    /// # Errors
    ///
    /// Returns an error if neither a URL nor a command was given.
    pub fn target(&self) -> Result<ProbeTarget> {
        match &self.url {
            Some(url) => Ok(ProbeTarget::Url(url.clone())),
            None => ProbeTarget::command(&self.command, self.probe_timeout()),
        }
    }

    fn probe_timeout(&self) -> Duration {
        match secs_f64(self.probe_timeout) {
            d if d.is_zero() => Duration::from_secs(30),
            d => d,
        }
    }
}

fn render_observation(observation: &Observation<String>) -> String {
    match observation {
        Observation::Value(v) => v.clone(),
        Observation::ProbeError(e) => format!("probe error: {e}"),
    }
}

fn failure_report(mode: PollMode, failure: &PollFailure<String>) -> PollReport {
    PollReport {
        mode,
        satisfied: false,
        attempts: failure.attempts(),
        elapsed_ms: millis(failure.elapsed()),
        expected: failure.expected().to_string(),
        last: Some(render_observation(failure.observation())),
    }
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

fn finish(app: &AppContext, report: &PollReport) -> Result<ExitCode> {
    app.renderer().render_poll(report)?;
    Ok(if report.satisfied {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Entry point for `cats eventually`.
///
/// # Errors
///
/// Returns an error for an invalid policy, matcher or probe; a condition
/// that is never met is reported and exits 1.
pub async fn eventually(app: &AppContext, args: &EventuallyArgs) -> Result<ExitCode> {
    let policy = PollPolicy::eventually(secs_f64(args.timeout), secs_f64(args.interval))?;
    let matcher = args.matcher.build(&args.mode)?;
    let target = args.probe.target()?;
    let probe_timeout = args.probe.probe_timeout();
    let runner = TokioCommandRunner::new(probe_timeout);
    let fetcher = UreqFetcher::new(probe_timeout);

    let report = match poll_until(|| target.observe(&runner, &fetcher), &*matcher, policy).await {
        Ok(success) => PollReport {
            mode: PollMode::Eventually,
            satisfied: true,
            attempts: success.attempts,
            elapsed_ms: millis(success.elapsed),
            expected: matcher.describe(),
            last: Some(success.value),
        },
        Err(failure) => failure_report(PollMode::Eventually, &failure),
    };
    finish(app, &report)
}

/// Entry point for `cats consistently`.
///
/// # Errors
///
/// Returns an error for an invalid policy, matcher or probe; a violation is
/// reported and exits 1.
pub async fn consistently(app: &AppContext, args: &ConsistentlyArgs) -> Result<ExitCode> {
    let policy = PollPolicy::consistently(secs_f64(args.duration), secs_f64(args.interval))?;
    let matcher = args.matcher.build(&args.mode)?;
    let target = args.probe.target()?;
    let probe_timeout = args.probe.probe_timeout();
    let runner = TokioCommandRunner::new(probe_timeout);
    let fetcher = UreqFetcher::new(probe_timeout);

    let report =
        match holds_throughout(|| target.observe(&runner, &fetcher), &*matcher, policy).await {
            Ok(held) => PollReport {
                mode: PollMode::Consistently,
                satisfied: true,
                attempts: held.attempts,
                elapsed_ms: millis(held.elapsed),
                expected: matcher.describe(),
                last: None,
            },
            Err(failure) => failure_report(PollMode::Consistently, &failure),
        };
    finish(app, &report)
}
