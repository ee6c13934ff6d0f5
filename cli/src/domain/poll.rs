//! Poll policies, observations and verdicts for eventually/consistently checks.
//!
//! Pure types only. The loop that drives a probe lives in
//! `application::services::poller`.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::domain::error::PolicyError;

// ── Policy ────────────────────────────────────────────────────────────────────

/// Timing bounds for a single assertion.
///
/// Fields are private so a policy can only exist once validated: the interval
/// and the timeout (or consistently window) are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    timeout: Duration,
    interval: Duration,
}

impl PollPolicy {
    /// Policy for "eventually" checks: keep polling until `timeout` has elapsed.
    ///
    /// # Errors
    ///
    /// Returns an error if `interval` or `timeout` is zero.
    pub fn eventually(timeout: Duration, interval: Duration) -> Result<Self, PolicyError> {
        if interval.is_zero() {
            return Err(PolicyError::NonPositiveInterval);
        }
        if timeout.is_zero() {
            return Err(PolicyError::NonPositiveTimeout);
        }
        Ok(Self { timeout, interval })
    }

    /// Policy for "consistently" checks: every evaluation within `duration`
    /// must hold.
    ///
    /// # Errors
    ///
    /// Returns an error if `interval` or `duration` is zero.
    pub fn consistently(duration: Duration, interval: Duration) -> Result<Self, PolicyError> {
        if interval.is_zero() {
            return Err(PolicyError::NonPositiveInterval);
        }
        if duration.is_zero() {
            return Err(PolicyError::NonPositiveDuration);
        }
        Ok(Self {
            timeout: duration,
            interval,
        })
    }

    /// Deadline (eventually) or window length (consistently).
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sleep between two evaluations.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Lower bound on evaluations a never-satisfied probe receives:
    /// `floor(timeout / interval) + 1`.
    #[must_use]
    pub fn guaranteed_attempts(&self) -> u128 {
        self.timeout.as_nanos() / self.interval.as_nanos() + 1
    }
}

/// Seconds given on the command line as a duration.
///
/// Negative, non-finite and overflowing values become zero so that
/// [`PollPolicy`] construction rejects them with the matching error.
#[must_use]
pub fn secs_f64(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
    } else {
        Duration::ZERO
    }
}

// ── State machine ─────────────────────────────────────────────────────────────

/// Lifecycle of one assertion.
///
/// `NotStarted -> Evaluating -> {Satisfied | Violated | TimedOut}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    NotStarted,
    Evaluating,
    Satisfied,
    Violated,
    TimedOut,
}

impl PollState {
    /// Terminal states are never left.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Satisfied | Self::Violated | Self::TimedOut)
    }
}

// ── Observations ──────────────────────────────────────────────────────────────

/// What one probe invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation<T> {
    /// The probe returned a value (which may or may not match).
    Value(T),
    /// The probe failed; treated as "not yet satisfied".
    ProbeError(String),
}

impl<T: fmt::Debug> fmt::Display for Observation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v:?}"),
            Self::ProbeError(e) => write!(f, "probe error: {e}"),
        }
    }
}

// ── Verdicts ──────────────────────────────────────────────────────────────────

/// Eventually succeeded with `value` on attempt `attempts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSuccess<T> {
    pub value: T,
    pub attempts: u32,
    pub elapsed: Duration,
}

/// Consistently held for the whole window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldSuccess {
    pub attempts: u32,
    pub elapsed: Duration,
}

/// Why an assertion failed.
#[derive(Debug, Error)]
pub enum PollFailure<T> {
    /// Never satisfied before the deadline ("it was never true").
    #[error(
        "condition not met after {attempts} attempt(s) in {elapsed:?}: expected {expected}, but {mismatch}"
    )]
    TimedOut {
        last: Observation<T>,
        attempts: u32,
        elapsed: Duration,
        expected: String,
        /// The matcher's account of why `last` was rejected.
        mismatch: String,
    },

    /// Stopped holding inside the window ("it was true, then became false").
    #[error(
        "condition violated on attempt {attempt} after {elapsed:?}: expected {expected}, but {mismatch}"
    )]
    Violated {
        observed: Observation<T>,
        attempt: u32,
        elapsed: Duration,
        expected: String,
        mismatch: String,
    },
}

impl<T> PollFailure<T> {
    /// Terminal state this failure corresponds to.
    #[must_use]
    pub fn state(&self) -> PollState {
        match self {
            Self::TimedOut { .. } => PollState::TimedOut,
            Self::Violated { .. } => PollState::Violated,
        }
    }

    /// The last (timeout) or violating observation.
    #[must_use]
    pub fn observation(&self) -> &Observation<T> {
        match self {
            Self::TimedOut { last, .. } => last,
            Self::Violated { observed, .. } => observed,
        }
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self {
            Self::TimedOut { attempts, .. } => *attempts,
            Self::Violated { attempt, .. } => *attempt,
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        match self {
            Self::TimedOut { elapsed, .. } | Self::Violated { elapsed, .. } => *elapsed,
        }
    }

    #[must_use]
    pub fn expected(&self) -> &str {
        match self {
            Self::TimedOut { expected, .. } | Self::Violated { expected, .. } => expected,
        }
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
