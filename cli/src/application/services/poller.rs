//! Eventually/consistently polling over an arbitrary probe.
//!
//! Both loops evaluate immediately, then sleep `interval` between attempts.
//! The last sleep is cut short so the final evaluation lands on the deadline,
//! never after it. Time comes from `tokio::time`, so paused-clock tests run
//! instantly.
//! The poller owns no state beyond one call; probes bound their own runtime.

use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};

use crate::domain::matcher::Matcher;
use crate::domain::poll::{
    HoldSuccess, Observation, PollFailure, PollPolicy, PollState, PollSuccess,
};

async fn observe<T, F, Fut>(probe: &mut F) -> Observation<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    match probe().await {
        Ok(value) => Observation::Value(value),
        Err(e) => Observation::ProbeError(format!("{e:#}")),
    }
}

fn mismatch<T, M>(matcher: &M, observation: &Observation<T>) -> String
where
    T: Debug,
    M: Matcher<T> + ?Sized,
{
    match observation {
        Observation::Value(v) => matcher.describe_mismatch(v),
        error @ Observation::ProbeError(_) => error.to_string(),
    }
}

/// Move to `to`; terminal states are never left.
fn advance(from: PollState, to: PollState) -> PollState {
    debug_assert!(!from.is_terminal(), "{from:?} is terminal");
    tracing::trace!(?from, ?to, "poll state");
    to
}

/// Time to sleep before the next attempt: one interval, capped at what is
/// left before the deadline.
fn next_pause(policy: &PollPolicy, elapsed: Duration) -> Duration {
    policy
        .interval()
        .min(policy.timeout().saturating_sub(elapsed))
}

/// Poll `probe` until `matcher` accepts its value or `policy.timeout()` passes.
///
/// The first evaluation is immediate and always happens. Later evaluations
/// run every `interval`, with the last one landing exactly on the deadline,
/// so no verdict rests on a value observed after it. Probe errors count as
/// unsatisfied and are retried.
///
/// # Errors
///
/// Returns [`PollFailure::TimedOut`] carrying the last observation, the
/// number of attempts and the elapsed time.
pub async fn poll_until<T, F, Fut, M>(
    mut probe: F,
    matcher: &M,
    policy: PollPolicy,
) -> Result<PollSuccess<T>, PollFailure<T>>
where
    T: Debug,
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
    M: Matcher<T> + ?Sized,
{
    let start = Instant::now();
    let mut attempts: u32 = 0;
    let mut state = PollState::NotStarted;
    tracing::debug!(
        expected = %matcher.describe(),
        timeout = ?policy.timeout(),
        interval = ?policy.interval(),
        "eventually: polling"
    );
    loop {
        state = advance(state, PollState::Evaluating);
        attempts = attempts.saturating_add(1);
        let observation = observe(&mut probe).await;
        let elapsed = start.elapsed();

        let last = match observation {
            Observation::Value(value) if matcher.matches(&value) => {
                advance(state, PollState::Satisfied);
                tracing::info!(attempts, ?elapsed, "eventually: satisfied");
                return Ok(PollSuccess {
                    value,
                    attempts,
                    elapsed,
                });
            }
            other => other,
        };

        let reason = mismatch(matcher, &last);
        tracing::debug!(attempt = attempts, ?elapsed, %reason, "eventually: not yet");
        if elapsed >= policy.timeout() {
            advance(state, PollState::TimedOut);
            tracing::warn!(attempts, ?elapsed, "eventually: timed out");
            return Err(PollFailure::TimedOut {
                last,
                attempts,
                elapsed,
                expected: matcher.describe(),
                mismatch: reason,
            });
        }
        sleep(next_pause(&policy, elapsed)).await;
    }
}

/// Check that `matcher` accepts every value `probe` produces for the whole
/// `policy.timeout()` window.
///
/// Evaluates immediately, then every `interval` until the window has
/// elapsed; the last evaluation lands on the window's end. The first
/// violation (including a probe error) ends the check without waiting out
/// the window.
///
/// # Errors
///
/// Returns [`PollFailure::Violated`] with the violating observation, the
/// attempt it happened on and the elapsed time.
pub async fn holds_throughout<T, F, Fut, M>(
    mut probe: F,
    matcher: &M,
    policy: PollPolicy,
) -> Result<HoldSuccess, PollFailure<T>>
where
    T: Debug,
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
    M: Matcher<T> + ?Sized,
{
    let start = Instant::now();
    let mut attempts: u32 = 0;
    let mut state = PollState::NotStarted;
    tracing::debug!(
        expected = %matcher.describe(),
        duration = ?policy.timeout(),
        interval = ?policy.interval(),
        "consistently: watching"
    );
    loop {
        state = advance(state, PollState::Evaluating);
        attempts = attempts.saturating_add(1);
        let observation = observe(&mut probe).await;
        let elapsed = start.elapsed();

        match observation {
            Observation::Value(ref value) if matcher.matches(value) => {
                tracing::debug!(attempt = attempts, ?elapsed, "consistently: holds");
            }
            violating => {
                advance(state, PollState::Violated);
                let reason = mismatch(matcher, &violating);
                tracing::warn!(attempt = attempts, ?elapsed, %reason, "consistently: violated");
                return Err(PollFailure::Violated {
                    observed: violating,
                    attempt: attempts,
                    elapsed,
                    expected: matcher.describe(),
                    mismatch: reason,
                });
            }
        }

        if elapsed >= policy.timeout() {
            advance(state, PollState::Satisfied);
            tracing::info!(attempts, ?elapsed, "consistently: held for the whole window");
            return Ok(HoldSuccess { attempts, elapsed });
        }
        sleep(next_pause(&policy, elapsed)).await;
    }
}
