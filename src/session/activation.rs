// SPDX-License-Identifier: MPL-2.0
//! Spreadsheet editor activation sequencer.
//!
//! The engine can report a loaded document before its edit-mode manager
//! exists, and the manager can exist before its setter is attached. The
//! sequencer polls for a usable manager with bounded backoff and switches it
//! to [`EditMode::Editing`] once, within a total deadline.
//!
//! Two entry points share the same attempt logic:
//! - [`activate`] runs to completion, sleeping between attempts
//! - [`ActivationRun`] performs one attempt per call so the session loop can
//!   interleave other work and drop the run when a newer load starts

use std::time::Duration;
use tokio::time::Instant;

use crate::application::port::{EngineError, EngineHandle};
use crate::config::{ActivationConfig, BackoffStrategy};
use crate::domain::activation::{ActivationAttempt, ActivationDeadline, BackoffDelay, EditMode};

// =============================================================================
// Policy
// =============================================================================

/// Timing rules of one activation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    strategy: BackoffStrategy,
    initial: BackoffDelay,
    max: BackoffDelay,
    deadline: ActivationDeadline,
}

impl BackoffPolicy {
    /// Doubling backoff from `initial`, capped at `max`.
    #[must_use]
    pub fn exponential(initial: BackoffDelay, max: BackoffDelay, deadline: ActivationDeadline) -> Self {
        Self {
            strategy: BackoffStrategy::Exponential,
            initial,
            max: max.max(initial),
            deadline,
        }
    }

    /// Constant `interval` between attempts.
    #[must_use]
    pub fn fixed(interval: BackoffDelay, deadline: ActivationDeadline) -> Self {
        Self {
            strategy: BackoffStrategy::Fixed,
            initial: interval,
            max: interval,
            deadline,
        }
    }

    /// Builds the policy from the `[activation]` config section.
    #[must_use]
    pub fn from_config(config: &ActivationConfig) -> Self {
        let defaults = ActivationConfig::default();
        let deadline = ActivationDeadline::from_millis(
            config
                .deadline_ms
                .or(defaults.deadline_ms)
                .unwrap_or_default(),
        );
        match config.strategy.unwrap_or_default() {
            BackoffStrategy::Fixed => Self::fixed(
                BackoffDelay::from_millis(
                    config
                        .fixed_interval_ms
                        .or(defaults.fixed_interval_ms)
                        .unwrap_or_default(),
                ),
                deadline,
            ),
            BackoffStrategy::Exponential => Self::exponential(
                BackoffDelay::from_millis(
                    config
                        .initial_backoff_ms
                        .or(defaults.initial_backoff_ms)
                        .unwrap_or_default(),
                ),
                BackoffDelay::from_millis(
                    config
                        .max_backoff_ms
                        .or(defaults.max_backoff_ms)
                        .unwrap_or_default(),
                ),
                deadline,
            ),
        }
    }

    /// Wait after the failed attempt number `attempt` (1-based).
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.strategy {
            BackoffStrategy::Fixed => self.initial.as_duration(),
            BackoffStrategy::Exponential => {
                let mut delay = self.initial;
                for _ in 1..attempt {
                    if delay >= self.max {
                        break;
                    }
                    delay = delay.doubled(self.max);
                }
                delay.as_duration()
            }
        }
    }

    #[must_use]
    pub fn deadline(&self) -> Duration {
        self.deadline.as_duration()
    }

    /// Longest single wait this policy can produce.
    #[must_use]
    pub fn max_interval(&self) -> Duration {
        self.max.as_duration()
    }

    #[must_use]
    pub fn strategy(&self) -> BackoffStrategy {
        self.strategy
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from_config(&ActivationConfig::default())
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// Edit mode was switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activated {
    /// The attempt that succeeded.
    pub attempt: ActivationAttempt,
}

impl Activated {
    #[must_use]
    pub fn retries(&self) -> u32 {
        self.attempt.retries()
    }
}

/// The deadline passed without a usable edit-mode manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unavailable {
    /// The last attempt made.
    pub attempt: ActivationAttempt,
    /// Why the last attempt failed.
    pub last_cause: AttemptFailure,
}

/// Why a single attempt did not activate editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// The engine has not created its edit-mode manager yet.
    ManagerMissing,
    /// The manager exists but its setter is not attached yet.
    SetterMissing,
    /// The setter raised an error.
    CallFailed(EngineError),
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptFailure::ManagerMissing => write!(f, "edit-mode manager not available"),
            AttemptFailure::SetterMissing => write!(f, "edit-mode setter not attached"),
            AttemptFailure::CallFailed(err) => write!(f, "{err}"),
        }
    }
}

/// Queries the engine once and switches editing on if possible.
///
/// The setter is invoked at most once per call.
///
/// # Errors
///
/// Returns the reason the attempt did not activate editing.
pub fn try_enable_editing<H: EngineHandle>(handle: &mut H) -> Result<(), AttemptFailure> {
    let Some(manager) = handle.edit_mode_manager() else {
        return Err(AttemptFailure::ManagerMissing);
    };
    if !manager.has_set_edit_mode() {
        return Err(AttemptFailure::SetterMissing);
    }
    manager
        .set_edit_mode(EditMode::Editing)
        .map_err(AttemptFailure::CallFailed)
}

// =============================================================================
// Step-wise run
// =============================================================================

/// Result of one [`ActivationRun::attempt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStep {
    Activated(Activated),
    /// Try again at the given instant.
    Retry {
        at: Instant,
        failure: ActivationAttempt,
        cause: AttemptFailure,
    },
    Exhausted(Unavailable),
}

/// One activation run, advanced explicitly by its owner.
#[derive(Debug, Clone)]
pub struct ActivationRun {
    policy: BackoffPolicy,
    started: Instant,
    attempts: u32,
    next_poll: Instant,
}

impl ActivationRun {
    /// Starts a run whose first attempt is due immediately.
    #[must_use]
    pub fn new(policy: BackoffPolicy, now: Instant) -> Self {
        Self {
            policy,
            started: now,
            attempts: 0,
            next_poll: now,
        }
    }

    /// When the next attempt is due.
    #[must_use]
    pub fn poll_at(&self) -> Instant {
        self.next_poll
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Makes one attempt at `now`.
    ///
    /// The next attempt is never scheduled past the deadline, so exhaustion
    /// is reported at the deadline or at most one interval after it.
    pub fn attempt<H: EngineHandle>(&mut self, handle: &mut H, now: Instant) -> RunStep {
        self.attempts += 1;
        let record = ActivationAttempt::new(self.attempts, now.saturating_duration_since(self.started));

        let cause = match try_enable_editing(handle) {
            Ok(()) => return RunStep::Activated(Activated { attempt: record }),
            Err(cause) => cause,
        };

        let deadline_at = self.started + self.policy.deadline();
        if now >= deadline_at {
            return RunStep::Exhausted(Unavailable {
                attempt: record,
                last_cause: cause,
            });
        }

        self.next_poll = (now + self.policy.delay_after(self.attempts)).min(deadline_at);
        RunStep::Retry {
            at: self.next_poll,
            failure: record,
            cause,
        }
    }
}

/// Runs the activation sequence to completion.
///
/// # Errors
///
/// Returns [`Unavailable`] once the policy deadline passes without success.
pub async fn activate<H: EngineHandle>(
    handle: &mut H,
    policy: BackoffPolicy,
) -> Result<Activated, Unavailable> {
    let mut run = ActivationRun::new(policy, Instant::now());
    loop {
        match run.attempt(handle, Instant::now()) {
            RunStep::Activated(activated) => return Ok(activated),
            RunStep::Exhausted(unavailable) => return Err(unavailable),
            RunStep::Retry { at, failure, cause } => {
                tracing::debug!(
                    stage = "activation",
                    attempt = failure.attempt_number,
                    cause = %cause,
                    "edit mode not ready, retrying"
                );
                tokio::time::sleep_until(at).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::simulated::{CapabilityScript, SimulatedHandle};

    fn exponential() -> BackoffPolicy {
        BackoffPolicy::exponential(
            BackoffDelay::from_millis(100),
            BackoffDelay::from_millis(2000),
            ActivationDeadline::from_millis(5000),
        )
    }

    #[test]
    fn exponential_delays_double_and_cap() {
        let policy = exponential();
        let delays: Vec<u128> = (1..=7).map(|n| policy.delay_after(n).as_millis()).collect();
        assert_eq!(delays, vec![100, 200, 400, 800, 1600, 2000, 2000]);
    }

    #[test]
    fn fixed_delay_is_constant() {
        let policy = BackoffPolicy::fixed(
            BackoffDelay::from_millis(500),
            ActivationDeadline::default(),
        );
        assert_eq!(policy.delay_after(1), Duration::from_millis(500));
        assert_eq!(policy.delay_after(9), Duration::from_millis(500));
        assert_eq!(policy.max_interval(), Duration::from_millis(500));
    }

    #[test]
    fn max_never_below_initial() {
        let policy = BackoffPolicy::exponential(
            BackoffDelay::from_millis(800),
            BackoffDelay::from_millis(200),
            ActivationDeadline::default(),
        );
        assert_eq!(policy.delay_after(3), Duration::from_millis(800));
    }

    #[test]
    fn default_policy_matches_config_defaults() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.strategy(), BackoffStrategy::Exponential);
        assert_eq!(policy.delay_after(1), Duration::from_millis(100));
        assert_eq!(policy.deadline(), Duration::from_millis(5000));
        assert_eq!(policy.max_interval(), Duration::from_millis(2000));
    }

    #[test]
    fn from_config_reads_fixed_strategy() {
        let config = ActivationConfig {
            strategy: Some(BackoffStrategy::Fixed),
            fixed_interval_ms: Some(500),
            deadline_ms: Some(2000),
            ..ActivationConfig::default()
        };
        let policy = BackoffPolicy::from_config(&config);
        assert_eq!(policy.strategy(), BackoffStrategy::Fixed);
        assert_eq!(policy.delay_after(4), Duration::from_millis(500));
        assert_eq!(policy.deadline(), Duration::from_secs(2));
    }

    #[test]
    fn try_enable_reports_each_failure_kind() {
        let mut handle = SimulatedHandle::detached(CapabilityScript::never());
        assert_eq!(
            try_enable_editing(&mut handle),
            Err(AttemptFailure::ManagerMissing)
        );

        let mut handle = SimulatedHandle::detached(CapabilityScript::ready().without_setter());
        assert_eq!(
            try_enable_editing(&mut handle),
            Err(AttemptFailure::SetterMissing)
        );

        let mut handle = SimulatedHandle::detached(CapabilityScript::ready().failing_calls(1));
        assert!(matches!(
            try_enable_editing(&mut handle),
            Err(AttemptFailure::CallFailed(_))
        ));
        assert_eq!(try_enable_editing(&mut handle), Ok(()));
    }

    #[test]
    fn run_schedules_final_attempt_at_deadline() {
        let start = Instant::now();
        let mut run = ActivationRun::new(exponential(), start);
        let mut handle = SimulatedHandle::detached(CapabilityScript::never());

        let mut now = start;
        let mut schedule = Vec::new();
        loop {
            match run.attempt(&mut handle, now) {
                RunStep::Retry { at, .. } => {
                    schedule.push((at - start).as_millis());
                    now = at;
                }
                RunStep::Exhausted(unavailable) => {
                    assert_eq!(unavailable.attempt.elapsed, Duration::from_millis(5000));
                    assert_eq!(unavailable.last_cause, AttemptFailure::ManagerMissing);
                    break;
                }
                RunStep::Activated(_) => panic!("capability never appears"),
            }
        }
        assert_eq!(schedule, vec![100, 300, 700, 1500, 3100, 5000]);
        assert_eq!(run.attempts(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn activates_on_first_attempt_without_retries() {
        let mut handle = SimulatedHandle::detached(CapabilityScript::ready());
        let started = Instant::now();

        let activated = activate(&mut handle, exponential())
            .await
            .expect("capability is ready");

        assert_eq!(activated.retries(), 0);
        assert_eq!(activated.attempt.attempt_number, 1);
        assert_eq!(Instant::now(), started);
        assert_eq!(handle.set_edit_mode_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unavailable_between_deadline_and_one_interval_later() {
        let policy = exponential();
        let mut handle = SimulatedHandle::detached(CapabilityScript::never());
        let started = Instant::now();

        let unavailable = activate(&mut handle, policy)
            .await
            .expect_err("capability never appears");

        let elapsed = Instant::now() - started;
        assert!(elapsed >= policy.deadline());
        assert!(elapsed <= policy.deadline() + policy.max_interval());
        assert_eq!(unavailable.last_cause, AttemptFailure::ManagerMissing);
        assert_eq!(handle.set_edit_mode_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn setter_errors_are_retried() {
        let mut handle = SimulatedHandle::detached(CapabilityScript::ready().failing_calls(2));

        let activated = activate(&mut handle, exponential())
            .await
            .expect("third call succeeds");

        assert_eq!(activated.attempt.attempt_number, 3);
        assert_eq!(activated.attempt.elapsed, Duration::from_millis(300));
        assert_eq!(handle.set_edit_mode_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn setter_failing_until_deadline_is_unavailable() {
        let mut handle =
            SimulatedHandle::detached(CapabilityScript::ready().failing_calls(u32::MAX));

        let unavailable = activate(&mut handle, exponential())
            .await
            .expect_err("setter never succeeds");

        assert!(matches!(unavailable.last_cause, AttemptFailure::CallFailed(_)));
        assert_eq!(unavailable.attempt.attempt_number, 7);
        assert_eq!(handle.set_edit_mode_calls(), unavailable.attempt.attempt_number);
    }

    #[tokio::test(start_paused = true)]
    async fn late_setter_is_picked_up() {
        let script = CapabilityScript::after_queries(2).setter_after_queries(4);
        let mut handle = SimulatedHandle::detached(script);

        let activated = activate(&mut handle, exponential())
            .await
            .expect("setter attaches on the fourth query");

        assert_eq!(activated.attempt.attempt_number, 4);
        assert_eq!(handle.set_edit_mode_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_strategy_waits_constant_interval() {
        let policy = BackoffPolicy::fixed(
            BackoffDelay::from_millis(500),
            ActivationDeadline::from_millis(5000),
        );
        let mut handle = SimulatedHandle::detached(CapabilityScript::after_queries(2));

        let activated = activate(&mut handle, policy).await.expect("ready on query 2");
        assert_eq!(activated.attempt.elapsed, Duration::from_millis(500));
    }
}
