//! Generic repeated-status-check engine.
//!
//! [`poll_until_terminal`] drives one task to a terminal state by invoking a
//! caller-supplied status check, sleeping [`PollPolicy::interval`] between
//! checks, until the check reports success or failure or the attempt ceiling
//! runs out. Checks for one task never overlap.
//!
//! Two budgets are kept apart:
//!
//! - `max_attempts` bounds the number of completed status checks.
//! - `transient_retries` bounds how often a single check may be repeated after
//!   a transport failure. It resets after every completed check.
//!
//! Structured vendor errors are never retried.

use std::future::Future;
use std::time::Duration;

use crate::vendor_error::VendorError;

/// Timing and retry configuration for one polling sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between two status checks (and between transient retries).
    pub interval: Duration,
    /// Ceiling on completed status checks before the task times out.
    pub max_attempts: u32,
    /// Extra tries for a single check that failed with a transient error.
    pub transient_retries: u32,
    /// Optional upper bound on a single status-check call.
    pub call_timeout: Option<Duration>,
}

impl PollPolicy {
    pub const fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
            transient_retries: 1,
            call_timeout: None,
        }
    }

    pub const fn with_transient_retries(mut self, retries: u32) -> Self {
        self.transient_retries = retries;
        self
    }

    pub const fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Approximate wall-clock window before the task times out.
    pub fn window(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

/// What a single status check observed.
#[derive(Debug, Clone, PartialEq)]
pub enum PollStatus<T> {
    /// Still queued or processing.
    Pending,
    /// Terminal success with the kind-specific payload.
    Done(T),
    /// Terminal failure reported by the vendor.
    Failed(VendorError),
}

/// Why a status check could not produce a [`PollStatus`].
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// Network failure, timeout, or a non-2xx answer without a recognizable
    /// error body. Retried.
    #[error("transient failure: {0}")]
    Transient(String),

    /// The vendor answered with a structured error. Never retried.
    #[error(transparent)]
    Vendor(#[from] VendorError),
}

/// Terminal result of a polling sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<T> {
    Success { value: T, attempts: u32 },
    Failed { error: VendorError, attempts: u32 },
    Timeout { attempts: u32 },
}

impl<T> PollOutcome<T> {
    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Success { attempts, .. }
            | PollOutcome::Failed { attempts, .. }
            | PollOutcome::Timeout { attempts } => *attempts,
        }
    }
}

/// Poll `check` until it reports a terminal state or the ceiling is reached.
///
/// `check` receives the 1-based attempt number. A ceiling of zero is treated
/// as one so that at least one check is made.
pub async fn poll_until_terminal<T, F, Fut>(
    label: &str,
    policy: &PollPolicy,
    mut check: F,
) -> PollOutcome<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<PollStatus<T>, CheckError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempts = 0u32;

    loop {
        let status = check_with_retries(label, policy, attempts + 1, &mut check).await;
        attempts += 1;

        match status {
            Ok(PollStatus::Done(value)) => {
                tracing::debug!(task = label, attempts, "Task reached success");
                return PollOutcome::Success { value, attempts };
            }
            Ok(PollStatus::Failed(error)) | Err(error) => {
                tracing::warn!(task = label, attempts, error = %error, "Task failed");
                return PollOutcome::Failed { error, attempts };
            }
            Ok(PollStatus::Pending) => {}
        }

        if attempts >= max_attempts {
            tracing::warn!(
                task = label,
                attempts,
                window_secs = policy.window().as_secs(),
                "Task did not finish before the attempt ceiling",
            );
            return PollOutcome::Timeout { attempts };
        }

        tracing::trace!(task = label, attempts, "Task still pending");
        tokio::time::sleep(policy.interval).await;
    }
}

/// Run one status check, retrying transient failures within the policy's budget.
///
/// Returns the observed status, or the error that ended the check: a vendor
/// error as-is, or a network error once the transient budget is spent.
pub async fn check_with_retries<T, F, Fut>(
    label: &str,
    policy: &PollPolicy,
    attempt: u32,
    check: &mut F,
) -> Result<PollStatus<T>, VendorError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<PollStatus<T>, CheckError>>,
{
    let mut retries_left = policy.transient_retries;

    loop {
        match run_check(policy, check(attempt)).await {
            Ok(status) => return Ok(status),
            Err(CheckError::Vendor(error)) => return Err(error),
            Err(CheckError::Transient(reason)) if retries_left > 0 => {
                retries_left -= 1;
                tracing::warn!(
                    task = label,
                    attempt,
                    retries_left,
                    error = %reason,
                    "Status check failed, retrying",
                );
                tokio::time::sleep(policy.interval).await;
            }
            Err(CheckError::Transient(reason)) => {
                tracing::error!(task = label, attempt, error = %reason, "Status check retries exhausted");
                return Err(VendorError::network(&reason));
            }
        }
    }
}

async fn run_check<T, Fut>(policy: &PollPolicy, fut: Fut) -> Result<PollStatus<T>, CheckError>
where
    Fut: Future<Output = Result<PollStatus<T>, CheckError>>,
{
    match policy.call_timeout {
        Some(limit) => match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(CheckError::Transient(format!(
                "status check exceeded {}ms",
                limit.as_millis()
            ))),
        },
        None => fut.await,
    }
}
