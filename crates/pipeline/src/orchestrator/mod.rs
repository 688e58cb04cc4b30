//! One orchestrator per job kind.
//!
//! Every orchestrator that waits inline follows the same shape: submit,
//! open a pending job, poll through [`poll_job`], then settle the outcome in
//! the store. Submission failures return before any job is opened.

pub mod avatar;
pub mod hedra;
pub mod omnihuman;
pub mod speech;
pub mod stable_avatar;
pub mod topview;
pub mod voice;
pub mod voice_clone;

use std::fmt::Display;
use std::future::Future;

use studio_core::job::JobRecord;
use studio_core::poller::{poll_until_terminal, CheckError, PollOutcome, PollPolicy, PollStatus};

use crate::tracker::JobTracker;

/// Poll a tracked job, counting every completed check against it.
///
/// Checks that ended in a transient error are retried by the poller and
/// are not counted.
pub(crate) async fn poll_job<T, F, Fut>(
    tracker: &JobTracker,
    job: &JobRecord,
    policy: &PollPolicy,
    mut check: F,
) -> PollOutcome<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<PollStatus<T>, CheckError>>,
{
    let label = format!(
        "{}:{}",
        job.vendor,
        job.task_id.as_deref().unwrap_or(job.id.as_str())
    );
    let ceiling = Some(policy.max_attempts.max(1));

    poll_until_terminal(&label, policy, |attempt| {
        let pending = check(attempt);
        async move {
            let status = pending.await;
            if !matches!(status, Err(CheckError::Transient(_))) {
                tracker.attempt(&job.id, ceiling).await;
            }
            status
        }
    })
    .await
}

/// A success status without the output URL. Keep polling until the URL shows
/// up; if it never does the job ends as a timeout.
pub(crate) fn missing_output<T>(vendor: &str, task_id: &str, status: impl Display) -> PollStatus<T> {
    tracing::warn!(
        vendor,
        task_id,
        status = %status,
        "Vendor reported success without a video URL, still waiting",
    );
    PollStatus::Pending
}

/// Log a status value the adapter does not know and keep polling.
pub(crate) fn unknown_status<T>(vendor: &str, task_id: &str, status: impl Display) -> PollStatus<T> {
    tracing::warn!(vendor, task_id, status = %status, "Unknown vendor status, treating as pending");
    PollStatus::Pending
}
