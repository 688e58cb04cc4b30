//! Voice cloning.
//!
//! The orchestrator never waits here. Fish Audio clones are finished on
//! submission and recorded as successful at once; Cicada clones are recorded
//! as pending with their task id and credential so that
//! [`crate::scheduler::VoiceCloneScheduler`] can resolve them later.

use serde::{Deserialize, Serialize};
use studio_core::error::CoreError;
use studio_core::job::{Completion, JobKind, JobRecord, NewJob};
use studio_core::messages;
use studio_core::poller::{CheckError, PollStatus};
use studio_core::submission::Submission;
use studio_core::vendor_error::VendorError;
use studio_vendors::sentinel::Progress;
use studio_vendors::voice_clone::{CloneProvider, CloneRequest, CLONE_CODES};

use super::unknown_status;
use crate::error::PipelineError;
use crate::tracker::JobTracker;
use crate::vendor::VoiceCloneVendor;

/// Result stored on a finished clone job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClonedAudio {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    pub audio_url: Option<String>,
}

/// Submit a clone and record it.
///
/// Returns the stored job: `success` for synchronous providers, `pending`
/// for queued ones.
pub async fn submit(
    vendor: &dyn VoiceCloneVendor,
    tracker: &JobTracker,
    provider: CloneProvider,
    api_key: &str,
    request: CloneRequest,
) -> Result<JobRecord, PipelineError> {
    let name = request.name.clone();
    let submission = vendor
        .submit(provider, api_key, request)
        .await
        .map_err(PipelineError::submit)?;

    match submission {
        Submission::Immediate(voice) => {
            let job = tracker
                .open(
                    NewJob::new(JobKind::VoiceClone, provider.as_str())
                        .with_task_id(&voice.voice_id)
                        .with_name(name),
                )
                .await?;
            let result = ClonedAudio {
                voice_id: Some(voice.voice_id),
                audio_url: None,
            };
            let result = serde_json::to_value(result)
                .map_err(|e| CoreError::Internal(e.to_string()))?;
            tracker.complete(&job.id, Completion::Success(result)).await?;
            reload(tracker, job).await
        }
        Submission::Deferred { task_id } => {
            let job = tracker
                .open(
                    NewJob::new(JobKind::VoiceClone, provider.as_str())
                        .with_task_id(task_id)
                        .with_name(name)
                        .with_api_key(api_key),
                )
                .await?;
            tracing::info!(job_id = %job.id, "Voice clone queued for background polling");
            Ok(job)
        }
    }
}

async fn reload(tracker: &JobTracker, job: JobRecord) -> Result<JobRecord, PipelineError> {
    Ok(tracker.store().get(&job.id).await?.unwrap_or(job))
}

/// One status check of a queued clone, classified for the poller.
pub async fn check_status(
    vendor: &dyn VoiceCloneVendor,
    api_key: &str,
    task_id: &str,
) -> Result<PollStatus<ClonedAudio>, CheckError> {
    let state = vendor.status(api_key, task_id).await?;
    let status = match CLONE_CODES.classify(&state.status) {
        Progress::Succeeded => PollStatus::Done(ClonedAudio {
            voice_id: None,
            audio_url: state.audio_path,
        }),
        Progress::Failed => PollStatus::Failed(VendorError::task_failed(
            500,
            state.err_msg.as_deref(),
            messages::task_failed(JobKind::VoiceClone),
        )),
        Progress::Running => PollStatus::Pending,
        Progress::Unknown => unknown_status(CloneProvider::Cicada.as_str(), task_id, &state.status),
    };
    Ok(status)
}
