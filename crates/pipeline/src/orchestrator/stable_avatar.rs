//! StableAvatar talking-head renders.

use serde::{Deserialize, Serialize};
use studio_core::job::{JobKind, NewJob};
use studio_core::messages;
use studio_core::poller::{CheckError, PollPolicy, PollStatus};
use studio_core::vendor_error::VendorError;
use studio_vendors::sentinel::Progress;
use studio_vendors::stable_avatar::{self, TASK_CODES};

use super::{poll_job, unknown_status};
use crate::error::PipelineError;
use crate::tracker::JobTracker;
use crate::vendor::StableAvatarVendor;

#[derive(Debug, Clone)]
pub struct StableSubmit {
    pub api_key: String,
    pub image_url: String,
    pub audio_url: String,
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StableVideo {
    pub task_id: String,
    pub video_url: String,
}

pub async fn submit(vendor: &dyn StableAvatarVendor, request: &StableSubmit) -> Result<String, PipelineError> {
    vendor
        .submit(
            &request.api_key,
            &request.image_url,
            &request.audio_url,
            request.prompt.as_deref(),
        )
        .await
        .map_err(PipelineError::submit)
}

pub async fn await_result(
    vendor: &dyn StableAvatarVendor,
    tracker: &JobTracker,
    policy: &PollPolicy,
    api_key: &str,
    task_id: &str,
) -> Result<StableVideo, PipelineError> {
    let job = tracker
        .open(NewJob::new(JobKind::VideoGeneration, stable_avatar::VENDOR).with_task_id(task_id))
        .await?;

    let outcome = poll_job(tracker, &job, policy, |_| async move {
        let state = vendor.status(api_key, task_id).await?;
        let status = match TASK_CODES.classify(&state.status) {
            Progress::Succeeded => match state.video {
                Some(video) => PollStatus::Done(StableVideo {
                    task_id: task_id.to_string(),
                    video_url: video.url,
                }),
                None => PollStatus::Failed(VendorError::task_failed(
                    500,
                    None,
                    messages::task_failed(JobKind::VideoGeneration),
                )),
            },
            Progress::Failed => PollStatus::Failed(VendorError::task_failed(
                500,
                state.error.as_deref(),
                messages::task_failed(JobKind::VideoGeneration),
            )),
            Progress::Running => PollStatus::Pending,
            Progress::Unknown => unknown_status(stable_avatar::VENDOR, task_id, &state.status),
        };
        Ok::<_, CheckError>(status)
    })
    .await;

    tracker.settle(&job, outcome).await
}
