//! Omnihuman image-to-video.
//!
//! The result endpoint's top-level status only describes the API call; the
//! generation state is the nested `data.status`.

use serde::{Deserialize, Serialize};
use studio_core::job::{JobKind, NewJob};
use studio_core::messages;
use studio_core::poller::{CheckError, PollPolicy, PollStatus};
use studio_core::vendor_error::VendorError;
use studio_vendors::omnihuman::{self, TASK_CODES};
use studio_vendors::sentinel::Progress;

use super::{missing_output, poll_job, unknown_status};
use crate::error::PipelineError;
use crate::tracker::JobTracker;
use crate::vendor::OmnihumanVendor;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OmnihumanVideo {
    pub task_id: String,
    pub video_url: String,
}

/// Submit a portrait and an audio track. Returns the vendor task id.
pub async fn submit(
    vendor: &dyn OmnihumanVendor,
    api_key: &str,
    image_url: &str,
    audio_url: &str,
) -> Result<String, PipelineError> {
    vendor
        .submit(api_key, image_url, audio_url)
        .await
        .map_err(PipelineError::submit)
}

pub async fn await_result(
    vendor: &dyn OmnihumanVendor,
    tracker: &JobTracker,
    policy: &PollPolicy,
    api_key: &str,
    task_id: &str,
) -> Result<OmnihumanVideo, PipelineError> {
    let job = tracker
        .open(NewJob::new(JobKind::VideoGeneration, omnihuman::VENDOR).with_task_id(task_id))
        .await?;

    let outcome = poll_job(tracker, &job, policy, |_| async move {
        let result = vendor.result(api_key, task_id).await?;
        let status = match TASK_CODES.classify(&result.status) {
            Progress::Succeeded => match result.video_url {
                Some(video_url) => PollStatus::Done(OmnihumanVideo {
                    task_id: task_id.to_string(),
                    video_url,
                }),
                None => missing_output(omnihuman::VENDOR, task_id, &result.status),
            },
            Progress::Failed => PollStatus::Failed(VendorError::task_failed(
                500,
                None,
                messages::task_failed(JobKind::VideoGeneration),
            )),
            Progress::Running => PollStatus::Pending,
            Progress::Unknown => unknown_status(omnihuman::VENDOR, task_id, &result.status),
        };
        Ok::<_, CheckError>(status)
    })
    .await;

    tracker.settle(&job, outcome).await
}
