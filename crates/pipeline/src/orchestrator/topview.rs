//! TopView lip-sync videos: register both media URLs, then submit.

use serde::{Deserialize, Serialize};
use studio_core::job::{JobKind, NewJob};
use studio_core::messages;
use studio_core::poller::{CheckError, PollPolicy, PollStatus};
use studio_core::vendor_error::VendorError;
use studio_vendors::sentinel::Progress;
use studio_vendors::topview::{self, TASK_CODES};

use super::{missing_output, poll_job, unknown_status};
use crate::error::PipelineError;
use crate::tracker::JobTracker;
use crate::vendor::TopViewVendor;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopViewVideo {
    pub task_id: String,
    pub video_url: String,
}

/// Upload the video and the audio by URL and submit the task.
pub async fn submit(
    vendor: &dyn TopViewVendor,
    api_key: &str,
    video_url: &str,
    audio_url: &str,
) -> Result<String, PipelineError> {
    let video_file = vendor
        .upload_url(api_key, video_url)
        .await
        .map_err(PipelineError::submit)?;
    let audio_file = vendor
        .upload_url(api_key, audio_url)
        .await
        .map_err(PipelineError::submit)?;

    vendor
        .submit(api_key, &video_file, &audio_file)
        .await
        .map_err(PipelineError::submit)
}

pub async fn await_result(
    vendor: &dyn TopViewVendor,
    tracker: &JobTracker,
    policy: &PollPolicy,
    api_key: &str,
    task_id: &str,
) -> Result<TopViewVideo, PipelineError> {
    let job = tracker
        .open(NewJob::new(JobKind::VideoGeneration, topview::VENDOR).with_task_id(task_id))
        .await?;

    let outcome = poll_job(tracker, &job, policy, |_| async move {
        let state = vendor.query(api_key, task_id).await?;
        let status = match TASK_CODES.classify(&state.status) {
            Progress::Succeeded => match state.output_video_url {
                Some(video_url) => PollStatus::Done(TopViewVideo {
                    task_id: task_id.to_string(),
                    video_url,
                }),
                None => missing_output(topview::VENDOR, task_id, &state.status),
            },
            Progress::Failed => PollStatus::Failed(VendorError::task_failed(
                500,
                state.error_msg.as_deref(),
                messages::task_failed(JobKind::VideoGeneration),
            )),
            Progress::Running => PollStatus::Pending,
            Progress::Unknown => unknown_status(topview::VENDOR, task_id, &state.status),
        };
        Ok::<_, CheckError>(status)
    })
    .await;

    tracker.settle(&job, outcome).await
}
