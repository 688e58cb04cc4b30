//! Text-to-speech with inline waiting (`gen-chanjing-audio`).

use serde::{Deserialize, Serialize};
use studio_core::job::{JobKind, NewJob};
use studio_core::messages;
use studio_core::poller::{CheckError, PollPolicy, PollStatus};
use studio_core::vendor_error::VendorError;
use studio_vendors::chanjing::{self, SPEECH_CODES};
use studio_vendors::sentinel::Progress;

use super::{poll_job, unknown_status};
use crate::error::PipelineError;
use crate::tracker::JobTracker;
use crate::vendor::SpeechVendor;

#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub api_key: String,
    pub text: String,
    pub voice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechResult {
    pub task_id: String,
    pub audio_url: String,
    pub duration: Option<f64>,
}

pub async fn synthesize(
    vendor: &dyn SpeechVendor,
    tracker: &JobTracker,
    policy: &PollPolicy,
    request: SpeechRequest,
) -> Result<SpeechResult, PipelineError> {
    let task_id = vendor
        .create_speech(&request.api_key, &request.text, &request.voice)
        .await
        .map_err(PipelineError::submit)?;

    let job = tracker
        .open(NewJob::new(JobKind::AudioSynthesis, chanjing::VENDOR).with_task_id(&task_id))
        .await?;

    let api_key = request.api_key.as_str();
    let task_id = task_id.as_str();
    let outcome = poll_job(tracker, &job, policy, |_| async move {
        let task = vendor.speech_task(api_key, task_id).await?;
        let status = match SPEECH_CODES.classify(task.status) {
            Progress::Succeeded => match task.full {
                Some(audio) => PollStatus::Done(SpeechResult {
                    task_id: task_id.to_string(),
                    audio_url: audio.url,
                    duration: audio.duration,
                }),
                // Finished without a file is still a failure for the caller.
                None => PollStatus::Failed(VendorError::task_failed(
                    task.status,
                    None,
                    messages::task_failed(JobKind::AudioSynthesis),
                )),
            },
            Progress::Failed => PollStatus::Failed(VendorError::task_failed(
                task.status,
                task.err_msg.as_deref(),
                messages::task_failed(JobKind::AudioSynthesis),
            )),
            Progress::Running => PollStatus::Pending,
            Progress::Unknown => unknown_status(chanjing::VENDOR, task_id, task.status),
        };
        Ok::<_, CheckError>(status)
    })
    .await;

    tracker.settle(&job, outcome).await
}
