//! Customised voice training (`create-audio`).
//!
//! Training fails with status 4 when the sample is unusable. The vendor's
//! `err_msg` (for instance "audio too short") is surfaced verbatim.

use serde::{Deserialize, Serialize};
use studio_core::job::{JobKind, NewJob};
use studio_core::messages;
use studio_core::poller::{CheckError, PollPolicy, PollStatus};
use studio_core::vendor_error::VendorError;
use studio_vendors::chanjing::{self, VOICE_CODES};
use studio_vendors::sentinel::Progress;

use super::{poll_job, unknown_status};
use crate::error::PipelineError;
use crate::tracker::JobTracker;
use crate::vendor::VoiceVendor;

#[derive(Debug, Clone)]
pub struct VoiceRequest {
    pub api_key: String,
    pub name: String,
    pub audio_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceResult {
    #[serde(rename = "voiceId")]
    pub voice_id: String,
    pub name: Option<String>,
    pub audio_url: Option<String>,
}

pub async fn create_voice(
    vendor: &dyn VoiceVendor,
    tracker: &JobTracker,
    policy: &PollPolicy,
    request: VoiceRequest,
) -> Result<VoiceResult, PipelineError> {
    let voice_id = vendor
        .create_voice(&request.api_key, &request.name, &request.audio_url)
        .await
        .map_err(PipelineError::submit)?;

    let job = tracker
        .open(
            NewJob::new(JobKind::AudioSynthesis, chanjing::VENDOR)
                .with_task_id(&voice_id)
                .with_name(&request.name),
        )
        .await?;

    let api_key = request.api_key.as_str();
    let voice_id = voice_id.as_str();
    let outcome = poll_job(tracker, &job, policy, |_| async move {
        let info = vendor.voice(api_key, voice_id).await?;
        let status = match VOICE_CODES.classify(info.status) {
            Progress::Succeeded => PollStatus::Done(VoiceResult {
                voice_id: voice_id.to_string(),
                name: info.name,
                audio_url: info.audio_path,
            }),
            Progress::Failed => PollStatus::Failed(VendorError::task_failed(
                info.status,
                info.err_msg.as_deref(),
                messages::task_failed(JobKind::AudioSynthesis),
            )),
            Progress::Running => PollStatus::Pending,
            Progress::Unknown => unknown_status(chanjing::VENDOR, voice_id, info.status),
        };
        Ok::<_, CheckError>(status)
    })
    .await;

    tracker.settle(&job, outcome).await
}
