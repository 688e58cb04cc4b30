//! Hedra character video: asset placeholders, uploads, generation, and
//! waiting for the generation to finish.
//!
//! Submission and waiting are separate calls because the UI submits first
//! and polls the generation id from a second request.

use serde::{Deserialize, Serialize};
use studio_core::job::{JobKind, NewJob};
use studio_core::messages;
use studio_core::poller::{CheckError, PollPolicy, PollStatus};
use studio_core::vendor_error::{ErrorType, VendorError};
use studio_vendors::hedra::{self, AssetType, GenerationRequest, GENERATION_CODES};
use studio_vendors::http::UploadFile;
use studio_vendors::sentinel::Progress;

use super::{missing_output, poll_job, unknown_status};
use crate::error::PipelineError;
use crate::tracker::JobTracker;
use crate::vendor::HedraVendor;

const DEFAULT_RESOLUTION: &str = "720p";
const DEFAULT_ASPECT_RATIO: &str = "16:9";

#[derive(Debug, Clone)]
pub struct HedraSubmit {
    pub api_key: String,
    pub text: String,
    pub resolution: Option<String>,
    pub aspect_ratio: Option<String>,
    pub image: UploadFile,
    pub audio: UploadFile,
}

/// Accepted generation, returned to the caller for later polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HedraSubmitted {
    #[serde(rename = "taskId")]
    pub task_id: String,
    pub hedra_data: hedra::Generation,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HedraVideo {
    pub id: String,
    pub status: String,
    pub download_url: String,
}

/// Create both assets, upload both files and submit the generation.
///
/// Steps run strictly in order; the first failure aborts the sequence.
pub async fn submit(vendor: &dyn HedraVendor, request: HedraSubmit) -> Result<HedraSubmitted, PipelineError> {
    let api_key = request.api_key.as_str();

    let image_asset = vendor
        .create_asset(api_key, &request.image.file_name, AssetType::Image)
        .await
        .map_err(PipelineError::submit)?;
    let audio_asset = vendor
        .create_asset(api_key, &request.audio.file_name, AssetType::Audio)
        .await
        .map_err(PipelineError::submit)?;

    vendor
        .upload_asset(api_key, &image_asset.id, request.image)
        .await
        .map_err(PipelineError::submit)?;
    vendor
        .upload_asset(api_key, &audio_asset.id, request.audio)
        .await
        .map_err(PipelineError::submit)?;

    let generation = vendor
        .create_generation(
            api_key,
            &GenerationRequest {
                image_asset_id: image_asset.id,
                audio_asset_id: audio_asset.id,
                text_prompt: request.text,
                resolution: request.resolution.unwrap_or_else(|| DEFAULT_RESOLUTION.into()),
                aspect_ratio: request.aspect_ratio.unwrap_or_else(|| DEFAULT_ASPECT_RATIO.into()),
            },
        )
        .await
        .map_err(PipelineError::submit)?;

    tracing::info!(generation_id = %generation.id, "Hedra generation submitted");
    Ok(HedraSubmitted {
        task_id: generation.id.clone(),
        hedra_data: generation,
        kind: hedra::VENDOR.to_string(),
    })
}

/// Wait for a generation to finish.
///
/// Any non-empty `error_message` ends the wait immediately.
pub async fn await_result(
    vendor: &dyn HedraVendor,
    tracker: &JobTracker,
    policy: &PollPolicy,
    api_key: &str,
    generation_id: &str,
) -> Result<HedraVideo, PipelineError> {
    let job = tracker
        .open(NewJob::new(JobKind::VideoGeneration, hedra::VENDOR).with_task_id(generation_id))
        .await?;

    let outcome = poll_job(tracker, &job, policy, |_| async move {
        let state = vendor.generation_status(api_key, generation_id).await?;
        if let Some(reason) = state.fatal_error() {
            return Ok(PollStatus::Failed(VendorError::verbatim(
                500,
                reason,
                ErrorType::TaskFailed,
                400,
            )));
        }

        let status = match GENERATION_CODES.classify(&state.status) {
            Progress::Succeeded => match state.video_url() {
                Some(url) => PollStatus::Done(HedraVideo {
                    id: generation_id.to_string(),
                    status: state.status.clone(),
                    download_url: url.to_string(),
                }),
                None => missing_output(hedra::VENDOR, generation_id, &state.status),
            },
            Progress::Failed => PollStatus::Failed(VendorError::task_failed(
                500,
                None,
                messages::task_failed(JobKind::VideoGeneration),
            )),
            Progress::Running => PollStatus::Pending,
            Progress::Unknown => unknown_status(hedra::VENDOR, generation_id, &state.status),
        };
        Ok::<_, CheckError>(status)
    })
    .await;

    tracker.settle(&job, outcome).await
}
