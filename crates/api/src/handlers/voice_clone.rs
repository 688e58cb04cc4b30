//! Handlers for voice cloning.
//!
//! Submission never waits for training. Queued clones are handed to the
//! background scheduler; `voice-clone-status` performs one on-demand check.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use studio_core::job::JobStatus;
use studio_core::poller::{check_with_retries, PollStatus};
use studio_pipeline::orchestrator::voice_clone::{self, check_status};
use studio_vendors::voice_clone::{CloneProvider, CloneRequest};
use validator::Validate;

use super::FormData;
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedQuery;
use crate::state::AppState;

/// Response of `POST /api/voice-clone`.
#[derive(Debug, Serialize)]
pub struct CloneAccepted {
    /// Local job id.
    #[serde(rename = "_id")]
    pub id: String,
    pub status: JobStatus,
    #[serde(rename = "taskId")]
    pub task_id: Option<String>,
    /// Only present for clones that finished on submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

/// POST /api/voice-clone (multipart)
///
/// Fields: `apiKey`, `file`, `name`, optional `provider` (`cicada` by
/// default or `fish-audio`), `model_type` and `text`.
pub async fn voice_clone(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<CloneAccepted>> {
    let mut form = FormData::read(multipart).await?;

    let provider = match form.text("provider") {
        Some(value) => CloneProvider::parse(value)
            .ok_or_else(|| AppError::BadRequest(format!("unknown provider: {value}")))?,
        None => CloneProvider::Cicada,
    };
    let api_key = form.require_text("apiKey")?;
    let request = CloneRequest {
        name: form.require_text("name")?,
        model_type: form.text("model_type").map(str::to_string),
        text: form.text("text").map(str::to_string),
        file: form.take_file("file")?,
    };

    let job = voice_clone::submit(
        &state.vendors.voice_clone,
        &state.tracker,
        provider,
        &api_key,
        request,
    )
    .await?;

    if job.status == JobStatus::Pending {
        if let Err(e) = state.scheduler.refresh().await {
            tracing::error!(job_id = %job.id, error = %e, "Failed to start voice clone scheduler");
        }
    }

    Ok(Json(CloneAccepted {
        id: job.id,
        status: job.status,
        task_id: job.task_id,
        result: job.result,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CloneStatusQuery {
    #[serde(rename = "apiKey")]
    #[validate(length(min = 1, message = "apiKey is required"))]
    pub api_key: String,
    /// Vendor task id.
    #[validate(length(min = 1, message = "id is required"))]
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct CloneStatusResponse {
    pub status: JobStatus,
    pub audio_path: Option<String>,
    pub err_msg: Option<String>,
}

/// GET /api/voice-clone-status?apiKey=..&id=..
///
/// One check, with the same transient retry budget the scheduler uses.
/// Nothing is written to the job store; the scheduler owns that.
pub async fn voice_clone_status(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<CloneStatusQuery>,
) -> AppResult<Json<CloneStatusResponse>> {
    let vendor = &state.vendors.voice_clone;
    let api_key = query.api_key.as_str();
    let task_id = query.id.as_str();
    let label = format!("{}:{task_id}", CloneProvider::Cicada.as_str());
    let mut check = |_: u32| check_status(vendor, api_key, task_id);

    let status = check_with_retries(&label, &state.polling.voice_clone, 1, &mut check)
        .await
        .map_err(AppError::Vendor)?;

    let response = match status {
        PollStatus::Pending => CloneStatusResponse {
            status: JobStatus::Pending,
            audio_path: None,
            err_msg: None,
        },
        PollStatus::Done(audio) => CloneStatusResponse {
            status: JobStatus::Success,
            audio_path: audio.audio_url,
            err_msg: None,
        },
        PollStatus::Failed(error) => CloneStatusResponse {
            status: JobStatus::Failed,
            audio_path: None,
            err_msg: Some(error.message),
        },
    };
    tracing::debug!(task_id, status = %response.status, "Voice clone status checked");

    Ok(Json(response))
}
