//! Handlers for the talking-head video vendors: Hedra, Omnihuman,
//! StableAvatar and TopView.
//!
//! Each vendor has a submit route that returns a task id right away and a
//! poll route that holds the request open until the video is ready.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use studio_pipeline::orchestrator::hedra::{self, HedraSubmit, HedraSubmitted, HedraVideo};
use studio_pipeline::orchestrator::omnihuman::{self, OmnihumanVideo};
use studio_pipeline::orchestrator::stable_avatar::{self, StableSubmit, StableVideo};
use studio_pipeline::orchestrator::topview::{self, TopViewVideo};
use validator::Validate;

use super::FormData;
use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::response::DataResponse;
use crate::state::AppState;

/// Accepted submission for the vendors that return a bare task id.
#[derive(Debug, Serialize)]
pub struct TaskAccepted {
    #[serde(rename = "taskId")]
    pub task_id: String,
}

// ---------------------------------------------------------------------------
// Hedra
// ---------------------------------------------------------------------------

/// POST /api/create-hedra-video (multipart)
///
/// Fields: `text`, `apiKey`, `imageFile`, `audioFile`, optional
/// `resolution` and `aspectRatio`.
pub async fn create_hedra_video(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<HedraSubmitted>> {
    let mut form = FormData::read(multipart).await?;
    let request = HedraSubmit {
        api_key: form.require_text("apiKey")?,
        text: form.require_text("text")?,
        resolution: form.text("resolution").map(str::to_string),
        aspect_ratio: form.text("aspectRatio").map(str::to_string),
        image: form.take_file("imageFile")?,
        audio: form.take_file("audioFile")?,
    };

    let submitted = hedra::submit(&state.vendors.hedra, request).await?;
    Ok(Json(submitted))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PollHedraRequest {
    #[validate(length(min = 1, message = "id is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "apiKey is required"))]
    pub api_key: String,
}

/// POST /api/poll-hedra-video-result
pub async fn poll_hedra_video(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<PollHedraRequest>,
) -> AppResult<Json<DataResponse<HedraVideo>>> {
    let video = hedra::await_result(
        &state.vendors.hedra,
        &state.tracker,
        &state.polling.hedra,
        &input.api_key,
        &input.id,
    )
    .await?;

    Ok(Json(DataResponse { data: video }))
}

// ---------------------------------------------------------------------------
// Omnihuman
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OmnihumanSubmitRequest {
    #[validate(length(min = 1, message = "apiKey is required"))]
    pub api_key: String,
    #[validate(url(message = "imageUrl must be a URL"))]
    pub image_url: String,
    #[validate(url(message = "audioUrl must be a URL"))]
    pub audio_url: String,
}

#[derive(Debug, Serialize)]
pub struct OmnihumanAccepted {
    pub task_id: String,
}

/// POST /api/doubao/omnihuman/submit
pub async fn submit_omnihuman(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<OmnihumanSubmitRequest>,
) -> AppResult<Json<DataResponse<OmnihumanAccepted>>> {
    let task_id = omnihuman::submit(
        &state.vendors.omnihuman,
        &input.api_key,
        &input.image_url,
        &input.audio_url,
    )
    .await?;

    tracing::info!(%task_id, "Omnihuman task submitted");
    Ok(Json(DataResponse {
        data: OmnihumanAccepted { task_id },
    }))
}

/// `task_id` keeps the vendor's snake_case name; `apiKey` is camelCase.
#[derive(Debug, Deserialize, Validate)]
pub struct OmnihumanResultRequest {
    #[validate(length(min = 1, message = "task_id is required"))]
    pub task_id: String,
    #[serde(rename = "apiKey")]
    #[validate(length(min = 1, message = "apiKey is required"))]
    pub api_key: String,
}

/// POST /api/doubao/omnihuman/video_result
pub async fn omnihuman_video_result(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<OmnihumanResultRequest>,
) -> AppResult<Json<DataResponse<OmnihumanVideo>>> {
    let video = omnihuman::await_result(
        &state.vendors.omnihuman,
        &state.tracker,
        &state.polling.omnihuman,
        &input.api_key,
        &input.task_id,
    )
    .await?;

    Ok(Json(DataResponse { data: video }))
}

// ---------------------------------------------------------------------------
// StableAvatar
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStableVideoRequest {
    #[validate(length(min = 1, message = "apiKey is required"))]
    pub api_key: String,
    #[validate(url(message = "imageUrl must be a URL"))]
    pub image_url: String,
    #[validate(url(message = "audioUrl must be a URL"))]
    pub audio_url: String,
    pub prompt: Option<String>,
}

/// POST /api/create-stable-video
pub async fn create_stable_video(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateStableVideoRequest>,
) -> AppResult<Json<TaskAccepted>> {
    let request = StableSubmit {
        api_key: input.api_key,
        image_url: input.image_url,
        audio_url: input.audio_url,
        prompt: input.prompt.filter(|p| !p.trim().is_empty()),
    };
    let task_id = stable_avatar::submit(&state.vendors.stable_avatar, &request).await?;

    Ok(Json(TaskAccepted { task_id }))
}

/// Poll body shared by StableAvatar and TopView.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PollTaskRequest {
    #[validate(length(min = 1, message = "taskId is required"))]
    pub task_id: String,
    #[validate(length(min = 1, message = "apiKey is required"))]
    pub api_key: String,
}

/// POST /api/poll-stable-video
pub async fn poll_stable_video(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<PollTaskRequest>,
) -> AppResult<Json<DataResponse<StableVideo>>> {
    let video = stable_avatar::await_result(
        &state.vendors.stable_avatar,
        &state.tracker,
        &state.polling.stable_avatar,
        &input.api_key,
        &input.task_id,
    )
    .await?;

    Ok(Json(DataResponse { data: video }))
}

// ---------------------------------------------------------------------------
// TopView
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopViewRequest {
    #[validate(length(min = 1, message = "apiKey is required"))]
    pub api_key: String,
    #[validate(url(message = "videoUrl must be a URL"))]
    pub video_url: String,
    #[validate(url(message = "audioUrl must be a URL"))]
    pub audio_url: String,
}

/// POST /api/create-topview-video
pub async fn create_topview_video(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateTopViewRequest>,
) -> AppResult<Json<TaskAccepted>> {
    let task_id = topview::submit(
        &state.vendors.topview,
        &input.api_key,
        &input.video_url,
        &input.audio_url,
    )
    .await?;

    Ok(Json(TaskAccepted { task_id }))
}

/// POST /api/poll-topview-video
pub async fn poll_topview_video(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<PollTaskRequest>,
) -> AppResult<Json<DataResponse<TopViewVideo>>> {
    let video = topview::await_result(
        &state.vendors.topview,
        &state.tracker,
        &state.polling.topview,
        &input.api_key,
        &input.task_id,
    )
    .await?;

    Ok(Json(DataResponse { data: video }))
}
