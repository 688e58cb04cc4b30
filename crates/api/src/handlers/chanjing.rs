//! Handlers for the Chanjing-backed routes: customised avatars and voices,
//! video creation, and text-to-speech.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use studio_pipeline::orchestrator::avatar::{self, AvatarRequest, AvatarResult};
use studio_pipeline::orchestrator::speech::{self, SpeechRequest, SpeechResult};
use studio_pipeline::orchestrator::voice::{self, VoiceRequest, VoiceResult};
use studio_vendors::chanjing::CreateVideo;
use validator::{Validate, ValidationError};

use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::response::{DataResponse, ResultsResponse};
use crate::state::AppState;

const DEFAULT_SCREEN_WIDTH: u32 = 1080;
const DEFAULT_SCREEN_HEIGHT: u32 = 1920;

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAvatarRequest {
    #[validate(length(min = 1, message = "apiKey is required"))]
    pub api_key: String,
    #[validate(url(message = "videoUrl must be a URL"))]
    pub video_url: String,
    #[validate(length(min = 1, max = 64, message = "name must be 1-64 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAudioRequest {
    #[validate(length(min = 1, message = "apiKey is required"))]
    pub api_key: String,
    #[validate(url(message = "audioUrl must be a URL"))]
    pub audio_url: String,
    #[validate(length(min = 1, max = 64, message = "name must be 1-64 characters"))]
    pub name: String,
}

/// Either `text` plus `audioId` (text-to-speech) or `wavUrl` (driving audio).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_audio_source"))]
pub struct CreateVideoRequest {
    #[validate(length(min = 1, message = "apiKey is required"))]
    pub api_key: String,
    #[validate(length(min = 1, message = "personId is required"))]
    pub person_id: String,
    pub text: Option<String>,
    pub audio_id: Option<String>,
    pub wav_url: Option<String>,
    pub subtitle_config: Option<serde_json::Value>,
    pub screen_width: Option<u32>,
    pub screen_height: Option<u32>,
}

fn validate_audio_source(request: &CreateVideoRequest) -> Result<(), ValidationError> {
    let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
    if filled(&request.wav_url) || (filled(&request.text) && filled(&request.audio_id)) {
        Ok(())
    } else {
        Err(ValidationError::new("audio_source")
            .with_message("either wavUrl or text with audioId is required".into()))
    }
}

impl CreateVideoRequest {
    fn into_body(self) -> CreateVideo {
        let screen_width = self.screen_width.unwrap_or(DEFAULT_SCREEN_WIDTH);
        let screen_height = self.screen_height.unwrap_or(DEFAULT_SCREEN_HEIGHT);

        let audio = match self.wav_url.filter(|u| !u.trim().is_empty()) {
            Some(wav_url) => json!({
                "type": "audio",
                "wav_url": wav_url,
                "volume": 100,
                "language": "cn",
            }),
            None => json!({
                "type": "tts",
                "tts": {
                    "text": [self.text.unwrap_or_default()],
                    "speed": 1,
                    "audio_man": self.audio_id.unwrap_or_default(),
                },
                "volume": 100,
                "language": "cn",
            }),
        };

        CreateVideo {
            person: json!({
                "id": self.person_id,
                "x": 0,
                "y": 0,
                "width": screen_width,
                "height": screen_height,
            }),
            audio,
            subtitle_config: self.subtitle_config,
            screen_width,
            screen_height,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenAudioRequest {
    #[validate(length(min = 1, message = "apiKey is required"))]
    pub api_key: String,
    #[validate(length(min = 1, max = 4000, message = "text must be 1-4000 characters"))]
    pub text: String,
    #[validate(length(min = 1, message = "voice is required"))]
    pub voice: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/create-avatar
///
/// Submits the training video and waits until the avatar is ready.
pub async fn create_avatar(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateAvatarRequest>,
) -> AppResult<Json<ResultsResponse<AvatarResult>>> {
    let result = avatar::create_avatar(
        &state.vendors.chanjing,
        &state.tracker,
        &state.polling.avatar,
        AvatarRequest {
            api_key: input.api_key,
            name: input.name,
            video_url: input.video_url,
        },
    )
    .await?;

    Ok(Json(ResultsResponse { results: result }))
}

/// POST /api/create-audio
///
/// Submits a voice sample and waits until the customised voice is trained.
pub async fn create_audio(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateAudioRequest>,
) -> AppResult<Json<DataResponse<VoiceResult>>> {
    let result = voice::create_voice(
        &state.vendors.chanjing,
        &state.tracker,
        &state.polling.voice,
        VoiceRequest {
            api_key: input.api_key,
            name: input.name,
            audio_url: input.audio_url,
        },
    )
    .await?;

    Ok(Json(DataResponse { data: result }))
}

/// POST /api/create-video
///
/// No waiting: the vendor response is passed through as-is.
pub async fn create_video(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateVideoRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let api_key = input.api_key.clone();
    let body = input.into_body();
    let response = state.vendors.chanjing.create_video(&api_key, &body).await?;

    tracing::info!(person_id = %body.person["id"], "Chanjing video submitted");
    Ok(Json(response))
}

/// POST /api/gen-chanjing-audio
pub async fn gen_chanjing_audio(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<GenAudioRequest>,
) -> AppResult<Json<DataResponse<SpeechResult>>> {
    let result = speech::synthesize(
        &state.vendors.chanjing,
        &state.tracker,
        &state.polling.speech,
        SpeechRequest {
            api_key: input.api_key,
            text: input.text,
            voice: input.voice,
        },
    )
    .await?;

    Ok(Json(DataResponse { data: result }))
}
