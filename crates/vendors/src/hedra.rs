//! Hedra character video client.
//!
//! A generation needs two uploaded assets: the portrait image used as the
//! start keyframe and the driving audio. Assets are created as empty
//! placeholders first and the files are uploaded into them afterwards.

use serde::{Deserialize, Serialize};
use studio_core::job::JobKind;

use crate::http::{parse_json, UploadFile, VendorApiError};
use crate::sentinel::TextCodes;

pub const VENDOR: &str = "hedra";

/// Generation states reported by `GET /generations/{id}/status`.
pub const GENERATION_CODES: TextCodes = TextCodes {
    success: &["complete", "completed"],
    failure: &["error", "failed"],
    running: &["processing", "queued", "finalizing", "pending"],
};

const KEY_HEADER: &str = "X-API-Key";
const DEFAULT_MODEL: &str = "d1dd37a3-e39a-4854-a298-6510289f9cf2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Image,
    Audio,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Parameters of a character video generation.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub image_asset_id: String,
    pub audio_asset_id: String,
    pub text_prompt: String,
    pub resolution: String,
    pub aspect_ratio: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Generation {
    pub id: String,
    #[serde(default)]
    pub asset_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationStatus {
    #[serde(default)]
    pub id: Option<String>,
    pub status: String,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl GenerationStatus {
    /// A non-empty `error_message` ends the generation regardless of status.
    pub fn fatal_error(&self) -> Option<&str> {
        self.error_message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    pub fn video_url(&self) -> Option<&str> {
        self.download_url.as_deref().or(self.url.as_deref())
    }
}

/// HTTP client for the Hedra public API.
#[derive(Clone)]
pub struct HedraClient {
    client: reqwest::Client,
    base_url: String,
}

impl HedraClient {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Create an empty asset placeholder.
    pub async fn create_asset(
        &self,
        api_key: &str,
        name: &str,
        asset_type: AssetType,
    ) -> Result<Asset, VendorApiError> {
        let body = serde_json::json!({ "name": name, "type": asset_type });
        let response = self
            .client
            .post(format!("{}/assets", self.base_url))
            .header(KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await?;
        parse_json(response, JobKind::VideoGeneration).await
    }

    /// Upload file contents into an existing asset.
    pub async fn upload_asset(
        &self,
        api_key: &str,
        asset_id: &str,
        file: UploadFile,
    ) -> Result<(), VendorApiError> {
        let form = reqwest::multipart::Form::new().part("file", file.into_part()?);
        let response = self
            .client
            .post(format!("{}/assets/{asset_id}/upload", self.base_url))
            .header(KEY_HEADER, api_key)
            .multipart(form)
            .send()
            .await?;
        crate::http::ensure_success(response, JobKind::VideoGeneration).await?;
        Ok(())
    }

    /// Submit a generation referencing two uploaded assets.
    pub async fn create_generation(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<Generation, VendorApiError> {
        let body = serde_json::json!({
            "type": "video",
            "ai_model_id": DEFAULT_MODEL,
            "start_keyframe_id": request.image_asset_id,
            "audio_id": request.audio_asset_id,
            "generated_video_inputs": {
                "text_prompt": request.text_prompt,
                "resolution": request.resolution,
                "aspect_ratio": request.aspect_ratio,
            },
        });
        let response = self
            .client
            .post(format!("{}/generations", self.base_url))
            .header(KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await?;
        parse_json(response, JobKind::VideoGeneration).await
    }

    pub async fn generation_status(
        &self,
        api_key: &str,
        generation_id: &str,
    ) -> Result<GenerationStatus, VendorApiError> {
        let response = self
            .client
            .get(format!("{}/generations/{generation_id}/status", self.base_url))
            .header(KEY_HEADER, api_key)
            .send()
            .await?;
        parse_json(response, JobKind::VideoGeneration).await
    }
}
