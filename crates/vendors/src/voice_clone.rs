//! Voice clone providers.
//!
//! Fish Audio trains a model synchronously: the submission response already
//! describes the finished voice. Cicada queues the clone and hands back a
//! task id that has to be checked later.

use serde::{Deserialize, Serialize};
use studio_core::job::JobKind;
use studio_core::submission::Submission;

use crate::http::{parse_json, UploadFile, VendorApiError};
use crate::sentinel::TextCodes;

pub const CLONE_CODES: TextCodes = TextCodes {
    success: &["success", "succeeded"],
    failure: &["failed", "error"],
    running: &["pending", "processing", "queued"],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CloneProvider {
    Cicada,
    FishAudio,
}

impl CloneProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            CloneProvider::Cicada => "cicada",
            CloneProvider::FishAudio => "fish-audio",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cicada" => Some(CloneProvider::Cicada),
            "fish-audio" | "fish_audio" | "fishaudio" => Some(CloneProvider::FishAudio),
            _ => None,
        }
    }
}

/// Normalized clone request.
#[derive(Debug, Clone)]
pub struct CloneRequest {
    pub name: String,
    pub model_type: Option<String>,
    pub text: Option<String>,
    pub file: UploadFile,
}

/// A voice that finished training during submission.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClonedVoice {
    #[serde(rename = "_id")]
    pub voice_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub samples: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Queued {
    task_id: String,
}

/// State of a queued clone.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CloneStatus {
    pub status: String,
    #[serde(default)]
    pub audio_path: Option<String>,
    #[serde(default)]
    pub err_msg: Option<String>,
}

#[derive(Clone)]
pub struct VoiceCloneClient {
    client: reqwest::Client,
    cicada_url: String,
    fish_audio_url: String,
}

impl VoiceCloneClient {
    pub fn new(client: reqwest::Client, cicada_url: String, fish_audio_url: String) -> Self {
        Self {
            client,
            cicada_url,
            fish_audio_url,
        }
    }

    /// Submit a clone to the given provider.
    pub async fn submit(
        &self,
        provider: CloneProvider,
        api_key: &str,
        request: CloneRequest,
    ) -> Result<Submission<ClonedVoice>, VendorApiError> {
        match provider {
            CloneProvider::FishAudio => self
                .create_fish_model(api_key, request)
                .await
                .map(Submission::Immediate),
            CloneProvider::Cicada => {
                let task_id = self.queue_cicada_clone(api_key, request).await?;
                Ok(Submission::Deferred { task_id })
            }
        }
    }

    /// Check a queued Cicada clone.
    pub async fn status(&self, api_key: &str, task_id: &str) -> Result<CloneStatus, VendorApiError> {
        let response = self
            .client
            .get(format!("{}/voice/clone/status", self.cicada_url))
            .bearer_auth(api_key)
            .query(&[("id", task_id)])
            .send()
            .await?;
        parse_json(response, JobKind::VoiceClone).await
    }

    async fn queue_cicada_clone(
        &self,
        api_key: &str,
        request: CloneRequest,
    ) -> Result<String, VendorApiError> {
        let mut form = reqwest::multipart::Form::new()
            .text("name", request.name)
            .part("file", request.file.into_part()?);
        if let Some(model_type) = request.model_type {
            form = form.text("model_type", model_type);
        }
        if let Some(text) = request.text {
            form = form.text("text", text);
        }

        let response = self
            .client
            .post(format!("{}/voice/clone", self.cicada_url))
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await?;
        let queued: Queued = parse_json(response, JobKind::VoiceClone).await?;
        Ok(queued.task_id)
    }

    async fn create_fish_model(
        &self,
        api_key: &str,
        request: CloneRequest,
    ) -> Result<ClonedVoice, VendorApiError> {
        let mut form = reqwest::multipart::Form::new()
            .text("type", "tts")
            .text("train_mode", "fast")
            .text("visibility", "private")
            .text("title", request.name)
            .part("voices", request.file.into_part()?);
        if let Some(text) = request.text {
            form = form.text("texts", text);
        }

        let response = self
            .client
            .post(format!("{}/model", self.fish_audio_url))
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await?;
        parse_json(response, JobKind::VoiceClone).await
    }
}
