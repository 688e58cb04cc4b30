//! Chanjing open API client.
//!
//! Covers customised avatars (digital-human figures trained from a video),
//! customised voices (trained from an audio sample), video synthesis and
//! text-to-speech tasks. Every response is wrapped in a `{code, msg, data}`
//! envelope where a non-zero `code` is a structured vendor error.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use studio_core::job::JobKind;

use crate::http::{envelope_error, parse_json, VendorApiError};
use crate::sentinel::NumericCodes;

pub const VENDOR: &str = "chanjing";

/// Customised avatar training states.
pub const AVATAR_CODES: NumericCodes = NumericCodes {
    success: &[2],
    failure: &[-1, 4],
    running: &[0, 1],
};

/// Customised voice training states.
pub const VOICE_CODES: NumericCodes = NumericCodes {
    success: &[2],
    failure: &[4],
    running: &[0, 1],
};

/// Text-to-speech task states.
pub const SPEECH_CODES: NumericCodes = NumericCodes {
    success: &[9],
    failure: &[10],
    running: &[0, 1, 2, 3],
};

/// Header carrying the caller's access token.
const TOKEN_HEADER: &str = "access_token";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    msg: String,
    data: Option<T>,
}

impl<T> Envelope<T> {
    fn into_data(self) -> Result<T, VendorApiError> {
        if self.code != 0 {
            return Err(envelope_error(self.code, &self.msg));
        }
        self.data
            .ok_or_else(|| envelope_error(self.code, "response carried no data"))
    }
}

/// Status of a customised avatar.
#[derive(Debug, Clone, Deserialize)]
pub struct AvatarInfo {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub status: i64,
    #[serde(default)]
    pub pic_url: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub err_reason: Option<String>,
}

/// Status of a customised voice.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceInfo {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub status: i64,
    #[serde(default)]
    pub err_msg: Option<String>,
    #[serde(default)]
    pub audio_path: Option<String>,
}

/// State of a text-to-speech task.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechTask {
    pub status: i64,
    #[serde(default)]
    pub full: Option<SpeechAudio>,
    #[serde(default, rename = "errMsg")]
    pub err_msg: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechAudio {
    pub url: String,
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TaskCreated {
    task_id: String,
}

/// Body for `POST /create_video`, forwarded as received.
#[derive(Debug, Clone, Serialize)]
pub struct CreateVideo {
    pub person: serde_json::Value,
    pub audio: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle_config: Option<serde_json::Value>,
    pub screen_width: u32,
    pub screen_height: u32,
}

/// HTTP client for the Chanjing open API.
#[derive(Clone)]
pub struct ChanjingClient {
    client: reqwest::Client,
    base_url: String,
}

impl ChanjingClient {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Start training a customised avatar from a video. Returns the avatar id.
    pub async fn create_avatar(
        &self,
        api_key: &str,
        name: &str,
        video_url: &str,
    ) -> Result<String, VendorApiError> {
        let body = serde_json::json!({
            "name": name,
            "material_video": video_url,
            "train_type": "figure",
        });
        self.post(api_key, "/create_customised_person", &body, JobKind::AvatarCreation)
            .await
    }

    /// Fetch the training state of a customised avatar.
    pub async fn avatar(&self, api_key: &str, avatar_id: &str) -> Result<AvatarInfo, VendorApiError> {
        self.get(api_key, "/customised_person", avatar_id, JobKind::AvatarCreation)
            .await
    }

    /// Start training a customised voice from an audio sample. Returns the voice id.
    pub async fn create_voice(
        &self,
        api_key: &str,
        name: &str,
        audio_url: &str,
    ) -> Result<String, VendorApiError> {
        let body = serde_json::json!({
            "name": name,
            "url": audio_url,
        });
        self.post(api_key, "/create_customised_audio", &body, JobKind::AudioSynthesis)
            .await
    }

    /// Fetch the training state of a customised voice.
    pub async fn voice(&self, api_key: &str, voice_id: &str) -> Result<VoiceInfo, VendorApiError> {
        self.get(api_key, "/customised_audio", voice_id, JobKind::AudioSynthesis)
            .await
    }

    /// Submit a video synthesis job and return the vendor response untouched.
    ///
    /// A non-zero envelope code is surfaced as a structured error.
    pub async fn create_video(
        &self,
        api_key: &str,
        body: &CreateVideo,
    ) -> Result<serde_json::Value, VendorApiError> {
        let response = self
            .client
            .post(format!("{}/create_video", self.base_url))
            .header(TOKEN_HEADER, api_key)
            .json(body)
            .send()
            .await?;
        let raw: serde_json::Value = parse_json(response, JobKind::VideoGeneration).await?;

        let code = raw.get("code").and_then(serde_json::Value::as_i64).unwrap_or(0);
        if code != 0 {
            let msg = raw.get("msg").and_then(serde_json::Value::as_str).unwrap_or_default();
            return Err(envelope_error(code, msg));
        }
        Ok(raw)
    }

    /// Submit a text-to-speech task. Returns the task id.
    pub async fn create_speech(
        &self,
        api_key: &str,
        text: &str,
        voice: &str,
    ) -> Result<String, VendorApiError> {
        let body = serde_json::json!({
            "audio_man": voice,
            "speed": 1,
            "pitch": 1,
            "text": { "text": text, "plain_text": text },
        });
        let created: TaskCreated = self
            .post(api_key, "/create_audio_task", &body, JobKind::AudioSynthesis)
            .await?;
        Ok(created.task_id)
    }

    /// Fetch the state of a text-to-speech task.
    pub async fn speech_task(&self, api_key: &str, task_id: &str) -> Result<SpeechTask, VendorApiError> {
        let body = serde_json::json!({ "task_id": task_id });
        self.post(api_key, "/audio_task_state", &body, JobKind::AudioSynthesis)
            .await
    }

    // ---- private helpers ----

    async fn post<T: DeserializeOwned>(
        &self,
        api_key: &str,
        path: &str,
        body: &serde_json::Value,
        kind: JobKind,
    ) -> Result<T, VendorApiError> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .header(TOKEN_HEADER, api_key)
            .json(body)
            .send()
            .await?;
        parse_json::<Envelope<T>>(response, kind).await?.into_data()
    }

    async fn get<T: DeserializeOwned>(
        &self,
        api_key: &str,
        path: &str,
        id: &str,
        kind: JobKind,
    ) -> Result<T, VendorApiError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .header(TOKEN_HEADER, api_key)
            .query(&[("id", id)])
            .send()
            .await?;
        parse_json::<Envelope<T>>(response, kind).await?.into_data()
    }
}
