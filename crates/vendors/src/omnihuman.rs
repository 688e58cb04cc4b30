//! Doubao Omnihuman image-to-video client.
//!
//! Submission returns a task id. The result endpoint always answers with a
//! top-level envelope; the generation state lives in the nested
//! `data.status` and the video at `data.video_url`.

use serde::{Deserialize, Serialize};
use studio_core::job::JobKind;

use crate::http::{envelope_error, parse_json, VendorApiError};
use crate::sentinel::TextCodes;

pub const VENDOR: &str = "omnihuman";

pub const TASK_CODES: TextCodes = TextCodes {
    success: &["done"],
    failure: &["not_found", "expired", "failed"],
    running: &["in_queue", "generating"],
};

const REQ_KEY: &str = "jimeng_realman_avatar_picture_omni_v2";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct Submitted {
    task_id: String,
}

/// The nested task state of a result query.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TaskResult {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub video_url: Option<String>,
}

/// HTTP client for the Omnihuman visual service.
#[derive(Clone)]
pub struct OmnihumanClient {
    client: reqwest::Client,
    base_url: String,
}

impl OmnihumanClient {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Submit a portrait image and an audio track. Returns the task id.
    pub async fn submit(
        &self,
        api_key: &str,
        image_url: &str,
        audio_url: &str,
    ) -> Result<String, VendorApiError> {
        let body = serde_json::json!({
            "req_key": REQ_KEY,
            "image_url": image_url,
            "audio_url": audio_url,
        });
        let submitted: Submitted = self.call(api_key, "/submit_task", &body).await?;
        Ok(submitted.task_id)
    }

    pub async fn result(&self, api_key: &str, task_id: &str) -> Result<TaskResult, VendorApiError> {
        let body = serde_json::json!({ "req_key": REQ_KEY, "task_id": task_id });
        self.call(api_key, "/get_result", &body).await
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        api_key: &str,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, VendorApiError> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await?;
        let envelope: Envelope<T> = parse_json(response, JobKind::VideoGeneration).await?;
        // The service reports success as 10000.
        if envelope.code != 0 && envelope.code != 10000 {
            return Err(envelope_error(envelope.code, &envelope.message));
        }
        envelope
            .data
            .ok_or_else(|| envelope_error(envelope.code, "response carried no data"))
    }
}
