//! StableAvatar serverless endpoint client.

use serde::{Deserialize, Serialize};
use studio_core::job::JobKind;

use crate::http::{parse_json, VendorApiError};
use crate::sentinel::TextCodes;

pub const VENDOR: &str = "stable-avatar";

pub const TASK_CODES: TextCodes = TextCodes {
    success: &["COMPLETED"],
    failure: &["FAILED", "CANCELLED", "TIMED_OUT"],
    running: &["IN_QUEUE", "IN_PROGRESS"],
};

#[derive(Debug, Deserialize)]
struct Submitted {
    id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoOutput {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TaskState {
    pub status: String,
    #[serde(default)]
    pub video: Option<VideoOutput>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct StableAvatarClient {
    client: reqwest::Client,
    base_url: String,
}

impl StableAvatarClient {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Queue a talking-head render. Returns the task id.
    pub async fn submit(
        &self,
        api_key: &str,
        image_url: &str,
        audio_url: &str,
        prompt: Option<&str>,
    ) -> Result<String, VendorApiError> {
        let body = serde_json::json!({
            "input": {
                "image_url": image_url,
                "audio_url": audio_url,
                "prompt": prompt.unwrap_or_default(),
            }
        });
        let response = self
            .client
            .post(format!("{}/run", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;
        let submitted: Submitted = parse_json(response, JobKind::VideoGeneration).await?;
        Ok(submitted.id)
    }

    pub async fn status(&self, api_key: &str, task_id: &str) -> Result<TaskState, VendorApiError> {
        let response = self
            .client
            .get(format!("{}/status/{task_id}", self.base_url))
            .bearer_auth(api_key)
            .send()
            .await?;
        parse_json(response, JobKind::VideoGeneration).await
    }
}
