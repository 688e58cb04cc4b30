//! TopView video avatar client.
//!
//! Media is registered by URL first; the task references the returned file ids.
//! Responses use a `{code, message, result}` envelope where `code` is a string
//! and `"200"` means success.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use studio_core::job::JobKind;

use crate::http::{envelope_error, parse_json, VendorApiError};
use crate::sentinel::TextCodes;

pub const VENDOR: &str = "topview";

pub const TASK_CODES: TextCodes = TextCodes {
    success: &["success"],
    failure: &["fail", "failed"],
    running: &["init", "processing", "running"],
};

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: serde_json::Value,
    #[serde(default)]
    message: String,
    result: Option<T>,
}

impl<T> Envelope<T> {
    fn code(&self) -> i64 {
        match &self.code {
            serde_json::Value::Number(n) => n.as_i64().unwrap_or(0),
            serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    fn into_result(self) -> Result<T, VendorApiError> {
        let code = self.code();
        if code != 200 {
            return Err(envelope_error(code, &self.message));
        }
        self.result
            .ok_or_else(|| envelope_error(code, "response carried no result"))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Uploaded {
    file_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Submitted {
    task_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskState {
    pub status: String,
    #[serde(default)]
    pub output_video_url: Option<String>,
    #[serde(default)]
    pub error_msg: Option<String>,
}

#[derive(Clone)]
pub struct TopViewClient {
    client: reqwest::Client,
    base_url: String,
}

impl TopViewClient {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Register a remote media file. Returns the TopView file id.
    pub async fn upload_url(&self, api_key: &str, url: &str) -> Result<String, VendorApiError> {
        let body = serde_json::json!({ "url": url });
        let response = self
            .client
            .post(format!("{}/v1/upload/url", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;
        let uploaded: Uploaded = Self::unwrap(response).await?;
        Ok(uploaded.file_id)
    }

    /// Submit a lip-sync task. Returns the task id.
    pub async fn submit(
        &self,
        api_key: &str,
        video_file_id: &str,
        audio_file_id: &str,
    ) -> Result<String, VendorApiError> {
        let body = serde_json::json!({
            "videoFileId": video_file_id,
            "audioFileId": audio_file_id,
        });
        let response = self
            .client
            .post(format!("{}/v1/video_avatar/task/submit", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;
        let submitted: Submitted = Self::unwrap(response).await?;
        Ok(submitted.task_id)
    }

    pub async fn query(&self, api_key: &str, task_id: &str) -> Result<TaskState, VendorApiError> {
        let response = self
            .client
            .get(format!("{}/v1/video_avatar/task/query", self.base_url))
            .bearer_auth(api_key)
            .query(&[("taskId", task_id)])
            .send()
            .await?;
        Self::unwrap(response).await
    }

    async fn unwrap<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, VendorApiError> {
        parse_json::<Envelope<T>>(response, JobKind::VideoGeneration)
            .await?
            .into_result()
    }
}
