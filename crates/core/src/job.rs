//! Job model shared by orchestrators, the scheduler and the stores.
//!
//! A job tracks one unit of asynchronous vendor work. Its status only moves
//! from `pending` to exactly one terminal state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{JobId, Timestamp};
use crate::vendor_error::VendorError;

/// The kind of vendor work a job represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobKind {
    AvatarCreation,
    AudioSynthesis,
    VideoGeneration,
    VoiceClone,
}

impl JobKind {
    pub const ALL: [JobKind; 4] = [
        JobKind::AvatarCreation,
        JobKind::AudioSynthesis,
        JobKind::VideoGeneration,
        JobKind::VoiceClone,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JobKind::AvatarCreation => "avatar-creation",
            JobKind::AudioSynthesis => "audio-synthesis",
            JobKind::VideoGeneration => "video-generation",
            JobKind::VoiceClone => "voice-clone",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == value)
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Success,
    Failed,
    Timeout,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Success => "success",
            JobStatus::Failed => "failed",
            JobStatus::Timeout => "timeout",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(JobStatus::Pending),
            "success" => Some(JobStatus::Success),
            "failed" => Some(JobStatus::Failed),
            "timeout" => Some(JobStatus::Timeout),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Pending)
    }

    /// Only `pending -> terminal` is a legal transition.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        self == JobStatus::Pending && next.is_terminal()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted job with its last-known status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub kind: JobKind,
    /// Vendor adapter that owns the task, e.g. `chanjing` or `cicada`.
    pub vendor: String,
    /// Vendor-issued task identifier, absent for synchronous vendors.
    pub task_id: Option<String>,
    pub name: Option<String>,
    pub status: JobStatus,
    pub attempts: u32,
    /// Kind-specific payload, only present on success.
    pub result: Option<serde_json::Value>,
    /// Structured failure, only present on failure or timeout.
    ///
    /// `VendorError::http_status` is not serialized, so an error reloaded from
    /// a persistent store reports 500 whatever it carried when written. Only
    /// the live orchestrator result is used to pick a response status.
    pub error: Option<VendorError>,
    /// Vendor credential used by deferred status checks.
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl JobRecord {
    /// Audio URL of a finished voice or audio job, if any.
    pub fn audio_url(&self) -> Option<&str> {
        self.result_str("audio_url")
    }

    /// Video URL of a finished video job, if any.
    pub fn video_url(&self) -> Option<&str> {
        self.result_str("video_url")
    }

    fn result_str(&self, key: &str) -> Option<&str> {
        self.result.as_ref()?.get(key)?.as_str()
    }
}

/// Input for creating a pending job.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub kind: JobKind,
    pub vendor: String,
    pub task_id: Option<String>,
    pub name: Option<String>,
    pub api_key: Option<String>,
}

impl NewJob {
    pub fn new(kind: JobKind, vendor: impl Into<String>) -> Self {
        Self {
            kind,
            vendor: vendor.into(),
            task_id: None,
            name: None,
            api_key: None,
        }
    }

    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// A terminal outcome to be written to a pending job.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Success(serde_json::Value),
    Failed(VendorError),
    Timeout(VendorError),
}

impl Completion {
    pub fn status(&self) -> JobStatus {
        match self {
            Completion::Success(_) => JobStatus::Success,
            Completion::Failed(_) => JobStatus::Failed,
            Completion::Timeout(_) => JobStatus::Timeout,
        }
    }

    pub fn result(&self) -> Option<&serde_json::Value> {
        match self {
            Completion::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&VendorError> {
        match self {
            Completion::Failed(err) | Completion::Timeout(err) => Some(err),
            Completion::Success(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_moves_to_every_terminal_state() {
        for next in [JobStatus::Success, JobStatus::Failed, JobStatus::Timeout] {
            assert!(JobStatus::Pending.can_transition_to(next));
        }
        assert!(!JobStatus::Pending.can_transition_to(JobStatus::Pending));
    }

    #[test]
    fn terminal_states_never_move() {
        for from in [JobStatus::Success, JobStatus::Failed, JobStatus::Timeout] {
            for to in [
                JobStatus::Pending,
                JobStatus::Success,
                JobStatus::Failed,
                JobStatus::Timeout,
            ] {
                assert!(!from.can_transition_to(to), "{from} -> {to} must be rejected");
            }
        }
    }

    #[test]
    fn kind_round_trips_through_its_wire_name() {
        for kind in JobKind::ALL {
            assert_eq!(JobKind::parse(kind.as_str()), Some(kind));
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                serde_json::Value::String(kind.as_str().into())
            );
        }
        assert_eq!(JobKind::parse("unknown"), None);
    }

    #[test]
    fn api_key_is_never_serialized() {
        let now = chrono::Utc::now();
        let record = JobRecord {
            id: "job-1".into(),
            kind: JobKind::VoiceClone,
            vendor: "cicada".into(),
            task_id: Some("t-1".into()),
            name: None,
            status: JobStatus::Success,
            attempts: 2,
            result: Some(serde_json::json!({"audio_url": "https://a/b.wav"})),
            error: None,
            api_key: Some("secret".into()),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("secret"));
        assert_eq!(record.audio_url(), Some("https://a/b.wav"));
        assert_eq!(record.video_url(), None);
    }

    #[test]
    fn stored_error_reloads_with_default_http_status() {
        let error = VendorError::timeout(crate::messages::timed_out(JobKind::VideoGeneration));
        assert_eq!(error.http_status, 504);

        let reloaded: VendorError =
            serde_json::from_value(serde_json::to_value(&error).unwrap()).unwrap();
        assert_eq!(reloaded.http_status, 500);
        assert_eq!(reloaded.err_code, 504);
    }
}
