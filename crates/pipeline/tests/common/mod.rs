//! Scripted vendor fakes for orchestrator and scheduler tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use studio_core::poller::PollPolicy;
use studio_core::store::MemoryJobStore;
use studio_core::submission::Submission;
use studio_core::vendor_error::VendorError;
use studio_events::EventBus;
use studio_pipeline::vendor::{
    AvatarVendor, HedraVendor, OmnihumanVendor, SpeechVendor, TopViewVendor, VoiceCloneVendor,
    VoiceVendor,
};
use studio_pipeline::JobTracker;
use studio_vendors::chanjing::{AvatarInfo, SpeechAudio, SpeechTask, VoiceInfo};
use studio_vendors::hedra::{Asset, AssetType, Generation, GenerationRequest, GenerationStatus};
use studio_vendors::http::UploadFile;
use studio_vendors::omnihuman::TaskResult;
use studio_vendors::topview::TaskState;
use studio_vendors::voice_clone::{CloneProvider, CloneRequest, CloneStatus, ClonedVoice};
use studio_vendors::VendorApiError;

pub const FAST: PollPolicy = PollPolicy::new(Duration::from_millis(1), 10).with_transient_retries(2);

pub fn tracker() -> JobTracker {
    JobTracker::new(Arc::new(MemoryJobStore::new()), Arc::new(EventBus::default()))
}

/// A transport failure, as produced by an unreachable vendor.
pub fn network_error() -> VendorApiError {
    let err = reqwest::Client::new().get("://unreachable").build().unwrap_err();
    VendorApiError::Request(err)
}

pub fn vendor_rejection(code: i64, message: &str) -> VendorApiError {
    VendorApiError::Api(VendorError::verbatim(
        code,
        message,
        studio_core::vendor_error::ErrorType::VendorError,
        400,
    ))
}

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

/// Replays queued responses, then repeats the fallback (if any).
pub struct Script<T> {
    steps: Mutex<VecDeque<Result<T, VendorApiError>>>,
    fallback: Option<T>,
    calls: AtomicU32,
}

impl<T: Clone> Script<T> {
    pub fn new(steps: Vec<Result<T, VendorApiError>>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            fallback: None,
            calls: AtomicU32::new(0),
        }
    }

    pub fn repeating(value: T) -> Self {
        Self {
            steps: Mutex::new(VecDeque::new()),
            fallback: Some(value),
            calls: AtomicU32::new(0),
        }
    }

    pub fn next(&self) -> Result<T, VendorApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(step) = self.steps.lock().unwrap().pop_front() {
            return step;
        }
        Ok(self.fallback.clone().expect("script exhausted"))
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// Chanjing-style fakes
// ---------------------------------------------------------------------------

pub fn avatar_info(status: i64) -> AvatarInfo {
    AvatarInfo {
        id: "av-1".into(),
        name: None,
        status,
        pic_url: None,
        preview_url: None,
        err_reason: None,
    }
}

pub struct FakeAvatar {
    pub submit: Script<String>,
    pub status: Script<AvatarInfo>,
}

#[async_trait]
impl AvatarVendor for FakeAvatar {
    async fn create_avatar(&self, _: &str, _: &str, _: &str) -> Result<String, VendorApiError> {
        self.submit.next()
    }

    async fn avatar(&self, _: &str, _: &str) -> Result<AvatarInfo, VendorApiError> {
        self.status.next()
    }
}

pub fn voice_info(status: i64, err_msg: Option<&str>) -> VoiceInfo {
    VoiceInfo {
        id: "voice-1".into(),
        name: Some("narrator".into()),
        status,
        err_msg: err_msg.map(String::from),
        audio_path: None,
    }
}

pub struct FakeVoice {
    pub submit: Script<String>,
    pub status: Script<VoiceInfo>,
}

#[async_trait]
impl VoiceVendor for FakeVoice {
    async fn create_voice(&self, _: &str, _: &str, _: &str) -> Result<String, VendorApiError> {
        self.submit.next()
    }

    async fn voice(&self, _: &str, _: &str) -> Result<VoiceInfo, VendorApiError> {
        self.status.next()
    }
}

pub fn speech_task(status: i64, url: Option<&str>) -> SpeechTask {
    SpeechTask {
        status,
        full: url.map(|u| SpeechAudio {
            url: u.into(),
            duration: Some(2.0),
        }),
        err_msg: None,
    }
}

pub struct FakeSpeech {
    pub submit: Script<String>,
    pub status: Script<SpeechTask>,
}

#[async_trait]
impl SpeechVendor for FakeSpeech {
    async fn create_speech(&self, _: &str, _: &str, _: &str) -> Result<String, VendorApiError> {
        self.submit.next()
    }

    async fn speech_task(&self, _: &str, _: &str) -> Result<SpeechTask, VendorApiError> {
        self.status.next()
    }
}

// ---------------------------------------------------------------------------
// Hedra
// ---------------------------------------------------------------------------

pub fn generation_status(status: &str, download_url: Option<&str>) -> GenerationStatus {
    GenerationStatus {
        id: Some("gen-1".into()),
        status: status.into(),
        progress: None,
        download_url: download_url.map(String::from),
        url: None,
        error_message: None,
    }
}

/// Records every call so tests can assert the step order.
pub struct FakeHedra {
    pub calls: Mutex<Vec<String>>,
    pub status: Script<GenerationStatus>,
}

impl FakeHedra {
    pub fn new(status: Script<GenerationStatus>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            status,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl HedraVendor for FakeHedra {
    async fn create_asset(&self, _: &str, name: &str, asset_type: AssetType) -> Result<Asset, VendorApiError> {
        let id = match asset_type {
            AssetType::Image => "asset-img",
            AssetType::Audio => "asset-audio",
        };
        self.record(format!("create:{id}"));
        Ok(Asset {
            id: id.into(),
            name: Some(name.into()),
        })
    }

    async fn upload_asset(&self, _: &str, asset_id: &str, file: UploadFile) -> Result<(), VendorApiError> {
        self.record(format!("upload:{asset_id}:{}", file.file_name));
        Ok(())
    }

    async fn create_generation(&self, _: &str, request: &GenerationRequest) -> Result<Generation, VendorApiError> {
        self.record(format!(
            "generate:{}:{}",
            request.image_asset_id, request.audio_asset_id
        ));
        Ok(Generation {
            id: "gen-1".into(),
            asset_id: None,
            status: Some("queued".into()),
        })
    }

    async fn generation_status(&self, _: &str, _: &str) -> Result<GenerationStatus, VendorApiError> {
        self.status.next()
    }
}

// ---------------------------------------------------------------------------
// Omnihuman
// ---------------------------------------------------------------------------

pub struct FakeOmnihuman {
    pub status: Script<TaskResult>,
}

#[async_trait]
impl OmnihumanVendor for FakeOmnihuman {
    async fn submit(&self, _: &str, _: &str, _: &str) -> Result<String, VendorApiError> {
        Ok("omni-1".into())
    }

    async fn result(&self, _: &str, _: &str) -> Result<TaskResult, VendorApiError> {
        self.status.next()
    }
}

// ---------------------------------------------------------------------------
// TopView
// ---------------------------------------------------------------------------

pub fn topview_state(status: &str, video_url: Option<&str>, error_msg: Option<&str>) -> TaskState {
    TaskState {
        status: status.into(),
        output_video_url: video_url.map(String::from),
        error_msg: error_msg.map(String::from),
    }
}

pub struct FakeTopView {
    pub status: Script<TaskState>,
    pub uploads: Mutex<Vec<String>>,
}

impl FakeTopView {
    pub fn new(status: Script<TaskState>) -> Self {
        Self {
            status,
            uploads: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TopViewVendor for FakeTopView {
    async fn upload_url(&self, _: &str, url: &str) -> Result<String, VendorApiError> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(url.to_string());
        Ok(format!("file-{}", uploads.len()))
    }

    async fn submit(&self, _: &str, video_file_id: &str, audio_file_id: &str) -> Result<String, VendorApiError> {
        Ok(format!("tv:{video_file_id}:{audio_file_id}"))
    }

    async fn query(&self, _: &str, _: &str) -> Result<TaskState, VendorApiError> {
        self.status.next()
    }
}

// ---------------------------------------------------------------------------
// Voice clone
// ---------------------------------------------------------------------------

pub fn clone_status(status: &str, audio_path: Option<&str>) -> CloneStatus {
    CloneStatus {
        status: status.into(),
        audio_path: audio_path.map(String::from),
        err_msg: None,
    }
}

/// Voice clone vendor with one status script per task id.
#[derive(Default)]
pub struct FakeCloneVendor {
    scripts: Mutex<HashMap<String, Arc<Script<CloneStatus>>>>,
}

impl FakeCloneVendor {
    pub fn script(&self, task_id: &str, script: Script<CloneStatus>) -> Arc<Script<CloneStatus>> {
        let script = Arc::new(script);
        self.scripts
            .lock()
            .unwrap()
            .insert(task_id.to_string(), Arc::clone(&script));
        script
    }
}

#[async_trait]
impl VoiceCloneVendor for FakeCloneVendor {
    async fn submit(
        &self,
        provider: CloneProvider,
        _: &str,
        request: CloneRequest,
    ) -> Result<Submission<ClonedVoice>, VendorApiError> {
        match provider {
            CloneProvider::FishAudio => Ok(Submission::Immediate(ClonedVoice {
                voice_id: "fish-voice-1".into(),
                title: Some(request.name),
                state: Some("trained".into()),
                samples: Vec::new(),
            })),
            CloneProvider::Cicada => Ok(Submission::Deferred {
                task_id: "cicada-task-1".into(),
            }),
        }
    }

    async fn status(&self, _: &str, task_id: &str) -> Result<CloneStatus, VendorApiError> {
        let script = self
            .scripts
            .lock()
            .unwrap()
            .get(task_id)
            .cloned()
            .expect("no script for task");
        script.next()
    }
}
