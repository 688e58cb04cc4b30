//! Vendor seams used by the orchestrators.
//!
//! Each trait is the smallest set of calls one sequence needs. The
//! `studio-vendors` clients implement them below; tests substitute scripted
//! fakes.

use async_trait::async_trait;
use studio_core::submission::Submission;
use studio_vendors::chanjing::{AvatarInfo, ChanjingClient, SpeechTask, VoiceInfo};
use studio_vendors::hedra::{Asset, AssetType, Generation, GenerationRequest, GenerationStatus, HedraClient};
use studio_vendors::http::UploadFile;
use studio_vendors::omnihuman::{OmnihumanClient, TaskResult};
use studio_vendors::stable_avatar::{self, StableAvatarClient};
use studio_vendors::topview::{self, TopViewClient};
use studio_vendors::voice_clone::{CloneProvider, CloneRequest, CloneStatus, ClonedVoice, VoiceCloneClient};
use studio_vendors::VendorApiError;

#[async_trait]
pub trait AvatarVendor: Send + Sync {
    async fn create_avatar(&self, api_key: &str, name: &str, video_url: &str) -> Result<String, VendorApiError>;
    async fn avatar(&self, api_key: &str, avatar_id: &str) -> Result<AvatarInfo, VendorApiError>;
}

#[async_trait]
pub trait VoiceVendor: Send + Sync {
    async fn create_voice(&self, api_key: &str, name: &str, audio_url: &str) -> Result<String, VendorApiError>;
    async fn voice(&self, api_key: &str, voice_id: &str) -> Result<VoiceInfo, VendorApiError>;
}

#[async_trait]
pub trait SpeechVendor: Send + Sync {
    async fn create_speech(&self, api_key: &str, text: &str, voice: &str) -> Result<String, VendorApiError>;
    async fn speech_task(&self, api_key: &str, task_id: &str) -> Result<SpeechTask, VendorApiError>;
}

#[async_trait]
pub trait HedraVendor: Send + Sync {
    async fn create_asset(&self, api_key: &str, name: &str, asset_type: AssetType) -> Result<Asset, VendorApiError>;
    async fn upload_asset(&self, api_key: &str, asset_id: &str, file: UploadFile) -> Result<(), VendorApiError>;
    async fn create_generation(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<Generation, VendorApiError>;
    async fn generation_status(&self, api_key: &str, generation_id: &str) -> Result<GenerationStatus, VendorApiError>;
}

#[async_trait]
pub trait OmnihumanVendor: Send + Sync {
    async fn submit(&self, api_key: &str, image_url: &str, audio_url: &str) -> Result<String, VendorApiError>;
    async fn result(&self, api_key: &str, task_id: &str) -> Result<TaskResult, VendorApiError>;
}

#[async_trait]
pub trait StableAvatarVendor: Send + Sync {
    async fn submit(
        &self,
        api_key: &str,
        image_url: &str,
        audio_url: &str,
        prompt: Option<&str>,
    ) -> Result<String, VendorApiError>;
    async fn status(&self, api_key: &str, task_id: &str) -> Result<stable_avatar::TaskState, VendorApiError>;
}

#[async_trait]
pub trait TopViewVendor: Send + Sync {
    async fn upload_url(&self, api_key: &str, url: &str) -> Result<String, VendorApiError>;
    async fn submit(&self, api_key: &str, video_file_id: &str, audio_file_id: &str) -> Result<String, VendorApiError>;
    async fn query(&self, api_key: &str, task_id: &str) -> Result<topview::TaskState, VendorApiError>;
}

#[async_trait]
pub trait VoiceCloneVendor: Send + Sync {
    async fn submit(
        &self,
        provider: CloneProvider,
        api_key: &str,
        request: CloneRequest,
    ) -> Result<Submission<ClonedVoice>, VendorApiError>;
    async fn status(&self, api_key: &str, task_id: &str) -> Result<CloneStatus, VendorApiError>;
}

// ---------------------------------------------------------------------------
// Real vendor clients
// ---------------------------------------------------------------------------

#[async_trait]
impl AvatarVendor for ChanjingClient {
    async fn create_avatar(&self, api_key: &str, name: &str, video_url: &str) -> Result<String, VendorApiError> {
        ChanjingClient::create_avatar(self, api_key, name, video_url).await
    }

    async fn avatar(&self, api_key: &str, avatar_id: &str) -> Result<AvatarInfo, VendorApiError> {
        ChanjingClient::avatar(self, api_key, avatar_id).await
    }
}

#[async_trait]
impl VoiceVendor for ChanjingClient {
    async fn create_voice(&self, api_key: &str, name: &str, audio_url: &str) -> Result<String, VendorApiError> {
        ChanjingClient::create_voice(self, api_key, name, audio_url).await
    }

    async fn voice(&self, api_key: &str, voice_id: &str) -> Result<VoiceInfo, VendorApiError> {
        ChanjingClient::voice(self, api_key, voice_id).await
    }
}

#[async_trait]
impl SpeechVendor for ChanjingClient {
    async fn create_speech(&self, api_key: &str, text: &str, voice: &str) -> Result<String, VendorApiError> {
        ChanjingClient::create_speech(self, api_key, text, voice).await
    }

    async fn speech_task(&self, api_key: &str, task_id: &str) -> Result<SpeechTask, VendorApiError> {
        ChanjingClient::speech_task(self, api_key, task_id).await
    }
}

#[async_trait]
impl HedraVendor for HedraClient {
    async fn create_asset(&self, api_key: &str, name: &str, asset_type: AssetType) -> Result<Asset, VendorApiError> {
        HedraClient::create_asset(self, api_key, name, asset_type).await
    }

    async fn upload_asset(&self, api_key: &str, asset_id: &str, file: UploadFile) -> Result<(), VendorApiError> {
        HedraClient::upload_asset(self, api_key, asset_id, file).await
    }

    async fn create_generation(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<Generation, VendorApiError> {
        HedraClient::create_generation(self, api_key, request).await
    }

    async fn generation_status(&self, api_key: &str, generation_id: &str) -> Result<GenerationStatus, VendorApiError> {
        HedraClient::generation_status(self, api_key, generation_id).await
    }
}

#[async_trait]
impl OmnihumanVendor for OmnihumanClient {
    async fn submit(&self, api_key: &str, image_url: &str, audio_url: &str) -> Result<String, VendorApiError> {
        OmnihumanClient::submit(self, api_key, image_url, audio_url).await
    }

    async fn result(&self, api_key: &str, task_id: &str) -> Result<TaskResult, VendorApiError> {
        OmnihumanClient::result(self, api_key, task_id).await
    }
}

#[async_trait]
impl StableAvatarVendor for StableAvatarClient {
    async fn submit(
        &self,
        api_key: &str,
        image_url: &str,
        audio_url: &str,
        prompt: Option<&str>,
    ) -> Result<String, VendorApiError> {
        StableAvatarClient::submit(self, api_key, image_url, audio_url, prompt).await
    }

    async fn status(&self, api_key: &str, task_id: &str) -> Result<stable_avatar::TaskState, VendorApiError> {
        StableAvatarClient::status(self, api_key, task_id).await
    }
}

#[async_trait]
impl TopViewVendor for TopViewClient {
    async fn upload_url(&self, api_key: &str, url: &str) -> Result<String, VendorApiError> {
        TopViewClient::upload_url(self, api_key, url).await
    }

    async fn submit(&self, api_key: &str, video_file_id: &str, audio_file_id: &str) -> Result<String, VendorApiError> {
        TopViewClient::submit(self, api_key, video_file_id, audio_file_id).await
    }

    async fn query(&self, api_key: &str, task_id: &str) -> Result<topview::TaskState, VendorApiError> {
        TopViewClient::query(self, api_key, task_id).await
    }
}

#[async_trait]
impl VoiceCloneVendor for VoiceCloneClient {
    async fn submit(
        &self,
        provider: CloneProvider,
        api_key: &str,
        request: CloneRequest,
    ) -> Result<Submission<ClonedVoice>, VendorApiError> {
        VoiceCloneClient::submit(self, provider, api_key, request).await
    }

    async fn status(&self, api_key: &str, task_id: &str) -> Result<CloneStatus, VendorApiError> {
        VoiceCloneClient::status(self, api_key, task_id).await
    }
}
