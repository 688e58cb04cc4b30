//! Customised avatar creation: submit the training video, then wait for the
//! figure to finish training.

use serde::{Deserialize, Serialize};
use studio_core::job::{JobKind, NewJob};
use studio_core::messages;
use studio_core::poller::{CheckError, PollPolicy, PollStatus};
use studio_core::vendor_error::VendorError;
use studio_vendors::chanjing::{self, AVATAR_CODES};
use studio_vendors::sentinel::Progress;

use super::{poll_job, unknown_status};
use crate::error::PipelineError;
use crate::tracker::JobTracker;
use crate::vendor::AvatarVendor;

#[derive(Debug, Clone)]
pub struct AvatarRequest {
    pub api_key: String,
    pub name: String,
    pub video_url: String,
}

/// A trained avatar. `error` is always empty on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarResult {
    #[serde(rename = "avatarId")]
    pub avatar_id: String,
    pub preview_url: String,
    pub pic_url: String,
    pub error: String,
}

pub async fn create_avatar(
    vendor: &dyn AvatarVendor,
    tracker: &JobTracker,
    policy: &PollPolicy,
    request: AvatarRequest,
) -> Result<AvatarResult, PipelineError> {
    let avatar_id = vendor
        .create_avatar(&request.api_key, &request.name, &request.video_url)
        .await
        .map_err(PipelineError::submit)?;

    let job = tracker
        .open(
            NewJob::new(JobKind::AvatarCreation, chanjing::VENDOR)
                .with_task_id(&avatar_id)
                .with_name(&request.name),
        )
        .await?;

    let api_key = request.api_key.as_str();
    let avatar_id = avatar_id.as_str();
    let outcome = poll_job(tracker, &job, policy, |_| async move {
        let info = vendor.avatar(api_key, avatar_id).await?;
        let status = match AVATAR_CODES.classify(info.status) {
            Progress::Succeeded => PollStatus::Done(AvatarResult {
                avatar_id: avatar_id.to_string(),
                preview_url: info.preview_url.unwrap_or_default(),
                pic_url: info.pic_url.unwrap_or_default(),
                error: String::new(),
            }),
            Progress::Failed => PollStatus::Failed(VendorError::task_failed(
                info.status,
                info.err_reason.as_deref(),
                messages::task_failed(JobKind::AvatarCreation),
            )),
            Progress::Running => PollStatus::Pending,
            Progress::Unknown => unknown_status(chanjing::VENDOR, avatar_id, info.status),
        };
        Ok::<_, CheckError>(status)
    })
    .await;

    tracker.settle(&job, outcome).await
}
