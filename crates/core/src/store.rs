//! The Local Job Store seam.
//!
//! [`JobStore`] is the only shared mutable resource between orchestrators and
//! the background scheduler. Writes are keyed by job id; terminal writes go
//! through [`JobStore::finish`], which only applies to pending jobs and so
//! enforces the monotonic status rule at the storage layer.
//!
//! [`MemoryJobStore`] keeps everything in process and is used when no
//! database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::job::{Completion, JobKind, JobRecord, JobStatus, NewJob};
use crate::types::new_job_id;

/// Maximum page size for job listing.
pub const MAX_LIMIT: i64 = 100;

/// Default page size for job listing.
pub const DEFAULT_LIMIT: i64 = 50;

/// Query parameters for listing jobs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobFilter {
    pub kind: Option<JobKind>,
    pub status: Option<JobStatus>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

impl JobFilter {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    fn matches(&self, job: &JobRecord) -> bool {
        self.kind.map_or(true, |k| k == job.kind)
            && self.status.map_or(true, |s| s == job.status)
    }
}

/// Persistence for job records and their last-known status.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Create a pending job with zero attempts.
    async fn insert(&self, job: NewJob) -> Result<JobRecord, CoreError>;

    async fn get(&self, id: &str) -> Result<Option<JobRecord>, CoreError>;

    /// Newest first.
    async fn list(&self, filter: &JobFilter) -> Result<Vec<JobRecord>, CoreError>;

    /// Every pending job of one kind, oldest first.
    async fn list_pending(&self, kind: JobKind) -> Result<Vec<JobRecord>, CoreError>;

    /// Count one status check against a pending job.
    ///
    /// The counter never exceeds `ceiling` when one is given. Returns the
    /// stored count; terminal jobs are left untouched.
    async fn record_attempt(&self, id: &str, ceiling: Option<u32>) -> Result<u32, CoreError>;

    /// Write a terminal outcome if, and only if, the job is still pending.
    ///
    /// Returns `true` when the write applied.
    async fn finish(&self, id: &str, completion: &Completion) -> Result<bool, CoreError>;

    /// Remove a job. Returns `false` if it did not exist.
    async fn delete(&self, id: &str) -> Result<bool, CoreError>;

    /// Reachability check used by the health endpoint.
    async fn ping(&self) -> Result<(), CoreError>;
}

/// In-process [`JobStore`] backed by a `HashMap`.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<String, JobRecord>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn insert(&self, job: NewJob) -> Result<JobRecord, CoreError> {
        let now = Utc::now();
        let record = JobRecord {
            id: new_job_id(),
            kind: job.kind,
            vendor: job.vendor,
            task_id: job.task_id,
            name: job.name,
            status: JobStatus::Pending,
            attempts: 0,
            result: None,
            error: None,
            api_key: job.api_key,
            created_at: now,
            updated_at: now,
        };
        self.jobs
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn get(&self, id: &str) -> Result<Option<JobRecord>, CoreError> {
        Ok(self.jobs.read().await.get(id).cloned())
    }

    async fn list(&self, filter: &JobFilter) -> Result<Vec<JobRecord>, CoreError> {
        let jobs = self.jobs.read().await;
        let mut matching: Vec<JobRecord> =
            jobs.values().filter(|j| filter.matches(j)).cloned().collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(matching
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.limit() as usize)
            .collect())
    }

    async fn list_pending(&self, kind: JobKind) -> Result<Vec<JobRecord>, CoreError> {
        let jobs = self.jobs.read().await;
        let mut pending: Vec<JobRecord> = jobs
            .values()
            .filter(|j| j.kind == kind && j.status == JobStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(pending)
    }

    async fn record_attempt(&self, id: &str, ceiling: Option<u32>) -> Result<u32, CoreError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(id).ok_or_else(|| CoreError::NotFound {
            entity: "Job",
            id: id.to_string(),
        })?;

        if job.status == JobStatus::Pending {
            let next = job.attempts.saturating_add(1);
            job.attempts = ceiling.map_or(next, |c| next.min(c));
            job.updated_at = Utc::now();
        }
        Ok(job.attempts)
    }

    async fn finish(&self, id: &str, completion: &Completion) -> Result<bool, CoreError> {
        let mut jobs = self.jobs.write().await;
        let Some(job) = jobs.get_mut(id) else {
            return Ok(false);
        };

        let next = completion.status();
        if !job.status.can_transition_to(next) {
            return Ok(false);
        }

        job.status = next;
        job.result = completion.result().cloned();
        job.error = completion.error().cloned();
        job.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete(&self, id: &str) -> Result<bool, CoreError> {
        Ok(self.jobs.write().await.remove(id).is_some())
    }

    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::messages;
    use crate::vendor_error::VendorError;

    fn voice_clone() -> NewJob {
        NewJob::new(JobKind::VoiceClone, "cicada")
            .with_task_id("task-1")
            .with_api_key("key")
    }

    #[tokio::test]
    async fn insert_creates_pending_job() {
        let store = MemoryJobStore::new();
        let job = store.insert(voice_clone().with_name("narrator")).await.unwrap();

        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.attempts, 0);
        assert_eq!(job.name.as_deref(), Some("narrator"));

        let fetched = store.get(&job.id).await.unwrap().expect("stored");
        assert_eq!(fetched.task_id.as_deref(), Some("task-1"));
    }

    #[tokio::test]
    async fn finish_applies_exactly_once() {
        let store = MemoryJobStore::new();
        let job = store.insert(voice_clone()).await.unwrap();

        let success = Completion::Success(json!({"audio_url": "A"}));
        assert!(store.finish(&job.id, &success).await.unwrap());

        let failure = Completion::Failed(VendorError::task_failed(
            -1,
            Some("late failure"),
            messages::task_failed(JobKind::VoiceClone),
        ));
        assert!(!store.finish(&job.id, &failure).await.unwrap());
        assert!(!store.finish(&job.id, &success).await.unwrap());

        let stored = store.get(&job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Success);
        assert_eq!(stored.audio_url(), Some("A"));
        assert!(stored.error.is_none());
    }

    #[tokio::test]
    async fn finish_unknown_job_is_a_no_op() {
        let store = MemoryJobStore::new();
        let applied = store
            .finish("missing", &Completion::Success(json!({})))
            .await
            .unwrap();
        assert!(!applied);
    }

    #[tokio::test]
    async fn record_attempt_respects_ceiling_and_terminal_state() {
        let store = MemoryJobStore::new();
        let job = store.insert(voice_clone()).await.unwrap();

        for _ in 0..5 {
            store.record_attempt(&job.id, Some(3)).await.unwrap();
        }
        assert_eq!(store.get(&job.id).await.unwrap().unwrap().attempts, 3);

        let timeout = Completion::Timeout(VendorError::timeout(messages::timed_out(JobKind::VoiceClone)));
        store.finish(&job.id, &timeout).await.unwrap();
        assert_eq!(store.record_attempt(&job.id, None).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn list_pending_filters_kind_and_status() {
        let store = MemoryJobStore::new();
        let a = store.insert(voice_clone()).await.unwrap();
        let b = store.insert(voice_clone()).await.unwrap();
        store
            .insert(NewJob::new(JobKind::AvatarCreation, "chanjing"))
            .await
            .unwrap();
        store
            .finish(&b.id, &Completion::Success(json!({})))
            .await
            .unwrap();

        let pending = store.list_pending(JobKind::VoiceClone).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, a.id);
    }

    #[tokio::test]
    async fn list_applies_filter_and_pagination() {
        let store = MemoryJobStore::new();
        for _ in 0..3 {
            store.insert(voice_clone()).await.unwrap();
        }
        store
            .insert(NewJob::new(JobKind::VideoGeneration, "hedra"))
            .await
            .unwrap();

        let all = store.list(&JobFilter::default()).await.unwrap();
        assert_eq!(all.len(), 4);

        let clones = store
            .list(&JobFilter {
                kind: Some(JobKind::VoiceClone),
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(clones.len(), 2);
        assert!(clones.iter().all(|j| j.kind == JobKind::VoiceClone));
    }

    #[tokio::test]
    async fn delete_removes_job() {
        let store = MemoryJobStore::new();
        let job = store.insert(voice_clone()).await.unwrap();

        assert!(store.delete(&job.id).await.unwrap());
        assert!(!store.delete(&job.id).await.unwrap());
        assert!(store.get(&job.id).await.unwrap().is_none());
    }

    #[test]
    fn filter_limits_are_clamped() {
        let filter = JobFilter {
            limit: Some(1_000),
            offset: Some(-5),
            ..Default::default()
        };
        assert_eq!(filter.limit(), MAX_LIMIT);
        assert_eq!(filter.offset(), 0);
        assert_eq!(JobFilter::default().limit(), DEFAULT_LIMIT);
    }
}
