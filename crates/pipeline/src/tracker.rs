//! Job bookkeeping shared by the orchestrators and the scheduler.

use std::sync::Arc;

use serde::Serialize;
use studio_core::error::CoreError;
use studio_core::job::{Completion, JobRecord, NewJob};
use studio_core::messages;
use studio_core::poller::PollOutcome;
use studio_core::store::JobStore;
use studio_core::vendor_error::VendorError;
use studio_events::{EventBus, JobEvent};

use crate::error::PipelineError;

/// Writes job state to the store and announces every change on the bus.
#[derive(Clone)]
pub struct JobTracker {
    store: Arc<dyn JobStore>,
    events: Arc<EventBus>,
}

impl JobTracker {
    pub fn new(store: Arc<dyn JobStore>, events: Arc<EventBus>) -> Self {
        Self { store, events }
    }

    pub fn store(&self) -> &Arc<dyn JobStore> {
        &self.store
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Record a new pending job.
    pub async fn open(&self, job: NewJob) -> Result<JobRecord, CoreError> {
        let record = self.store.insert(job).await?;
        tracing::info!(
            job_id = %record.id,
            kind = %record.kind,
            vendor = %record.vendor,
            task_id = record.task_id.as_deref().unwrap_or_default(),
            "Job created",
        );
        self.events.publish(JobEvent::from_record(&record));
        Ok(record)
    }

    /// Count a completed status check.
    ///
    /// Bookkeeping failures are logged and never interrupt polling.
    pub async fn attempt(&self, job_id: &str, ceiling: Option<u32>) {
        if let Err(e) = self.store.record_attempt(job_id, ceiling).await {
            tracing::warn!(job_id, error = %e, "Failed to record status check");
        }
    }

    /// Write a terminal outcome. Returns `true` if this call applied it.
    ///
    /// A job that is no longer pending (finished elsewhere or deleted) is
    /// left untouched and no event is published.
    pub async fn complete(&self, job_id: &str, completion: Completion) -> Result<bool, CoreError> {
        let applied = self.store.finish(job_id, &completion).await?;
        if !applied {
            tracing::debug!(job_id, "Job already terminal, outcome dropped");
            return Ok(false);
        }

        tracing::info!(job_id, status = %completion.status(), "Job finished");
        if let Some(record) = self.store.get(job_id).await? {
            self.events.publish(JobEvent::from_record(&record));
        }
        Ok(true)
    }

    /// Persist a poll outcome and turn it into the orchestrator's result.
    pub async fn settle<T: Serialize>(
        &self,
        job: &JobRecord,
        outcome: PollOutcome<T>,
    ) -> Result<T, PipelineError> {
        match outcome {
            PollOutcome::Success { value, .. } => {
                let result = serde_json::to_value(&value)
                    .map_err(|e| CoreError::Internal(format!("unserializable result: {e}")))?;
                self.complete(&job.id, Completion::Success(result)).await?;
                Ok(value)
            }
            PollOutcome::Failed { error, .. } => {
                self.complete(&job.id, Completion::Failed(error.clone())).await?;
                Err(PipelineError::Failed(error))
            }
            PollOutcome::Timeout { attempts } => {
                tracing::warn!(job_id = %job.id, attempts, "Job timed out");
                let error = VendorError::timeout(messages::timed_out(job.kind));
                self.complete(&job.id, Completion::Timeout(error.clone())).await?;
                Err(PipelineError::Timeout(error))
            }
        }
    }
}
