//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] fans [`JobEvent`]s out to every subscriber, typically the
//! server-sent event stream that lets the UI observe job store updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use studio_core::job::{JobKind, JobRecord, JobStatus};
use studio_core::types::JobId;
use tokio::sync::broadcast;

pub const EVENT_JOB_CREATED: &str = "job.created";
pub const EVENT_JOB_SUCCEEDED: &str = "job.succeeded";
pub const EVENT_JOB_FAILED: &str = "job.failed";
pub const EVENT_JOB_TIMED_OUT: &str = "job.timed_out";
pub const EVENT_JOB_DELETED: &str = "job.deleted";

// ---------------------------------------------------------------------------
// JobEvent
// ---------------------------------------------------------------------------

/// A job lifecycle change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEvent {
    /// Dot-separated event name, e.g. `"job.succeeded"`.
    pub event_type: String,
    pub job_id: JobId,
    pub kind: JobKind,
    pub status: JobStatus,
    /// Result on success, error body on failure, empty object otherwise.
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl JobEvent {
    /// Describe the current state of `job`.
    ///
    /// The event name follows the status: pending jobs are announced as
    /// created, terminal jobs by their outcome.
    pub fn from_record(job: &JobRecord) -> Self {
        let event_type = match job.status {
            JobStatus::Pending => EVENT_JOB_CREATED,
            JobStatus::Success => EVENT_JOB_SUCCEEDED,
            JobStatus::Failed => EVENT_JOB_FAILED,
            JobStatus::Timeout => EVENT_JOB_TIMED_OUT,
        };
        let payload = match (&job.result, &job.error) {
            (Some(result), _) => result.clone(),
            (None, Some(error)) => serde_json::to_value(error).unwrap_or_default(),
            (None, None) => serde_json::Value::Object(Default::default()),
        };

        Self {
            event_type: event_type.to_string(),
            job_id: job.id.clone(),
            kind: job.kind,
            status: job.status,
            payload,
            timestamp: Utc::now(),
        }
    }

    /// Announce the removal of `job` from the store.
    pub fn deleted(job: &JobRecord) -> Self {
        Self {
            event_type: EVENT_JOB_DELETED.to_string(),
            payload: serde_json::Value::Object(Default::default()),
            ..Self::from_record(job)
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
pub struct EventBus {
    sender: broadcast::Sender<JobEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: JobEvent) {
        // Ignore the SendError; it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;
    use studio_core::messages;
    use studio_core::vendor_error::VendorError;

    use super::*;

    fn record(status: JobStatus) -> JobRecord {
        let now = Utc::now();
        JobRecord {
            id: "job-7".into(),
            kind: JobKind::VoiceClone,
            vendor: "cicada".into(),
            task_id: Some("task-7".into()),
            name: None,
            status,
            attempts: 1,
            result: None,
            error: None,
            api_key: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let mut job = record(JobStatus::Success);
        job.result = Some(json!({"audio_url": "A"}));
        bus.publish(JobEvent::from_record(&job));

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, EVENT_JOB_SUCCEEDED);
        assert_eq!(received.job_id, "job-7");
        assert_eq!(received.payload["audio_url"], "A");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(JobEvent::from_record(&record(JobStatus::Pending)));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.event_type, EVENT_JOB_CREATED);
        assert_eq!(e2.event_type, EVENT_JOB_CREATED);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(JobEvent::from_record(&record(JobStatus::Pending)));
    }

    #[test]
    fn failure_payload_carries_error_body() {
        let mut job = record(JobStatus::Failed);
        job.error = Some(VendorError::task_failed(
            -1,
            Some("voice sample rejected"),
            messages::task_failed(JobKind::VoiceClone),
        ));

        let event = JobEvent::from_record(&job);
        assert_eq!(event.event_type, EVENT_JOB_FAILED);
        assert_eq!(event.payload["message"], "voice sample rejected");
        assert_eq!(event.payload["type"], "task_failed");
    }

    #[test]
    fn deleted_event_has_empty_payload() {
        let event = JobEvent::deleted(&record(JobStatus::Timeout));
        assert_eq!(event.event_type, EVENT_JOB_DELETED);
        assert_eq!(event.status, JobStatus::Timeout);
        assert!(event.payload.as_object().unwrap().is_empty());
    }
}
