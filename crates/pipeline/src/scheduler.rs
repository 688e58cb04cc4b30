//! Background resolution of queued voice clones.
//!
//! [`VoiceCloneScheduler`] owns at most one timer task. While any voice
//! clone job is pending the timer re-checks every pending job each period,
//! concurrently, and writes terminal outcomes through the store exactly once.
//! When nothing is pending the timer stops itself; the next submission
//! starts it again through [`VoiceCloneScheduler::refresh`].
//!
//! There is no attempt ceiling at this level. A job stays pending until the
//! vendor reports a terminal state or the job is deleted.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::join_all;
use studio_core::error::CoreError;
use studio_core::job::{Completion, JobKind, JobRecord};
use studio_core::messages;
use studio_core::poller::{check_with_retries, PollPolicy, PollStatus};
use studio_core::vendor_error::{ErrorType, VendorError};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::orchestrator::voice_clone::check_status;
use crate::tracker::JobTracker;
use crate::vendor::VoiceCloneVendor;

/// Bookkeeping for the running timer task.
struct Timer {
    generation: u64,
    task_handle: JoinHandle<()>,
    /// Child of the scheduler's shutdown token.
    cancel: CancellationToken,
}

pub struct VoiceCloneScheduler {
    tracker: JobTracker,
    vendor: Arc<dyn VoiceCloneVendor>,
    period: Duration,
    /// Transient retry budget for each check.
    policy: PollPolicy,
    timer: Mutex<Option<Timer>>,
    next_generation: Mutex<u64>,
    /// Master token, cancelled on server shutdown.
    shutdown: CancellationToken,
}

impl VoiceCloneScheduler {
    pub fn new(
        tracker: JobTracker,
        vendor: Arc<dyn VoiceCloneVendor>,
        period: Duration,
        policy: PollPolicy,
        shutdown: CancellationToken,
    ) -> Arc<Self> {
        Arc::new(Self {
            tracker,
            vendor,
            period,
            policy,
            timer: Mutex::new(None),
            next_generation: Mutex::new(0),
            shutdown,
        })
    }

    /// Ensure the timer is running. A second call while running is a no-op.
    ///
    /// Returns `true` if a new timer was started.
    pub fn start(self: &Arc<Self>) -> bool {
        if self.shutdown.is_cancelled() {
            return false;
        }

        let mut slot = self.lock_timer();
        if slot.as_ref().is_some_and(|t| !t.task_handle.is_finished()) {
            return false;
        }

        let generation = {
            let mut next = self
                .next_generation
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *next += 1;
            *next
        };
        let cancel = self.shutdown.child_token();
        let task_handle = tokio::spawn(Arc::clone(self).run(generation, cancel.clone()));

        *slot = Some(Timer {
            generation,
            task_handle,
            cancel,
        });
        tracing::info!(
            generation,
            period_secs = self.period.as_secs(),
            "Voice clone scheduler started",
        );
        true
    }

    /// Cancel the timer if one is running. Always safe to call.
    pub fn stop(&self) {
        if let Some(timer) = self.lock_timer().take() {
            timer.cancel.cancel();
            tracing::info!(generation = timer.generation, "Voice clone scheduler stopped");
        }
    }

    /// Cancel the shutdown token and wait up to `grace` for the timer task
    /// to finish its current cycle.
    pub async fn shutdown(&self, grace: Duration) {
        self.shutdown.cancel();
        let timer = self.lock_timer().take();
        if let Some(timer) = timer {
            if tokio::time::timeout(grace, timer.task_handle).await.is_err() {
                tracing::warn!(generation = timer.generation, "Voice clone timer did not stop in time");
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.lock_timer()
            .as_ref()
            .is_some_and(|t| !t.task_handle.is_finished() && !t.cancel.is_cancelled())
    }

    /// Apply the activation rule: run the timer if and only if a voice clone
    /// job is pending.
    ///
    /// Returns whether the timer is wanted.
    pub async fn refresh(self: &Arc<Self>) -> Result<bool, CoreError> {
        let pending = self
            .tracker
            .store()
            .list_pending(JobKind::VoiceClone)
            .await?;
        if pending.is_empty() {
            self.stop();
            Ok(false)
        } else {
            self.start();
            Ok(true)
        }
    }

    /// Check every pending voice clone once, concurrently.
    ///
    /// Returns how many jobs are still pending afterwards. Failures of
    /// individual checks are logged and leave the job pending.
    pub async fn run_cycle(&self) -> Result<usize, CoreError> {
        let pending = self
            .tracker
            .store()
            .list_pending(JobKind::VoiceClone)
            .await?;
        if pending.is_empty() {
            return Ok(0);
        }

        tracing::debug!(count = pending.len(), "Checking pending voice clones");
        let still_pending = join_all(pending.into_iter().map(|job| self.check_job(job)))
            .await
            .into_iter()
            .filter(|pending| *pending)
            .count();
        Ok(still_pending)
    }

    // ---- private helpers ----

    async fn run(self: Arc<Self>, generation: u64, cancel: CancellationToken) {
        let period = self.period.max(Duration::from_millis(1));
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(generation, "Voice clone timer cancelled");
                    return;
                }
                _ = interval.tick() => {
                    match self.run_cycle().await {
                        Ok(0) => break,
                        Ok(remaining) => {
                            tracing::debug!(remaining, "Voice clones still pending");
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Voice clone cycle failed");
                        }
                    }
                }
            }
        }

        // Nothing pending: release the slot, then look once more so a job
        // submitted while the slot was still held is not stranded.
        self.release(generation);
        match self.tracker.store().list_pending(JobKind::VoiceClone).await {
            Ok(pending) if !pending.is_empty() => {
                self.start();
            }
            Ok(_) => {}
            Err(e) => tracing::error!(error = %e, "Voice clone scheduler re-check failed"),
        }
    }

    fn release(&self, generation: u64) {
        let mut slot = self.lock_timer();
        if slot.as_ref().is_some_and(|t| t.generation == generation) {
            *slot = None;
            tracing::info!(generation, "Voice clone scheduler idle, timer released");
        }
    }

    /// Returns `true` if the job is still pending after the check.
    async fn check_job(&self, job: JobRecord) -> bool {
        let (Some(task_id), Some(api_key)) = (job.task_id.as_deref(), job.api_key.as_deref()) else {
            tracing::error!(job_id = %job.id, "Pending voice clone has no task id or credential");
            let error = VendorError::localized(
                500,
                messages::INTERNAL_FAILURE,
                ErrorType::ServerError,
                500,
            );
            self.finish(&job, Completion::Failed(error)).await;
            return false;
        };

        let label = format!("{}:{task_id}", job.vendor);
        let vendor = self.vendor.as_ref();
        let mut check = |_: u32| check_status(vendor, api_key, task_id);

        match check_with_retries(&label, &self.policy, job.attempts + 1, &mut check).await {
            Ok(PollStatus::Pending) => {
                self.tracker.attempt(&job.id, None).await;
                true
            }
            Ok(PollStatus::Done(result)) => {
                self.tracker.attempt(&job.id, None).await;
                match serde_json::to_value(&result) {
                    Ok(value) => self.finish(&job, Completion::Success(value)).await,
                    Err(e) => {
                        tracing::error!(job_id = %job.id, error = %e, "Unserializable clone result");
                    }
                }
                false
            }
            Ok(PollStatus::Failed(error)) => {
                self.tracker.attempt(&job.id, None).await;
                self.finish(&job, Completion::Failed(error)).await;
                false
            }
            Err(error) => {
                tracing::warn!(
                    job_id = %job.id,
                    task_id,
                    error = %error,
                    "Voice clone check failed, will retry next cycle",
                );
                true
            }
        }
    }

    async fn finish(&self, job: &JobRecord, completion: Completion) {
        if let Err(e) = self.tracker.complete(&job.id, completion).await {
            tracing::error!(job_id = %job.id, error = %e, "Failed to store voice clone outcome");
        }
    }

    fn lock_timer(&self) -> MutexGuard<'_, Option<Timer>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
