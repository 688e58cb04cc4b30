mod common;

use std::sync::Arc;
use std::time::Duration;

use studio_core::job::{JobKind, JobRecord, JobStatus, NewJob};
use studio_core::poller::PollPolicy;
use studio_pipeline::{JobTracker, VoiceCloneScheduler};
use tokio_util::sync::CancellationToken;

use common::*;

const PERIOD: Duration = Duration::from_secs(10);
const RETRIES: PollPolicy = PollPolicy::new(Duration::from_secs(1), 1).with_transient_retries(2);

fn scheduler(tracker: &JobTracker, vendor: &Arc<FakeCloneVendor>) -> Arc<VoiceCloneScheduler> {
    VoiceCloneScheduler::new(
        tracker.clone(),
        Arc::clone(vendor) as _,
        PERIOD,
        RETRIES,
        CancellationToken::new(),
    )
}

async fn pending_clone(tracker: &JobTracker, task_id: &str) -> JobRecord {
    tracker
        .open(
            NewJob::new(JobKind::VoiceClone, "cicada")
                .with_task_id(task_id)
                .with_api_key("key"),
        )
        .await
        .unwrap()
}

async fn stored(tracker: &JobTracker, id: &str) -> JobRecord {
    tracker.store().get(id).await.unwrap().unwrap()
}

#[tokio::test(start_paused = true)]
async fn no_pending_jobs_means_no_timer() {
    let tracker = tracker();
    let vendor = Arc::new(FakeCloneVendor::default());
    let scheduler = scheduler(&tracker, &vendor);

    let wanted = scheduler.refresh().await.unwrap();

    assert!(!wanted);
    assert!(!scheduler.is_active());
}

#[tokio::test(start_paused = true)]
async fn resolves_job_on_fifth_check_then_stops() {
    let tracker = tracker();
    let vendor = Arc::new(FakeCloneVendor::default());
    let script = vendor.script(
        "task-1",
        Script::new(vec![
            Ok(clone_status("pending", None)),
            Ok(clone_status("pending", None)),
            Ok(clone_status("pending", None)),
            Ok(clone_status("pending", None)),
            Ok(clone_status("success", Some("A"))),
        ]),
    );
    let job = pending_clone(&tracker, "task-1").await;
    let scheduler = scheduler(&tracker, &vendor);

    assert!(scheduler.refresh().await.unwrap());
    assert!(scheduler.is_active());

    tokio::time::sleep(PERIOD * 4 + Duration::from_secs(1)).await;
    assert_eq!(script.calls(), 4);
    assert_eq!(stored(&tracker, &job.id).await.status, JobStatus::Pending);

    tokio::time::sleep(PERIOD * 10).await;
    let job = stored(&tracker, &job.id).await;
    assert_eq!(job.status, JobStatus::Success);
    assert_eq!(job.audio_url(), Some("A"));
    assert_eq!(job.attempts, 5);
    // No check after the terminal one, and the timer is gone.
    assert_eq!(script.calls(), 5);
    assert!(!scheduler.is_active());
}

#[tokio::test(start_paused = true)]
async fn start_is_idempotent() {
    let tracker = tracker();
    let vendor = Arc::new(FakeCloneVendor::default());
    let first = vendor.script("task-1", Script::repeating(clone_status("pending", None)));
    let second = vendor.script("task-2", Script::repeating(clone_status("pending", None)));
    pending_clone(&tracker, "task-1").await;
    pending_clone(&tracker, "task-2").await;
    let scheduler = scheduler(&tracker, &vendor);

    assert!(scheduler.start());
    assert!(!scheduler.start());
    assert!(scheduler.refresh().await.unwrap());

    tokio::time::sleep(PERIOD + Duration::from_secs(1)).await;

    // One timer: each job checked exactly once per period.
    assert_eq!(first.calls(), 1);
    assert_eq!(second.calls(), 1);
    scheduler.stop();
}

#[tokio::test(start_paused = true)]
async fn transient_failure_does_not_block_other_jobs() {
    let tracker = tracker();
    let vendor = Arc::new(FakeCloneVendor::default());
    vendor.script(
        "flaky",
        Script::new(vec![
            Err(network_error()),
            Err(network_error()),
            Err(network_error()),
            Ok(clone_status("success", Some("B"))),
        ]),
    );
    vendor.script("steady", Script::new(vec![Ok(clone_status("success", Some("A")))]));
    let flaky = pending_clone(&tracker, "flaky").await;
    let steady = pending_clone(&tracker, "steady").await;
    let scheduler = scheduler(&tracker, &vendor);
    scheduler.start();

    // First cycle: the flaky job exhausts its retry budget, the other finishes.
    tokio::time::sleep(PERIOD + Duration::from_secs(5)).await;
    assert_eq!(stored(&tracker, &steady.id).await.status, JobStatus::Success);
    assert_eq!(stored(&tracker, &flaky.id).await.status, JobStatus::Pending);

    // Second cycle resolves the flaky job.
    tokio::time::sleep(PERIOD).await;
    let flaky = stored(&tracker, &flaky.id).await;
    assert_eq!(flaky.status, JobStatus::Success);
    assert_eq!(flaky.audio_url(), Some("B"));
}

#[tokio::test(start_paused = true)]
async fn vendor_failure_is_written_once() {
    let tracker = tracker();
    let vendor = Arc::new(FakeCloneVendor::default());
    let mut failed = clone_status("failed", None);
    failed.err_msg = Some("sample too noisy".into());
    let script = vendor.script("task-1", Script::new(vec![Ok(failed)]));
    let job = pending_clone(&tracker, "task-1").await;
    let scheduler = scheduler(&tracker, &vendor);

    scheduler.refresh().await.unwrap();
    tokio::time::sleep(PERIOD * 3).await;

    let job = stored(&tracker, &job.id).await;
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.error.unwrap().message, "sample too noisy");
    assert_eq!(script.calls(), 1);
    assert!(!scheduler.is_active());
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_timer_and_refresh_restarts_it() {
    let tracker = tracker();
    let vendor = Arc::new(FakeCloneVendor::default());
    let script = vendor.script("task-1", Script::repeating(clone_status("pending", None)));
    pending_clone(&tracker, "task-1").await;
    let scheduler = scheduler(&tracker, &vendor);

    scheduler.start();
    scheduler.stop();
    scheduler.stop();
    assert!(!scheduler.is_active());

    tokio::time::sleep(PERIOD * 2).await;
    assert_eq!(script.calls(), 0);

    assert!(scheduler.refresh().await.unwrap());
    assert!(scheduler.is_active());
    tokio::time::sleep(PERIOD + Duration::from_secs(1)).await;
    assert_eq!(script.calls(), 1);
    scheduler.stop();
}

#[tokio::test(start_paused = true)]
async fn shutdown_token_stops_timer() {
    let tracker = tracker();
    let vendor = Arc::new(FakeCloneVendor::default());
    vendor.script("task-1", Script::repeating(clone_status("pending", None)));
    pending_clone(&tracker, "task-1").await;
    let shutdown = CancellationToken::new();
    let scheduler = VoiceCloneScheduler::new(
        tracker.clone(),
        Arc::clone(&vendor) as _,
        PERIOD,
        RETRIES,
        shutdown.clone(),
    );

    scheduler.start();
    shutdown.cancel();
    tokio::task::yield_now().await;

    assert!(!scheduler.is_active());
    assert!(!scheduler.start());
}

#[tokio::test(start_paused = true)]
async fn shutdown_waits_for_timer_and_blocks_restart() {
    let tracker = tracker();
    let vendor = Arc::new(FakeCloneVendor::default());
    let script = vendor.script("task-1", Script::repeating(clone_status("pending", None)));
    pending_clone(&tracker, "task-1").await;
    let scheduler = scheduler(&tracker, &vendor);

    assert!(scheduler.refresh().await.unwrap());
    scheduler.shutdown(Duration::from_secs(5)).await;

    assert!(!scheduler.is_active());
    assert!(!scheduler.start());
    tokio::time::sleep(PERIOD * 2).await;
    assert_eq!(script.calls(), 0);
}
