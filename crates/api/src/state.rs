use std::sync::Arc;

use studio_events::EventBus;
use studio_pipeline::{JobTracker, PollingConfig, VoiceCloneScheduler};
use studio_vendors::VendorClients;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Job store plus event publishing.
    pub tracker: JobTracker,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// One HTTP client per vendor, sharing a connection pool.
    pub vendors: Arc<VendorClients>,
    /// Interval, ceiling and retry budget for every job kind.
    pub polling: Arc<PollingConfig>,
    /// Resolves queued voice clones in the background.
    pub scheduler: Arc<VoiceCloneScheduler>,
}

impl AppState {
    pub fn events(&self) -> &Arc<EventBus> {
        self.tracker.events()
    }
}
