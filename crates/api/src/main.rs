use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use studio_core::store::{JobStore, MemoryJobStore};
use studio_events::EventBus;
use studio_pipeline::{JobTracker, PollingConfig, VoiceCloneScheduler};
use studio_vendors::{VendorClients, VendorEndpoints};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studio_api::config::ServerConfig;
use studio_api::router::build_app_router;
use studio_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "studio_api=debug,studio_pipeline=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let endpoints = VendorEndpoints::from_env();
    let polling = PollingConfig::from_env();
    tracing::info!(
        voice_clone_period_secs = polling.voice_clone_period.as_secs(),
        "Loaded polling configuration",
    );

    // --- Job store ---
    let store: Arc<dyn JobStore> = match &config.database_url {
        Some(database_url) => {
            let pool = studio_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            studio_db::health_check(&pool)
                .await
                .expect("Database health check failed");

            studio_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(studio_db::PgJobStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, jobs are kept in memory only");
            Arc::new(MemoryJobStore::new())
        }
    };

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    let tracker = JobTracker::new(store, Arc::clone(&event_bus));

    // --- Vendors ---
    let vendors = Arc::new(VendorClients::new(&endpoints));

    // --- Voice clone scheduler ---
    let shutdown = CancellationToken::new();
    let scheduler = VoiceCloneScheduler::new(
        tracker.clone(),
        Arc::new(vendors.voice_clone.clone()),
        polling.voice_clone_period,
        polling.voice_clone,
        shutdown.clone(),
    );
    // Pick up clones left pending by a previous run.
    match scheduler.refresh().await {
        Ok(active) => tracing::info!(active, "Voice clone scheduler initialised"),
        Err(e) => tracing::error!(error = %e, "Failed to check pending voice clones"),
    }

    // --- App state ---
    let state = AppState {
        tracker,
        config: Arc::new(config.clone()),
        vendors,
        polling: Arc::new(polling),
        scheduler: Arc::clone(&scheduler),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    scheduler
        .shutdown(Duration::from_secs(config.shutdown_timeout_secs))
        .await;
    tracing::info!("Voice clone scheduler stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
