//! Shared fixtures for API integration tests.
//!
//! Every test app runs on the in-memory job store with its vendors pointed
//! at a fake vendor server on an ephemeral port.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use studio_api::config::ServerConfig;
use studio_api::router::build_app_router;
use studio_api::state::AppState;
use studio_core::poller::PollPolicy;
use studio_core::store::MemoryJobStore;
use studio_events::EventBus;
use studio_pipeline::{JobTracker, PollingConfig, VoiceCloneScheduler};
use studio_vendors::{VendorClients, VendorEndpoints};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 1,
        max_upload_bytes: 10 * 1024 * 1024,
        database_url: None,
    }
}

/// Millisecond polling with a small ceiling so inline waits finish quickly.
pub fn fast_polling() -> PollingConfig {
    let fast = PollPolicy::new(Duration::from_millis(5), 5).with_transient_retries(1);
    PollingConfig {
        avatar: fast,
        voice: fast,
        speech: fast,
        hedra: fast,
        omnihuman: fast,
        stable_avatar: fast,
        topview: fast,
        voice_clone: fast,
        voice_clone_period: Duration::from_millis(20),
    }
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_vendor(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

/// Build the full application router against a fake vendor server.
pub async fn build_test_app(vendor: Router) -> TestApp {
    let base = spawn_vendor(vendor).await;
    let vendors = Arc::new(VendorClients::new(&VendorEndpoints::uniform(&base)));
    let tracker = JobTracker::new(
        Arc::new(MemoryJobStore::new()),
        Arc::new(EventBus::default()),
    );
    let polling = fast_polling();
    let scheduler = VoiceCloneScheduler::new(
        tracker.clone(),
        Arc::new(vendors.voice_clone.clone()),
        polling.voice_clone_period,
        polling.voice_clone,
        CancellationToken::new(),
    );

    let config = test_config();
    let state = AppState {
        tracker,
        config: Arc::new(config.clone()),
        vendors,
        polling: Arc::new(polling),
        scheduler,
    };

    TestApp {
        app: build_app_router(state.clone(), &config),
        state,
    }
}

/// An app whose vendor server knows no routes.
pub async fn build_idle_app() -> TestApp {
    build_test_app(Router::new()).await
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// One part of a hand-built multipart body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub const BOUNDARY: &str = "studio-test-boundary";

pub async fn post_multipart(app: Router, uri: &str, parts: &[Part<'_>]) -> Response {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File(name, file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the uniform error body and return its `error` object.
pub async fn expect_error(response: Response, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    let error = json["error"].clone();
    for key in ["err_code", "message", "message_cn", "message_en", "message_ja", "type"] {
        assert!(error.get(key).is_some(), "error body is missing {key}: {json}");
    }
    error
}
