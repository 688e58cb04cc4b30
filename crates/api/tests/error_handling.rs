//! The uniform error body and the HTTP status mapping.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use common::{build_idle_app, build_test_app, expect_error, get, post_json, post_multipart, Part};

/// A vendor that counts every request it receives.
fn counting_vendor() -> (Router, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let router = Router::new().fallback(move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Json(json!({"code": 0, "data": "unexpected"}))
        }
    });
    (router, hits)
}

#[tokio::test]
async fn missing_fields_are_rejected_before_any_vendor_call() {
    let (vendor, hits) = counting_vendor();
    let test = build_test_app(vendor).await;

    let response = post_json(
        test.app,
        "/api/create-avatar",
        json!({"apiKey": "k", "name": "me"}),
    )
    .await;

    let error = expect_error(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(error["type"], "validation_error");
    assert_eq!(error["err_code"], 400);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn blank_api_key_fails_validation() {
    let (vendor, hits) = counting_vendor();
    let test = build_test_app(vendor).await;

    let response = post_json(
        test.app,
        "/api/poll-stable-video",
        json!({"taskId": "t-1", "apiKey": ""}),
    )
    .await;

    let error = expect_error(response, StatusCode::BAD_REQUEST).await;
    assert!(error["message"].as_str().unwrap().contains("apiKey is required"));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let test = build_idle_app().await;
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/gen-chanjing-audio")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let response = tower::ServiceExt::oneshot(test.app, request).await.unwrap();

    expect_error(response, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn create_video_without_audio_source_is_rejected() {
    let (vendor, hits) = counting_vendor();
    let test = build_test_app(vendor).await;

    let response = post_json(
        test.app,
        "/api/create-video",
        json!({"apiKey": "k", "personId": "p-1", "text": "hello"}),
    )
    .await;

    expect_error(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn multipart_without_file_is_rejected() {
    let (vendor, hits) = counting_vendor();
    let test = build_test_app(vendor).await;

    let response = post_multipart(
        test.app,
        "/api/voice-clone",
        &[Part::Text("apiKey", "k"), Part::Text("name", "narrator")],
    )
    .await;

    let error = expect_error(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(error["message"], "file is required");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_job_is_404_with_uniform_body() {
    let test = build_idle_app().await;

    let response = get(test.app, "/api/jobs/does-not-exist").await;

    let error = expect_error(response, StatusCode::NOT_FOUND).await;
    assert_eq!(error["type"], "not_found");
    assert_eq!(error["err_code"], 404);
}

#[tokio::test]
async fn vendor_envelope_error_is_passed_through() {
    let vendor = Router::new().route(
        "/create_video",
        post(|| async { Json(json!({"code": 50011, "msg": "person not found"})) }),
    );
    let test = build_test_app(vendor).await;

    let response = post_json(
        test.app,
        "/api/create-video",
        json!({"apiKey": "k", "personId": "p-1", "wavUrl": "https://cdn/a.wav"}),
    )
    .await;

    let error = expect_error(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(error["err_code"], 50011);
    assert_eq!(error["message"], "person not found");
    assert_eq!(error["message_ja"], "person not found");
    assert_eq!(error["type"], "vendor_error");
}

#[tokio::test]
async fn unstructured_vendor_failure_is_500_with_vendor_status_code() {
    let vendor = Router::new().route(
        "/run",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream exploded") }),
    );
    let test = build_test_app(vendor).await;

    let response = post_json(
        test.app,
        "/api/create-stable-video",
        json!({
            "apiKey": "k",
            "imageUrl": "https://cdn/i.png",
            "audioUrl": "https://cdn/a.wav",
        }),
    )
    .await;

    let error = expect_error(response, StatusCode::INTERNAL_SERVER_ERROR).await;
    assert_eq!(error["err_code"], 502);
    assert_eq!(error["type"], "server_error");
    assert_eq!(error["message_en"], "Failed to create the video");
}
