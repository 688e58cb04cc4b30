pub mod health;
pub mod jobs;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{chanjing, video, voice_clone};
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /create-avatar                     submit + wait (POST)
/// /create-audio                      submit + wait (POST)
/// /create-video                      passthrough (POST)
/// /gen-chanjing-audio                submit + wait (POST)
///
/// /create-hedra-video                assets + uploads + generation (POST, multipart)
/// /poll-hedra-video-result           wait (POST)
/// /doubao/omnihuman/submit           submit (POST)
/// /doubao/omnihuman/video_result     wait (POST)
/// /create-stable-video               submit (POST)
/// /poll-stable-video                 wait (POST)
/// /create-topview-video              uploads + submit (POST)
/// /poll-topview-video                wait (POST)
///
/// /voice-clone                       submit, resolved in background (POST, multipart)
/// /voice-clone-status                single check (GET)
///
/// /jobs                              list
/// /jobs/events                       server-sent events
/// /jobs/{id}                         get, delete
/// ```
///
/// The two multipart routes accept bodies up to `upload_limit` bytes; the
/// rest keep axum's default limit.
pub fn api_routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        // Chanjing
        .route("/create-avatar", post(chanjing::create_avatar))
        .route("/create-audio", post(chanjing::create_audio))
        .route("/create-video", post(chanjing::create_video))
        .route("/gen-chanjing-audio", post(chanjing::gen_chanjing_audio))
        // Video vendors
        .route(
            "/create-hedra-video",
            post(video::create_hedra_video).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/poll-hedra-video-result", post(video::poll_hedra_video))
        .route("/doubao/omnihuman/submit", post(video::submit_omnihuman))
        .route(
            "/doubao/omnihuman/video_result",
            post(video::omnihuman_video_result),
        )
        .route("/create-stable-video", post(video::create_stable_video))
        .route("/poll-stable-video", post(video::poll_stable_video))
        .route("/create-topview-video", post(video::create_topview_video))
        .route("/poll-topview-video", post(video::poll_topview_video))
        // Voice clone
        .route(
            "/voice-clone",
            post(voice_clone::voice_clone).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/voice-clone-status", get(voice_clone::voice_clone_status))
        // Jobs
        .nest("/jobs", jobs::router())
}
