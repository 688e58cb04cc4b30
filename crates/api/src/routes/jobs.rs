use axum::routing::get;
use axum::Router;

use crate::handlers::{events, jobs};
use crate::state::AppState;

/// Job store routes, mounted at `/api/jobs`.
///
/// ```text
/// GET    /          list_jobs
/// GET    /events    job_events (SSE)
/// GET    /{id}      get_job
/// DELETE /{id}      delete_job
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(jobs::list_jobs))
        .route("/events", get(events::job_events))
        .route("/{id}", get(jobs::get_job).delete(jobs::delete_job))
}
