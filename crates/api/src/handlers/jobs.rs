//! Handlers for the `/jobs` resource: the Local Job Store as the UI sees it.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use studio_core::error::CoreError;
use studio_core::job::{JobKind, JobRecord};
use studio_core::store::JobFilter;
use studio_events::JobEvent;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

async fn find_job(state: &AppState, id: &str) -> AppResult<JobRecord> {
    state
        .tracker
        .store()
        .get(id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Job",
                id: id.to_string(),
            })
        })
}

/// GET /api/jobs
///
/// Newest first. Supports optional `kind`, `status`, `limit` and `offset`
/// query parameters.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(filter): Query<JobFilter>,
) -> AppResult<Json<DataResponse<Vec<JobRecord>>>> {
    let jobs = state.tracker.store().list(&filter).await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// GET /api/jobs/{id}
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<JobRecord>>> {
    let job = find_job(&state, &id).await?;
    Ok(Json(DataResponse { data: job }))
}

/// DELETE /api/jobs/{id}
///
/// The only way a job leaves the store. Deleting the last pending voice
/// clone lets the scheduler go idle.
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let job = find_job(&state, &id).await?;
    if !state.tracker.store().delete(&id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Job", id }));
    }

    tracing::info!(job_id = %job.id, kind = %job.kind, status = %job.status, "Job deleted");
    state.events().publish(JobEvent::deleted(&job));

    if job.kind == JobKind::VoiceClone {
        if let Err(e) = state.scheduler.refresh().await {
            tracing::error!(error = %e, "Failed to refresh voice clone scheduler");
        }
    }

    Ok(StatusCode::NO_CONTENT)
}
