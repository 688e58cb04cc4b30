//! Server-sent event stream of job lifecycle changes.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::state::AppState;

/// GET /api/jobs/events
///
/// Each event is named after its `event_type` (e.g. `job.succeeded`) and
/// carries the serialized [`studio_events::JobEvent`]. A subscriber that
/// falls behind skips the events it missed.
pub async fn job_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.events().subscribe()).filter_map(|item| match item {
        Ok(job_event) => match Event::default()
            .event(job_event.event_type.clone())
            .id(job_event.job_id.clone())
            .json_data(&job_event)
        {
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                tracing::error!(job_id = %job_event.job_id, error = %e, "Unserializable job event");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "Job event subscriber lagged");
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
