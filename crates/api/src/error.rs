use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use studio_core::error::CoreError;
use studio_core::messages;
use studio_core::vendor_error::{ErrorType, VendorError};
use studio_pipeline::PipelineError;
use studio_vendors::VendorApiError;

/// Application-level error type for HTTP handlers.
///
/// Every variant renders the same body, `{"error": VendorError}`, so the UI
/// reads one shape regardless of where the failure came from.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `studio_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An orchestrated job that did not produce a result.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// A vendor error from a route that calls an adapter directly.
    #[error(transparent)]
    Vendor(VendorError),

    /// Missing or malformed request parameters. Rejected before any vendor call.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<VendorApiError> for AppError {
    fn from(err: VendorApiError) -> Self {
        AppError::Vendor(err.into_vendor_error())
    }
}

impl AppError {
    /// The uniform payload rendered for this error.
    pub fn payload(&self) -> VendorError {
        match self {
            AppError::Core(core) => core_payload(core),
            AppError::Pipeline(PipelineError::Store(core)) => core_payload(core),
            AppError::Pipeline(err) => match err.vendor_error() {
                Some(vendor) => vendor.clone(),
                None => internal(&err.to_string()),
            },
            AppError::Vendor(err) => err.clone(),
            AppError::BadRequest(msg) => VendorError::validation(msg),
            AppError::InternalError(msg) => internal(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let payload = self.payload();
        let status = StatusCode::from_u16(payload.http_status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::warn!(err_code = payload.err_code, error = %self, "Request failed");
        } else {
            tracing::debug!(err_code = payload.err_code, error = %self, "Request rejected");
        }

        (status, axum::Json(json!({ "error": payload }))).into_response()
    }
}

fn core_payload(err: &CoreError) -> VendorError {
    match err {
        CoreError::NotFound { entity, id } => {
            VendorError::not_found(&format!("{entity} with id {id} not found"))
        }
        CoreError::Validation(msg) => VendorError::validation(msg),
        CoreError::Internal(msg) => internal(msg),
    }
}

fn internal(detail: &str) -> VendorError {
    tracing::error!(error = %detail, "Internal error");
    VendorError::localized(500, messages::INTERNAL_FAILURE, ErrorType::ServerError, 500)
}
