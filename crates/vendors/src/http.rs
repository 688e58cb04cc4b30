//! Response handling shared by every vendor client.

use serde::de::DeserializeOwned;
use serde_json::Value;
use studio_core::job::JobKind;
use studio_core::messages;
use studio_core::poller::CheckError;
use studio_core::vendor_error::VendorError;

/// Errors from the vendor REST layer.
#[derive(Debug, thiserror::Error)]
pub enum VendorApiError {
    /// The HTTP request itself failed (network, DNS, TLS, unreadable body).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The vendor answered with a structured error carrying its own code.
    #[error(transparent)]
    Api(#[from] VendorError),

    /// The vendor answered non-2xx without a recognizable error body, e.g. a
    /// gateway page. Status checks treat this as transient.
    #[error("unstructured vendor response: {0}")]
    Unstructured(VendorError),
}

impl VendorApiError {
    /// Collapse into the uniform error payload.
    pub fn into_vendor_error(self) -> VendorError {
        match self {
            VendorApiError::Request(e) => VendorError::network(&e.to_string()),
            VendorApiError::Api(e) | VendorApiError::Unstructured(e) => e,
        }
    }
}

impl From<VendorApiError> for CheckError {
    fn from(err: VendorApiError) -> Self {
        match err {
            VendorApiError::Request(e) => CheckError::Transient(e.to_string()),
            VendorApiError::Api(e) => CheckError::Vendor(e),
            VendorApiError::Unstructured(e) => {
                CheckError::Transient(format!("vendor answered HTTP {}", e.err_code))
            }
        }
    }
}

/// Ensure the response has a success status code.
///
/// On failure the body is inspected: a recognizable structured error is
/// passed through with its own code and messages, anything else becomes an
/// unstructured error carrying the HTTP status and the kind's localized text.
pub async fn ensure_success(
    response: reqwest::Response,
    kind: JobKind,
) -> Result<reqwest::Response, VendorApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let structured = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|json| VendorError::from_body(status.as_u16(), &json));

    let error = match structured {
        Some(error) => VendorApiError::Api(error),
        None => VendorApiError::Unstructured(VendorError::unstructured(
            status.as_u16(),
            messages::submit_failed(kind),
        )),
    };

    tracing::warn!(
        status = status.as_u16(),
        structured = matches!(error, VendorApiError::Api(_)),
        body = %truncate(&body, 512),
        "Vendor returned an error response",
    );
    Err(error)
}

/// Parse a successful JSON response body into the expected type.
pub async fn parse_json<T: DeserializeOwned>(
    response: reqwest::Response,
    kind: JobKind,
) -> Result<T, VendorApiError> {
    let response = ensure_success(response, kind).await?;
    Ok(response.json::<T>().await?)
}

/// A file received from the caller and forwarded to a vendor as multipart.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Build a multipart part named after the original file.
    pub fn into_part(self) -> Result<reqwest::multipart::Part, VendorApiError> {
        let part = reqwest::multipart::Part::bytes(self.bytes).file_name(self.file_name);
        match self.content_type {
            Some(mime) => Ok(part.mime_str(&mime)?),
            None => Ok(part),
        }
    }
}

/// Structured error for a vendor envelope whose business code signals failure.
pub fn envelope_error(code: i64, message: &str) -> VendorApiError {
    VendorApiError::Api(VendorError::verbatim(
        code,
        message,
        studio_core::vendor_error::ErrorType::VendorError,
        400,
    ))
}

fn truncate(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
