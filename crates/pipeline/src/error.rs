use studio_core::error::CoreError;
use studio_core::vendor_error::VendorError;
use studio_vendors::VendorApiError;

/// Why an orchestrated job did not produce a result.
///
/// Submission failures, vendor-reported failures and timeouts stay distinct
/// so the caller can tell "the vendor said no" from "it took too long".
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The vendor rejected the submission; no polling happened.
    #[error("submission rejected: {0}")]
    Submit(VendorError),

    /// The vendor reported failure while the task was polled.
    #[error("task failed: {0}")]
    Failed(VendorError),

    /// The attempt ceiling ran out before a terminal state.
    #[error("task timed out: {0}")]
    Timeout(VendorError),

    #[error(transparent)]
    Store(#[from] CoreError),
}

impl PipelineError {
    pub fn submit(err: VendorApiError) -> Self {
        PipelineError::Submit(err.into_vendor_error())
    }

    /// The structured payload for vendor-facing variants.
    pub fn vendor_error(&self) -> Option<&VendorError> {
        match self {
            PipelineError::Submit(e) | PipelineError::Failed(e) | PipelineError::Timeout(e) => {
                Some(e)
            }
            PipelineError::Store(_) => None,
        }
    }
}
