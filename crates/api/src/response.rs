//! Shared response envelope types for API handlers.
//!
//! Most routes answer with a `{ "data": ... }` envelope. Avatar creation
//! keeps the `{ "results": ... }` envelope its UI consumer reads.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "results": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct ResultsResponse<T: Serialize> {
    pub results: T,
}
