//! Row model for the `jobs` table.

use sqlx::FromRow;
use studio_core::error::CoreError;
use studio_core::job::{JobKind, JobRecord};
use studio_core::types::Timestamp;
use studio_core::vendor_error::VendorError;

use super::status::{status_from_id, StatusId};

/// A row from the `jobs` table.
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: String,
    pub kind: String,
    pub vendor: String,
    pub task_id: Option<String>,
    pub name: Option<String>,
    pub status_id: StatusId,
    pub attempts: i32,
    pub result: Option<serde_json::Value>,
    pub error: Option<serde_json::Value>,
    pub api_key: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<JobRow> for JobRecord {
    type Error = CoreError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let kind = JobKind::parse(&row.kind)
            .ok_or_else(|| CoreError::Internal(format!("unknown job kind '{}'", row.kind)))?;
        let status = status_from_id(row.status_id)
            .ok_or_else(|| CoreError::Internal(format!("unknown job status id {}", row.status_id)))?;
        // `http_status` is not stored; reloaded errors default to 500.
        let error = row
            .error
            .map(serde_json::from_value::<VendorError>)
            .transpose()
            .map_err(|e| CoreError::Internal(format!("malformed job error payload: {e}")))?;

        Ok(JobRecord {
            id: row.id,
            kind,
            vendor: row.vendor,
            task_id: row.task_id,
            name: row.name,
            status,
            attempts: u32::try_from(row.attempts).unwrap_or(0),
            result: row.result,
            error,
            api_key: row.api_key,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
