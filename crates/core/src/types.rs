/// Locally generated job identifiers are UUID v7 strings.
pub type JobId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a new time-ordered job identifier.
pub fn new_job_id() -> JobId {
    uuid::Uuid::now_v7().to_string()
}
