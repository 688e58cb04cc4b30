//! Job status ids mapping to the `job_statuses` lookup table.
//!
//! Each id matches the seed data in the create-jobs migration.

use studio_core::job::JobStatus;

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

pub const PENDING: StatusId = 1;
pub const SUCCESS: StatusId = 2;
pub const FAILED: StatusId = 3;
pub const TIMEOUT: StatusId = 4;

/// Return the database status ID for a job status.
pub fn status_id(status: JobStatus) -> StatusId {
    match status {
        JobStatus::Pending => PENDING,
        JobStatus::Success => SUCCESS,
        JobStatus::Failed => FAILED,
        JobStatus::Timeout => TIMEOUT,
    }
}

/// Map a stored status ID back to a job status.
pub fn status_from_id(id: StatusId) -> Option<JobStatus> {
    match id {
        PENDING => Some(JobStatus::Pending),
        SUCCESS => Some(JobStatus::Success),
        FAILED => Some(JobStatus::Failed),
        TIMEOUT => Some(JobStatus::Timeout),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_status_ids_match_seed_data() {
        assert_eq!(status_id(JobStatus::Pending), 1);
        assert_eq!(status_id(JobStatus::Success), 2);
        assert_eq!(status_id(JobStatus::Failed), 3);
        assert_eq!(status_id(JobStatus::Timeout), 4);
    }

    #[test]
    fn ids_map_back_to_statuses() {
        for status in [
            JobStatus::Pending,
            JobStatus::Success,
            JobStatus::Failed,
            JobStatus::Timeout,
        ] {
            assert_eq!(status_from_id(status_id(status)), Some(status));
        }
        assert_eq!(status_from_id(0), None);
        assert_eq!(status_from_id(9), None);
    }
}
