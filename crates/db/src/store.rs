//! [`JobStore`] implementation over PostgreSQL.

use async_trait::async_trait;
use studio_core::error::CoreError;
use studio_core::job::{Completion, JobKind, JobRecord, NewJob};
use studio_core::store::{JobFilter, JobStore};

use crate::repositories::JobRepo;
use crate::DbPool;

/// Job store persisting to the `jobs` table.
#[derive(Clone)]
pub struct PgJobStore {
    pool: DbPool,
}

impl PgJobStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn db_error(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Job store query failed");
    CoreError::Internal(format!("database error: {err}"))
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn insert(&self, job: NewJob) -> Result<JobRecord, CoreError> {
        JobRepo::insert(&self.pool, &job)
            .await
            .map_err(db_error)?
            .try_into()
    }

    async fn get(&self, id: &str) -> Result<Option<JobRecord>, CoreError> {
        JobRepo::find_by_id(&self.pool, id)
            .await
            .map_err(db_error)?
            .map(JobRecord::try_from)
            .transpose()
    }

    async fn list(&self, filter: &JobFilter) -> Result<Vec<JobRecord>, CoreError> {
        JobRepo::list(&self.pool, filter)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(JobRecord::try_from)
            .collect()
    }

    async fn list_pending(&self, kind: JobKind) -> Result<Vec<JobRecord>, CoreError> {
        JobRepo::list_pending(&self.pool, kind)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(JobRecord::try_from)
            .collect()
    }

    async fn record_attempt(&self, id: &str, ceiling: Option<u32>) -> Result<u32, CoreError> {
        if let Some(attempts) = JobRepo::record_attempt(&self.pool, id, ceiling)
            .await
            .map_err(db_error)?
        {
            return Ok(u32::try_from(attempts).unwrap_or(0));
        }

        // Terminal jobs keep their count; missing jobs are an error.
        match self.get(id).await? {
            Some(job) => Ok(job.attempts),
            None => Err(CoreError::NotFound {
                entity: "Job",
                id: id.to_string(),
            }),
        }
    }

    async fn finish(&self, id: &str, completion: &Completion) -> Result<bool, CoreError> {
        JobRepo::finish(&self.pool, id, completion)
            .await
            .map_err(db_error)
    }

    async fn delete(&self, id: &str) -> Result<bool, CoreError> {
        JobRepo::delete(&self.pool, id).await.map_err(db_error)
    }

    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(db_error)
    }
}
