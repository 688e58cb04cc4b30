//! Repository for the `jobs` table.
//!
//! Status literals come from `models::status`. Terminal writes are guarded
//! by `status_id = PENDING` so a job can only leave `pending` once.

use sqlx::PgPool;
use studio_core::job::{Completion, JobKind, NewJob};
use studio_core::store::JobFilter;
use studio_core::types::new_job_id;

use crate::models::job::JobRow;
use crate::models::status::{self, status_id};

/// Column list for `jobs` queries.
const COLUMNS: &str = "\
    id, kind, vendor, task_id, name, status_id, attempts, \
    result, error, api_key, created_at, updated_at";

/// Provides CRUD operations for jobs.
pub struct JobRepo;

impl JobRepo {
    /// Insert a new pending job.
    pub async fn insert(pool: &PgPool, input: &NewJob) -> Result<JobRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs (id, kind, vendor, task_id, name, status_id, api_key) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JobRow>(&query)
            .bind(new_job_id())
            .bind(input.kind.as_str())
            .bind(&input.vendor)
            .bind(&input.task_id)
            .bind(&input.name)
            .bind(status::PENDING)
            .bind(&input.api_key)
            .fetch_one(pool)
            .await
    }

    /// Find a job by its ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<JobRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, JobRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List jobs newest first with optional kind/status filters and pagination.
    pub async fn list(pool: &PgPool, params: &JobFilter) -> Result<Vec<JobRow>, sqlx::Error> {
        // Build the WHERE clause and track the next bind parameter index.
        let mut conditions: Vec<String> = Vec::new();
        let mut bind_idx: u32 = 1;

        if params.kind.is_some() {
            conditions.push(format!("kind = ${bind_idx}"));
            bind_idx += 1;
        }

        if params.status.is_some() {
            conditions.push(format!("status_id = ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM jobs \
             {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, JobRow>(&query);

        if let Some(kind) = params.kind {
            q = q.bind(kind.as_str());
        }
        if let Some(status) = params.status {
            q = q.bind(status_id(status));
        }

        q = q.bind(params.limit()).bind(params.offset());

        q.fetch_all(pool).await
    }

    /// Every pending job of one kind, oldest first.
    pub async fn list_pending(pool: &PgPool, kind: JobKind) -> Result<Vec<JobRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jobs \
             WHERE kind = $1 AND status_id = $2 \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, JobRow>(&query)
            .bind(kind.as_str())
            .bind(status::PENDING)
            .fetch_all(pool)
            .await
    }

    /// Increment the attempt counter of a pending job, capped at `ceiling`.
    ///
    /// Returns the new count, or `None` when the job is missing or terminal.
    pub async fn record_attempt(
        pool: &PgPool,
        id: &str,
        ceiling: Option<u32>,
    ) -> Result<Option<i32>, sqlx::Error> {
        let ceiling = ceiling.map(|c| i32::try_from(c).unwrap_or(i32::MAX));
        sqlx::query_scalar::<_, i32>(
            "UPDATE jobs \
             SET attempts = LEAST(attempts + 1, COALESCE($2, attempts + 1)), updated_at = NOW() \
             WHERE id = $1 AND status_id = $3 \
             RETURNING attempts",
        )
        .bind(id)
        .bind(ceiling)
        .bind(status::PENDING)
        .fetch_optional(pool)
        .await
    }

    /// Write a terminal outcome if the job is still pending.
    ///
    /// Returns `true` if the row was updated.
    pub async fn finish(
        pool: &PgPool,
        id: &str,
        completion: &Completion,
    ) -> Result<bool, sqlx::Error> {
        let error = completion
            .error()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        let result = sqlx::query(
            "UPDATE jobs \
             SET status_id = $2, result = $3, error = $4, updated_at = NOW() \
             WHERE id = $1 AND status_id = $5",
        )
        .bind(id)
        .bind(status_id(completion.status()))
        .bind(completion.result())
        .bind(error)
        .bind(status::PENDING)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a job. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
