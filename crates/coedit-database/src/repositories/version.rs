//! File version repository implementation.

use sqlx::PgPool;

use coedit_core::error::{AppError, ErrorKind};
use coedit_core::result::AppResult;
use coedit_entity::file::{FileVersion, NewFileVersion};

/// Repository for archived file-version rows.
#[derive(Debug, Clone)]
pub struct FileVersionRepository {
    pool: PgPool,
}

impl FileVersionRepository {
    /// Create a new file version repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a version snapshot that has already been written to disk.
    pub async fn create(&self, data: &NewFileVersion) -> AppResult<FileVersion> {
        sqlx::query_as::<_, FileVersion>(
            "INSERT INTO file_versions \
             (file_id, version_number, size_bytes, storage_path, created_by, changes_description) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(data.file_id)
        .bind(data.version_number)
        .bind(data.size_bytes)
        .bind(&data.storage_path)
        .bind(data.created_by)
        .bind(&data.changes_description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record file version", e)
        })
    }

    /// List the most recent versions of a file, newest first.
    pub async fn list_recent(&self, file_id: i64, limit: i64) -> AppResult<Vec<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT * FROM file_versions WHERE file_id = $1 \
             ORDER BY version_number DESC LIMIT $2",
        )
        .bind(file_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list file versions", e)
        })
    }
}
