//! File repository implementation.

use sqlx::PgPool;

use coedit_core::error::{AppError, ErrorKind};
use coedit_core::result::AppResult;
use coedit_entity::file::{File, FileStatus};

/// Repository for file rows. The coordinator never creates or deletes
/// files; it only reads them and applies save-side mutations.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a non-deleted file by id, regardless of tenant. Used on the
    /// callback path, where the tenant is taken from the session row.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// Find a non-deleted file by id within a tenant. Used on all
    /// token-authenticated paths so a token for one tenant cannot reach
    /// another tenant's files.
    pub async fn find_in_tenant(&self, id: i64, tenant_id: i64) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find file in tenant", e)
        })
    }

    /// Apply an accepted editor save: bump the version counter and record
    /// the new size and editor attribution. Returns the updated row.
    pub async fn apply_save(
        &self,
        id: i64,
        new_size: i64,
        edited_by: i64,
    ) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET version = version + 1, file_size = $2, \
             last_edited_by = $3, last_edited_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(id)
        .bind(new_size)
        .bind(edited_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to apply file save", e))
    }

    /// Set the approval status of a file.
    pub async fn set_status(&self, id: i64, status: FileStatus) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE files SET status = $2 WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(status)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set file status", e))?;

        Ok(result.rows_affected() > 0)
    }
}
