//! User repository implementation.

use sqlx::PgPool;

use coedit_core::error::{AppError, ErrorKind};
use coedit_core::result::AppResult;
use coedit_entity::user::UserRef;

/// Repository for user lookups. The coordinator never writes user rows.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch display references for a set of user ids. Ids with no
    /// matching row are silently absent from the result.
    pub async fn find_refs_by_ids(&self, ids: &[i64]) -> AppResult<Vec<UserRef>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, UserRef>(
            "SELECT id, display_name FROM users WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch user refs", e))
    }
}
