//! Editor session repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use coedit_core::error::{AppError, ErrorKind};
use coedit_core::result::AppResult;
use coedit_entity::session::{EditorSession, NewEditorSession};

/// Repository for editor session rows.
#[derive(Debug, Clone)]
pub struct EditorSessionRepository {
    pool: PgPool,
}

impl EditorSessionRepository {
    /// Create a new editor session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a session: close any prior open session for the same
    /// (file_id, user_id) pair and insert a new row, in one transaction
    /// so two concurrent opens cannot both leave an open row behind.
    pub async fn open(&self, data: &NewEditorSession) -> AppResult<EditorSession> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query(
            "UPDATE document_editor_sessions SET closed_at = NOW() \
             WHERE file_id = $1 AND user_id = $2 AND closed_at IS NULL",
        )
        .bind(data.file_id)
        .bind(data.user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to close prior sessions", e)
        })?;

        let session = sqlx::query_as::<_, EditorSession>(
            "INSERT INTO document_editor_sessions \
             (file_id, user_id, tenant_id, session_token, editor_key) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.file_id)
        .bind(data.user_id)
        .bind(data.tenant_id)
        .bind(&data.session_token)
        .bind(&data.editor_key)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create editor session", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit session open", e)
        })?;

        Ok(session)
    }

    /// Find a session by its opaque token.
    pub async fn find_by_token(&self, session_token: &str) -> AppResult<Option<EditorSession>> {
        sqlx::query_as::<_, EditorSession>(
            "SELECT * FROM document_editor_sessions WHERE session_token = $1",
        )
        .bind(session_token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find session by token", e)
        })
    }

    /// Find the most recently opened session whose editor key equals the
    /// given key.
    pub async fn find_by_editor_key(&self, editor_key: &str) -> AppResult<Option<EditorSession>> {
        sqlx::query_as::<_, EditorSession>(
            "SELECT * FROM document_editor_sessions WHERE editor_key = $1 \
             ORDER BY opened_at DESC LIMIT 1",
        )
        .bind(editor_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find session by editor key", e)
        })
    }

    /// Find the most recently opened session whose editor key is a prefix
    /// of the given key (the external editor may append suffixes).
    pub async fn find_by_editor_key_prefix(&self, key: &str) -> AppResult<Option<EditorSession>> {
        sqlx::query_as::<_, EditorSession>(
            "SELECT * FROM document_editor_sessions \
             WHERE $1 LIKE editor_key || '%' \
             ORDER BY opened_at DESC LIMIT 1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to prefix-match editor key", e)
        })
    }

    /// Refresh `last_activity` for an open session. Returns false when no
    /// open row matched the token.
    pub async fn touch(&self, session_token: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE document_editor_sessions SET last_activity = NOW() \
             WHERE session_token = $1 AND closed_at IS NULL",
        )
        .bind(session_token)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update last activity", e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    /// Close a session regardless of its current state. Returns false when
    /// no row matched the token.
    pub async fn close(&self, session_token: &str, changes_saved: bool) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE document_editor_sessions \
             SET closed_at = NOW(), changes_saved = $2 \
             WHERE session_token = $1 AND closed_at IS NULL",
        )
        .bind(session_token)
        .bind(changes_saved)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to close session", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Close all of one user's open sessions on a file. Returns the number
    /// of rows closed.
    pub async fn close_all_for_user(
        &self,
        file_id: i64,
        user_id: i64,
        changes_saved: bool,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE document_editor_sessions \
             SET closed_at = NOW(), changes_saved = $3 \
             WHERE file_id = $1 AND user_id = $2 AND closed_at IS NULL",
        )
        .bind(file_id)
        .bind(user_id)
        .bind(changes_saved)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to close user sessions", e)
        })?;

        Ok(result.rows_affected())
    }

    /// List open sessions on a file whose last activity falls inside the
    /// idle window. Stale rows are excluded even though not yet formally
    /// closed.
    pub async fn list_active(
        &self,
        file_id: i64,
        idle_cutoff: DateTime<Utc>,
    ) -> AppResult<Vec<EditorSession>> {
        sqlx::query_as::<_, EditorSession>(
            "SELECT * FROM document_editor_sessions \
             WHERE file_id = $1 AND closed_at IS NULL AND last_activity >= $2 \
             ORDER BY opened_at ASC",
        )
        .bind(file_id)
        .bind(idle_cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list active sessions", e)
        })
    }

    /// Bulk-close every open session idle since before the cutoff. Returns
    /// the number of rows closed.
    pub async fn sweep_expired(&self, idle_cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE document_editor_sessions SET closed_at = NOW() \
             WHERE closed_at IS NULL AND last_activity < $1",
        )
        .bind(idle_cutoff)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to sweep expired sessions", e)
        })?;

        Ok(result.rows_affected())
    }

    /// Mark an open session as having saved changes without closing it.
    pub async fn mark_saved(&self, session_token: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE document_editor_sessions \
             SET changes_saved = TRUE, last_activity = NOW() \
             WHERE session_token = $1 AND closed_at IS NULL",
        )
        .bind(session_token)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark session saved", e)
        })?;

        Ok(result.rows_affected() > 0)
    }
}
