//! Audit log repository implementation.

use sqlx::PgPool;
use tracing::warn;

use coedit_core::error::{AppError, ErrorKind};
use coedit_core::result::AppResult;
use coedit_entity::audit::{AuditEntry, NewAuditEntry};

/// Repository for audit log rows.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record an audit event.
    pub async fn create(&self, data: &NewAuditEntry) -> AppResult<AuditEntry> {
        sqlx::query_as::<_, AuditEntry>(
            "INSERT INTO audit_log \
             (tenant_id, user_id, action, entity_type, entity_id, details) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(data.tenant_id)
        .bind(data.user_id)
        .bind(&data.action)
        .bind(&data.entity_type)
        .bind(data.entity_id)
        .bind(&data.details)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to write audit entry", e)
        })
    }

    /// Record an audit event, swallowing any failure. Audit writes never
    /// fail the operation that produced them.
    pub async fn log_best_effort(&self, data: &NewAuditEntry) {
        if let Err(e) = self.create(data).await {
            warn!(action = %data.action, error = %e, "Audit write failed");
        }
    }
}
