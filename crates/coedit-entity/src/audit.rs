//! Audit log entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A recorded audit event. Writes are always best-effort; a failed audit
/// insert never fails the operation that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditEntry {
    /// Unique entry identifier.
    pub id: i64,
    /// Tenant scope of the event.
    pub tenant_id: i64,
    /// Acting user, when known.
    pub user_id: Option<i64>,
    /// Action name, e.g. `document_downloaded`, `document_saved`.
    pub action: String,
    /// Target entity type, e.g. `file`, `editor_session`.
    pub entity_type: String,
    /// Target entity identifier.
    pub entity_id: i64,
    /// Structured event details.
    pub details: Option<serde_json::Value>,
    /// When the event was recorded.
    pub created_at: DateTime<Utc>,
}

/// Data required to record an audit event.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    /// Tenant scope of the event.
    pub tenant_id: i64,
    /// Acting user, when known.
    pub user_id: Option<i64>,
    /// Action name.
    pub action: String,
    /// Target entity type.
    pub entity_type: String,
    /// Target entity identifier.
    pub entity_id: i64,
    /// Structured event details.
    pub details: Option<serde_json::Value>,
}
