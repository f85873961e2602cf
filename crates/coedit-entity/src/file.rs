//! File and file-version entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Approval lifecycle status of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "file_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// Freshly uploaded, not yet submitted.
    Draft,
    /// Pending approval.
    InReview,
    /// Approval completed.
    Approved,
    /// Approval rejected.
    Rejected,
}

/// A document managed by the parent platform and edited through the
/// coordinator. The coordinator mutates only `file_size`, `version`,
/// `status`, and the last-edited columns.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: i64,
    /// Owning tenant. Immutable; must match the tenant asserted by any
    /// token used to access the file.
    pub tenant_id: i64,
    /// Display name (including extension).
    pub name: String,
    /// Storage path relative to the tenant directory.
    pub file_path: String,
    /// Current size in bytes.
    pub file_size: i64,
    /// Approval status.
    pub status: FileStatus,
    /// The file owner.
    pub owner_id: i64,
    /// Current version counter, incremented on every accepted save.
    pub version: i32,
    /// Who last saved content through the editor.
    pub last_edited_by: Option<i64>,
    /// When content was last saved through the editor.
    pub last_edited_at: Option<DateTime<Utc>>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl File {
    /// The basename component of the stored path.
    pub fn basename(&self) -> &str {
        self.file_path.rsplit('/').next().unwrap_or(&self.file_path)
    }
}

/// An immutable snapshot of a file's previous content, written just
/// before the live file is overwritten.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileVersion {
    /// Unique version row identifier.
    pub id: i64,
    /// The file this snapshot belongs to.
    pub file_id: i64,
    /// Version number of the archived content; monotonically increasing
    /// per file.
    pub version_number: i32,
    /// Size of the archived content in bytes.
    pub size_bytes: i64,
    /// Snapshot path relative to the upload root.
    pub storage_path: String,
    /// The user whose save produced this snapshot.
    pub created_by: i64,
    /// When the snapshot was written.
    pub created_at: DateTime<Utc>,
    /// Structured metadata: actor set, change URL, forcesave type.
    pub changes_description: Option<serde_json::Value>,
}

/// Data required to record a new file version.
#[derive(Debug, Clone)]
pub struct NewFileVersion {
    /// The file this snapshot belongs to.
    pub file_id: i64,
    /// Version number of the archived content.
    pub version_number: i32,
    /// Size of the archived content in bytes.
    pub size_bytes: i64,
    /// Snapshot path relative to the upload root.
    pub storage_path: String,
    /// The user whose save produced this snapshot.
    pub created_by: i64,
    /// Structured metadata about the change.
    pub changes_description: Option<serde_json::Value>,
}
