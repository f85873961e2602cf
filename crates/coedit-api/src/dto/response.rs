//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coedit_entity::file::{FileStatus, FileVersion};
use coedit_entity::permission::EditorPermissions;
use coedit_entity::user::UserRef;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// The editor callback acknowledgement. The external editor retries any
/// non-zero `error`, so this is the entire contract.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CallbackResponse {
    /// 0 = accepted, 1 = rejected.
    pub error: u8,
}

impl CallbackResponse {
    /// The accepted acknowledgement.
    pub const OK: Self = Self { error: 0 };
    /// The rejected acknowledgement.
    pub const FAILED: Self = Self { error: 1 };
}

/// A user currently editing the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveUserResponse {
    /// User identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
}

impl From<UserRef> for ActiveUserResponse {
    fn from(user: UserRef) -> Self {
        Self {
            id: user.id,
            name: user.display_name,
        }
    }
}

/// Summary returned by the close-session endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseSessionResponse {
    /// How many sessions were closed.
    pub closed: u64,
    /// Duration of the closed session in seconds (single-session close).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i64>,
    /// Whether the session(s) saved changes.
    pub changes_saved: bool,
    /// Resulting file status when the close triggered a transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_status: Option<FileStatus>,
    /// Users still actively editing the file.
    pub active_users: Vec<ActiveUserResponse>,
}

/// Document descriptor inside the editor config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDescriptor {
    /// The editor document key for this session.
    pub key: String,
    /// Display title.
    pub title: String,
    /// Current version counter.
    pub version: i32,
    /// URL the editor fetches the content from, token included.
    pub url: String,
}

/// A version snapshot entry in the editor config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionResponse {
    /// Version number of the archived content.
    pub version: i32,
    /// Size of the archived content in bytes.
    pub size_bytes: i64,
    /// The user whose save produced this snapshot.
    pub created_by: i64,
    /// When the snapshot was written.
    pub created_at: DateTime<Utc>,
}

impl From<FileVersion> for VersionResponse {
    fn from(v: FileVersion) -> Self {
        Self {
            version: v.version_number,
            size_bytes: v.size_bytes,
            created_by: v.created_by,
            created_at: v.created_at,
        }
    }
}

/// Everything the parent platform needs to embed the editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfigResponse {
    /// Document identity and content location.
    pub document: DocumentDescriptor,
    /// Session token of the opened editor session.
    pub session_token: String,
    /// Capability flags for the editor.
    pub permissions: EditorPermissions,
    /// Why editing was withheld, when it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Non-fatal notices for the caller.
    pub warnings: Vec<String>,
    /// Whether other users are actively editing.
    pub collaborative: bool,
    /// Other active editors, excluding the caller.
    pub active_users: Vec<ActiveUserResponse>,
    /// Most recent version snapshots, newest first.
    pub recent_versions: Vec<VersionResponse>,
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Detailed health response with dependency checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Service status.
    pub status: String,
    /// Database connectivity.
    pub database: String,
}
