//! Editor session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One document-editing attempt by one user.
///
/// A row is created when the editor is opened and closed on explicit
/// close, idle-timeout sweep, or a terminal editor callback. At most one
/// row per (file_id, user_id) is open at any time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EditorSession {
    /// Unique session identifier.
    pub id: i64,
    /// The file being edited.
    pub file_id: i64,
    /// The editing user.
    pub user_id: i64,
    /// The tenant the file belongs to.
    pub tenant_id: i64,
    /// Opaque random token identifying this session (64-char hex, unique).
    pub session_token: String,
    /// Identifier correlating to the external editor's document key.
    pub editor_key: String,
    /// When the session was opened.
    pub opened_at: DateTime<Utc>,
    /// Last heartbeat or callback activity.
    pub last_activity: DateTime<Utc>,
    /// When the session was closed; `None` while open.
    pub closed_at: Option<DateTime<Utc>>,
    /// Whether any changes were persisted during this session.
    pub changes_saved: bool,
}

impl EditorSession {
    /// Whether the session has not been formally closed.
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }

    /// Seconds elapsed between open and close (or now, while open).
    pub fn duration_seconds(&self) -> i64 {
        let end = self.closed_at.unwrap_or_else(Utc::now);
        (end - self.opened_at).num_seconds().max(0)
    }
}

/// Data required to open a new editor session.
#[derive(Debug, Clone)]
pub struct NewEditorSession {
    /// The file being edited.
    pub file_id: i64,
    /// The editing user.
    pub user_id: i64,
    /// The tenant the file belongs to.
    pub tenant_id: i64,
    /// Freshly generated session token.
    pub session_token: String,
    /// The editor document key for this session.
    pub editor_key: String,
}
