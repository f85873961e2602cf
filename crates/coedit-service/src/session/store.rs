//! Session store: opens, refreshes, closes, and sweeps editor sessions.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::RngCore;
use tracing::{debug, info};

use coedit_core::result::AppResult;
use coedit_database::repositories::EditorSessionRepository;
use coedit_entity::session::{EditorSession, NewEditorSession};

/// Coordinates editor session rows.
///
/// The at-most-one-open invariant per (file, user) pair is enforced in a
/// single transaction at the repository layer; the store adds token
/// generation and the idle-window policy on top.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<EditorSessionRepository>,
    /// Sessions idle longer than this are treated as dead.
    idle_timeout_seconds: i64,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("idle_timeout_seconds", &self.idle_timeout_seconds)
            .finish()
    }
}

impl SessionStore {
    /// Creates a new session store.
    pub fn new(sessions: Arc<EditorSessionRepository>, idle_timeout_seconds: i64) -> Self {
        Self {
            sessions,
            idle_timeout_seconds,
        }
    }

    /// Opens a session for a user on a file, closing any prior open
    /// session for the same pair.
    pub async fn open(
        &self,
        file_id: i64,
        user_id: i64,
        tenant_id: i64,
        editor_key: String,
    ) -> AppResult<EditorSession> {
        let session = self
            .sessions
            .open(&NewEditorSession {
                file_id,
                user_id,
                tenant_id,
                session_token: generate_session_token(),
                editor_key,
            })
            .await?;

        info!(
            session_id = session.id,
            file_id, user_id, "Editor session opened"
        );
        Ok(session)
    }

    /// Refreshes the activity timestamp of an open session. A missing or
    /// already-closed session is not an error.
    pub async fn touch(&self, session_token: &str) -> AppResult<bool> {
        let touched = self.sessions.touch(session_token).await?;
        if !touched {
            debug!("Heartbeat for unknown or closed session");
        }
        Ok(touched)
    }

    /// Closes a session. Returns the closed row when one matched.
    pub async fn close(
        &self,
        session_token: &str,
        changes_saved: bool,
    ) -> AppResult<Option<EditorSession>> {
        if !self.sessions.close(session_token, changes_saved).await? {
            return Ok(None);
        }
        self.sessions.find_by_token(session_token).await
    }

    /// Closes every open session a user holds on a file. Returns the
    /// number of sessions closed.
    pub async fn close_all_for_user(
        &self,
        file_id: i64,
        user_id: i64,
        changes_saved: bool,
    ) -> AppResult<u64> {
        self.sessions
            .close_all_for_user(file_id, user_id, changes_saved)
            .await
    }

    /// Looks up a session by its opaque token.
    pub async fn find_by_token(&self, session_token: &str) -> AppResult<Option<EditorSession>> {
        self.sessions.find_by_token(session_token).await
    }

    /// Resolves an editor document key to its session: exact match first,
    /// then prefix match, since the external editor may append suffixes to
    /// the key it was given.
    pub async fn resolve_editor_key(&self, key: &str) -> AppResult<Option<EditorSession>> {
        if let Some(session) = self.sessions.find_by_editor_key(key).await? {
            return Ok(Some(session));
        }
        self.sessions.find_by_editor_key_prefix(key).await
    }

    /// Marks an open session as having saved changes.
    pub async fn mark_saved(&self, session_token: &str) -> AppResult<bool> {
        self.sessions.mark_saved(session_token).await
    }

    /// Lists sessions on a file that are open and recently active. Rows
    /// past the idle window are excluded even before the sweep closes
    /// them.
    pub async fn list_active(&self, file_id: i64) -> AppResult<Vec<EditorSession>> {
        let cutoff = Utc::now() - Duration::seconds(self.idle_timeout_seconds);
        self.sessions.list_active(file_id, cutoff).await
    }

    /// Bulk-closes sessions idle past the window. Called from the
    /// scheduled sweep, never from the request path.
    pub async fn sweep_expired(&self) -> AppResult<u64> {
        let cutoff = Utc::now() - Duration::seconds(self.idle_timeout_seconds);
        let closed = self.sessions.sweep_expired(cutoff).await?;
        if closed > 0 {
            info!(closed, "Swept expired editor sessions");
        }
        Ok(closed)
    }
}

/// Generates a 64-character hex session token from 32 random bytes.
fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Builds the document key handed to the external editor. The key changes
/// with every file version so the editor never serves stale cached
/// content after a save.
pub fn generate_editor_key(file_id: i64, version: i32) -> String {
    let mut bytes = [0u8; 4];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("{file_id}_{version}_{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_tokens_are_unique_hex() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn editor_keys_embed_file_and_version() {
        let key = generate_editor_key(42, 3);
        assert!(key.starts_with("42_3_"));
        assert_ne!(generate_editor_key(42, 3), key);
    }
}
