//! Editor save-callback handling.
//!
//! The external editor reports document lifecycle events by POSTing a
//! JSON payload keyed by the document key it was handed at open time.
//! The handler answers `{"error":0}` for every handled path, including an
//! unknown key: editors retry non-zero answers aggressively, and a stale
//! key after a service restart must not cause a retry storm.

use std::sync::Arc;
use std::time::Duration;

use tokio::fs;
use tracing::{info, warn};

use coedit_core::config::editor::EditorConfig;
use coedit_core::error::AppError;
use coedit_core::result::AppResult;
use coedit_database::repositories::{AuditLogRepository, FileRepository};
use coedit_entity::audit::NewAuditEntry;
use coedit_entity::callback::{CallbackPayload, CallbackStatus};
use coedit_entity::file::File;
use coedit_entity::session::EditorSession;

use super::archive::VersionArchiver;
use super::stream::DocumentStreamer;
use crate::session::SessionStore;

/// Action type code for a user disconnecting from the document.
const ACTION_DISCONNECTED: i32 = 0;
/// Action type code for a force-save request.
const ACTION_FORCESAVE_REQUESTED: i32 = 2;

/// Handles editor callbacks: heartbeats, saves, closes, and errors.
#[derive(Clone)]
pub struct CallbackService {
    sessions: SessionStore,
    files: Arc<FileRepository>,
    audit: Arc<AuditLogRepository>,
    archiver: VersionArchiver,
    streamer: DocumentStreamer,
    http: reqwest::Client,
    fetch_timeout: Duration,
}

impl std::fmt::Debug for CallbackService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackService").finish()
    }
}

impl CallbackService {
    /// Creates a new callback service.
    pub fn new(
        sessions: SessionStore,
        files: Arc<FileRepository>,
        audit: Arc<AuditLogRepository>,
        archiver: VersionArchiver,
        streamer: DocumentStreamer,
        editor: &EditorConfig,
    ) -> Self {
        Self {
            sessions,
            files,
            audit,
            archiver,
            streamer,
            http: reqwest::Client::new(),
            fetch_timeout: Duration::from_secs(editor.content_fetch_timeout_seconds),
        }
    }

    /// Processes one callback payload.
    ///
    /// `Ok(())` maps to `{"error":0}`. A `Validation` error maps to a 400
    /// `{"error":1}` (missing download URL on a save status); any other
    /// error maps to a 500 `{"error":1}` and the editor will retry.
    pub async fn handle(&self, payload: &CallbackPayload) -> AppResult<()> {
        let Some(session) = self.sessions.resolve_editor_key(&payload.key).await? else {
            warn!(key = %payload.key, status = payload.status, "Callback for unknown editor key");
            return Ok(());
        };

        let status = payload.status();
        info!(
            key = %payload.key,
            session_id = session.id,
            status = status.code(),
            "Editor callback received"
        );

        match status {
            CallbackStatus::NotFound => {
                warn!(session_id = session.id, "Editor reports document key not found");
            }
            CallbackStatus::Editing => {
                self.sessions.touch(&session.session_token).await?;
                self.audit_event(&session, "editor_heartbeat", payload).await;
            }
            CallbackStatus::ReadyForSaving => {
                self.save(&session, payload, false).await?;
                self.close_if_disconnected(&session, payload).await?;
            }
            CallbackStatus::SaveError => {
                warn!(session_id = session.id, "Editor reported a save error");
                self.audit_event(&session, "editor_save_error", payload).await;
            }
            CallbackStatus::ClosedNoChanges => {
                self.sessions.close(&session.session_token, false).await?;
                self.audit_event(&session, "editor_closed_unsaved", payload)
                    .await;
            }
            CallbackStatus::ForceSave => {
                self.save(&session, payload, true).await?;
                self.sessions.touch(&session.session_token).await?;
            }
            CallbackStatus::ForceSaveError => {
                warn!(session_id = session.id, "Editor reported a force-save error");
                self.audit_event(&session, "editor_forcesave_error", payload)
                    .await;
            }
            CallbackStatus::Unrecognized(code) => {
                warn!(session_id = session.id, code, "Unrecognized callback status");
            }
        }

        if payload
            .actions
            .iter()
            .any(|a| a.action_type == ACTION_FORCESAVE_REQUESTED)
        {
            self.audit_event(&session, "editor_forcesave_requested", payload)
                .await;
        }

        Ok(())
    }

    /// Downloads the saved content and applies it: archive the current
    /// live file, overwrite it, bump the version counter, and mark the
    /// session saved. The session is left unmarked on any failure so a
    /// later close reports the truth.
    async fn save(
        &self,
        session: &EditorSession,
        payload: &CallbackPayload,
        autosave: bool,
    ) -> AppResult<()> {
        let url = payload
            .url
            .as_deref()
            .ok_or_else(|| AppError::validation("Save callback carries no download URL"))?;

        let file = self
            .files
            .find_by_id(session.file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File for session no longer exists"))?;

        let content = self.fetch_content(url).await?;

        let live_path = self.resolve_or_default_path(&file).await;
        let details = serde_json::json!({
            "users": payload.users,
            "changesurl": payload.changesurl,
            "forcesavetype": payload.forcesavetype,
            "autosave": autosave,
        });
        self.archiver
            .archive(&file, &live_path, session.user_id, Some(details))
            .await?;

        if let Some(parent) = live_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&live_path, &content).await?;

        self.files
            .apply_save(file.id, content.len() as i64, session.user_id)
            .await?;
        self.sessions.mark_saved(&session.session_token).await?;

        info!(
            file_id = file.id,
            session_id = session.id,
            bytes = content.len(),
            autosave,
            "Document content saved"
        );
        self.audit_event(
            session,
            if autosave {
                "document_autosaved"
            } else {
                "document_saved"
            },
            payload,
        )
        .await;

        Ok(())
    }

    /// Fetches the saved document body from the editor's download URL.
    async fn fetch_content(&self, url: &str) -> AppResult<bytes::Bytes> {
        let response = self
            .http
            .get(url)
            .timeout(self.fetch_timeout)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    coedit_core::error::ErrorKind::ExternalService,
                    "Failed to fetch saved content from editor",
                    e,
                )
            })?;

        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "Editor content fetch returned HTTP {}",
                response.status()
            )));
        }

        response.bytes().await.map_err(|e| {
            AppError::with_source(
                coedit_core::error::ErrorKind::ExternalService,
                "Failed to read saved content body",
                e,
            )
        })
    }

    /// Where the live content lives, or where it should be written when
    /// it does not exist yet.
    async fn resolve_or_default_path(&self, file: &File) -> std::path::PathBuf {
        match self.streamer.resolve_path(file).await {
            Ok(path) => path,
            Err(_) => self
                .streamer
                .default_live_path(file),
        }
    }

    /// Closes the session as saved when the payload reports the session
    /// user disconnecting alongside a save status.
    async fn close_if_disconnected(
        &self,
        session: &EditorSession,
        payload: &CallbackPayload,
    ) -> AppResult<()> {
        let user_id = session.user_id.to_string();
        let disconnected = payload
            .actions
            .iter()
            .any(|a| a.action_type == ACTION_DISCONNECTED && a.user_id == user_id);

        if disconnected {
            self.sessions.close(&session.session_token, true).await?;
            info!(session_id = session.id, "Session closed on editor disconnect");
        }
        Ok(())
    }

    /// Best-effort audit of a callback event.
    async fn audit_event(&self, session: &EditorSession, action: &str, payload: &CallbackPayload) {
        let details = serde_json::json!({
            "editor_key": payload.key,
            "status": payload.status,
            "users": payload.users,
        });
        self.audit
            .log_best_effort(&NewAuditEntry {
                tenant_id: session.tenant_id,
                user_id: Some(session.user_id),
                action: action.to_string(),
                entity_type: "editor_session".to_string(),
                entity_id: session.id,
                details: Some(details),
            })
            .await;
    }
}
