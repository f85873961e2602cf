//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use coedit_auth::TokenService;
use coedit_core::config::AppConfig;
use coedit_database::repositories::{
    AuditLogRepository, EditorSessionRepository, FileRepository, FileVersionRepository,
    UserRepository,
};
use coedit_service::document::archive::VersionArchiver;
use coedit_service::{CallbackService, DocumentStreamer, SessionStore};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// cheap to clone; repositories and services are `Arc`-wrapped or hold
/// only an `Arc`/pool internally.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,

    /// Editor token issuing and verification.
    pub tokens: TokenService,
    /// Editor session lifecycle.
    pub sessions: SessionStore,
    /// Document content streaming.
    pub streamer: DocumentStreamer,
    /// Editor save-callback processing.
    pub callbacks: CallbackService,

    /// File rows.
    pub files: Arc<FileRepository>,
    /// Version snapshot rows.
    pub versions: Arc<FileVersionRepository>,
    /// User display references.
    pub users: Arc<UserRepository>,
    /// Audit log writes.
    pub audit: Arc<AuditLogRepository>,
}

impl AppState {
    /// Wires repositories and services from configuration and a pool.
    pub fn new(config: AppConfig, db_pool: PgPool) -> Self {
        let files = Arc::new(FileRepository::new(db_pool.clone()));
        let versions = Arc::new(FileVersionRepository::new(db_pool.clone()));
        let users = Arc::new(UserRepository::new(db_pool.clone()));
        let audit = Arc::new(AuditLogRepository::new(db_pool.clone()));
        let session_repo = Arc::new(EditorSessionRepository::new(db_pool.clone()));

        let tokens = TokenService::new(
            config.editor.token_secret.as_bytes(),
            config.editor.token_ttl_seconds as i64,
            config.editor.token_enabled,
        );
        let sessions = SessionStore::new(session_repo, config.editor.idle_timeout_seconds as i64);
        let streamer = DocumentStreamer::new(
            Arc::clone(&files),
            Arc::clone(&audit),
            tokens.clone(),
            &config.storage,
            &config.editor,
            &config.server,
        );
        let archiver = VersionArchiver::new(&config.storage.upload_root, Arc::clone(&versions));
        let callbacks = CallbackService::new(
            sessions.clone(),
            Arc::clone(&files),
            Arc::clone(&audit),
            archiver,
            streamer.clone(),
            &config.editor,
        );

        Self {
            config: Arc::new(config),
            db_pool,
            tokens,
            sessions,
            streamer,
            callbacks,
            files,
            versions,
            users,
            audit,
        }
    }
}
