//! Document endpoints: editor config, content streaming, save callback,
//! and session close.

use std::net::SocketAddr;

use axum::Json;
use axum::body::Body;
use axum::extract::{ConnectInfo, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use coedit_auth::EditorClaims;
use coedit_core::error::{AppError, ErrorKind};
use coedit_entity::audit::NewAuditEntry;
use coedit_entity::callback::CallbackPayload;
use coedit_entity::file::FileStatus;
use coedit_entity::session::EditorSession;
use coedit_service::document::stream::{RangeSpec, parse_range};
use coedit_service::permission::resolve_permissions;
use coedit_service::session::store::generate_editor_key;

use crate::dto::request::{CloseSessionRequest, DownloadQuery, EditorConfigQuery};
use crate::error::ApiError;
use crate::dto::response::{
    ActiveUserResponse, ApiResponse, CallbackResponse, CloseSessionResponse, DocumentDescriptor,
    EditorConfigResponse, VersionResponse,
};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET|POST /documents/download_for_editor
///
/// Streams file content to the external editor, honoring a single
/// `Range: bytes=start-end` header with 206/416 semantics.
pub async fn download_for_editor(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Query(query): Query<DownloadQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let claims = state
        .streamer
        .authorize(query.file_id, query.token.as_deref(), peer.ip())?;
    let file = state
        .streamer
        .resolve_file(query.file_id, claims.as_ref())
        .await?;
    let path = state.streamer.resolve_path(&file).await?;
    let size = tokio::fs::metadata(&path).await?.len();

    let range_header = headers.get(header::RANGE).and_then(|v| v.to_str().ok());
    let range = parse_range(range_header, size);

    state.streamer.audit_download(&file, claims.as_ref(), &range).await;

    let (status, start, length, content_range) = match range {
        RangeSpec::Unsatisfiable => {
            return Response::builder()
                .status(StatusCode::RANGE_NOT_SATISFIABLE)
                .header(header::CONTENT_RANGE, format!("bytes */{size}"))
                .body(Body::empty())
                .map_err(|e| ApiError::from(AppError::internal(format!("Failed to build response: {e}"))));
        }
        RangeSpec::Partial { start, end } => (
            StatusCode::PARTIAL_CONTENT,
            start,
            end - start + 1,
            Some(format!("bytes {start}-{end}/{size}")),
        ),
        RangeSpec::Full => (StatusCode::OK, 0, size, None),
    };

    let stream = state.streamer.open_reader(&path, start, length).await?;

    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, length)
        .header(header::ACCEPT_RANGES, "bytes")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.name),
        );
    if let Some(content_range) = content_range {
        builder = builder.header(header::CONTENT_RANGE, content_range);
    }

    builder
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError::from(AppError::internal(format!("Failed to build response: {e}"))))
}

/// POST /documents/save_document
///
/// The editor callback. Always answers `{"error":0}` for handled paths so
/// the editor never retry-storms a stale key; `{"error":1}` only when the
/// payload is unusable (400) or the save itself failed (500).
pub async fn save_document(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let payload = match decode_callback_body(&state, body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };

    match state.callbacks.handle(&payload).await {
        Ok(()) => (StatusCode::OK, Json(CallbackResponse::OK)).into_response(),
        Err(e) if e.kind == ErrorKind::Validation => {
            warn!(key = %payload.key, error = %e, "Rejected editor callback");
            (StatusCode::BAD_REQUEST, Json(CallbackResponse::FAILED)).into_response()
        }
        Err(e) => {
            error!(key = %payload.key, error = %e, "Editor callback processing failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CallbackResponse::FAILED),
            )
                .into_response()
        }
    }
}

/// Unwraps the callback body, which may arrive as plain JSON or wrapped
/// in a signed token when verification is enabled.
fn decode_callback_body(
    state: &AppState,
    body: serde_json::Value,
) -> Result<CallbackPayload, Response> {
    let value = match body.get("token").and_then(|t| t.as_str()) {
        Some(token) if state.tokens.enabled() => {
            let payload = state.tokens.verify_raw(token).map_err(|e| {
                warn!(error = %e, "Editor callback token rejected");
                (StatusCode::FORBIDDEN, Json(CallbackResponse::FAILED)).into_response()
            })?;
            // The editor nests the body under "payload" in token mode.
            payload.get("payload").cloned().unwrap_or(payload)
        }
        _ => body,
    };

    serde_json::from_value(value).map_err(|e| {
        warn!(error = %e, "Malformed editor callback body");
        (StatusCode::BAD_REQUEST, Json(CallbackResponse::FAILED)).into_response()
    })
}

/// POST /documents/close_session
pub async fn close_session(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Json(request): Json<CloseSessionRequest>,
) -> Result<Json<ApiResponse<CloseSessionResponse>>, ApiError> {
    let (file_id, closed, duration_seconds, changes_saved) =
        if let Some(token) = request.session_token.as_deref() {
            let session = state
                .sessions
                .find_by_token(token)
                .await?
                .ok_or_else(|| AppError::not_found("Session not found"))?;
            if session.user_id != ctx.user_id && !ctx.is_admin() {
                return Err(AppError::forbidden("Session belongs to another user").into());
            }

            let changes_saved = request.changes_saved.unwrap_or(session.changes_saved);
            let was_open = session.is_open();
            let closed = state
                .sessions
                .close(token, changes_saved)
                .await?
                .unwrap_or(session);

            (
                closed.file_id,
                u64::from(was_open),
                Some(closed.duration_seconds()),
                changes_saved,
            )
        } else if let (Some(file_id), true) = (request.file_id, request.force_close) {
            let changes_saved = request.changes_saved.unwrap_or(false);
            let closed = state
                .sessions
                .close_all_for_user(file_id, ctx.user_id, changes_saved)
                .await?;
            (file_id, closed, None, changes_saved)
        } else {
            return Err(AppError::validation(
                "Provide session_token, or file_id with force_close",
            )
            .into());
        };

    let remaining = state.sessions.list_active(file_id).await?;
    let mut file_status = None;

    // The last editor leaving with saved changes hands the document to
    // the approval flow.
    if remaining.is_empty() && changes_saved && closed > 0 {
        state.files.set_status(file_id, FileStatus::InReview).await?;
        file_status = Some(FileStatus::InReview);
    }

    let active_users = active_user_responses(&state, &remaining, None).await?;

    state
        .audit
        .log_best_effort(&NewAuditEntry {
            tenant_id: ctx.tenant_id,
            user_id: Some(ctx.user_id),
            action: "editor_session_closed".to_string(),
            entity_type: "file".to_string(),
            entity_id: file_id,
            details: Some(serde_json::json!({
                "closed": closed,
                "changes_saved": changes_saved,
            })),
        })
        .await;

    Ok(Json(ApiResponse::ok(CloseSessionResponse {
        closed,
        duration_seconds,
        changes_saved,
        file_status,
        active_users,
    })))
}

/// GET /documents/get_editor_config
///
/// Opens an editor session for the caller and returns everything the
/// parent platform needs to embed the editor: document key, download URL
/// with its token, resolved permissions, collaborators, and recent
/// versions.
pub async fn get_editor_config(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Query(query): Query<EditorConfigQuery>,
) -> Result<Json<ApiResponse<EditorConfigResponse>>, ApiError> {
    let file = state
        .files
        .find_in_tenant(query.file_id, ctx.tenant_id)
        .await?
        .ok_or_else(|| AppError::not_found("File not found"))?;

    let resolved = resolve_permissions(ctx.role, file.owner_id == ctx.user_id, file.status);

    let others = state.sessions.list_active(file.id).await?;
    let others: Vec<EditorSession> = others
        .into_iter()
        .filter(|s| s.user_id != ctx.user_id)
        .collect();

    let editor_key = generate_editor_key(file.id, file.version);
    let session = state
        .sessions
        .open(file.id, ctx.user_id, ctx.tenant_id, editor_key)
        .await?;

    let token = state.tokens.issue(EditorClaims {
        file_id: Some(file.id),
        user_id: Some(ctx.user_id),
        tenant_id: Some(ctx.tenant_id),
        session_token: Some(session.session_token.clone()),
        display_name: Some(ctx.display_name.clone()),
        role: Some(ctx.role),
        permissions: Some(resolved.permissions),
        ..Default::default()
    })?;

    let url = format!(
        "{}/documents/download_for_editor?file_id={}&token={}",
        state.config.server.public_url.trim_end_matches('/'),
        file.id,
        token,
    );

    let mut warnings = Vec::new();
    let collaborative = !others.is_empty();
    if collaborative {
        warnings.push("Other users are currently editing this document".to_string());
    }

    let active_users = active_user_responses(&state, &others, Some(ctx.user_id)).await?;

    let recent_versions: Vec<VersionResponse> = state
        .versions
        .list_recent(file.id, 10)
        .await?
        .into_iter()
        .map(VersionResponse::from)
        .collect();

    state
        .audit
        .log_best_effort(&NewAuditEntry {
            tenant_id: ctx.tenant_id,
            user_id: Some(ctx.user_id),
            action: "editor_config_issued".to_string(),
            entity_type: "file".to_string(),
            entity_id: file.id,
            details: Some(serde_json::json!({
                "editor_key": session.editor_key,
                "collaborative": collaborative,
            })),
        })
        .await;

    Ok(Json(ApiResponse::ok(EditorConfigResponse {
        document: DocumentDescriptor {
            key: session.editor_key.clone(),
            title: file.name.clone(),
            version: file.version,
            url,
        },
        session_token: session.session_token,
        permissions: resolved.permissions,
        reason: resolved.reason,
        warnings,
        collaborative,
        active_users,
        recent_versions,
    })))
}

/// Resolves display names for a set of sessions, dropping `exclude`.
async fn active_user_responses(
    state: &AppState,
    sessions: &[EditorSession],
    exclude: Option<i64>,
) -> Result<Vec<ActiveUserResponse>, AppError> {
    let ids: Vec<i64> = sessions
        .iter()
        .map(|s| s.user_id)
        .filter(|id| Some(*id) != exclude)
        .collect();
    let users = state.users.find_refs_by_ids(&ids).await?;
    Ok(users.into_iter().map(ActiveUserResponse::from).collect())
}
