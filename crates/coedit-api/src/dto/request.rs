//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Query parameters of the document download endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadQuery {
    /// The file to stream.
    pub file_id: i64,
    /// Optional editor token scoping the download.
    #[serde(default)]
    pub token: Option<String>,
}

/// Query parameters of the editor config endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EditorConfigQuery {
    /// The file to open.
    pub file_id: i64,
}

/// Body of the close-session endpoint.
///
/// Either `session_token` identifies one session, or `file_id` with
/// `force_close` closes every session the caller holds on the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloseSessionRequest {
    /// The session to close.
    #[serde(default)]
    pub session_token: Option<String>,
    /// The file whose sessions to close (with `force_close`).
    #[serde(default)]
    pub file_id: Option<i64>,
    /// Whether changes were saved; defaults to what the session recorded.
    #[serde(default)]
    pub changes_saved: Option<bool>,
    /// Close all of the caller's sessions on `file_id`.
    #[serde(default)]
    pub force_close: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_session_defaults_are_permissive() {
        let req: CloseSessionRequest = serde_json::from_str("{}").unwrap();
        assert!(req.session_token.is_none());
        assert!(req.file_id.is_none());
        assert!(req.changes_saved.is_none());
        assert!(!req.force_close);
    }

    #[test]
    fn close_session_accepts_force_close_form() {
        let req: CloseSessionRequest =
            serde_json::from_str(r#"{"file_id":7,"force_close":true}"#).unwrap();
        assert_eq!(req.file_id, Some(7));
        assert!(req.force_close);
    }
}
