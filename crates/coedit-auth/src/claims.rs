//! Editor token claims.

use serde::{Deserialize, Serialize};

use coedit_entity::permission::EditorPermissions;
use coedit_entity::user::UserRole;

/// Claims carried by an editor token.
///
/// All domain fields are optional: a token asserts only what it was issued
/// with, and verifiers enforce presence where an operation requires it
/// (e.g. the streaming endpoint requires a matching `file_id`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EditorClaims {
    /// The file this token grants access to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<i64>,
    /// The user the token was issued for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// The tenant scope asserted by the token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<i64>,
    /// The editor session this token belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    /// Display name shown in the editor UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Platform role of the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    /// Capabilities granted inside the editor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<EditorPermissions>,
    /// Issued-at, seconds since the Unix epoch.
    #[serde(default)]
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    #[serde(default)]
    pub exp: i64,
}

impl EditorClaims {
    /// Whether the token permits downloading file content. Absence of the
    /// permission block means the claim does not restrict downloads.
    pub fn allows_download(&self) -> bool {
        self.permissions.as_ref().map(|p| p.download).unwrap_or(true)
    }
}
