//! Request context carrying the authenticated caller.

use serde::{Deserialize, Serialize};

use coedit_core::error::AppError;
use coedit_entity::user::UserRole;

use coedit_auth::EditorClaims;

/// Context for the current authenticated request.
///
/// Built by the API auth extractor and passed into service methods so
/// every operation knows who is acting and within which tenant. There is
/// no ambient per-request global; the context travels explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: i64,
    /// The tenant the caller belongs to.
    pub tenant_id: i64,
    /// The caller's role at token issue time.
    pub role: UserRole,
    /// Display name shown to collaborators.
    pub display_name: String,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: i64, tenant_id: i64, role: UserRole, display_name: String) -> Self {
        Self {
            user_id,
            tenant_id,
            role,
            display_name,
        }
    }

    /// Builds a context from verified bearer-token claims. Fails when the
    /// token does not carry the identity fields an authenticated endpoint
    /// requires.
    pub fn from_claims(claims: &EditorClaims) -> Result<Self, AppError> {
        let user_id = claims
            .user_id
            .ok_or_else(|| AppError::unauthorized("Token does not identify a user"))?;
        let tenant_id = claims
            .tenant_id
            .ok_or_else(|| AppError::unauthorized("Token does not identify a tenant"))?;
        let role = claims
            .role
            .ok_or_else(|| AppError::unauthorized("Token does not carry a role"))?;

        Ok(Self {
            user_id,
            tenant_id,
            role,
            display_name: claims.display_name.clone().unwrap_or_default(),
        })
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
