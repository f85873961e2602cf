//! User reference model and roles.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Platform role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Base user.
    User,
    /// Manager.
    Manager,
    /// Tenant administrator.
    Admin,
    /// Cross-tenant administrator.
    SuperAdmin,
}

impl UserRole {
    /// Whether this role carries admin-level capabilities.
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Manager => write!(f, "manager"),
            Self::Admin => write!(f, "admin"),
            Self::SuperAdmin => write!(f, "super_admin"),
        }
    }
}

/// Minimal user projection used for the active-editors enrichment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRef {
    /// User identifier.
    pub id: i64,
    /// Display name shown in the editor UI.
    pub display_name: String,
}
