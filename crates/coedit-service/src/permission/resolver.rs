//! Role-based editor permission resolution.
//!
//! A pure function from (role, ownership, file status) to the capability
//! set handed to the external editor. Nothing here touches the database;
//! collaborator enrichment happens at the API layer.

use serde::Serialize;

use coedit_entity::file::FileStatus;
use coedit_entity::permission::EditorPermissions;
use coedit_entity::user::UserRole;

/// The outcome of permission resolution for one (user, file) pair.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedPermissions {
    /// Capability flags for the editor.
    pub permissions: EditorPermissions,
    /// Human-readable explanation when editing was withheld.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Resolves editor capabilities for a user on a file.
///
/// Admin and super-admin receive the maximal set. Managers lose only
/// content-control modification. Base users never fill forms, review, or
/// modify content controls and filters; when they do not own the file
/// they are further demoted to comment/download/print. An approved file
/// is read-only for base users regardless of ownership.
pub fn resolve_permissions(
    role: UserRole,
    is_owner: bool,
    status: FileStatus,
) -> ResolvedPermissions {
    let mut permissions = base_permissions(role, is_owner);
    let mut reason = None;

    if role == UserRole::User && status == FileStatus::Approved {
        permissions.edit = false;
        reason = Some("Approved documents cannot be edited with your role".to_string());
    }

    ResolvedPermissions {
        permissions,
        reason,
    }
}

/// The raw role table, before the approved-file override.
fn base_permissions(role: UserRole, is_owner: bool) -> EditorPermissions {
    match role {
        UserRole::Admin | UserRole::SuperAdmin => EditorPermissions::full(),
        UserRole::Manager => EditorPermissions {
            modify_content_control: false,
            ..EditorPermissions::full()
        },
        UserRole::User if is_owner => EditorPermissions {
            edit: true,
            comment: true,
            download: true,
            print: true,
            ..EditorPermissions::default()
        },
        UserRole::User => EditorPermissions::read_mostly(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_and_super_admin_are_maximal() {
        for role in [UserRole::Admin, UserRole::SuperAdmin] {
            for status in [FileStatus::Draft, FileStatus::Approved] {
                let resolved = resolve_permissions(role, false, status);
                assert_eq!(resolved.permissions, EditorPermissions::full());
                assert!(resolved.reason.is_none());
            }
        }
    }

    #[test]
    fn manager_lacks_content_control_only() {
        let resolved = resolve_permissions(UserRole::Manager, false, FileStatus::Draft);
        assert!(resolved.permissions.edit);
        assert!(resolved.permissions.review);
        assert!(resolved.permissions.fill_forms);
        assert!(!resolved.permissions.modify_content_control);
    }

    #[test]
    fn base_owner_can_edit_drafts() {
        let resolved = resolve_permissions(UserRole::User, true, FileStatus::Draft);
        assert!(resolved.permissions.edit);
        assert!(!resolved.permissions.fill_forms);
        assert!(!resolved.permissions.review);
        assert!(!resolved.permissions.modify_filter);
        assert!(resolved.reason.is_none());
    }

    #[test]
    fn base_non_owner_is_demoted() {
        let resolved = resolve_permissions(UserRole::User, false, FileStatus::Draft);
        assert_eq!(resolved.permissions, EditorPermissions::read_mostly());
        assert!(!resolved.permissions.edit);
    }

    #[test]
    fn approved_file_is_read_only_for_base_owner() {
        let resolved = resolve_permissions(UserRole::User, true, FileStatus::Approved);
        assert!(!resolved.permissions.edit);
        let reason = resolved.reason.expect("override must carry a reason");
        assert!(!reason.is_empty());
    }

    #[test]
    fn approved_file_is_read_only_for_base_non_owner() {
        let resolved = resolve_permissions(UserRole::User, false, FileStatus::Approved);
        assert!(!resolved.permissions.edit);
        let reason = resolved.reason.expect("override must carry a reason");
        assert!(!reason.is_empty());
    }

    #[test]
    fn approved_file_does_not_demote_managers() {
        let resolved = resolve_permissions(UserRole::Manager, false, FileStatus::Approved);
        assert!(resolved.permissions.edit);
        assert!(resolved.reason.is_none());
    }
}
