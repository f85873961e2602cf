//! Effective editor capability set.

use serde::{Deserialize, Serialize};

/// The capability flags exposed to the external editor for one
/// (user, file) pair. Computed per request, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EditorPermissions {
    /// May modify document content.
    pub edit: bool,
    /// May add comments.
    pub comment: bool,
    /// May review tracked changes.
    pub review: bool,
    /// May download the document.
    pub download: bool,
    /// May print the document.
    pub print: bool,
    /// May fill form fields.
    #[serde(rename = "fillForms")]
    pub fill_forms: bool,
    /// May modify content controls.
    #[serde(rename = "modifyContentControl")]
    pub modify_content_control: bool,
    /// May modify sheet filters.
    #[serde(rename = "modifyFilter")]
    pub modify_filter: bool,
}

impl EditorPermissions {
    /// The maximal capability set (admin and super-admin).
    pub fn full() -> Self {
        Self {
            edit: true,
            comment: true,
            review: true,
            download: true,
            print: true,
            fill_forms: true,
            modify_content_control: true,
            modify_filter: true,
        }
    }

    /// Comment/download/print only — the demoted base-user set.
    pub fn read_mostly() -> Self {
        Self {
            comment: true,
            download: true,
            print: true,
            ..Self::default()
        }
    }
}
