//! Wire payload types of the external editor's callback protocol.
//!
//! Field names and status codes are defined by the editor service and
//! must be preserved verbatim.

use serde::{Deserialize, Serialize};

/// Status codes reported by the external editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackStatus {
    /// 0 — no document with the given key was found.
    NotFound,
    /// 1 — the document is being edited.
    Editing,
    /// 2 — the document is ready for saving.
    ReadyForSaving,
    /// 3 — the editor reported a save error.
    SaveError,
    /// 4 — the document was closed with no changes.
    ClosedNoChanges,
    /// 6 — autosave/forcesave while the document is still open.
    ForceSave,
    /// 7 — the editor reported a force-save error.
    ForceSaveError,
    /// Any code not listed above.
    Unrecognized(i32),
}

impl CallbackStatus {
    /// Map a raw protocol code to a status variant.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::NotFound,
            1 => Self::Editing,
            2 => Self::ReadyForSaving,
            3 => Self::SaveError,
            4 => Self::ClosedNoChanges,
            6 => Self::ForceSave,
            7 => Self::ForceSaveError,
            other => Self::Unrecognized(other),
        }
    }

    /// The raw protocol code.
    pub fn code(self) -> i32 {
        match self {
            Self::NotFound => 0,
            Self::Editing => 1,
            Self::ReadyForSaving => 2,
            Self::SaveError => 3,
            Self::ClosedNoChanges => 4,
            Self::ForceSave => 6,
            Self::ForceSaveError => 7,
            Self::Unrecognized(code) => code,
        }
    }
}

/// An entry of the callback's `actions` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackAction {
    /// Action type code: 0 = disconnected, 1 = connected,
    /// 2 = forcesave requested.
    #[serde(rename = "type")]
    pub action_type: i32,
    /// The user the action refers to.
    #[serde(rename = "userid")]
    pub user_id: String,
}

/// The callback request body posted by the external editor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallbackPayload {
    /// The editor's document key.
    #[serde(default)]
    pub key: String,
    /// Raw status code.
    #[serde(default)]
    pub status: i32,
    /// Identifiers of the users currently in the document.
    #[serde(default)]
    pub users: Vec<String>,
    /// Download URL of the saved content (statuses 2 and 6).
    #[serde(default)]
    pub url: Option<String>,
    /// Download URL of the change history data.
    #[serde(default)]
    pub changesurl: Option<String>,
    /// Change history metadata.
    #[serde(default)]
    pub history: Option<serde_json::Value>,
    /// User connect/disconnect/forcesave actions.
    #[serde(default)]
    pub actions: Vec<CallbackAction>,
    /// Force-save trigger type (statuses 6 and 7).
    #[serde(default)]
    pub forcesavetype: Option<i32>,
}

impl CallbackPayload {
    /// The decoded status variant.
    pub fn status(&self) -> CallbackStatus {
        CallbackStatus::from_code(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_round_trip() {
        for code in [0, 1, 2, 3, 4, 6, 7, 5, 99] {
            assert_eq!(CallbackStatus::from_code(code).code(), code);
        }
    }

    #[test]
    fn unknown_codes_are_unrecognized() {
        assert_eq!(
            CallbackStatus::from_code(5),
            CallbackStatus::Unrecognized(5)
        );
    }

    #[test]
    fn payload_deserializes_with_missing_fields() {
        let payload: CallbackPayload =
            serde_json::from_str(r#"{"key":"abc123","status":1}"#).unwrap();
        assert_eq!(payload.key, "abc123");
        assert_eq!(payload.status(), CallbackStatus::Editing);
        assert!(payload.url.is_none());
        assert!(payload.actions.is_empty());
    }

    #[test]
    fn payload_deserializes_actions() {
        let payload: CallbackPayload = serde_json::from_str(
            r#"{"key":"k","status":2,"url":"http://editor/doc","actions":[{"type":0,"userid":"42"}]}"#,
        )
        .unwrap();
        assert_eq!(payload.actions.len(), 1);
        assert_eq!(payload.actions[0].action_type, 0);
        assert_eq!(payload.actions[0].user_id, "42");
    }
}
