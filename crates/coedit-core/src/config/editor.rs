//! Document editor integration configuration.

use serde::{Deserialize, Serialize};

/// Settings for the external document editor integration: token signing,
/// session idle handling, and callback content fetching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Secret key for editor token signing (HMAC-SHA256).
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
    /// Whether editor tokens are issued and verified at all. When disabled,
    /// issuance returns an empty string and verification trivially succeeds
    /// with an empty claim set.
    #[serde(default = "default_true")]
    pub token_enabled: bool,
    /// Token time-to-live in seconds.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: u64,
    /// Idle window in seconds after which an editor session with no
    /// heartbeat is considered abandoned.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Timeout in seconds for fetching saved document content from the
    /// editor's download URL.
    #[serde(default = "default_fetch_timeout")]
    pub content_fetch_timeout_seconds: u64,
    /// Allow tokenless document downloads from loopback/private addresses.
    /// Debug convenience only; ignored when `server.production` is set.
    #[serde(default = "default_true")]
    pub allow_unauthenticated_local: bool,
}

fn default_token_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_token_ttl() -> u64 {
    3600
}

fn default_idle_timeout() -> u64 {
    1800
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}
