//! HTTP server configuration.

use serde::{Deserialize, Serialize};

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Externally reachable base URL of this service, used when building
    /// the download URL handed to the editor.
    #[serde(default = "default_public_url")]
    pub public_url: String,
    /// Whether the deployment is a production environment. Gates the
    /// tokenless local-network download fallback.
    #[serde(default)]
    pub production: bool,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_body")]
    pub max_body_size_bytes: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_public_url() -> String {
    "http://localhost:8090".to_string()
}

fn default_max_body() -> u64 {
    104_857_600 // 100 MB
}
