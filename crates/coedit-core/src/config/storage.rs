//! File storage configuration.

use serde::{Deserialize, Serialize};

/// Storage layout configuration.
///
/// Live documents are stored under `{upload_root}/{tenant_id}/...` and
/// version snapshots under `{upload_root}/{tenant_id}/versions/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory of the tenant-partitioned upload tree.
    #[serde(default = "default_upload_root")]
    pub upload_root: String,
    /// Chunk size in bytes used when streaming file content.
    #[serde(default = "default_stream_chunk")]
    pub stream_chunk_bytes: usize,
}

/// Name of the per-tenant directory holding version snapshots.
pub const VERSIONS_DIR: &str = "versions";

fn default_upload_root() -> String {
    "./data/uploads".to_string()
}

fn default_stream_chunk() -> usize {
    65_536 // 64 KB
}
