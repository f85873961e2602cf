//! Document content streaming for the external editor.

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt, SeekFrom};
use tokio_util::io::ReaderStream;
use tracing::debug;

use coedit_auth::{EditorClaims, TokenService};
use coedit_core::config::{app::ServerConfig, editor::EditorConfig, storage::StorageConfig};
use coedit_core::error::AppError;
use coedit_core::result::AppResult;
use coedit_database::repositories::{AuditLogRepository, FileRepository};
use coedit_entity::audit::NewAuditEntry;
use coedit_entity::file::File;

/// Outcome of parsing a `Range` request header against a known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    /// No usable range; serve the whole file with 200.
    Full,
    /// Serve `[start, end]` inclusive with 206.
    Partial { start: u64, end: u64 },
    /// The range cannot be satisfied; respond 416.
    Unsatisfiable,
}

/// Serves document content to the editor, enforcing token scope and
/// supporting single byte ranges.
#[derive(Clone)]
pub struct DocumentStreamer {
    files: Arc<FileRepository>,
    audit: Arc<AuditLogRepository>,
    tokens: TokenService,
    upload_root: PathBuf,
    stream_chunk_bytes: usize,
    allow_unauthenticated_local: bool,
    production: bool,
}

impl std::fmt::Debug for DocumentStreamer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStreamer")
            .field("upload_root", &self.upload_root)
            .finish()
    }
}

impl DocumentStreamer {
    /// Creates a new streamer.
    pub fn new(
        files: Arc<FileRepository>,
        audit: Arc<AuditLogRepository>,
        tokens: TokenService,
        storage: &StorageConfig,
        editor: &EditorConfig,
        server: &ServerConfig,
    ) -> Self {
        Self {
            files,
            audit,
            tokens,
            upload_root: PathBuf::from(&storage.upload_root),
            stream_chunk_bytes: storage.stream_chunk_bytes,
            allow_unauthenticated_local: editor.allow_unauthenticated_local,
            production: server.production,
        }
    }

    /// Authorizes a download request.
    ///
    /// With verification enabled, a missing token is accepted only from
    /// loopback or private addresses outside production. A present token
    /// must verify, must be scoped to the requested file, and must not
    /// carry an explicit download denial.
    pub fn authorize(
        &self,
        file_id: i64,
        token: Option<&str>,
        peer: IpAddr,
    ) -> AppResult<Option<EditorClaims>> {
        if !self.tokens.enabled() {
            return Ok(None);
        }

        let Some(token) = token else {
            if self.allow_unauthenticated_local && !self.production && is_local_or_private(peer) {
                debug!(%peer, file_id, "Tokenless download allowed for local caller");
                return Ok(None);
            }
            return Err(AppError::unauthorized("Download token required"));
        };

        let claims = self.tokens.verify(token)?;

        if claims.file_id != Some(file_id) {
            return Err(AppError::forbidden("Token is not valid for this document"));
        }
        if !claims.allows_download() {
            return Err(AppError::forbidden("Token does not permit download"));
        }

        Ok(Some(claims))
    }

    /// Loads the file row for a download, tenant-scoped when the token
    /// asserts a tenant.
    pub async fn resolve_file(
        &self,
        file_id: i64,
        claims: Option<&EditorClaims>,
    ) -> AppResult<File> {
        let found = match claims.and_then(|c| c.tenant_id) {
            Some(tenant_id) => self.files.find_in_tenant(file_id, tenant_id).await?,
            None => self.files.find_by_id(file_id).await?,
        };
        found.ok_or_else(|| AppError::not_found("File not found"))
    }

    /// Resolves the on-disk location of a file's live content.
    ///
    /// Probes, in order: the tenant-relative stored path, the tenant
    /// directory with just the basename (for rows whose stored path has
    /// gone stale), and finally the stored path taken literally.
    pub async fn resolve_path(&self, file: &File) -> AppResult<PathBuf> {
        let tenant_dir = self.upload_root.join(file.tenant_id.to_string());
        let candidates = [
            tenant_dir.join(&file.file_path),
            tenant_dir.join(file.basename()),
            PathBuf::from(&file.file_path),
        ];

        for candidate in candidates {
            if fs::try_exists(&candidate).await.unwrap_or(false) {
                return Ok(candidate);
            }
        }

        Err(AppError::not_found(format!(
            "Content for file {} not found on disk",
            file.id
        )))
    }

    /// The canonical live location for a file's content, used when
    /// writing content for a file that has none on disk yet.
    pub fn default_live_path(&self, file: &File) -> PathBuf {
        self.upload_root
            .join(file.tenant_id.to_string())
            .join(&file.file_path)
    }

    /// Opens a bounded chunked reader over `[start, start + length)` of
    /// the file at `path`. The body is never fully buffered.
    pub async fn open_reader(
        &self,
        path: &Path,
        start: u64,
        length: u64,
    ) -> AppResult<ReaderStream<tokio::io::Take<fs::File>>> {
        let mut file = fs::File::open(path).await?;
        if start > 0 {
            file.seek(SeekFrom::Start(start)).await?;
        }
        Ok(ReaderStream::with_capacity(
            file.take(length),
            self.stream_chunk_bytes,
        ))
    }

    /// Records the download in the audit log. Best-effort.
    pub async fn audit_download(
        &self,
        file: &File,
        claims: Option<&EditorClaims>,
        range: &RangeSpec,
    ) {
        let details = serde_json::json!({
            "file_name": file.name,
            "partial": matches!(range, RangeSpec::Partial { .. }),
        });
        self.audit
            .log_best_effort(&NewAuditEntry {
                tenant_id: file.tenant_id,
                user_id: claims.and_then(|c| c.user_id),
                action: "document_downloaded".to_string(),
                entity_type: "file".to_string(),
                entity_id: file.id,
                details: Some(details),
            })
            .await;
    }
}

/// Parses a `Range` header against the total size.
///
/// Only the single-range `bytes=start-end` form is understood, with the
/// end defaulting to `size - 1`. Anything out of bounds or inverted is
/// unsatisfiable; anything syntactically foreign is ignored and the whole
/// file is served.
pub fn parse_range(header: Option<&str>, size: u64) -> RangeSpec {
    let Some(header) = header else {
        return RangeSpec::Full;
    };
    let Some(spec) = header.trim().strip_prefix("bytes=") else {
        return RangeSpec::Full;
    };
    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeSpec::Full;
    };

    let Ok(start) = start_str.trim().parse::<u64>() else {
        return RangeSpec::Full;
    };

    let end = if end_str.trim().is_empty() {
        size.saturating_sub(1)
    } else {
        match end_str.trim().parse::<u64>() {
            Ok(end) => end,
            Err(_) => return RangeSpec::Full,
        }
    };

    if size == 0 || start >= size || end >= size || start > end {
        return RangeSpec::Unsatisfiable;
    }

    RangeSpec::Partial { start, end }
}

/// Whether an address is loopback or on a private network.
pub fn is_local_or_private(addr: IpAddr) -> bool {
    match addr {
        IpAddr::V4(v4) => v4.is_loopback() || v4.is_private() || v4.is_link_local(),
        IpAddr::V6(v6) => {
            v6.is_loopback()
                // fc00::/7 unique local
                || (v6.segments()[0] & 0xfe00) == 0xfc00
                // IPv4-mapped loopback/private
                || v6
                    .to_ipv4_mapped()
                    .map(|v4| v4.is_loopback() || v4.is_private())
                    .unwrap_or(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_hundred_bytes_of_a_thousand() {
        assert_eq!(
            parse_range(Some("bytes=0-99"), 1000),
            RangeSpec::Partial { start: 0, end: 99 }
        );
    }

    #[test]
    fn open_ended_range_runs_to_last_byte() {
        assert_eq!(
            parse_range(Some("bytes=900-"), 1000),
            RangeSpec::Partial {
                start: 900,
                end: 999
            }
        );
    }

    #[test]
    fn start_past_end_of_file_is_unsatisfiable() {
        assert_eq!(parse_range(Some("bytes=2000-"), 1000), RangeSpec::Unsatisfiable);
    }

    #[test]
    fn inverted_range_is_unsatisfiable() {
        assert_eq!(parse_range(Some("bytes=500-100"), 1000), RangeSpec::Unsatisfiable);
    }

    #[test]
    fn end_past_size_is_unsatisfiable() {
        assert_eq!(parse_range(Some("bytes=0-1000"), 1000), RangeSpec::Unsatisfiable);
    }

    #[test]
    fn empty_file_satisfies_no_range() {
        assert_eq!(parse_range(Some("bytes=0-0"), 0), RangeSpec::Unsatisfiable);
    }

    #[test]
    fn missing_or_foreign_headers_serve_full() {
        assert_eq!(parse_range(None, 1000), RangeSpec::Full);
        assert_eq!(parse_range(Some("items=0-5"), 1000), RangeSpec::Full);
        assert_eq!(parse_range(Some("bytes=abc-def"), 1000), RangeSpec::Full);
    }

    #[test]
    fn local_and_private_addresses() {
        assert!(is_local_or_private("127.0.0.1".parse().unwrap()));
        assert!(is_local_or_private("10.1.2.3".parse().unwrap()));
        assert!(is_local_or_private("192.168.0.10".parse().unwrap()));
        assert!(is_local_or_private("172.16.5.5".parse().unwrap()));
        assert!(is_local_or_private("::1".parse().unwrap()));
        assert!(!is_local_or_private("8.8.8.8".parse().unwrap()));
        assert!(!is_local_or_private("2001:4860:4860::8888".parse().unwrap()));
    }
}
