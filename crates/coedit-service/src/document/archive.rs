//! Copy-before-overwrite version archiving.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tokio::fs;
use tracing::{info, warn};

use coedit_core::config::storage::VERSIONS_DIR;
use coedit_core::error::{AppError, ErrorKind};
use coedit_core::result::AppResult;
use coedit_database::repositories::FileVersionRepository;
use coedit_entity::file::{File, FileVersion, NewFileVersion};

/// Archives the current live content of a file as an immutable version
/// snapshot before the live file is overwritten.
#[derive(Clone)]
pub struct VersionArchiver {
    upload_root: PathBuf,
    versions: Arc<FileVersionRepository>,
}

impl std::fmt::Debug for VersionArchiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionArchiver")
            .field("upload_root", &self.upload_root)
            .finish()
    }
}

impl VersionArchiver {
    /// Creates a new archiver rooted at the upload directory.
    pub fn new(upload_root: impl Into<PathBuf>, versions: Arc<FileVersionRepository>) -> Self {
        Self {
            upload_root: upload_root.into(),
            versions,
        }
    }

    /// Snapshots the live file and records the version row.
    ///
    /// The copy is flushed to disk before this returns, so the snapshot
    /// survives even if the subsequent live overwrite is interrupted. A
    /// missing live file is logged and skipped: there is nothing to
    /// preserve for a first-ever save.
    pub async fn archive(
        &self,
        file: &File,
        live_path: &Path,
        created_by: i64,
        changes_description: Option<serde_json::Value>,
    ) -> AppResult<Option<FileVersion>> {
        if !fs::try_exists(live_path).await.unwrap_or(false) {
            warn!(
                file_id = file.id,
                path = %live_path.display(),
                "Live file missing, skipping version snapshot"
            );
            return Ok(None);
        }

        let relative = snapshot_relative_path(file, &Utc::now().format("%Y%m%d%H%M%S").to_string());
        let destination = self.upload_root.join(&relative);

        copy_durably(live_path, &destination).await?;

        let size_bytes = fs::metadata(&destination)
            .await
            .map(|m| m.len() as i64)
            .unwrap_or(file.file_size);

        let version = self
            .versions
            .create(&NewFileVersion {
                file_id: file.id,
                version_number: file.version,
                size_bytes,
                storage_path: relative.clone(),
                created_by,
                changes_description,
            })
            .await?;

        info!(
            file_id = file.id,
            version = file.version,
            path = %relative,
            "Archived file version"
        );
        Ok(Some(version))
    }
}

/// Builds the snapshot path relative to the upload root:
/// `{tenant_id}/versions/{stem}_v{n}_{timestamp}_{basename}`.
///
/// Embedding both the stem and the full basename keeps the name
/// collision-free across files while the trailing basename preserves the
/// original extension for direct download.
fn snapshot_relative_path(file: &File, timestamp: &str) -> String {
    let basename = file.basename();
    let stem = basename.rsplit_once('.').map(|(s, _)| s).unwrap_or(basename);
    format!(
        "{}/{}/{}_v{}_{}_{}",
        file.tenant_id, VERSIONS_DIR, stem, file.version, timestamp, basename
    )
}

/// Copies `from` to `to`, creating parent directories and fsyncing the
/// destination before returning.
async fn copy_durably(from: &Path, to: &Path) -> AppResult<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create versions directory: {}", parent.display()),
                e,
            )
        })?;
    }

    fs::copy(from, to).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to copy snapshot to {}", to.display()),
            e,
        )
    })?;

    let snapshot = fs::File::open(to).await.map_err(|e| {
        AppError::with_source(ErrorKind::Storage, "Failed to reopen snapshot", e)
    })?;
    snapshot.sync_all().await.map_err(|e| {
        AppError::with_source(ErrorKind::Storage, "Failed to sync snapshot to disk", e)
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use coedit_entity::file::FileStatus;

    fn sample_file(path: &str, version: i32) -> File {
        File {
            id: 10,
            tenant_id: 3,
            name: "report.docx".into(),
            file_path: path.into(),
            file_size: 1024,
            status: FileStatus::Draft,
            owner_id: 1,
            version,
            last_edited_by: None,
            last_edited_at: None,
            deleted_at: None,
        }
    }

    #[test]
    fn snapshot_path_embeds_tenant_version_and_name() {
        let file = sample_file("docs/report.docx", 4);
        let path = snapshot_relative_path(&file, "20260825120000");
        assert_eq!(path, "3/versions/report_v4_20260825120000_report.docx");
    }

    #[test]
    fn snapshot_path_handles_names_without_extension() {
        let file = sample_file("notes", 1);
        let path = snapshot_relative_path(&file, "20260825120000");
        assert_eq!(path, "3/versions/notes_v1_20260825120000_notes");
    }

    #[tokio::test]
    async fn copy_durably_creates_parents_and_preserves_content() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("live.docx");
        let dst = dir.path().join("3/versions/live_v1_x_live.docx");
        tokio::fs::write(&src, b"document body").await.unwrap();

        copy_durably(&src, &dst).await.unwrap();

        let copied = tokio::fs::read(&dst).await.unwrap();
        assert_eq!(copied, b"document body");
        // Source stays intact.
        assert!(tokio::fs::try_exists(&src).await.unwrap());
    }
}
