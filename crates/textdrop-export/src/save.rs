//! Writing download blobs to disk.

use std::path::{Path, PathBuf};

use thiserror::Error;

use textdrop_core::{BlobStore, BlobUrl, FileView, ViewId};

use crate::conflict::{ConflictResolution, auto_rename_path};

/// Errors that can occur while saving a download.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The view's blob is no longer live.
    #[error("Download was revoked: {url}")]
    Revoked { url: BlobUrl },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result of saving one download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Bytes were written to `path`.
    Saved { path: PathBuf, bytes: u64 },
    /// A file already existed at `path` and was left alone.
    Skipped { path: PathBuf },
}

impl SaveOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Saved { path, .. } | Self::Skipped { path } => path,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// Save the download blob of `view` into `dir` under its synthesized name.
///
/// The written bytes are exactly the blob registered for the view, which is
/// the view's decoded content.
pub async fn save_download(
    view: &FileView,
    store: &BlobStore,
    dir: &Path,
    resolution: ConflictResolution,
) -> Result<SaveOutcome, ExportError> {
    let url = view.download.url();
    let blob = store
        .fetch(url)
        .ok_or_else(|| ExportError::Revoked { url: url.clone() })?;

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| ExportError::io(dir, e))?;

    let target = dir.join(sanitize_file_name(&view.download_name));
    let exists = tokio::fs::try_exists(&target)
        .await
        .map_err(|e| ExportError::io(&target, e))?;

    let target = match (exists, resolution) {
        (true, ConflictResolution::Skip) => {
            tracing::debug!(path = %target.display(), "download exists, skipping");
            return Ok(SaveOutcome::Skipped { path: target });
        }
        (true, ConflictResolution::AutoRename) => auto_rename_path(&target),
        _ => target,
    };

    tokio::fs::write(&target, &blob.bytes)
        .await
        .map_err(|e| ExportError::io(&target, e))?;

    tracing::info!(file = %view.name, path = %target.display(), bytes = blob.len(), "download saved");
    Ok(SaveOutcome::Saved {
        path: target,
        bytes: blob.len() as u64,
    })
}

/// Save every view in order, collecting per-view outcomes.
///
/// Saves run one after another so auto-renaming sees earlier writes.
pub async fn save_all<'a>(
    views: impl IntoIterator<Item = &'a FileView>,
    store: &BlobStore,
    dir: &Path,
    resolution: ConflictResolution,
) -> Vec<(ViewId, Result<SaveOutcome, ExportError>)> {
    let mut outcomes = Vec::new();
    for view in views {
        let outcome = save_download(view, store, dir, resolution).await;
        if let Err(err) = &outcome {
            tracing::warn!(file = %view.name, error = %err, "failed to save download");
        }
        outcomes.push((view.id, outcome));
    }
    outcomes
}

/// Replace characters that cannot appear in a single path component.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    match cleaned.as_str() {
        "" | "." | ".." => "download.txt".to_string(),
        _ => cleaned,
    }
}
