//! Turning user-provided paths into a selection batch.

use std::path::{Path, PathBuf};

use thiserror::Error;

use textdrop_core::{FileHandle, ImportConfig, mime_for};

/// Errors that invalidate a whole selection.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// Path not found.
    #[error("Path does not exist: {path}")]
    NotFound { path: PathBuf },

    /// Path is a directory or other non-regular file.
    #[error("Not a regular file: {path}")]
    NotAFile { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SelectionError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Build a selection batch from paths, in the order given.
///
/// Every path must name an existing regular file; the MIME type is assigned
/// from the file name the way a desktop picker reports it.
pub fn select_paths<I, P>(paths: I, config: &ImportConfig) -> Result<Vec<FileHandle>, SelectionError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths
        .into_iter()
        .map(|path| handle_for_path(path.as_ref(), config))
        .collect()
}

/// Build the handle for a single path.
pub fn handle_for_path(path: &Path, config: &ImportConfig) -> Result<FileHandle, SelectionError> {
    let metadata = std::fs::metadata(path).map_err(|e| SelectionError::io(path, e))?;
    if !metadata.is_file() {
        return Err(SelectionError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    let mime = mime_for(&name, &config.type_overrides);

    Ok(FileHandle::on_disk(name, metadata.len(), mime, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_empty_selection() {
        let handles = select_paths(Vec::<PathBuf>::new(), &ImportConfig::default()).unwrap();
        assert!(handles.is_empty());
    }

    #[test]
    fn test_handles_carry_name_size_and_type() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("notes.txt");
        let image = dir.path().join("photo.png");
        fs::write(&text, "hello").unwrap();
        fs::write(&image, [0x89, b'P', b'N', b'G']).unwrap();

        let handles = select_paths([&text, &image], &ImportConfig::default()).unwrap();
        assert_eq!(handles.len(), 2);
        assert_eq!(handles[0].name, "notes.txt");
        assert_eq!(handles[0].size, 5);
        assert_eq!(handles[0].mime, "text/plain");
        assert_eq!(handles[1].mime, "image/png");
    }

    #[test]
    fn test_missing_path_fails_selection() {
        let err = select_paths(["/nonexistent/path/xyz.txt"], &ImportConfig::default()).unwrap_err();
        assert!(matches!(err, SelectionError::NotFound { .. }));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = select_paths([dir.path()], &ImportConfig::default()).unwrap_err();
        assert!(matches!(err, SelectionError::NotAFile { .. }));
    }

    #[test]
    fn test_type_overrides_apply() {
        let dir = tempfile::tempdir().unwrap();
        let nfo = dir.path().join("release.nfo");
        fs::write(&nfo, "info").unwrap();

        let mut config = ImportConfig::default();
        config.type_overrides.insert("nfo".into(), "text/plain".into());

        let handles = select_paths([&nfo], &config).unwrap();
        assert_eq!(handles[0].mime, "text/plain");
    }
}
