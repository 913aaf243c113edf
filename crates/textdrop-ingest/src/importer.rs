//! Batch importer: type filtering and concurrent decoding.

use std::time::Duration;

use compact_str::CompactString;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::sync::broadcast;

use textdrop_core::{
    BatchNotice, BlobStore, DecodeError, FileHandle, FileSource, FileView, ImportConfig,
    decode_text, download_name,
};

use crate::progress::{ImportProgress, ProgressTracker};

/// A selected file that did not pass the type filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedFile {
    pub name: CompactString,
    pub mime: CompactString,
    pub size: u64,
}

impl From<FileHandle> for RejectedFile {
    fn from(handle: FileHandle) -> Self {
        Self {
            name: handle.name,
            mime: handle.mime,
            size: handle.size,
        }
    }
}

/// Everything one selection produced, collected after all decodes finished.
#[derive(Debug)]
pub struct BatchReport {
    /// Number of files in the selection.
    pub selected: usize,
    /// Decoded views, in completion order.
    pub views: Vec<FileView>,
    /// Files rejected by type, in selection order.
    pub rejected: Vec<RejectedFile>,
    /// Accepted files whose decode failed, in completion order.
    pub failed: Vec<DecodeError>,
    /// Message for the notice slot.
    pub notice: BatchNotice,
    /// Wall time from selection to the last outcome.
    pub elapsed: Duration,
}

impl BatchReport {
    /// Number of files that passed the type filter.
    pub fn accepted(&self) -> usize {
        self.views.len() + self.failed.len()
    }

    /// Total bytes across decoded views.
    pub fn decoded_bytes(&self) -> u64 {
        self.views.iter().map(|view| view.size).sum()
    }
}

/// Decodes selection batches into file views.
pub struct Importer {
    config: ImportConfig,
    store: BlobStore,
    progress_tx: broadcast::Sender<ImportProgress>,
}

impl Importer {
    /// Create an importer that registers downloads in `store`.
    pub fn new(config: ImportConfig, store: BlobStore) -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            config,
            store,
            progress_tx,
        }
    }

    /// Subscribe to import progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ImportProgress> {
        self.progress_tx.subscribe()
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn store(&self) -> &BlobStore {
        &self.store
    }

    /// Import one selection batch.
    ///
    /// Accepted files are decoded concurrently and joined before the notice
    /// is computed, so the report reflects every outcome of the batch.
    pub async fn import(&self, batch: Vec<FileHandle>) -> BatchReport {
        let selected = batch.len();
        let (accepted, rejected): (Vec<_>, Vec<_>) = batch
            .into_iter()
            .partition(|handle| self.config.accepts(&handle.mime));

        let rejected: Vec<RejectedFile> = rejected.into_iter().map(RejectedFile::from).collect();
        for file in &rejected {
            tracing::debug!(name = %file.name, mime = %file.mime, "ignoring non-text file");
        }

        let accepted_count = accepted.len();
        let mut tracker = ProgressTracker::new(selected, accepted_count, rejected.len());
        let _ = self.progress_tx.send(tracker.snapshot());

        let mut pending: FuturesUnordered<_> = accepted
            .into_iter()
            .map(|handle| self.materialize(handle))
            .collect();

        let mut views = Vec::with_capacity(accepted_count);
        let mut failed = Vec::new();

        while let Some(outcome) = pending.next().await {
            match outcome {
                Ok(view) => {
                    tracker.record_decoded(&view.name, view.size);
                    views.push(view);
                }
                Err(err) => {
                    tracing::warn!(file = err.name(), error = %err, "failed to read file");
                    tracker.record_failed(err.name());
                    failed.push(err);
                }
            }
            let _ = self.progress_tx.send(tracker.snapshot());
        }

        let failed_names = failed.iter().map(|err| err.name().to_string()).collect();
        let notice = BatchNotice::from_outcome(accepted_count, rejected.len(), failed_names);
        let elapsed = tracker.elapsed();

        tracing::info!(
            selected,
            decoded = views.len(),
            rejected = rejected.len(),
            failed = failed.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "batch imported"
        );

        BatchReport {
            selected,
            views,
            rejected,
            failed,
            notice,
            elapsed,
        }
    }

    /// Decode one accepted file and build its view and download blob.
    async fn materialize(&self, handle: FileHandle) -> Result<FileView, DecodeError> {
        let content = self.read_text(&handle).await?;
        let download = self
            .store
            .create(content.as_bytes(), &self.config.download_mime);
        let file_name = download_name(
            &handle.name,
            &self.config.download_prefix,
            &self.config.download_suffix,
        );

        Ok(FileView::new(
            &handle,
            content,
            self.config.preview_lines,
            download,
            file_name,
        ))
    }

    async fn read_text(&self, handle: &FileHandle) -> Result<String, DecodeError> {
        self.check_size(handle, handle.size)?;

        match &handle.source {
            FileSource::Disk(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|e| DecodeError::io(handle.name.clone(), e))?;
                // The file may have grown since it was selected.
                self.check_size(handle, bytes.len() as u64)?;
                Ok(decode_text(&bytes))
            }
            FileSource::Memory(bytes) => Ok(decode_text(bytes)),
        }
    }

    fn check_size(&self, handle: &FileHandle, size: u64) -> Result<(), DecodeError> {
        match self.config.max_file_size {
            Some(limit) if size > limit => Err(DecodeError::TooLarge {
                name: handle.name.clone(),
                size,
                limit,
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn importer() -> Importer {
        Importer::new(ImportConfig::default(), BlobStore::new())
    }

    #[tokio::test]
    async fn test_memory_files_decode() {
        let importer = importer();
        let report = importer
            .import(vec![FileHandle::in_memory("a.txt", "text/plain", b"hi".as_slice())])
            .await;

        assert_eq!(report.views.len(), 1);
        assert_eq!(report.views[0].content, "hi");
        assert!(report.notice.is_none());
        assert_eq!(importer.store().live_count(), 1);
    }

    #[tokio::test]
    async fn test_size_limit() {
        let config = ImportConfig::builder()
            .max_file_size(Some(4u64))
            .build()
            .unwrap();
        let importer = Importer::new(config, BlobStore::new());
        let report = importer
            .import(vec![FileHandle::in_memory(
                "big.txt",
                "text/plain",
                b"too many bytes".as_slice(),
            )])
            .await;

        assert!(report.views.is_empty());
        assert!(matches!(report.failed[0], DecodeError::TooLarge { limit: 4, .. }));
        assert_eq!(
            report.notice,
            BatchNotice::Unreadable {
                names: vec!["big.txt".to_string()]
            }
        );
    }

    #[tokio::test]
    async fn test_progress_is_broadcast() {
        let importer = importer();
        let mut rx = importer.subscribe();
        importer
            .import(vec![
                FileHandle::in_memory("a.txt", "text/plain", b"a".as_slice()),
                FileHandle::in_memory("b.png", "image/png", b"b".as_slice()),
            ])
            .await;

        let first = rx.recv().await.unwrap();
        assert_eq!(first.selected, 2);
        assert_eq!(first.accepted, 1);
        assert_eq!(first.rejected, 1);

        let last = rx.recv().await.unwrap();
        assert_eq!(last.decoded, 1);
        assert!(last.is_finished());
    }
}
