//! Background import and save tasks.

use std::path::PathBuf;

use tokio::sync::{broadcast, mpsc};

use textdrop_core::{BlobStore, FileHandle, FileView, ImportConfig};
use textdrop_export::{ConflictResolution, save_all};
use textdrop_ingest::Importer;

use super::state::AppEvent;

/// Decode a selection batch in the background.
///
/// Each batch gets its own importer so progress updates of overlapping
/// batches stay apart. Downloads land in the shared `store`.
pub fn start_import(
    batch_id: u64,
    batch: Vec<FileHandle>,
    config: ImportConfig,
    store: BlobStore,
    tx: mpsc::Sender<AppEvent>,
) {
    tokio::spawn(async move {
        let importer = Importer::new(config, store);
        let mut progress_rx = importer.subscribe();

        // Forward progress updates until the batch completes
        let tx_progress = tx.clone();
        let progress_task = tokio::spawn(async move {
            loop {
                match progress_rx.recv().await {
                    Ok(progress) => {
                        let event = AppEvent::ImportProgress {
                            batch: batch_id,
                            progress,
                        };
                        if tx_progress.send(event).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        let report = importer.import(batch).await;

        progress_task.abort();
        let _ = tx
            .send(AppEvent::ImportComplete {
                batch: batch_id,
                report,
            })
            .await;
    });
}

/// Write downloads to `dir` in the background.
pub fn start_save(
    views: Vec<FileView>,
    store: BlobStore,
    dir: PathBuf,
    resolution: ConflictResolution,
    tx: mpsc::Sender<AppEvent>,
) {
    tokio::spawn(async move {
        let outcomes = save_all(&views, &store, &dir, resolution).await;
        let named = views
            .iter()
            .zip(outcomes)
            .map(|(view, (_, outcome))| (view.name.to_string(), outcome))
            .collect();
        let _ = tx.send(AppEvent::SaveComplete(named)).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use textdrop_ingest::select_paths;

    #[tokio::test]
    async fn test_import_sends_progress_then_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "alpha").unwrap();

        let config = ImportConfig::default();
        let batch = select_paths([&path], &config).unwrap();
        let (tx, mut rx) = mpsc::channel(16);
        start_import(7, batch, config, BlobStore::new(), tx);

        loop {
            match rx.recv().await.unwrap() {
                AppEvent::ImportProgress { batch, .. } => assert_eq!(batch, 7),
                AppEvent::ImportComplete { batch, report } => {
                    assert_eq!(batch, 7);
                    assert_eq!(report.views.len(), 1);
                    break;
                }
                AppEvent::SaveComplete(_) => panic!("unexpected save event"),
            }
        }
    }
}
