//! Selection and decoding engine for textdrop.
//!
//! This crate turns a user's file selection into decoded file views.
//!
//! # Overview
//!
//! `textdrop-ingest` is responsible for everything between "the user picked
//! some files" and "the cards are ready to render":
//!
//! - **Selection** builds [`FileHandle`]s from paths, with picker-style MIME types
//! - **Filtering** keeps only files whose type starts with `text/`
//! - **Concurrent decoding** of every accepted file, joined per batch
//! - **Progress updates** via broadcast channels
//!
//! # Example
//!
//! ```rust,no_run
//! use textdrop_ingest::{BlobStore, ImportConfig, Importer, select_paths};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ImportConfig::default();
//! let batch = select_paths(["notes.txt", "photo.png"], &config)?;
//! let importer = Importer::new(config, BlobStore::new());
//! let report = importer.import(batch).await;
//!
//! println!("{} views", report.views.len());
//! println!("{}", report.notice.message(importer.config().locale));
//! # Ok(())
//! # }
//! ```

mod importer;
mod progress;
mod select;

pub use importer::{BatchReport, Importer, RejectedFile};
pub use progress::ImportProgress;
pub use select::{SelectionError, handle_for_path, select_paths};

// Re-export core types for convenience
pub use textdrop_core::{
    BatchNotice, BlobStore, DecodeError, FileHandle, FileSource, FileView, ImportConfig, Locale,
    ViewCollection, ViewId,
};
