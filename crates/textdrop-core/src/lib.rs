//! Core types and traits for textdrop.
//!
//! This crate provides the data model shared by the rest of the workspace:
//! file handles and their per-file views, preview derivation, the in-memory
//! blob registry that backs downloads, batch notices and import configuration.

mod blob;
mod collection;
mod config;
mod error;
mod mime;
mod notice;
mod view;

pub use blob::{Blob, BlobStore, BlobUrl, DownloadHandle};
pub use collection::ViewCollection;
pub use config::{ImportConfig, ImportConfigBuilder};
pub use error::{ConfigError, DecodeError};
pub use mime::{DEFAULT_MIME, guess_mime, is_text_mime, mime_for};
pub use notice::{BatchNotice, Labels, Locale};
pub use view::{
    FileHandle, FileSource, FileView, ViewId, decode_text, download_name, format_kib, preview_of,
};
