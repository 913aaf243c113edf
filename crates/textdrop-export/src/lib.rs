//! Download persistence for textdrop.
//!
//! Each decoded file carries a blob handle; this crate writes that blob to
//! disk as `arquivo_<name>.txt`, resolving name conflicts the way a browser
//! download manager does.

mod conflict;
mod save;

pub use conflict::{ConflictResolution, auto_rename_path};
pub use save::{ExportError, SaveOutcome, sanitize_file_name, save_all, save_download};
