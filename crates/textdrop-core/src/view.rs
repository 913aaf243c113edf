//! File handles and per-file view records.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::blob::DownloadHandle;

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identifier of a [`FileView`], independent of its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewId(pub u64);

impl ViewId {
    /// Create a ViewId from a raw value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Allocate a process-unique id.
    pub fn next() -> Self {
        Self(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Where a selected file's bytes come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// A file on disk, read when the batch is decoded.
    Disk(PathBuf),
    /// Bytes already in memory.
    Memory(Arc<[u8]>),
}

/// One entry of a selection, as reported by the picker.
#[derive(Debug, Clone)]
pub struct FileHandle {
    /// Original file name (no directory components).
    pub name: CompactString,
    /// Size in bytes.
    pub size: u64,
    /// Reported MIME type.
    pub mime: CompactString,
    /// Backing bytes.
    pub source: FileSource,
}

impl FileHandle {
    /// Handle for a file on disk.
    pub fn on_disk(
        name: impl Into<CompactString>,
        size: u64,
        mime: impl Into<CompactString>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            mime: mime.into(),
            source: FileSource::Disk(path.into()),
        }
    }

    /// Handle for bytes already in memory; the size is taken from the bytes.
    pub fn in_memory(
        name: impl Into<CompactString>,
        mime: impl Into<CompactString>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            mime: mime.into(),
            source: FileSource::Memory(bytes),
        }
    }

    /// Whether the reported type starts with `prefix`.
    pub fn is_text(&self, prefix: &str) -> bool {
        crate::mime::is_text_mime(&self.mime, prefix)
    }
}

/// Presentation record for one decoded file.
///
/// Everything except `expanded` is fixed once the view is built.
#[derive(Debug, Clone, Serialize)]
pub struct FileView {
    pub id: ViewId,
    pub name: CompactString,
    pub size: u64,
    pub mime: CompactString,
    pub content: String,
    pub preview: String,
    pub download: DownloadHandle,
    pub download_name: String,
    pub expanded: bool,
}

impl FileView {
    /// Build a collapsed view with a freshly allocated id.
    pub fn new(
        handle: &FileHandle,
        content: String,
        preview_lines: usize,
        download: DownloadHandle,
        download_name: String,
    ) -> Self {
        let preview = preview_of(&content, preview_lines);
        Self {
            id: ViewId::next(),
            name: handle.name.clone(),
            size: handle.size,
            mime: handle.mime.clone(),
            content,
            preview,
            download,
            download_name,
            expanded: false,
        }
    }

    /// Whether the preview hides part of the content.
    pub fn is_truncated(&self) -> bool {
        self.preview.len() != self.content.len()
    }

    /// Text currently shown for this view.
    pub fn visible_text(&self) -> &str {
        if self.expanded {
            &self.content
        } else {
            &self.preview
        }
    }

    /// Flip the expanded flag, returning the new value.
    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    /// Size for display, in kibibytes.
    pub fn display_size(&self) -> String {
        format_kib(self.size)
    }
}

/// The first `lines` newline-delimited lines of `content`, rejoined with `\n`.
///
/// Content with `lines` or fewer lines comes back unchanged.
pub fn preview_of(content: &str, lines: usize) -> String {
    match content.match_indices('\n').nth(lines.saturating_sub(1)) {
        Some((cut, _)) if lines > 0 => content[..cut].to_string(),
        Some(_) => String::new(),
        None if lines == 0 => String::new(),
        None => content.to_string(),
    }
}

/// Download file name for an original name: `<prefix><name><suffix>`.
///
/// The original extension stays inside the new name (`report.csv` becomes
/// `arquivo_report.csv.txt`).
pub fn download_name(name: &str, prefix: &str, suffix: &str) -> String {
    format!("{prefix}{name}{suffix}")
}

/// Format a byte count as kibibytes with two decimals, e.g. `1.50 KB`.
pub fn format_kib(size: u64) -> String {
    format!("{:.2} KB", size as f64 / 1024.0)
}

/// Best-effort UTF-8 decode.
///
/// A leading byte-order mark is dropped and invalid sequences become
/// U+FFFD, matching what a browser text reader produces.
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::BlobStore;

    fn numbered(count: usize) -> String {
        (1..=count).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn test_preview_short_content_is_identity() {
        let content = numbered(10);
        assert_eq!(preview_of(&content, 50), content);
        assert_eq!(preview_of("", 50), "");
        assert_eq!(preview_of("one line", 50), "one line");
    }

    #[test]
    fn test_preview_truncates_long_content() {
        let content = numbered(120);
        let preview = preview_of(&content, 50);
        assert_eq!(preview, numbered(50));
        assert_eq!(preview.lines().count(), 50);
    }

    #[test]
    fn test_preview_exactly_at_limit() {
        let content = numbered(50);
        assert_eq!(preview_of(&content, 50), content);

        // 50 lines plus a trailing newline: the empty 51st piece is dropped.
        let trailing = format!("{content}\n");
        assert_eq!(preview_of(&trailing, 50), content);
    }

    #[test]
    fn test_preview_matches_split_take_join() {
        for content in ["a\n\nb\n", "\n\n\n", "x\r\ny\r\nz", "solo"] {
            for lines in 1..5 {
                let expected = content.split('\n').take(lines).collect::<Vec<_>>().join("\n");
                assert_eq!(preview_of(content, lines), expected, "{content:?} / {lines}");
            }
        }
    }

    #[test]
    fn test_download_name_keeps_extension() {
        assert_eq!(download_name("report.csv", "arquivo_", ".txt"), "arquivo_report.csv.txt");
        assert_eq!(download_name("notes", "arquivo_", ".txt"), "arquivo_notes.txt");
    }

    #[test]
    fn test_format_kib() {
        assert_eq!(format_kib(0), "0.00 KB");
        assert_eq!(format_kib(1536), "1.50 KB");
        assert_eq!(format_kib(100), "0.10 KB");
    }

    #[test]
    fn test_decode_text() {
        assert_eq!(decode_text(b"\xEF\xBB\xBFhello"), "hello");
        assert_eq!(decode_text("olá".as_bytes()), "olá");
        assert_eq!(decode_text(b"bad \xFF byte"), "bad \u{FFFD} byte");
    }

    #[test]
    fn test_view_toggle_and_visible_text() {
        let store = BlobStore::new();
        let content = numbered(60);
        let handle = FileHandle::in_memory("long.txt", "text/plain", content.as_bytes());
        let download = store.create(content.as_bytes(), "text/plain");
        let mut view = FileView::new(&handle, content.clone(), 50, download, "arquivo_long.txt.txt".into());

        assert!(!view.expanded);
        assert!(view.is_truncated());
        assert_eq!(view.visible_text(), numbered(50));

        assert!(view.toggle());
        assert_eq!(view.visible_text(), content);
        assert!(!view.toggle());
    }

    #[test]
    fn test_view_ids_are_unique() {
        assert_ne!(ViewId::next(), ViewId::next());
    }
}
