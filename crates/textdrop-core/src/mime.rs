//! MIME type classification by file name.

use std::collections::BTreeMap;

use compact_str::CompactString;

/// Type reported for files whose extension is unknown.
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// Guess a MIME type from a file name's extension.
///
/// Mirrors what desktop file pickers report: the extension alone decides,
/// matching is case-insensitive, and anything unrecognized is reported as
/// [`DEFAULT_MIME`].
pub fn guess_mime(name: &str) -> &'static str {
    let Some(ext) = extension_of(name) else {
        return DEFAULT_MIME;
    };

    match ext.as_str() {
        // Plain text and markup
        "txt" | "text" | "log" | "conf" | "cfg" | "ini" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "tsv" => "text/tab-separated-values",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "xml" => "text/xml",
        "rtf" => "text/rtf",
        "vtt" => "text/vtt",
        "ics" => "text/calendar",

        // Source code commonly reported as text
        "js" | "mjs" => "text/javascript",
        "rs" => "text/x-rust",
        "py" => "text/x-python",
        "c" | "h" => "text/x-c",
        "cpp" | "hpp" | "cc" => "text/x-c++",
        "java" => "text/x-java",
        "sh" => "text/x-sh",
        "yaml" | "yml" => "text/yaml",
        "toml" => "text/x-toml",

        // Structured data
        "json" => "application/json",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "tar" => "application/x-tar",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",

        // Media
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "mp4" => "video/mp4",
        "webm" => "video/webm",

        _ => DEFAULT_MIME,
    }
}

/// Resolve a MIME type, consulting `overrides` (keyed by lowercase extension) first.
pub fn mime_for(name: &str, overrides: &BTreeMap<String, String>) -> CompactString {
    extension_of(name)
        .and_then(|ext| overrides.get(&ext))
        .map(|mime| CompactString::from(mime.as_str()))
        .unwrap_or_else(|| CompactString::from(guess_mime(name)))
}

/// Whether `mime` begins with the accepted category prefix (e.g. `text/`).
pub fn is_text_mime(mime: &str, prefix: &str) -> bool {
    mime.starts_with(prefix)
}

fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    // ".bashrc" has no extension, only a leading dot
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_text_types() {
        assert_eq!(guess_mime("notes.txt"), "text/plain");
        assert_eq!(guess_mime("README.md"), "text/markdown");
        assert_eq!(guess_mime("report.csv"), "text/csv");
        assert_eq!(guess_mime("main.rs"), "text/x-rust");
    }

    #[test]
    fn test_guess_is_case_insensitive() {
        assert_eq!(guess_mime("SHOUT.TXT"), "text/plain");
        assert_eq!(guess_mime("photo.JPG"), "image/jpeg");
    }

    #[test]
    fn test_guess_non_text_types() {
        assert_eq!(guess_mime("photo.png"), "image/png");
        assert_eq!(guess_mime("data.json"), "application/json");
        assert_eq!(guess_mime("archive.tar.gz"), "application/gzip");
    }

    #[test]
    fn test_unknown_and_missing_extensions() {
        assert_eq!(guess_mime("Makefile"), DEFAULT_MIME);
        assert_eq!(guess_mime(".bashrc"), DEFAULT_MIME);
        assert_eq!(guess_mime("trailing."), DEFAULT_MIME);
        assert_eq!(guess_mime("blob.xyz"), DEFAULT_MIME);
    }

    #[test]
    fn test_overrides_win() {
        let mut overrides = BTreeMap::new();
        overrides.insert("json".to_string(), "text/json".to_string());
        overrides.insert("nfo".to_string(), "text/plain".to_string());

        assert_eq!(mime_for("data.JSON", &overrides), "text/json");
        assert_eq!(mime_for("release.nfo", &overrides), "text/plain");
        assert_eq!(mime_for("photo.png", &overrides), "image/png");
    }

    #[test]
    fn test_is_text_mime() {
        assert!(is_text_mime("text/plain", "text/"));
        assert!(!is_text_mime("image/png", "text/"));
        assert!(!is_text_mime("", "text/"));
    }
}
