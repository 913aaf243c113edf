//! Import configuration types.

use std::collections::BTreeMap;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::notice::Locale;

/// Configuration for importing a batch of files.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ImportConfig {
    /// Number of leading lines kept in a preview.
    #[builder(default = "50")]
    #[serde(default = "default_preview_lines")]
    pub preview_lines: usize,

    /// MIME prefix a file must carry to be accepted.
    #[builder(default = "\"text/\".to_string()")]
    #[serde(default = "default_accept_prefix")]
    pub accept_prefix: String,

    /// Prefix of the synthesized download name.
    #[builder(default = "\"arquivo_\".to_string()")]
    #[serde(default = "default_download_prefix")]
    pub download_prefix: String,

    /// Suffix of the synthesized download name.
    #[builder(default = "\".txt\".to_string()")]
    #[serde(default = "default_download_suffix")]
    pub download_suffix: String,

    /// MIME type the download blob is tagged with.
    #[builder(default = "\"text/plain\".to_string()")]
    #[serde(default = "default_download_mime")]
    pub download_mime: String,

    /// Largest file (in bytes) that will be decoded (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_file_size: Option<u64>,

    /// Extension to MIME type overrides, consulted before the built-in table.
    #[builder(default)]
    #[serde(default)]
    pub type_overrides: BTreeMap<String, String>,

    /// Language of user-visible notices.
    #[builder(default)]
    #[serde(default)]
    pub locale: Locale,
}

fn default_preview_lines() -> usize {
    50
}

fn default_accept_prefix() -> String {
    "text/".to_string()
}

fn default_download_prefix() -> String {
    "arquivo_".to_string()
}

fn default_download_suffix() -> String {
    ".txt".to_string()
}

fn default_download_mime() -> String {
    "text/plain".to_string()
}

impl ImportConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.preview_lines == Some(0) {
            return Err("Preview must keep at least one line".to_string());
        }
        if let Some(ref prefix) = self.accept_prefix {
            if prefix.is_empty() {
                return Err("Accepted MIME prefix cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl ImportConfig {
    /// Create a new import config builder.
    pub fn builder() -> ImportConfigBuilder {
        ImportConfigBuilder::default()
    }

    /// Check a config that was deserialized rather than built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.preview_lines == 0 {
            return Err(ConfigError::new("preview_lines must be greater than zero"));
        }
        if self.accept_prefix.is_empty() {
            return Err(ConfigError::new("accept_prefix cannot be empty"));
        }
        Ok(())
    }

    /// Whether a MIME type passes the accept filter.
    pub fn accepts(&self, mime: &str) -> bool {
        crate::mime::is_text_mime(mime, &self.accept_prefix)
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            preview_lines: default_preview_lines(),
            accept_prefix: default_accept_prefix(),
            download_prefix: default_download_prefix(),
            download_suffix: default_download_suffix(),
            download_mime: default_download_mime(),
            max_file_size: None,
            type_overrides: BTreeMap::new(),
            locale: Locale::default(),
        }
    }
}
