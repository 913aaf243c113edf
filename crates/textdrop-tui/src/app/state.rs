//! Application state types.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use textdrop_core::{ImportConfig, Locale};
use textdrop_export::{ConflictResolution, ExportError, SaveOutcome};
use textdrop_ingest::{BatchReport, ImportProgress};

use crate::theme::ThemeVariant;

/// Application mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    #[default]
    Normal,
    Help,
    /// Path prompt for adding files.
    Opening,
    Quit,
}

/// Messages sent from background tasks to the event loop.
#[derive(Debug)]
pub enum AppEvent {
    ImportProgress {
        batch: u64,
        progress: ImportProgress,
    },
    ImportComplete {
        batch: u64,
        report: BatchReport,
    },
    SaveComplete(Vec<(String, Result<SaveOutcome, ExportError>)>),
}

/// Transient message shown in the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub success: bool,
    pub text: String,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            success: true,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            success: false,
            text: text.into(),
        }
    }
}

/// Persistent user settings stored in config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Color theme.
    pub theme: ThemeVariant,
    /// Language of labels and notices.
    pub locale: Locale,
    /// Lines shown in a collapsed preview.
    pub preview_lines: usize,
    /// Where downloads are written (current directory when unset).
    pub output_dir: Option<PathBuf>,
    /// What to do when a download target exists.
    pub conflict: ConflictResolution,
    /// Largest file decoded, in bytes.
    pub max_file_size: Option<u64>,
    /// Extension to MIME type overrides.
    pub type_overrides: BTreeMap<String, String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme: ThemeVariant::default(),
            locale: Locale::default(),
            preview_lines: 50,
            output_dir: None,
            conflict: ConflictResolution::default(),
            max_file_size: None,
            type_overrides: BTreeMap::new(),
        }
    }
}

impl UserSettings {
    /// Get the config file path.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("textdrop").join("settings.toml"))
    }

    /// Load settings from disk, or return defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_toml(&content).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), error = %err, "ignoring malformed settings");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save settings to disk.
    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "No config directory")
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        std::fs::write(&path, content)
    }

    /// Import configuration derived from these settings.
    pub fn import_config(&self) -> color_eyre::Result<ImportConfig> {
        let config = ImportConfig::builder()
            .preview_lines(self.preview_lines)
            .max_file_size(self.max_file_size)
            .type_overrides(self.type_overrides.clone())
            .locale(self.locale)
            .build()?;
        Ok(config)
    }

    /// Directory downloads are written to.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings = UserSettings::from_toml(
            r#"
            theme = "light"
            locale = "en"
            conflict = "overwrite"

            [type_overrides]
            log = "text/plain"
            "#,
        )
        .unwrap();

        assert_eq!(settings.theme, ThemeVariant::Light);
        assert_eq!(settings.locale, Locale::En);
        assert_eq!(settings.conflict, ConflictResolution::Overwrite);
        assert_eq!(settings.preview_lines, 50);
        assert_eq!(settings.type_overrides["log"], "text/plain");
        assert_eq!(settings.output_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_settings_round_trip() {
        let settings = UserSettings {
            output_dir: Some(PathBuf::from("/tmp/out")),
            max_file_size: Some(1024),
            ..Default::default()
        };
        let text = toml::to_string_pretty(&settings).unwrap();
        assert_eq!(UserSettings::from_toml(&text).unwrap(), settings);
    }

    #[test]
    fn test_import_config_validation() {
        let config = UserSettings::default().import_config().unwrap();
        assert_eq!(config.preview_lines, 50);
        assert_eq!(config.locale, Locale::PtBr);

        let invalid = UserSettings {
            preview_lines: 0,
            ..Default::default()
        };
        assert!(invalid.import_config().is_err());
    }

    #[test]
    fn test_malformed_settings_error() {
        assert!(UserSettings::from_toml("preview_lines = \"many\"").is_err());
    }
}
