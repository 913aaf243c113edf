//! Error types for decoding and configuration.

use compact_str::CompactString;
use thiserror::Error;

/// Errors that can occur while decoding a selected file.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Permission denied for the file.
    #[error("Permission denied: {name}")]
    PermissionDenied { name: CompactString },

    /// File disappeared between selection and decode.
    #[error("File not found: {name}")]
    NotFound { name: CompactString },

    /// File exceeds the configured size limit.
    #[error("File too large: {name} ({size} bytes, limit {limit})")]
    TooLarge {
        name: CompactString,
        size: u64,
        limit: u64,
    },

    /// Generic I/O error.
    #[error("I/O error reading {name}: {source}")]
    Io {
        name: CompactString,
        #[source]
        source: std::io::Error,
    },
}

impl DecodeError {
    /// Create an I/O error with file name context.
    pub fn io(name: impl Into<CompactString>, source: std::io::Error) -> Self {
        let name = name.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { name },
            std::io::ErrorKind::NotFound => Self::NotFound { name },
            _ => Self::Io { name, source },
        }
    }

    /// Name of the file that failed.
    pub fn name(&self) -> &str {
        match self {
            Self::PermissionDenied { name }
            | Self::NotFound { name }
            | Self::TooLarge { name, .. }
            | Self::Io { name, .. } => name,
        }
    }
}

/// Invalid import configuration.
#[derive(Debug, Clone, Error)]
#[error("Invalid configuration: {message}")]
pub struct ConfigError {
    pub message: String,
}

impl ConfigError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_io() {
        let err = DecodeError::io(
            "notes.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, DecodeError::PermissionDenied { .. }));
        assert_eq!(err.name(), "notes.txt");

        let err = DecodeError::io(
            "gone.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(matches!(err, DecodeError::NotFound { .. }));

        let err = DecodeError::io("odd.txt", std::io::Error::other("boom"));
        assert!(matches!(err, DecodeError::Io { .. }));
        assert!(err.to_string().contains("boom"));
    }
}
