//! Error types for the codec.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by readers, writers and configuration parsing.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Open, read, write, copy or close failed on the underlying storage.
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The charset label is unknown or cannot be used for both directions.
    #[error("unsupported encoding: {label}")]
    Encoding { label: String },

    /// Fixed-width offsets ran past the end of the line.
    #[error("column {column} needs offset {end} but the line has only {available} {unit}")]
    Range {
        column: usize,
        end: usize,
        available: usize,
        unit: &'static str,
    },

    /// A configuration value could not be parsed or is out of range.
    #[error("invalid config value for {key}: {message}")]
    Config { key: String, message: String },
}

impl CodecError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CodecError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn config(key: &str, message: impl Into<String>) -> Self {
        CodecError::Config {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_keeps_path_and_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CodecError::io("in/data.csv", io_err);
        match &err {
            CodecError::Io { path, source } => {
                assert_eq!(path, &PathBuf::from("in/data.csv"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("Expected Io, got {other:?}"),
        }
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_range_display() {
        let err = CodecError::Range {
            column: 1,
            end: 6,
            available: 5,
            unit: "chars",
        };
        assert_eq!(
            err.to_string(),
            "column 1 needs offset 6 but the line has only 5 chars"
        );
    }

    #[test]
    fn test_io_display_includes_path() {
        let err = CodecError::io(
            "out/data.csv",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("out/data.csv"));
    }
}
