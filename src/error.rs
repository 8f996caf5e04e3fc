//! Error types for visual-diff operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for visual-diff operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while comparing screenshot directories.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A baseline or candidate directory could not be scanned.
    #[error("Scan failed: {path}: {reason}")]
    Scan {
        /// Directory that failed to scan.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Failed to read or decode an image file.
    #[error("Image load failed: {path}: {reason}")]
    ImageLoad {
        /// Path to the image that failed to load.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Failed to encode or write an image file.
    #[error("Image write failed: {path}: {reason}")]
    ImageWrite {
        /// Destination path.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_is_transparent() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "denied");
    }

    #[test]
    fn test_messages_name_the_path() {
        let err = Error::ImageWrite {
            path: PathBuf::from("out/images/a-diff.png"),
            reason: "disk full".to_string(),
        };
        assert_eq!(err.to_string(), "Image write failed: out/images/a-diff.png: disk full");
    }
}
