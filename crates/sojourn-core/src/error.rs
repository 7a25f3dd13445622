//! Error types for Sojourn operations.
//!
//! This module defines [`SojournError`], the error enum shared by the client
//! crates. Errors are designed for visibility - no silent failures, clear
//! actionable messages. The one deliberate exception is malformed stream
//! records, which are logged and skipped so a single bad record does not
//! abort an in-flight plan stream.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`SojournError`].
pub type Result<T> = std::result::Result<T, SojournError>;

/// Error type for Sojourn client operations.
///
/// No automatic retry anywhere - every failure is terminal for that attempt
/// and the user re-initiates.
#[derive(Debug, Error)]
pub enum SojournError {
    // =========================================================================
    // I/O Errors
    // =========================================================================
    /// Directory creation failed
    #[error("Failed to create directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Export Errors
    // =========================================================================
    /// Spreadsheet write failed
    #[error("Failed to write spreadsheet {path}: {message}")]
    ExportWrite { path: PathBuf, message: String },

    /// Nothing selected to export
    #[error("No program selected for export")]
    ExportNoSelection,

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal error (bug in Sojourn)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SojournError {
    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error is fatal (should exit application)
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    /// Returns actionable guidance for the user
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            Self::ExportNoSelection => Some("Generate a plan and select a program first"),
            Self::ExportWrite { .. } => {
                Some("Check that the current directory is writable and the file is not open")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(SojournError::internal("bug").is_fatal());
        assert!(!SojournError::ExportNoSelection.is_fatal());
        assert_eq!(
            SojournError::ExportNoSelection.guidance(),
            Some("Generate a plan and select a program first")
        );
    }

    #[test]
    fn test_export_write_display() {
        let err = SojournError::ExportWrite {
            path: "/tmp/TU_Munich_Timeline.xlsx".into(),
            message: "permission denied".into(),
        };
        assert!(err.to_string().contains("TU_Munich_Timeline.xlsx"));
        assert!(err.guidance().is_some());
    }
}
