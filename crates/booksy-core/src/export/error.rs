//! Error types for export operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Error types for export operations.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Export format is not supported.
    #[error("Unsupported export format: '{format}'")]
    UnsupportedFormat { format: String },

    /// The chosen destination could not be written.
    #[error("Cannot write export to '{path}': {source}")]
    Destination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Building the document container failed.
    #[error("Failed to build document archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// I/O operation failed while rendering.
    #[error("I/O error during export: {0}")]
    Io(#[from] io::Error),
}

impl ExportError {
    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            ExportError::UnsupportedFormat { .. } => Some("Supported export formats: docx, markdown."),
            ExportError::Destination { .. } => Some(
                "Choose a different file location, or check that the folder exists and is writable.",
            ),
            _ => None,
        }
    }
}
