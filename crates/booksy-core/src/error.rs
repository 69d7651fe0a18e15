//! Error handling
//!
//! Typed errors for book operations and storage, with descriptive messages
//! and recovery suggestions.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::export::ExportError;

/// Errors that can occur in core operations
#[derive(Error, Debug)]
pub enum BooksyError {
    /// Format key is not in the catalog
    #[error("Unsupported format: '{format}'")]
    UnsupportedFormat { format: String },

    /// Section key does not exist in the book's content
    #[error("Section '{key}' does not exist in this book")]
    MissingSectionKey { key: String },

    /// Key does not name a chapter
    #[error("'{key}' is not a chapter")]
    NotAChapter { key: String },

    /// Format has no chapter structure
    #[error("Books in the '{format}' format do not have numbered chapters")]
    ChaptersNotSupported { format: String },

    /// No book with this ID in the store
    #[error("Book not found: {id}")]
    BookNotFound { id: String },

    /// Rejected user input (empty title, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Store file could not be parsed
    ///
    /// Never returned as an error from loading: the store recovers with an
    /// empty mapping and reports this as a notice instead.
    #[error("Book store at '{path}' could not be read and was replaced by an empty store: {details}")]
    CorruptStore {
        path: PathBuf,
        backup_path: Option<PathBuf>,
        details: String,
    },

    /// Failed to create data directory
    #[error("Failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Disk is full or quota exceeded
    #[error(
        "Disk full or quota exceeded while writing to '{path}'. Free up disk space and try again."
    )]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read file
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write file
    #[error("Failed to write '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Atomic write failed during rename
    #[error("Atomic write failed: could not rename '{from}' to '{to}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Store could not be serialized
    #[error("Failed to serialize book store: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Export failed
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl BooksyError {
    /// Create an error from a write-side I/O error with path context
    ///
    /// Classifies the error based on its kind (permission, disk full, etc.)
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => BooksyError::PermissionDenied {
                path,
                source: error,
            },
            // StorageFull is not stable on every toolchain, so also check the message
            _ if is_disk_full_error(&error) => BooksyError::DiskFull {
                path,
                source: error,
            },
            _ => BooksyError::WriteError {
                path,
                source: error,
            },
        }
    }

    /// Create an error from a read-side I/O error with path context
    pub fn from_read_io(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => BooksyError::PermissionDenied {
                path,
                source: error,
            },
            _ => BooksyError::ReadError {
                path,
                source: error,
            },
        }
    }

    /// Whether the user can fix this and retry the same operation
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BooksyError::DiskFull { .. }
                | BooksyError::PermissionDenied { .. }
                | BooksyError::CorruptStore { .. }
                | BooksyError::Export(_)
        )
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            BooksyError::UnsupportedFormat { .. } => Some(
                "Use one of: Novel, Poetry Collection, Memoir, Cookbook, Children's Book, Technical/Business.",
            ),
            BooksyError::DiskFull { .. } => Some("Free up disk space and try again."),
            BooksyError::PermissionDenied { .. } => {
                Some("Check file and directory permissions. You may need to change ownership of the data directory.")
            }
            BooksyError::CorruptStore { .. } => {
                Some("The unreadable file was copied to books.json.corrupt when possible. You can try to repair it by hand.")
            }
            BooksyError::CreateDirectory { .. } => {
                Some("Check that the parent directory exists and you have write permissions.")
            }
            BooksyError::Export(e) => e.recovery_suggestion(),
            _ => None,
        }
    }
}

/// Check if an I/O error indicates disk full condition
pub(crate) fn is_disk_full_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left")
        || msg.contains("disk full")
        || msg.contains("quota exceeded")
        || msg.contains("not enough space")
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, BooksyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_classification() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = BooksyError::from_io(io_err, PathBuf::from("/test/path"));

        assert!(matches!(err, BooksyError::PermissionDenied { .. }));
        assert!(err.is_recoverable());
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_disk_full_detection() {
        let io_err = io::Error::new(io::ErrorKind::Other, "No space left on device");
        let err = BooksyError::from_io(io_err, PathBuf::from("/full/disk"));

        assert!(matches!(err, BooksyError::DiskFull { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_read_error_classification() {
        let io_err = io::Error::new(io::ErrorKind::InvalidData, "bad bytes");
        let err = BooksyError::from_read_io(io_err, PathBuf::from("/data/books.json"));

        assert!(matches!(err, BooksyError::ReadError { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_unsupported_format_display() {
        let err = BooksyError::UnsupportedFormat {
            format: "screenplay".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("Unsupported format"));
        assert!(msg.contains("screenplay"));
        assert!(err.recovery_suggestion().unwrap().contains("Novel"));
    }

    #[test]
    fn test_corrupt_store_display() {
        let err = BooksyError::CorruptStore {
            path: PathBuf::from("/data/books.json"),
            backup_path: Some(PathBuf::from("/data/books.json.corrupt")),
            details: "expected value at line 1 column 1".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("/data/books.json"));
        assert!(msg.contains("empty store"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_missing_section_display() {
        let err = BooksyError::MissingSectionKey {
            key: "glossary".to_string(),
        };
        assert!(err.to_string().contains("glossary"));
        assert!(err.recovery_suggestion().is_none());
    }
}
