//! JSON book store persistence
//!
//! The whole store is one JSON object mapping book ID to book record. Every
//! save rewrites the complete document using an atomic write (temp file,
//! sync, rename), so the file is never left half-written.
//!
//! Storage location: `~/Booksy/books.json` (configurable via `Config`)
//!
//! Records are read one by one. A record that does not fit (unknown format,
//! bad ID, missing field) is skipped with a warning and the other books still
//! load. A file that is not a JSON object at all yields an empty store. In
//! both cases the original file is copied to `books.json.corrupt` before the
//! next save can overwrite it.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{BooksyError, Result};
use crate::models::Book;

/// Book ID to book record, as stored on disk
pub type BookMap = BTreeMap<Uuid, Book>;

/// Result of loading the store
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Books read from disk (empty when the file was missing or unreadable)
    pub books: BookMap,
    /// Set when the file could not be parsed; always `BooksyError::CorruptStore`
    pub corruption: Option<BooksyError>,
    /// Records left out because they could not be read as books
    pub skipped: Vec<SkippedRecord>,
    /// Copy of the original file, written when anything was left out
    pub backup_path: Option<PathBuf>,
}

/// A store record that was not loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Key of the record in the store file
    pub key: String,
    /// Why it could not be read
    pub reason: String,
}

/// Persistence handler for the JSON store file
#[derive(Debug, Clone)]
pub struct JsonPersistence {
    path: PathBuf,
}

impl JsonPersistence {
    /// Create a handler for a specific store file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a handler for the store file named by the configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.books_path())
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if a store file exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Path the unreadable store is copied to
    pub fn corrupt_backup_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".corrupt");
        self.path.with_file_name(name)
    }

    /// Load the store
    ///
    /// A missing file is an empty store. A file that is not a JSON object is
    /// also treated as empty; see [`LoadOutcome::corruption`]. Records that
    /// cannot be read are left out and listed in [`LoadOutcome::skipped`].
    /// Only I/O failures while reading are returned as errors.
    pub fn load(&self) -> Result<LoadOutcome> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "No book store yet, starting empty");
                return Ok(LoadOutcome::default());
            }
            Err(e) => return Err(BooksyError::from_read_io(e, self.path.clone())),
        };

        let records = match serde_json::from_slice::<Map<String, Value>>(&bytes) {
            Ok(records) => records,
            Err(e) => {
                let backup_path = self.backup_corrupt(&bytes);
                warn!(
                    path = ?self.path,
                    backup = ?backup_path,
                    error = %e,
                    "Book store could not be parsed, starting with an empty store"
                );
                return Ok(LoadOutcome {
                    corruption: Some(BooksyError::CorruptStore {
                        path: self.path.clone(),
                        backup_path: backup_path.clone(),
                        details: e.to_string(),
                    }),
                    backup_path,
                    ..LoadOutcome::default()
                });
            }
        };

        let mut books = BookMap::new();
        let mut skipped = Vec::new();
        for (key, value) in records {
            match parse_record(&key, value) {
                Ok(book) => {
                    books.insert(book.id, book);
                }
                Err(reason) => {
                    warn!(
                        path = ?self.path,
                        record = %key,
                        reason = %reason,
                        "Skipping unreadable book record"
                    );
                    skipped.push(SkippedRecord { key, reason });
                }
            }
        }

        let backup_path = if skipped.is_empty() {
            None
        } else {
            self.backup_corrupt(&bytes)
        };
        debug!(
            path = ?self.path,
            count = books.len(),
            skipped = skipped.len(),
            "Loaded book store"
        );
        Ok(LoadOutcome {
            books,
            corruption: None,
            skipped,
            backup_path,
        })
    }

    /// Rewrite the whole store file
    pub fn save(&self, books: &BookMap) -> Result<()> {
        let json = serde_json::to_vec_pretty(books)?;
        atomic_write(&self.path, &json)?;
        debug!(path = ?self.path, count = books.len(), "Saved book store");
        Ok(())
    }

    /// Keep a copy of an unreadable store; `None` if the copy failed
    fn backup_corrupt(&self, bytes: &[u8]) -> Option<PathBuf> {
        let backup_path = self.corrupt_backup_path();
        match atomic_write(&backup_path, bytes) {
            Ok(()) => Some(backup_path),
            Err(e) => {
                warn!(path = ?backup_path, error = %e, "Failed to back up unreadable book store");
                None
            }
        }
    }
}

/// Read one record; the error is a reason fit for a warning
fn parse_record(key: &str, value: Value) -> std::result::Result<Book, String> {
    let id = Uuid::parse_str(key).map_err(|e| format!("invalid book ID: {}", e))?;
    let book: Book = serde_json::from_value(value).map_err(|e| e.to_string())?;
    if book.id != id {
        return Err(format!("record ID {} does not match its key", book.id));
    }
    Ok(book)
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| BooksyError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| BooksyError::from_io(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| BooksyError::from_io(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| BooksyError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| BooksyError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
