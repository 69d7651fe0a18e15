//! Unified book store
//!
//! The `Store` owns the in-memory book mapping and its JSON persistence.
//! Every mutating call validates first, changes the mapping, then rewrites
//! the store file. A validation error leaves the mapping untouched, and a
//! failed save puts the previous state of the book back, so memory and disk
//! never disagree about whether an operation happened.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open()?;
//!
//! let id = store.create_book("Dune", "Frank", "novel")?;
//! let key = store.add_chapter(id)?;
//! store.update_section(id, &key, "# Chapter 3\n\nSand.")?;
//! store.export_book(id, Path::new("dune.docx"), ExportFormat::Docx)?;
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{BooksyError, Result};
use crate::export::{self, ExportFormat, ExportOptions};
use crate::models::{Book, BookFormat, BookSummary};
use crate::storage::{BookMap, JsonPersistence, SkippedRecord};

/// Book store backed by a single JSON file
pub struct Store {
    /// All books, keyed by ID
    books: BookMap,
    /// Store file handler
    persistence: JsonPersistence,
    /// Configuration
    config: Config,
    /// Set when the store file was unreadable at open
    corruption: Option<BooksyError>,
    /// Records left out at open
    skipped: Vec<SkippedRecord>,
    /// Copy of the store file taken at open, if anything was left out
    backup_path: Option<PathBuf>,
}

impl Store {
    /// Open the store using the configuration from the default location
    pub fn open() -> anyhow::Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config).context("Failed to open book store")
    }

    /// Open the store with a specific configuration
    ///
    /// A missing store file is an empty store. An unreadable one is also
    /// opened empty; check [`Store::corruption`] afterwards.
    pub fn open_with_config(config: Config) -> Result<Self> {
        let persistence = JsonPersistence::from_config(&config);
        let outcome = persistence.load()?;

        Ok(Self {
            books: outcome.books,
            persistence,
            config,
            corruption: outcome.corruption,
            skipped: outcome.skipped,
            backup_path: outcome.backup_path,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        self.persistence.path()
    }

    /// Notice about an unreadable store file found at open
    pub fn corruption(&self) -> Option<&BooksyError> {
        self.corruption.as_ref()
    }

    /// Take the corruption notice so it is reported once
    pub fn take_corruption(&mut self) -> Option<BooksyError> {
        self.corruption.take()
    }

    /// Records in the store file that could not be read as books
    pub fn skipped_records(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    /// Where the original store file was copied when something was left out
    pub fn backup_path(&self) -> Option<&Path> {
        self.backup_path.as_deref()
    }

    // ==================== Book Operations ====================

    /// Create a book from its format template and return its ID
    ///
    /// `format` accepts stored keys (`technical_business`) as well as display
    /// names (`Technical/Business`).
    pub fn create_book(&mut self, title: &str, author: &str, format: &str) -> Result<Uuid> {
        let format: BookFormat = format.parse()?;
        let book = Book::new(title, author, format)?;
        let id = book.id;

        debug!(%id, title = %book.title, format = format.key(), "Creating book");
        self.books.insert(id, book);
        if let Err(e) = self.save() {
            self.books.remove(&id);
            return Err(e);
        }
        Ok(id)
    }

    /// Get a book by ID
    pub fn get_book(&self, id: Uuid) -> Result<&Book> {
        self.books.get(&id).ok_or_else(|| not_found(id))
    }

    /// All books
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    /// Summaries of all books, oldest first
    pub fn list_books(&self) -> Vec<BookSummary> {
        let mut summaries: Vec<BookSummary> = self.books.values().map(Book::summary).collect();
        summaries.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.title.cmp(&b.title))
        });
        summaries
    }

    /// Number of books
    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    /// Delete a book
    pub fn delete_book(&mut self, id: Uuid) -> Result<()> {
        let book = self.books.remove(&id).ok_or_else(|| not_found(id))?;
        if let Err(e) = self.save() {
            self.books.insert(id, book);
            return Err(e);
        }
        debug!(%id, title = %book.title, "Deleted book");
        Ok(())
    }

    /// IDs whose string form starts with `prefix`
    pub fn find_by_prefix(&self, prefix: &str) -> Vec<Uuid> {
        let prefix = prefix.trim().to_ascii_lowercase();
        self.books
            .keys()
            .filter(|id| id.to_string().starts_with(&prefix))
            .copied()
            .collect()
    }

    // ==================== Section Operations ====================

    /// Exact stored text of a section
    pub fn load_section(&self, id: Uuid, key: &str) -> Result<String> {
        let book = self.get_book(id)?;
        book.section(key)
            .map(str::to_string)
            .ok_or_else(|| BooksyError::MissingSectionKey {
                key: key.to_string(),
            })
    }

    /// Overwrite the text of an existing section
    pub fn update_section(&mut self, id: Uuid, key: &str, text: &str) -> Result<()> {
        self.mutate_book(id, |book| book.update_section(key, text))?;
        debug!(%id, key, bytes = text.len(), "Updated section");
        Ok(())
    }

    /// Append a numbered chapter and return its key
    pub fn add_chapter(&mut self, id: Uuid) -> Result<String> {
        let key = self.mutate_book(id, Book::add_chapter)?;
        debug!(%id, key = %key, "Added chapter");
        Ok(key)
    }

    /// Remove a chapter
    pub fn delete_chapter(&mut self, id: Uuid, key: &str) -> Result<()> {
        self.mutate_book(id, |book| book.delete_chapter(key))?;
        debug!(%id, key, "Deleted chapter");
        Ok(())
    }

    // ==================== Export ====================

    /// Export a book to `path` using the configured font settings
    pub fn export_book(&self, id: Uuid, path: &Path, format: ExportFormat) -> Result<()> {
        let book = self.get_book(id)?;
        let options = ExportOptions::from_config(&self.config);
        export::export_to_path(book, path, format, &options)?;
        Ok(())
    }

    // ==================== Persistence ====================

    /// Rewrite the store file
    pub fn save(&self) -> Result<()> {
        self.persistence.save(&self.books)
    }

    /// Apply `change` to one book and persist it
    ///
    /// The book is restored if the change fails or the save does.
    fn mutate_book<T>(
        &mut self,
        id: Uuid,
        change: impl FnOnce(&mut Book) -> Result<T>,
    ) -> Result<T> {
        let book = self.books.get_mut(&id).ok_or_else(|| not_found(id))?;
        let before = book.clone();

        let result = change(book).and_then(|value| self.save().map(|()| value));
        if result.is_err() {
            self.books.insert(id, before);
        }
        result
    }
}

fn not_found(id: Uuid) -> BooksyError {
    BooksyError::BookNotFound { id: id.to_string() }
}
