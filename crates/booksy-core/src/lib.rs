//! Booksy Core Library
//!
//! This crate provides the core functionality for Booksy, a book drafting
//! tool. A book is created from one of six format templates (novel, poetry
//! collection, memoir, cookbook, children's book, technical/business),
//! edited section by section, and exported as a Word document.
//!
//! # Architecture
//!
//! - **Catalog**: per-format section templates and ordering rules
//! - **Store**: all books in one JSON file, rewritten atomically on each change
//! - **Export**: book → paginated document → DOCX or Markdown
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open()?;
//!
//! let id = store.create_book("Dune", "Frank", "novel")?;
//! store.add_chapter(id)?;
//! store.export_book(id, Path::new("Dune.docx"), ExportFormat::Docx)?;
//! ```
//!
//! # Modules
//!
//! - `store`: Unified storage interface (main entry point)
//! - `models`: Book record, formats and summaries
//! - `catalog`: Format templates
//! - `section`: Section key helpers (chapters, display names)
//! - `order`: Display/export order of sections
//! - `storage`: JSON persistence
//! - `export`: Document building and file writers
//! - `config`: Application configuration

pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod order;
pub mod section;
pub mod storage;
pub mod store;

pub use config::Config;
pub use error::{BooksyError, Result};
pub use export::{ExportError, ExportFormat, ExportOptions};
pub use models::{Book, BookFormat, BookSummary, Content};
pub use storage::{BookMap, JsonPersistence, LoadOutcome, SkippedRecord};
pub use store::Store;
