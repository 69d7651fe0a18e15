//! Export command handler

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use booksy_core::export::default_file_name;
use booksy_core::{ExportFormat, Store};

use super::resolve_book_id;
use crate::output::Output;

/// Export a book and optionally open the result
pub fn export(
    store: &Store,
    id: &str,
    path: Option<PathBuf>,
    format: ExportFormat,
    open: bool,
    output: &Output,
) -> Result<()> {
    let uuid = resolve_book_id(store, id)?;
    let book = store.get_book(uuid)?;
    let path = path.unwrap_or_else(|| PathBuf::from(default_file_name(&book.title, format)));

    store
        .export_book(uuid, &path, format)
        .with_context(|| format!("Failed to export '{}'", book.title))?;

    if output.is_quiet() {
        println!("{}", path.display());
    } else {
        output.success(&format!("Exported '{}' to {}", book.title, path.display()));
    }

    if open {
        debug!(path = ?path, "Opening exported file");
        if let Err(e) = open::that(&path) {
            output.warning(&format!("Could not open {}: {}", path.display(), e));
        }
    }

    Ok(())
}
