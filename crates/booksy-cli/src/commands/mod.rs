//! Command handlers

pub mod book;
pub mod chapter;
pub mod config;
pub mod export;
pub mod section;

use anyhow::{bail, Result};
use uuid::Uuid;

use booksy_core::{BooksyError, ExportError, Store};

use crate::editor::confirm;
use crate::output::Output;

/// Resolve a book ID given as a full UUID or a unique prefix
pub fn resolve_book_id(store: &Store, id: &str) -> Result<Uuid> {
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(uuid);
    }

    if id.trim().is_empty() {
        bail!("Book ID cannot be empty");
    }

    let matches = store.find_by_prefix(id);
    match matches.as_slice() {
        [] => bail!("No book found matching: {}", id),
        [uuid] => Ok(*uuid),
        _ => {
            eprintln!("Multiple books match '{}':", id);
            for uuid in &matches {
                if let Ok(book) = store.get_book(*uuid) {
                    eprintln!("  {} - {}", uuid, book.title);
                }
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

/// Ask before a delete unless `--yes` was given
///
/// JSON and quiet output never prompt, so they refuse the delete instead.
pub fn confirm_delete(output: &Output, yes: bool, prompt: &str) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    if !output.should_prompt() {
        bail!("Refusing to delete without confirmation. Pass --yes to delete.");
    }
    confirm(prompt)
}

/// Recovery hint for the first typed error in the chain
pub fn recovery_suggestion(error: &anyhow::Error) -> Option<&'static str> {
    error.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<BooksyError>() {
            e.recovery_suggestion()
        } else if let Some(e) = cause.downcast_ref::<ExportError>() {
            e.recovery_suggestion()
        } else {
            None
        }
    })
}
