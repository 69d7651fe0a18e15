//! Section command handlers

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use booksy_core::Store;

use super::resolve_book_id;
use crate::editor::edit_text;
use crate::output::Output;

/// Print the stored text of a section
pub fn show(store: &Store, id: &str, key: &str, output: &Output) -> Result<()> {
    let uuid = resolve_book_id(store, id)?;
    let text = store.load_section(uuid, key)?;
    output.print_section(key, &text);
    Ok(())
}

/// Replace the text of a section
///
/// Text comes from `--text`, `--file`, or the user's editor, in that order.
/// It is stored verbatim.
pub fn edit(
    store: &mut Store,
    id: &str,
    key: &str,
    text: Option<String>,
    file: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let uuid = resolve_book_id(store, id)?;
    let current = store.load_section(uuid, key)?;

    let new_text = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => fs::read_to_string(&path)
            .with_context(|| format!("Failed to read section text from {:?}", path))?,
        (None, None) => edit_text(&current).context("Failed to edit section")?,
    };

    if new_text == current {
        output.message("No changes.");
        return Ok(());
    }

    store
        .update_section(uuid, key, &new_text)
        .context("Failed to save section")?;
    output.success(&format!("Saved {}", key));
    Ok(())
}
