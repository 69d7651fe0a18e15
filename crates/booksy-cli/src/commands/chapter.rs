//! Chapter command handlers

use anyhow::{bail, Context, Result};

use booksy_core::section::{is_chapter, is_protected_chapter};
use booksy_core::Store;

use super::{confirm_delete, resolve_book_id};
use crate::output::Output;

/// Append a numbered chapter
pub fn add(store: &mut Store, id: &str, output: &Output) -> Result<()> {
    let uuid = resolve_book_id(store, id)?;
    let key = store.add_chapter(uuid).context("Failed to add chapter")?;

    if output.is_quiet() {
        println!("{}", key);
    } else {
        output.success(&format!("Added {}", key));
    }
    Ok(())
}

/// Delete a chapter other than the first two
pub fn delete(store: &mut Store, id: &str, key: &str, yes: bool, output: &Output) -> Result<()> {
    check_deletable(key)?;
    let uuid = resolve_book_id(store, id)?;
    // Fails early with a clear message if the key is missing
    store.load_section(uuid, key)?;

    if !confirm_delete(output, yes, &format!("Delete {}?", key))? {
        output.message("Cancelled.");
        return Ok(());
    }

    store
        .delete_chapter(uuid, key)
        .context("Failed to delete chapter")?;
    output.success(&format!("Deleted {}", key));
    Ok(())
}

fn check_deletable(key: &str) -> Result<()> {
    if !is_chapter(key) {
        bail!("'{}' is not a chapter; only chapters can be deleted", key);
    }
    if is_protected_chapter(key) {
        bail!("{} cannot be deleted. Edit its text instead.", key);
    }
    Ok(())
}
