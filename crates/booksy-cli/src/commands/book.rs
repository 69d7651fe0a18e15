//! Book command handlers

use anyhow::{Context, Result};

use booksy_core::{catalog, Store};

use super::{confirm_delete, resolve_book_id};
use crate::output::Output;

/// Create a new book from its format template
pub fn create(
    store: &mut Store,
    title: &str,
    author: &str,
    format: &str,
    output: &Output,
) -> Result<()> {
    let id = store
        .create_book(title, author, format)
        .context("Failed to create book")?;
    let book = store.get_book(id)?;

    if output.is_quiet() {
        println!("{}", id);
        return Ok(());
    }
    output.success(&format!(
        "Created {} '{}' ({}) with {} sections",
        book.format,
        book.title,
        &id.to_string()[..8],
        book.content.len()
    ));
    Ok(())
}

/// List all books
pub fn list(store: &Store, output: &Output) -> Result<()> {
    output.print_books(&store.list_books());
    Ok(())
}

/// Show one book
pub fn show(store: &Store, id: &str, output: &Output) -> Result<()> {
    let uuid = resolve_book_id(store, id)?;
    let book = store.get_book(uuid)?;
    output.print_book(book);
    Ok(())
}

/// List supported formats
pub fn formats(output: &Output) -> Result<()> {
    output.print_formats(catalog::all());
    Ok(())
}

/// Delete a book
pub fn delete(store: &mut Store, id: &str, yes: bool, output: &Output) -> Result<()> {
    let uuid = resolve_book_id(store, id)?;
    let title = store.get_book(uuid)?.title.clone();

    if !yes && output.should_prompt() {
        println!("Delete book: {} - {}", &uuid.to_string()[..8], title);
    }
    if !confirm_delete(output, yes, "This removes every section. Are you sure?")? {
        output.message("Cancelled.");
        return Ok(());
    }

    store.delete_book(uuid).context("Failed to delete book")?;
    output.success(&format!("Deleted book: {}", title));
    Ok(())
}
