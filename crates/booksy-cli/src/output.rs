//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use booksy_core::catalog::FormatSpec;
use booksy_core::models::word_count;
use booksy_core::section::humanize;
use booksy_core::{Book, BookSummary};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a book with its sections in display order
    pub fn print_book(&self, book: &Book) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", book.id);
                println!("Title:    {}", book.title);
                println!("Author:   {}", book.author);
                println!("Format:   {}", book.format);
                println!("Words:    {}", book.word_count());
                println!("Created:  {}", book.created_at.format("%Y-%m-%d %H:%M"));
                println!("Updated:  {}", book.updated_at.format("%Y-%m-%d %H:%M"));
                if book.format.has_chapters() {
                    // New chapters are appended after this one
                    println!("Last ch.: {}", book.last_chapter().unwrap_or("(none)"));
                }
                println!();
                println!("── Sections ({}) ──", book.content.len());
                for (key, text) in book.ordered_sections() {
                    println!(
                        "{:<24} {:<24} {:>6} words",
                        key,
                        truncate(&humanize(key), 24),
                        word_count(text)
                    );
                }
            }
            OutputFormat::Json => {
                let sections: Vec<_> = book
                    .ordered_sections()
                    .into_iter()
                    .map(|(key, text)| {
                        serde_json::json!({
                            "key": key,
                            "name": humanize(key),
                            "words": word_count(text),
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "book": book.summary(),
                        "sections": sections,
                    })
                );
            }
            OutputFormat::Quiet => {
                for key in book.section_order() {
                    println!("{}", key);
                }
            }
        }
    }

    /// Print a list of books
    pub fn print_books(&self, books: &[BookSummary]) {
        match self.format {
            OutputFormat::Human => {
                if books.is_empty() {
                    println!("No books yet. Create one with `booksy new`.");
                    return;
                }
                for book in books {
                    println!(
                        "{} | {} | {} | {} | {} words",
                        &book.id.to_string()[..8],
                        truncate(&book.title, 35),
                        truncate(&book.author, 20),
                        book.format,
                        book.word_count
                    );
                }
                println!("\n{} book(s)", books.len());
            }
            OutputFormat::Json => {
                println!("{}", to_json(books));
            }
            OutputFormat::Quiet => {
                for book in books {
                    println!("{}", book.id);
                }
            }
        }
    }

    /// Print the text of one section
    pub fn print_section(&self, key: &str, text: &str) {
        match self.format {
            OutputFormat::Human | OutputFormat::Quiet => {
                print!("{}", text);
                if !text.ends_with('\n') {
                    println!();
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"key": key, "text": text}));
            }
        }
    }

    /// Print the format catalog
    pub fn print_formats(&self, formats: &[FormatSpec]) {
        match self.format {
            OutputFormat::Human => {
                for spec in formats {
                    let chapters = if spec.has_chapters() {
                        "chapters"
                    } else {
                        "fixed sections"
                    };
                    println!("{:<20} {:<20} {}", spec.key, spec.display_name, chapters);
                }
            }
            OutputFormat::Json => {
                let json: Vec<_> = formats
                    .iter()
                    .map(|spec| {
                        serde_json::json!({
                            "key": spec.key,
                            "name": spec.display_name,
                            "chapters": spec.has_chapters(),
                            "sections": spec.section_keys().collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                println!("{}", to_json(&json));
            }
            OutputFormat::Quiet => {
                for spec in formats {
                    println!("{}", spec.key);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning to stderr (suppressed in quiet mode)
    pub fn warning(&self, message: &str) {
        if !self.is_quiet() {
            eprintln!("⚠ {}", message);
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        serde_json::json!({"status": "error", "message": e.to_string()}).to_string()
    })
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
