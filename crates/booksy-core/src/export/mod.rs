//! Book export
//!
//! Export happens in two steps. [`build_document`] turns a book into a
//! format-neutral, paginated [`Document`]: a title page, then one page per
//! non-blank section in display order. An [`Exporter`] then renders that
//! document into a concrete file format.
//!
//! Section text is translated line by line. After trimming, a line starting
//! with `# ` becomes a level-1 heading, `## ` a level-2 heading, any other
//! non-blank line a paragraph; blank lines produce nothing. No other
//! markdown is interpreted.

pub mod docx;
pub mod error;
pub mod markdown;

use std::fmt;
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::config::Config;
use crate::models::Book;
use crate::section::humanize;

pub use docx::DocxExporter;
pub use error::{ExportError, Result};
pub use markdown::MarkdownExporter;

/// Horizontal alignment of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
}

/// One block of an exported document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Book title on the title page
    Title(String),
    /// Heading, level 1 or 2
    Heading { level: u8, text: String },
    /// Paragraph of running text
    Paragraph { text: String, align: Alignment },
    /// Start a new page
    PageBreak,
}

impl Block {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Block::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph {
            text: text.into(),
            align: Alignment::Left,
        }
    }
}

/// Format-neutral paginated document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub title: String,
    pub author: String,
    pub blocks: Vec<Block>,
}

impl Document {
    /// Headings of the given level, in order
    pub fn headings(&self, level: u8) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(move |block| match block {
            Block::Heading { level: l, text } if *l == level => Some(text.as_str()),
            _ => None,
        })
    }

    /// Paragraph texts, in order
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Paragraph { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Build the paginated document for a book
pub fn build_document(book: &Book) -> Document {
    let mut blocks = vec![
        Block::Title(book.title.clone()),
        Block::Paragraph {
            text: format!("by {}", book.author),
            align: Alignment::Center,
        },
        Block::PageBreak,
    ];

    for (key, text) in book.ordered_sections() {
        if text.trim().is_empty() {
            continue;
        }
        blocks.push(Block::heading(1, humanize(key)));
        blocks.extend(text.lines().filter_map(translate_line));
        blocks.push(Block::PageBreak);
    }

    Document {
        title: book.title.clone(),
        author: book.author.clone(),
        blocks,
    }
}

/// Translate one line of section text; `None` for blank lines
pub fn translate_line(line: &str) -> Option<Block> {
    let line = line.trim();
    if let Some(text) = line.strip_prefix("# ") {
        Some(Block::heading(1, text))
    } else if let Some(text) = line.strip_prefix("## ") {
        Some(Block::heading(2, text))
    } else if !line.is_empty() {
        Some(Block::paragraph(line))
    } else {
        None
    }
}

/// Information about an export format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatInfo {
    /// Unique identifier (e.g., "docx").
    pub id: &'static str,
    /// Human-readable name (e.g., "Word document").
    pub name: &'static str,
    /// File extension without the dot.
    pub extension: &'static str,
    /// MIME type of the produced file.
    pub mime_type: &'static str,
}

/// Rendering options shared by all exporters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Default font family
    pub font: String,
    /// Default font size in points
    pub font_size: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            font: "Georgia".to_string(),
            font_size: 12,
        }
    }
}

impl ExportOptions {
    /// Options taken from the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            font: config.export_font.clone(),
            font_size: config.export_font_size,
        }
    }
}

/// Renders a document into a file format
pub trait Exporter {
    /// Get format information.
    fn format_info(&self) -> FormatInfo;

    /// Render a document to a writer.
    fn export<W: Write + Seek>(&self, document: &Document, writer: W) -> Result<()>;
}

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Docx,
    Markdown,
}

impl ExportFormat {
    pub fn info(self) -> FormatInfo {
        match self {
            ExportFormat::Docx => docx::FORMAT_INFO,
            ExportFormat::Markdown => markdown::FORMAT_INFO,
        }
    }

    /// File extension without the dot
    pub fn extension(self) -> &'static str {
        self.info().extension
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.info().id)
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docx" | "word" => Ok(ExportFormat::Docx),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            _ => Err(ExportError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}

/// Render a book in memory
pub fn render(book: &Book, format: ExportFormat, options: &ExportOptions) -> Result<Vec<u8>> {
    let document = build_document(book);
    let mut buffer = Cursor::new(Vec::new());
    match format {
        ExportFormat::Docx => DocxExporter::new(options.clone()).export(&document, &mut buffer)?,
        ExportFormat::Markdown => MarkdownExporter::new().export(&document, &mut buffer)?,
    }
    Ok(buffer.into_inner())
}

/// Render a book and write it to `path`
///
/// The document is rendered completely before the destination is touched,
/// so a rendering failure never leaves a partial file behind.
pub fn export_to_path(
    book: &Book,
    path: &Path,
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<()> {
    let bytes = render(book, format, options)?;
    std::fs::write(path, &bytes).map_err(|source| ExportError::Destination {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = ?path, format = %format, bytes = bytes.len(), "Exported book");
    Ok(())
}

/// Default export file name: the title with path-hostile characters replaced
pub fn default_file_name(title: &str, format: ExportFormat) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = if stem.is_empty() { "book" } else { stem.as_str() };
    format!("{}.{}", stem, format.extension())
}
