//! Markdown exporter.

use std::io::{Seek, Write};

use super::{Block, Document, Exporter, FormatInfo, Result};

pub(crate) const FORMAT_INFO: FormatInfo = FormatInfo {
    id: "markdown",
    name: "Markdown",
    extension: "md",
    mime_type: "text/markdown",
};

/// Plain Markdown exporter; page breaks become horizontal rules
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownExporter;

impl MarkdownExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for MarkdownExporter {
    fn format_info(&self) -> FormatInfo {
        FORMAT_INFO
    }

    fn export<W: Write + Seek>(&self, document: &Document, mut writer: W) -> Result<()> {
        writer.write_all(render_markdown(document).as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

fn render_markdown(document: &Document) -> String {
    let chunks: Vec<String> = document
        .blocks
        .iter()
        .map(|block| match block {
            Block::Title(text) => format!("# {}", text),
            Block::Heading { level, text } => {
                format!("{} {}", "#".repeat((*level).clamp(1, 2) as usize), text)
            }
            Block::Paragraph { text, .. } => text.clone(),
            Block::PageBreak => "---".to_string(),
        })
        .collect();

    let mut out = chunks.join("\n\n");
    out.push('\n');
    out
}
