//! DOCX exporter.
//!
//! Writes a minimal WordprocessingML package: content types, package
//! relationships, the main document, a style sheet defining the Title and
//! Heading styles, and core properties carrying title and author.

use std::io::{Seek, Write};

use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipWriter;

use super::{Alignment, Block, Document, ExportOptions, Exporter, FormatInfo, Result};
use crate::config::MAX_EXPORT_FONT_SIZE;

pub(crate) const FORMAT_INFO: FormatInfo = FormatInfo {
    id: "docx",
    name: "Word document",
    extension: "docx",
    mime_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
};

/// DOCX format exporter.
///
/// # Example
///
/// ```no_run
/// use booksy_core::export::{build_document, DocxExporter, ExportOptions, Exporter};
/// use booksy_core::{Book, BookFormat};
/// use std::fs::File;
///
/// let book = Book::new("Dune", "Frank", BookFormat::Novel)?;
/// let file = File::create("dune.docx")?;
/// DocxExporter::new(ExportOptions::default()).export(&build_document(&book), file)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocxExporter {
    options: ExportOptions,
}

impl DocxExporter {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }
}

impl Exporter for DocxExporter {
    fn format_info(&self) -> FormatInfo {
        FORMAT_INFO
    }

    fn export<W: Write + Seek>(&self, document: &Document, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(PACKAGE_RELS_XML.as_bytes())?;

        zip.start_file("word/_rels/document.xml.rels", options)?;
        zip.write_all(DOCUMENT_RELS_XML.as_bytes())?;

        zip.start_file("word/styles.xml", options)?;
        zip.write_all(generate_styles(&self.options).as_bytes())?;

        zip.start_file("docProps/core.xml", options)?;
        zip.write_all(generate_core_properties(document).as_bytes())?;

        zip.start_file("word/document.xml", options)?;
        zip.write_all(generate_document(document).as_bytes())?;

        zip.finish()?;
        Ok(())
    }
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

/// US Letter with one-inch margins, in twentieths of a point
const SECTION_PROPERTIES: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#;

fn generate_styles(options: &ExportOptions) -> String {
    let font = escape_xml(&options.font);
    // Sizes are in half-points
    let body = options.font_size.clamp(1, MAX_EXPORT_FONT_SIZE) * 2;
    let mut xml = String::new();

    xml.push_str(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
"#,
    );
    xml.push_str(&format!(
        "  <w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\" w:cs=\"{font}\" w:eastAsia=\"{font}\"/><w:sz w:val=\"{body}\"/><w:szCs w:val=\"{body}\"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after=\"160\" w:line=\"276\" w:lineRule=\"auto\"/></w:pPr></w:pPrDefault></w:docDefaults>\n"
    ));
    xml.push_str(
        "  <w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\"><w:name w:val=\"Normal\"/><w:qFormat/></w:style>\n",
    );
    xml.push_str(&paragraph_style("Title", "Title", None, body * 2 + 8));
    xml.push_str(&paragraph_style("Heading1", "heading 1", Some(0), body + 8));
    xml.push_str(&paragraph_style("Heading2", "heading 2", Some(1), body + 4));
    xml.push_str("</w:styles>");
    xml
}

fn paragraph_style(id: &str, name: &str, outline_level: Option<u8>, size: u32) -> String {
    let size = size.min(MAX_EXPORT_FONT_SIZE * 2);
    let outline = outline_level
        .map(|level| format!("<w:outlineLvl w:val=\"{}\"/>", level))
        .unwrap_or_default();
    format!(
        "  <w:style w:type=\"paragraph\" w:styleId=\"{id}\"><w:name w:val=\"{name}\"/><w:basedOn w:val=\"Normal\"/><w:next w:val=\"Normal\"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before=\"240\" w:after=\"120\"/>{outline}</w:pPr><w:rPr><w:b/><w:sz w:val=\"{size}\"/><w:szCs w:val=\"{size}\"/></w:rPr></w:style>\n"
    )
}

fn generate_core_properties(document: &Document) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <dc:title>{}</dc:title>
  <dc:creator>{}</dc:creator>
</cp:coreProperties>"#,
        escape_xml(&document.title),
        escape_xml(&document.author)
    )
}

fn generate_document(document: &Document) -> String {
    let mut xml = String::new();
    xml.push_str(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>
"#,
    );

    for block in &document.blocks {
        match block {
            Block::Title(text) => {
                xml.push_str(&paragraph(Some("Title"), Alignment::Center, text));
            }
            Block::Heading { level, text } => {
                let style = if *level <= 1 { "Heading1" } else { "Heading2" };
                xml.push_str(&paragraph(Some(style), Alignment::Left, text));
            }
            Block::Paragraph { text, align } => {
                xml.push_str(&paragraph(None, *align, text));
            }
            Block::PageBreak => {
                xml.push_str("<w:p><w:r><w:br w:type=\"page\"/></w:r></w:p>\n");
            }
        }
    }

    xml.push_str(SECTION_PROPERTIES);
    xml.push_str("\n</w:body>\n</w:document>");
    xml
}

fn paragraph(style: Option<&str>, align: Alignment, text: &str) -> String {
    let mut properties = String::new();
    if let Some(style) = style {
        properties.push_str(&format!("<w:pStyle w:val=\"{}\"/>", style));
    }
    if align == Alignment::Center {
        properties.push_str("<w:jc w:val=\"center\"/>");
    }
    let properties = if properties.is_empty() {
        properties
    } else {
        format!("<w:pPr>{}</w:pPr>", properties)
    };

    format!(
        "<w:p>{}<w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>\n",
        properties,
        escape_xml(text)
    )
}

/// Escape text for XML and drop characters XML 1.0 cannot carry
fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}
