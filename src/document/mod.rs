//! Format-neutral view of a text document.
//!
//! Word (.docx) and Writer (.odt) documents are loaded by their adapters into
//! the same shape: a resolved style table, a flat list of body blocks and,
//! where the format has them, sections. Checks only talk to [`TextDocument`].
//!
//! # Example
//!
//! ```rust,no_run
//! use docgrade::document::{TextDocument, open_text_document};
//!
//! let doc = open_text_document("thesis.docx")?;
//! for heading in doc.headings() {
//!     println!("{} {}", "#".repeat(heading.level as usize), heading.text);
//! }
//! # Ok::<(), docgrade::common::Error>(())
//! ```

pub mod section;
pub mod types;

pub use section::{HeaderFooterState, Section, SectionProperties};
pub use types::{
    Bibliography, Block, Heading, HeadingNumbering, IndexKind, ObjectKind, Paragraph, StyleInfo,
    TocItem, TocLink,
};

use crate::common::{DocumentFormat, Error, Result};
use crate::style::StyleSpec;
use std::path::Path;

/// Read-only queries over a loaded text document.
///
/// Style lookups accept either the internal identifier or the display name,
/// case-insensitively. Resolved styles carry inherited values.
pub trait TextDocument {
    fn format(&self) -> DocumentFormat;

    /// The default paragraph style ("Normal").
    fn normal_style(&self) -> Option<StyleSpec>;

    /// The built-in heading style of the given level.
    fn heading_style(&self, level: u32) -> Option<StyleSpec>;

    /// A style by name, without an alignment default.
    fn custom_style(&self, name: &str) -> Option<StyleSpec> {
        self.style_by_any_name(&[name], None)
    }

    /// The first style matching any of the names. `default_alignment` fills
    /// in the alignment when the style does not set one.
    fn style_by_any_name(&self, names: &[&str], default_alignment: Option<&str>)
    -> Option<StyleSpec>;

    /// Font size of the document defaults, in points.
    fn doc_default_font_size(&self) -> Option<f64>;

    fn style_info(&self, name: &str) -> Option<StyleInfo>;

    fn style_exists(&self, name: &str) -> bool {
        self.style_info(name).is_some()
    }

    fn heading_numbering(&self, level: u32) -> HeadingNumbering;

    /// Body blocks in document order.
    fn blocks(&self) -> &[Block];

    /// Headings in document order. Empty headings are skipped.
    fn headings(&self) -> &[Heading];

    /// Source markup leaked into the text (pasted HTML).
    fn has_html_artifacts(&self) -> bool;

    fn bibliography(&self) -> &Bibliography;

    /// Sections, for formats that split the body into sections.
    fn sections(&self) -> Option<&[Section]> {
        None
    }

    /// Items of the content control holding the table of contents. `None`
    /// when the document has no such control.
    fn toc_items(&self) -> Option<&[TocItem]> {
        None
    }

    /// Body paragraphs in document order.
    fn paragraphs(&self) -> Vec<&Paragraph> {
        self.blocks().iter().filter_map(Block::as_paragraph).collect()
    }

    /// Whether a table of contents over headings exists.
    fn has_toc(&self) -> bool {
        self.paragraphs()
            .iter()
            .flat_map(|p| p.field_codes.iter())
            .any(|code| IndexKind::from_instruction(code) == Some(IndexKind::Contents))
    }

    /// First TOC field instruction in document order.
    fn toc_instruction(&self) -> Option<String> {
        self.paragraphs()
            .iter()
            .flat_map(|p| p.field_codes.iter())
            .find(|code| code.trim().to_uppercase().starts_with("TOC"))
            .cloned()
    }

    /// Outline levels covered by the table of contents, from `\o "a-b"`.
    fn toc_levels(&self) -> Option<(u32, u32)> {
        self.toc_instruction()
            .and_then(|instruction| parse_outline_switch(&instruction))
    }

    /// Whether the TOC shows heading numbers. `None` without a TOC.
    fn toc_shows_numbers(&self) -> Option<bool> {
        self.toc_instruction()
            .map(|instruction| !instruction.to_ascii_lowercase().contains("\\n"))
    }
}

/// Parse the `\o "a-b"` switch of a TOC instruction.
pub fn parse_outline_switch(instruction: &str) -> Option<(u32, u32)> {
    let lower = instruction.to_ascii_lowercase();
    let rest = &instruction[lower.find("\\o")? + 2..];
    let rest = rest.trim_start().trim_start_matches('"');
    let end = rest.find('"').unwrap_or(rest.len());
    let (from, to) = rest[..end].split_once('-')?;
    Some((from.trim().parse().ok()?, to.trim().parse().ok()?))
}

/// Open a .docx or .odt file behind the text interface.
pub fn open_text_document<P: AsRef<Path>>(path: P) -> Result<Box<dyn TextDocument>> {
    let path = path.as_ref();
    match DocumentFormat::detect(path)? {
        #[cfg(feature = "ooxml")]
        DocumentFormat::Docx => Ok(Box::new(crate::ooxml::docx::WordDocument::open(path)?)),
        #[cfg(feature = "odf")]
        DocumentFormat::Odt => Ok(Box::new(crate::odf::odt::WriterDocument::open(path)?)),
        other => Err(Error::Unsupported(format!(
            "{:?} is not a text document format",
            other
        ))),
    }
}
