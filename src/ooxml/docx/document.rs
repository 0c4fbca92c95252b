//! WordDocument - a loaded .docx behind the [`TextDocument`] interface.

use super::body::BodyReader;
use super::numbering::Numbering;
use super::section::SectionResolver;
use super::styles::Styles;
use crate::common::{DocumentFormat, Error, Package, Result};
use crate::document::{
    Bibliography, Block, Heading, HeadingNumbering, Section, StyleInfo, TextDocument, TocItem,
};
use crate::ooxml::namespaces::{W, part};
use crate::ooxml::opc::{PackURI, Relationships};
use crate::style::StyleSpec;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::debug;

/// A Word document, fully read at load time.
///
/// # Examples
///
/// ```rust,no_run
/// use docgrade::document::TextDocument;
/// use docgrade::ooxml::docx::WordDocument;
///
/// let doc = WordDocument::open("thesis.docx")?;
/// if let Some(normal) = doc.normal_style() {
///     println!("Normal: {:?} {:?}pt", normal.font, normal.size);
/// }
/// println!("{} sections", doc.sections().map_or(0, |s| s.len()));
/// # Ok::<(), docgrade::common::Error>(())
/// ```
pub struct WordDocument {
    styles: Styles,
    numbering: Numbering,
    blocks: Vec<Block>,
    headings: Vec<Heading>,
    sections: Vec<Section>,
    bibliography: Bibliography,
    html_artifacts: bool,
    toc_items: Option<Vec<TocItem>>,
}

impl WordDocument {
    /// Open a .docx file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let package = Package::open(path)?;
        Self::from_package(&package)
    }

    /// Load from any seekable reader holding a .docx archive.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let package = Package::from_reader(reader)?;
        Self::from_package(&package)
    }

    fn from_package<R: Read + Seek>(package: &Package<R>) -> Result<Self> {
        let main = PackURI::new(part::WORD_DOCUMENT)?;
        let root = package.xml_part(main.membername())?;
        let body = root
            .child(W, "body")
            .ok_or_else(|| Error::CorruptedFile("word/document.xml has no w:body".to_string()))?;

        let styles = package
            .optional_xml_part(part::WORD_STYLES)?
            .map(|root| Styles::from_xml(&root))
            .unwrap_or_default();
        let numbering = package
            .optional_xml_part(part::WORD_NUMBERING)?
            .map(|root| Numbering::from_xml(&root))
            .unwrap_or_default();
        let rels = Relationships::load(package, &main)?;

        let content = BodyReader::new(&styles).read(body);
        let mut resolver = SectionResolver::new(package, &rels);
        let sections: Vec<Section> = content
            .sections
            .into_iter()
            .map(|draft| Section {
                properties: draft.sect_pr.as_ref().map(|s| resolver.resolve(s)),
                blocks: draft.blocks,
                field_codes: draft.field_codes,
                has_text: draft.has_text,
                has_bibliography: draft.has_bibliography,
            })
            .collect();

        let headings: Vec<Heading> = content
            .blocks
            .iter()
            .filter_map(Block::as_paragraph)
            .filter(|p| !p.in_content_control && p.has_text())
            .filter_map(|p| p.heading_level.map(|level| Heading::new(p.text.clone(), level)))
            .collect();

        debug!(
            styles = styles.len(),
            blocks = content.blocks.len(),
            headings = headings.len(),
            sections = sections.len(),
            "loaded word document"
        );

        Ok(Self {
            styles,
            numbering,
            blocks: content.blocks,
            headings,
            sections,
            bibliography: content.bibliography,
            html_artifacts: content.html_artifacts,
            toc_items: content.toc_items,
        })
    }

    /// The style table.
    pub fn styles(&self) -> &Styles {
        &self.styles
    }

    pub fn numbering(&self) -> &Numbering {
        &self.numbering
    }
}

impl TextDocument for WordDocument {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Docx
    }

    fn normal_style(&self) -> Option<StyleSpec> {
        self.styles
            .default_paragraph()
            .map(|s| self.styles.resolve(s, Some("both")))
    }

    fn heading_style(&self, level: u32) -> Option<StyleSpec> {
        self.styles
            .find(&format!("heading {}", level))
            .map(|s| self.styles.resolve(s, Some("start")))
    }

    fn style_by_any_name(&self, names: &[&str], default_alignment: Option<&str>) -> Option<StyleSpec> {
        names
            .iter()
            .find_map(|name| self.styles.find(name))
            .map(|s| self.styles.resolve(s, default_alignment))
    }

    fn doc_default_font_size(&self) -> Option<f64> {
        self.styles.doc_default_size()
    }

    fn style_info(&self, name: &str) -> Option<StyleInfo> {
        self.styles.find(name).map(|s| self.styles.info(s))
    }

    fn heading_numbering(&self, level: u32) -> HeadingNumbering {
        let Some((num_id, ilvl)) = self
            .styles
            .find(&format!("heading {}", level))
            .and_then(|s| self.styles.num_pr(s))
            .filter(|&(num_id, _)| num_id > 0)
        else {
            return HeadingNumbering::default();
        };
        match self.numbering.level(num_id, ilvl) {
            Some(lvl) => HeadingNumbering {
                numbered: lvl.is_numbered(),
                hierarchical: lvl.is_hierarchical(level),
                level: Some(ilvl),
            },
            None => {
                debug!(num_id, ilvl, "heading numbering definition not found");
                HeadingNumbering {
                    numbered: true,
                    hierarchical: false,
                    level: Some(ilvl),
                }
            },
        }
    }

    fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn headings(&self) -> &[Heading] {
        &self.headings
    }

    fn has_html_artifacts(&self) -> bool {
        self.html_artifacts
    }

    fn bibliography(&self) -> &Bibliography {
        &self.bibliography
    }

    fn sections(&self) -> Option<&[Section]> {
        Some(&self.sections)
    }

    fn toc_items(&self) -> Option<&[TocItem]> {
        self.toc_items.as_deref()
    }
}
