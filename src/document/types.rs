//! Format-neutral content types produced by the text adapters.

use crate::style::TabStops;
use serde::Deserialize;

/// A heading found in the document body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Heading {
    /// Visible text, whitespace collapsed and trimmed
    pub text: String,
    /// Outline level, 1-based
    pub level: u32,
}

impl Heading {
    pub fn new(text: impl Into<String>, level: u32) -> Self {
        Self {
            text: text.into(),
            level,
        }
    }
}

/// Numbering of one heading level as defined by the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadingNumbering {
    pub numbered: bool,
    /// Every ancestor level appears in the number (1.1.1)
    pub hierarchical: bool,
    /// Zero-based list level the heading is bound to
    pub level: Option<u32>,
}

/// Identity and declared relations of a named style.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleInfo {
    /// Internal identifier (`w:styleId` or `style:name`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Display name of the parent style
    pub parent: Option<String>,
    /// Tab stops declared directly on this style, not inherited
    pub own_tabs: Option<TabStops>,
}

/// Kind of an embedded object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Image,
    Chart,
    #[serde(alias = "formula")]
    Equation,
    Table,
}

impl ObjectKind {
    /// Caption label expected for this object kind.
    pub fn caption_label(self) -> Option<&'static str> {
        match self {
            Self::Image => Some("Obrázek"),
            Self::Chart => Some("Graf"),
            Self::Table => Some("Tabulka"),
            Self::Equation => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Chart => "chart",
            Self::Equation => "equation",
            Self::Table => "table",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generated index a paragraph belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Table of contents built from the outline
    Contents,
    /// List of figures
    Figures,
    /// List of tables
    Tables,
    /// Any other generated list (e.g. by style or custom label)
    Other,
}

impl IndexKind {
    /// Classify a field instruction. Returns `None` for non-index fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use docgrade::document::IndexKind;
    ///
    /// assert_eq!(IndexKind::from_instruction(r#"TOC \o "1-3" \h"#), Some(IndexKind::Contents));
    /// assert_eq!(IndexKind::from_instruction(r#"TOC \h \c "Obrázek""#), Some(IndexKind::Figures));
    /// assert_eq!(IndexKind::from_instruction("PAGE"), None);
    /// ```
    pub fn from_instruction(instruction: &str) -> Option<Self> {
        let upper = instruction.trim().to_uppercase();
        if !upper.starts_with("TOC") {
            return None;
        }
        let by_label = upper.contains("\\C") || upper.contains("\\T");
        if by_label && (upper.contains("OBRÁZEK") || upper.contains("FIGURE")) {
            Some(Self::Figures)
        } else if by_label && (upper.contains("TABULKA") || upper.contains("TABLE")) {
            Some(Self::Tables)
        } else if upper.contains("\\O") {
            Some(Self::Contents)
        } else {
            Some(Self::Other)
        }
    }
}

/// A body paragraph with everything the checks ask about it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    /// Visible text, whitespace collapsed and trimmed
    pub text: String,
    /// Visible text with tabs, line breaks and repeated spaces preserved
    pub raw_text: String,
    pub style_id: Option<String>,
    pub style_name: Option<String>,
    /// Outline level when the paragraph is a heading
    pub heading_level: Option<u32>,
    pub numbered: bool,
    /// Numbering instance the paragraph is bound to at list level 0
    pub num_id: Option<String>,
    pub page_break_before: bool,
    pub spacing_before: bool,
    /// Generated index (TOC, list of figures) this paragraph is an entry of
    pub index: Option<IndexKind>,
    /// Inside a content control or similar wrapper rather than directly in the body
    pub in_content_control: bool,
    /// Field instructions completed in this paragraph
    pub field_codes: Vec<String>,
    /// Embedded drawings and equations
    pub objects: Vec<ObjectKind>,
    /// Label of a sequence field (`SEQ Obrázek`), when this is a caption
    pub caption_label: Option<String>,
    /// Bookmarks started in this paragraph
    pub bookmarks: Vec<String>,
    /// Bookmarks referenced from this paragraph (hyperlink anchors, REF fields)
    pub references: Vec<String>,
    /// Character properties set directly on text runs
    pub direct_formatting: Vec<&'static str>,
}

impl Paragraph {
    /// Paragraph without visible text or embedded objects.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.objects.is_empty()
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    /// Part of a generated index, or carrying page references like index entries do.
    pub fn is_toc_like(&self) -> bool {
        self.index.is_some()
            || self.field_codes.iter().any(|code| {
                let upper = code.to_uppercase();
                upper.starts_with("TOC") || upper.contains("PAGEREF")
            })
    }

    pub fn is_caption(&self) -> bool {
        self.caption_label.is_some()
    }
}

/// Body-level building block in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table,
}

impl Block {
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Self::Paragraph(p) => Some(p),
            Self::Table => None,
        }
    }
}

/// Hyperlink wrapping a table of contents entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TocLink {
    /// Bookmark the entry jumps to
    pub anchor: Option<String>,
    /// The entry carries a `PAGEREF` field
    pub page_ref: bool,
}

/// One top-level element inside the table of contents content control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TocItem {
    /// A paragraph. Generated entries are wrapped in a hyperlink, typed-in
    /// text is not.
    Entry { text: String, link: Option<TocLink> },
    Table,
    Object(ObjectKind),
    /// Any other element, by local name
    Unknown(String),
}

/// Bibliography and citation summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bibliography {
    /// A generated bibliography exists
    pub present: bool,
    /// Number of citation fields in the text
    pub citations: usize,
    /// Entries of the generated bibliography
    pub items: Vec<String>,
}
