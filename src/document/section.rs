//! Document sections and their page setup.

use super::types::{Block, IndexKind};
use std::ops::Range;

/// What a section shows in its header or footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFooterState {
    /// No own header/footer: continues the previous section's
    Inherited,
    /// Own part without visible text, fields or drawings
    Empty,
    /// Own part with content
    Content {
        has_text: bool,
        has_page_field: bool,
    },
}

impl HeaderFooterState {
    /// Linked to the previous section.
    pub fn is_inherited(self) -> bool {
        matches!(self, Self::Inherited)
    }

    pub fn has_content(self) -> bool {
        matches!(self, Self::Content { .. })
    }

    pub fn has_text(self) -> bool {
        matches!(self, Self::Content { has_text: true, .. })
    }

    pub fn has_page_field(self) -> bool {
        matches!(
            self,
            Self::Content {
                has_page_field: true,
                ..
            }
        )
    }
}

/// Page setup carried by a section break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionProperties {
    pub header: HeaderFooterState,
    pub footer: HeaderFooterState,
    /// Restarted page numbering (`pgNumType/@start`)
    pub page_number_start: Option<u32>,
}

/// A contiguous run of body blocks ending at a section break.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Blocks of this section, as indexes into the document's block list
    pub blocks: Range<usize>,
    /// Missing for a trailing remainder without its own section break
    pub properties: Option<SectionProperties>,
    /// Field instructions found anywhere in the section
    pub field_codes: Vec<String>,
    /// Any non-blank text run
    pub has_text: bool,
    /// Contains a generated bibliography
    pub has_bibliography: bool,
}

impl Section {
    fn has_index(&self, kind: IndexKind) -> bool {
        self.field_codes
            .iter()
            .any(|code| IndexKind::from_instruction(code) == Some(kind))
    }

    /// Table of contents over headings (`TOC \o`).
    pub fn has_toc(&self) -> bool {
        self.field_codes.iter().any(|code| {
            let upper = code.to_uppercase();
            upper.starts_with("TOC") && upper.contains("\\O")
        })
    }

    /// Any list built from captions or styles (`TOC \t` or `TOC \c`).
    pub fn has_object_list(&self) -> bool {
        self.field_codes.iter().any(|code| {
            let upper = code.to_uppercase();
            upper.starts_with("TOC") && (upper.contains("\\T") || upper.contains("\\C"))
        })
    }

    pub fn has_list_of_figures(&self) -> bool {
        self.has_index(IndexKind::Figures)
    }

    pub fn has_list_of_tables(&self) -> bool {
        self.has_index(IndexKind::Tables)
    }

    pub fn header(&self) -> HeaderFooterState {
        self.properties
            .as_ref()
            .map_or(HeaderFooterState::Inherited, |p| p.header)
    }

    pub fn footer(&self) -> HeaderFooterState {
        self.properties
            .as_ref()
            .map_or(HeaderFooterState::Inherited, |p| p.footer)
    }

    pub fn page_number_start(&self) -> Option<u32> {
        self.properties.as_ref().and_then(|p| p.page_number_start)
    }

    /// Blocks of this section within the document's block list.
    pub fn slice<'a>(&self, blocks: &'a [Block]) -> &'a [Block] {
        blocks.get(self.blocks.clone()).unwrap_or(&[])
    }
}
