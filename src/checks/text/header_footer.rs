//! Headers and footers per section.
//!
//! The front matter has empty parts, later sections have their own (not
//! linked) parts with a page number in the footer.

use crate::assignment::TextAssignment;
use crate::checks::{Check, CheckResult};
use crate::document::{HeaderFooterState, Section, TextDocument};

const PENALTY: i32 = -2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Header,
    Footer,
}

impl Part {
    fn of(self, section: &Section) -> HeaderFooterState {
        match self {
            Self::Header => section.header(),
            Self::Footer => section.footer(),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Footer => "footer",
        }
    }
}

/// Looks up section `number` (1-based) and hands it to `test`.
fn with_section(
    document: &dyn TextDocument,
    number: usize,
    penalty: i32,
    test: impl FnOnce(&Section) -> CheckResult,
) -> CheckResult {
    let Some(sections) = document.sections() else {
        return CheckResult::skipped("the format has no sections");
    };
    match sections.get(number.saturating_sub(1)) {
        Some(section) if number > 0 => test(section),
        _ => CheckResult::fail(format!("Section {} does not exist.", number), penalty),
    }
}

/// The header or footer of a section must be its own, not linked to the
/// previous section.
pub struct NotLinkedToPreviousCheck {
    part: Part,
    section: usize,
    name: String,
}

impl NotLinkedToPreviousCheck {
    pub fn new(part: Part, section: usize) -> Self {
        Self {
            part,
            section,
            name: format!("Section {} {} not linked to previous", section, part.as_str()),
        }
    }

    pub fn header(section: usize) -> Self {
        Self::new(Part::Header, section)
    }

    pub fn footer(section: usize) -> Self {
        Self::new(Part::Footer, section)
    }
}

impl Check<dyn TextDocument, TextAssignment> for NotLinkedToPreviousCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        with_section(document, self.section, PENALTY, |section| {
            if self.part.of(section).is_inherited() {
                CheckResult::fail(
                    format!(
                        "The {} of section {} is linked to the previous section.",
                        self.part.as_str(),
                        self.section
                    ),
                    PENALTY,
                )
            } else {
                CheckResult::pass(format!(
                    "The {} of section {} is not linked to the previous section.",
                    self.part.as_str(),
                    self.section
                ))
            }
        })
    }
}

/// The header or footer of a section shows nothing.
pub struct SectionPartEmptyCheck {
    part: Part,
    section: usize,
    name: String,
}

impl SectionPartEmptyCheck {
    pub fn new(part: Part, section: usize) -> Self {
        Self {
            part,
            section,
            name: format!("Section {} {} is empty", section, part.as_str()),
        }
    }

    pub fn header(section: usize) -> Self {
        Self::new(Part::Header, section)
    }

    pub fn footer(section: usize) -> Self {
        Self::new(Part::Footer, section)
    }
}

impl Check<dyn TextDocument, TextAssignment> for SectionPartEmptyCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        with_section(document, self.section, PENALTY, |section| {
            if self.part.of(section).has_content() {
                CheckResult::fail(
                    format!(
                        "The {} of section {} is not empty.",
                        self.part.as_str(),
                        self.section
                    ),
                    PENALTY,
                )
            } else {
                CheckResult::pass(format!(
                    "The {} of section {} is empty.",
                    self.part.as_str(),
                    self.section
                ))
            }
        })
    }
}

pub struct SectionFooterHasPageNumberCheck {
    section: usize,
    name: String,
}

impl SectionFooterHasPageNumberCheck {
    pub fn new(section: usize) -> Self {
        Self {
            section,
            name: format!("Section {} footer has a page number", section),
        }
    }
}

impl Check<dyn TextDocument, TextAssignment> for SectionFooterHasPageNumberCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        with_section(document, self.section, PENALTY, |section| {
            if section.footer().has_page_field() {
                CheckResult::pass(format!(
                    "The footer of section {} contains a page number.",
                    self.section
                ))
            } else {
                CheckResult::fail(
                    format!(
                        "The footer of section {} contains no page number.",
                        self.section
                    ),
                    PENALTY,
                )
            }
        })
    }
}

/// The chapter section carries a running header with text.
pub struct SecondSectionHeaderHasTextCheck;

impl Check<dyn TextDocument, TextAssignment> for SecondSectionHeaderHasTextCheck {
    fn name(&self) -> &str {
        "Section 2 header has text"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        let Some(sections) = document.sections() else {
            return CheckResult::skipped("the format has no sections");
        };
        let Some(section) = sections.get(1) else {
            return CheckResult::pass("The document has no second section.");
        };
        if section.header().has_text() {
            CheckResult::pass("The header of section 2 contains text.")
        } else {
            CheckResult::fail("The header of section 2 contains no text.", PENALTY)
        }
    }
}

pub struct SecondSectionPageNumberStartsAtOneCheck;

impl Check<dyn TextDocument, TextAssignment> for SecondSectionPageNumberStartsAtOneCheck {
    fn name(&self) -> &str {
        "Section 2 page numbering starts at 1"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        let Some(sections) = document.sections() else {
            return CheckResult::skipped("the format has no sections");
        };
        let Some(section) = sections.get(1) else {
            return CheckResult::pass("The document has no second section.");
        };
        match section.page_number_start() {
            Some(1) => CheckResult::pass("Page numbering of section 2 starts at 1."),
            Some(n) => CheckResult::fail(
                format!("Page numbering of section 2 starts at {}, expected 1.", n),
                -5,
            ),
            None => CheckResult::fail("Page numbering of section 2 does not restart.", -5),
        }
    }
}

/// No section has any header or footer content at all.
pub struct HeaderFooterMissingCheck;

impl Check<dyn TextDocument, TextAssignment> for HeaderFooterMissingCheck {
    fn name(&self) -> &str {
        "Headers and footers"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        let Some(sections) = document.sections() else {
            return CheckResult::skipped("the format has no sections");
        };
        let any = sections
            .iter()
            .any(|s| s.header().has_content() || s.footer().has_content());
        if any {
            CheckResult::pass("The document has headers or footers.")
        } else {
            CheckResult::fail("The document has no header or footer content.", -30)
        }
    }
}
