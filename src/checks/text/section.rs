//! Thesis layout by section: front matter with the TOC, chapters, then the
//! lists of objects and the bibliography.

use crate::assignment::TextAssignment;
use crate::checks::{Check, CheckResult};
use crate::document::{Block, Section, TextDocument};

const PENALTY: i32 = -5;

pub struct SectionCountCheck;

impl Check<dyn TextDocument, TextAssignment> for SectionCountCheck {
    fn name(&self) -> &str {
        "Number of sections"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        let Some(sections) = document.sections() else {
            return CheckResult::skipped("the format has no sections");
        };
        match sections.len() {
            0 | 1 => CheckResult::fail("The document is not divided into sections.", -100)
                .into_fatal(),
            n @ 2 => CheckResult::fail(
                format!("The document has {} sections, at least 3 are required.", n),
                -10,
            ),
            n => CheckResult::pass(format!("The document has {} sections.", n)),
        }
    }
}

/// Shared shape of the per-section content checks.
fn check_section(
    document: &dyn TextDocument,
    number: usize,
    what: &str,
    test: impl Fn(&Section) -> bool,
) -> CheckResult {
    let Some(sections) = document.sections() else {
        return CheckResult::skipped("the format has no sections");
    };
    match sections.get(number - 1) {
        None => CheckResult::fail(format!("Section {} does not exist.", number), PENALTY),
        Some(section) if test(section) => {
            CheckResult::pass(format!("Section {} contains {}.", number, what))
        },
        Some(_) => CheckResult::fail(
            format!("Section {} does not contain {}.", number, what),
            PENALTY,
        ),
    }
}

pub struct Section1TocCheck;

impl Check<dyn TextDocument, TextAssignment> for Section1TocCheck {
    fn name(&self) -> &str {
        "Section 1 contains the table of contents"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        check_section(document, 1, "the table of contents", Section::has_toc)
    }
}

pub struct Section2TextCheck;

impl Check<dyn TextDocument, TextAssignment> for Section2TextCheck {
    fn name(&self) -> &str {
        "Section 2 contains text"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        check_section(document, 2, "text", |s| s.has_text)
    }
}

pub struct Section3FigureListCheck;

impl Check<dyn TextDocument, TextAssignment> for Section3FigureListCheck {
    fn name(&self) -> &str {
        "Section 3 contains the list of figures"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        check_section(document, 3, "a list of figures", Section::has_list_of_figures)
    }
}

/// Only required when the document has a table.
pub struct Section3TableListCheck;

impl Check<dyn TextDocument, TextAssignment> for Section3TableListCheck {
    fn name(&self) -> &str {
        "Section 3 contains the list of tables"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        if !document.blocks().iter().any(|b| matches!(b, Block::Table)) {
            return CheckResult::pass("The document has no tables.");
        }
        check_section(document, 3, "a list of tables", Section::has_list_of_tables)
    }
}

pub struct Section3BibliographyCheck;

impl Check<dyn TextDocument, TextAssignment> for Section3BibliographyCheck {
    fn name(&self) -> &str {
        "Section 3 contains the bibliography"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        check_section(document, 3, "the bibliography", |s| s.has_bibliography)
    }
}
