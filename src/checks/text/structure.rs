//! Outline checks: heading hierarchy, the table of contents and chapter
//! numbering.

use crate::assignment::TextAssignment;
use crate::checks::result::list_message;
use crate::checks::{Check, CheckResult};
use crate::document::{Block, IndexKind, ObjectKind, Paragraph, Section, TextDocument, TocItem};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};

const PENALTY: i32 = -5;

/// Outline levels must start at 1 and never skip a level.
pub struct DocumentStructureCheck;

impl Check<dyn TextDocument, TextAssignment> for DocumentStructureCheck {
    fn name(&self) -> &str {
        "Heading hierarchy"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        let headings = document.headings();
        if headings.is_empty() {
            return CheckResult::pass("The document has no headings.");
        }

        let mut problems = Vec::new();
        let mut last: Option<u32> = None;
        for heading in headings {
            match last {
                None if heading.level != 1 => problems.push(format!(
                    "\"{}\" is a level {} heading, the document must start with Heading 1",
                    heading.text, heading.level
                )),
                Some(previous) if heading.level > previous + 1 => problems.push(format!(
                    "\"{}\" (level {}) skips a level after level {}",
                    heading.text, heading.level, previous
                )),
                _ => {},
            }
            last = Some(heading.level);
        }
        CheckResult::from_problems(
            &problems,
            PENALTY * problems.len() as i32,
            "The heading hierarchy is broken",
            "The heading hierarchy is correct.",
        )
    }
}

/// The document headings against the list in the assignment, as multisets.
pub struct HeadingsMatchAssignmentCheck;

impl Check<dyn TextDocument, TextAssignment> for HeadingsMatchAssignmentCheck {
    fn name(&self) -> &str {
        "Headings match the assignment"
    }

    fn run(&self, document: &dyn TextDocument, assignment: &TextAssignment) -> CheckResult {
        let mut remaining: HashMap<(&str, u32), usize> = HashMap::new();
        for expected in &assignment.headlines {
            *remaining.entry((expected.text.as_str(), expected.level)).or_default() += 1;
        }

        let mut extra = Vec::new();
        for heading in document.headings() {
            match remaining.get_mut(&(heading.text.as_str(), heading.level)) {
                Some(count) if *count > 0 => *count -= 1,
                _ => extra.push(format!("{} (H{})", heading.text, heading.level)),
            }
        }
        let missing: Vec<String> = assignment
            .headlines
            .iter()
            .filter_map(|expected| {
                let count = remaining.get_mut(&(expected.text.as_str(), expected.level))?;
                (*count > 0).then(|| {
                    *count -= 1;
                    format!("{} (H{})", expected.text, expected.level)
                })
            })
            .collect();

        if missing.is_empty() && extra.is_empty() {
            return CheckResult::pass("All headings match the assignment.");
        }
        let mut parts = Vec::new();
        if !missing.is_empty() {
            parts.push(list_message("Missing headings", &missing));
        }
        if !extra.is_empty() {
            parts.push(list_message("Extra or wrong headings", &extra));
        }
        CheckResult::fail(
            parts.join("\n"),
            PENALTY * (missing.len() + extra.len()) as i32,
        )
    }
}

const SPECIAL_TITLES: [&str; 8] = [
    "obsah",
    "bibliografie",
    "seznam obrázků",
    "seznam tabulek",
    "contents",
    "bibliography",
    "list of figures",
    "list of tables",
];

/// Contents, bibliography and lists of objects are chapters without a number.
pub struct UnnumberedSpecialHeadingsCheck;

impl Check<dyn TextDocument, TextAssignment> for UnnumberedSpecialHeadingsCheck {
    fn name(&self) -> &str {
        "Special chapters are unnumbered"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        let found: BTreeSet<String> = document
            .paragraphs()
            .into_iter()
            .filter(|p| p.numbered && SPECIAL_TITLES.contains(&p.text.to_lowercase().as_str()))
            .map(|p| p.text.clone())
            .collect();
        let found: Vec<String> = found.into_iter().collect();
        CheckResult::from_problems(
            &found,
            -1,
            "Special chapters are numbered",
            "Special chapters are not numbered.",
        )
    }
}

pub struct TocExistsCheck;

impl Check<dyn TextDocument, TextAssignment> for TocExistsCheck {
    fn name(&self) -> &str {
        "Table of contents"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        if document.has_toc() {
            CheckResult::pass("The document has a table of contents.")
        } else {
            CheckResult::fail("The document has no table of contents.", -100).into_fatal()
        }
    }
}

/// The TOC must cover heading levels 1 through `max_level`.
pub struct TocHeadingLevelsCheck {
    max_level: u32,
}

impl TocHeadingLevelsCheck {
    pub fn new(max_level: u32) -> Self {
        Self { max_level }
    }
}

impl Check<dyn TextDocument, TextAssignment> for TocHeadingLevelsCheck {
    fn name(&self) -> &str {
        "Table of contents levels"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        if document.toc_instruction().is_none() {
            return CheckResult::fail("No table of contents found.", PENALTY);
        }
        match document.toc_levels() {
            Some((start, end)) if start > 1 || end < self.max_level => CheckResult::fail(
                format!(
                    "The table of contents covers levels {}-{}, expected 1-{}.",
                    start, end, self.max_level
                ),
                PENALTY,
            ),
            _ => CheckResult::pass(format!(
                "The table of contents covers heading levels 1-{}.",
                self.max_level
            )),
        }
    }
}

/// Numbered headings must keep their numbers in the TOC.
pub struct TocHeadingNumberingCheck;

impl Check<dyn TextDocument, TextAssignment> for TocHeadingNumberingCheck {
    fn name(&self) -> &str {
        "Heading numbers in the table of contents"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        let Some(shows_numbers) = document.toc_shows_numbers() else {
            return CheckResult::pass("The document has no table of contents.");
        };
        if document.heading_numbering(1).numbered && !shows_numbers {
            CheckResult::fail(
                "Headings are numbered but the table of contents hides the numbers.",
                PENALTY,
            )
        } else {
            CheckResult::pass("Heading numbering agrees with the table of contents.")
        }
    }
}

static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:\.\d+)*\.?\s*").expect("valid regex"));
static TRAILING_PAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\d+$").expect("valid regex"));

/// `1.2 Cíl práce 5` gives `Cíl práce`.
fn toc_entry_title(text: &str) -> String {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let text = LEADING_NUMBER.replace(&text, "");
    TRAILING_PAGE.replace(&text, "").trim().to_string()
}

/// Entries a bibliography field may add to the TOC on its own.
const ALLOWED_EXTRA_ENTRIES: [&str; 4] = ["bibliografie", "seznam literatury", "literatura", "bibliography"];

/// The TOC entries must list the current headings.
pub struct TocUpToDateCheck {
    max_level: u32,
}

impl TocUpToDateCheck {
    pub fn new(max_level: u32) -> Self {
        Self { max_level }
    }
}

impl Check<dyn TextDocument, TextAssignment> for TocUpToDateCheck {
    fn name(&self) -> &str {
        "Table of contents is up to date"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        if !document.has_toc() {
            return CheckResult::pass("The document has no table of contents.");
        }
        let headings: BTreeSet<String> = document
            .headings()
            .iter()
            .filter(|h| h.level <= self.max_level)
            .map(|h| toc_entry_title(&h.text))
            .collect();
        if headings.is_empty() {
            return CheckResult::pass("The document has no headings to list.");
        }

        let entries: BTreeSet<String> = document
            .paragraphs()
            .into_iter()
            .filter(|p| p.index == Some(IndexKind::Contents))
            .map(|p| toc_entry_title(&p.text))
            .filter(|t| !t.is_empty() && !matches!(t.to_lowercase().as_str(), "obsah" | "contents"))
            .collect();

        let missing: Vec<String> = headings.difference(&entries).cloned().collect();
        let extra: Vec<String> = entries
            .difference(&headings)
            .filter(|t| !ALLOWED_EXTRA_ENTRIES.contains(&t.to_lowercase().as_str()))
            .cloned()
            .collect();
        if missing.is_empty() && extra.is_empty() {
            return CheckResult::pass("The table of contents is up to date.");
        }

        let mut parts = vec!["The table of contents is probably not up to date.".to_string()];
        if !missing.is_empty() {
            parts.push(list_message("Headings missing from it", &missing));
        }
        if !extra.is_empty() {
            parts.push(list_message("Entries without a heading", &extra));
        }
        CheckResult::fail(parts.join("\n"), PENALTY)
    }
}

const TOC_ITEM_PENALTY: i32 = -10;

/// Entry titles allowed to point at a generated bibliography instead of a heading.
const BIBLIOGRAPHY_ENTRIES: [&str; 3] = ["bibliografie", "literatura", "references"];

/// The table of contents control holds only generated, linked entries.
pub struct TocIllegalContentCheck;

impl Check<dyn TextDocument, TextAssignment> for TocIllegalContentCheck {
    fn name(&self) -> &str {
        "Table of contents holds only generated entries"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        let Some(sections) = document.sections() else {
            return CheckResult::skipped("the format has no sections");
        };
        if !sections.iter().any(Section::has_toc) {
            return CheckResult::pass("The document has no table of contents.");
        }
        let Some(items) = document.toc_items() else {
            return CheckResult::fail(
                "The table of contents is damaged: its content control is missing.",
                TOC_ITEM_PENALTY,
            );
        };

        let heading_bookmarks: BTreeSet<&str> = document
            .paragraphs()
            .into_iter()
            .filter(|p| p.heading_level.is_some_and(|level| (1..=3).contains(&level)))
            .flat_map(|p| p.bookmarks.iter().map(String::as_str))
            .collect();

        let mut errors = Vec::new();
        for item in items {
            match item {
                TocItem::Table => errors.push("a table is inserted".to_string()),
                TocItem::Object(ObjectKind::Equation) => {
                    errors.push("an equation is inserted".to_string())
                },
                TocItem::Object(ObjectKind::Image | ObjectKind::Chart) => {
                    errors.push("an image or chart is inserted".to_string())
                },
                TocItem::Object(_) | TocItem::Unknown(_) => {
                    errors.push("an object that does not belong there".to_string())
                },
                TocItem::Entry { text, link: None } => {
                    if !text.is_empty() && !matches!(text.to_lowercase().as_str(), "obsah" | "contents") {
                        errors.push(format!("typed-in text \"{}\"", text));
                    }
                },
                TocItem::Entry { text, link: Some(link) } => {
                    if !link.page_ref {
                        errors.push(format!("\"{}\" has no page reference", text));
                        continue;
                    }
                    let Some(anchor) = &link.anchor else {
                        errors.push(format!("\"{}\" does not link to a heading", text));
                        continue;
                    };
                    if BIBLIOGRAPHY_ENTRIES.contains(&text.to_lowercase().as_str())
                        && !document.bibliography().present
                        && !heading_bookmarks.contains(anchor.as_str())
                    {
                        errors.push(format!("\"{}\" has no matching heading", text));
                    }
                },
            }
        }
        CheckResult::from_problems(
            &errors,
            TOC_ITEM_PENALTY * errors.len() as i32,
            "The table of contents contains invalid items",
            "The table of contents holds only valid items.",
        )
    }
}

/// Headings of the title section must stay out of the table of contents.
pub struct TocFirstSectionContentCheck;

impl Check<dyn TextDocument, TextAssignment> for TocFirstSectionContentCheck {
    fn name(&self) -> &str {
        "Table of contents skips the first section"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        let Some(sections) = document.sections() else {
            return CheckResult::skipped("the format has no sections");
        };
        let Some(toc_section) = sections.iter().find(|s| s.has_toc()) else {
            return CheckResult::pass("The document has no table of contents.");
        };
        let blocks = document.blocks();
        let entries: Vec<&str> = toc_section
            .slice(blocks)
            .iter()
            .filter_map(Block::as_paragraph)
            .filter(|p| p.index == Some(IndexKind::Contents) && p.has_text())
            .map(|p| p.text.as_str())
            .collect();
        if entries.is_empty() {
            return CheckResult::pass("The table of contents has no entries.");
        }

        let first_headings: BTreeSet<&str> = sections[0]
            .slice(blocks)
            .iter()
            .filter_map(Block::as_paragraph)
            .filter(|p| p.heading_level.is_some() && p.index.is_none() && p.has_text())
            .map(|p| p.text.as_str())
            .collect();
        let illegal: Vec<String> = entries
            .into_iter()
            .filter(|entry| first_headings.iter().any(|h| entry.contains(h)))
            .map(str::to_string)
            .collect();
        if illegal.is_empty() {
            return CheckResult::pass("The table of contents lists nothing from the first section.");
        }
        CheckResult::fail(
            list_message(
                "The table of contents lists headings from the first section",
                &illegal[..illegal.len().min(5)],
            ),
            TOC_ITEM_PENALTY * illegal.len() as i32,
        )
    }
}

/// First non-empty level 1 heading within a section, with its block index.
pub(crate) fn first_chapter<'a>(
    section: &Section,
    blocks: &'a [Block],
) -> Option<(usize, &'a Paragraph)> {
    section
        .slice(blocks)
        .iter()
        .enumerate()
        .find_map(|(i, block)| {
            block
                .as_paragraph()
                .filter(|p| p.heading_level == Some(1) && p.has_text())
                .map(|p| (i, p))
        })
}

/// Chapters in the third section continue the numbering of the second.
pub struct ChapterNumberingContinuityCheck;

impl Check<dyn TextDocument, TextAssignment> for ChapterNumberingContinuityCheck {
    fn name(&self) -> &str {
        "Chapter numbering continues across sections"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        let Some(sections) = document.sections() else {
            return CheckResult::skipped("the format has no sections");
        };
        if sections.len() < 3 {
            return CheckResult::pass("The document has no third section to compare.");
        }
        let blocks = document.blocks();
        let (Some((_, second)), Some((_, third))) = (
            first_chapter(&sections[1], blocks),
            first_chapter(&sections[2], blocks),
        ) else {
            return CheckResult::pass("A section has no chapters, continuity is not checked.");
        };
        match (&second.num_id, &third.num_id) {
            (Some(a), Some(b)) if a == b => {
                CheckResult::pass("Chapter numbering continues across sections.")
            },
            (Some(_), Some(_)) => CheckResult::fail(
                "Chapter numbering in the third section does not continue from the second.",
                PENALTY,
            ),
            _ => CheckResult::fail("Chapters are not numbered, continuity cannot hold.", PENALTY),
        }
    }
}

/// The first chapter opens the second section, with page numbering
/// restarted at 1 and nothing visible before it.
pub struct FirstChapterStartsOnPageOneCheck;

impl Check<dyn TextDocument, TextAssignment> for FirstChapterStartsOnPageOneCheck {
    fn name(&self) -> &str {
        "First chapter starts on page 1"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        let Some(sections) = document.sections() else {
            return CheckResult::skipped("the format has no sections");
        };
        let Some(section) = sections.get(1) else {
            return CheckResult::fail("The document has no second section.", PENALTY);
        };
        if section.page_number_start() != Some(1) {
            return CheckResult::fail(
                "Page numbering of the second section does not start at 1.",
                PENALTY,
            );
        }
        let blocks = document.blocks();
        let Some((position, _)) = first_chapter(section, blocks) else {
            return CheckResult::fail("The second section has no chapter.", PENALTY);
        };
        for block in &section.slice(blocks)[..position] {
            match block {
                Block::Table => {
                    return CheckResult::fail(
                        "A table precedes the first chapter of the second section.",
                        PENALTY,
                    );
                },
                Block::Paragraph(p) if p.has_text() && !p.is_toc_like() => {
                    return CheckResult::fail(
                        format!("Text precedes the first chapter of the second section: \"{}\"", p.text),
                        PENALTY,
                    );
                },
                Block::Paragraph(_) => {},
            }
        }
        CheckResult::pass("The first chapter starts on page 1 of the second section.")
    }
}
