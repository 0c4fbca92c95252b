//! Generated bibliography: presence, freshness and citation style.

use crate::assignment::TextAssignment;
use crate::checks::{Check, CheckResult};
use crate::document::TextDocument;
use once_cell::sync::Lazy;
use regex::Regex;

fn has_bibliography(document: &dyn TextDocument) -> bool {
    match document.sections() {
        Some(sections) => sections.last().is_some_and(|s| s.has_bibliography),
        None => document.bibliography().present,
    }
}

/// The bibliography closes the document.
pub struct MissingBibliographyCheck;

impl Check<dyn TextDocument, TextAssignment> for MissingBibliographyCheck {
    fn name(&self) -> &str {
        "Bibliography"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        if has_bibliography(document) {
            CheckResult::pass("The document has a bibliography.")
        } else {
            CheckResult::fail("The bibliography is missing.", -100)
        }
    }
}

/// A stale bibliography lists fewer entries than there are citations.
pub struct BibliographyNotUpdatedCheck;

impl Check<dyn TextDocument, TextAssignment> for BibliographyNotUpdatedCheck {
    fn name(&self) -> &str {
        "Bibliography is up to date"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        let bibliography = document.bibliography();
        if bibliography.citations == 0 {
            return CheckResult::pass("The document has no citations.");
        }
        if !bibliography.present {
            return CheckResult::pass("The document has no bibliography to update.");
        }
        let items = bibliography.items.len();
        if items < bibliography.citations {
            CheckResult::fail(
                format!(
                    "The bibliography is not up to date ({} citations, {} entries).",
                    bibliography.citations, items
                ),
                -5,
            )
        } else {
            CheckResult::pass("The bibliography covers every citation.")
        }
    }
}

static ENTRY_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d+\.\s*").expect("valid regex"));
static AUTHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\p{Lu}[\p{L}\-]+,\s*\p{Lu}").expect("valid regex")
});
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:19|20)\d{2}").expect("valid regex"));
static CITED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[cit\.\s*\d{4}-\d{2}-\d{2}\]").expect("valid regex"));

/// Heuristic ISO 690 shape: `SURNAME, Name. Title. Place: Publisher, year.`
/// and for online sources the URL with a `[cit. yyyy-mm-dd]` access date.
pub(crate) fn looks_like_iso690(entry: &str) -> bool {
    let entry = ENTRY_NUMBER.replace(entry, "");
    let entry = entry.trim();
    let lower = entry.to_lowercase();

    let has_author = AUTHOR.is_match(entry);
    let has_year = YEAR.is_match(entry);
    let has_url = lower.contains("http://") || lower.contains("https://");
    let has_cited = CITED.is_match(&lower);
    if has_url || has_cited || lower.contains("[online]") {
        return has_author && has_year && has_url && has_cited;
    }
    has_author && has_year && entry.contains(':') && entry.contains(',')
}

const ISO690_RATIO: f64 = 0.7;

pub struct BibliographyIso690Check;

impl Check<dyn TextDocument, TextAssignment> for BibliographyIso690Check {
    fn name(&self) -> &str {
        "Bibliography follows ISO 690"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        let bibliography = document.bibliography();
        if !bibliography.present {
            return CheckResult::pass("The document has no bibliography.");
        }
        let items: Vec<&str> = bibliography
            .items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if items.is_empty() {
            return CheckResult::pass("The bibliography has no entries.");
        }
        let matching = items.iter().filter(|item| looks_like_iso690(item)).count();
        if (matching as f64) / (items.len() as f64) < ISO690_RATIO {
            CheckResult::fail(
                format!(
                    "The bibliography does not follow ISO 690 ({} of {} entries match).",
                    matching,
                    items.len()
                ),
                -10,
            )
        } else {
            CheckResult::pass("The bibliography follows ISO 690.")
        }
    }
}
