//! Embedded objects: captions, cross-references and the list of figures.

use crate::assignment::TextAssignment;
use crate::checks::result::list_message;
use crate::checks::{Check, CheckResult};
use crate::document::{Block, IndexKind, ObjectKind, Paragraph, TextDocument};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// An object in the body and the block that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ObjectSite {
    pub kind: ObjectKind,
    pub block: usize,
}

/// Every captionable object in document order. Tables are body blocks,
/// everything else is anchored in a paragraph.
pub(crate) fn object_sites(blocks: &[Block]) -> Vec<ObjectSite> {
    let mut sites = Vec::new();
    for (block, item) in blocks.iter().enumerate() {
        match item {
            Block::Table => sites.push(ObjectSite {
                kind: ObjectKind::Table,
                block,
            }),
            Block::Paragraph(p) => sites.extend(
                p.objects
                    .iter()
                    .filter(|kind| **kind != ObjectKind::Equation)
                    .map(|&kind| ObjectSite { kind, block }),
            ),
        }
    }
    sites
}

/// Caption paragraph of an object, if one sits where captions go.
///
/// Table captions precede the table, or follow it. Other objects are
/// captioned in their own paragraph, the next one or the previous one.
pub(crate) fn caption_of<'a>(blocks: &'a [Block], site: ObjectSite) -> Option<&'a Paragraph> {
    let at = |i: Option<usize>| {
        i.and_then(|i| blocks.get(i))
            .and_then(Block::as_paragraph)
            .filter(|p| p.is_caption())
    };
    let previous = site.block.checked_sub(1);
    let next = Some(site.block + 1);
    match site.kind {
        ObjectKind::Table => at(previous).or_else(|| at(next)),
        _ => at(Some(site.block))
            .or_else(|| at(next))
            .or_else(|| at(previous)),
    }
}

fn describe(site: ObjectSite, ordinal: usize) -> String {
    format!("{} {}", site.kind, ordinal)
}

/// Sites paired with their 1-based ordinal within their own kind.
fn numbered_sites(blocks: &[Block]) -> Vec<(ObjectSite, usize)> {
    let mut counts = std::collections::HashMap::new();
    object_sites(blocks)
        .into_iter()
        .map(|site| {
            let n = counts.entry(site.kind).or_insert(0);
            *n += 1;
            (site, *n)
        })
        .collect()
}

fn has_images(document: &dyn TextDocument) -> bool {
    document
        .paragraphs()
        .iter()
        .any(|p| p.objects.contains(&ObjectKind::Image))
}

/// Field instructions of the body and of every section.
fn all_field_codes(document: &dyn TextDocument) -> Vec<&str> {
    let mut codes: Vec<&str> = document
        .paragraphs()
        .into_iter()
        .flat_map(|p| p.field_codes.iter().map(String::as_str))
        .collect();
    if let Some(sections) = document.sections() {
        codes.extend(sections.iter().flat_map(|s| s.field_codes.iter().map(String::as_str)));
    }
    codes
}

pub struct MissingListOfFiguresCheck;

impl Check<dyn TextDocument, TextAssignment> for MissingListOfFiguresCheck {
    fn name(&self) -> &str {
        "List of figures"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        if !has_images(document) {
            return CheckResult::pass("The document has no images.");
        }
        let found = all_field_codes(document)
            .into_iter()
            .any(|code| IndexKind::from_instruction(code) == Some(IndexKind::Figures));
        if found {
            CheckResult::pass("The document has a list of figures.")
        } else {
            CheckResult::fail("The document has images but no list of figures.", -100)
        }
    }
}

/// Every figure caption appears in the list of figures and every entry
/// belongs to a caption.
pub struct ListOfFiguresNotUpdatedCheck;

impl Check<dyn TextDocument, TextAssignment> for ListOfFiguresNotUpdatedCheck {
    fn name(&self) -> &str {
        "List of figures is up to date"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        let paragraphs = document.paragraphs();
        let entries: Vec<&str> = paragraphs
            .iter()
            .filter(|p| p.index == Some(IndexKind::Figures) && p.has_text())
            .map(|p| p.text.as_str())
            .collect();
        if entries.is_empty() {
            return CheckResult::pass("The document has no list of figures entries.");
        }
        let captions: Vec<&str> = paragraphs
            .iter()
            .filter(|p| p.index.is_none() && p.caption_label.as_deref() == ObjectKind::Image.caption_label())
            .map(|p| p.text.as_str())
            .collect();

        let missing = captions
            .iter()
            .filter(|c| !entries.iter().any(|e| e.contains(**c)))
            .count();
        let extra = entries
            .iter()
            .filter(|e| !captions.iter().any(|c| e.contains(*c)))
            .count();
        if missing == 0 && extra == 0 {
            return CheckResult::pass("The list of figures is up to date.");
        }

        let mut message = String::from("The list of figures is not up to date:");
        if missing > 0 {
            message.push_str(&format!("\n{} captions are missing from it.", missing));
        }
        if extra > 0 {
            message.push_str(&format!("\n{} entries match no caption.", extra));
        }
        CheckResult::fail(message, -5)
    }
}

/// Captions carry the label of their object kind.
pub struct ObjectCaptionCheck;

impl Check<dyn TextDocument, TextAssignment> for ObjectCaptionCheck {
    fn name(&self) -> &str {
        "Objects have captions"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        let blocks = document.blocks();
        let mut problems = Vec::new();
        for (site, ordinal) in numbered_sites(blocks) {
            let Some(expected) = site.kind.caption_label() else {
                continue;
            };
            match caption_of(blocks, site).and_then(|p| p.caption_label.as_deref()) {
                None => problems.push(format!("{} has no caption", describe(site, ordinal))),
                Some(label) if label != expected => problems.push(format!(
                    "{} is captioned as \"{}\", expected \"{}\"",
                    describe(site, ordinal),
                    label,
                    expected
                )),
                Some(_) => {},
            }
        }
        CheckResult::from_problems(
            &problems,
            -2 * problems.len() as i32,
            "Objects without a proper caption",
            "Every object has a caption.",
        )
    }
}

/// Every captioned object is referenced from the text.
pub struct ObjectCrossReferenceCheck;

impl Check<dyn TextDocument, TextAssignment> for ObjectCrossReferenceCheck {
    fn name(&self) -> &str {
        "Objects are cross-referenced"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        let blocks = document.blocks();
        let references: HashSet<&str> = document
            .paragraphs()
            .into_iter()
            .flat_map(|p| p.references.iter().map(String::as_str))
            .collect();

        let mut problems = Vec::new();
        for (site, ordinal) in numbered_sites(blocks) {
            let Some(caption) = caption_of(blocks, site) else {
                continue;
            };
            let referenced = caption
                .bookmarks
                .iter()
                .any(|b| references.contains(b.as_str()));
            if !referenced {
                problems.push(format!(
                    "{} is not referenced in the text",
                    describe(site, ordinal)
                ));
            }
        }
        CheckResult::from_problems(
            &problems,
            -(problems.len() as i32),
            "Objects without a cross-reference",
            "Every captioned object is cross-referenced.",
        )
    }
}

static CAPTION_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(obrázek|tabulka|graf)\s+\d+\s*[:\-]?\s*").expect("valid regex")
});

fn normalize_caption(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Caption texts match the assignment, object by object within each kind.
pub struct ObjectCaptionTextCheck;

impl Check<dyn TextDocument, TextAssignment> for ObjectCaptionTextCheck {
    fn name(&self) -> &str {
        "Caption texts match the assignment"
    }

    fn run(&self, document: &dyn TextDocument, assignment: &TextAssignment) -> CheckResult {
        if assignment.objects.is_empty() {
            return CheckResult::pass("The assignment lists no objects.");
        }
        let blocks = document.blocks();
        let sites = object_sites(blocks);

        let mut problems = Vec::new();
        for kind in [ObjectKind::Image, ObjectKind::Chart, ObjectKind::Table] {
            let expected: Vec<_> = assignment.objects_of(kind).collect();
            let found: Vec<ObjectSite> = sites.iter().copied().filter(|s| s.kind == kind).collect();
            if found.len() < expected.len() {
                problems.push(format!(
                    "the document has {} {} objects, the assignment expects {}",
                    found.len(),
                    kind,
                    expected.len()
                ));
            }
            for (i, (object, site)) in expected.iter().zip(&found).enumerate() {
                let Some(caption) = caption_of(blocks, *site) else {
                    problems.push(format!("{} {} has no caption", kind, i + 1));
                    continue;
                };
                let text = CAPTION_PREFIX.replace(&caption.text, "");
                if normalize_caption(&text) != normalize_caption(&object.caption) {
                    problems.push(format!(
                        "{} {}: expected \"{}\", found \"{}\"",
                        kind,
                        i + 1,
                        object.caption,
                        text.trim()
                    ));
                }
            }
        }
        if problems.is_empty() {
            CheckResult::pass("All caption texts match the assignment.")
        } else {
            CheckResult::fail(
                list_message("Caption texts differ from the assignment", &problems),
                -5 * problems.len() as i32,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::text::fixture::{FakeText, para};

    fn image() -> Paragraph {
        Paragraph {
            objects: vec![ObjectKind::Image],
            ..para("")
        }
    }

    fn caption(label: &str, text: &str, bookmark: &str) -> Paragraph {
        Paragraph {
            caption_label: Some(label.to_string()),
            bookmarks: vec![bookmark.to_string()],
            ..para(text)
        }
    }

    fn reference(text: &str, bookmark: &str) -> Paragraph {
        Paragraph {
            references: vec![bookmark.to_string()],
            ..para(text)
        }
    }

    fn figures_entry(text: &str) -> Paragraph {
        Paragraph {
            index: Some(IndexKind::Figures),
            ..para(text)
        }
    }

    fn sample() -> FakeText {
        FakeText::default()
            .paragraph(reference("Viz Obrázek 1 a Tabulka 1.", "_Ref1"))
            .paragraph(image())
            .paragraph(caption("Obrázek", "Obrázek 1: Graf prodeje", "_Ref1"))
            .paragraph(caption("Tabulka", "Tabulka 1 - Výsledky", "_Ref2"))
            .table()
    }

    #[test]
    fn test_caption_lookup() {
        let doc = sample();
        let sites = object_sites(&doc.blocks);
        assert_eq!(sites.len(), 2);
        assert_eq!(caption_of(&doc.blocks, sites[0]).unwrap().text, "Obrázek 1: Graf prodeje");
        assert_eq!(caption_of(&doc.blocks, sites[1]).unwrap().text, "Tabulka 1 - Výsledky");
    }

    #[test]
    fn test_captions_and_references() {
        let a = TextAssignment::default();
        let doc = sample();
        assert!(ObjectCaptionCheck.run(&doc, &a).passed);

        let result = ObjectCrossReferenceCheck.run(&doc, &a);
        assert_eq!(result.points, -1);
        assert_eq!(
            result.message,
            "Objects without a cross-reference:\n- table 1 is not referenced in the text"
        );

        let wrong = FakeText::default()
            .paragraph(image())
            .paragraph(caption("Tabulka", "Tabulka 1", "_Ref3"))
            .paragraph(image());
        let result = ObjectCaptionCheck.run(&wrong, &a);
        assert_eq!(result.points, -4);
        assert!(result.message.contains("image 1 is captioned as \"Tabulka\""));
        assert!(result.message.contains("image 2 is captioned as \"Tabulka\""));
    }

    #[test]
    fn test_list_of_figures() {
        let a = TextAssignment::default();
        let doc = sample();
        assert!(!MissingListOfFiguresCheck.run(&doc, &a).passed);
        assert!(ListOfFiguresNotUpdatedCheck.run(&doc, &a).passed);

        let doc = sample()
            .paragraph(Paragraph {
                field_codes: vec![r#"TOC \h \z \c "Obrázek""#.to_string()],
                ..figures_entry("Obrázek 1: Graf tržeb 3")
            });
        assert!(MissingListOfFiguresCheck.run(&doc, &a).passed);
        let result = ListOfFiguresNotUpdatedCheck.run(&doc, &a);
        assert!(result.message.contains("1 captions are missing"));
        assert!(result.message.contains("1 entries match no caption"));

        let doc = sample().paragraph(figures_entry("Obrázek 1: Graf prodeje 3"));
        assert!(ListOfFiguresNotUpdatedCheck.run(&doc, &a).passed);
    }

    #[test]
    fn test_caption_text() {
        let a = TextAssignment::from_json(
            r#"{"objects": [
                {"type": "image", "caption": "graf  prodeje"},
                {"type": "table", "caption": "Souhrn"}
            ]}"#,
        )
        .unwrap();
        let result = ObjectCaptionTextCheck.run(&sample(), &a);
        assert_eq!(result.points, -5);
        assert!(result.message.contains("table 1: expected \"Souhrn\", found \"Výsledky\""));
    }
}
