//! Checks of the style table: built-in styles, custom styles and how they
//! are used in the body.

use crate::assignment::TextAssignment;
use crate::checks::{Check, CheckResult};
use crate::document::TextDocument;
use crate::style::spec::show_tabs;
use crate::style::{DiffOptions, TabStop};
use std::collections::HashSet;

const STYLE_PENALTY: i32 = -5;
const CUSTOM_STYLE_PENALTY: i32 = -2;
/// Tab positions of custom styles may differ by this many twips.
const TAB_POSITION_TOLERANCE: i64 = 10;

fn style_result(label: &str, diffs: &[String]) -> CheckResult {
    CheckResult::from_problems(
        diffs,
        STYLE_PENALTY,
        &format!("Style {} does not match the assignment", label),
        &format!("Style {} matches the assignment.", label),
    )
}

fn not_required(label: &str) -> CheckResult {
    CheckResult::pass(format!("The assignment does not define style {}.", label))
}

/// The default paragraph style.
pub struct NormalStyleCheck {
    options: DiffOptions,
}

impl NormalStyleCheck {
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }
}

impl Check<dyn TextDocument, TextAssignment> for NormalStyleCheck {
    fn name(&self) -> &str {
        "Normal style"
    }

    fn run(&self, document: &dyn TextDocument, assignment: &TextAssignment) -> CheckResult {
        let Some(expected) = assignment.style("Normal") else {
            return not_required("Normal");
        };
        let Some(actual) = document.normal_style() else {
            return CheckResult::fail("Style Normal was not found.", STYLE_PENALTY);
        };
        let options = self
            .options
            .clone()
            .with_doc_default_size(document.doc_default_font_size());
        style_result("Normal", &actual.diff(expected, &options))
    }
}

/// A built-in heading style, including its outline numbering when the
/// assignment asks for a numbering level.
pub struct HeadingStyleCheck {
    level: u32,
    name: String,
    options: DiffOptions,
}

impl HeadingStyleCheck {
    pub fn new(level: u32, options: DiffOptions) -> Self {
        Self {
            level,
            name: format!("Heading {} style", level),
            options: options.with_ignore_fields(["name", "numLevel"]),
        }
    }
}

impl Check<dyn TextDocument, TextAssignment> for HeadingStyleCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, document: &dyn TextDocument, assignment: &TextAssignment) -> CheckResult {
        let label = format!("Heading {}", self.level);
        let Some(expected) = assignment.style(&label) else {
            return not_required(&label);
        };
        let Some(actual) = document.heading_style(self.level) else {
            return CheckResult::fail(
                format!("Style {} does not exist in the document.", label),
                STYLE_PENALTY,
            );
        };

        let options = self
            .options
            .clone()
            .with_doc_default_size(document.doc_default_font_size());
        let mut diffs = actual.diff(expected, &options);

        if let Some(expected_level) = expected.num_level {
            let numbering = document.heading_numbering(self.level);
            if !numbering.numbered {
                diffs.push("numLevel: the heading is not numbered".to_string());
            } else if !numbering.hierarchical {
                diffs.push("numLevel: the numbering is not hierarchical".to_string());
            } else if numbering.level != Some(expected_level) {
                diffs.push(format!(
                    "numLevel: expected {}, found {}",
                    expected_level,
                    numbering.level.map_or("none".to_string(), |l| l.to_string())
                ));
            }
        }
        style_result(&label, &diffs)
    }
}

/// Headings used in the body must carry automatic hierarchical numbering
/// (1, 1.1, 1.1.1).
pub struct HeadingHierarchicalNumberingCheck {
    max_level: u32,
}

impl HeadingHierarchicalNumberingCheck {
    pub fn new(max_level: u32) -> Self {
        Self { max_level }
    }
}

impl Check<dyn TextDocument, TextAssignment> for HeadingHierarchicalNumberingCheck {
    fn name(&self) -> &str {
        "Hierarchical heading numbering"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        let mut levels: Vec<u32> = document
            .headings()
            .iter()
            .map(|h| h.level)
            .filter(|&level| level <= self.max_level)
            .collect();
        levels.sort_unstable();
        levels.dedup();
        if levels.is_empty() {
            return CheckResult::pass("The document has no headings to check.");
        }

        let mut broken = Vec::new();
        for level in levels {
            let numbering = document.heading_numbering(level);
            if !numbering.numbered {
                broken.push(format!("Heading {}: not numbered", level));
            } else if !numbering.hierarchical {
                broken.push(format!("Heading {}: numbering is not hierarchical", level));
            } else if numbering.level != Some(level - 1) {
                broken.push(format!(
                    "Heading {}: wrong list level (expected {}, found {})",
                    level,
                    level - 1,
                    numbering.level.map_or("none".to_string(), |l| l.to_string())
                ));
            }
        }
        CheckResult::from_problems(
            &broken,
            STYLE_PENALTY,
            "Headings lack automatic hierarchical numbering",
            "Headings use automatic hierarchical numbering.",
        )
    }
}

/// A special built-in style looked up under its localized names.
struct NamedStyle {
    key: &'static str,
    names: &'static [&'static str],
    /// A style the student never touched keeps the application default
    missing_passes: bool,
}

fn check_named_style(
    style: &NamedStyle,
    document: &dyn TextDocument,
    assignment: &TextAssignment,
    options: &DiffOptions,
) -> CheckResult {
    let Some(expected) = assignment.style(style.key) else {
        return not_required(style.key);
    };
    let Some(actual) = document.style_by_any_name(style.names, Some("start")) else {
        return if style.missing_passes {
            CheckResult::pass(format!(
                "Style {} is not customized in the document, the default applies.",
                style.key
            ))
        } else {
            CheckResult::fail(format!("Style {} was not found.", style.key), STYLE_PENALTY)
        };
    };
    let options = options
        .clone()
        .with_doc_default_size(document.doc_default_font_size());
    style_result(style.key, &actual.diff(expected, &options))
}

const CAPTION: NamedStyle = NamedStyle {
    key: "Caption",
    names: &["Caption", "Titulek"],
    missing_passes: true,
};

const BIBLIOGRAPHY: NamedStyle = NamedStyle {
    key: "Bibliography",
    names: &["Bibliography", "Bibliografie"],
    missing_passes: false,
};

const CONTENT_HEADING: NamedStyle = NamedStyle {
    key: "Content Heading",
    names: &["Content Heading", "TOC Heading", "Nadpisobsahu", "Nadpis obsahu"],
    missing_passes: false,
};

pub struct CaptionStyleCheck {
    options: DiffOptions,
}

impl CaptionStyleCheck {
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }
}

impl Check<dyn TextDocument, TextAssignment> for CaptionStyleCheck {
    fn name(&self) -> &str {
        "Caption style"
    }

    fn run(&self, document: &dyn TextDocument, assignment: &TextAssignment) -> CheckResult {
        check_named_style(&CAPTION, document, assignment, &self.options)
    }
}

pub struct BibliographyStyleCheck {
    options: DiffOptions,
}

impl BibliographyStyleCheck {
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }
}

impl Check<dyn TextDocument, TextAssignment> for BibliographyStyleCheck {
    fn name(&self) -> &str {
        "Bibliography style"
    }

    fn run(&self, document: &dyn TextDocument, assignment: &TextAssignment) -> CheckResult {
        check_named_style(&BIBLIOGRAPHY, document, assignment, &self.options)
    }
}

/// The heading above the table of contents. Compared strictly: formatting
/// the assignment does not ask for counts as a difference.
pub struct ContentHeadingStyleCheck {
    options: DiffOptions,
}

impl ContentHeadingStyleCheck {
    pub fn new(options: DiffOptions) -> Self {
        Self {
            options: options.with_strict(true),
        }
    }
}

impl Check<dyn TextDocument, TextAssignment> for ContentHeadingStyleCheck {
    fn name(&self) -> &str {
        "Content heading style"
    }

    fn run(&self, document: &dyn TextDocument, assignment: &TextAssignment) -> CheckResult {
        check_named_style(&CONTENT_HEADING, document, assignment, &self.options)
    }
}

/// Every custom style of the assignment against its definition. Missing
/// styles are reported by [`RequiredCustomStylesUsageCheck`].
pub struct CustomStyleCheck {
    options: DiffOptions,
}

impl CustomStyleCheck {
    pub fn new(options: DiffOptions) -> Self {
        Self {
            options: options.with_ignore_fields(["name", "basedOn", "tabs"]),
        }
    }
}

impl Check<dyn TextDocument, TextAssignment> for CustomStyleCheck {
    fn name(&self) -> &str {
        "Custom styles"
    }

    fn run(&self, document: &dyn TextDocument, assignment: &TextAssignment) -> CheckResult {
        let options = self
            .options
            .clone()
            .with_doc_default_size(document.doc_default_font_size());
        let problems: Vec<String> = assignment
            .custom_styles()
            .filter_map(|expected| {
                let actual = document.custom_style(&expected.name)?;
                let diffs = actual.diff(expected, &options);
                (!diffs.is_empty()).then(|| format!("{}: {}", expected.name, diffs.join("; ")))
            })
            .collect();
        CheckResult::from_problems(
            &problems,
            CUSTOM_STYLE_PENALTY * problems.len() as i32,
            "Custom styles do not match the assignment",
            "Custom styles match the assignment.",
        )
    }
}

/// `Heading 1`, `heading-1` and `Heading_1` name the same style.
fn normalize_style_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Styles declaring `basedOn` must inherit from that parent.
pub struct CustomStyleInheritanceCheck;

impl Check<dyn TextDocument, TextAssignment> for CustomStyleInheritanceCheck {
    fn name(&self) -> &str {
        "Custom style inheritance"
    }

    fn run(&self, document: &dyn TextDocument, assignment: &TextAssignment) -> CheckResult {
        let mut problems = Vec::new();
        for (name, expected) in &assignment.styles {
            let Some(parent) = expected.based_on.as_deref() else {
                continue;
            };
            let Some(info) = document.style_info(name) else {
                problems.push(format!("Style \"{}\" does not exist", name));
                continue;
            };
            match info.parent.as_deref() {
                None => problems.push(format!(
                    "Style \"{}\" has no parent style, expected \"{}\"",
                    name, parent
                )),
                Some(actual) if normalize_style_name(actual) != normalize_style_name(parent) => {
                    problems.push(format!(
                        "Style \"{}\" inherits from \"{}\", expected \"{}\"",
                        name, actual, parent
                    ))
                },
                Some(_) => {},
            }
        }
        CheckResult::from_problems(
            &problems,
            STYLE_PENALTY,
            "Style inheritance is wrong",
            "Style inheritance matches the assignment.",
        )
    }
}

/// Custom styles must exist and be applied to some paragraph. Styles that
/// only serve as a parent of other custom styles need not be applied.
pub struct RequiredCustomStylesUsageCheck;

impl Check<dyn TextDocument, TextAssignment> for RequiredCustomStylesUsageCheck {
    fn name(&self) -> &str {
        "Custom style usage"
    }

    fn run(&self, document: &dyn TextDocument, assignment: &TextAssignment) -> CheckResult {
        let parents: HashSet<&str> = assignment
            .custom_styles()
            .filter_map(|s| s.based_on.as_deref())
            .collect();
        let paragraphs = document.paragraphs();

        let mut problems = Vec::new();
        for expected in assignment.custom_styles() {
            let Some(info) = document.style_info(&expected.name) else {
                problems.push(format!("Style \"{}\" does not exist", expected.name));
                continue;
            };
            if parents.contains(expected.name.as_str()) {
                continue;
            }
            let used = paragraphs.iter().any(|p| {
                p.style_id.as_deref() == Some(info.id.as_str())
                    || p.style_name
                        .as_deref()
                        .is_some_and(|n| n.eq_ignore_ascii_case(&info.name))
            });
            if !used {
                problems.push(format!("Style \"{}\" exists but is not used", expected.name));
            }
        }
        CheckResult::from_problems(
            &problems,
            CUSTOM_STYLE_PENALTY * problems.len() as i32,
            "Custom styles are missing or unused",
            "All custom styles exist and are used.",
        )
    }
}

/// `start`/`end` and `left`/`right` are the same tab alignment.
fn tab_alignment(alignment: &str) -> String {
    match alignment.to_lowercase().as_str() {
        "start" => "left".to_string(),
        "end" => "right".to_string(),
        other => other.to_string(),
    }
}

fn tabs_match(actual: &[TabStop], expected: &[TabStop]) -> bool {
    let sorted = |tabs: &[TabStop]| {
        let mut tabs: Vec<(String, i64)> = tabs
            .iter()
            .map(|t| (tab_alignment(&t.alignment), t.position))
            .collect();
        tabs.sort();
        tabs
    };
    let (actual, expected) = (sorted(actual), sorted(expected));
    actual.len() == expected.len()
        && actual.iter().zip(&expected).all(|((aa, ap), (ea, ep))| {
            aa == ea && (ap - ep).abs() <= TAB_POSITION_TOLERANCE
        })
}

/// Styles with tab stops in the assignment must define them themselves,
/// not inherit them.
pub struct CustomStyleWithTabsCheck;

impl Check<dyn TextDocument, TextAssignment> for CustomStyleWithTabsCheck {
    fn name(&self) -> &str {
        "Custom style tab stops"
    }

    fn run(&self, document: &dyn TextDocument, assignment: &TextAssignment) -> CheckResult {
        let mut problems = Vec::new();
        for (name, expected) in assignment.styles.iter().filter(|(_, s)| s.has_tabs()) {
            let Some(info) = document.style_info(name) else {
                problems.push(format!("Style \"{}\" does not exist", name));
                continue;
            };
            let own = info.own_tabs.as_deref().unwrap_or(&[]);
            if own.is_empty() {
                problems.push(format!("Style \"{}\" defines no tab stops of its own", name));
                continue;
            }
            let wanted = expected.tabs.as_deref().unwrap_or(&[]);
            if !tabs_match(own, wanted) {
                problems.push(format!(
                    "Style \"{}\" has wrong tab stops: expected {}, found {}",
                    name,
                    show_tabs(&expected.tabs),
                    show_tabs(&info.own_tabs)
                ));
            }
        }
        CheckResult::from_problems(
            &problems,
            CUSTOM_STYLE_PENALTY * problems.len() as i32,
            "Tab stops do not match the assignment",
            "Styles with tab stops match the assignment.",
        )
    }
}

/// Text pasted with its source markup (HTML entities, tags).
pub struct OriginalFormattingCheck;

impl Check<dyn TextDocument, TextAssignment> for OriginalFormattingCheck {
    fn name(&self) -> &str {
        "Original formatting"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        if document.has_html_artifacts() {
            CheckResult::fail(
                "The text still carries its original formatting (HTML markup).",
                -100,
            )
        } else {
            CheckResult::pass("The text carries no original formatting.")
        }
    }
}

fn preview(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Styled paragraphs whose runs override the style by hand.
pub struct InlineFormattingCheck;

impl Check<dyn TextDocument, TextAssignment> for InlineFormattingCheck {
    fn name(&self) -> &str {
        "Inline formatting"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        let problems: Vec<String> = document
            .paragraphs()
            .into_iter()
            .filter(|p| p.has_text() && !p.is_toc_like() && !p.direct_formatting.is_empty())
            .filter_map(|p| {
                let style = p.style_name.as_deref().or(p.style_id.as_deref())?;
                Some(format!(
                    "Style \"{}\", changed by hand: {}\n  Text: \"{}\"",
                    style,
                    p.direct_formatting.join(", "),
                    preview(&p.text, 60)
                ))
            })
            .collect();
        CheckResult::from_problems(
            &problems,
            CUSTOM_STYLE_PENALTY * problems.len() as i32,
            "Paragraphs are formatted by hand instead of by style",
            "No inline formatting found.",
        )
    }
}

/// Runs of spaces, dots, dashes or underscores used to push text sideways.
fn has_manual_spacing(text: &str) -> bool {
    [" ", ".", "-", "_"]
        .iter()
        .any(|c| text.contains(&c.repeat(4)))
}

pub struct ManualHorizontalSpacingCheck;

impl Check<dyn TextDocument, TextAssignment> for ManualHorizontalSpacingCheck {
    fn name(&self) -> &str {
        "Manual horizontal spacing"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        let problems: Vec<String> = document
            .paragraphs()
            .into_iter()
            .filter(|p| !p.is_toc_like() && has_manual_spacing(&p.raw_text))
            .map(|p| format!("\"{}\"", preview(&p.raw_text.replace('\t', "\\t"), 120)))
            .collect();
        CheckResult::from_problems(
            &problems,
            -5 * problems.len() as i32,
            "Text is aligned with spaces or filler characters",
            "No manual horizontal spacing found.",
        )
    }
}

/// Two or more empty paragraphs used as vertical space before text.
pub struct ManualVerticalSpacingCheck;

impl Check<dyn TextDocument, TextAssignment> for ManualVerticalSpacingCheck {
    fn name(&self) -> &str {
        "Manual vertical spacing"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        let paragraphs = document.paragraphs();
        let mut problems = Vec::new();
        let mut empty_run = 0;
        for p in &paragraphs {
            if p.is_empty() {
                empty_run += 1;
                continue;
            }
            let run = std::mem::take(&mut empty_run);
            if run < 2
                || !p.has_text()
                || p.is_toc_like()
                || p.page_break_before
                || p.spacing_before
            {
                continue;
            }
            problems.push(format!(
                "{} empty lines before \"{}\" (style {})",
                run,
                preview(&p.text, 80),
                p.style_name.as_deref().unwrap_or("none")
            ));
        }
        let points = -5 * problems.len() as i32;
        problems.truncate(5);
        CheckResult::from_problems(
            &problems,
            points,
            "Vertical space is made of empty paragraphs",
            "No manual vertical spacing found.",
        )
    }
}

/// Style ids of second-level list styles in Czech and English templates.
const LIST_LEVEL_2_STYLES: [&str; 5] = [
    "slovanseznam2",
    "seznamsodrkami2",
    "cislovanyseznam2",
    "numberlist2",
    "bulletlist2",
];

pub struct ListLevel2UsedCheck;

impl Check<dyn TextDocument, TextAssignment> for ListLevel2UsedCheck {
    fn name(&self) -> &str {
        "Second-level list"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        let used = document.paragraphs().iter().any(|p| {
            p.style_id
                .as_deref()
                .is_some_and(|id| LIST_LEVEL_2_STYLES.contains(&id.trim().to_lowercase().as_str()))
        });
        if used {
            CheckResult::pass("A second-level list is used.")
        } else {
            CheckResult::fail("No second-level list is used.", -1)
        }
    }
}

/// Main chapters (level 1 headings) must start on a new page.
pub struct MainChapterStartsOnNewPageCheck;

impl Check<dyn TextDocument, TextAssignment> for MainChapterStartsOnNewPageCheck {
    fn name(&self) -> &str {
        "Chapters start on a new page"
    }

    fn run(&self, document: &dyn TextDocument, _assignment: &TextAssignment) -> CheckResult {
        let blocks = document.blocks();
        let section_starts: HashSet<usize> = document
            .sections()
            .map(|sections| sections.iter().map(|s| s.blocks.start).collect())
            .unwrap_or_default();

        let mut problems = Vec::new();
        for (index, block) in blocks.iter().enumerate() {
            let Some(p) = block.as_paragraph() else {
                continue;
            };
            if p.heading_level != Some(1) || !p.has_text() {
                continue;
            }
            let first_content = blocks[..index]
                .iter()
                .all(|b| b.as_paragraph().is_some_and(|p| p.is_empty()));
            if p.page_break_before || section_starts.contains(&index) || first_content {
                continue;
            }
            problems.push(format!("Chapter \"{}\" does not start on a new page", p.text));
        }
        CheckResult::from_problems(
            &problems,
            CUSTOM_STYLE_PENALTY * problems.len() as i32,
            "Chapters do not start on a new page",
            "All chapters start on a new page.",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::text::fixture::{FakeText, heading, para, styled};
    use crate::document::HeadingNumbering;
    use crate::style::StyleSpec;

    fn spec(name: &str) -> StyleSpec {
        StyleSpec::named(name)
    }

    fn assignment(json: &str) -> TextAssignment {
        TextAssignment::from_json(json).unwrap()
    }

    fn heading_doc(size: f64) -> FakeText {
        let mut doc = FakeText::default();
        doc.heading_styles.insert(
            1,
            StyleSpec {
                bold: Some(true),
                size: Some(size),
                ..spec("heading 1")
            },
        );
        doc
    }

    #[test]
    fn test_heading_size_scenario() {
        let a = assignment(r#"{"styles": {"Heading 1": {"bold": true, "size": 16}}}"#);
        let check = HeadingStyleCheck::new(1, DiffOptions::new());

        let result = check.run(&heading_doc(14.0), &a);
        assert!(!result.passed);
        assert_eq!(result.points, -5);
        assert!(result.message.contains("size: expected 16, found 14"));
        assert_eq!(result.message.lines().count(), 2);

        assert!(check.run(&heading_doc(16.0), &a).passed);
    }

    #[test]
    fn test_heading_numbering_level() {
        let a = assignment(r#"{"styles": {"Heading 2": {"numLevel": 1}}}"#);
        let mut doc = FakeText::default();
        doc.heading_styles.insert(2, spec("heading 2"));
        let check = HeadingStyleCheck::new(2, DiffOptions::new());

        let result = check.run(&doc, &a);
        assert!(result.message.contains("not numbered"));

        doc.numbering.insert(
            2,
            HeadingNumbering {
                numbered: true,
                hierarchical: false,
                level: Some(1),
            },
        );
        assert!(check.run(&doc, &a).message.contains("not hierarchical"));

        let doc = doc.numbered_headings(2);
        assert!(check.run(&doc, &a).passed);
    }

    #[test]
    fn test_missing_heading_style_and_no_requirement() {
        let check = HeadingStyleCheck::new(3, DiffOptions::new());
        assert!(check.run(&FakeText::default(), &assignment("{}")).passed);
        let a = assignment(r#"{"styles": {"Heading 3": {"italic": true}}}"#);
        assert_eq!(check.run(&FakeText::default(), &a).points, -5);
    }

    #[test]
    fn test_normal_style_uses_document_default_size() {
        let a = assignment(r#"{"styles": {"Normal": {"size": 12}}}"#);
        let mut doc = FakeText {
            normal: Some(spec("Normal")),
            default_size: Some(12.0),
            ..Default::default()
        };
        let check = NormalStyleCheck::new(DiffOptions::new());
        assert!(check.run(&doc, &a).passed);

        doc.default_size = Some(11.0);
        let result = check.run(&doc, &a);
        assert!(result.message.contains("size: expected 12, document default is 11"));
    }

    #[test]
    fn test_hierarchical_numbering_only_for_used_levels() {
        let doc = FakeText::default()
            .paragraph(heading("Úvod", 1))
            .paragraph(heading("Cíl", 2))
            .numbered_headings(1);
        let result = HeadingHierarchicalNumberingCheck::new(3).run(&doc, &assignment("{}"));
        assert!(!result.passed);
        assert!(result.message.contains("Heading 2: not numbered"));
        assert!(!result.message.contains("Heading 3"));

        let doc = doc.numbered_headings(2);
        assert!(HeadingHierarchicalNumberingCheck::new(3).run(&doc, &assignment("{}")).passed);
    }

    #[test]
    fn test_caption_missing_passes_bibliography_missing_fails() {
        let a = assignment(r#"{"styles": {"Caption": {"italic": true}, "Bibliography": {"size": 11}}}"#);
        let doc = FakeText::default();
        assert!(CaptionStyleCheck::new(DiffOptions::new()).run(&doc, &a).passed);
        assert!(!BibliographyStyleCheck::new(DiffOptions::new()).run(&doc, &a).passed);
    }

    #[test]
    fn test_caption_default_alignment() {
        let a = assignment(r#"{"styles": {"Caption": {"alignment": "left"}}}"#);
        let doc = FakeText::default().style("Titulek", "Titulek", None, spec(""));
        assert!(CaptionStyleCheck::new(DiffOptions::new()).run(&doc, &a).passed);
    }

    #[test]
    fn test_content_heading_is_strict() {
        let a = assignment(r#"{"styles": {"Content Heading": {"size": 14}}}"#);
        let doc = FakeText::default().style(
            "TOCHeading",
            "TOC Heading",
            Some("heading 1"),
            StyleSpec {
                size: Some(14.0),
                bold: Some(true),
                ..Default::default()
            },
        );
        let result = ContentHeadingStyleCheck::new(DiffOptions::new()).run(&doc, &a);
        assert!(!result.passed);
        assert!(result.message.contains("bold: must not be set, but is true"));
    }

    #[test]
    fn test_custom_styles_penalty_per_style() {
        let a = assignment(
            r#"{"styles": {
                "Kód": {"type": "Consolas", "basedOn": "Normal"},
                "Citát": {"italic": true},
                "Poznámka": {"size": 9}
            }}"#,
        );
        let doc = FakeText::default()
            .style(
                "Kd",
                "Kód",
                Some("Normal"),
                StyleSpec {
                    font: Some("Courier New".into()),
                    ..Default::default()
                },
            )
            .style("Citt", "Citát", None, StyleSpec::default());
        let result = CustomStyleCheck::new(DiffOptions::new()).run(&doc, &a);
        assert_eq!(result.points, -4);
        assert!(result.message.contains("Kód: font: expected Consolas, found Courier New"));
    }

    #[test]
    fn test_inheritance_normalizes_names() {
        let a = assignment(r#"{"styles": {"Kód": {"basedOn": "Heading 1"}, "Citát": {"basedOn": "Normal"}}}"#);
        let doc = FakeText::default()
            .style("Kd", "Kód", Some("heading_1"), spec(""))
            .style("Citt", "Citát", Some("Quote"), spec(""));
        let result = CustomStyleInheritanceCheck.run(&doc, &a);
        assert!(!result.passed);
        assert!(!result.message.contains("Kód"));
        assert!(result.message.contains("\"Citát\" inherits from \"Quote\", expected \"Normal\""));
    }

    #[test]
    fn test_custom_style_usage() {
        let a = assignment(
            r#"{"styles": {"Základ": {}, "Kód": {"basedOn": "Základ"}, "Citát": {}, "Chybí": {}}}"#,
        );
        let doc = FakeText::default()
            .style("Zklad", "Základ", None, spec(""))
            .style("Kd", "Kód", Some("Základ"), spec(""))
            .style("Citt", "Citát", None, spec(""))
            .paragraph(styled("let x = 1;", "Kd"));
        let result = RequiredCustomStylesUsageCheck.run(&doc, &a);
        assert_eq!(result.points, -4);
        assert!(result.message.contains("\"Citát\" exists but is not used"));
        assert!(result.message.contains("\"Chybí\" does not exist"));
        assert!(!result.message.contains("Základ"));
    }

    #[test]
    fn test_tabs_must_be_own_and_close() {
        let a = assignment(
            r#"{"styles": {"Kód": {"tabs": [["left", 567], ["right", 9000]]}, "Citát": {"tabs": [["left", 100]]}}}"#,
        );
        let doc = FakeText::default()
            .style(
                "Kd",
                "Kód",
                None,
                StyleSpec {
                    tabs: Some(vec![TabStop::new("end", 8995), TabStop::new("start", 570)]),
                    ..Default::default()
                },
            )
            .style("Citt", "Citát", None, spec(""));
        let result = CustomStyleWithTabsCheck.run(&doc, &a);
        assert_eq!(result.points, -2);
        assert!(result.message.contains("\"Citát\" defines no tab stops of its own"));
    }

    #[test]
    fn test_inline_formatting() {
        let mut fixed = styled("Důležitý text", "Normal");
        fixed.direct_formatting = vec!["bold", "color"];
        let mut unstyled = para("Volný text");
        unstyled.direct_formatting = vec!["italic"];
        let doc = FakeText::default().paragraph(fixed).paragraph(unstyled);
        let result = InlineFormattingCheck.run(&doc, &assignment("{}"));
        assert_eq!(result.points, -2);
        assert!(result.message.contains("changed by hand: bold, color"));
    }

    #[test]
    fn test_manual_spacing() {
        let doc = FakeText::default()
            .paragraph(para("Jméno:      Jan"))
            .paragraph(para("Podpis ........"))
            .paragraph(para("Běžný text"));
        assert_eq!(ManualHorizontalSpacingCheck.run(&doc, &assignment("{}")).points, -10);

        let doc = FakeText::default()
            .paragraph(para("Odstavec"))
            .paragraph(para(""))
            .paragraph(para(""))
            .paragraph(para("Další odstavec"))
            .paragraph(para(""))
            .paragraph(para("Jeden prázdný řádek je v pořádku"));
        let result = ManualVerticalSpacingCheck.run(&doc, &assignment("{}"));
        assert_eq!(result.points, -5);
        assert!(result.message.contains("2 empty lines before \"Další odstavec\""));
    }

    #[test]
    fn test_list_level_2() {
        let doc = FakeText::default().paragraph(styled("položka", "Seznamsodrkami2"));
        assert!(ListLevel2UsedCheck.run(&doc, &assignment("{}")).passed);
        assert!(!ListLevel2UsedCheck.run(&FakeText::default(), &assignment("{}")).passed);
    }

    #[test]
    fn test_chapters_start_on_new_page() {
        let mut second = heading("Teorie", 1);
        second.page_break_before = true;
        let doc = FakeText::default()
            .paragraph(heading("Úvod", 1))
            .paragraph(para("text"))
            .paragraph(second)
            .paragraph(para("text"))
            .paragraph(heading("Závěr", 1));
        let result = MainChapterStartsOnNewPageCheck.run(&doc, &assignment("{}"));
        assert_eq!(result.points, -2);
        assert!(result.message.contains("\"Závěr\""));
    }

    #[test]
    fn test_original_formatting() {
        let doc = FakeText {
            html: true,
            ..Default::default()
        };
        assert_eq!(OriginalFormattingCheck.run(&doc, &assignment("{}")).points, -100);
    }
}
