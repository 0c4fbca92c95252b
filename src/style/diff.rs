//! Tolerance-aware comparison of a resolved style against an expected one.

use super::spec::{StyleSpec, TabStop, show, show_tabs};
use std::collections::HashSet;
use std::fmt::Display;

/// Default tolerance for spacing and indentation, in twips.
pub const SPACE_TOLERANCE: i64 = 20;
/// Default tolerance for tab stop positions, in twips.
pub const TAB_TOLERANCE: i64 = 5;

const STRICT_BOOL_FIELDS: [&str; 5] = ["bold", "italic", "underline", "allCaps", "pageBreakBefore"];

/// Options controlling [`StyleSpec::diff`].
///
/// # Examples
///
/// ```
/// use docgrade::style::DiffOptions;
///
/// let options = DiffOptions::new()
///     .with_doc_default_size(Some(11.0))
///     .with_strict(true);
/// assert!(options.strict);
/// assert!(options.ignore_fields.contains("name"));
/// ```
#[derive(Debug, Clone)]
pub struct DiffOptions {
    /// Document-wide default font size, used when the actual style sets none
    pub doc_default_size: Option<f64>,
    /// Field names (assignment spelling, e.g. `allCaps`) excluded from the comparison
    pub ignore_fields: HashSet<String>,
    /// Also flag formatting the expected spec does not ask for
    pub strict: bool,
    pub space_tolerance: i64,
    pub tab_tolerance: i64,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            doc_default_size: None,
            ignore_fields: HashSet::from(["name".to_string()]),
            strict: false,
            space_tolerance: SPACE_TOLERANCE,
            tab_tolerance: TAB_TOLERANCE,
        }
    }
}

impl DiffOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_doc_default_size(mut self, size: Option<f64>) -> Self {
        self.doc_default_size = size;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Replace the ignored field set.
    pub fn with_ignore_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_space_tolerance(mut self, tolerance: i64) -> Self {
        self.space_tolerance = tolerance;
        self
    }

    pub fn with_tab_tolerance(mut self, tolerance: i64) -> Self {
        self.tab_tolerance = tolerance;
        self
    }

    fn ignores(&self, field: &str) -> bool {
        self.ignore_fields.contains(field)
    }
}

fn int_close(actual: Option<i64>, expected: Option<i64>, tolerance: i64) -> bool {
    match (actual, expected) {
        (None, None) => true,
        (Some(a), Some(e)) => (a - e).abs() <= tolerance,
        _ => false,
    }
}

fn tabs_close(actual: Option<&[TabStop]>, expected: Option<&[TabStop]>, tolerance: i64) -> bool {
    match (actual, expected) {
        (None, None) => true,
        (Some(actual), Some(expected)) => {
            actual.len() == expected.len()
                && actual.iter().zip(expected).all(|(a, e)| {
                    a.alignment == e.alignment && (a.position - e.position).abs() <= tolerance
                })
        },
        _ => false,
    }
}

fn normalize_alignment(value: &str) -> &str {
    match value {
        "left" => "start",
        "right" => "end",
        "justify" => "both",
        other => other,
    }
}

struct Collector<'a> {
    options: &'a DiffOptions,
    diffs: Vec<String>,
}

impl Collector<'_> {
    fn exact<T: PartialEq + Display>(&mut self, field: &str, actual: &Option<T>, expected: &Option<T>) {
        if self.options.ignores(field) {
            return;
        }
        if let Some(e) = expected
            && actual.as_ref() != Some(e)
        {
            self.diffs
                .push(format!("{}: expected {}, found {}", field, e, show(actual)));
        }
    }

    fn tolerant(&mut self, field: &str, actual: Option<i64>, expected: Option<i64>) {
        if self.options.ignores(field) {
            return;
        }
        if let Some(e) = expected
            && !int_close(actual, Some(e), self.options.space_tolerance)
        {
            self.diffs
                .push(format!("{}: expected {}, found {}", field, e, show(&actual)));
        }
    }
}

impl StyleSpec {
    /// Compare `self` (the resolved actual style) against `expected`.
    ///
    /// Only fields set on `expected` are checked, in declaration order. In
    /// strict mode a second pass flags enabled toggles and indents the
    /// expected spec does not ask for, and enforces the numbering rule:
    /// a spec with `numLevel` requires numbering, a spec without it forbids it.
    pub fn diff(&self, expected: &StyleSpec, options: &DiffOptions) -> Vec<String> {
        let mut c = Collector {
            options,
            diffs: Vec::new(),
        };

        if !options.ignores("name") && !expected.name.is_empty() && self.name != expected.name {
            c.diffs.push(format!(
                "name: expected {}, found {}",
                expected.name, self.name
            ));
        }

        c.exact("font", &self.font, &expected.font);

        if !options.ignores("size")
            && let Some(e) = expected.size
        {
            match self.size {
                None if options.doc_default_size != Some(e) => c.diffs.push(format!(
                    "size: expected {}, document default is {}",
                    e,
                    show(&options.doc_default_size)
                )),
                Some(a) if a != e => {
                    c.diffs.push(format!("size: expected {}, found {}", e, a))
                },
                _ => {},
            }
        }

        c.exact("bold", &self.bold, &expected.bold);
        c.exact("italic", &self.italic, &expected.italic);
        c.exact("underline", &self.underline, &expected.underline);
        c.exact("allCaps", &self.all_caps, &expected.all_caps);

        if !options.ignores("color")
            && let Some(e) = &expected.color
        {
            let matches = self
                .color
                .as_deref()
                .is_some_and(|a| a.eq_ignore_ascii_case(e.trim_start_matches('#')));
            if !matches {
                c.diffs
                    .push(format!("color: expected {}, found {}", e, show(&self.color)));
            }
        }

        if !options.ignores("alignment")
            && let Some(e) = &expected.alignment
        {
            let actual = self.alignment.as_deref().map(normalize_alignment);
            if actual != Some(normalize_alignment(e)) {
                c.diffs.push(format!(
                    "alignment: expected {}, found {}",
                    e,
                    show(&self.alignment)
                ));
            }
        }

        c.exact("lineHeight", &self.line_height, &expected.line_height);
        c.exact("pageBreakBefore", &self.page_break_before, &expected.page_break_before);
        c.exact("isNumbered", &self.is_numbered, &expected.is_numbered);
        c.exact("numLevel", &self.num_level, &expected.num_level);
        c.exact("basedOn", &self.based_on, &expected.based_on);

        c.tolerant("spaceBefore", self.space_before, expected.space_before);
        c.tolerant("indentLeft", self.indent_left, expected.indent_left);
        c.tolerant("indentRight", self.indent_right, expected.indent_right);
        c.tolerant("indentFirstLine", self.indent_first_line, expected.indent_first_line);
        c.tolerant("indentHanging", self.indent_hanging, expected.indent_hanging);

        if !options.ignores("tabs")
            && expected.tabs.is_some()
            && !tabs_close(
                self.tabs.as_deref(),
                expected.tabs.as_deref(),
                options.tab_tolerance,
            )
        {
            c.diffs.push(format!(
                "tabs: expected {}, found {}",
                show_tabs(&expected.tabs),
                show_tabs(&self.tabs)
            ));
        }

        let mut diffs = c.diffs;
        if options.strict {
            self.strict_pass(expected, options, &mut diffs);
        }
        diffs
    }

    fn strict_pass(&self, expected: &StyleSpec, options: &DiffOptions, diffs: &mut Vec<String>) {
        let toggles = [
            (self.bold, expected.bold),
            (self.italic, expected.italic),
            (self.underline, expected.underline),
            (self.all_caps, expected.all_caps),
            (self.page_break_before, expected.page_break_before),
        ];
        for (field, (actual, wanted)) in STRICT_BOOL_FIELDS.iter().zip(toggles) {
            if options.ignores(field) {
                continue;
            }
            if wanted.is_none() && actual == Some(true) {
                diffs.push(format!("{}: must not be set, but is true", field));
            }
        }

        let indents = [
            ("indentLeft", self.indent_left, expected.indent_left),
            ("indentRight", self.indent_right, expected.indent_right),
            ("indentFirstLine", self.indent_first_line, expected.indent_first_line),
            ("indentHanging", self.indent_hanging, expected.indent_hanging),
        ];
        for (field, actual, wanted) in indents {
            if let (None, Some(value)) = (wanted, actual) {
                diffs.push(format!("{}: must not be set, but is {}", field, value));
            }
        }

        let numbered = self.is_numbered == Some(true);
        if expected.num_level.is_some() {
            if !numbered {
                diffs.push("isNumbered: must be numbered, but is not".to_string());
            }
        } else if numbered {
            diffs.push("isNumbered: must not be numbered, but is".to_string());
        }
    }

    /// Shorthand for an empty [`diff`](Self::diff).
    pub fn matches(&self, expected: &StyleSpec, options: &DiffOptions) -> bool {
        self.diff(expected, options).is_empty()
    }
}
