//! Cell formatting checks on the data sheet.

use super::{missing_sheet, truncated};
use crate::assignment::{ConditionalFormatRule, SheetAssignment};
use crate::checks::result::list_message;
use crate::checks::{Check, CheckResult};
use crate::common::DocumentFormat;
use crate::sheet::coordinates::alpha_to_digit;
use crate::sheet::{CellCoord, CellRange, CellValue, FoundConditionalRule, SpreadsheetDocument};
use tracing::warn;

/// Number formats of the expected cells. Calc files are compared by the
/// number of decimal places, Excel files by the exact format code.
pub struct NumberFormattingCheck {
    sheet: String,
}

impl NumberFormattingCheck {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
        }
    }
}

impl Check<dyn SpreadsheetDocument, SheetAssignment> for NumberFormattingCheck {
    fn name(&self) -> &str {
        "Number formatting"
    }

    fn run(&self, document: &dyn SpreadsheetDocument, assignment: &SheetAssignment) -> CheckResult {
        if !document.has_sheet(&self.sheet) {
            return CheckResult::skipped(format!("the sheet \"{}\" is missing", self.sheet));
        }
        let by_decimals = document.format() == DocumentFormat::Ods;

        let mut problems = Vec::new();
        for (address, spec) in &assignment.cells {
            let Some(expected) = spec.style.as_ref().filter(|s| s.number_format.is_some()) else {
                continue;
            };
            let Some(style) = document.cell_style(&self.sheet, address) else {
                continue;
            };
            if by_decimals {
                let wanted = expected.decimal_places();
                if style.decimal_places != wanted {
                    problems.push(format!(
                        "{}: wrong number of decimal places (expected {}, found {})",
                        address,
                        show(wanted),
                        show(style.decimal_places)
                    ));
                }
            } else if style.number_format != expected.number_format {
                problems.push(format!(
                    "{}: wrong number format (expected {}, found {})",
                    address,
                    show(expected.number_format.as_deref()),
                    show(style.number_format.as_deref())
                ));
            }
        }

        if problems.is_empty() {
            CheckResult::pass("Number formats match the assignment.")
        } else {
            CheckResult::fail(
                list_message("Wrong number formatting", &truncated(problems, 50)),
                -2,
            )
            .into_fatal()
        }
    }
}

fn show<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "none".to_string(), |v| v.to_string())
}

/// Header cells are bold and, where an alignment is expected, centered.
pub struct HeaderFormattingCheck {
    sheet: String,
}

impl HeaderFormattingCheck {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
        }
    }
}

impl Check<dyn SpreadsheetDocument, SheetAssignment> for HeaderFormattingCheck {
    fn name(&self) -> &str {
        "Table header formatting"
    }

    fn run(&self, document: &dyn SpreadsheetDocument, assignment: &SheetAssignment) -> CheckResult {
        let mut problems = Vec::new();
        for (address, spec) in &assignment.cells {
            let Some(expected) = spec.style.as_ref().filter(|s| s.bold == Some(true)) else {
                continue;
            };
            let Some(style) = document
                .cell(&self.sheet, address)
                .and_then(|_| document.cell_style(&self.sheet, address))
            else {
                problems.push(format!("{}: the cell does not exist", address));
                continue;
            };
            if !style.bold {
                problems.push(format!("{}: the header is not bold", address));
            }
            if expected.alignment.is_some() && style.align_h.as_deref() != Some("center") {
                problems.push(format!("{}: the header is not centered", address));
            }
        }

        if problems.is_empty() {
            CheckResult::pass("Table headers are formatted correctly.")
        } else {
            CheckResult::fail(list_message("Table header formatting is wrong", &problems), -1)
                .into_fatal()
        }
    }
}

/// A thick outline may also be drawn medium.
fn border_matches(actual: Option<&str>, expected: &str) -> bool {
    match (actual, expected) {
        (Some(actual), "thick") => actual == "thick" || actual == "medium",
        (Some(actual), expected) => actual == expected,
        (None, _) => false,
    }
}

/// Outline and inner grid of each table region.
pub struct TableBorderCheck {
    sheet: String,
}

impl TableBorderCheck {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
        }
    }

    fn check_region(
        &self,
        document: &dyn SpreadsheetDocument,
        range: CellRange,
        outline: Option<&str>,
        inside: Option<&str>,
        problems: &mut Vec<String>,
    ) {
        let borders = |coord: CellCoord| {
            document
                .cell_style(&self.sheet, &coord.to_a1())
                .map(|s| s.borders)
                .unwrap_or_default()
        };
        let (start, end) = (range.start(), range.end());
        for coord in range.cells() {
            let b = borders(coord);
            let at = coord.to_a1();
            if let Some(outline) = outline {
                let edges = [
                    (coord.row() == start.row(), &b.top, "top"),
                    (coord.row() == end.row(), &b.bottom, "bottom"),
                    (coord.column() == start.column(), &b.left, "left"),
                    (coord.column() == end.column(), &b.right, "right"),
                ];
                for (on_edge, side, name) in edges {
                    if on_edge && !border_matches(side.as_deref(), outline) {
                        problems.push(format!("{}: missing {} outline border ({})", at, name, outline));
                    }
                }
            }
            if let Some(inside) = inside {
                if coord.row() > start.row()
                    && !border_matches(b.top.as_deref(), inside)
                    && !border_matches(
                        borders(CellCoord::new(coord.column(), coord.row() - 1)).bottom.as_deref(),
                        inside,
                    )
                {
                    problems.push(format!("{}: missing top inside border ({})", at, inside));
                }
                if coord.column() > start.column()
                    && !border_matches(b.left.as_deref(), inside)
                    && !border_matches(
                        borders(CellCoord::new(coord.column() - 1, coord.row())).right.as_deref(),
                        inside,
                    )
                {
                    problems.push(format!("{}: missing left inside border ({})", at, inside));
                }
            }
        }
    }
}

impl Check<dyn SpreadsheetDocument, SheetAssignment> for TableBorderCheck {
    fn name(&self) -> &str {
        "Table borders"
    }

    fn run(&self, document: &dyn SpreadsheetDocument, assignment: &SheetAssignment) -> CheckResult {
        if assignment.borders.is_empty() {
            return CheckResult::pass("The assignment requires no table borders.");
        }
        if !document.has_sheet(&self.sheet) {
            return missing_sheet(&self.sheet, -1);
        }

        let mut problems = Vec::new();
        for region in &assignment.borders {
            match region.location.parse::<CellRange>() {
                Ok(range) => self.check_region(
                    document,
                    range,
                    region.outline_border_style.as_deref(),
                    region.inside_border_style.as_deref(),
                    &mut problems,
                ),
                Err(e) => {
                    warn!(location = %region.location, error = %e, "invalid border region");
                    problems.push(format!("{}: not a valid range", region.location));
                },
            }
        }

        if problems.is_empty() {
            CheckResult::pass("Tables have the expected outline and inner borders.")
        } else {
            CheckResult::fail(
                list_message("Table borders are missing", &truncated(problems, 15)),
                -1,
            )
            .into_fatal()
        }
    }
}

/// Merged cells must stay out of the data ranges.
pub struct MergedCellsCheck {
    sheet: String,
    forbidden: Vec<String>,
}

impl MergedCellsCheck {
    pub fn new<I, S>(sheet: impl Into<String>, forbidden: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sheet: sheet.into(),
            forbidden: forbidden.into_iter().map(Into::into).collect(),
        }
    }
}

impl Check<dyn SpreadsheetDocument, SheetAssignment> for MergedCellsCheck {
    fn name(&self) -> &str {
        "Merged cells"
    }

    fn run(&self, document: &dyn SpreadsheetDocument, _assignment: &SheetAssignment) -> CheckResult {
        if !document.has_sheet(&self.sheet) {
            return missing_sheet(&self.sheet, -1);
        }
        let forbidden: Vec<CellRange> = self
            .forbidden
            .iter()
            .filter_map(|r| match r.parse() {
                Ok(range) => Some(range),
                Err(e) => {
                    warn!(range = %r, error = %e, "ignoring invalid forbidden range");
                    None
                },
            })
            .collect();

        let problems: Vec<String> = document
            .merged_ranges(&self.sheet)
            .iter()
            .filter(|merged| forbidden.iter().any(|f| f.overlaps(merged)))
            .map(|merged| format!("merged cells {} reach into the data area", merged))
            .collect();
        if problems.is_empty() {
            CheckResult::pass("Merged cells are used correctly.")
        } else {
            CheckResult::fail(list_message("Wrong merged cells", &problems), -1).into_fatal()
        }
    }
}

/// Long text cells wrap.
pub struct WrapTextCheck {
    sheet: String,
    min_length: usize,
}

impl WrapTextCheck {
    pub fn new(sheet: impl Into<String>, min_length: usize) -> Self {
        Self {
            sheet: sheet.into(),
            min_length,
        }
    }
}

impl Check<dyn SpreadsheetDocument, SheetAssignment> for WrapTextCheck {
    fn name(&self) -> &str {
        "Text wrapping"
    }

    fn run(&self, document: &dyn SpreadsheetDocument, _assignment: &SheetAssignment) -> CheckResult {
        let mut problems = Vec::new();
        for (coord, info) in document.iter_cells(&self.sheet) {
            let CellValue::String(text) = &info.cached_value else {
                continue;
            };
            if info.has_formula() || text.trim().chars().count() < self.min_length {
                continue;
            }
            let address = coord.to_a1();
            let wraps = document
                .cell_style(&self.sheet, &address)
                .is_some_and(|s| s.wrap == Some(true));
            if !wraps {
                problems.push(format!("{}: text does not wrap", address));
            }
        }
        if problems.is_empty() {
            CheckResult::pass("Long texts wrap.")
        } else {
            CheckResult::fail(
                list_message("Text wrapping is missing", &truncated(problems, 10)),
                -1,
            )
            .into_fatal()
        }
    }
}

pub struct ConditionalFormattingExistsCheck {
    sheet: String,
}

impl ConditionalFormattingExistsCheck {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
        }
    }
}

impl Check<dyn SpreadsheetDocument, SheetAssignment> for ConditionalFormattingExistsCheck {
    fn name(&self) -> &str {
        "Conditional formatting"
    }

    fn run(&self, document: &dyn SpreadsheetDocument, _assignment: &SheetAssignment) -> CheckResult {
        if !document.has_sheet(&self.sheet) {
            return missing_sheet(&self.sheet, -5);
        }
        if document.has_conditional_formatting(&self.sheet) {
            CheckResult::pass("The sheet has conditional formatting.")
        } else {
            CheckResult::fail("The sheet has no conditional formatting.", -5).into_fatal()
        }
    }
}

/// Whether a found rule applies to `column` (letters).
fn covers_column(rule: &FoundConditionalRule, column: &str) -> bool {
    match (rule.cell_range(), alpha_to_digit(column)) {
        (Some(range), Ok(index)) => (range.start().column()..=range.end().column()).contains(&index),
        _ => rule.range.to_uppercase().contains(column),
    }
}

fn satisfies(found: &FoundConditionalRule, column: &str, expected: &ConditionalFormatRule) -> bool {
    covers_column(found, column)
        && found.operator == Some(expected.operator)
        && found.value.is_some_and(|v| (v - expected.value).abs() <= 0.01)
        && (expected.fill_color.is_none() || found.has_fill)
        && (expected.text_color.is_none() || found.has_font_color)
}

/// Each required rule exists with its operator, threshold and formatting.
pub struct ConditionalFormattingCorrectnessCheck {
    sheet: String,
}

impl ConditionalFormattingCorrectnessCheck {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
        }
    }
}

impl Check<dyn SpreadsheetDocument, SheetAssignment> for ConditionalFormattingCorrectnessCheck {
    fn name(&self) -> &str {
        "Conditional formatting is correct"
    }

    fn run(&self, document: &dyn SpreadsheetDocument, assignment: &SheetAssignment) -> CheckResult {
        let expected: Vec<_> = assignment.conditional_rules().collect();
        if expected.is_empty() {
            return CheckResult::pass("The assignment requires no conditional formatting.");
        }
        if !document.has_sheet(&self.sheet) {
            return missing_sheet(&self.sheet, -2);
        }

        let found = document.conditional_rules(&self.sheet);
        let missing: Vec<String> = expected
            .iter()
            .filter(|(column, rule)| !found.iter().any(|f| satisfies(f, column, rule)))
            .map(|(column, rule)| format!("{} {} (column {})", rule.operator, rule.value, column))
            .collect();

        if missing.is_empty() {
            CheckResult::pass("Conditional formatting matches the assignment.")
        } else {
            CheckResult::fail(
                list_message("Conditional formatting does not match the assignment", &missing),
                -2 * missing.len() as i32,
            )
            .into_fatal()
        }
    }
}
