//! Formula checks: presence, correctness and how formulas are written.

use super::{missing_sheet, truncated};
use crate::assignment::SheetAssignment;
use crate::checks::result::list_message;
use crate::checks::{Check, CheckResult};
use crate::sheet::{SpreadsheetDocument, has_absolute_reference};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Expected formulas exist, match and were calculated.
pub struct MissingOrWrongFormulaCheck {
    sheet: String,
}

impl MissingOrWrongFormulaCheck {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
        }
    }
}

impl Check<dyn SpreadsheetDocument, SheetAssignment> for MissingOrWrongFormulaCheck {
    fn name(&self) -> &str {
        "Formulas are present and correct"
    }

    fn run(&self, document: &dyn SpreadsheetDocument, assignment: &SheetAssignment) -> CheckResult {
        let Some(worksheet) = document.worksheet(&self.sheet) else {
            return missing_sheet(&self.sheet, -10);
        };

        let mut problems = Vec::new();
        for (address, expected) in assignment.formulas() {
            let at = format!("{}!{}", self.sheet, address);
            let Some(cell) = worksheet.cell(address) else {
                problems.push(format!("{}: the cell does not exist", at));
                continue;
            };
            let Some(formula) = cell.formula.as_deref() else {
                problems.push(format!("{}: no formula", at));
                continue;
            };
            if document.normalize_formula(formula) != document.normalize_formula(expected) {
                problems.push(format!(
                    "{}: wrong formula (expected {}, found {})",
                    at, expected, formula
                ));
            }
            if cell.cached_value.is_empty() {
                problems.push(format!("{}: the formula has no stored result", at));
            } else if cell.is_error() {
                problems.push(format!("{}: result is error {}", at, cell.cached_value));
            }
        }

        if problems.is_empty() {
            CheckResult::pass("Every expected formula exists and has a stored result.")
        } else {
            CheckResult::fail(list_message("Problems with formulas", &problems), -10).into_fatal()
        }
    }
}

/// Array formulas where a plain formula belongs.
pub struct ArrayFormulaCheck;

impl Check<dyn SpreadsheetDocument, SheetAssignment> for ArrayFormulaCheck {
    fn name(&self) -> &str {
        "No array formulas"
    }

    fn run(&self, document: &dyn SpreadsheetDocument, _assignment: &SheetAssignment) -> CheckResult {
        let cells: Vec<String> = document
            .worksheets()
            .iter()
            .flat_map(|sheet| {
                document
                    .array_formula_cells(&sheet.name)
                    .into_iter()
                    .map(move |address| format!("{}!{}", sheet.name, address))
            })
            .collect();
        CheckResult::from_problems(
            &truncated(cells, 5),
            -10,
            "Array formulas are used instead of plain formulas",
            "No array formulas are used.",
        )
    }
}

static NAME_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z_][A-Z0-9_]*\b").expect("valid regex"));
static CELL_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$?[A-Z]{1,3}\$?\d+$").expect("valid regex"));

/// Formulas address cells directly instead of through named ranges.
pub struct NamedRangeUsageCheck;

impl Check<dyn SpreadsheetDocument, SheetAssignment> for NamedRangeUsageCheck {
    fn name(&self) -> &str {
        "No named ranges in formulas"
    }

    fn run(&self, document: &dyn SpreadsheetDocument, _assignment: &SheetAssignment) -> CheckResult {
        let names = document.defined_names();
        if names.is_empty() {
            return CheckResult::pass("The workbook defines no names.");
        }

        let mut problems = Vec::new();
        for cell in document.cells_with_formulas() {
            let formula = document.normalize_formula(&cell.formula);
            let used = NAME_TOKEN
                .find_iter(&formula)
                .map(|m| m.as_str())
                .filter(|token| !CELL_TOKEN.is_match(token))
                .find(|token| names.contains(*token));
            if let Some(name) = used {
                problems.push(format!("{}!{}: {}", cell.sheet, cell.address, name));
            }
        }
        CheckResult::from_problems(
            &truncated(problems, 5),
            -10,
            "Named ranges are used instead of cell addresses",
            "Formulas use cell addresses only.",
        )
    }
}

/// `$` markers where the expected formula has none.
pub struct RedundantAbsoluteReferenceCheck {
    sheet: String,
}

impl RedundantAbsoluteReferenceCheck {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
        }
    }
}

impl Check<dyn SpreadsheetDocument, SheetAssignment> for RedundantAbsoluteReferenceCheck {
    fn name(&self) -> &str {
        "No redundant absolute references"
    }

    fn run(&self, document: &dyn SpreadsheetDocument, assignment: &SheetAssignment) -> CheckResult {
        let mut problems = Vec::new();
        for (address, expected) in assignment.formulas() {
            let Some(formula) = document
                .cell(&self.sheet, address)
                .and_then(|c| c.formula.as_deref())
            else {
                continue;
            };
            let student = document.normalize_formula(formula);
            let expected = document.normalize_formula(expected);
            if student.replace('$', "") == expected.replace('$', "")
                && student.contains('$')
                && !expected.contains('$')
            {
                problems.push(format!("{}!{}: {}", self.sheet, address, formula));
            }
        }
        CheckResult::from_problems(
            &truncated(problems, 5),
            -10,
            "Absolute references are used where relative ones suffice",
            "Absolute references are used correctly.",
        )
    }
}

/// Formulas that would break when filled down or across: array formulas,
/// and formulas missing the absolute reference the expected one anchors.
pub struct NonCopyableFormulasCheck {
    sheet: String,
}

impl NonCopyableFormulasCheck {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
        }
    }
}

impl Check<dyn SpreadsheetDocument, SheetAssignment> for NonCopyableFormulasCheck {
    fn name(&self) -> &str {
        "Formulas can be copied"
    }

    fn run(&self, document: &dyn SpreadsheetDocument, assignment: &SheetAssignment) -> CheckResult {
        let Some(worksheet) = document.worksheet(&self.sheet) else {
            return missing_sheet(&self.sheet, -100);
        };

        let mut problems: Vec<String> = document
            .array_formula_cells(&worksheet.name)
            .into_iter()
            .map(|address| format!("{}!{}: array formula", self.sheet, address))
            .collect();
        for (address, expected) in assignment.formulas() {
            let Some(cell) = worksheet.cell(address) else {
                continue;
            };
            let Some(formula) = cell.formula.as_deref() else {
                continue;
            };
            if cell.is_array {
                continue;
            }
            if has_absolute_reference(expected) && !has_absolute_reference(formula) {
                problems.push(format!(
                    "{}!{}: {} has no absolute reference (expected {})",
                    self.sheet, address, formula, expected
                ));
            }
        }

        if problems.is_empty() {
            CheckResult::pass("Formulas can be copied.")
        } else {
            CheckResult::fail(
                list_message("Formulas cannot be copied", &truncated(problems, 5)),
                -100,
            )
            .into_fatal()
        }
    }
}

static FUNCTION_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z][A-Z0-9.]*)\(").expect("valid regex"));

/// The data sheet computes descriptive statistics with the required
/// functions.
pub struct DescriptiveStatisticsCheck {
    sheet: String,
    functions: Vec<String>,
}

impl DescriptiveStatisticsCheck {
    pub fn new<I, S>(sheet: impl Into<String>, functions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sheet: sheet.into(),
            functions: functions
                .into_iter()
                .map(|f| Into::<String>::into(f).to_uppercase())
                .collect(),
        }
    }
}

impl Check<dyn SpreadsheetDocument, SheetAssignment> for DescriptiveStatisticsCheck {
    fn name(&self) -> &str {
        "Descriptive statistics"
    }

    fn run(&self, document: &dyn SpreadsheetDocument, _assignment: &SheetAssignment) -> CheckResult {
        let Some(worksheet) = document.worksheet(&self.sheet) else {
            return missing_sheet(&self.sheet, -100);
        };

        let used: BTreeSet<String> = worksheet
            .cells
            .values()
            .filter_map(|c| c.formula.as_deref())
            .flat_map(|formula| {
                let formula = document.normalize_formula(formula);
                FUNCTION_CALL
                    .captures_iter(&formula)
                    .map(|c| c[1].to_string())
                    .collect::<Vec<_>>()
            })
            .collect();
        let missing: BTreeSet<&str> = self
            .functions
            .iter()
            .map(String::as_str)
            .filter(|f| !used.contains(*f))
            .collect();

        if missing.is_empty() {
            CheckResult::pass("The descriptive statistics are present.")
        } else {
            CheckResult::fail(
                format!(
                    "The descriptive statistics are missing, functions not found: {}",
                    missing.into_iter().collect::<Vec<_>>().join(", ")
                ),
                -100,
            )
            .into_fatal()
        }
    }
}
