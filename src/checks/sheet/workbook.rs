//! Workbook layout: required sheets and data copied from the source sheet.

use super::truncated;
use crate::assignment::SheetAssignment;
use crate::checks::result::list_message;
use crate::checks::{Check, CheckResult};
use crate::sheet::{CellCoord, SpreadsheetDocument};
use regex::Regex;
use tracing::warn;

pub struct RequiredWorksheetCheck {
    sheet: String,
    name: String,
}

impl RequiredWorksheetCheck {
    pub fn new(sheet: impl Into<String>) -> Self {
        let sheet = sheet.into();
        Self {
            name: format!("Sheet \"{}\" exists", sheet),
            sheet,
        }
    }
}

impl Check<dyn SpreadsheetDocument, SheetAssignment> for RequiredWorksheetCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, document: &dyn SpreadsheetDocument, _assignment: &SheetAssignment) -> CheckResult {
        if document.has_sheet(&self.sheet) {
            CheckResult::pass(format!("The workbook contains the sheet \"{}\".", self.sheet))
        } else {
            CheckResult::fail(
                format!("The required sheet \"{}\" is missing.", self.sheet),
                -100,
            )
        }
    }
}

/// Every filled cell of the source sheet appears on the data sheet as a
/// relative reference to the same address, `=zdroj!B2` in Excel or
/// `of:=[$zdroj.B2]` in Calc.
pub struct CopiedFromSourceCheck {
    source: String,
    data: String,
}

impl CopiedFromSourceCheck {
    pub fn new(source: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            data: data.into(),
        }
    }

    fn reference_pattern(&self) -> Option<Regex> {
        let sheet = regex::escape(&self.source);
        let pattern = format!(
            r"(?i)^(?:of:)?=\s*(?:'?{sheet}'?!|\[\$?'?{sheet}'?\.)(\$?[A-Z]{{1,3}}\$?\d+)\]?\s*$"
        );
        match Regex::new(&pattern) {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!(sheet = %self.source, error = %e, "cannot build source reference pattern");
                None
            },
        }
    }
}

impl Check<dyn SpreadsheetDocument, SheetAssignment> for CopiedFromSourceCheck {
    fn name(&self) -> &str {
        "Data copied from the source sheet by reference"
    }

    fn run(&self, document: &dyn SpreadsheetDocument, _assignment: &SheetAssignment) -> CheckResult {
        let (Some(source), Some(data)) = (document.worksheet(&self.source), document.worksheet(&self.data))
        else {
            return CheckResult::pass("The source or data sheet is missing, nothing to compare.");
        };
        let Some(pattern) = self.reference_pattern() else {
            return CheckResult::skipped("the source sheet name cannot be matched");
        };

        let mut problems = Vec::new();
        for (coord, info) in &source.cells {
            if info.value().is_none() {
                continue;
            }
            let address = coord.to_a1();
            let Some(formula) = data.cells.get(coord).and_then(|c| c.formula.as_deref()) else {
                problems.push(format!("{}: the value is not taken by reference", address));
                continue;
            };
            let Some(reference) = pattern.captures(formula.trim()).and_then(|c| c.get(1)) else {
                problems.push(format!(
                    "{}: not a plain reference to the source sheet ({})",
                    address, formula
                ));
                continue;
            };
            let reference = reference.as_str();
            if reference.parse::<CellCoord>().ok() != Some(*coord) {
                problems.push(format!(
                    "{}: refers to a different source cell ({})",
                    address, reference
                ));
            } else if reference.contains('$') {
                problems.push(format!("{}: the reference is not relative ({})", address, formula));
            }
        }

        if problems.is_empty() {
            CheckResult::pass("The data sheet takes every source value by relative reference.")
        } else {
            CheckResult::fail(
                list_message(
                    "Values are not copied from the source sheet by reference",
                    &truncated(problems, 10),
                ),
                -5,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::sheet::fixture::FakeSheet;
    use crate::common::DocumentFormat;
    use crate::sheet::CellValue;

    #[test]
    fn test_required_sheet() {
        let doc = FakeSheet::xlsx().sheet("Zdroj").sheet("data");
        let a = SheetAssignment::default();
        assert!(RequiredWorksheetCheck::new("zdroj").run(&doc, &a).passed);
        let result = RequiredWorksheetCheck::new("souhrn").run(&doc, &a);
        assert_eq!(result.points, -100);
        assert_eq!(result.message, "The required sheet \"souhrn\" is missing.");
    }

    #[test]
    fn test_copied_from_source_excel() {
        let a = SheetAssignment::default();
        let doc = FakeSheet::xlsx()
            .text("zdroj", "A1", "Jméno")
            .text("zdroj", "B1", "Výška")
            .text("zdroj", "C1", "Váha")
            .text("zdroj", "D1", "Věk")
            .formula("data", "A1", "=zdroj!A1", CellValue::String("Jméno".into()))
            .formula("data", "B1", "='zdroj'!C1", CellValue::String("Váha".into()))
            .formula("data", "C1", "=zdroj!$C$1", CellValue::String("Váha".into()))
            .text("data", "D1", "Věk");
        let result = CopiedFromSourceCheck::new("zdroj", "data").run(&doc, &a);
        assert!(!result.passed);
        assert_eq!(result.points, -5);
        assert!(result.message.contains("B1: refers to a different source cell (C1)"));
        assert!(result.message.contains("C1: the reference is not relative"));
        assert!(result.message.contains("D1: the value is not taken by reference"));
        assert!(!result.message.contains("A1:"));
    }

    #[test]
    fn test_copied_from_source_calc() {
        let a = SheetAssignment::default();
        let doc = FakeSheet::new(DocumentFormat::Ods)
            .text("zdroj", "B2", "180")
            .formula("data", "B2", "of:=[$zdroj.B2]", CellValue::Number(180.0));
        assert!(CopiedFromSourceCheck::new("zdroj", "data").run(&doc, &a).passed);

        let only_data = FakeSheet::xlsx().sheet("data");
        assert!(CopiedFromSourceCheck::new("zdroj", "data").run(&only_data, &a).passed);
    }
}
