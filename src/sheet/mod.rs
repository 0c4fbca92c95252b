//! Format-neutral view of a spreadsheet.
//!
//! Excel (.xlsx) and Calc (.ods) workbooks are loaded by their adapters into
//! [`Worksheet`] models. Checks only talk to [`SpreadsheetDocument`], whose
//! queries are mostly provided on top of the loaded sheets.
//!
//! # Example
//!
//! ```rust,no_run
//! use docgrade::sheet::{SpreadsheetDocument, open_spreadsheet};
//!
//! let workbook = open_spreadsheet("results.xlsx")?;
//! for cell in workbook.cells_with_formulas() {
//!     println!("{}!{} {}", cell.sheet, cell.address, cell.formula);
//! }
//! # Ok::<(), docgrade::common::Error>(())
//! ```

pub mod coordinates;
pub mod formula;
pub mod types;

pub use coordinates::{CellCoord, CellRange};
pub use formula::{has_absolute_reference, normalize_formula};
pub use types::{
    Borders, CellInfo, CellStyle, CellValue, ChartInfo, ComparisonOperator, FormulaCell,
    FoundConditionalRule, Worksheet,
};

use crate::common::{DocumentFormat, Error, Result};
use std::collections::BTreeSet;
use std::path::Path;

/// Read-only queries over a loaded workbook.
///
/// Sheet names match exactly first and then ignoring case. Addresses are
/// A1 references and may carry `$` markers or a sheet qualifier.
pub trait SpreadsheetDocument {
    fn format(&self) -> DocumentFormat;

    /// Sheets in workbook order.
    fn worksheets(&self) -> &[Worksheet];

    /// Resolved formatting of a cell, `None` when the cell does not exist.
    fn cell_style(&self, sheet: &str, address: &str) -> Option<CellStyle>;

    /// Workbook-level names (named ranges), uppercased.
    fn defined_names(&self) -> &BTreeSet<String>;

    fn worksheet(&self, name: &str) -> Option<&Worksheet> {
        let sheets = self.worksheets();
        sheets
            .iter()
            .find(|s| s.name == name)
            .or_else(|| sheets.iter().find(|s| s.name.to_lowercase() == name.to_lowercase()))
    }

    fn sheet_names(&self) -> Vec<&str> {
        self.worksheets().iter().map(|s| s.name.as_str()).collect()
    }

    fn has_sheet(&self, name: &str) -> bool {
        self.worksheet(name).is_some()
    }

    fn cell(&self, sheet: &str, address: &str) -> Option<&CellInfo> {
        self.worksheet(sheet)?.cell(address)
    }

    /// Displayed text, or the cached value when there is none.
    fn cell_value(&self, sheet: &str, address: &str) -> Option<String> {
        self.cell(sheet, address).and_then(CellInfo::value)
    }

    fn has_formula(&self, sheet: &str, address: &str) -> bool {
        self.cell(sheet, address).is_some_and(CellInfo::has_formula)
    }

    /// Non-empty cells row by row.
    fn iter_cells(&self, sheet: &str) -> Vec<(CellCoord, &CellInfo)> {
        self.worksheet(sheet)
            .map(|s| s.cells.iter().map(|(coord, info)| (*coord, info)).collect())
            .unwrap_or_default()
    }

    /// Every formula cell of every sheet.
    fn cells_with_formulas(&self) -> Vec<FormulaCell> {
        self.worksheets()
            .iter()
            .flat_map(|sheet| {
                sheet.cells.iter().filter_map(move |(coord, info)| {
                    info.formula.as_ref().map(|formula| FormulaCell {
                        sheet: sheet.name.clone(),
                        address: coord.to_a1(),
                        formula: formula.clone(),
                    })
                })
            })
            .collect()
    }

    /// Addresses of cells that belong to an array formula.
    fn array_formula_cells(&self, sheet: &str) -> Vec<String> {
        self.iter_cells(sheet)
            .into_iter()
            .filter(|(_, info)| info.is_array)
            .map(|(coord, _)| coord.to_a1())
            .collect()
    }

    fn normalize_formula(&self, formula: &str) -> String {
        normalize_formula(formula)
    }

    fn merged_ranges(&self, sheet: &str) -> &[CellRange] {
        self.worksheet(sheet)
            .map(|s| s.merged.as_slice())
            .unwrap_or(&[])
    }

    fn has_conditional_formatting(&self, sheet: &str) -> bool {
        self.worksheet(sheet)
            .is_some_and(|s| s.has_conditional_formatting || !s.conditional_rules.is_empty())
    }

    /// Cell-value conditional formats of a sheet.
    fn conditional_rules(&self, sheet: &str) -> &[FoundConditionalRule] {
        self.worksheet(sheet)
            .map(|s| s.conditional_rules.as_slice())
            .unwrap_or(&[])
    }

    fn charts(&self, sheet: &str) -> &[ChartInfo] {
        self.worksheet(sheet)
            .map(|s| s.charts.as_slice())
            .unwrap_or(&[])
    }

    fn has_chart(&self, sheet: &str) -> bool {
        !self.charts(sheet).is_empty()
    }

    /// Plot type of the first chart.
    fn chart_type(&self, sheet: &str) -> Option<&str> {
        self.charts(sheet).first()?.chart_type.as_deref()
    }

    fn has_3d_chart(&self, sheet: &str) -> bool {
        self.charts(sheet).iter().any(|c| c.three_d)
    }

    fn chart_title(&self, sheet: &str) -> Option<&str> {
        self.charts(sheet).first()?.title.as_deref()
    }

    fn chart_x_label(&self, sheet: &str) -> Option<&str> {
        self.charts(sheet).first()?.x_label.as_deref()
    }

    fn chart_y_label(&self, sheet: &str) -> Option<&str> {
        self.charts(sheet).first()?.y_label.as_deref()
    }

    fn chart_has_data_labels(&self, sheet: &str) -> bool {
        self.charts(sheet).first().is_some_and(|c| c.data_labels)
    }
}

/// Open a .xlsx or .ods file behind the spreadsheet interface.
pub fn open_spreadsheet<P: AsRef<Path>>(path: P) -> Result<Box<dyn SpreadsheetDocument>> {
    let path = path.as_ref();
    match DocumentFormat::detect(path)? {
        #[cfg(feature = "ooxml")]
        DocumentFormat::Xlsx => Ok(Box::new(crate::ooxml::xlsx::ExcelDocument::open(path)?)),
        #[cfg(feature = "odf")]
        DocumentFormat::Ods => Ok(Box::new(crate::odf::ods::CalcDocument::open(path)?)),
        other => Err(Error::Unsupported(format!(
            "{:?} is not a spreadsheet format",
            other
        ))),
    }
}
