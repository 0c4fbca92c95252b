//! In-memory workbook for check tests.

use crate::common::DocumentFormat;
use crate::sheet::{CellCoord, CellInfo, CellStyle, CellValue, SpreadsheetDocument, Worksheet};
use std::collections::{BTreeSet, HashMap};

pub(crate) struct FakeSheet {
    pub format: DocumentFormat,
    pub sheets: Vec<Worksheet>,
    pub styles: HashMap<(String, CellCoord), CellStyle>,
    pub names: BTreeSet<String>,
}

impl FakeSheet {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            sheets: Vec::new(),
            styles: HashMap::new(),
            names: BTreeSet::new(),
        }
    }

    pub fn xlsx() -> Self {
        Self::new(DocumentFormat::Xlsx)
    }

    pub fn sheet_mut(&mut self, name: &str) -> &mut Worksheet {
        let index = match self.sheets.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.sheets.push(Worksheet::new(name));
                self.sheets.len() - 1
            },
        };
        &mut self.sheets[index]
    }

    pub fn sheet(mut self, name: &str) -> Self {
        self.sheet_mut(name);
        self
    }

    pub fn cell(mut self, sheet: &str, address: &str, info: CellInfo) -> Self {
        let coord = address.parse().expect("test address");
        self.sheet_mut(sheet).cells.insert(coord, info);
        self
    }

    pub fn text(self, sheet: &str, address: &str, text: &str) -> Self {
        self.cell(
            sheet,
            address,
            CellInfo {
                cached_value: CellValue::String(text.to_string()),
                text: Some(text.to_string()),
                ..Default::default()
            },
        )
    }

    pub fn formula(self, sheet: &str, address: &str, formula: &str, cached: CellValue) -> Self {
        self.cell(
            sheet,
            address,
            CellInfo {
                formula: Some(formula.to_string()),
                cached_value: cached,
                ..Default::default()
            },
        )
    }

    pub fn style(mut self, sheet: &str, address: &str, style: CellStyle) -> Self {
        let coord = address.parse().expect("test address");
        self.styles.insert((sheet.to_string(), coord), style);
        self
    }
}

impl SpreadsheetDocument for FakeSheet {
    fn format(&self) -> DocumentFormat {
        self.format
    }

    fn worksheets(&self) -> &[Worksheet] {
        &self.sheets
    }

    /// Explicit styles first, the default style for any other address of an
    /// existing sheet.
    fn cell_style(&self, sheet: &str, address: &str) -> Option<CellStyle> {
        let worksheet = self.worksheet(sheet)?;
        let coord: CellCoord = address.parse().ok()?;
        Some(
            self.styles
                .get(&(worksheet.name.clone(), coord))
                .cloned()
                .unwrap_or_default(),
        )
    }

    fn defined_names(&self) -> &BTreeSet<String> {
        &self.names
    }
}
