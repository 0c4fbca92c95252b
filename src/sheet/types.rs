//! Common types for spreadsheet introspection.

use super::coordinates::{CellCoord, CellRange};
use std::collections::BTreeMap;
use std::fmt;

/// Types of data that can be stored in a cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Empty cell
    #[default]
    Empty,
    /// Boolean value
    Bool(bool),
    /// Number as written in the file
    Number(f64),
    /// String value
    String(String),
    /// Error value (`#DIV/0!`, `#REF!`, ...)
    Error(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Error values, including errors stored as plain text.
    pub fn is_error(&self) -> bool {
        match self {
            Self::Error(_) => true,
            Self::String(s) => s.starts_with('#'),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Error(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) | Self::Error(s) => f.write_str(s),
        }
    }
}

/// Content of one cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellInfo {
    /// Formula with a leading `=`, in the file's own syntax
    pub formula: Option<String>,
    /// Last computed or entered value
    pub cached_value: CellValue,
    /// Displayed or entered text
    pub text: Option<String>,
    pub style_name: Option<String>,
    /// Part of an array (matrix) formula
    pub is_array: bool,
}

impl CellInfo {
    pub fn has_formula(&self) -> bool {
        self.formula.is_some()
    }

    pub fn is_error(&self) -> bool {
        self.cached_value.is_error()
    }

    /// Text when present, otherwise the cached value.
    pub fn value(&self) -> Option<String> {
        match &self.text {
            Some(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            _ if self.cached_value.is_empty() => None,
            _ => Some(self.cached_value.to_string()),
        }
    }
}

/// Border line styles of the four cell edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Borders {
    pub left: Option<String>,
    pub right: Option<String>,
    pub top: Option<String>,
    pub bottom: Option<String>,
}

/// Resolved formatting of a cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellStyle {
    /// Format code (XLSX) or data style name (ODS)
    pub number_format: Option<String>,
    pub decimal_places: Option<u32>,
    pub align_h: Option<String>,
    pub bold: bool,
    pub wrap: Option<bool>,
    pub borders: Borders,
}

/// Comparison operator of a cell-value conditional format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Equal,
    NotEqual,
}

impl ComparisonOperator {
    /// Parse the OOXML operator name (`greaterThan`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "greaterThan" => Some(Self::GreaterThan),
            "greaterThanOrEqual" => Some(Self::GreaterThanOrEqual),
            "lessThan" => Some(Self::LessThan),
            "lessThanOrEqual" => Some(Self::LessThanOrEqual),
            "equal" => Some(Self::Equal),
            "notEqual" => Some(Self::NotEqual),
            _ => None,
        }
    }

    /// Parse a comparison symbol (`>=`, `!=`).
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            ">" => Some(Self::GreaterThan),
            ">=" => Some(Self::GreaterThanOrEqual),
            "<" => Some(Self::LessThan),
            "<=" => Some(Self::LessThanOrEqual),
            "=" => Some(Self::Equal),
            "!=" | "<>" => Some(Self::NotEqual),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::GreaterThan => "greaterThan",
            Self::GreaterThanOrEqual => "greaterThanOrEqual",
            Self::LessThan => "lessThan",
            Self::LessThanOrEqual => "lessThanOrEqual",
            Self::Equal => "equal",
            Self::NotEqual => "notEqual",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A cell-value conditional format found in a sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundConditionalRule {
    /// Target range as written (`D2:D23`, `data.D2:data.D23`)
    pub range: String,
    pub operator: Option<ComparisonOperator>,
    pub value: Option<f64>,
    pub has_fill: bool,
    pub has_font_color: bool,
}

impl FoundConditionalRule {
    /// Target range parsed, when it is a plain cell range.
    pub fn cell_range(&self) -> Option<CellRange> {
        self.range
            .split_whitespace()
            .next()
            .and_then(|r| r.parse().ok())
    }
}

/// A formula cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaCell {
    pub sheet: String,
    pub address: String,
    pub formula: String,
}

/// A chart anchored in a sheet, reduced to what grading looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartInfo {
    /// Lowercase plot type: "bar", "line", "pie", ...
    pub chart_type: Option<String>,
    pub three_d: bool,
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub data_labels: bool,
}

/// One loaded sheet. Both adapters fill the same model; cells are keyed
/// by coordinate and iterate row by row.
#[derive(Debug, Clone, Default)]
pub struct Worksheet {
    pub name: String,
    pub cells: BTreeMap<CellCoord, CellInfo>,
    pub merged: Vec<CellRange>,
    pub conditional_rules: Vec<FoundConditionalRule>,
    /// Any conditional format at all, including kinds not typed above
    pub has_conditional_formatting: bool,
    pub charts: Vec<ChartInfo>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn cell(&self, address: &str) -> Option<&CellInfo> {
        let coord: CellCoord = address.parse().ok()?;
        self.cells.get(&coord)
    }
}
