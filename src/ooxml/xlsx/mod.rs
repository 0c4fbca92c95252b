//! Excel (.xlsx) adapter.
//!
//! The workbook part lists the sheets; each sheet part is resolved through
//! `xl/_rels/workbook.xml.rels` and read against the shared strings and the
//! style sheet. Charts are reached from a sheet's `<drawing>` through the
//! drawing's own relationships. The result implements
//! [`SpreadsheetDocument`](crate::sheet::SpreadsheetDocument).
//!
//! # Example
//!
//! ```rust,no_run
//! use docgrade::ooxml::xlsx::ExcelDocument;
//! use docgrade::sheet::SpreadsheetDocument;
//!
//! let workbook = ExcelDocument::open("results.xlsx")?;
//! println!("sheets: {:?}", workbook.sheet_names());
//! println!("chart: {:?}", workbook.chart_type("data"));
//! # Ok::<(), docgrade::common::Error>(())
//! ```

mod chart;
mod shared_strings;
pub mod styles;
mod workbook;
mod worksheet;

pub use shared_strings::SharedStrings;
pub use styles::StyleSheet;
pub use workbook::ExcelDocument;
