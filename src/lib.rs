//! Docgrade - automatic grading of Word, Writer, Excel and Calc assignments
//!
//! A student's document is loaded into a format-neutral model, compared
//! against an assignment (the expected styles, headings, formulas, cell
//! formats and chart) and graded by a list of independent checks. Every
//! failed check carries a penalty; the report sums them.
//!
//! # Features
//!
//! - **Style resolution**: paragraph styles flattened along their inheritance
//!   chain into a [`style::StyleSpec`], with a tolerant field-by-field diff
//! - **Text documents**: headings, sections, headers and footers, TOC and
//!   index fields, captions, cross references and bibliography (.docx, .odt)
//! - **Spreadsheets**: cells, formulas, number formats, borders, merged
//!   cells, conditional formats and charts (.xlsx, .ods)
//! - **Check engine**: penalties, fatal failures, a runner and text or YAML
//!   reports
//!
//! # Example - Grading a document
//!
//! ```no_run
//! use docgrade::checks::grade;
//! use docgrade::config::GradingOptions;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = grade("thesis.docx", "assignment.json", &GradingOptions::default())?;
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Inspecting a document
//!
//! ```no_run
//! use docgrade::document::{TextDocument, open_text_document};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let document = open_text_document("thesis.odt")?;
//! for heading in document.headings() {
//!     println!("{} {}", heading.level, heading.text);
//! }
//! if let Some(style) = document.heading_style(1) {
//!     println!("Heading 1 is {:?} {:?}", style.font, style.size);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Inspecting a workbook
//!
//! ```no_run
//! use docgrade::sheet::{SpreadsheetDocument, open_spreadsheet};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let workbook = open_spreadsheet("results.xlsx")?;
//! println!("{:?}", workbook.cell_value("data", "B28"));
//! println!("{:?}", workbook.chart_type("data"));
//! # Ok(())
//! # }
//! ```

/// Shared infrastructure: errors, ZIP packages, XML trees and units
pub mod common;

/// Resolved style model and the style diff
pub mod style;

/// Format-neutral model of Word and Writer documents
pub mod document;

/// Format-neutral model of Excel and Calc workbooks
pub mod sheet;

/// OOXML (Office Open XML) adapters for .docx and .xlsx
#[cfg(feature = "ooxml")]
pub mod ooxml;

/// OpenDocument adapters for .odt and .ods
#[cfg(feature = "odf")]
pub mod odf;

/// Expected state of a graded document
pub mod assignment;

/// Rubric constants and tolerances
pub mod config;

/// Checks, the runner and reports
pub mod checks;

// Re-export commonly used types for convenience
pub use checks::{Check, CheckResult, Report, Runner, grade};
pub use common::{DocumentFormat, DocumentKind, Error, Result};
pub use config::GradingOptions;
