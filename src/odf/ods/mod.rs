//! OpenDocument Spreadsheet (.ods) reading.
//!
//! Every `table:table` of `content.xml` becomes a
//! [`Worksheet`](crate::sheet::Worksheet). Cell styles resolve through the
//! shared [`StyleTable`](crate::odf::styles::StyleTable), falling back to the
//! column's default cell style. Charts live either inline or in embedded
//! objects (`Object 1/content.xml`) referenced from a `draw:object` on the
//! sheet.
//!
//! # Example
//!
//! ```rust,no_run
//! use docgrade::odf::ods::CalcDocument;
//! use docgrade::sheet::SpreadsheetDocument;
//!
//! let workbook = CalcDocument::open("results.ods")?;
//! for cell in workbook.cells_with_formulas() {
//!     println!("{} {}", cell.address, workbook.normalize_formula(&cell.formula));
//! }
//! # Ok::<(), docgrade::common::Error>(())
//! ```

mod chart;
mod document;
mod table;

pub use document::CalcDocument;
