//! The check engine.
//!
//! A check is an independent predicate over a loaded document and its
//! assignment. It never fails with an error: anything missing in the
//! document becomes a failing [`CheckResult`] with a penalty. A [`Runner`]
//! executes a list of checks in order and collects a [`Report`].
//!
//! # Example
//!
//! ```rust,no_run
//! use docgrade::assignment::load_text_assignment;
//! use docgrade::checks::{Runner, grade, text_catalog};
//! use docgrade::config::GradingOptions;
//! use docgrade::document::open_text_document;
//!
//! let document = open_text_document("thesis.docx")?;
//! let assignment = load_text_assignment("assignment.json")?;
//! let options = GradingOptions::default();
//!
//! let report = Runner::new(text_catalog(&options)).run(document.as_ref(), &assignment);
//! println!("{}", report);
//!
//! // The same in one call, picking the catalog from the file type.
//! let report = grade("thesis.docx", "assignment.json", &options)?;
//! assert!(report.total_points() <= 0);
//! # Ok::<(), docgrade::common::Error>(())
//! ```

pub mod catalog;
pub mod report;
pub mod result;
pub mod runner;
pub mod sheet;
pub mod text;

pub use catalog::{sheet_catalog, text_catalog};
pub use report::{Report, ReportEntry};
pub use result::CheckResult;
pub use runner::Runner;

use crate::assignment::{Assignment, SheetAssignment, TextAssignment, load_assignment};
use crate::common::{DocumentFormat, Result};
use crate::config::GradingOptions;
use crate::document::{TextDocument, open_text_document};
use crate::sheet::{SpreadsheetDocument, open_spreadsheet};
use std::path::Path;
use tracing::info;

/// A single grading rule.
///
/// `D` is the document interface the rule reads, `A` the assignment it
/// compares against. Checks hold no mutable state and may run in any order.
pub trait Check<D: ?Sized, A> {
    /// Name shown in the report.
    fn name(&self) -> &str;

    fn run(&self, document: &D, assignment: &A) -> CheckResult;
}

/// A check over Word and Writer documents.
pub type TextCheck = Box<dyn Check<dyn TextDocument, TextAssignment>>;

/// A check over Excel and Calc workbooks.
pub type SheetCheck = Box<dyn Check<dyn SpreadsheetDocument, SheetAssignment>>;

/// Grade one document file against an assignment file with the standard
/// catalog of its document family.
pub fn grade<P, Q>(document: P, assignment: Q, options: &GradingOptions) -> Result<Report>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let document = document.as_ref();
    let format = DocumentFormat::detect(document)?;
    info!(path = %document.display(), ?format, "grading");

    let report = match load_assignment(assignment, format.kind())? {
        Assignment::Text(assignment) => {
            let loaded = open_text_document(document)?;
            Runner::new(text_catalog(options))
                .with_fail_fast(options.fail_fast_on_fatal)
                .run(loaded.as_ref(), &assignment)
        },
        Assignment::Sheet(assignment) => {
            let loaded = open_spreadsheet(document)?;
            Runner::new(sheet_catalog(options))
                .with_fail_fast(options.fail_fast_on_fatal)
                .run(loaded.as_ref(), &assignment)
        },
    };
    Ok(report)
}
