//! Expected document state, loaded from the assignment JSON.
//!
//! An assignment is read once per grading run and never changes afterwards.
//! Text documents are graded against a [`TextAssignment`], workbooks against
//! a [`SheetAssignment`]. Loose JSON shapes (numbers written as strings,
//! operator symbols instead of names) are settled here, so checks only see
//! typed values.
//!
//! # Example
//!
//! ```rust
//! use docgrade::assignment::TextAssignment;
//!
//! let assignment = TextAssignment::from_json(r#"{
//!     "styles": { "Heading 1": { "bold": true, "size": 16 } },
//!     "headlines": [ { "text": "Úvod", "level": 1 } ]
//! }"#)?;
//! assert_eq!(assignment.style("Heading 1").unwrap().size, Some(16.0));
//! # Ok::<(), docgrade::common::Error>(())
//! ```

mod loader;
mod ordered;
pub mod sheet;
pub mod text;

pub use loader::{Assignment, load_assignment, load_sheet_assignment, load_text_assignment};
pub use sheet::{BorderRegion, CellSpec, CellStyleSpec, ChartSpec, ConditionalFormatRule, SheetAssignment};
pub use text::{BibliographyEntry, ExpectedHeading, ExpectedObject, TextAssignment, is_builtin_style};

use serde::Deserialize;

/// A number that assignment authors sometimes write as a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().replace(',', ".").parse().ok(),
        }
    }
}
