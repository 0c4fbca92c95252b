//! Word (.docx) adapter.
//!
//! The package is read once: `word/styles.xml` becomes a [`Styles`] table,
//! `word/numbering.xml` a [`Numbering`], and the body is walked into
//! format-neutral blocks and sections. The result implements
//! [`TextDocument`](crate::document::TextDocument).
//!
//! # Example
//!
//! ```rust,no_run
//! use docgrade::document::TextDocument;
//! use docgrade::ooxml::docx::WordDocument;
//!
//! let doc = WordDocument::open("thesis.docx")?;
//! for heading in doc.headings() {
//!     println!("{} {}", heading.level, heading.text);
//! }
//! # Ok::<(), docgrade::common::Error>(())
//! ```

mod body;
pub mod document;
pub mod numbering;
pub mod section;
pub mod styles;

pub use document::WordDocument;
pub use numbering::{Numbering, NumberingLevel};
pub use styles::{Style, Styles, WdStyleType};
