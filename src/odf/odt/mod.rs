//! OpenDocument Text (.odt) reading.
//!
//! [`WriterDocument`] reads `content.xml`, the optional `styles.xml` and the
//! embedded objects (`Object N/content.xml`) once, and answers the grading
//! queries of [`TextDocument`](crate::document::TextDocument) from memory.
//!
//! Style resolution goes through [`StyleTable`](crate::odf::styles::StyleTable):
//! a style's own properties, then its `style:parent-style-name` chain, then the
//! `style:default-style` of its family.

mod body;
pub mod document;

pub use document::WriterDocument;
