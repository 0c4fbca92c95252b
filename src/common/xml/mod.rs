//! XML utilities shared by the OOXML and ODF adapters.

pub mod element;
pub mod escape;

pub use element::{Attribute, Element, Node};
pub use escape::{resolve_entity, unescape_xml};

/// Collapse runs of whitespace into single spaces and trim the ends.
///
/// # Examples
///
/// ```
/// use docgrade::common::xml::normalize_whitespace;
/// assert_eq!(normalize_whitespace("  Úvod \t do\n práce "), "Úvod do práce");
/// ```
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
