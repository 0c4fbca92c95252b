//! Visible text of ODF paragraphs.
//!
//! ODF compresses whitespace into elements: `<text:s text:c="3"/>` stands for
//! three spaces, `<text:tab/>` and `<text:line-break/>` for their characters.
//! Annotations, footnotes and anchored frames are not part of the visible
//! text of the paragraph that holds them.

use super::namespaces::{DRAW, OFFICE, TEXT};
use crate::common::xml::{Element, Node};

/// Text of an element with the whitespace elements expanded.
///
/// # Examples
///
/// ```
/// use docgrade::common::xml::Element;
/// use docgrade::odf::text::visible_text;
///
/// let p = Element::parse(
///     br#"<text:p xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0">a<text:s text:c="2"/>b<text:tab/>c</text:p>"#,
/// ).unwrap();
/// assert_eq!(visible_text(&p), "a  b\tc");
/// ```
pub fn visible_text(el: &Element) -> String {
    let mut out = String::new();
    push_text(el, &mut out);
    out
}

fn push_text(el: &Element, out: &mut String) {
    for node in el.nodes() {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(child) if child.namespace() == TEXT => match child.local_name() {
                "s" => {
                    let count = child.attr_parse::<usize>(TEXT, "c").unwrap_or(1);
                    out.extend(std::iter::repeat_n(' ', count));
                },
                "tab" => out.push('\t'),
                "line-break" => out.push('\n'),
                "note" => {},
                _ => push_text(child, out),
            },
            Node::Element(child) if child.is(OFFICE, "annotation") || child.is(DRAW, "frame") => {},
            Node::Element(child) => push_text(child, out),
        }
    }
}

/// Paragraphs of a cell or frame joined by newlines.
pub fn paragraphs_text(el: &Element) -> String {
    el.elements()
        .filter(|e| e.is(TEXT, "p") || e.is(TEXT, "h"))
        .map(visible_text)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = r#"xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0""#;

    #[test]
    fn test_special_whitespace() {
        let xml = format!(
            r#"<text:p {NS}>Úvod<text:s/>do<text:line-break/><text:span>práce</text:span><text:note><text:note-citation>1</text:note-citation><text:note-body><text:p>zdroj</text:p></text:note-body></text:note><office:annotation><text:p>poznámka</text:p></office:annotation></text:p>"#
        );
        let p = Element::parse(xml.as_bytes()).unwrap();
        assert_eq!(visible_text(&p), "Úvod do\npráce");
    }

    #[test]
    fn test_cell_paragraphs() {
        let xml = format!(
            r#"<table:table-cell xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" {NS}><text:p>Průměrná</text:p><text:p>výška</text:p></table:table-cell>"#
        );
        let cell = Element::parse(xml.as_bytes()).unwrap();
        assert_eq!(paragraphs_text(&cell), "Průměrná\nvýška");
    }
}
