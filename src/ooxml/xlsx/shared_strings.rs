//! Shared strings table for Excel files.
//!
//! Cells with `t="s"` store an index into `xl/sharedStrings.xml` instead of
//! their text. Rich-text entries are split into runs; the table keeps the
//! concatenated text and drops phonetic guides (`rPh`).

use crate::common::xml::Element;
use crate::ooxml::namespaces::SML;

/// Shared strings table.
#[derive(Debug, Default)]
pub struct SharedStrings {
    strings: Vec<String>,
}

impl SharedStrings {
    /// Build from a parsed `<sst>` element.
    pub fn from_xml(root: &Element) -> Self {
        let strings = root
            .children_named(SML, "si")
            .map(|si| {
                let mut text = String::new();
                for child in si.elements() {
                    if child.is(SML, "t") {
                        text.push_str(&child.text());
                    } else if child.is(SML, "r") {
                        for t in child.children_named(SML, "t") {
                            text.push_str(&t.text());
                        }
                    }
                }
                text
            })
            .collect();
        Self { strings }
    }

    /// Get a string by its index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_and_rich_entries() {
        let xml = r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="3" uniqueCount="3">
  <si><t>Výška</t></si>
  <si><r><rPr><b/></rPr><t>Prů</t></r><r><t xml:space="preserve">měr </t></r><rPh sb="0" eb="1"><t>x</t></rPh></si>
  <si><t/></si>
</sst>"#;
        let table = SharedStrings::from_xml(&Element::parse(xml.as_bytes()).unwrap());
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(0), Some("Výška"));
        assert_eq!(table.get(1), Some("Průměr "));
        assert_eq!(table.get(2), Some(""));
        assert_eq!(table.get(3), None);
    }
}
