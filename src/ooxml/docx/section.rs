//! Section properties of a Word document (`w:sectPr`).
//!
//! A section owns a header or footer only when its `w:sectPr` carries a
//! reference of that kind; without one Word shows the previous section's
//! (linked to previous). Referenced parts are reached through the
//! relationships of the main document part.

use crate::common::Package;
use crate::common::xml::Element;
use crate::document::{HeaderFooterState, SectionProperties};
use crate::ooxml::namespaces::{A, M, R, W};
use crate::ooxml::opc::Relationships;
use std::collections::HashMap;
use std::io::{Read, Seek};
use tracing::warn;

/// Resolves section breaks into [`SectionProperties`], loading each
/// header and footer part once.
pub(crate) struct SectionResolver<'a, R> {
    package: &'a Package<R>,
    rels: &'a Relationships,
    parts: HashMap<String, HeaderFooterState>,
}

impl<'a, R: Read + Seek> SectionResolver<'a, R> {
    pub fn new(package: &'a Package<R>, rels: &'a Relationships) -> Self {
        Self {
            package,
            rels,
            parts: HashMap::new(),
        }
    }

    pub fn resolve(&mut self, sect_pr: &Element) -> SectionProperties {
        SectionProperties {
            header: self.state(sect_pr, "headerReference"),
            footer: self.state(sect_pr, "footerReference"),
            page_number_start: sect_pr
                .child(W, "pgNumType")
                .and_then(|p| p.attr_parse(W, "start")),
        }
    }

    /// Combined state of every reference of one kind (default, first, even).
    fn state(&mut self, sect_pr: &Element, reference: &str) -> HeaderFooterState {
        let mut state = HeaderFooterState::Inherited;
        for r_id in sect_pr
            .children_named(W, reference)
            .filter_map(|r| r.attr(R, "id"))
        {
            state = merge(state, self.part_state(r_id));
        }
        state
    }

    fn part_state(&mut self, r_id: &str) -> HeaderFooterState {
        let Some(target) = self.rels.target_of(r_id) else {
            warn!(r_id, "header/footer reference without target");
            return HeaderFooterState::Empty;
        };
        if let Some(state) = self.parts.get(target.as_str()) {
            return *state;
        }
        let state = match self.package.optional_xml_part(target.membername()) {
            Ok(Some(root)) => analyze_part(&root),
            Ok(None) => {
                warn!(part = %target, "referenced header/footer part is missing");
                HeaderFooterState::Empty
            },
            Err(e) => {
                warn!(part = %target, error = %e, "cannot read header/footer part");
                HeaderFooterState::Empty
            },
        };
        self.parts.insert(target.as_str().to_string(), state);
        state
    }
}

/// Classify the content of a `w:hdr` or `w:ftr` part.
pub fn analyze_part(root: &Element) -> HeaderFooterState {
    let has_text = root
        .descendants_named(W, "t")
        .any(|t| !t.text().trim().is_empty());
    let instructions: Vec<String> = root
        .descendants()
        .filter_map(|el| {
            if el.is(W, "instrText") {
                Some(el.text())
            } else if el.is(W, "fldSimple") {
                el.attr(W, "instr").map(str::to_string)
            } else {
                None
            }
        })
        .filter(|instr| !instr.trim().is_empty())
        .collect();
    let has_drawing = root.contains(W, "drawing")
        || root.contains(W, "pict")
        || root.contains(A, "graphic")
        || root.contains(M, "oMath");

    if !has_text && instructions.is_empty() && !has_drawing {
        return HeaderFooterState::Empty;
    }
    HeaderFooterState::Content {
        has_text,
        has_page_field: instructions
            .iter()
            .any(|instr| instr.to_uppercase().contains("PAGE")),
    }
}

fn merge(a: HeaderFooterState, b: HeaderFooterState) -> HeaderFooterState {
    use HeaderFooterState::*;
    match (a, b) {
        (
            Content {
                has_text: t1,
                has_page_field: p1,
            },
            Content {
                has_text: t2,
                has_page_field: p2,
            },
        ) => Content {
            has_text: t1 || t2,
            has_page_field: p1 || p2,
        },
        (content @ Content { .. }, _) | (_, content @ Content { .. }) => content,
        (Empty, _) | (_, Empty) => Empty,
        (Inherited, Inherited) => Inherited,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::package::test_support::build_zip;
    use crate::ooxml::opc::PackURI;
    use std::io::Cursor;

    const NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#;

    fn part(body: &str) -> Element {
        Element::parse(format!("<w:ftr {}>{}</w:ftr>", NS, body).as_bytes()).unwrap()
    }

    #[test]
    fn test_analyze_part() {
        assert_eq!(
            analyze_part(&part(r#"<w:p><w:r><w:t xml:space="preserve">  </w:t></w:r></w:p>"#)),
            HeaderFooterState::Empty
        );
        assert_eq!(
            analyze_part(&part(r#"<w:p><w:fldSimple w:instr=" PAGE \* MERGEFORMAT "><w:r><w:t>1</w:t></w:r></w:fldSimple></w:p>"#)),
            HeaderFooterState::Content {
                has_text: true,
                has_page_field: true
            }
        );
        assert_eq!(
            analyze_part(&part(r#"<w:p><w:r><w:instrText>NUMPAGES</w:instrText></w:r></w:p>"#)),
            HeaderFooterState::Content {
                has_text: false,
                has_page_field: true
            }
        );
    }

    #[test]
    fn test_resolve_section() {
        let rels = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId8" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header1.xml"/>
  <Relationship Id="rId9" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer" Target="footer1.xml"/>
</Relationships>"#;
        let header = format!(r#"<w:hdr {}><w:p/></w:hdr>"#, NS);
        let footer = format!(
            r#"<w:ftr {}><w:p><w:r><w:fldChar w:fldCharType="begin"/></w:r><w:r><w:instrText> PAGE </w:instrText></w:r></w:p></w:ftr>"#,
            NS
        );
        let bytes = build_zip(&[
            ("word/_rels/document.xml.rels", rels),
            ("word/header1.xml", &header),
            ("word/footer1.xml", &footer),
        ]);
        let package = Package::from_reader(Cursor::new(bytes)).unwrap();
        let source = PackURI::new("/word/document.xml").unwrap();
        let rels = Relationships::load(&package, &source).unwrap();
        let mut resolver = SectionResolver::new(&package, &rels);

        let sect_pr = Element::parse(
            format!(
                r#"<w:sectPr {}><w:headerReference w:type="default" r:id="rId8"/><w:footerReference w:type="default" r:id="rId9"/><w:pgNumType w:start="1"/></w:sectPr>"#,
                NS
            )
            .as_bytes(),
        )
        .unwrap();
        let props = resolver.resolve(&sect_pr);
        assert_eq!(props.header, HeaderFooterState::Empty);
        assert!(props.footer.has_page_field());
        assert_eq!(props.page_number_start, Some(1));

        let bare = Element::parse(format!("<w:sectPr {}/>", NS).as_bytes()).unwrap();
        let props = resolver.resolve(&bare);
        assert!(props.header.is_inherited());
        assert!(props.footer.is_inherited());
    }

    #[test]
    fn test_merge_prefers_content() {
        let content = HeaderFooterState::Content {
            has_text: true,
            has_page_field: false,
        };
        assert_eq!(merge(HeaderFooterState::Empty, content), content);
        assert_eq!(
            merge(HeaderFooterState::Inherited, HeaderFooterState::Empty),
            HeaderFooterState::Empty
        );
    }
}
