//! Body reader: turns `w:body` into format-neutral blocks.
//!
//! Complex fields (`w:fldChar` begin/separate/end with `w:instrText`) may
//! span runs and paragraphs, so one field stack is kept across the whole
//! body. An instruction is attributed to the paragraph in which it is
//! completed. Text in the result of a TOC field marks its paragraph as an
//! index entry.

use super::styles::Styles;
use crate::common::xml::{Element, normalize_whitespace};
use crate::document::{Bibliography, Block, IndexKind, ObjectKind, Paragraph, TocItem, TocLink};
use crate::ooxml::namespaces::{A, M, W};
use std::ops::Range;

const HTML_MARKERS: [&str; 4] = ["&nbsp;", "&#160;", "<", ">"];

/// Run properties reported as direct formatting when set on a text run.
const DIRECT_PROPERTIES: [(&str, &str); 5] = [
    ("b", "bold"),
    ("i", "italic"),
    ("sz", "size"),
    ("rFonts", "font"),
    ("color", "color"),
];

/// A section as cut from the body, before its properties are resolved.
#[derive(Debug, Default)]
pub(crate) struct SectionDraft {
    pub blocks: Range<usize>,
    pub sect_pr: Option<Element>,
    pub field_codes: Vec<String>,
    pub has_text: bool,
    pub has_bibliography: bool,
}

/// Everything read from the body in one pass.
#[derive(Debug, Default)]
pub(crate) struct BodyContent {
    pub blocks: Vec<Block>,
    pub sections: Vec<SectionDraft>,
    pub bibliography: Bibliography,
    pub html_artifacts: bool,
    pub toc_items: Option<Vec<TocItem>>,
}

#[derive(Debug)]
struct OpenField {
    instruction: String,
    index: Option<IndexKind>,
    complete: bool,
}

#[derive(Debug, Default)]
struct ParagraphDraft {
    paragraph: Paragraph,
    visible: String,
    seen_text: bool,
    leading_page_break: bool,
}

pub(crate) struct BodyReader<'a> {
    styles: &'a Styles,
    fields: Vec<OpenField>,
    content: BodyContent,
    current: SectionDraft,
}

impl<'a> BodyReader<'a> {
    pub fn new(styles: &'a Styles) -> Self {
        Self {
            styles,
            fields: Vec::new(),
            content: BodyContent::default(),
            current: SectionDraft::default(),
        }
    }

    pub fn read(mut self, body: &Element) -> BodyContent {
        for child in body.elements() {
            self.block(child, false, false);
        }
        if self.current.blocks.start < self.content.blocks.len() {
            self.close_section(None);
        }
        self.content.bibliography.citations = body
            .descendants_named(W, "sdtPr")
            .filter(|pr| pr.child(W, "citation").is_some())
            .count();
        self.content
    }

    fn block(&mut self, el: &Element, in_control: bool, in_bibliography: bool) {
        if el.is(W, "p") {
            let paragraph = self.paragraph(el, in_control, in_bibliography);
            self.current.has_text |= paragraph.has_text();
            self.current
                .field_codes
                .extend(paragraph.field_codes.iter().cloned());
            self.content.blocks.push(Block::Paragraph(paragraph));
            if let Some(sect_pr) = el.path(&[(W, "pPr"), (W, "sectPr")]) {
                self.close_section(Some(sect_pr.clone()));
            }
        } else if el.is(W, "tbl") {
            self.content.blocks.push(Block::Table);
            for cell_paragraph in el.descendants_named(W, "p") {
                let paragraph = self.paragraph(cell_paragraph, true, false);
                self.current.has_text |= paragraph.has_text();
                self.current.field_codes.extend(paragraph.field_codes);
            }
        } else if el.is(W, "sdt") {
            let is_bibliography = el.path(&[(W, "sdtPr"), (W, "bibliography")]).is_some();
            if is_bibliography {
                self.content.bibliography.present = true;
                self.current.has_bibliography = true;
            }
            if let Some(content) = el.child(W, "sdtContent") {
                if self.content.toc_items.is_none() && is_toc_control(el) {
                    self.content.toc_items = Some(content.elements().filter_map(toc_item).collect());
                }
                for child in content.elements() {
                    self.block(child, true, in_bibliography || is_bibliography);
                }
            }
        } else if el.is(W, "sectPr") {
            self.close_section(Some(el.clone()));
        } else if el.is(W, "customXml") {
            for child in el.elements() {
                self.block(child, in_control, in_bibliography);
            }
        }
    }

    fn close_section(&mut self, sect_pr: Option<Element>) {
        let end = self.content.blocks.len();
        let mut finished = std::mem::take(&mut self.current);
        finished.blocks = finished.blocks.start..end;
        finished.sect_pr = sect_pr;
        self.content.sections.push(finished);
        self.current.blocks = end..end;
    }

    fn paragraph(&mut self, el: &Element, in_control: bool, in_bibliography: bool) -> Paragraph {
        let mut draft = ParagraphDraft::default();
        self.inline(el, &mut draft);

        let ParagraphDraft {
            mut paragraph,
            visible,
            leading_page_break,
            ..
        } = draft;
        paragraph.text = normalize_whitespace(&visible);
        paragraph.in_content_control = in_control;

        let ppr = el.child(W, "pPr");
        paragraph.style_id = ppr
            .and_then(|p| p.child(W, "pStyle"))
            .and_then(|s| s.attr(W, "val"))
            .map(str::to_string);
        let style = paragraph
            .style_id
            .as_deref()
            .and_then(|id| self.styles.get_by_id(id));
        paragraph.style_name = style.map(|s| s.display_name().to_string());
        paragraph.heading_level = style.and_then(|s| self.styles.heading_level(s));

        let own_num = ppr.and_then(|p| p.child(W, "numPr")).and_then(|num_pr| {
            let num_id = num_pr.child(W, "numId")?.attr(W, "val")?;
            let ilvl = num_pr.child(W, "ilvl").and_then(|l| l.attr(W, "val"));
            Some((num_id.to_string(), ilvl.map(str::to_string)))
        });
        let style_num = style.and_then(|s| self.styles.num_pr(s));
        paragraph.numbered = match &own_num {
            Some((num_id, _)) => num_id.trim().parse::<u32>().is_ok_and(|id| id > 0),
            None => style_num.is_some_and(|(num_id, _)| num_id > 0),
        };
        paragraph.num_id = match own_num {
            Some((num_id, ilvl)) if ilvl.as_deref().is_none_or(|l| l == "0") => Some(num_id),
            _ => style_num
                .filter(|&(num_id, ilvl)| num_id > 0 && ilvl == 0)
                .map(|(num_id, _)| num_id.to_string()),
        };

        let own_break = ppr
            .and_then(|p| p.child(W, "pageBreakBefore"))
            .is_some_and(|el| !matches!(el.attr(W, "val"), Some("0") | Some("false")));
        let resolved = style.map(|s| self.styles.resolve(s, None));
        paragraph.page_break_before = own_break
            || leading_page_break
            || resolved
                .as_ref()
                .is_some_and(|spec| spec.page_break_before == Some(true));

        let own_spacing = ppr
            .and_then(|p| p.child(W, "spacing"))
            .and_then(|s| s.attr_parse::<i64>(W, "before"));
        paragraph.spacing_before = own_spacing
            .or_else(|| resolved.as_ref().and_then(|spec| spec.space_before))
            .is_some_and(|before| before > 0);

        paragraph.caption_label = paragraph.field_codes.iter().find_map(|code| {
            let mut words = code.split_whitespace();
            let keyword = words.next()?;
            if keyword.eq_ignore_ascii_case("SEQ") {
                words.next().map(str::to_string)
            } else {
                None
            }
        });
        let ref_targets: Vec<String> = paragraph
            .field_codes
            .iter()
            .filter_map(|code| {
                let mut words = code.split_whitespace();
                if words.next()?.eq_ignore_ascii_case("REF") {
                    words.next().map(str::to_string)
                } else {
                    None
                }
            })
            .collect();
        paragraph.references.extend(ref_targets);

        if in_bibliography
            && paragraph.has_text()
            && paragraph.style_id.as_deref().is_some_and(|id| {
                id.eq_ignore_ascii_case("bibliografie") || id.eq_ignore_ascii_case("bibliography")
            })
        {
            self.content.bibliography.items.push(paragraph.text.clone());
        }

        paragraph
    }

    fn inline(&mut self, el: &Element, draft: &mut ParagraphDraft) {
        for child in el.elements() {
            if child.namespace() == M {
                if matches!(child.local_name(), "oMath" | "oMathPara") {
                    draft.paragraph.objects.push(ObjectKind::Equation);
                }
                continue;
            }
            if child.namespace() != W {
                self.inline(child, draft);
                continue;
            }
            match child.local_name() {
                "pPr" => {},
                "r" => self.run(child, draft),
                "hyperlink" => {
                    if let Some(anchor) = child.attr(W, "anchor") {
                        draft.paragraph.references.push(anchor.to_string());
                    }
                    self.inline(child, draft);
                },
                "fldSimple" => {
                    let instruction = child.attr(W, "instr").unwrap_or_default().trim();
                    if instruction.is_empty() {
                        self.inline(child, draft);
                        continue;
                    }
                    draft.paragraph.field_codes.push(instruction.to_string());
                    self.fields.push(OpenField {
                        instruction: instruction.to_string(),
                        index: IndexKind::from_instruction(instruction),
                        complete: true,
                    });
                    self.inline(child, draft);
                    self.fields.pop();
                },
                "bookmarkStart" => {
                    if let Some(name) = child.attr(W, "name") {
                        draft.paragraph.bookmarks.push(name.to_string());
                    }
                },
                "sdt" => {
                    if let Some(content) = child.child(W, "sdtContent") {
                        self.inline(content, draft);
                    }
                },
                "drawing" => push_drawing(child, draft),
                _ => self.inline(child, draft),
            }
        }
    }

    fn run(&mut self, run: &Element, draft: &mut ParagraphDraft) {
        let mut has_text = false;
        for child in run.elements() {
            if child.namespace() != W {
                continue;
            }
            match child.local_name() {
                "t" => {
                    let text = child.text();
                    if text.is_empty() {
                        continue;
                    }
                    if HTML_MARKERS.iter().any(|m| text.contains(m)) {
                        self.content.html_artifacts = true;
                    }
                    if !text.trim().is_empty() {
                        has_text = true;
                        draft.seen_text = true;
                    }
                    if draft.paragraph.index.is_none() {
                        draft.paragraph.index = self.fields.iter().rev().find_map(|f| f.index);
                    }
                    draft.visible.push_str(&text);
                    draft.paragraph.raw_text.push_str(&text);
                },
                "tab" => {
                    draft.visible.push(' ');
                    draft.paragraph.raw_text.push('\t');
                },
                "br" | "cr" => {
                    if child.attr(W, "type") == Some("page") {
                        if !draft.seen_text {
                            draft.leading_page_break = true;
                        }
                    } else {
                        draft.visible.push(' ');
                        draft.paragraph.raw_text.push('\n');
                    }
                },
                "fldChar" => match child.attr(W, "fldCharType") {
                    Some("begin") => self.fields.push(OpenField {
                        instruction: String::new(),
                        index: None,
                        complete: false,
                    }),
                    Some("separate") => self.complete_field(draft),
                    Some("end") => {
                        self.complete_field(draft);
                        self.fields.pop();
                    },
                    _ => {},
                },
                "instrText" => {
                    if let Some(top) = self.fields.last_mut()
                        && !top.complete
                    {
                        top.instruction.push_str(&child.text());
                    }
                },
                "drawing" => push_drawing(child, draft),
                _ => {},
            }
        }

        if has_text && let Some(rpr) = run.child(W, "rPr") {
            for (local, property) in DIRECT_PROPERTIES {
                if rpr.child(W, local).is_some()
                    && !draft.paragraph.direct_formatting.contains(&property)
                {
                    draft.paragraph.direct_formatting.push(property);
                }
            }
        }
    }

    fn complete_field(&mut self, draft: &mut ParagraphDraft) {
        let Some(top) = self.fields.last_mut() else {
            return;
        };
        if top.complete {
            return;
        }
        top.complete = true;
        let instruction = top.instruction.trim();
        if !instruction.is_empty() {
            top.index = IndexKind::from_instruction(instruction);
            draft.paragraph.field_codes.push(instruction.to_string());
        }
    }
}

fn push_drawing(drawing: &Element, draft: &mut ParagraphDraft) {
    let uri = drawing
        .find(A, "graphicData")
        .and_then(|g| g.attr("", "uri"))
        .unwrap_or_default();
    if uri.contains("picture") {
        draft.paragraph.objects.push(ObjectKind::Image);
    } else if uri.contains("chart") {
        draft.paragraph.objects.push(ObjectKind::Chart);
    }
}

/// A building-block control holding the table of contents.
fn is_toc_control(sdt: &Element) -> bool {
    let Some(part) = sdt.path(&[(W, "sdtPr"), (W, "docPartObj")]) else {
        return false;
    };
    part.child(W, "docPartGallery")
        .and_then(|g| g.attr(W, "val"))
        .is_none_or(|gallery| gallery.to_lowercase().contains("contents"))
}

/// Classify one top-level element of the table of contents control.
fn toc_item(el: &Element) -> Option<TocItem> {
    const MARKUP: &[&str] = &["bookmarkStart", "bookmarkEnd", "proofErr", "permStart", "permEnd"];
    if el.namespace() == W && MARKUP.contains(&el.local_name()) {
        return None;
    }
    if el.is(W, "tbl") {
        return Some(TocItem::Table);
    }
    if let Some(drawing) = el.find(W, "drawing") {
        let chart = drawing
            .find(A, "graphicData")
            .and_then(|g| g.attr("", "uri"))
            .is_some_and(|uri| uri.contains("chart"));
        let kind = if chart { ObjectKind::Chart } else { ObjectKind::Image };
        return Some(TocItem::Object(kind));
    }
    if el.contains(M, "oMath") || el.contains(M, "oMathPara") {
        return Some(TocItem::Object(ObjectKind::Equation));
    }
    if !el.is(W, "p") {
        return Some(TocItem::Unknown(el.local_name().to_string()));
    }
    let Some(link) = el.child(W, "hyperlink") else {
        return Some(TocItem::Entry {
            text: visible_text(el),
            link: None,
        });
    };
    let page_ref = link
        .descendants_named(W, "instrText")
        .any(|i| i.text().contains("PAGEREF"))
        || link
            .descendants_named(W, "fldSimple")
            .any(|f| f.attr(W, "instr").is_some_and(|i| i.contains("PAGEREF")));
    Some(TocItem::Entry {
        text: visible_text(link),
        link: Some(TocLink {
            anchor: link.attr(W, "anchor").map(str::to_string),
            page_ref,
        }),
    })
}

/// Text of `w:t` runs, leaving out runs Word hides on the web layout (page numbers).
fn visible_text(el: &Element) -> String {
    let text: String = el
        .descendants_named(W, "r")
        .filter(|r| r.path(&[(W, "rPr"), (W, "webHidden")]).is_none())
        .flat_map(|r| r.children_named(W, "t"))
        .map(Element::text)
        .collect();
    normalize_whitespace(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES: &str = r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Nadpis1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/>
    <w:pPr><w:pageBreakBefore/><w:numPr><w:numId w:val="2"/></w:numPr></w:pPr></w:style>
  <w:style w:type="paragraph" w:styleId="Titulek"><w:name w:val="caption"/></w:style>
</w:styles>"#;

    fn read(body: &str) -> BodyContent {
        let xml = format!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
  xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
  xmlns:m="http://schemas.openxmlformats.org/officeDocument/2006/math"><w:body>{}</w:body></w:document>"#,
            body
        );
        let root = Element::parse(xml.as_bytes()).unwrap();
        let styles = Styles::from_xml(&Element::parse(STYLES.as_bytes()).unwrap());
        BodyReader::new(&styles).read(root.child(W, "body").unwrap())
    }

    fn paragraphs(content: &BodyContent) -> Vec<&Paragraph> {
        content.blocks.iter().filter_map(Block::as_paragraph).collect()
    }

    #[test]
    fn test_heading_paragraph() {
        let content = read(
            r#"<w:p><w:pPr><w:pStyle w:val="Nadpis1"/></w:pPr>
                 <w:r><w:t xml:space="preserve">  Úvod </w:t></w:r><w:r><w:t>do práce</w:t></w:r></w:p>"#,
        );
        let p = paragraphs(&content)[0];
        assert_eq!(p.text, "Úvod do práce");
        assert_eq!(p.heading_level, Some(1));
        assert_eq!(p.style_name.as_deref(), Some("heading 1"));
        assert!(p.numbered);
        assert_eq!(p.num_id.as_deref(), Some("2"));
        assert!(p.page_break_before);
    }

    #[test]
    fn test_numbering_switched_off_on_paragraph() {
        let content = read(
            r#"<w:p><w:pPr><w:pStyle w:val="Nadpis1"/><w:numPr><w:ilvl w:val="0"/><w:numId w:val="0"/></w:numPr></w:pPr>
                 <w:r><w:t>Závěr</w:t></w:r></w:p>"#,
        );
        let p = paragraphs(&content)[0];
        assert!(!p.numbered);
        assert_eq!(p.num_id.as_deref(), Some("0"));
    }

    #[test]
    fn test_complex_field_spanning_paragraphs() {
        let content = read(
            r#"<w:p><w:r><w:fldChar w:fldCharType="begin"/></w:r>
                 <w:r><w:instrText xml:space="preserve"> TOC \o "1-3" </w:instrText></w:r>
                 <w:r><w:instrText>\h \z \u</w:instrText></w:r>
                 <w:r><w:fldChar w:fldCharType="separate"/></w:r>
                 <w:r><w:t>Úvod</w:t></w:r>
                 <w:r><w:fldChar w:fldCharType="begin"/></w:r><w:r><w:instrText> PAGEREF _Toc1 \h </w:instrText></w:r>
                 <w:r><w:fldChar w:fldCharType="separate"/></w:r><w:r><w:t>3</w:t></w:r><w:r><w:fldChar w:fldCharType="end"/></w:r></w:p>
               <w:p><w:r><w:t>Metodika</w:t></w:r></w:p>
               <w:p><w:r><w:fldChar w:fldCharType="end"/></w:r></w:p>
               <w:p><w:r><w:t>Text</w:t></w:r></w:p>"#,
        );
        let ps = paragraphs(&content);
        assert_eq!(
            ps[0].field_codes,
            vec![r#"TOC \o "1-3" \h \z \u"#.to_string(), r#"PAGEREF _Toc1 \h"#.to_string()]
        );
        assert_eq!(ps[0].index, Some(IndexKind::Contents));
        assert_eq!(ps[1].index, Some(IndexKind::Contents));
        assert_eq!(ps[3].index, None);
        assert!(ps[0].is_toc_like());
    }

    #[test]
    fn test_caption_bookmark_and_reference() {
        let content = read(
            r#"<w:p><w:r><w:drawing><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"/></a:graphic></w:drawing></w:r></w:p>
               <w:p><w:pPr><w:pStyle w:val="Titulek"/></w:pPr><w:bookmarkStart w:id="0" w:name="_Ref1"/>
                 <w:r><w:t xml:space="preserve">Obrázek </w:t></w:r>
                 <w:fldSimple w:instr=" SEQ Obrázek \* ARABIC "><w:r><w:t>1</w:t></w:r></w:fldSimple>
                 <w:bookmarkEnd w:id="0"/><w:r><w:t>: Schéma</w:t></w:r></w:p>
               <w:p><w:r><w:t xml:space="preserve">Viz </w:t></w:r><w:hyperlink w:anchor="_Ref1"><w:r><w:t>obrázek</w:t></w:r></w:hyperlink>
                 <w:r><w:fldChar w:fldCharType="begin"/></w:r><w:r><w:instrText> REF _Ref2 \h </w:instrText></w:r><w:r><w:fldChar w:fldCharType="end"/></w:r></w:p>
               <w:p><m:oMathPara><m:oMath/></m:oMathPara></w:p>"#,
        );
        let ps = paragraphs(&content);
        assert_eq!(ps[0].objects, vec![ObjectKind::Image]);
        assert!(!ps[0].is_empty());
        assert!(!ps[0].has_text());
        assert_eq!(ps[1].caption_label.as_deref(), Some("Obrázek"));
        assert_eq!(ps[1].text, "Obrázek 1: Schéma");
        assert_eq!(ps[1].bookmarks, vec!["_Ref1".to_string()]);
        assert_eq!(ps[2].references, vec!["_Ref1".to_string(), "_Ref2".to_string()]);
        assert_eq!(ps[3].objects, vec![ObjectKind::Equation]);
    }

    #[test]
    fn test_section_split() {
        let one = read(r#"<w:p><w:r><w:t>a</w:t></w:r></w:p><w:p/>"#);
        assert_eq!(one.sections.len(), 1);
        assert_eq!(one.sections[0].blocks, 0..2);
        assert!(one.sections[0].sect_pr.is_none());

        let two = read(
            r#"<w:p><w:pPr><w:sectPr/></w:pPr><w:r><w:t>a</w:t></w:r></w:p>
               <w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
               <w:sectPr><w:pgNumType w:start="1"/></w:sectPr>"#,
        );
        assert_eq!(two.sections.len(), 2);
        assert_eq!(two.sections[0].blocks, 0..1);
        assert_eq!(two.sections[1].blocks, 1..2);
        assert!(two.sections[1].has_text);
        assert!(two.sections[1].sect_pr.is_some());
        assert_eq!(two.blocks[1], Block::Table);
    }

    #[test]
    fn test_bibliography_and_citations() {
        let content = read(
            r#"<w:p><w:sdt><w:sdtPr><w:citation/></w:sdtPr><w:sdtContent><w:r><w:t>(Novák, 2020)</w:t></w:r></w:sdtContent></w:sdt></w:p>
               <w:sdt><w:sdtPr><w:bibliography/></w:sdtPr><w:sdtContent>
                 <w:p><w:pPr><w:pStyle w:val="Nadpis1"/></w:pPr><w:r><w:t>Literatura</w:t></w:r></w:p>
                 <w:p><w:pPr><w:pStyle w:val="Bibliografie"/></w:pPr><w:r><w:t>NOVÁK, Jan. Kniha. 2020.</w:t></w:r></w:p>
                 <w:p><w:pPr><w:pStyle w:val="Bibliografie"/></w:pPr></w:p>
               </w:sdtContent></w:sdt>"#,
        );
        assert!(content.bibliography.present);
        assert_eq!(content.bibliography.citations, 1);
        assert_eq!(content.bibliography.items, vec!["NOVÁK, Jan. Kniha. 2020.".to_string()]);
        assert!(content.sections[0].has_bibliography);
        let ps = paragraphs(&content);
        assert_eq!(ps[0].text, "(Novák, 2020)");
        assert!(ps[1].in_content_control);
    }

    #[test]
    fn test_direct_formatting_and_artifacts() {
        let content = read(
            r#"<w:p><w:r><w:rPr><w:b/><w:color w:val="FF0000"/></w:rPr><w:t>Tučně</w:t></w:r>
                 <w:r><w:rPr><w:sz w:val="40"/></w:rPr><w:t xml:space="preserve"> </w:t></w:r>
                 <w:r><w:t>a&amp;nbsp;b</w:t></w:r><w:r><w:tab/><w:t>x</w:t></w:r></w:p>"#,
        );
        let p = paragraphs(&content)[0];
        assert_eq!(p.direct_formatting, vec!["bold", "color"]);
        assert!(content.html_artifacts);
        assert_eq!(p.raw_text, "Tučně a&nbsp;b\tx");
    }

    #[test]
    fn test_toc_control_items() {
        let content = read(
            r##"<w:sdt><w:sdtPr><w:docPartObj><w:docPartGallery w:val="Table of Contents"/><w:docPartUnique/></w:docPartObj></w:sdtPr>
               <w:sdtContent>
                 <w:p><w:r><w:t>Obsah</w:t></w:r></w:p>
                 <w:p><w:r><w:fldChar w:fldCharType="begin"/></w:r><w:r><w:instrText xml:space="preserve"> TOC \o "1-3" \h </w:instrText></w:r><w:r><w:fldChar w:fldCharType="separate"/></w:r>
                   <w:hyperlink w:anchor="_Toc1"><w:r><w:t>Úvod</w:t></w:r><w:r><w:rPr><w:webHidden/></w:rPr><w:tab/></w:r>
                     <w:r><w:rPr><w:webHidden/></w:rPr><w:instrText xml:space="preserve"> PAGEREF _Toc1 \h </w:instrText></w:r>
                     <w:r><w:rPr><w:webHidden/></w:rPr><w:t>3</w:t></w:r></w:hyperlink></w:p>
                 <w:p><w:hyperlink w:anchor="_Toc2"><w:r><w:t>Závěr</w:t></w:r></w:hyperlink></w:p>
                 <w:p><w:r><w:t>Doplněno ručně</w:t></w:r></w:p>
                 <w:bookmarkEnd w:id="0"/>
                 <w:tbl><w:tr><w:tc><w:p/></w:tc></w:tr></w:tbl>
                 <w:p><w:r><w:drawing><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"/></a:graphic></w:drawing></w:r></w:p>
                 <w:p><m:oMathPara><m:oMath/></m:oMathPara></w:p>
                 <w:customXml/>
               </w:sdtContent></w:sdt>
               <w:sdt><w:sdtPr><w:docPartObj><w:docPartGallery w:val="Cover Pages"/></w:docPartObj></w:sdtPr>
                 <w:sdtContent><w:p><w:r><w:t>Titulní strana</w:t></w:r></w:p></w:sdtContent></w:sdt>"##,
        );
        let items = content.toc_items.as_ref().expect("toc control");
        assert_eq!(items.len(), 8);
        assert_eq!(
            items[0],
            TocItem::Entry { text: "Obsah".to_string(), link: None }
        );
        assert_eq!(
            items[1],
            TocItem::Entry {
                text: "Úvod".to_string(),
                link: Some(TocLink { anchor: Some("_Toc1".to_string()), page_ref: true }),
            }
        );
        assert_eq!(
            items[2],
            TocItem::Entry {
                text: "Závěr".to_string(),
                link: Some(TocLink { anchor: Some("_Toc2".to_string()), page_ref: false }),
            }
        );
        assert_eq!(
            items[3],
            TocItem::Entry { text: "Doplněno ručně".to_string(), link: None }
        );
        assert_eq!(items[4], TocItem::Table);
        assert_eq!(items[5], TocItem::Object(ObjectKind::Image));
        assert_eq!(items[6], TocItem::Object(ObjectKind::Equation));
        assert_eq!(items[7], TocItem::Unknown("customXml".to_string()));
        // the control content is still read as ordinary blocks
        assert!(paragraphs(&content).iter().any(|p| p.text == "Titulní strana"));
    }

    #[test]
    fn test_no_toc_control() {
        let content = read(r#"<w:p><w:r><w:t>Text</w:t></w:r></w:p>"#);
        assert!(content.toc_items.is_none());
    }
}
