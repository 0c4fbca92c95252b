//! Body reader: turns `office:text` into format-neutral blocks.
//!
//! Lists, sections and generated indexes are flattened into the block list.
//! Paragraphs inside the `text:index-body` of an index are marked as entries
//! of that index. Paragraphs inside a frame's text box (image captions) are
//! emitted right after the paragraph anchoring the frame. ODF fields are
//! reported with the instruction names Word uses (`PAGE`, `SEQ`, `REF`), so
//! the checks see one vocabulary.

use crate::common::xml::{Element, normalize_whitespace};
use crate::document::{Bibliography, Block, IndexKind, ObjectKind, Paragraph};
use crate::odf::namespaces::{DRAW, FO, MATH, OFFICE, STYLE, TABLE, TEXT, XLINK};
use crate::odf::styles::{OdfStyle, StyleTable, decode_name, is_bold_weight};
use crate::odf::text::visible_text;
use std::collections::HashMap;

const HTML_MARKERS: [&str; 4] = ["&nbsp;", "&#160;", "<", ">"];

/// Span properties reported as direct formatting.
const DIRECT_PROPERTIES: [(&str, &str, &str); 4] = [
    (FO, "font-size", "size"),
    (STYLE, "font-name", "font"),
    (FO, "color", "color"),
    (FO, "background-color", "highlight"),
];

/// What the table of contents declares about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TocInfo {
    pub levels: (u32, u32),
    pub shows_numbers: bool,
}

/// Everything read from the body in one pass.
#[derive(Debug, Default)]
pub(crate) struct BodyContent {
    pub blocks: Vec<Block>,
    pub bibliography: Bibliography,
    pub html_artifacts: bool,
    pub toc: Option<TocInfo>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Context<'e> {
    index: Option<IndexKind>,
    list_style: Option<&'e str>,
    in_bibliography: bool,
}

pub(crate) struct BodyReader<'a> {
    styles: &'a StyleTable,
    /// Embedded object directories (`Object 1`) by kind
    objects: &'a HashMap<String, ObjectKind>,
    content: BodyContent,
}

impl<'a> BodyReader<'a> {
    pub fn new(styles: &'a StyleTable, objects: &'a HashMap<String, ObjectKind>) -> Self {
        Self {
            styles,
            objects,
            content: BodyContent::default(),
        }
    }

    pub fn read(mut self, text: &Element) -> BodyContent {
        for child in text.elements() {
            self.block(child, Context::default());
        }
        self.content
    }

    fn block<'e>(&mut self, el: &'e Element, ctx: Context<'e>) {
        if el.namespace() == TEXT {
            match el.local_name() {
                "p" | "h" => self.paragraph(el, ctx),
                "list" => {
                    let ctx = Context {
                        list_style: el.attr(TEXT, "style-name").or(ctx.list_style),
                        ..ctx
                    };
                    for item in el.elements() {
                        if item.is(TEXT, "list-item") || item.is(TEXT, "list-header") {
                            for child in item.elements() {
                                self.block(child, ctx);
                            }
                        }
                    }
                },
                "section" => {
                    for child in el.elements() {
                        self.block(child, ctx);
                    }
                },
                "index-body" => {
                    for child in el.elements() {
                        if child.is(TEXT, "index-title") {
                            let title = Context {
                                index: None,
                                in_bibliography: false,
                                ..ctx
                            };
                            for title_child in child.elements() {
                                self.block(title_child, title);
                            }
                        } else {
                            self.block(child, ctx);
                        }
                    }
                },
                local => {
                    if let Some(index) = index_kind(local) {
                        self.index(el, index, ctx);
                    }
                },
            }
        } else if el.is(TABLE, "table") {
            self.content.blocks.push(Block::Table);
        }
    }

    fn index<'e>(&mut self, el: &'e Element, index: IndexKind, ctx: Context<'e>) {
        let is_bibliography = el.is(TEXT, "bibliography");
        if is_bibliography {
            self.content.bibliography.present = true;
        }
        if el.is(TEXT, "table-of-content") && self.content.toc.is_none() {
            self.content.toc = Some(toc_info(el));
        }
        let ctx = Context {
            index: Some(index),
            in_bibliography: ctx.in_bibliography || is_bibliography,
            ..ctx
        };
        if let Some(body) = el.child(TEXT, "index-body") {
            self.block(body, ctx);
        }
    }

    fn paragraph(&mut self, el: &Element, ctx: Context<'_>) {
        let raw_text = visible_text(el);
        if HTML_MARKERS.iter().any(|m| raw_text.contains(m)) {
            self.content.html_artifacts = true;
        }

        let style = el.attr(TEXT, "style-name").and_then(|n| self.styles.get(n));
        let heading_level = if el.is(TEXT, "h") {
            el.attr_parse::<u32>(TEXT, "outline-level")
                .or_else(|| style.and_then(|s| self.styles.walk(s, OdfStyle::default_outline_level)))
                .filter(|&level| level > 0)
        } else {
            None
        };

        let mut paragraph = Paragraph {
            text: normalize_whitespace(&raw_text),
            raw_text,
            style_id: el.attr(TEXT, "style-name").map(str::to_string),
            style_name: style.map(|s| self.user_style_name(s)),
            heading_level,
            num_id: ctx.list_style.map(str::to_string),
            ..Default::default()
        };

        paragraph.numbered = match heading_level {
            Some(level) => self.styles.heading_numbering(level).numbered,
            None => {
                ctx.list_style.is_some()
                    || style.is_some_and(|s| self.styles.walk(s, OdfStyle::list_style_name).is_some())
            },
        };
        if let Some(style) = style {
            paragraph.page_break_before =
                self.styles.resolve(style, None).page_break_before == Some(true);
            paragraph.spacing_before = self.styles.has_spacing_before(style);
        }
        paragraph.index = ctx.index.or_else(|| {
            paragraph
                .style_name
                .as_deref()
                .filter(|name| looks_like_index_style(name))
                .map(|_| IndexKind::Other)
        });

        let mut nested = Vec::new();
        self.inline(el, &mut paragraph, &mut nested);

        if ctx.in_bibliography && ctx.index.is_some() && paragraph.has_text() {
            self.content.bibliography.items.push(paragraph.text.clone());
        }
        self.content.blocks.push(Block::Paragraph(paragraph));

        for frame_text in nested {
            for child in frame_text.elements() {
                self.block(child, Context::default());
            }
        }
    }

    /// Walk inline content for fields, objects, anchors and span formatting.
    /// Text boxes of frames are collected into `nested`.
    fn inline<'e>(&mut self, el: &'e Element, paragraph: &mut Paragraph, nested: &mut Vec<&'e Element>) {
        for child in el.elements() {
            if child.is(DRAW, "frame") {
                self.frame(child, paragraph, nested);
                continue;
            }
            if child.is(OFFICE, "annotation") || child.is(TEXT, "note") {
                continue;
            }
            if child.namespace() == TEXT {
                match child.local_name() {
                    "sequence" => {
                        if let Some(name) = child.attr(TEXT, "name") {
                            paragraph.field_codes.push(format!("SEQ {}", name));
                            if paragraph.caption_label.is_none() {
                                paragraph.caption_label = Some(name.to_string());
                            }
                        }
                        if let Some(anchor) = child.attr(TEXT, "ref-name") {
                            paragraph.bookmarks.push(anchor.to_string());
                        }
                    },
                    "bookmark" | "bookmark-start" | "reference-mark" | "reference-mark-start" => {
                        if let Some(name) = child.attr(TEXT, "name") {
                            paragraph.bookmarks.push(name.to_string());
                        }
                    },
                    "sequence-ref" | "bookmark-ref" | "reference-ref" => {
                        if let Some(name) = child.attr(TEXT, "ref-name") {
                            paragraph.field_codes.push(format!("REF {}", name));
                            paragraph.references.push(name.to_string());
                        }
                    },
                    "a" => {
                        if let Some(anchor) = child
                            .attr(XLINK, "href")
                            .and_then(|href| href.strip_prefix('#'))
                        {
                            paragraph.references.push(anchor.to_string());
                        }
                    },
                    "page-number" => paragraph.field_codes.push("PAGE".to_string()),
                    "page-count" => paragraph.field_codes.push("NUMPAGES".to_string()),
                    "bibliography-mark" => {
                        self.content.bibliography.citations += 1;
                        let id = child.attr(TEXT, "identifier").unwrap_or_default();
                        paragraph.field_codes.push(format!("CITATION {}", id).trim().to_string());
                    },
                    "span" => self.span_formatting(child, paragraph),
                    _ => {},
                }
            }
            self.inline(child, paragraph, nested);
        }
    }

    fn frame<'e>(&mut self, frame: &'e Element, paragraph: &mut Paragraph, nested: &mut Vec<&'e Element>) {
        for content in frame.elements() {
            if content.is(DRAW, "text-box") {
                nested.push(content);
            } else if content.is(DRAW, "object") || content.is(DRAW, "object-ole") {
                let kind = if content.contains(MATH, "math") {
                    Some(ObjectKind::Equation)
                } else {
                    content
                        .attr(XLINK, "href")
                        .map(object_dir)
                        .and_then(|dir| self.objects.get(dir).copied())
                };
                paragraph.objects.extend(kind);
            } else if content.is(DRAW, "image") && !paragraph.objects.contains(&ObjectKind::Image) {
                // a frame may carry the same image in several formats
                paragraph.objects.push(ObjectKind::Image);
            }
        }
    }

    fn span_formatting(&self, span: &Element, paragraph: &mut Paragraph) {
        if visible_text(span).trim().is_empty() {
            return;
        }
        let Some(props) = span
            .attr(TEXT, "style-name")
            .and_then(|n| self.styles.get(n))
            .filter(|s| s.is_automatic())
            .and_then(|s| s.properties("text-properties"))
        else {
            return;
        };
        let mut found = Vec::new();
        if props.attr(FO, "font-weight").is_some_and(is_bold_weight) {
            found.push("bold");
        }
        if props.attr(FO, "font-style").is_some_and(|s| s == "italic") {
            found.push("italic");
        }
        for (ns, local, property) in DIRECT_PROPERTIES {
            if props.attr(ns, local).is_some() {
                found.push(property);
            }
        }
        for property in found {
            if !paragraph.direct_formatting.contains(&property) {
                paragraph.direct_formatting.push(property);
            }
        }
    }

    /// Name of the style the user picked: automatic styles stand for their parent.
    fn user_style_name(&self, style: &OdfStyle) -> String {
        match style.parent() {
            Some(parent) if style.is_automatic() => self
                .styles
                .get(parent)
                .map_or_else(|| decode_name(parent), OdfStyle::display_name),
            _ => style.display_name(),
        }
    }
}

fn index_kind(local: &str) -> Option<IndexKind> {
    match local {
        "table-of-content" => Some(IndexKind::Contents),
        "illustration-index" => Some(IndexKind::Figures),
        "table-index" => Some(IndexKind::Tables),
        "bibliography" | "user-index" | "alphabetical-index" | "object-index" => {
            Some(IndexKind::Other)
        },
        _ => None,
    }
}

fn looks_like_index_style(name: &str) -> bool {
    let lower = name.to_lowercase();
    (lower.starts_with("contents ") && !lower.contains("heading"))
        || ["toc", "obsah", "seznam"].iter().any(|k| lower.contains(k))
}

/// `./Object 1` or `Object 1/` to `Object 1`.
fn object_dir(href: &str) -> &str {
    href.trim_start_matches("./").trim_end_matches('/')
}

fn toc_info(toc: &Element) -> TocInfo {
    let source = toc.child(TEXT, "table-of-content-source");
    let last = source
        .and_then(|s| s.attr_parse::<u32>(TEXT, "outline-level"))
        .unwrap_or(10);
    let shows_numbers = source.is_some_and(|s| {
        s.children_named(TEXT, "table-of-content-entry-template")
            .any(|t| t.contains(TEXT, "index-entry-chapter"))
    });
    TocInfo {
        levels: (1, last),
        shows_numbers,
    }
}
