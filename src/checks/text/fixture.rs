//! In-memory text document for check tests.

use crate::common::DocumentFormat;
use crate::document::{
    Bibliography, Block, Heading, HeadingNumbering, Paragraph, Section, StyleInfo, TextDocument,
    TocItem,
};
use crate::style::StyleSpec;
use std::collections::BTreeMap;

#[derive(Default)]
pub(crate) struct FakeText {
    pub styles: Vec<(StyleInfo, StyleSpec)>,
    pub normal: Option<StyleSpec>,
    pub heading_styles: BTreeMap<u32, StyleSpec>,
    pub numbering: BTreeMap<u32, HeadingNumbering>,
    pub default_size: Option<f64>,
    pub blocks: Vec<Block>,
    pub headings: Vec<Heading>,
    pub html: bool,
    pub bibliography: Bibliography,
    pub sections: Option<Vec<Section>>,
    pub toc_items: Option<Vec<TocItem>>,
}

impl FakeText {
    pub fn style(mut self, id: &str, name: &str, parent: Option<&str>, spec: StyleSpec) -> Self {
        let own_tabs = spec.tabs.clone();
        self.styles.push((
            StyleInfo {
                id: id.to_string(),
                name: name.to_string(),
                parent: parent.map(str::to_string),
                own_tabs,
            },
            StyleSpec {
                name: name.to_string(),
                ..spec
            },
        ));
        self
    }

    pub fn paragraph(mut self, paragraph: Paragraph) -> Self {
        if let Some(level) = paragraph.heading_level
            && paragraph.has_text()
        {
            self.headings.push(Heading::new(paragraph.text.clone(), level));
        }
        self.blocks.push(Block::Paragraph(paragraph));
        self
    }

    pub fn table(mut self) -> Self {
        self.blocks.push(Block::Table);
        self
    }

    pub fn numbered_headings(mut self, levels: u32) -> Self {
        for level in 1..=levels {
            self.numbering.insert(
                level,
                HeadingNumbering {
                    numbered: true,
                    hierarchical: true,
                    level: Some(level - 1),
                },
            );
        }
        self
    }

    fn find(&self, name: &str) -> Option<&(StyleInfo, StyleSpec)> {
        self.styles.iter().find(|(info, _)| {
            info.id.eq_ignore_ascii_case(name) || info.name.to_lowercase() == name.to_lowercase()
        })
    }
}

pub(crate) fn para(text: &str) -> Paragraph {
    Paragraph {
        text: text.trim().to_string(),
        raw_text: text.to_string(),
        ..Default::default()
    }
}

pub(crate) fn heading(text: &str, level: u32) -> Paragraph {
    Paragraph {
        style_id: Some(format!("Heading{}", level)),
        style_name: Some(format!("heading {}", level)),
        heading_level: Some(level),
        ..para(text)
    }
}

pub(crate) fn styled(text: &str, style: &str) -> Paragraph {
    Paragraph {
        style_id: Some(style.to_string()),
        style_name: Some(style.to_string()),
        ..para(text)
    }
}

impl TextDocument for FakeText {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Docx
    }

    fn normal_style(&self) -> Option<StyleSpec> {
        self.normal.clone()
    }

    fn heading_style(&self, level: u32) -> Option<StyleSpec> {
        self.heading_styles.get(&level).cloned()
    }

    fn style_by_any_name(
        &self,
        names: &[&str],
        default_alignment: Option<&str>,
    ) -> Option<StyleSpec> {
        let (_, spec) = names.iter().find_map(|name| self.find(name))?;
        let mut spec = spec.clone();
        if spec.alignment.is_none() {
            spec.alignment = default_alignment.map(str::to_string);
        }
        Some(spec)
    }

    fn doc_default_font_size(&self) -> Option<f64> {
        self.default_size
    }

    fn style_info(&self, name: &str) -> Option<StyleInfo> {
        self.find(name).map(|(info, _)| info.clone())
    }

    fn heading_numbering(&self, level: u32) -> HeadingNumbering {
        self.numbering.get(&level).copied().unwrap_or_default()
    }

    fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn headings(&self) -> &[Heading] {
        &self.headings
    }

    fn has_html_artifacts(&self) -> bool {
        self.html
    }

    fn bibliography(&self) -> &Bibliography {
        &self.bibliography
    }

    fn sections(&self) -> Option<&[Section]> {
        self.sections.as_deref()
    }

    fn toc_items(&self) -> Option<&[TocItem]> {
        self.toc_items.as_deref()
    }
}
