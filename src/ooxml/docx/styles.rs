//! Styles: the `word/styles.xml` table and style resolution.
//!
//! Every property of a [`StyleSpec`] is resolved by walking the `w:basedOn`
//! chain and taking the first value found. Character toggles (bold, italic,
//! caps, underline) and the page break also look at the linked character
//! style (`w:link`) before continuing with `w:basedOn`. All walks keep a
//! visited set, so a cyclic chain ends instead of looping.

use crate::common::unit::{half_points_to_pt, line_to_multiple};
use crate::common::xml::Element;
use crate::document::StyleInfo;
use crate::ooxml::namespaces::W;
use crate::style::{StyleSpec, TabStop, TabStops};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

static HEADING_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(heading|nadpis)\s*([0-9]+)").expect("valid regex"));

/// Style type (`w:style/@w:type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WdStyleType {
    /// Paragraph style. Also the type of a style without `w:type`.
    #[default]
    Paragraph,
    /// Character style.
    Character,
    /// Table style.
    Table,
    /// List (numbering) style.
    List,
}

impl WdStyleType {
    /// Parse style type from XML attribute value.
    ///
    /// Returns `None` if the value is not recognized.
    #[inline]
    pub fn from_xml(s: &str) -> Option<Self> {
        match s {
            "paragraph" => Some(Self::Paragraph),
            "character" => Some(Self::Character),
            "table" => Some(Self::Table),
            "numbering" => Some(Self::List),
            _ => None,
        }
    }
}

impl fmt::Display for WdStyleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paragraph => write!(f, "Paragraph"),
            Self::Character => write!(f, "Character"),
            Self::Table => write!(f, "Table"),
            Self::List => write!(f, "List"),
        }
    }
}

/// A single style definition in a Word document.
///
/// Represents a `<w:style>` element. The paragraph and run property
/// elements are kept as parsed so resolution can read them later.
#[derive(Debug, Clone)]
pub struct Style {
    /// Style identifier (required)
    style_id: String,
    /// UI-visible name
    name: Option<String>,
    style_type: WdStyleType,
    /// Whether this is the default style for its type
    is_default: bool,
    is_custom: bool,
    /// ID of the style this is based on
    based_on: Option<String>,
    /// ID of the linked paragraph/character style
    link: Option<String>,
    ppr: Option<Element>,
    rpr: Option<Element>,
}

impl Style {
    fn from_xml(el: &Element) -> Option<Self> {
        let style_id = el.attr(W, "styleId")?.to_string();
        let flag = |local: &str| matches!(el.attr(W, local), Some("1") | Some("true"));
        let val_of = |local: &str| {
            el.child(W, local)
                .and_then(|c| c.attr(W, "val"))
                .map(str::to_string)
        };
        Some(Self {
            style_id,
            name: val_of("name"),
            style_type: el
                .attr(W, "type")
                .and_then(WdStyleType::from_xml)
                .unwrap_or_default(),
            is_default: flag("default"),
            is_custom: flag("customStyle"),
            based_on: val_of("basedOn"),
            link: val_of("link"),
            ppr: el.child(W, "pPr").cloned(),
            rpr: el.child(W, "rPr").cloned(),
        })
    }

    /// Get the style identifier.
    #[inline]
    pub fn style_id(&self) -> &str {
        &self.style_id
    }

    /// Get the style name.
    ///
    /// Returns `None` if no name is defined.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Display name, falling back to the identifier.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.style_id)
    }

    #[inline]
    pub fn style_type(&self) -> WdStyleType {
        self.style_type
    }

    #[inline]
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// Check if this is a custom (user-defined) style.
    #[inline]
    pub fn is_custom(&self) -> bool {
        self.is_custom
    }

    #[inline]
    pub fn based_on(&self) -> Option<&str> {
        self.based_on.as_deref()
    }

    /// Paragraph properties declared on this style itself.
    #[inline]
    pub fn ppr(&self) -> Option<&Element> {
        self.ppr.as_ref()
    }

    fn rpr_child(&self, local: &str) -> Option<&Element> {
        self.rpr.as_ref().and_then(|r| r.child(W, local))
    }

    fn ppr_child(&self, local: &str) -> Option<&Element> {
        self.ppr.as_ref().and_then(|p| p.child(W, local))
    }

    fn matches_name(&self, wanted: &str) -> bool {
        self.style_id.trim().eq_ignore_ascii_case(wanted)
            || self
                .name
                .as_deref()
                .is_some_and(|n| n.trim().to_lowercase() == wanted)
    }

    /// Numbering reference of this style's own `w:numPr`: `(numId, ilvl)`.
    /// `numId` 0 switches numbering off and yields `Some((0, _))`.
    pub fn num_pr(&self) -> Option<(u32, u32)> {
        let num_pr = self.ppr_child("numPr")?;
        let num_id = num_pr.child(W, "numId")?.attr_parse(W, "val")?;
        let ilvl = num_pr
            .child(W, "ilvl")
            .and_then(|l| l.attr_parse(W, "val"))
            .unwrap_or(0);
        Some((num_id, ilvl))
    }

    /// Tab stops declared on this style, skipping cleared ones.
    pub fn own_tabs(&self) -> Option<TabStops> {
        let tabs: TabStops = self
            .ppr_child("tabs")?
            .children_named(W, "tab")
            .filter_map(|tab| {
                let alignment = tab.attr(W, "val")?;
                if alignment == "clear" {
                    return None;
                }
                Some(TabStop::new(alignment, tab.attr_parse(W, "pos")?))
            })
            .collect();
        if tabs.is_empty() { None } else { Some(tabs) }
    }
}

/// The style table of a Word document.
///
/// Resolved specs are memoized per style id for the lifetime of the table.
#[derive(Debug, Default)]
pub struct Styles {
    style_list: Vec<Style>,
    by_id: HashMap<String, usize>,
    doc_default_size: Option<f64>,
    resolved: RefCell<HashMap<String, StyleSpec>>,
}

impl Styles {
    /// Build from a parsed `w:styles` root.
    pub fn from_xml(root: &Element) -> Self {
        let style_list: Vec<Style> = root
            .children_named(W, "style")
            .filter_map(Style::from_xml)
            .collect();
        let by_id = style_list
            .iter()
            .enumerate()
            .map(|(i, s)| (s.style_id.clone(), i))
            .collect();
        let doc_default_size = root
            .path(&[(W, "docDefaults"), (W, "rPrDefault"), (W, "rPr"), (W, "sz")])
            .and_then(|sz| sz.attr_parse::<i64>(W, "val"))
            .map(half_points_to_pt);
        Self {
            style_list,
            by_id,
            doc_default_size,
            resolved: RefCell::new(HashMap::new()),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.style_list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.style_list.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Style> {
        self.style_list.iter()
    }

    /// Font size from `w:docDefaults`, in points.
    #[inline]
    pub fn doc_default_size(&self) -> Option<f64> {
        self.doc_default_size
    }

    /// Get a style by its exact ID.
    pub fn get_by_id(&self, style_id: &str) -> Option<&Style> {
        self.by_id.get(style_id).map(|&i| &self.style_list[i])
    }

    /// Find a style by ID or display name, case-insensitively.
    pub fn find(&self, name: &str) -> Option<&Style> {
        let wanted = name.trim().to_lowercase();
        self.style_list.iter().find(|s| s.matches_name(&wanted))
    }

    /// The default paragraph style.
    pub fn default_paragraph(&self) -> Option<&Style> {
        self.style_list
            .iter()
            .find(|s| s.is_default && s.style_type == WdStyleType::Paragraph)
    }

    /// Identity and parent of a style.
    pub fn info(&self, style: &Style) -> StyleInfo {
        StyleInfo {
            id: style.style_id.clone(),
            name: style.display_name().to_string(),
            parent: self.parent_name(style),
            own_tabs: style.own_tabs(),
        }
    }

    fn parent_name(&self, style: &Style) -> Option<String> {
        let parent_id = style.based_on()?;
        Some(
            self.get_by_id(parent_id)
                .map_or(parent_id, Style::display_name)
                .to_string(),
        )
    }

    /// Walk `start` and its `w:basedOn` ancestors until `lookup` yields.
    fn walk_based_on<'a, T>(
        &'a self,
        start: &'a Style,
        mut lookup: impl FnMut(&'a Style) -> Option<T>,
    ) -> Option<T> {
        let mut visited = HashSet::new();
        let mut current = Some(start);
        while let Some(style) = current {
            if !visited.insert(style.style_id.as_str()) {
                debug!(style = %style.style_id, "basedOn cycle");
                break;
            }
            if let Some(found) = lookup(style) {
                return Some(found);
            }
            current = style.based_on().and_then(|id| self.get_by_id(id));
        }
        None
    }

    /// Like [`walk_based_on`](Self::walk_based_on), but a linked style is
    /// visited before the parent.
    fn walk_linked<'a, T>(
        &'a self,
        start: &'a Style,
        mut lookup: impl FnMut(&'a Style) -> Option<T>,
    ) -> Option<T> {
        let mut visited = HashSet::new();
        let mut current = Some(start);
        while let Some(style) = current {
            if !visited.insert(style.style_id.as_str()) {
                break;
            }
            if let Some(found) = lookup(style) {
                return Some(found);
            }
            let linked = style
                .link
                .as_deref()
                .and_then(|id| self.get_by_id(id))
                .filter(|l| !visited.contains(l.style_id.as_str()));
            current = linked.or_else(|| style.based_on().and_then(|id| self.get_by_id(id)));
        }
        None
    }

    fn toggle(&self, style: &Style, local: &str) -> Option<bool> {
        self.walk_linked(style, |s| {
            s.rpr_child(local)
                .map(|el| !matches!(el.attr(W, "val"), Some("0") | Some("false")))
        })
    }

    /// Heading level of a style: a "Heading N"/"Nadpis N" name first, then
    /// `w:outlineLvl`, walking up `w:basedOn`.
    pub fn heading_level(&self, style: &Style) -> Option<u32> {
        let found = self.walk_based_on(style, |s| {
            if let Some(name) = s.name()
                && let Some(caps) = HEADING_NAME.captures(&name.to_lowercase())
            {
                return Some(caps[2].parse::<u32>().ok());
            }
            s.ppr_child("outlineLvl")
                .and_then(|o| o.attr_parse::<u32>(W, "val"))
                .map(|lvl| (lvl < 9).then_some(lvl + 1))
        });
        found.flatten()
    }

    /// Numbering reference of a style, inherited along `w:basedOn`.
    pub fn num_pr(&self, style: &Style) -> Option<(u32, u32)> {
        self.walk_based_on(style, Style::num_pr)
    }

    /// Resolve a style into a [`StyleSpec`]. `default_alignment` applies
    /// when the style sets no `w:jc`.
    pub fn resolve(&self, style: &Style, default_alignment: Option<&str>) -> StyleSpec {
        let cached = self.resolved.borrow().get(&style.style_id).cloned();
        let mut spec = match cached {
            Some(spec) => spec,
            None => {
                let spec = self.build_spec(style);
                self.resolved
                    .borrow_mut()
                    .insert(style.style_id.clone(), spec.clone());
                spec
            },
        };
        if spec.alignment.is_none() {
            spec.alignment = default_alignment.map(str::to_string);
        }
        spec
    }

    fn build_spec(&self, style: &Style) -> StyleSpec {
        let mut spec = StyleSpec::named(style.display_name());

        spec.font = self.walk_based_on(style, |s| {
            let fonts = s.rpr_child("rFonts")?;
            ["ascii", "hAnsi", "cs"]
                .iter()
                .filter_map(|attr| fonts.attr(W, attr))
                .find(|f| !f.is_empty())
                .map(normalize_font)
        });
        spec.color = self.walk_based_on(style, |s| {
            s.rpr_child("color")
                .and_then(|c| c.attr(W, "val"))
                .filter(|v| !v.is_empty())
                .map(str::to_uppercase)
        });
        spec.size = self.walk_based_on(style, |s| {
            s.rpr_child("sz")
                .and_then(|sz| sz.attr_parse::<i64>(W, "val"))
                .map(half_points_to_pt)
        });
        spec.underline = self.walk_linked(style, |s| {
            s.rpr_child("u")
                .map(|u| u.attr(W, "val").unwrap_or("single") != "none")
        });
        spec.bold = self.toggle(style, "b");
        spec.italic = self.toggle(style, "i");
        spec.all_caps = self.toggle(style, "caps");
        spec.page_break_before = Some(
            self.walk_linked(style, |s| {
                s.ppr_child("pageBreakBefore")
                    .map(|el| !matches!(el.attr(W, "val"), Some("0") | Some("false")))
            })
            .unwrap_or(false),
        );

        spec.alignment = self.walk_based_on(style, |s| {
            s.ppr_child("jc")
                .and_then(|jc| jc.attr(W, "val"))
                .map(str::to_string)
        });
        spec.line_height = self.walk_based_on(style, |s| {
            s.ppr_child("spacing")
                .and_then(|sp| sp.attr_parse::<i64>(W, "line"))
                .map(line_to_multiple)
        });
        spec.space_before = self.walk_based_on(style, |s| {
            s.ppr_child("spacing").and_then(|sp| sp.attr_parse(W, "before"))
        });
        if let Some((num_id, ilvl)) = self.num_pr(style)
            && num_id > 0
        {
            spec.is_numbered = Some(true);
            spec.num_level = Some(ilvl);
        }
        spec.indent_left = self.walk_based_on(style, |s| {
            let ind = s.ppr_child("ind")?;
            ind.attr_parse(W, "left")
                .or_else(|| ind.attr_parse(W, "start"))
        });
        spec.indent_right = self.walk_based_on(style, |s| {
            let ind = s.ppr_child("ind")?;
            ind.attr_parse(W, "right").or_else(|| ind.attr_parse(W, "end"))
        });
        spec.indent_first_line = self.walk_based_on(style, |s| {
            s.ppr_child("ind").and_then(|ind| ind.attr_parse(W, "firstLine"))
        });
        spec.indent_hanging = self.walk_based_on(style, |s| {
            s.ppr_child("ind").and_then(|ind| ind.attr_parse(W, "hanging"))
        });
        spec.tabs = self.walk_based_on(style, Style::own_tabs);

        spec.based_on = self.parent_name(style);
        spec
    }
}

/// Drop a font's script suffix: "Calibri (Body)" becomes "Calibri".
fn normalize_font(font: &str) -> String {
    match font.find('(') {
        Some(pos) => font[..pos].trim().to_string(),
        None => font.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styles(body: &str) -> Styles {
        let xml = format!(
            r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">{}</w:styles>"#,
            body
        );
        Styles::from_xml(&Element::parse(xml.as_bytes()).unwrap())
    }

    const TABLE: &str = r#"
  <w:docDefaults><w:rPrDefault><w:rPr><w:sz w:val="22"/></w:rPr></w:rPrDefault></w:docDefaults>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:rPr><w:rFonts w:ascii="Calibri (Body)"/><w:color w:val="1f3864"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Nadpis1">
    <w:name w:val="heading 1"/>
    <w:basedOn w:val="Normal"/>
    <w:link w:val="Nadpis1Char"/>
    <w:pPr>
      <w:keepNext/><w:pageBreakBefore/>
      <w:numPr><w:numId w:val="3"/></w:numPr>
      <w:spacing w:before="480" w:line="360"/>
      <w:outlineLvl w:val="0"/>
    </w:pPr>
    <w:rPr><w:sz w:val="32"/></w:rPr>
  </w:style>
  <w:style w:type="character" w:customStyle="1" w:styleId="Nadpis1Char">
    <w:name w:val="Nadpis 1 Char"/>
    <w:link w:val="Nadpis1"/>
    <w:rPr><w:b/><w:i w:val="0"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:customStyle="1" w:styleId="Kapitola">
    <w:name w:val="Kapitola"/>
    <w:basedOn w:val="Nadpis1"/>
    <w:pPr><w:jc w:val="center"/><w:ind w:left="567" w:hanging="284"/>
      <w:tabs><w:tab w:val="left" w:pos="1134"/><w:tab w:val="clear" w:pos="2000"/><w:tab w:val="right" w:pos="9072"/></w:tabs>
    </w:pPr>
  </w:style>
  <w:style w:type="paragraph" w:customStyle="1" w:styleId="Podkapitola">
    <w:name w:val="Podkapitola"/>
    <w:basedOn w:val="Kapitola"/>
    <w:pPr><w:spacing w:before="120"/><w:ind w:firstLine="0"/></w:pPr>
    <w:rPr><w:sz w:val="23"/></w:rPr>
  </w:style>"#;

    #[test]
    fn test_resolve_with_inheritance() {
        let styles = styles(TABLE);
        let heading = styles.find("Heading 1").unwrap();
        let spec = styles.resolve(heading, Some("start"));
        assert_eq!(spec.name, "heading 1");
        assert_eq!(spec.font.as_deref(), Some("Calibri"));
        assert_eq!(spec.color.as_deref(), Some("1F3864"));
        assert_eq!(spec.size, Some(16.0));
        assert_eq!(spec.bold, Some(true));
        assert_eq!(spec.italic, Some(false));
        assert_eq!(spec.underline, None);
        assert_eq!(spec.page_break_before, Some(true));
        assert_eq!(spec.alignment.as_deref(), Some("start"));
        assert_eq!(spec.line_height, Some(1.5));
        assert_eq!(spec.space_before, Some(480));
        assert_eq!(spec.is_numbered, Some(true));
        assert_eq!(spec.num_level, Some(0));
        assert_eq!(spec.based_on.as_deref(), Some("Normal"));
        assert_eq!(styles.heading_level(heading), Some(1));
    }

    #[test]
    fn test_paragraph_properties_inherit_along_based_on() {
        let styles = styles(TABLE);
        let chapter = styles.find("kapitola").unwrap();
        let spec = styles.resolve(chapter, None);
        assert_eq!(spec.alignment.as_deref(), Some("center"));
        assert_eq!(spec.indent_left, Some(567));
        assert_eq!(spec.indent_hanging, Some(284));
        assert_eq!(spec.is_numbered, Some(true));
        assert_eq!(spec.num_level, Some(0));
        assert_eq!(spec.line_height, Some(1.5));
        assert_eq!(spec.space_before, Some(480));
        assert_eq!(
            spec.tabs,
            Some(vec![TabStop::new("left", 1134), TabStop::new("right", 9072)])
        );
        // character toggles come through basedOn -> link
        assert_eq!(spec.bold, Some(true));
        assert_eq!(spec.size, Some(16.0));
        assert_eq!(spec.based_on.as_deref(), Some("heading 1"));
        assert_eq!(styles.heading_level(chapter), Some(1));
        assert_eq!(styles.num_pr(chapter), Some((3, 0)));
    }

    #[test]
    fn test_each_property_resolves_independently() {
        let styles = styles(TABLE);
        let section = styles.find("Podkapitola").unwrap();
        let spec = styles.resolve(section, Some("start"));
        // own values win, the rest comes from Kapitola and Nadpis1
        assert_eq!(spec.space_before, Some(120));
        assert_eq!(spec.indent_first_line, Some(0));
        assert_eq!(spec.line_height, Some(1.5));
        assert_eq!(spec.alignment.as_deref(), Some("center"));
        assert_eq!(spec.indent_left, Some(567));
        assert_eq!(spec.is_numbered, Some(true));
        assert_eq!(
            spec.tabs,
            Some(vec![TabStop::new("left", 1134), TabStop::new("right", 9072)])
        );
        // odd half-points round down to whole points
        assert_eq!(spec.size, Some(11.0));
        assert_eq!(spec.based_on.as_deref(), Some("Kapitola"));
    }

    #[test]
    fn test_default_and_lookup() {
        let styles = styles(TABLE);
        assert_eq!(styles.doc_default_size(), Some(11.0));
        assert_eq!(styles.default_paragraph().unwrap().style_id(), "Normal");
        assert!(styles.find("NADPIS1").is_some());
        assert!(styles.find("Missing").is_none());
        let normal = styles.default_paragraph().unwrap();
        assert_eq!(styles.resolve(normal, None).size, None);
        assert_eq!(styles.heading_level(normal), None);
    }

    #[test]
    fn test_cyclic_chain_terminates() {
        let styles = styles(
            r#"
  <w:style w:type="paragraph" w:styleId="A"><w:name w:val="A"/><w:basedOn w:val="B"/><w:link w:val="B"/></w:style>
  <w:style w:type="paragraph" w:styleId="B"><w:name w:val="B"/><w:basedOn w:val="A"/><w:link w:val="A"/></w:style>"#,
        );
        let a = styles.find("A").unwrap();
        let spec = styles.resolve(a, None);
        assert_eq!(spec.bold, None);
        assert_eq!(spec.font, None);
        assert_eq!(styles.heading_level(a), None);
    }

    #[test]
    fn test_custom_style_named_heading() {
        let styles = styles(
            r#"
  <w:style w:type="paragraph" w:customStyle="1" w:styleId="MyHeading"><w:name w:val="Heading 1"/></w:style>
  <w:style w:type="paragraph" w:styleId="Body"><w:name w:val="Body"/><w:pPr><w:outlineLvl w:val="9"/></w:pPr></w:style>"#,
        );
        assert_eq!(styles.heading_level(styles.find("heading 1").unwrap()), Some(1));
        assert_eq!(styles.heading_level(styles.find("Body").unwrap()), None);
    }

    #[test]
    fn test_normalize_font() {
        assert_eq!(normalize_font("Times New Roman (Headings CS)"), "Times New Roman");
        assert_eq!(normalize_font(" Arial "), "Arial");
    }
}
