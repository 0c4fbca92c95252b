//! Styles of an ODF package and their resolution.
//!
//! Named styles live in `styles.xml` (`office:styles`), automatic styles in
//! the `office:automatic-styles` of either part. A lookup by internal name
//! prefers the automatic styles of `content.xml`, since that is where body
//! elements point. Properties are resolved along `style:parent-style-name`
//! and end at the `style:default-style` of the family. Every walk keeps a
//! visited set, so a cyclic chain ends instead of looping.

use super::namespaces::{FO, LOEXT, NUMBER, OFFICE, STYLE, TEXT};
use crate::common::unit::{parse_points, parse_twips};
use crate::common::xml::Element;
use crate::document::{HeadingNumbering, StyleInfo};
use crate::style::{StyleSpec, TabStop, TabStops};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A `style:style` or `style:default-style` element.
#[derive(Debug, Clone)]
pub struct OdfStyle {
    name: String,
    display_name: Option<String>,
    family: Option<String>,
    parent: Option<String>,
    is_default: bool,
    automatic: bool,
    element: Element,
}

impl OdfStyle {
    fn from_xml(el: &Element, automatic: bool) -> Option<Self> {
        Some(Self {
            name: el.attr(STYLE, "name")?.to_string(),
            display_name: el.attr(STYLE, "display-name").map(str::to_string),
            family: el.attr(STYLE, "family").map(str::to_string),
            parent: el.attr(STYLE, "parent-style-name").map(str::to_string),
            is_default: false,
            automatic,
            element: el.clone(),
        })
    }

    fn default_from_xml(el: &Element) -> Self {
        let family = el.attr(STYLE, "family").unwrap_or("paragraph");
        Self {
            name: format!("Default {} style", family),
            display_name: None,
            family: Some(family.to_string()),
            parent: None,
            is_default: true,
            automatic: false,
            element: el.clone(),
        }
    }

    /// Internal name (`style:name`).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// UI name: `style:display-name`, else the internal name with the
    /// `_20_` space escapes decoded.
    pub fn display_name(&self) -> String {
        match &self.display_name {
            Some(name) => name.clone(),
            None => decode_name(&self.name),
        }
    }

    #[inline]
    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    #[inline]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Declared in `office:automatic-styles`: formatting attached to one
    /// element rather than a style the user picked.
    #[inline]
    pub fn is_automatic(&self) -> bool {
        self.automatic
    }

    /// A property element (`style:text-properties`, `style:paragraph-properties`, ...).
    pub fn properties(&self, local: &str) -> Option<&Element> {
        self.element.child(STYLE, local)
    }

    fn text_prop(&self, ns: &str, local: &str) -> Option<&str> {
        self.properties("text-properties")?.attr(ns, local)
    }

    fn paragraph_prop(&self, ns: &str, local: &str) -> Option<&str> {
        self.properties("paragraph-properties")?.attr(ns, local)
    }

    /// Number style applied to cells of this style.
    pub fn data_style_name(&self) -> Option<&str> {
        self.element.attr(STYLE, "data-style-name")
    }

    /// `style:default-outline-level`, 1-based.
    pub fn default_outline_level(&self) -> Option<u32> {
        self.element
            .attr_parse::<u32>(STYLE, "default-outline-level")
            .filter(|&level| level > 0)
    }

    /// List style a paragraph style attaches its paragraphs to.
    pub fn list_style_name(&self) -> Option<&str> {
        self.element
            .attr(STYLE, "list-style-name")
            .filter(|name| !name.is_empty())
    }

    /// Conditional maps (`style:map`) declared on this style.
    pub fn maps(&self) -> impl Iterator<Item = &Element> {
        self.element.children_named(STYLE, "map")
    }

    fn matches_name(&self, wanted: &str) -> bool {
        self.name.to_lowercase() == wanted
            || decode_name(&self.name).to_lowercase() == wanted
            || self
                .display_name
                .as_deref()
                .is_some_and(|n| n.trim().to_lowercase() == wanted)
    }

    /// Tab stops declared on this style itself.
    pub fn own_tabs(&self) -> Option<TabStops> {
        tab_stops(self.properties("paragraph-properties")?)
    }
}

/// Decode the `_20_` escapes ODF uses for spaces in style names.
pub(crate) fn decode_name(name: &str) -> String {
    name.replace("_20_", " ")
}

fn tab_stops(paragraph_properties: &Element) -> Option<TabStops> {
    let tabs: TabStops = paragraph_properties
        .child(STYLE, "tab-stops")?
        .children_named(STYLE, "tab-stop")
        .filter_map(|tab| {
            let position = parse_twips(tab.attr(STYLE, "position")?)?;
            Some(TabStop::new(tab.attr(STYLE, "type").unwrap_or("left"), position))
        })
        .collect();
    if tabs.is_empty() { None } else { Some(tabs) }
}

/// Every style of a package, with resolved specs memoized by name.
#[derive(Debug, Default)]
pub struct StyleTable {
    style_list: Vec<OdfStyle>,
    by_name: HashMap<String, usize>,
    defaults: Vec<OdfStyle>,
    outline: Option<Element>,
    decimal_places: HashMap<String, u32>,
    resolved: RefCell<HashMap<String, StyleSpec>>,
}

impl StyleTable {
    /// Collect styles from `content.xml` and the optional `styles.xml`.
    pub fn from_parts(content: &Element, styles: Option<&Element>) -> Self {
        let containers = [
            Some((content, "automatic-styles")),
            styles.map(|s| (s, "styles")),
            styles.map(|s| (s, "automatic-styles")),
            Some((content, "styles")),
        ];

        let mut table = Self::default();
        for (root, container_name) in containers.into_iter().flatten() {
            let Some(container) = root.child(OFFICE, container_name) else {
                continue;
            };
            for el in container.elements() {
                if el.is(STYLE, "style") {
                    if let Some(style) = OdfStyle::from_xml(el, container_name == "automatic-styles") {
                        let index = table.style_list.len();
                        table.by_name.entry(style.name.clone()).or_insert(index);
                        table.style_list.push(style);
                    }
                } else if el.is(STYLE, "default-style") {
                    table.defaults.push(OdfStyle::default_from_xml(el));
                } else if el.namespace() == NUMBER
                    && matches!(
                        el.local_name(),
                        "number-style" | "percentage-style" | "currency-style"
                    )
                    && let Some(name) = el.attr(STYLE, "name")
                    && let Some(places) = el
                        .children_named(NUMBER, "number")
                        .find_map(|n| n.attr_parse::<u32>(NUMBER, "decimal-places"))
                {
                    table.decimal_places.entry(name.to_string()).or_insert(places);
                }
            }
        }

        table.outline = styles
            .and_then(|s| s.find(TEXT, "outline-style"))
            .or_else(|| content.find(TEXT, "outline-style"))
            .cloned();
        table
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.style_list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.style_list.is_empty()
    }

    /// A style by its exact internal name.
    pub fn get(&self, name: &str) -> Option<&OdfStyle> {
        self.by_name.get(name).map(|&i| &self.style_list[i])
    }

    /// Find a style by internal or display name, case-insensitively.
    pub fn find(&self, name: &str) -> Option<&OdfStyle> {
        if let Some(style) = self.get(name) {
            return Some(style);
        }
        let wanted = name.trim().to_lowercase();
        self.style_list.iter().find(|s| s.matches_name(&wanted))
    }

    /// The `style:default-style` of a family.
    pub fn default_style(&self, family: &str) -> Option<&OdfStyle> {
        self.defaults.iter().find(|s| s.family() == Some(family))
    }

    /// The base paragraph style: "Standard" when the document has it,
    /// otherwise the paragraph default style.
    pub fn default_paragraph(&self) -> Option<&OdfStyle> {
        self.find("Standard")
            .or_else(|| self.find("Default Paragraph Style"))
            .or_else(|| self.default_style("paragraph"))
    }

    /// Font size of the paragraph default style, truncated to whole points.
    pub fn doc_default_size(&self) -> Option<f64> {
        self.default_style("paragraph")
            .or_else(|| self.defaults.first())
            .and_then(|s| s.text_prop(FO, "font-size"))
            .and_then(parse_points)
            .map(f64::trunc)
    }

    /// Decimal places declared by a number style.
    pub fn decimal_places(&self, data_style: &str) -> Option<u32> {
        self.decimal_places.get(data_style).copied()
    }

    /// Identity and parent of a style.
    pub fn info(&self, style: &OdfStyle) -> StyleInfo {
        StyleInfo {
            id: style.name.clone(),
            name: style.display_name(),
            parent: self.parent_name(style),
            own_tabs: style.own_tabs(),
        }
    }

    fn parent_name(&self, style: &OdfStyle) -> Option<String> {
        let parent = style.parent()?;
        Some(
            self.get(parent)
                .map_or_else(|| decode_name(parent), OdfStyle::display_name),
        )
    }

    /// Walk `start`, its parents, and finally the default style of its
    /// family until `lookup` yields.
    pub fn walk<'a, T>(
        &'a self,
        start: &'a OdfStyle,
        mut lookup: impl FnMut(&'a OdfStyle) -> Option<T>,
    ) -> Option<T> {
        let mut visited = HashSet::new();
        let mut current = Some(start);
        while let Some(style) = current {
            if !visited.insert(style.name.as_str()) {
                debug!(style = %style.name, "parent-style-name cycle");
                break;
            }
            if let Some(found) = lookup(style) {
                return Some(found);
            }
            current = style.parent().and_then(|name| self.get(name));
        }
        if start.is_default {
            return None;
        }
        self.default_style(start.family().unwrap_or("paragraph"))
            .and_then(lookup)
    }

    fn text_walk<'a>(&'a self, style: &'a OdfStyle, ns: &'a str, local: &'a str) -> Option<&'a str> {
        self.walk(style, |s| s.text_prop(ns, local))
    }

    fn paragraph_walk<'a>(&'a self, style: &'a OdfStyle, ns: &'a str, local: &'a str) -> Option<&'a str> {
        self.walk(style, |s| s.paragraph_prop(ns, local))
    }

    /// Whether a paragraph of this style has space above it.
    pub fn has_spacing_before(&self, style: &OdfStyle) -> bool {
        self.paragraph_walk(style, FO, "margin-top")
            .and_then(parse_twips)
            .is_some_and(|twips| twips != 0)
    }

    /// Outline numbering of one heading level (`text:outline-style`).
    pub fn heading_numbering(&self, level: u32) -> HeadingNumbering {
        let Some(level_style) = self.outline_level_style(level) else {
            return HeadingNumbering::default();
        };
        if level_style.attr(STYLE, "num-format").is_none_or(str::is_empty) {
            return HeadingNumbering::default();
        }
        let list_format = level_style
            .attr(LOEXT, "num-list-format")
            .or_else(|| level_style.attr(TEXT, "num-list-format"));
        let hierarchical = match list_format {
            Some(format) => (1..=level).all(|i| format.contains(&format!("%{}%", i))),
            None => level_style.attr_parse::<u32>(TEXT, "display-levels").unwrap_or(1) >= level,
        };
        HeadingNumbering {
            numbered: true,
            hierarchical,
            level: Some(level - 1),
        }
    }

    fn outline_level_style(&self, level: u32) -> Option<&Element> {
        self.outline
            .as_ref()?
            .children_named(TEXT, "outline-level-style")
            .find(|l| l.attr_parse::<u32>(TEXT, "level") == Some(level))
    }

    /// Resolve a style into a [`StyleSpec`]. `default_alignment` applies
    /// when the style itself sets no `fo:text-align`.
    pub fn resolve(&self, style: &OdfStyle, default_alignment: Option<&str>) -> StyleSpec {
        let key = if style.is_default {
            format!("\0{}", style.name)
        } else {
            style.name.clone()
        };
        let cached = self.resolved.borrow().get(&key).cloned();
        let mut spec = match cached {
            Some(spec) => spec,
            None => {
                let spec = self.build_spec(style);
                self.resolved.borrow_mut().insert(key, spec.clone());
                spec
            },
        };
        if spec.alignment.is_none() {
            spec.alignment = default_alignment.map(str::to_string);
        }
        spec
    }

    fn build_spec(&self, style: &OdfStyle) -> StyleSpec {
        let mut spec = StyleSpec::named(style.display_name());

        spec.font = self
            .text_walk(style, STYLE, "font-name")
            .or_else(|| self.text_walk(style, FO, "font-family"))
            .map(|f| f.trim_matches(['\'', '"']).to_string());
        spec.size = self
            .walk(style, |s| s.text_prop(FO, "font-size").map(parse_points))
            .flatten()
            .map(f64::trunc);
        spec.bold = Some(
            self.walk(style, |s| {
                if let Some(weight) = s.text_prop(FO, "font-weight") {
                    return Some(is_bold_weight(weight));
                }
                s.text_prop(STYLE, "font-style-name")
                    .filter(|name| name.to_lowercase().contains("bold"))
                    .map(|_| true)
            })
            .unwrap_or(false),
        );
        spec.italic = Some(
            self.text_walk(style, FO, "font-style")
                .is_some_and(|s| matches!(s, "italic" | "oblique")),
        );
        spec.underline = self
            .text_walk(style, STYLE, "text-underline-style")
            .map(|u| u != "none");
        spec.all_caps = Some(self.text_walk(style, FO, "text-transform") == Some("uppercase"));
        spec.color = Some(
            self.text_walk(style, FO, "color")
                .map(|c| c.trim_start_matches('#').to_uppercase())
                .unwrap_or_else(|| "000000".to_string()),
        );

        spec.alignment = self
            .paragraph_walk(style, FO, "text-align")
            .map(str::to_string);
        spec.line_height = self
            .paragraph_walk(style, FO, "line-height")
            .and_then(|h| h.strip_suffix('%'))
            .and_then(|pct| pct.trim().parse::<f64>().ok())
            .map(|pct| pct / 100.0);
        spec.page_break_before = self
            .paragraph_walk(style, FO, "break-before")
            .map(|b| b == "page");
        spec.space_before = self
            .paragraph_walk(style, FO, "margin-top")
            .and_then(parse_twips);
        spec.indent_left = self.indent(style, "margin-left");
        spec.indent_right = self.indent(style, "margin-right");
        match self.indent(style, "text-indent") {
            Some(indent) if indent > 0 => spec.indent_first_line = Some(indent),
            Some(indent) => spec.indent_hanging = Some(-indent),
            None => {},
        }
        spec.tabs = self
            .walk(style, |s| s.properties("paragraph-properties").map(tab_stops))
            .flatten();

        if let Some(level) = self.walk(style, OdfStyle::default_outline_level) {
            spec.num_level = Some(level - 1);
            if self.heading_numbering(level).numbered {
                spec.is_numbered = Some(true);
            }
        }
        if self.walk(style, OdfStyle::list_style_name).is_some() {
            spec.is_numbered = Some(true);
        }

        spec.based_on = self.parent_name(style);
        spec
    }

    /// A non-zero paragraph indent in twips.
    fn indent(&self, style: &OdfStyle, local: &str) -> Option<i64> {
        self.paragraph_walk(style, FO, local)
            .and_then(parse_twips)
            .filter(|&twips| twips != 0)
    }
}

/// `bold` or a numeric weight of 600 and above.
pub(crate) fn is_bold_weight(weight: &str) -> bool {
    weight == "bold" || weight.parse::<u32>().is_ok_and(|w| w >= 600)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = r#"xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" xmlns:fo="urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0" xmlns:number="urn:oasis:names:tc:opendocument:xmlns:datastyle:1.0" xmlns:loext="urn:org:documentfoundation:names:experimental:office:xmlns:loext:1.0""#;

    fn styles_xml() -> String {
        format!(
            r##"<office:document-styles {NS}><office:styles>
  <style:default-style style:family="paragraph">
    <style:text-properties style:font-name="Liberation Serif" fo:font-size="12pt"/>
  </style:default-style>
  <style:style style:name="Standard" style:family="paragraph"/>
  <style:style style:name="Heading" style:family="paragraph" style:parent-style-name="Standard">
    <style:paragraph-properties fo:margin-top="0.423cm" fo:break-before="page"/>
    <style:text-properties style:font-name="Liberation Sans" fo:font-size="14pt" fo:color="#1f3864"/>
  </style:style>
  <style:style style:name="Heading_20_1" style:display-name="Heading 1" style:family="paragraph" style:parent-style-name="Heading" style:default-outline-level="1">
    <style:paragraph-properties fo:text-align="center" fo:margin-left="0cm" fo:text-indent="-0.5cm"/>
    <style:text-properties fo:font-size="18.2pt" fo:font-weight="bold" fo:text-transform="uppercase"/>
  </style:style>
  <style:style style:name="Heading_20_2" style:display-name="Heading 2" style:family="paragraph" style:parent-style-name="Heading" style:default-outline-level="2">
    <style:text-properties fo:font-size="130%" style:font-style-name="Bold Italic"/>
  </style:style>
  <style:style style:name="Kapitola" style:family="paragraph" style:parent-style-name="Heading_20_1">
    <style:text-properties fo:font-size="15.5pt"/>
  </style:style>
  <style:style style:name="Kod" style:family="paragraph" style:parent-style-name="Standard">
    <style:paragraph-properties fo:line-height="150%">
      <style:tab-stops><style:tab-stop style:position="2cm"/><style:tab-stop style:position="16cm" style:type="right"/></style:tab-stops>
    </style:paragraph-properties>
  </style:style>
  <text:outline-style style:name="Outline">
    <text:outline-level-style text:level="1" style:num-format="1"/>
    <text:outline-level-style text:level="2" style:num-format="1" loext:num-list-format="%1%.%2%"/>
    <text:outline-level-style text:level="3" style:num-format="1" text:display-levels="1"/>
    <text:outline-level-style text:level="4" style:num-format=""/>
  </text:outline-style>
</office:styles></office:document-styles>"##
        )
    }

    fn content_xml() -> String {
        format!(
            r#"<office:document-content {NS}><office:automatic-styles>
  <style:style style:name="P1" style:family="paragraph" style:parent-style-name="Kod"><style:text-properties fo:font-style="italic"/></style:style>
  <style:style style:name="A" style:family="paragraph" style:parent-style-name="B"/>
  <style:style style:name="B" style:family="paragraph" style:parent-style-name="A"/>
  <number:number-style style:name="N2"><number:number number:decimal-places="2" number:min-integer-digits="1"/></number:number-style>
</office:automatic-styles><office:body/></office:document-content>"#
        )
    }

    fn table() -> StyleTable {
        let styles = Element::parse(styles_xml().as_bytes()).unwrap();
        let content = Element::parse(content_xml().as_bytes()).unwrap();
        StyleTable::from_parts(&content, Some(&styles))
    }

    #[test]
    fn test_resolve_heading_through_parents() {
        let table = table();
        let heading = table.find("heading 1").unwrap();
        let spec = table.resolve(heading, Some("start"));
        assert_eq!(spec.name, "Heading 1");
        assert_eq!(spec.font.as_deref(), Some("Liberation Sans"));
        assert_eq!(spec.size, Some(18.0));
        assert_eq!(spec.bold, Some(true));
        assert_eq!(spec.italic, Some(false));
        assert_eq!(spec.all_caps, Some(true));
        assert_eq!(spec.color.as_deref(), Some("1F3864"));
        assert_eq!(spec.alignment.as_deref(), Some("center"));
        assert_eq!(spec.page_break_before, Some(true));
        assert_eq!(spec.space_before, Some(240));
        assert_eq!(spec.indent_left, None);
        assert_eq!(spec.indent_hanging, Some(284));
        assert_eq!(spec.num_level, Some(0));
        assert_eq!(spec.is_numbered, Some(true));
        assert_eq!(spec.based_on.as_deref(), Some("Heading"));
    }

    #[test]
    fn test_custom_style_inherits_paragraph_properties() {
        let table = table();
        let spec = table.resolve(table.find("Kapitola").unwrap(), Some("start"));
        assert_eq!(spec.alignment.as_deref(), Some("center"));
        assert_eq!(spec.indent_hanging, Some(284));
        assert_eq!(spec.space_before, Some(240));
        assert_eq!(spec.size, Some(15.0));
        assert_eq!(spec.num_level, Some(0));
        assert_eq!(spec.is_numbered, Some(true));
        assert_eq!(spec.based_on.as_deref(), Some("Heading 1"));
    }

    #[test]
    fn test_relative_size_and_style_name_bold() {
        let table = table();
        let spec = table.resolve(table.find("Heading 2").unwrap(), Some("start"));
        assert_eq!(spec.size, None);
        assert_eq!(spec.bold, Some(true));
        assert_eq!(spec.alignment.as_deref(), Some("start"));
    }

    #[test]
    fn test_defaults_and_tabs() {
        let table = table();
        assert_eq!(table.doc_default_size(), Some(12.0));
        let normal = table.resolve(table.default_paragraph().unwrap(), None);
        assert_eq!(normal.font.as_deref(), Some("Liberation Serif"));
        assert_eq!(normal.color.as_deref(), Some("000000"));
        assert_eq!(normal.bold, Some(false));
        assert_eq!(normal.page_break_before, None);

        let code = table.resolve(table.find("P1").unwrap(), None);
        assert_eq!(code.italic, Some(true));
        assert_eq!(code.line_height, Some(1.5));
        assert_eq!(
            code.tabs,
            Some(vec![TabStop::new("left", 1134), TabStop::new("right", 9072)])
        );
        assert_eq!(table.info(table.find("Kod").unwrap()).parent.as_deref(), Some("Standard"));
        assert_eq!(table.decimal_places("N2"), Some(2));
    }

    #[test]
    fn test_outline_numbering() {
        let table = table();
        assert_eq!(
            table.heading_numbering(1),
            HeadingNumbering {
                numbered: true,
                hierarchical: true,
                level: Some(0)
            }
        );
        assert!(table.heading_numbering(2).hierarchical);
        let third = table.heading_numbering(3);
        assert!(third.numbered && !third.hierarchical);
        assert!(!table.heading_numbering(4).numbered);
        assert!(!table.heading_numbering(9).numbered);
    }

    #[test]
    fn test_cyclic_parents_terminate() {
        let table = table();
        let a = table.find("A").unwrap();
        let spec = table.resolve(a, None);
        assert_eq!(spec.font.as_deref(), Some("Liberation Serif"));
        assert_eq!(spec.based_on.as_deref(), Some("B"));
        assert!(!table.has_spacing_before(a));
        assert!(table.has_spacing_before(table.find("Heading 1").unwrap()));
    }
}
