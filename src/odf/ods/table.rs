//! `table:table` elements read into [`Worksheet`]s.
//!
//! Calc compresses runs of identical rows and cells with
//! `table:number-rows-repeated` / `table:number-columns-repeated`; a sheet
//! usually ends with one empty row repeated a million times. Only cells with
//! content are stored, so repeated empty runs just advance the cursor.
//! Covered cells (the hidden part of a merge) take up columns but carry no
//! content of their own.

use crate::common::xml::Element;
use crate::odf::namespaces::{CALCEXT, DRAW, FO, OFFICE, STYLE, TABLE, XLINK};
use crate::odf::styles::{OdfStyle, StyleTable};
use crate::odf::text::paragraphs_text;
use crate::sheet::{
    CellCoord, CellInfo, CellRange, CellValue, ComparisonOperator, FoundConditionalRule, Worksheet,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::debug;

static CONDITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([<>]=?|=|!=)\s*(-?\d+(\.\d+)?)$").expect("valid regex"));

const ROW_GROUPS: &[&str] = &["table-header-rows", "table-rows", "table-row-group"];
const COLUMN_GROUPS: &[&str] = &["table-header-columns", "table-columns", "table-column-group"];

/// Default cell styles of the columns, stored as runs.
#[derive(Debug, Clone, Default)]
pub(crate) struct ColumnStyles {
    /// (first column, column after the run, style)
    runs: Vec<(usize, usize, String)>,
}

impl ColumnStyles {
    pub fn get(&self, column: usize) -> Option<&str> {
        self.runs
            .iter()
            .find(|(start, end, _)| (*start..*end).contains(&column))
            .map(|(_, _, style)| style.as_str())
    }
}

/// A parsed table plus what the caller resolves against the package.
pub(crate) struct ParsedTable {
    pub sheet: Worksheet,
    pub column_styles: ColumnStyles,
    /// `xlink:href`s of embedded objects drawn on the sheet
    pub objects: Vec<String>,
}

struct RowCell {
    column: usize,
    info: CellInfo,
    /// (columns, rows) covered by a merge
    span: (usize, usize),
}

/// Reads tables against the document's style table.
pub(crate) struct TableReader<'a> {
    styles: &'a StyleTable,
}

impl<'a> TableReader<'a> {
    pub fn new(styles: &'a StyleTable) -> Self {
        Self { styles }
    }

    pub fn read(&self, table: &Element) -> ParsedTable {
        let name = table.attr(TABLE, "name").unwrap_or_default();
        let mut sheet = Worksheet::new(name);
        let column_styles = self.column_styles(table);
        // cell style name -> cells using it, for style:map conditions
        let mut mapped: BTreeMap<String, Vec<CellCoord>> = BTreeMap::new();

        let mut rows = Vec::new();
        flatten(table, "table-row", ROW_GROUPS, &mut rows);
        let mut row_index = 0usize;
        for row in rows {
            let repeat = row
                .attr_parse::<usize>(TABLE, "number-rows-repeated")
                .unwrap_or(1)
                .max(1);
            let cells = self.read_row(row, &column_styles);
            if cells.is_empty() {
                row_index += repeat;
                continue;
            }
            for offset in 0..repeat {
                let r = row_index + offset;
                for cell in &cells {
                    let coord = CellCoord::new(cell.column, r);
                    if cell.span.0 > 1 || cell.span.1 > 1 {
                        let end = CellCoord::new(cell.column + cell.span.0 - 1, r + cell.span.1 - 1);
                        sheet.merged.push(CellRange::new(coord, end));
                    }
                    if let Some(style) = cell.info.style_name.as_deref()
                        && self.styles.get(style).is_some_and(|s| s.maps().next().is_some())
                    {
                        mapped.entry(style.to_string()).or_default().push(coord);
                    }
                    sheet.cells.insert(coord, cell.info.clone());
                }
            }
            row_index += repeat;
        }

        sheet.conditional_rules = self.conditional_formats(table);
        sheet.has_conditional_formatting =
            table.contains(CALCEXT, "conditional-format") || !mapped.is_empty();
        if sheet.conditional_rules.is_empty() {
            sheet.conditional_rules = self.style_map_rules(&mapped);
        }

        let objects = table
            .descendants_named(DRAW, "object")
            .filter_map(|o| o.attr(XLINK, "href"))
            .map(str::to_string)
            .collect();

        debug!(
            sheet = name,
            cells = sheet.cells.len(),
            merged = sheet.merged.len(),
            "read calc table"
        );
        ParsedTable {
            sheet,
            column_styles,
            objects,
        }
    }

    fn column_styles(&self, table: &Element) -> ColumnStyles {
        let mut columns = Vec::new();
        flatten(table, "table-column", COLUMN_GROUPS, &mut columns);

        let mut runs = Vec::new();
        let mut start = 0usize;
        for column in columns {
            let repeat = column
                .attr_parse::<usize>(TABLE, "number-columns-repeated")
                .unwrap_or(1)
                .max(1);
            if let Some(style) = column.attr(TABLE, "default-cell-style-name") {
                runs.push((start, start + repeat, style.to_string()));
            }
            start += repeat;
        }
        ColumnStyles { runs }
    }

    fn read_row(&self, row: &Element, column_styles: &ColumnStyles) -> Vec<RowCell> {
        let mut cells = Vec::new();
        let mut column = 0usize;
        for el in row.elements() {
            let covered = el.is(TABLE, "covered-table-cell");
            if !covered && !el.is(TABLE, "table-cell") {
                continue;
            }
            let repeat = el
                .attr_parse::<usize>(TABLE, "number-columns-repeated")
                .unwrap_or(1)
                .max(1);
            if covered {
                column += repeat;
                continue;
            }

            let span = (
                el.attr_parse::<usize>(TABLE, "number-columns-spanned").unwrap_or(1).max(1),
                el.attr_parse::<usize>(TABLE, "number-rows-spanned").unwrap_or(1).max(1),
            );
            let info = cell(el, column_styles.get(column));
            let has_content =
                info.formula.is_some() || !info.cached_value.is_empty() || info.text.is_some();
            if has_content || span != (1, 1) {
                for offset in 0..repeat {
                    cells.push(RowCell {
                        column: column + offset,
                        info: info.clone(),
                        span,
                    });
                }
            }
            column += repeat;
        }
        cells
    }

    /// `calcext:conditional-format` rules with a plain comparison.
    fn conditional_formats(&self, table: &Element) -> Vec<FoundConditionalRule> {
        let mut rules = Vec::new();
        for format in table.descendants_named(CALCEXT, "conditional-format") {
            let range = format
                .attr(CALCEXT, "target-range-address")
                .unwrap_or_default();
            for condition in format.children_named(CALCEXT, "condition") {
                let Some((operator, value)) = condition
                    .attr(CALCEXT, "value")
                    .and_then(parse_condition)
                else {
                    continue;
                };
                let style = condition
                    .attr(CALCEXT, "apply-style-name")
                    .and_then(|name| self.styles.find(name));
                rules.push(self.rule(range.to_string(), operator, value, style));
            }
        }
        rules
    }

    /// Rules from `style:map` of cell styles; the range is the bounding box
    /// of the cells using the style.
    fn style_map_rules(&self, mapped: &BTreeMap<String, Vec<CellCoord>>) -> Vec<FoundConditionalRule> {
        let mut rules = Vec::new();
        for (style_name, coords) in mapped {
            let (Some(style), Some(range)) = (self.styles.get(style_name), bounding_range(coords))
            else {
                continue;
            };
            for map in style.maps() {
                let Some((operator, value)) = map
                    .attr(STYLE, "condition")
                    .and_then(|c| c.trim().strip_prefix("cell-content()"))
                    .and_then(parse_condition)
                else {
                    continue;
                };
                let applied = map
                    .attr(STYLE, "apply-style-name")
                    .and_then(|name| self.styles.find(name));
                rules.push(self.rule(range.to_string(), operator, value, applied));
            }
        }
        rules
    }

    fn rule(
        &self,
        range: String,
        operator: ComparisonOperator,
        value: f64,
        style: Option<&OdfStyle>,
    ) -> FoundConditionalRule {
        let has_fill = style.is_some_and(|s| {
            self.styles
                .walk(s, |s| {
                    s.properties("table-cell-properties")
                        .and_then(|p| p.attr(FO, "background-color"))
                })
                .is_some_and(|c| c != "transparent")
        });
        let has_font_color = style.is_some_and(|s| {
            self.styles
                .walk(s, |s| s.properties("text-properties").and_then(|p| p.attr(FO, "color")))
                .is_some()
        });
        FoundConditionalRule {
            range,
            operator: Some(operator),
            value: Some(value),
            has_fill,
            has_font_color,
        }
    }
}

/// Collect `item` children of `el`, descending into the grouping elements.
fn flatten<'e>(el: &'e Element, item: &str, groups: &[&str], out: &mut Vec<&'e Element>) {
    for child in el.elements().filter(|c| c.namespace() == TABLE) {
        if child.local_name() == item {
            out.push(child);
        } else if groups.contains(&child.local_name()) {
            flatten(child, item, groups, out);
        }
    }
}

fn cell(el: &Element, column_style: Option<&str>) -> CellInfo {
    let text = Some(paragraphs_text(el)).filter(|t| !t.trim().is_empty());
    let value_type = el
        .attr(OFFICE, "value-type")
        .or_else(|| el.attr(CALCEXT, "value-type"));
    let cached_value = if el.attr(CALCEXT, "value-type") == Some("error") {
        CellValue::Error(text.clone().unwrap_or_default())
    } else {
        match value_type {
            Some("float" | "percentage" | "currency") => el
                .attr_parse::<f64>(OFFICE, "value")
                .map(CellValue::Number)
                .unwrap_or_default(),
            Some("boolean") => CellValue::Bool(el.attr(OFFICE, "boolean-value") == Some("true")),
            Some("date") => el
                .attr(OFFICE, "date-value")
                .map(|v| CellValue::String(v.to_string()))
                .unwrap_or_default(),
            Some("time") => el
                .attr(OFFICE, "time-value")
                .map(|v| CellValue::String(v.to_string()))
                .unwrap_or_default(),
            Some("string") => el
                .attr(OFFICE, "string-value")
                .map(str::to_string)
                .or_else(|| text.clone())
                .map(CellValue::String)
                .unwrap_or_default(),
            _ => CellValue::Empty,
        }
    };

    CellInfo {
        formula: el.attr(TABLE, "formula").map(formula_text),
        cached_value,
        text,
        style_name: el
            .attr(TABLE, "style-name")
            .or(column_style)
            .map(str::to_string),
        is_array: el.attr(TABLE, "number-matrix-columns-spanned").is_some()
            || el.attr(TABLE, "number-matrix-rows-spanned").is_some(),
    }
}

/// `of:=SUM(...)` gives `=SUM(...)`; the bracketed references stay.
fn formula_text(raw: &str) -> String {
    let raw = raw.trim();
    let body = match raw.split_once(':') {
        Some((prefix, rest))
            if rest.starts_with('=')
                && !prefix.is_empty()
                && prefix.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            rest
        },
        _ => raw,
    };
    if body.starts_with('=') {
        body.to_string()
    } else {
        format!("={}", body)
    }
}

/// `>=5`, `<> 3` style conditions.
fn parse_condition(condition: &str) -> Option<(ComparisonOperator, f64)> {
    let caps = CONDITION.captures(condition.trim())?;
    let operator = ComparisonOperator::from_symbol(&caps[1])?;
    let value = caps[2].parse().ok()?;
    Some((operator, value))
}

fn bounding_range(coords: &[CellCoord]) -> Option<CellRange> {
    let first = coords.first()?;
    let (mut min_c, mut min_r, mut max_c, mut max_r) =
        (first.column(), first.row(), first.column(), first.row());
    for c in coords {
        min_c = min_c.min(c.column());
        min_r = min_r.min(c.row());
        max_c = max_c.max(c.column());
        max_r = max_r.max(c.row());
    }
    Some(CellRange::new(
        CellCoord::new(min_c, min_r),
        CellCoord::new(max_c, max_r),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = r#"xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" xmlns:fo="urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0" xmlns:calcext="urn:org:documentfoundation:names:experimental:calc:xmlns:calcext:1.0""#;

    fn read(table: &str, styles: &str) -> ParsedTable {
        let xml = format!(
            r#"<office:document-content {NS}><office:automatic-styles>{styles}</office:automatic-styles><office:body><office:spreadsheet>{table}</office:spreadsheet></office:body></office:document-content>"#
        );
        let root = Element::parse(xml.as_bytes()).unwrap();
        let table_styles = StyleTable::from_parts(&root, None);
        let table = root.find(TABLE, "table").unwrap();
        TableReader::new(&table_styles).read(table)
    }

    #[test]
    fn test_repeated_rows_and_cells() {
        let parsed = read(
            r#"<table:table table:name="data">
  <table:table-column table:number-columns-repeated="2" table:default-cell-style-name="ce1"/>
  <table:table-column table:default-cell-style-name="ce2"/>
  <table:table-header-rows>
    <table:table-row><table:table-cell office:value-type="string"><text:p>Jméno</text:p></table:table-cell></table:table-row>
  </table:table-header-rows>
  <table:table-row table:number-rows-repeated="2">
    <table:table-cell table:number-columns-repeated="2"/>
    <table:table-cell office:value-type="float" office:value="7"><text:p>7</text:p></table:table-cell>
  </table:table-row>
  <table:table-row table:number-rows-repeated="1048570"><table:table-cell table:number-columns-repeated="1024"/></table:table-row>
</table:table>"#,
            "",
        );
        let sheet = &parsed.sheet;
        assert_eq!(sheet.name, "data");
        assert_eq!(sheet.cells.len(), 3);
        assert_eq!(sheet.cell("A1").unwrap().text.as_deref(), Some("Jméno"));
        assert_eq!(sheet.cell("C2").unwrap().cached_value, CellValue::Number(7.0));
        assert_eq!(sheet.cell("C3").unwrap().style_name.as_deref(), Some("ce2"));
        assert!(sheet.cell("A2").is_none());
        assert_eq!(parsed.column_styles.get(1), Some("ce1"));
        assert_eq!(parsed.column_styles.get(5), None);
    }

    #[test]
    fn test_formulas_merges_and_matrix() {
        let parsed = read(
            r#"<table:table table:name="data">
  <table:table-row>
    <table:table-cell table:number-columns-spanned="2" office:value-type="string"><text:p>Souhrn</text:p></table:table-cell>
    <table:covered-table-cell/>
    <table:table-cell table:formula="of:=SUM([.A2:.A3])" office:value-type="float" office:value="3"><text:p>3</text:p></table:table-cell>
  </table:table-row>
  <table:table-row>
    <table:table-cell table:formula="of:=[.A1]/0" table:number-matrix-columns-spanned="1" table:number-matrix-rows-spanned="1" office:value-type="string" calcext:value-type="error"><text:p>#DIV/0!</text:p></table:table-cell>
  </table:table-row>
</table:table>"#,
            "",
        );
        let sheet = &parsed.sheet;
        assert_eq!(sheet.merged, vec!["A1:B1".parse::<CellRange>().unwrap()]);
        let c1 = sheet.cell("C1").unwrap();
        assert_eq!(c1.formula.as_deref(), Some("=SUM([.A2:.A3])"));
        let a2 = sheet.cell("A2").unwrap();
        assert!(a2.is_array);
        assert!(a2.is_error());
        assert_eq!(a2.cached_value, CellValue::Error("#DIV/0!".into()));
    }

    #[test]
    fn test_conditional_formats() {
        let parsed = read(
            r#"<table:table table:name="data">
  <table:table-row><table:table-cell office:value-type="float" office:value="1"/></table:table-row>
  <calcext:conditional-formats>
    <calcext:conditional-format calcext:target-range-address="data.D2:data.D23">
      <calcext:condition calcext:apply-style-name="Bad" calcext:value="&gt;170" calcext:base-cell-address="data.D2"/>
      <calcext:condition calcext:apply-style-name="Bad" calcext:value="between(1,2)" calcext:base-cell-address="data.D2"/>
    </calcext:conditional-format>
  </calcext:conditional-formats>
</table:table>"#,
            r##"<style:style style:name="Bad" style:family="table-cell"><style:table-cell-properties fo:background-color="#ffcccc"/><style:text-properties fo:color="#cc0000"/></style:style>"##,
        );
        let sheet = &parsed.sheet;
        assert!(sheet.has_conditional_formatting);
        assert_eq!(sheet.conditional_rules.len(), 1);
        let rule = &sheet.conditional_rules[0];
        assert_eq!(rule.range, "data.D2:data.D23");
        assert_eq!(rule.operator, Some(ComparisonOperator::GreaterThan));
        assert_eq!(rule.value, Some(170.0));
        assert!(rule.has_fill && rule.has_font_color);
        assert_eq!(rule.cell_range().unwrap().to_string(), "D2:D23");
    }

    #[test]
    fn test_style_map_rules() {
        let parsed = read(
            r#"<table:table table:name="data">
  <table:table-row><table:table-cell table:style-name="ce1" office:value-type="float" office:value="1"/></table:table-row>
  <table:table-row><table:table-cell table:style-name="ce1" office:value-type="float" office:value="2"/></table:table-row>
</table:table>"#,
            r##"<style:style style:name="ce1" style:family="table-cell"><style:map style:condition="cell-content()&lt;=5" style:apply-style-name="Hot" style:base-cell-address="data.A1"/></style:style>
<style:style style:name="Hot" style:family="table-cell"><style:text-properties fo:color="#ff0000"/></style:style>"##,
        );
        let rules = &parsed.sheet.conditional_rules;
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].range, "A1:A2");
        assert_eq!(rules[0].operator, Some(ComparisonOperator::LessThanOrEqual));
        assert!(!rules[0].has_fill);
        assert!(rules[0].has_font_color);
    }

    #[test]
    fn test_formula_prefixes() {
        assert_eq!(formula_text("of:=A1+1"), "=A1+1");
        assert_eq!(formula_text("oooc:=[.A1]"), "=[.A1]");
        assert_eq!(formula_text("=[.A1]"), "=[.A1]");
        assert_eq!(formula_text("SUM(A1:A2)"), "=SUM(A1:A2)");
    }

    #[test]
    fn test_condition_regex() {
        assert_eq!(parse_condition("!=0"), Some((ComparisonOperator::NotEqual, 0.0)));
        assert_eq!(parse_condition("< -1.5"), Some((ComparisonOperator::LessThan, -1.5)));
        assert_eq!(parse_condition("between(1,2)"), None);
    }
}
