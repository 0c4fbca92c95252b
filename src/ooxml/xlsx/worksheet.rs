//! Worksheet parts (`xl/worksheets/sheetN.xml`).

use super::shared_strings::SharedStrings;
use super::styles::StyleSheet;
use crate::common::xml::Element;
use crate::ooxml::namespaces::{R, SML};
use crate::sheet::formula::translate;
use crate::sheet::{
    CellCoord, CellInfo, CellRange, CellValue, ComparisonOperator, FoundConditionalRule, Worksheet,
};
use std::collections::HashMap;
use tracing::warn;

/// A parsed worksheet plus the drawings it references.
pub(crate) struct ParsedSheet {
    pub sheet: Worksheet,
    /// `r:id`s of `<drawing>` elements, resolved by the caller
    pub drawings: Vec<String>,
}

/// Reads `<worksheet>` parts against the workbook-wide tables.
pub(crate) struct SheetReader<'a> {
    shared_strings: &'a SharedStrings,
    styles: &'a StyleSheet,
}

impl<'a> SheetReader<'a> {
    pub fn new(shared_strings: &'a SharedStrings, styles: &'a StyleSheet) -> Self {
        Self {
            shared_strings,
            styles,
        }
    }

    pub fn read(&self, name: &str, root: &Element) -> ParsedSheet {
        let mut sheet = Worksheet::new(name);
        // Shared formula groups: si -> (anchor cell, formula text)
        let mut shared: HashMap<String, (CellCoord, String)> = HashMap::new();

        let rows = root
            .child(SML, "sheetData")
            .into_iter()
            .flat_map(|d| d.children_named(SML, "row"));
        let mut next_row = 0usize;
        for row in rows {
            let row_index = row
                .attr_parse::<usize>("", "r")
                .and_then(|r| r.checked_sub(1))
                .unwrap_or(next_row);
            next_row = row_index + 1;

            let mut next_column = 0usize;
            for c in row.children_named(SML, "c") {
                let coord = c
                    .attr("", "r")
                    .and_then(|r| r.parse::<CellCoord>().ok())
                    .unwrap_or(CellCoord::new(next_column, row_index));
                next_column = coord.column() + 1;
                let info = self.cell(c, coord, &mut shared);
                sheet.cells.insert(coord, info);
            }
        }

        sheet.merged = root
            .child(SML, "mergeCells")
            .into_iter()
            .flat_map(|m| m.children_named(SML, "mergeCell"))
            .filter_map(|m| m.attr("", "ref"))
            .filter_map(|r| match r.parse::<CellRange>() {
                Ok(range) => Some(range),
                Err(e) => {
                    warn!(sheet = name, range = r, error = %e, "unreadable merged range");
                    None
                },
            })
            .collect();

        sheet.has_conditional_formatting = root
            .descendants()
            .any(|e| e.local_name() == "conditionalFormatting");
        sheet.conditional_rules = root
            .children_named(SML, "conditionalFormatting")
            .flat_map(|cf| {
                let range = cf.attr("", "sqref").unwrap_or_default();
                cf.children_named(SML, "cfRule")
                    .filter(|rule| rule.attr("", "type") == Some("cellIs"))
                    .map(move |rule| self.conditional_rule(range, rule))
            })
            .collect();

        let drawings = root
            .children_named(SML, "drawing")
            .filter_map(|d| d.attr(R, "id"))
            .map(str::to_string)
            .collect();

        ParsedSheet { sheet, drawings }
    }

    fn cell(
        &self,
        c: &Element,
        coord: CellCoord,
        shared: &mut HashMap<String, (CellCoord, String)>,
    ) -> CellInfo {
        let raw = c.child(SML, "v").map(|v| v.text());
        let cached_value = match (c.attr("", "t").unwrap_or("n"), raw) {
            ("inlineStr", _) => c
                .child(SML, "is")
                .map(|is| CellValue::String(is.descendants_named(SML, "t").map(|t| t.text()).collect()))
                .unwrap_or_default(),
            (_, None) => CellValue::Empty,
            ("s", Some(v)) => v
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|i| self.shared_strings.get(i))
                .map(|s| CellValue::String(s.to_string()))
                .unwrap_or_else(|| {
                    warn!(cell = %coord, index = %v, "shared string index out of range");
                    CellValue::Empty
                }),
            ("str", Some(v)) => CellValue::String(v),
            ("e", Some(v)) => CellValue::Error(v),
            ("b", Some(v)) => CellValue::Bool(v.trim() == "1"),
            (_, Some(v)) => match v.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::String(v),
            },
        };

        let mut is_array = false;
        let formula = c.child(SML, "f").and_then(|f| {
            let text = f.text().trim().to_string();
            match f.attr("", "t") {
                Some("array") => is_array = true,
                Some("shared") => {
                    let si = f.attr("", "si").unwrap_or_default().to_string();
                    if !text.is_empty() {
                        shared.insert(si, (coord, text.clone()));
                    } else if let Some((anchor, base)) = shared.get(&si) {
                        return Some(format!(
                            "={}",
                            translate(
                                base,
                                coord.row() as i64 - anchor.row() as i64,
                                coord.column() as i64 - anchor.column() as i64,
                            )
                        ));
                    }
                },
                _ => {},
            }
            (!text.is_empty()).then(|| format!("={}", text))
        });

        let text = match &cached_value {
            CellValue::String(s) => Some(s.clone()),
            _ => None,
        };

        CellInfo {
            formula,
            cached_value,
            text,
            style_name: c.attr("", "s").map(str::to_string),
            is_array,
        }
    }

    fn conditional_rule(&self, range: &str, rule: &Element) -> FoundConditionalRule {
        let dxf = rule
            .attr_parse::<usize>("", "dxfId")
            .and_then(|id| self.styles.dxf(id))
            .unwrap_or_default();
        FoundConditionalRule {
            range: range.to_string(),
            operator: rule.attr("", "operator").and_then(ComparisonOperator::from_name),
            value: rule
                .child(SML, "formula")
                .and_then(|f| f.text().trim().trim_matches('"').parse().ok()),
            has_fill: dxf.has_fill,
            has_font_color: dxf.has_font_color,
        }
    }
}
