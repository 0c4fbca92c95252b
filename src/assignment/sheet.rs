//! Assignment for Excel and Calc workbooks.

use super::NumberOrText;
use super::ordered;
use crate::common::Result;
use crate::sheet::ComparisonOperator;
use crate::sheet::coordinates::column_letters;
use serde::Deserialize;

/// Expected formatting of a cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellStyleSpec {
    /// Number format code, e.g. `0.00`
    pub number_format: Option<String>,
    pub bold: Option<bool>,
    pub alignment: Option<String>,
}

impl CellStyleSpec {
    /// Decimal places the format code asks for: `0.00` gives 2, `0` gives 0.
    pub fn decimal_places(&self) -> Option<u32> {
        let format = self.number_format.as_deref()?;
        Some(match format.split_once('.') {
            Some((_, fraction)) => fraction.chars().filter(|c| *c == '0' || *c == '#').count() as u32,
            None => 0,
        })
    }
}

/// A cell-value conditional format the assignment requires.
///
/// Written as `{type, operator, value, fillColor, textColor}`; the operator
/// may be an OOXML name (`greaterThan`) or a symbol (`>`), the value a
/// number or numeric text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawRule")]
pub struct ConditionalFormatRule {
    pub rule_type: String,
    pub operator: ComparisonOperator,
    pub value: f64,
    pub fill_color: Option<String>,
    pub text_color: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRule {
    #[serde(rename = "type")]
    rule_type: Option<String>,
    operator: String,
    value: NumberOrText,
    fill_color: Option<String>,
    text_color: Option<String>,
}

impl TryFrom<RawRule> for ConditionalFormatRule {
    type Error = String;

    fn try_from(raw: RawRule) -> std::result::Result<Self, Self::Error> {
        let operator = ComparisonOperator::from_name(raw.operator.trim())
            .or_else(|| ComparisonOperator::from_symbol(raw.operator.trim()))
            .ok_or_else(|| format!("unknown conditional format operator \"{}\"", raw.operator))?;
        let value = raw
            .value
            .as_f64()
            .ok_or_else(|| format!("conditional format value {:?} is not a number", raw.value))?;
        Ok(Self {
            rule_type: raw.rule_type.unwrap_or_else(|| "cellIs".to_string()),
            operator,
            value,
            fill_color: raw.fill_color,
            text_color: raw.text_color,
        })
    }
}

/// Expected content of one cell.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellSpec {
    /// Value the student types in
    pub input: Option<serde_json::Value>,
    /// Expected formula, with the leading `=`
    pub expression: Option<String>,
    pub style: Option<CellStyleSpec>,
    pub conditional_format: Option<Vec<ConditionalFormatRule>>,
}

impl CellSpec {
    pub fn conditional_rules(&self) -> &[ConditionalFormatRule] {
        self.conditional_format.as_deref().unwrap_or(&[])
    }
}

/// A table whose outline and inner grid must carry borders.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderRegion {
    /// A1 range, e.g. `A1:F23`
    pub location: String,
    pub outline_border_style: Option<String>,
    pub inside_border_style: Option<String>,
}

/// The chart the workbook must contain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub chart_type: Option<String>,
    pub title: Option<String>,
    pub x_axis_label: Option<String>,
    pub y_axis_label: Option<String>,
}

/// Expected state of a workbook.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SheetAssignment {
    /// Expected cells by A1 address, in declaration order
    #[serde(deserialize_with = "ordered::deserialize")]
    pub cells: Vec<(String, CellSpec)>,
    pub borders: Vec<BorderRegion>,
    pub chart: Option<ChartSpec>,
}

impl SheetAssignment {
    /// Parse an assignment from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn cell(&self, address: &str) -> Option<&CellSpec> {
        self.cells
            .iter()
            .find(|(a, _)| a.eq_ignore_ascii_case(address))
            .map(|(_, spec)| spec)
    }

    /// Cells with an expected formula.
    pub fn formulas(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().filter_map(|(address, spec)| {
            spec.expression
                .as_deref()
                .filter(|e| !e.trim().is_empty())
                .map(|e| (address.as_str(), e))
        })
    }

    /// Every required conditional format with the column it applies to.
    pub fn conditional_rules(&self) -> impl Iterator<Item = (String, &ConditionalFormatRule)> {
        self.cells.iter().flat_map(|(address, spec)| {
            spec.conditional_rules()
                .iter()
                .map(move |rule| (column_letters(address), rule))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;

    const JSON: &str = r#"{
        "cells": {
            "B28": { "expression": "=AVERAGE(B2:B23)", "style": { "numberFormat": "0.00" } },
            "A1": { "input": "Jméno", "style": { "bold": true, "alignment": "center" } },
            "D2": { "conditionalFormat": [
                { "type": "cellIs", "operator": "greaterThan", "value": 180, "fillColor": "FFC7CE" },
                { "operator": "<=", "value": "150.5", "textColor": "9C0006" }
            ] }
        },
        "borders": [ { "location": "A1:F23", "outlineBorderStyle": "thick", "insideBorderStyle": "thin" } ],
        "chart": { "type": "bar", "title": "Výška", "xAxisLabel": "Jméno", "yAxisLabel": "cm" }
    }"#;

    #[test]
    fn test_load_sheet_assignment() {
        let a = SheetAssignment::from_json(JSON).unwrap();
        assert_eq!(a.cells[0].0, "B28");
        assert_eq!(a.formulas().collect::<Vec<_>>(), vec![("B28", "=AVERAGE(B2:B23)")]);
        assert_eq!(a.cell("a1").unwrap().input, Some(serde_json::json!("Jméno")));
        assert_eq!(a.borders[0].outline_border_style.as_deref(), Some("thick"));
        let chart = a.chart.unwrap();
        assert_eq!(chart.chart_type.as_deref(), Some("bar"));
        assert_eq!(chart.x_axis_label.as_deref(), Some("Jméno"));
    }

    #[test]
    fn test_conditional_rules_typed_at_load() {
        let a = SheetAssignment::from_json(JSON).unwrap();
        let rules: Vec<_> = a.conditional_rules().collect();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].0, "D");
        assert_eq!(rules[0].1.operator, ComparisonOperator::GreaterThan);
        assert_eq!(rules[0].1.value, 180.0);
        assert_eq!(rules[1].1.operator, ComparisonOperator::LessThanOrEqual);
        assert_eq!(rules[1].1.value, 150.5);
        assert_eq!(rules[1].1.rule_type, "cellIs");
        assert!(rules[1].1.fill_color.is_none());
    }

    #[test]
    fn test_unknown_operator_rejected() {
        let json = r#"{"cells": {"D2": {"conditionalFormat": [{"operator": "between", "value": 1}]}}}"#;
        assert!(matches!(SheetAssignment::from_json(json), Err(Error::Assignment(_))));
    }

    #[test]
    fn test_expected_decimal_places() {
        let style = |f: &str| CellStyleSpec {
            number_format: Some(f.to_string()),
            ..Default::default()
        };
        assert_eq!(style("0.00").decimal_places(), Some(2));
        assert_eq!(style("0").decimal_places(), Some(0));
        assert_eq!(style("#,##0.0").decimal_places(), Some(1));
        assert_eq!(CellStyleSpec::default().decimal_places(), None);
    }
}
