//! Chart checks. The chart is looked up on the data sheet first and then on
//! any other sheet, since students often move it to a sheet of its own.

use crate::assignment::SheetAssignment;
use crate::checks::result::list_message;
use crate::checks::{Check, CheckResult};
use crate::sheet::SpreadsheetDocument;

/// Name of the sheet holding the chart.
fn chart_sheet<'a>(document: &'a dyn SpreadsheetDocument, preferred: &str) -> Option<&'a str> {
    let sheets = document.worksheets();
    sheets
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(preferred) && !s.charts.is_empty())
        .or_else(|| sheets.iter().find(|s| !s.charts.is_empty()))
        .map(|s| s.name.as_str())
}

/// Plot type in a comparable spelling: `barChart`, `Bar` and `column` all
/// become `bar`.
fn normalize_chart_type(chart_type: &str) -> String {
    let lower = chart_type.trim().to_lowercase();
    let base = lower.strip_suffix("chart").unwrap_or(&lower);
    let base = base.strip_suffix("3d").unwrap_or(base);
    match base {
        "column" => "bar".to_string(),
        other => other.to_string(),
    }
}

pub struct MissingChartCheck {
    sheet: String,
}

impl MissingChartCheck {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
        }
    }
}

impl Check<dyn SpreadsheetDocument, SheetAssignment> for MissingChartCheck {
    fn name(&self) -> &str {
        "Chart exists"
    }

    fn run(&self, document: &dyn SpreadsheetDocument, assignment: &SheetAssignment) -> CheckResult {
        if assignment.chart.is_none() {
            return CheckResult::pass("The assignment requires no chart.");
        }
        match chart_sheet(document, &self.sheet) {
            Some(sheet) => CheckResult::pass(format!("The workbook has a chart on the sheet \"{}\".", sheet)),
            None => CheckResult::fail("The workbook has no chart.", -100).into_fatal(),
        }
    }
}

pub struct ChartTypeCheck {
    sheet: String,
}

impl ChartTypeCheck {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
        }
    }
}

impl Check<dyn SpreadsheetDocument, SheetAssignment> for ChartTypeCheck {
    fn name(&self) -> &str {
        "Chart type"
    }

    fn run(&self, document: &dyn SpreadsheetDocument, assignment: &SheetAssignment) -> CheckResult {
        let Some(expected) = assignment.chart.as_ref().and_then(|c| c.chart_type.as_deref()) else {
            return CheckResult::pass("The assignment does not prescribe a chart type.");
        };
        let Some(sheet) = chart_sheet(document, &self.sheet) else {
            return CheckResult::fail("The workbook has no chart.", -5).into_fatal();
        };
        let found = document.chart_type(sheet).unwrap_or("unknown");
        if normalize_chart_type(found) == normalize_chart_type(expected) {
            CheckResult::pass("The chart type matches the assignment.")
        } else {
            CheckResult::fail(
                format!("Wrong chart type:\n- expected: {}\n- found: {}", expected, found),
                -5,
            )
            .into_fatal()
        }
    }
}

/// Title, axis labels and data labels of the chart.
pub struct ChartFormattingCheck {
    sheet: String,
}

impl ChartFormattingCheck {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
        }
    }
}

impl Check<dyn SpreadsheetDocument, SheetAssignment> for ChartFormattingCheck {
    fn name(&self) -> &str {
        "Chart title and labels"
    }

    fn run(&self, document: &dyn SpreadsheetDocument, assignment: &SheetAssignment) -> CheckResult {
        let Some(expected) = &assignment.chart else {
            return CheckResult::pass("The assignment requires no chart.");
        };
        let Some(sheet) = chart_sheet(document, &self.sheet) else {
            return CheckResult::fail("The workbook has no chart.", -2).into_fatal();
        };

        let mut missing = Vec::new();
        let texts = [
            (&expected.title, document.chart_title(sheet), "chart title"),
            (&expected.x_axis_label, document.chart_x_label(sheet), "X axis label"),
            (&expected.y_axis_label, document.chart_y_label(sheet), "Y axis label"),
        ];
        for (wanted, found, what) in texts {
            let Some(wanted) = wanted.as_deref().filter(|w| !w.trim().is_empty()) else {
                continue;
            };
            if found.map(str::trim) != Some(wanted.trim()) {
                missing.push(format!(
                    "{} (expected \"{}\", found \"{}\")",
                    what,
                    wanted,
                    found.unwrap_or("")
                ));
            }
        }
        if !document.chart_has_data_labels(sheet) {
            missing.push("data labels".to_string());
        }

        if missing.is_empty() {
            CheckResult::pass("The chart has its title, axis labels and data labels.")
        } else {
            CheckResult::fail(
                list_message("The chart is missing", &missing),
                -2 * missing.len() as i32,
            )
            .into_fatal()
        }
    }
}

pub struct ThreeDChartCheck {
    sheet: String,
}

impl ThreeDChartCheck {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
        }
    }
}

impl Check<dyn SpreadsheetDocument, SheetAssignment> for ThreeDChartCheck {
    fn name(&self) -> &str {
        "Chart is flat"
    }

    fn run(&self, document: &dyn SpreadsheetDocument, _assignment: &SheetAssignment) -> CheckResult {
        let Some(sheet) = chart_sheet(document, &self.sheet) else {
            return CheckResult::pass("The workbook has no chart.");
        };
        if document.has_3d_chart(sheet) {
            CheckResult::fail("The chart uses a 3D plot.", -2).into_fatal()
        } else {
            CheckResult::pass("The chart is two-dimensional.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::sheet::fixture::FakeSheet;
    use crate::sheet::ChartInfo;

    fn assignment() -> SheetAssignment {
        SheetAssignment::from_json(
            r#"{"chart": {"type": "bar", "title": "BMI", "xAxisLabel": "Jméno", "yAxisLabel": "BMI"}}"#,
        )
        .unwrap()
    }

    fn workbook(chart: ChartInfo) -> FakeSheet {
        let mut doc = FakeSheet::xlsx().sheet("data").sheet("graf");
        doc.sheet_mut("graf").charts.push(chart);
        doc
    }

    fn bar_chart() -> ChartInfo {
        ChartInfo {
            chart_type: Some("bar".into()),
            title: Some("BMI".into()),
            x_label: Some("Jméno".into()),
            y_label: Some("BMI ".into()),
            data_labels: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_chart_type() {
        assert_eq!(normalize_chart_type("barChart"), "bar");
        assert_eq!(normalize_chart_type("Column"), "bar");
        assert_eq!(normalize_chart_type("bar3DChart"), "bar");
        assert_eq!(normalize_chart_type("pie"), "pie");
    }

    #[test]
    fn test_missing_chart() {
        let a = assignment();
        let empty = FakeSheet::xlsx().sheet("data");
        let result = MissingChartCheck::new("data").run(&empty, &a);
        assert_eq!(result.points, -100);
        assert!(result.fatal);
        assert!(MissingChartCheck::new("data").run(&empty, &SheetAssignment::default()).passed);
        assert!(MissingChartCheck::new("data").run(&workbook(bar_chart()), &a).passed);
        assert!(ThreeDChartCheck::new("data").run(&empty, &a).passed);
    }

    #[test]
    fn test_chart_type() {
        let a = assignment();
        assert!(ChartTypeCheck::new("data").run(&workbook(bar_chart()), &a).passed);

        let pie = ChartInfo {
            chart_type: Some("pie".into()),
            ..bar_chart()
        };
        let result = ChartTypeCheck::new("data").run(&workbook(pie), &a);
        assert_eq!(result.message, "Wrong chart type:\n- expected: bar\n- found: pie");
        assert_eq!(result.points, -5);
    }

    #[test]
    fn test_chart_formatting() {
        let a = assignment();
        assert!(ChartFormattingCheck::new("data").run(&workbook(bar_chart()), &a).passed);

        let bare = ChartInfo {
            x_label: None,
            data_labels: false,
            ..bar_chart()
        };
        let result = ChartFormattingCheck::new("data").run(&workbook(bare), &a);
        assert_eq!(result.points, -4);
        assert_eq!(
            result.message,
            "The chart is missing:\n- X axis label (expected \"Jméno\", found \"\")\n- data labels"
        );
    }

    #[test]
    fn test_three_d_chart() {
        let chart = ChartInfo {
            three_d: true,
            ..bar_chart()
        };
        let result = ThreeDChartCheck::new("data").run(&workbook(chart), &assignment());
        assert!(result.fatal);
        assert_eq!(result.points, -2);
    }
}
