//! Checks over Excel and Calc workbooks.
//!
//! Most checks look at one sheet, the data sheet from
//! [`crate::config::GradingOptions`], and receive its name on construction.

pub mod chart;
pub mod formatting;
pub mod formula;
pub mod workbook;

#[cfg(test)]
pub(crate) mod fixture;

pub use chart::{ChartFormattingCheck, ChartTypeCheck, MissingChartCheck, ThreeDChartCheck};
pub use formatting::{
    ConditionalFormattingCorrectnessCheck, ConditionalFormattingExistsCheck, HeaderFormattingCheck,
    MergedCellsCheck, NumberFormattingCheck, TableBorderCheck, WrapTextCheck,
};
pub use formula::{
    ArrayFormulaCheck, DescriptiveStatisticsCheck, MissingOrWrongFormulaCheck,
    NamedRangeUsageCheck, NonCopyableFormulasCheck, RedundantAbsoluteReferenceCheck,
};
pub use workbook::{CopiedFromSourceCheck, RequiredWorksheetCheck};

use crate::checks::CheckResult;

/// Fatal failure for a sheet the check cannot work without.
pub(crate) fn missing_sheet(sheet: &str, points: i32) -> CheckResult {
    CheckResult::fail(format!("The sheet \"{}\" is missing.", sheet), points).into_fatal()
}

/// At most `limit` items, noting how many were left out.
pub(crate) fn truncated(mut items: Vec<String>, limit: usize) -> Vec<String> {
    if items.len() > limit {
        let rest = items.len() - limit;
        items.truncate(limit);
        items.push(format!("... and {} more", rest));
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated() {
        let items: Vec<String> = (1..=7).map(|i| format!("B{}", i)).collect();
        let shown = truncated(items.clone(), 5);
        assert_eq!(shown.len(), 6);
        assert_eq!(shown[5], "... and 2 more");
        assert_eq!(truncated(items, 10).len(), 7);
    }
}
