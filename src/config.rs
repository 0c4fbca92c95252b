//! Grading configuration.
//!
//! The rubric constants (which sheet holds the data, tolerances, protected
//! ranges) default to the values of the standard assignment. A YAML file can
//! override any subset of them.
//!
//! # Examples
//!
//! ```rust
//! use docgrade::config::GradingOptions;
//!
//! let options = GradingOptions::new()
//!     .with_data_sheet("výsledky")
//!     .with_fail_fast_on_fatal(true);
//! assert_eq!(options.data_sheet, "výsledky");
//! assert_eq!(options.space_tolerance, 20);
//!
//! let options = GradingOptions::from_yaml("tab_tolerance: 10\n")?;
//! assert_eq!(options.tab_tolerance, 10);
//! assert_eq!(options.data_sheet, "data");
//! # Ok::<(), docgrade::common::Error>(())
//! ```

use crate::common::{Error, Result};
use crate::style::{DiffOptions, SPACE_TOLERANCE, TAB_TOLERANCE};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options shared by every check of a grading run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GradingOptions {
    /// Sheet holding the processed data
    pub data_sheet: String,
    /// Sheet the raw data is copied from
    pub source_sheet: String,
    /// Sheets the workbook must contain
    pub required_sheets: Vec<String>,
    /// Functions the descriptive statistics must use
    pub statistics_functions: Vec<String>,
    /// Tolerance for spacing and indents, in twips
    pub space_tolerance: i64,
    /// Tolerance for tab stop positions, in twips
    pub tab_tolerance: i64,
    /// Ranges of the data sheet no merged cell may touch
    pub merged_forbidden_ranges: Vec<String>,
    /// Text cells at least this long must wrap
    pub wrap_min_text_length: usize,
    /// Heading levels whose style is graded
    pub heading_levels: u32,
    /// Sections (1-based) whose header and footer are graded
    pub section_checks: Vec<usize>,
    /// Stop running checks after the first fatal failure
    pub fail_fast_on_fatal: bool,
}

impl Default for GradingOptions {
    fn default() -> Self {
        Self {
            data_sheet: "data".to_string(),
            source_sheet: "zdroj".to_string(),
            required_sheets: vec!["zdroj".to_string(), "data".to_string()],
            statistics_functions: ["MIN", "MAX", "AVERAGE", "MEDIAN"]
                .into_iter()
                .map(String::from)
                .collect(),
            space_tolerance: SPACE_TOLERANCE,
            tab_tolerance: TAB_TOLERANCE,
            merged_forbidden_ranges: vec!["A2:F23".to_string(), "A28:E30".to_string()],
            wrap_min_text_length: 20,
            heading_levels: 3,
            section_checks: vec![1, 2, 3],
            fail_fast_on_fatal: false,
        }
    }
}

impl GradingOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from YAML. Missing keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_saphyr::from_str(yaml).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load options from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&yaml)
    }

    #[inline]
    pub fn with_data_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.data_sheet = sheet.into();
        self
    }

    #[inline]
    pub fn with_source_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.source_sheet = sheet.into();
        self
    }

    #[inline]
    pub fn with_statistics_functions<I, S>(mut self, functions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statistics_functions = functions.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn with_required_sheets<I, S>(mut self, sheets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_sheets = sheets.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn with_space_tolerance(mut self, tolerance: i64) -> Self {
        self.space_tolerance = tolerance;
        self
    }

    #[inline]
    pub fn with_tab_tolerance(mut self, tolerance: i64) -> Self {
        self.tab_tolerance = tolerance;
        self
    }

    #[inline]
    pub fn with_merged_forbidden_ranges<I, S>(mut self, ranges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.merged_forbidden_ranges = ranges.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn with_wrap_min_text_length(mut self, length: usize) -> Self {
        self.wrap_min_text_length = length;
        self
    }

    #[inline]
    pub fn with_heading_levels(mut self, levels: u32) -> Self {
        self.heading_levels = levels;
        self
    }

    #[inline]
    pub fn with_section_checks(mut self, sections: Vec<usize>) -> Self {
        self.section_checks = sections;
        self
    }

    #[inline]
    pub fn with_fail_fast_on_fatal(mut self, fail_fast: bool) -> Self {
        self.fail_fast_on_fatal = fail_fast;
        self
    }

    /// Diff options carrying the configured tolerances.
    pub fn diff_options(&self) -> DiffOptions {
        DiffOptions::new()
            .with_space_tolerance(self.space_tolerance)
            .with_tab_tolerance(self.tab_tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GradingOptions::default();
        assert_eq!(options.data_sheet, "data");
        assert_eq!(options.source_sheet, "zdroj");
        assert_eq!(options.statistics_functions, ["MIN", "MAX", "AVERAGE", "MEDIAN"]);
        assert_eq!(options.space_tolerance, 20);
        assert_eq!(options.tab_tolerance, 5);
        assert_eq!(options.merged_forbidden_ranges, ["A2:F23", "A28:E30"]);
        assert_eq!(options.wrap_min_text_length, 20);
        assert!(!options.fail_fast_on_fatal);
    }

    #[test]
    fn test_builder() {
        let options = GradingOptions::new()
            .with_space_tolerance(40)
            .with_section_checks(vec![2])
            .with_required_sheets(["data"])
            .with_source_sheet("vstup")
            .with_statistics_functions(["min", "max"])
            .with_merged_forbidden_ranges(["A1:D10"])
            .with_wrap_min_text_length(30);
        assert_eq!(options.space_tolerance, 40);
        assert_eq!(options.source_sheet, "vstup");
        assert_eq!(options.statistics_functions, ["min", "max"]);
        assert_eq!(options.merged_forbidden_ranges, ["A1:D10"]);
        assert_eq!(options.wrap_min_text_length, 30);
        assert_eq!(options.section_checks, [2]);
        assert_eq!(options.required_sheets, ["data"]);
        assert_eq!(options.diff_options().space_tolerance, 40);
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = "data_sheet: List1\nmerged_forbidden_ranges:\n  - A1:C3\nfail_fast_on_fatal: true\n";
        let options = GradingOptions::from_yaml(yaml).unwrap();
        assert_eq!(options.data_sheet, "List1");
        assert_eq!(options.merged_forbidden_ranges, ["A1:C3"]);
        assert!(options.fail_fast_on_fatal);
        assert_eq!(options.tab_tolerance, 5);
    }

    #[test]
    fn test_yaml_errors() {
        assert!(matches!(
            GradingOptions::from_yaml("space_tolerance: lots\n"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            GradingOptions::from_yaml("unknown_key: 1\n"),
            Err(Error::Config(_))
        ));
    }
}
