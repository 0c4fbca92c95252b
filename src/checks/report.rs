use super::CheckResult;
use crate::common::{Error, Result};
use serde::Serialize;
use std::fmt;

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub points: i32,
    pub fatal: bool,
}

/// Results of a grading run in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub entries: Vec<ReportEntry>,
}

#[derive(Serialize)]
struct YamlReport<'a> {
    total_points: i32,
    passed: usize,
    failed: usize,
    checks: &'a [ReportEntry],
}

impl Report {
    pub fn push(&mut self, name: impl Into<String>, result: CheckResult) {
        self.entries.push(ReportEntry {
            name: name.into(),
            passed: result.passed,
            message: result.message,
            points: result.points,
            fatal: result.fatal,
        });
    }

    /// Sum of all penalties.
    pub fn total_points(&self) -> i32 {
        self.entries.iter().map(|e| e.points).sum()
    }

    pub fn failed(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| !e.passed)
    }

    pub fn has_fatal_failure(&self) -> bool {
        self.failed().any(|e| e.fatal)
    }

    pub fn entry(&self, name: &str) -> Option<&ReportEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// The report as a YAML document with the total up front.
    pub fn to_yaml(&self) -> Result<String> {
        let failed = self.failed().count();
        let report = YamlReport {
            total_points: self.total_points(),
            passed: self.entries.len() - failed,
            failed,
            checks: &self.entries,
        };
        serde_saphyr::to_string(&report)
            .map_err(|e| Error::Other(format!("Failed to serialize report to YAML: {}", e)))
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== GRADING RESULTS ===")?;
        for entry in &self.entries {
            writeln!(f)?;
            writeln!(
                f,
                "{}: {}",
                if entry.passed { "OK" } else { "FAIL" },
                entry.name
            )?;
            for line in entry.message.lines() {
                writeln!(f, "  {}", line)?;
            }
            if entry.points != 0 {
                writeln!(f, "  Points: {}", entry.points)?;
            }
        }
        writeln!(f)?;
        write!(f, "TOTAL PENALTY: {}", self.total_points())
    }
}
