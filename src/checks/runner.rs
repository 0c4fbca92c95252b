use super::{Check, Report};
use tracing::{debug, info, warn};

/// Runs a list of checks against one document.
///
/// Checks run in list order. A failing check never stops the others unless
/// fail-fast is enabled and the failure is fatal.
pub struct Runner<D: ?Sized, A> {
    checks: Vec<Box<dyn Check<D, A>>>,
    fail_fast: bool,
}

impl<D: ?Sized, A> Runner<D, A> {
    pub fn new(checks: Vec<Box<dyn Check<D, A>>>) -> Self {
        Self {
            checks,
            fail_fast: false,
        }
    }

    /// Stop after the first fatal failure.
    #[inline]
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.checks.iter().map(|c| c.name())
    }

    pub fn run(&self, document: &D, assignment: &A) -> Report {
        let mut report = Report::default();
        for check in &self.checks {
            let result = check.run(document, assignment);
            if result.passed {
                debug!(check = check.name(), "passed");
            } else {
                info!(
                    check = check.name(),
                    points = result.points,
                    fatal = result.fatal,
                    "failed"
                );
            }

            let stop = self.fail_fast && result.fatal;
            report.push(check.name(), result);
            if stop {
                warn!(
                    check = check.name(),
                    skipped = self.checks.len() - report.entries.len(),
                    "fatal failure, remaining checks skipped"
                );
                break;
            }
        }
        info!(
            checks = report.entries.len(),
            total = report.total_points(),
            "grading finished"
        );
        report
    }
}
