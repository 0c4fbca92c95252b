use serde::Serialize;

/// Outcome of one check.
///
/// `points` is the signed penalty, zero when the check passed. `fatal` marks
/// failures that make later checks pointless (no TOC, no chart, wrong
/// formulas).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub passed: bool,
    pub message: String,
    pub points: i32,
    pub fatal: bool,
}

impl CheckResult {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            points: 0,
            fatal: false,
        }
    }

    pub fn fail(message: impl Into<String>, points: i32) -> Self {
        Self {
            passed: false,
            message: message.into(),
            points,
            fatal: false,
        }
    }

    /// A check that cannot be evaluated for this input. Counts as a pass.
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::pass(format!("skipped: {}", reason.into()))
    }

    /// Pass with `ok` when nothing was found, otherwise fail listing every
    /// problem under `header`.
    pub fn from_problems(problems: &[String], points: i32, header: &str, ok: &str) -> Self {
        if problems.is_empty() {
            Self::pass(ok)
        } else {
            Self::fail(list_message(header, problems), points)
        }
    }

    /// Mark a failure as fatal. Passing results stay non-fatal.
    #[inline]
    pub fn into_fatal(mut self) -> Self {
        self.fatal = !self.passed;
        self
    }
}

/// `header:` followed by one `- item` line per item.
pub(crate) fn list_message<S: AsRef<str>>(header: &str, items: &[S]) -> String {
    let mut message = format!("{}:", header);
    for item in items {
        message.push_str("\n- ");
        message.push_str(item.as_ref());
    }
    message
}
