//! Formula text utilities.
//!
//! Excel stores `SUM(B2:B23)` without a leading `=`, Calc stores
//! `of:=SUM([.B2:.B23])`. Grading compares formulas across both spellings,
//! so everything goes through [`normalize_formula`] first.
//!
//! Shared formulas in SpreadsheetML only carry their text on the anchor
//! cell; [`translate`] rebuilds the text for the other cells of the block.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static BRACKET_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\[\]]*)\]").expect("valid regex"));

/// Canonical form of a formula for comparison.
///
/// # Examples
///
/// ```
/// use docgrade::sheet::formula::normalize_formula;
///
/// assert_eq!(
///     normalize_formula("of:=SUM([.C2:.C23]; [$data.$B$2])"),
///     "=SUM(C2:C23,$B$2)"
/// );
/// assert_eq!(normalize_formula("=sum(c2:c23)"), "=SUM(C2:C23)");
/// ```
pub fn normalize_formula(formula: &str) -> String {
    let formula = formula.trim();
    let formula = formula.strip_prefix("of:").unwrap_or(formula);
    let formula = BRACKET_REF.replace_all(formula, |caps: &Captures| {
        caps[1]
            .split(':')
            .map(strip_sheet)
            .collect::<Vec<_>>()
            .join(":")
    });

    formula
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ';' { ',' } else { c })
        .collect::<String>()
        .to_uppercase()
}

/// `$data.$B$2` gives `$B$2`, `.E2` gives `E2`.
fn strip_sheet(part: &str) -> &str {
    let part = part.trim();
    match part.rfind('.') {
        Some(pos) => &part[pos + 1..],
        None => part,
    }
}

/// Shift the relative cell references of a formula by `rows` and `columns`.
/// Absolute parts (`$B`, `$2`) stay; references pushed off the grid become
/// `#REF!`. Text inside string literals is left alone.
///
/// # Examples
///
/// ```
/// use docgrade::sheet::formula::translate;
///
/// assert_eq!(translate("B2*$C$1+SUM(D2:D5)", 3, 0), "B5*$C$1+SUM(D5:D8)");
/// ```
pub fn translate(formula: &str, rows: i64, columns: i64) -> String {
    if rows == 0 && columns == 0 {
        return formula.to_string();
    }

    let mut out = String::with_capacity(formula.len() + 8);
    let mut last = 0;
    for (start, end, reference) in ReferenceScanner::new(formula) {
        out.push_str(&formula[last..start]);
        out.push_str(&reference.shifted(rows, columns));
        last = end;
    }
    out.push_str(&formula[last..]);
    out
}

/// Whether any cell reference outside string literals carries a `$`.
///
/// # Examples
///
/// ```
/// use docgrade::sheet::formula::has_absolute_reference;
///
/// assert!(has_absolute_reference("=B2/$B$28"));
/// assert!(!has_absolute_reference("=B2/B28&\"$A$1\""));
/// ```
pub fn has_absolute_reference(formula: &str) -> bool {
    ReferenceScanner::new(formula).any(|(_, _, r)| r.column_absolute || r.row_absolute)
}

/// Whether the formula refers to at least one cell.
pub fn has_cell_reference(formula: &str) -> bool {
    ReferenceScanner::new(formula).next().is_some()
}

/// A cell reference as written in formula text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Reference<'a> {
    column: &'a str,
    row: u32,
    column_absolute: bool,
    row_absolute: bool,
}

impl Reference<'_> {
    fn shifted(&self, rows: i64, columns: i64) -> String {
        let column = match super::coordinates::alpha_to_digit(self.column) {
            Ok(c) => c as i64,
            Err(_) => return "#REF!".to_string(),
        };
        let column = if self.column_absolute { column } else { column + columns };
        let row = if self.row_absolute {
            self.row as i64
        } else {
            self.row as i64 + rows
        };
        if column < 0 || row < 1 {
            return "#REF!".to_string();
        }

        format!(
            "{}{}{}{}",
            if self.column_absolute { "$" } else { "" },
            super::coordinates::digit_to_alpha(column as usize),
            if self.row_absolute { "$" } else { "" },
            row
        )
    }
}

/// Finds A1 references outside string literals.
struct ReferenceScanner<'a> {
    input: &'a str,
    position: usize,
    in_string: bool,
}

impl<'a> ReferenceScanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            in_string: false,
        }
    }

    fn byte(&self, at: usize) -> Option<u8> {
        self.input.as_bytes().get(at).copied()
    }

    /// Letters, digits, underscore and any non-ASCII byte continue a name.
    fn is_word(b: u8) -> bool {
        b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
    }

    /// Parse `$?[A-Z]{1,3}$?[0-9]+` starting at `start`.
    fn reference_at(&self, start: usize) -> Option<(usize, Reference<'a>)> {
        let bytes = self.input.as_bytes();
        let mut i = start;

        let column_absolute = self.byte(i) == Some(b'$');
        if column_absolute {
            i += 1;
        }
        let column_start = i;
        while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
            i += 1;
        }
        let column_len = i - column_start;
        if column_len == 0 || column_len > 3 {
            return None;
        }
        let column = &self.input[column_start..i];

        let row_absolute = self.byte(i) == Some(b'$');
        if row_absolute {
            i += 1;
        }
        let row_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == row_start {
            return None;
        }
        // Function names such as LOG10( and sheet names such as Tab1!
        if let Some(next) = self.byte(i)
            && (Self::is_word(next) || next == b'(' || next == b'!')
        {
            return None;
        }
        let row = self.input[row_start..i].parse().ok()?;

        Some((
            i,
            Reference {
                column,
                row,
                column_absolute,
                row_absolute,
            },
        ))
    }
}

impl<'a> Iterator for ReferenceScanner<'a> {
    type Item = (usize, usize, Reference<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.input.as_bytes();
        while self.position < bytes.len() {
            let at = self.position;
            let b = bytes[at];
            if b == b'"' {
                self.in_string = !self.in_string;
                self.position += 1;
                continue;
            }
            let starts_token = at == 0 || !(Self::is_word(bytes[at - 1]) || bytes[at - 1] == b'$');
            if !self.in_string
                && starts_token
                && (b == b'$' || b.is_ascii_alphabetic())
                && let Some((end, reference)) = self.reference_at(at)
            {
                self.position = end;
                return Some((at, end, reference));
            }
            self.position += 1;
        }
        None
    }
}
