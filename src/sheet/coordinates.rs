//! Cell coordinate conversion utilities (A1 notation).
//!
//! Coordinates are 0-indexed internally. Parsing accepts the decorations
//! found in real files and assignments: absolute markers (`$B$2`) and a
//! sheet qualifier in either the OOXML (`data!B2`) or the ODF (`data.B2`,
//! `$data.$B$2`) spelling.

use crate::common::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Convert alphabetic column to numeric (0-indexed)
///
/// # Examples
///
/// ```
/// use docgrade::sheet::coordinates::alpha_to_digit;
///
/// assert_eq!(alpha_to_digit("A").unwrap(), 0);
/// assert_eq!(alpha_to_digit("Z").unwrap(), 25);
/// assert_eq!(alpha_to_digit("AA").unwrap(), 26);
/// ```
pub fn alpha_to_digit(alpha: &str) -> Result<usize> {
    if alpha.is_empty() || !alpha.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::Other(format!(
            "Column value '{}' is malformed, must contain only letters",
            alpha
        )));
    }

    let mut column = 0usize;
    for c in alpha.to_ascii_uppercase().chars() {
        let val = (c as u32 - b'A' as u32 + 1) as usize;
        column = column
            .checked_mul(26)
            .and_then(|c| c.checked_add(val))
            .ok_or_else(|| Error::Other(format!("Column value '{}' is out of range", alpha)))?;
    }

    Ok(column - 1)
}

/// Convert numeric column to alphabetic notation (0-indexed)
///
/// # Examples
///
/// ```
/// use docgrade::sheet::coordinates::digit_to_alpha;
///
/// assert_eq!(digit_to_alpha(0), "A");
/// assert_eq!(digit_to_alpha(26), "AA");
/// ```
pub fn digit_to_alpha(mut digit: usize) -> String {
    let mut column = String::new();
    digit += 1;

    while digit > 0 {
        let c = ((digit - 1) % 26) as u8;
        column.insert(0, (b'A' + c) as char);
        digit = (digit - 1) / 26;
    }

    column
}

/// Column letters of an address: "B28" gives "B".
pub fn column_letters(address: &str) -> String {
    address
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_ascii_uppercase()
}

/// Drop a sheet qualifier and absolute markers from one reference.
fn strip_reference(s: &str) -> &str {
    let s = s.trim();
    let s = match s.rfind(['!', '.']) {
        Some(pos) => &s[pos + 1..],
        None => s,
    };
    s.trim_start_matches('$')
}

/// Cell coordinates (column, row) both 0-indexed
///
/// # Examples
///
/// ```
/// use docgrade::sheet::coordinates::CellCoord;
///
/// let coord: CellCoord = "AA10".parse().unwrap();
/// assert_eq!(coord.column(), 26);
/// assert_eq!(coord.row(), 9);
///
/// let coord: CellCoord = "$data.$B$2".parse().unwrap();
/// assert_eq!(coord.to_string(), "B2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    row: usize,
    column: usize,
}

impl CellCoord {
    #[inline]
    pub const fn new(column: usize, row: usize) -> Self {
        Self { row, column }
    }

    /// Get column index (0-indexed)
    #[inline]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Get row index (0-indexed)
    #[inline]
    pub const fn row(&self) -> usize {
        self.row
    }

    pub fn to_a1(&self) -> String {
        format!("{}{}", digit_to_alpha(self.column), self.row + 1)
    }
}

impl FromStr for CellCoord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = strip_reference(s);
        let split = s
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (alpha, numeric) = s.split_at(split);
        let numeric = numeric.trim_start_matches('$');

        if alpha.is_empty() {
            return Err(Error::Other(format!("No column letter found in '{}'", s)));
        }
        if numeric.is_empty() {
            return Err(Error::Other(format!("No row number found in '{}'", s)));
        }

        let column = alpha_to_digit(alpha)?;
        let row: usize = numeric
            .parse()
            .map_err(|_| Error::Other(format!("Failed to parse row number from '{}'", numeric)))?;

        if row == 0 {
            return Err(Error::Other("Row number must be >= 1".to_string()));
        }

        Ok(Self::new(column, row - 1))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

/// Cell range (start cell, end cell), normalized so that start is the
/// top-left corner.
///
/// # Examples
///
/// ```
/// use docgrade::sheet::coordinates::CellRange;
///
/// let range: CellRange = "A2:F23".parse().unwrap();
/// assert_eq!(range.width(), 6);
/// assert_eq!(range.height(), 22);
///
/// let single: CellRange = "data.D2".parse().unwrap();
/// assert_eq!(single.to_string(), "D2:D2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    start: CellCoord,
    end: CellCoord,
}

impl CellRange {
    pub fn new(a: CellCoord, b: CellCoord) -> Self {
        Self {
            start: CellCoord::new(a.column.min(b.column), a.row.min(b.row)),
            end: CellCoord::new(a.column.max(b.column), a.row.max(b.row)),
        }
    }

    #[inline]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    #[inline]
    pub const fn end(&self) -> CellCoord {
        self.end
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.end.column - self.start.column + 1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.end.row - self.start.row + 1
    }

    pub fn contains(&self, cell: CellCoord) -> bool {
        (self.start.column..=self.end.column).contains(&cell.column)
            && (self.start.row..=self.end.row).contains(&cell.row)
    }

    /// The two ranges share at least one cell.
    pub fn overlaps(&self, other: &CellRange) -> bool {
        !(self.end.column < other.start.column
            || self.start.column > other.end.column
            || self.end.row < other.start.row
            || self.start.row > other.end.row)
    }

    /// Cells row by row.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (self.start.row..=self.end.row).flat_map(move |row| {
            (self.start.column..=self.end.column).map(move |column| CellCoord::new(column, row))
        })
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((a, b)) => Ok(Self::new(a.parse()?, b.parse()?)),
            None => {
                let cell: CellCoord = s.parse()?;
                Ok(Self::new(cell, cell))
            },
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start.to_a1(), self.end.to_a1())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_to_digit() {
        assert_eq!(alpha_to_digit("A").unwrap(), 0);
        assert_eq!(alpha_to_digit("AZ").unwrap(), 51);
        assert_eq!(alpha_to_digit("BA").unwrap(), 52);
        assert_eq!(alpha_to_digit("aa").unwrap(), 26);
        assert!(alpha_to_digit("").is_err());
        assert!(alpha_to_digit("AAAAAAAAAAAAAAA").is_err());
        assert!(alpha_to_digit("A1").is_err());
    }

    #[test]
    fn test_digit_to_alpha() {
        assert_eq!(digit_to_alpha(25), "Z");
        assert_eq!(digit_to_alpha(51), "AZ");
        assert_eq!(digit_to_alpha(52), "BA");
    }

    #[test]
    fn test_decorated_coordinates() {
        let plain: CellCoord = "B28".parse().unwrap();
        assert_eq!(plain, "$B$28".parse().unwrap());
        assert_eq!(plain, "data!B28".parse().unwrap());
        assert_eq!(plain, "$data.$B$28".parse().unwrap());
        assert!("B0".parse::<CellCoord>().is_err());
        assert!("AAAAAAAAAAAAAAA1".parse::<CellCoord>().is_err());
        assert!("28".parse::<CellCoord>().is_err());
        assert_eq!(column_letters("b28"), "B");
    }

    #[test]
    fn test_range_geometry() {
        let data: CellRange = "A2:F23".parse().unwrap();
        let merged: CellRange = "F1:G2".parse().unwrap();
        let outside: CellRange = "H1:I30".parse().unwrap();
        assert!(data.overlaps(&merged));
        assert!(!data.overlaps(&outside));
        assert!(data.contains("C10".parse().unwrap()));

        let reversed: CellRange = "B3:A1".parse().unwrap();
        assert_eq!(reversed.to_string(), "A1:B3");
        assert_eq!(reversed.cells().count(), 6);
        assert_eq!(reversed.cells().nth(2).unwrap().to_string(), "A2");
    }
}
