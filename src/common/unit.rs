//! Unit conversion utilities.
//!
//! OOXML stores spacing and indents in twentieths of a point (twips) and font
//! sizes in half-points. ODF stores lengths as strings with a unit suffix
//! (`0.42cm`, `12pt`). Everything is normalized to twips and points so both
//! formats compare against the same expectations.

use crate::common::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Twips per centimeter, as used by the grading rubric (1 cm = 567 twips).
pub const TWIPS_PER_CM: f64 = 567.0;
pub const TWIPS_PER_INCH: f64 = 1440.0;
pub const TWIPS_PER_PT: f64 = 20.0;

/// Convert an OOXML half-point size (`w:sz/@w:val`) to whole points.
///
/// A half point is dropped, matching the whole-point sizes read from ODF.
#[inline]
pub fn half_points_to_pt(half_points: i64) -> f64 {
    half_points.div_euclid(2) as f64
}

/// Convert an OOXML `w:spacing/@w:line` value (240ths of a line) to a line multiple.
#[inline]
pub fn line_to_multiple(line: i64) -> f64 {
    line as f64 / 240.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    /// Millimeter
    Millimeter,
    /// Centimeter
    Centimeter,
    /// Inch
    Inch,
    /// Point (1/72 inch)
    Point,
    /// Pica (1/6 inch)
    Pica,
}

impl LengthUnit {
    /// Get the unit abbreviation
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Millimeter => "mm",
            Self::Centimeter => "cm",
            Self::Inch => "in",
            Self::Point => "pt",
            Self::Pica => "pc",
        }
    }

    fn from_str_internal(s: &str) -> Option<Self> {
        match s {
            "mm" => Some(Self::Millimeter),
            "cm" => Some(Self::Centimeter),
            "in" | "inch" => Some(Self::Inch),
            "pt" => Some(Self::Point),
            "pc" => Some(Self::Pica),
            _ => None,
        }
    }
}

impl FromStr for LengthUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_internal(s)
            .ok_or_else(|| Error::Other(format!("Unknown length unit '{}'", s)))
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Length value with unit
///
/// # Examples
///
/// ```
/// use docgrade::common::unit::{Length, LengthUnit};
///
/// let length = "0.42cm".parse::<Length>().unwrap();
/// assert_eq!(length.unit(), LengthUnit::Centimeter);
/// assert_eq!(length.to_twips().round(), 238.0);
///
/// let size = "14pt".parse::<Length>().unwrap();
/// assert_eq!(size.to_points(), 14.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    value: f64,
    unit: LengthUnit,
}

impl Length {
    #[inline]
    pub fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    /// Convert to twips.
    pub fn to_twips(&self) -> f64 {
        match self.unit {
            LengthUnit::Centimeter => self.value * TWIPS_PER_CM,
            LengthUnit::Millimeter => self.value * TWIPS_PER_CM / 10.0,
            LengthUnit::Inch => self.value * TWIPS_PER_INCH,
            LengthUnit::Point => self.value * TWIPS_PER_PT,
            LengthUnit::Pica => self.value * 12.0 * TWIPS_PER_PT,
        }
    }

    /// Convert to points.
    pub fn to_points(&self) -> f64 {
        match self.unit {
            LengthUnit::Point => self.value,
            _ => self.to_twips() / TWIPS_PER_PT,
        }
    }
}

impl FromStr for Length {
    type Err = Error;

    /// Parse length from string (e.g., "2.5cm", "10pt"). A bare number is
    /// taken as centimeters.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(s.len());
        let (digits, unit) = s.split_at(split);

        if digits.is_empty() {
            return Err(Error::Other(format!("No numeric value found in '{}'", s)));
        }

        let value: f64 = digits
            .parse()
            .map_err(|_| Error::Other(format!("Failed to parse numeric value from '{}'", s)))?;

        let unit = if unit.trim().is_empty() {
            LengthUnit::Centimeter
        } else {
            LengthUnit::from_str(unit.trim())?
        };

        Ok(Self::new(value, unit))
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.as_str())
    }
}

/// Parse an ODF length attribute straight to rounded twips.
pub fn parse_twips(value: &str) -> Option<i64> {
    value
        .parse::<Length>()
        .ok()
        .map(|l| l.to_twips().round() as i64)
}

/// Parse an ODF font size (`12pt`) to points. Percentages are not resolved.
pub fn parse_points(value: &str) -> Option<f64> {
    if value.trim_end().ends_with('%') {
        return None;
    }
    value.parse::<Length>().ok().map(|l| l.to_points())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_length() {
        let length = "2.5cm".parse::<Length>().unwrap();
        assert_eq!(length.value(), 2.5);
        assert_eq!(length.unit(), LengthUnit::Centimeter);

        let length = "-0.5in".parse::<Length>().unwrap();
        assert_eq!(length.value(), -0.5);
        assert_eq!(length.unit(), LengthUnit::Inch);

        assert!("cm".parse::<Length>().is_err());
        assert!("3furlong".parse::<Length>().is_err());
    }

    #[test]
    fn test_twips_conversion() {
        assert_eq!(parse_twips("1cm"), Some(567));
        assert_eq!(parse_twips("1in"), Some(1440));
        assert_eq!(parse_twips("6pt"), Some(120));
        assert_eq!(parse_twips("1.27cm"), Some(720));
    }

    #[test]
    fn test_points_conversion() {
        assert_eq!(parse_points("16pt"), Some(16.0));
        assert_eq!(parse_points("120%"), None);
        assert_eq!(half_points_to_pt(28), 14.0);
        assert_eq!(half_points_to_pt(23), 11.0);
        assert_eq!(line_to_multiple(360), 1.5);
    }
}
