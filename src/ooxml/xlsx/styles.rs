//! Styles and formatting for Excel files.
//!
//! A cell's `s` attribute indexes `cellXfs`; each xf points into the font,
//! border and number-format tables. Conditional formats carry their own
//! differential formats (`dxfs`).

use crate::common::xml::Element;
use crate::ooxml::namespaces::SML;
use crate::sheet::{Borders, CellStyle};
use std::collections::HashMap;

/// Font information
#[derive(Debug, Clone, Default)]
pub struct Font {
    pub bold: bool,
    /// Color (RGB, theme or indexed)
    pub color: Option<String>,
}

/// Cell format record from `cellXfs`
#[derive(Debug, Clone, Default)]
pub struct CellFormat {
    pub num_fmt_id: u32,
    pub font_id: usize,
    pub border_id: usize,
    pub horizontal: Option<String>,
    pub wrap_text: bool,
}

/// Differential format used by conditional formatting.
#[derive(Debug, Clone, Copy, Default)]
pub struct DifferentialFormat {
    pub has_fill: bool,
    pub has_font_color: bool,
}

/// Styles collection
#[derive(Debug, Default)]
pub struct StyleSheet {
    /// Custom number formats by id
    number_formats: HashMap<u32, String>,
    fonts: Vec<Font>,
    borders: Vec<Borders>,
    cell_xfs: Vec<CellFormat>,
    dxfs: Vec<DifferentialFormat>,
}

impl StyleSheet {
    /// Parse a `<styleSheet>` element.
    pub fn from_xml(root: &Element) -> Self {
        let number_formats = root
            .path(&[(SML, "numFmts")])
            .into_iter()
            .flat_map(|n| n.children_named(SML, "numFmt"))
            .filter_map(|f| {
                Some((
                    f.attr_parse("", "numFmtId")?,
                    f.attr("", "formatCode")?.to_string(),
                ))
            })
            .collect();

        let fonts = root
            .path(&[(SML, "fonts")])
            .into_iter()
            .flat_map(|f| f.children_named(SML, "font"))
            .map(parse_font)
            .collect();

        let borders = root
            .path(&[(SML, "borders")])
            .into_iter()
            .flat_map(|b| b.children_named(SML, "border"))
            .map(parse_border)
            .collect();

        let cell_xfs = root
            .path(&[(SML, "cellXfs")])
            .into_iter()
            .flat_map(|x| x.children_named(SML, "xf"))
            .map(|xf| {
                let alignment = xf.child(SML, "alignment");
                CellFormat {
                    num_fmt_id: xf.attr_parse("", "numFmtId").unwrap_or(0),
                    font_id: xf.attr_parse("", "fontId").unwrap_or(0),
                    border_id: xf.attr_parse("", "borderId").unwrap_or(0),
                    horizontal: alignment
                        .and_then(|a| a.attr("", "horizontal"))
                        .map(str::to_string),
                    wrap_text: alignment
                        .and_then(|a| a.attr("", "wrapText"))
                        .is_some_and(is_true),
                }
            })
            .collect();

        let dxfs = root
            .path(&[(SML, "dxfs")])
            .into_iter()
            .flat_map(|d| d.children_named(SML, "dxf"))
            .map(|dxf| DifferentialFormat {
                has_fill: dxf
                    .path(&[(SML, "fill"), (SML, "patternFill")])
                    .is_some_and(|p| p.child(SML, "fgColor").is_some() || p.child(SML, "bgColor").is_some()),
                has_font_color: dxf.path(&[(SML, "font"), (SML, "color")]).is_some(),
            })
            .collect();

        Self {
            number_formats,
            fonts,
            borders,
            cell_xfs,
            dxfs,
        }
    }

    /// Format code of a number format id, custom or built-in.
    pub fn number_format(&self, id: u32) -> Option<&str> {
        self.number_formats
            .get(&id)
            .map(String::as_str)
            .or_else(|| builtin_format_code(id))
    }

    pub fn dxf(&self, id: usize) -> Option<DifferentialFormat> {
        self.dxfs.get(id).copied()
    }

    /// Resolved style of the xf at `index`. An unknown index falls back to
    /// the default format.
    pub fn cell_style(&self, index: usize) -> CellStyle {
        let Some(xf) = self.cell_xfs.get(index) else {
            return CellStyle {
                number_format: Some("General".to_string()),
                ..Default::default()
            };
        };
        let number_format = self.number_format(xf.num_fmt_id).map(str::to_string);
        CellStyle {
            decimal_places: number_format.as_deref().and_then(decimal_places),
            number_format,
            align_h: xf.horizontal.clone(),
            bold: self.fonts.get(xf.font_id).is_some_and(|f| f.bold),
            wrap: Some(xf.wrap_text),
            borders: self.borders.get(xf.border_id).cloned().unwrap_or_default(),
        }
    }
}

fn is_true(value: &str) -> bool {
    matches!(value, "1" | "true")
}

/// Boolean toggle elements (`<b/>`, `<b val="0"/>`).
fn toggle(el: &Element, name: &str) -> bool {
    el.child(SML, name)
        .is_some_and(|t| t.attr("", "val").is_none_or(is_true))
}

fn parse_font(font: &Element) -> Font {
    Font {
        bold: toggle(font, "b"),
        color: font.child(SML, "color").and_then(|c| {
            c.attr("", "rgb")
                .or_else(|| c.attr("", "theme"))
                .or_else(|| c.attr("", "indexed"))
                .map(str::to_string)
        }),
    }
}

fn parse_border(border: &Element) -> Borders {
    let edge = |names: &[&str]| {
        names
            .iter()
            .filter_map(|n| border.child(SML, n))
            .find_map(|e| e.attr("", "style"))
            .filter(|s| *s != "none")
            .map(str::to_string)
    };
    Borders {
        left: edge(&["left", "start"]),
        right: edge(&["right", "end"]),
        top: edge(&["top"]),
        bottom: edge(&["bottom"]),
    }
}

/// Digits after the decimal separator in the first section of a format
/// code; `None` for formats that do not show numbers (General, text).
pub fn decimal_places(code: &str) -> Option<u32> {
    let section = code.split(';').next().unwrap_or_default();
    let mut plain = String::with_capacity(section.len());
    let mut quoted = false;
    let mut bracketed = false;
    for c in section.chars() {
        match c {
            '"' => quoted = !quoted,
            '[' if !quoted => bracketed = true,
            ']' if !quoted => bracketed = false,
            _ if !quoted && !bracketed => plain.push(c),
            _ => {},
        }
    }
    if !plain.contains(['0', '#', '?']) {
        return None;
    }
    Some(match plain.split_once('.') {
        Some((_, fraction)) => fraction
            .chars()
            .take_while(|c| matches!(c, '0' | '#' | '?'))
            .count() as u32,
        None => 0,
    })
}

/// Get the format code for a built-in number format ID.
fn builtin_format_code(id: u32) -> Option<&'static str> {
    match id {
        0 => Some("General"),
        1 => Some("0"),
        2 => Some("0.00"),
        3 => Some("#,##0"),
        4 => Some("#,##0.00"),
        9 => Some("0%"),
        10 => Some("0.00%"),
        11 => Some("0.00E+00"),
        12 => Some("# ?/?"),
        13 => Some("# ??/??"),
        14 => Some("mm-dd-yy"),
        15 => Some("d-mmm-yy"),
        16 => Some("d-mmm"),
        17 => Some("mmm-yy"),
        18 => Some("h:mm AM/PM"),
        19 => Some("h:mm:ss AM/PM"),
        20 => Some("h:mm"),
        21 => Some("h:mm:ss"),
        22 => Some("m/d/yy h:mm"),
        37 => Some("#,##0 ;(#,##0)"),
        38 => Some("#,##0 ;[Red](#,##0)"),
        39 => Some("#,##0.00;(#,##0.00)"),
        40 => Some("#,##0.00;[Red](#,##0.00)"),
        45 => Some("mm:ss"),
        46 => Some("[h]:mm:ss"),
        47 => Some("mmss.0"),
        48 => Some("##0.0E+0"),
        49 => Some("@"),
        _ => None,
    }
}
