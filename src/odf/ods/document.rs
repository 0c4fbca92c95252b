//! CalcDocument - a loaded .ods behind the [`SpreadsheetDocument`] interface.

use super::chart::parse_chart;
use super::table::{ColumnStyles, TableReader};
use crate::common::unit::parse_points;
use crate::common::{DocumentFormat, Error, Package, Result};
use crate::odf::namespaces::{CHART, DRAW, FO, OFFICE, TABLE, XLINK, part};
use crate::odf::styles::{OdfStyle, StyleTable, is_bold_weight};
use crate::sheet::{Borders, CellCoord, CellStyle, ChartInfo, SpreadsheetDocument, Worksheet};
use std::collections::BTreeSet;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::{debug, warn};

/// A Calc workbook, fully read at load time.
///
/// # Examples
///
/// ```rust,no_run
/// use docgrade::odf::ods::CalcDocument;
/// use docgrade::sheet::SpreadsheetDocument;
///
/// let workbook = CalcDocument::open("results.ods")?;
/// if let Some(style) = workbook.cell_style("data", "D2") {
///     println!("{:?} decimal places", style.decimal_places);
/// }
/// # Ok::<(), docgrade::common::Error>(())
/// ```
pub struct CalcDocument {
    sheets: Vec<Worksheet>,
    column_styles: Vec<ColumnStyles>,
    styles: StyleTable,
    defined_names: BTreeSet<String>,
}

impl CalcDocument {
    /// Open a .ods file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let package = Package::open(path)?;
        Self::from_package(&package)
    }

    /// Load from any seekable reader holding a .ods archive.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let package = Package::from_reader(reader)?;
        Self::from_package(&package)
    }

    fn from_package<R: Read + Seek>(package: &Package<R>) -> Result<Self> {
        let content = package.xml_part(part::CONTENT)?;
        let styles_root = package.optional_xml_part(part::STYLES)?;
        let spreadsheet = content
            .path(&[(OFFICE, "body"), (OFFICE, "spreadsheet")])
            .ok_or_else(|| {
                Error::CorruptedFile("content.xml has no office:spreadsheet".to_string())
            })?;

        let styles = StyleTable::from_parts(&content, styles_root.as_ref());
        let reader = TableReader::new(&styles);

        let mut sheets = Vec::new();
        let mut column_styles = Vec::new();
        let mut unanchored = Vec::new();
        for table in spreadsheet.children_named(TABLE, "table") {
            let mut parsed = reader.read(table);
            parsed.sheet.charts.extend(
                table
                    .descendants_named(CHART, "chart")
                    .map(|chart| parse_chart(chart, &content)),
            );
            for href in &parsed.objects {
                parsed.sheet.charts.extend(load_charts(package, href)?);
            }
            sheets.push(parsed.sheet);
            column_styles.push(parsed.column_styles);
        }

        // Charts stored as objects no sheet refers to go to the first sheet.
        let referenced: BTreeSet<String> = spreadsheet
            .descendants_named(DRAW, "object")
            .filter_map(|o| o.attr(XLINK, "href"))
            .map(object_dir)
            .collect();
        for name in package.files() {
            if let Some(dir) = name.strip_suffix("/content.xml")
                && !dir.contains('/')
                && !referenced.contains(dir)
            {
                unanchored.extend(load_charts(package, dir)?);
            }
        }
        if !unanchored.is_empty() {
            match sheets.first_mut() {
                Some(first) => first.charts.extend(unanchored),
                None => warn!("charts in a workbook without sheets"),
            }
        }

        let defined_names = spreadsheet
            .descendants()
            .filter(|e| e.is(TABLE, "named-range") || e.is(TABLE, "named-expression"))
            .filter_map(|e| e.attr(TABLE, "name"))
            .map(str::to_uppercase)
            .collect();

        debug!(
            sheets = sheets.len(),
            styles = styles.len(),
            "loaded calc workbook"
        );

        Ok(Self {
            sheets,
            column_styles,
            styles,
            defined_names,
        })
    }

    fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets
            .iter()
            .position(|s| s.name == name)
            .or_else(|| {
                let wanted = name.to_lowercase();
                self.sheets.iter().position(|s| s.name.to_lowercase() == wanted)
            })
    }

    fn resolve_cell_style(&self, style: &OdfStyle, text: Option<&str>) -> CellStyle {
        let styles = &self.styles;
        let cell_prop = |local: &'static str| {
            styles.walk(style, move |s| {
                s.properties("table-cell-properties")
                    .and_then(|p| p.attr(FO, local))
            })
        };

        let number_format = styles
            .walk(style, OdfStyle::data_style_name)
            .map(str::to_string);
        let decimal_places = number_format
            .as_deref()
            .and_then(|name| styles.decimal_places(name))
            .or_else(|| text.and_then(decimal_places_in_text));

        let edge = |local: &'static str| {
            cell_prop(local)
                .or_else(|| cell_prop("border"))
                .and_then(border_style)
        };

        CellStyle {
            number_format,
            decimal_places,
            align_h: styles
                .walk(style, |s| {
                    s.properties("paragraph-properties")
                        .and_then(|p| p.attr(FO, "text-align"))
                })
                .map(horizontal_alignment),
            bold: styles
                .walk(style, |s| {
                    s.properties("text-properties")
                        .and_then(|p| p.attr(FO, "font-weight"))
                })
                .is_some_and(is_bold_weight),
            wrap: styles
                .walk(style, |s| {
                    s.properties("table-cell-properties")
                        .and_then(|p| p.attr(FO, "wrap-option"))
                })
                .map(|w| w != "no-wrap"),
            borders: Borders {
                left: edge("border-left"),
                right: edge("border-right"),
                top: edge("border-top"),
                bottom: edge("border-bottom"),
            },
        }
    }
}

/// `./Object 1` gives `Object 1`.
fn object_dir(href: &str) -> String {
    href.trim_start_matches("./").trim_end_matches('/').to_string()
}

/// Charts of one embedded object, which may be something else entirely.
fn load_charts<R: Read + Seek>(package: &Package<R>, href: &str) -> Result<Vec<ChartInfo>> {
    let dir = object_dir(href);
    let Some(root) = package.optional_xml_part(&format!("{}/content.xml", dir))? else {
        debug!(object = %dir, "embedded object without content.xml");
        return Ok(Vec::new());
    };
    Ok(root
        .descendants_named(CHART, "chart")
        .map(|chart| parse_chart(chart, &root))
        .collect())
}

/// `start`/`end` in the Excel vocabulary.
fn horizontal_alignment(align: &str) -> String {
    match align {
        "start" => "left".to_string(),
        "end" => "right".to_string(),
        other => other.to_string(),
    }
}

/// A border in the Excel vocabulary: `0.74pt solid #000000` gives `thin`,
/// heavier solid lines `medium` and `thick`. `none` gives nothing.
fn border_style(border: &str) -> Option<String> {
    let mut line = "solid";
    let mut width = None;
    for token in border.split_whitespace() {
        if token.starts_with('#') {
            continue;
        }
        match parse_points(token) {
            Some(points) => width = Some(points),
            None => line = token,
        }
    }
    let name = match line {
        "none" | "hidden" => return None,
        "solid" => match width {
            Some(w) if w <= 0.1 => "hair",
            Some(w) if w < 1.1 => "thin",
            Some(w) if w < 2.0 => "medium",
            Some(_) => "thick",
            None => "thin",
        },
        "double" | "double-thin" => "double",
        "dotted" => "dotted",
        "dashed" => "dashed",
        "dash-dot" => "dashDot",
        "dash-dot-dot" => "dashDotDot",
        other => other,
    };
    Some(name.to_string())
}

/// Digits after the last decimal separator of a displayed number.
fn decimal_places_in_text(text: &str) -> Option<u32> {
    let number = text
        .trim()
        .trim_end_matches(|c: char| !c.is_ascii_digit())
        .trim_start_matches(|c: char| !c.is_ascii_digit() && c != '-');
    if number.is_empty() {
        return None;
    }
    match number.rfind([',', '.']) {
        Some(pos) => {
            let fraction = &number[pos + 1..];
            fraction
                .chars()
                .all(|c| c.is_ascii_digit())
                .then(|| fraction.len() as u32)
        },
        None => number
            .chars()
            .all(|c| c.is_ascii_digit() || c == '-' || c.is_whitespace())
            .then_some(0),
    }
}

impl SpreadsheetDocument for CalcDocument {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Ods
    }

    fn worksheets(&self) -> &[Worksheet] {
        &self.sheets
    }

    fn cell_style(&self, sheet: &str, address: &str) -> Option<CellStyle> {
        let index = self.sheet_index(sheet)?;
        let coord: CellCoord = address.parse().ok()?;
        let cell = self.sheets[index].cells.get(&coord);
        let style_name = cell
            .and_then(|c| c.style_name.as_deref())
            .or_else(|| self.column_styles[index].get(coord.column()))
            .unwrap_or("Default");
        let text = cell.and_then(|c| c.text.as_deref());
        let resolved = match self.styles.get(style_name) {
            Some(style) => self.resolve_cell_style(style, text),
            None => CellStyle {
                decimal_places: text.and_then(decimal_places_in_text),
                ..Default::default()
            },
        };
        Some(resolved)
    }

    fn defined_names(&self) -> &BTreeSet<String> {
        &self.defined_names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::package::test_support::build_zip;
    use std::io::Cursor;

    const NS: &str = r#"xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" xmlns:fo="urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0" xmlns:number="urn:oasis:names:tc:opendocument:xmlns:datastyle:1.0" xmlns:draw="urn:oasis:names:tc:opendocument:xmlns:drawing:1.0" xmlns:xlink="http://www.w3.org/1999/xlink""#;

    fn load() -> CalcDocument {
        let styles = format!(
            r#"<office:document-styles {NS}><office:styles>
  <style:default-style style:family="table-cell"><style:text-properties fo:font-size="10pt"/></style:default-style>
  <style:style style:name="Default" style:family="table-cell"/>
</office:styles></office:document-styles>"#
        );
        let content = format!(
            r#"<office:document-content {NS}>
<office:automatic-styles>
  <number:number-style style:name="N2"><number:number number:decimal-places="2" number:min-integer-digits="1"/></number:number-style>
  <style:style style:name="ce1" style:family="table-cell" style:parent-style-name="Default" style:data-style-name="N2">
    <style:table-cell-properties fo:wrap-option="wrap" fo:border="0.74pt solid #000000" fo:border-top="none"/>
    <style:paragraph-properties fo:text-align="center"/>
    <style:text-properties fo:font-weight="bold"/>
  </style:style>
  <style:style style:name="ce2" style:family="table-cell" style:parent-style-name="Default"/>
</office:automatic-styles>
<office:body><office:spreadsheet>
  <table:table table:name="data">
    <table:table-column table:default-cell-style-name="ce1"/>
    <table:table-column table:default-cell-style-name="ce2"/>
    <table:table-row>
      <table:table-cell office:value-type="float" office:value="1.5"><text:p>1,50</text:p></table:table-cell>
      <table:table-cell office:value-type="float" office:value="2.25"><text:p>2,250</text:p><draw:frame><draw:object xlink:href="./Object 1"/></draw:frame></table:table-cell>
    </table:table-row>
  </table:table>
  <table:table table:name="zdroj"/>
  <table:named-expressions><table:named-range table:name="Vyska" table:base-cell-address="$data.$A$1" table:cell-range-address="$data.$A$1:.$A$2"/></table:named-expressions>
</office:spreadsheet></office:body></office:document-content>"#
        );
        let chart = r#"<office:document xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:chart="urn:oasis:names:tc:opendocument:xmlns:chart:1.0"><office:body><office:chart><chart:chart chart:class="chart:bar"/></office:chart></office:body></office:document>"#;
        let bytes = build_zip(&[
            ("content.xml", content.as_str()),
            ("styles.xml", styles.as_str()),
            ("Object 1/content.xml", chart),
        ]);
        CalcDocument::from_reader(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn test_sheets_and_names() {
        let doc = load();
        assert_eq!(doc.sheet_names(), vec!["data", "zdroj"]);
        assert!(doc.has_sheet("DATA"));
        assert!(doc.defined_names().contains("VYSKA"));
        assert_eq!(doc.cell_value("data", "A1").as_deref(), Some("1,50"));
    }

    #[test]
    fn test_cell_style_from_column_default() {
        let doc = load();
        let style = doc.cell_style("data", "A1").unwrap();
        assert_eq!(style.number_format.as_deref(), Some("N2"));
        assert_eq!(style.decimal_places, Some(2));
        assert_eq!(style.align_h.as_deref(), Some("center"));
        assert!(style.bold);
        assert_eq!(style.wrap, Some(true));
        assert_eq!(style.borders.left.as_deref(), Some("thin"));
        assert_eq!(style.borders.top, None);

        let counted = doc.cell_style("data", "B1").unwrap();
        assert_eq!(counted.number_format, None);
        assert_eq!(counted.decimal_places, Some(3));
        assert!(!counted.bold);
    }

    #[test]
    fn test_chart_per_sheet() {
        let doc = load();
        assert!(doc.has_chart("data"));
        assert_eq!(doc.chart_type("data"), Some("bar"));
        assert!(!doc.has_chart("zdroj"));
    }

    #[test]
    fn test_decimal_places_in_text() {
        assert_eq!(decimal_places_in_text("12,345"), Some(3));
        assert_eq!(decimal_places_in_text("1.5 %"), Some(1));
        assert_eq!(decimal_places_in_text("170"), Some(0));
        assert_eq!(decimal_places_in_text("Jméno"), None);
    }

    #[test]
    fn test_border_names() {
        assert_eq!(border_style("0.06pt solid #000000").as_deref(), Some("hair"));
        assert_eq!(border_style("1.76pt solid #000000").as_deref(), Some("medium"));
        assert_eq!(border_style("2.49pt solid #000000").as_deref(), Some("thick"));
        assert_eq!(border_style("1.1pt double #000000").as_deref(), Some("double"));
        assert_eq!(border_style("none"), None);
    }

    #[test]
    fn test_missing_spreadsheet_body() {
        let content = format!(r#"<office:document-content {NS}><office:body><office:text/></office:body></office:document-content>"#);
        let bytes = build_zip(&[("content.xml", content.as_str())]);
        assert!(matches!(
            CalcDocument::from_reader(Cursor::new(bytes)),
            Err(Error::CorruptedFile(_))
        ));
    }
}
