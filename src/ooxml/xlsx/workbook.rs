//! ExcelDocument - a loaded .xlsx behind the [`SpreadsheetDocument`] interface.

use super::chart::parse_chart;
use super::shared_strings::SharedStrings;
use super::styles::StyleSheet;
use super::worksheet::SheetReader;
use crate::common::{DocumentFormat, Package, Result};
use crate::ooxml::namespaces::{C, R, SML, part};
use crate::ooxml::opc::{PackURI, Relationships};
use crate::sheet::{CellStyle, ChartInfo, SpreadsheetDocument, Worksheet};
use std::collections::BTreeSet;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::{debug, warn};

/// An Excel workbook, fully read at load time.
///
/// # Examples
///
/// ```rust,no_run
/// use docgrade::ooxml::xlsx::ExcelDocument;
/// use docgrade::sheet::SpreadsheetDocument;
///
/// let workbook = ExcelDocument::open("results.xlsx")?;
/// if let Some(cell) = workbook.cell("data", "D2") {
///     println!("{:?} = {}", cell.formula, cell.cached_value);
/// }
/// # Ok::<(), docgrade::common::Error>(())
/// ```
pub struct ExcelDocument {
    sheets: Vec<Worksheet>,
    styles: StyleSheet,
    defined_names: BTreeSet<String>,
}

impl ExcelDocument {
    /// Open a .xlsx file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let package = Package::open(path)?;
        Self::from_package(&package)
    }

    /// Load from any seekable reader holding a .xlsx archive.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let package = Package::from_reader(reader)?;
        Self::from_package(&package)
    }

    fn from_package<R: Read + Seek>(package: &Package<R>) -> Result<Self> {
        let main = PackURI::new(part::XL_WORKBOOK)?;
        let root = package.xml_part(main.membername())?;
        let rels = Relationships::load(package, &main)?;

        let shared_strings = package
            .optional_xml_part(part::XL_SHARED_STRINGS)?
            .map(|root| SharedStrings::from_xml(&root))
            .unwrap_or_default();
        let styles = package
            .optional_xml_part(part::XL_STYLES)?
            .map(|root| StyleSheet::from_xml(&root))
            .unwrap_or_default();
        let reader = SheetReader::new(&shared_strings, &styles);

        let mut sheets = Vec::new();
        for entry in root
            .child(SML, "sheets")
            .into_iter()
            .flat_map(|s| s.children_named(SML, "sheet"))
        {
            let name = entry.attr("", "name").unwrap_or_default();
            let Some(target) = entry.attr(R, "id").and_then(|id| rels.target_of(id)) else {
                warn!(sheet = name, "sheet without a resolvable relationship");
                continue;
            };
            let Some(xml) = package.optional_xml_part(target.membername())? else {
                warn!(sheet = name, part = %target, "sheet part is missing");
                continue;
            };

            let mut parsed = reader.read(name, &xml);
            if !parsed.drawings.is_empty() {
                let sheet_rels = Relationships::load(package, &target)?;
                for r_id in &parsed.drawings {
                    match sheet_rels.target_of(r_id) {
                        Some(drawing) => parsed.sheet.charts.extend(load_charts(package, &drawing)?),
                        None => warn!(sheet = name, r_id = %r_id, "drawing reference without target"),
                    }
                }
            }
            sheets.push(parsed.sheet);
        }

        let defined_names = root
            .child(SML, "definedNames")
            .into_iter()
            .flat_map(|d| d.children_named(SML, "definedName"))
            .filter_map(|d| d.attr("", "name"))
            .filter(|name| !name.starts_with("_xlnm."))
            .map(str::to_uppercase)
            .collect();

        debug!(
            sheets = sheets.len(),
            strings = shared_strings.len(),
            "loaded excel workbook"
        );

        Ok(Self {
            sheets,
            styles,
            defined_names,
        })
    }
}

/// Charts anchored in one drawing part, in anchor order.
fn load_charts<R: Read + Seek>(package: &Package<R>, drawing: &PackURI) -> Result<Vec<ChartInfo>> {
    let Some(root) = package.optional_xml_part(drawing.membername())? else {
        warn!(part = %drawing, "drawing part is missing");
        return Ok(Vec::new());
    };
    let rels = Relationships::load(package, drawing)?;

    let mut charts = Vec::new();
    for r_id in root
        .descendants_named(C, "chart")
        .filter_map(|c| c.attr(R, "id"))
    {
        let Some(target) = rels.target_of(r_id) else {
            warn!(part = %drawing, r_id, "chart reference without target");
            continue;
        };
        match package.optional_xml_part(target.membername())? {
            Some(chart) => charts.push(parse_chart(&chart)),
            None => warn!(part = %target, "chart part is missing"),
        }
    }
    Ok(charts)
}

impl SpreadsheetDocument for ExcelDocument {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Xlsx
    }

    fn worksheets(&self) -> &[Worksheet] {
        &self.sheets
    }

    fn cell_style(&self, sheet: &str, address: &str) -> Option<CellStyle> {
        let cell = self.cell(sheet, address)?;
        let index = cell
            .style_name
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        Some(self.styles.cell_style(index))
    }

    fn defined_names(&self) -> &BTreeSet<String> {
        &self.defined_names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;
    use crate::common::package::test_support::build_zip;
    use std::io::Cursor;

    const WORKBOOK: &str = r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets><sheet name="data" sheetId="1" r:id="rId1"/><sheet name="zdroj" sheetId="2" r:id="rId2"/></sheets>
  <definedNames><definedName name="Vyska">data!$B$2:$B$23</definedName><definedName name="_xlnm.Print_Area" localSheetId="0">data!$A$1:$F$23</definedName></definedNames>
</workbook>"#;

    const WORKBOOK_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet2.xml"/>
</Relationships>"#;

    const SHEET1: &str = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheetData>
    <row r="1"><c r="A1" s="1" t="s"><v>0</v></c></row>
    <row r="2"><c r="A2"><v>150</v></c><c r="B2"><f>A2/Vyska</f><v>0.5</v></c></row>
  </sheetData>
  <drawing r:id="rId1"/>
</worksheet>"#;

    const SHEET1_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing" Target="../drawings/drawing1.xml"/>
</Relationships>"#;

    const DRAWING: &str = r#"<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <xdr:twoCellAnchor><xdr:graphicFrame><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart"><c:chart r:id="rId1"/></a:graphicData></a:graphic></xdr:graphicFrame></xdr:twoCellAnchor>
</xdr:wsDr>"#;

    const DRAWING_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart" Target="../charts/chart1.xml"/>
</Relationships>"#;

    const CHART: &str = r#"<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart"><c:chart><c:plotArea><c:pieChart><c:ser><c:idx val="0"/></c:ser></c:pieChart></c:plotArea></c:chart></c:chartSpace>"#;

    const STYLES: &str = r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <fonts count="2"><font/><font><b/></font></fonts>
  <cellXfs count="2"><xf numFmtId="0" fontId="0"/><xf numFmtId="2" fontId="1"><alignment horizontal="center"/></xf></cellXfs>
</styleSheet>"#;

    fn workbook() -> ExcelDocument {
        let bytes = build_zip(&[
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
            ("xl/worksheets/sheet1.xml", SHEET1),
            ("xl/worksheets/_rels/sheet1.xml.rels", SHEET1_RELS),
            (
                "xl/worksheets/sheet2.xml",
                r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData/></worksheet>"#,
            ),
            ("xl/drawings/drawing1.xml", DRAWING),
            ("xl/drawings/_rels/drawing1.xml.rels", DRAWING_RELS),
            ("xl/charts/chart1.xml", CHART),
            ("xl/styles.xml", STYLES),
            (
                "xl/sharedStrings.xml",
                r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><si><t>Výška</t></si></sst>"#,
            ),
        ]);
        ExcelDocument::from_reader(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn test_sheets_and_names() {
        let doc = workbook();
        assert_eq!(doc.sheet_names(), vec!["data", "zdroj"]);
        assert!(doc.defined_names().contains("VYSKA"));
        assert_eq!(doc.defined_names().len(), 1);
    }

    #[test]
    fn test_cells_and_styles() {
        let doc = workbook();
        assert_eq!(doc.cell_value("data", "A1").as_deref(), Some("Výška"));
        assert_eq!(doc.cell("data", "B2").unwrap().formula.as_deref(), Some("=A2/Vyska"));
        let header = doc.cell_style("data", "A1").unwrap();
        assert!(header.bold);
        assert_eq!(header.align_h.as_deref(), Some("center"));
        assert_eq!(header.number_format.as_deref(), Some("0.00"));
        assert!(!doc.cell_style("data", "A2").unwrap().bold);
        assert!(doc.cell_style("data", "Z99").is_none());
    }

    #[test]
    fn test_chart_through_drawing() {
        let doc = workbook();
        assert!(doc.has_chart("data"));
        assert_eq!(doc.chart_type("data"), Some("pie"));
        assert!(!doc.has_chart("zdroj"));
    }

    #[test]
    fn test_missing_workbook_part() {
        let bytes = build_zip(&[("xl/styles.xml", STYLES)]);
        assert!(matches!(
            ExcelDocument::from_reader(Cursor::new(bytes)),
            Err(Error::ComponentNotFound(_))
        ));
    }
}
