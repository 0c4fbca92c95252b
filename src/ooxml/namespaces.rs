//! XML namespaces and relationship types used by the OOXML adapters.
//!
//! Element lookups in [`crate::common::xml::Element`] go by namespace URI, so
//! every URI the Word and Excel adapters touch lives here.

/// WordprocessingML main namespace (`w:`)
pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Office document relationships (`r:`), used for `r:id` and `r:embed`
pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Office Math (`m:`)
pub const M: &str = "http://schemas.openxmlformats.org/officeDocument/2006/math";

/// DrawingML main (`a:`)
pub const A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

/// DrawingML chart (`c:`)
pub const C: &str = "http://schemas.openxmlformats.org/drawingml/2006/chart";

/// Spreadsheet drawing anchors (`xdr:`)
pub const XDR: &str = "http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing";

/// SpreadsheetML main namespace
pub const SML: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// Package relationships (`.rels` parts)
pub const PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Relationship type URIs
pub mod reltype {
    pub const CHART: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart";
    pub const DRAWING: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing";
    pub const FOOTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
    pub const HEADER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
    pub const WORKSHEET: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
}

/// Main part names
pub mod part {
    pub const WORD_DOCUMENT: &str = "/word/document.xml";
    pub const WORD_STYLES: &str = "word/styles.xml";
    pub const WORD_NUMBERING: &str = "word/numbering.xml";
    pub const XL_WORKBOOK: &str = "/xl/workbook.xml";
    pub const XL_STYLES: &str = "xl/styles.xml";
    pub const XL_SHARED_STRINGS: &str = "xl/sharedStrings.xml";
}
