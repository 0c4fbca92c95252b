//! XML namespaces and part names used by the ODF adapters.
//!
//! Element lookups in [`crate::common::xml::Element`] go by namespace URI, so
//! every URI the Writer and Calc adapters touch lives here.

/// Office namespace (`office:`)
pub const OFFICE: &str = "urn:oasis:names:tc:opendocument:xmlns:office:1.0";

/// Style namespace (`style:`)
pub const STYLE: &str = "urn:oasis:names:tc:opendocument:xmlns:style:1.0";

/// Text namespace (`text:`)
pub const TEXT: &str = "urn:oasis:names:tc:opendocument:xmlns:text:1.0";

/// Table namespace (`table:`)
pub const TABLE: &str = "urn:oasis:names:tc:opendocument:xmlns:table:1.0";

/// XSL-FO compatible namespace (`fo:`)
pub const FO: &str = "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0";

/// Data style namespace (`number:`)
pub const NUMBER: &str = "urn:oasis:names:tc:opendocument:xmlns:datastyle:1.0";

/// Chart namespace (`chart:`)
pub const CHART: &str = "urn:oasis:names:tc:opendocument:xmlns:chart:1.0";

/// Drawing namespace (`draw:`)
pub const DRAW: &str = "urn:oasis:names:tc:opendocument:xmlns:drawing:1.0";

/// 3D drawing namespace (`dr3d:`)
pub const DR3D: &str = "urn:oasis:names:tc:opendocument:xmlns:dr3d:1.0";

/// MathML, the root of formula objects (`math:`)
pub const MATH: &str = "http://www.w3.org/1998/Math/MathML";

/// XLink (`xlink:`), used by `draw:object/@xlink:href`
pub const XLINK: &str = "http://www.w3.org/1999/xlink";

/// SVG compatible namespace (`svg:`)
pub const SVG: &str = "urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0";

/// LibreOffice Calc extensions (`calcext:`)
pub const CALCEXT: &str = "urn:org:documentfoundation:names:experimental:calc:xmlns:calcext:1.0";

/// LibreOffice extensions (`loext:`)
pub const LOEXT: &str = "urn:org:documentfoundation:names:experimental:office:xmlns:loext:1.0";

/// Part names inside the package
pub mod part {
    pub const CONTENT: &str = "content.xml";
    pub const STYLES: &str = "styles.xml";
}
