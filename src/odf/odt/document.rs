//! WriterDocument - a loaded .odt behind the [`TextDocument`] interface.

use super::body::{BodyReader, TocInfo};
use crate::common::{DocumentFormat, Error, Package, Result};
use crate::document::{
    Bibliography, Block, Heading, HeadingNumbering, ObjectKind, StyleInfo, TextDocument,
};
use crate::odf::namespaces::{CHART, MATH, OFFICE, part};
use crate::odf::styles::StyleTable;
use crate::style::StyleSpec;
use std::collections::HashMap;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::{debug, warn};

/// A Writer document, fully read at load time.
///
/// Writer has no section breaks in the Word sense, so
/// [`sections`](TextDocument::sections) is `None` and section checks skip.
///
/// # Examples
///
/// ```rust,no_run
/// use docgrade::document::TextDocument;
/// use docgrade::odf::odt::WriterDocument;
///
/// let doc = WriterDocument::open("thesis.odt")?;
/// if let Some(heading) = doc.heading_style(1) {
///     println!("Heading 1: {:?} {:?}pt", heading.font, heading.size);
/// }
/// # Ok::<(), docgrade::common::Error>(())
/// ```
pub struct WriterDocument {
    styles: StyleTable,
    blocks: Vec<Block>,
    headings: Vec<Heading>,
    bibliography: Bibliography,
    html_artifacts: bool,
    toc: Option<TocInfo>,
}

impl WriterDocument {
    /// Open a .odt file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let package = Package::open(path)?;
        Self::from_package(&package)
    }

    /// Load from any seekable reader holding a .odt archive.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let package = Package::from_reader(reader)?;
        Self::from_package(&package)
    }

    fn from_package<R: Read + Seek>(package: &Package<R>) -> Result<Self> {
        let content = package.xml_part(part::CONTENT)?;
        let styles_root = package.optional_xml_part(part::STYLES)?;
        let text = content
            .path(&[(OFFICE, "body"), (OFFICE, "text")])
            .ok_or_else(|| Error::CorruptedFile("content.xml has no office:text".to_string()))?;

        let styles = StyleTable::from_parts(&content, styles_root.as_ref());
        let objects = embedded_objects(package)?;
        let body = BodyReader::new(&styles, &objects).read(text);

        let headings: Vec<Heading> = body
            .blocks
            .iter()
            .filter_map(Block::as_paragraph)
            .filter(|p| p.has_text())
            .filter_map(|p| p.heading_level.map(|level| Heading::new(p.text.clone(), level)))
            .collect();

        debug!(
            styles = styles.len(),
            blocks = body.blocks.len(),
            headings = headings.len(),
            objects = objects.len(),
            "loaded writer document"
        );

        Ok(Self {
            styles,
            blocks: body.blocks,
            headings,
            bibliography: body.bibliography,
            html_artifacts: body.html_artifacts,
            toc: body.toc,
        })
    }

    /// The style table.
    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }
}

/// Kinds of the embedded objects (`Object 1/content.xml`), by directory.
fn embedded_objects<R: Read + Seek>(package: &Package<R>) -> Result<HashMap<String, ObjectKind>> {
    let mut objects = HashMap::new();
    for name in package.files() {
        let Some(dir) = name.strip_suffix("/content.xml") else {
            continue;
        };
        if dir.contains('/') {
            continue;
        }
        let root = match package.xml_part(&name) {
            Ok(root) => root,
            Err(e) => {
                warn!(part = %name, error = %e, "unreadable embedded object");
                continue;
            },
        };
        let kind = if root.is(MATH, "math") || root.contains(MATH, "math") {
            ObjectKind::Equation
        } else if root.contains(CHART, "chart") {
            ObjectKind::Chart
        } else {
            continue;
        };
        objects.insert(dir.to_string(), kind);
    }
    Ok(objects)
}

impl TextDocument for WriterDocument {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Odt
    }

    fn normal_style(&self) -> Option<StyleSpec> {
        self.styles
            .default_paragraph()
            .map(|s| self.styles.resolve(s, None))
    }

    fn heading_style(&self, level: u32) -> Option<StyleSpec> {
        self.styles
            .find(&format!("Heading {}", level))
            .map(|s| self.styles.resolve(s, Some("start")))
    }

    fn style_by_any_name(&self, names: &[&str], default_alignment: Option<&str>) -> Option<StyleSpec> {
        names
            .iter()
            .find_map(|name| self.styles.find(name))
            .map(|s| self.styles.resolve(s, default_alignment))
    }

    fn doc_default_font_size(&self) -> Option<f64> {
        self.styles.doc_default_size()
    }

    fn style_info(&self, name: &str) -> Option<StyleInfo> {
        self.styles.find(name).map(|s| self.styles.info(s))
    }

    fn heading_numbering(&self, level: u32) -> HeadingNumbering {
        self.styles.heading_numbering(level)
    }

    fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn headings(&self) -> &[Heading] {
        &self.headings
    }

    fn has_html_artifacts(&self) -> bool {
        self.html_artifacts
    }

    fn bibliography(&self) -> &Bibliography {
        &self.bibliography
    }

    fn has_toc(&self) -> bool {
        self.toc.is_some()
    }

    fn toc_levels(&self) -> Option<(u32, u32)> {
        self.toc.map(|toc| toc.levels)
    }

    fn toc_shows_numbers(&self) -> Option<bool> {
        self.toc.map(|toc| toc.shows_numbers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::package::test_support::build_zip;
    use std::io::Cursor;

    const NS: &str = r#"xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" xmlns:fo="urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0" xmlns:draw="urn:oasis:names:tc:opendocument:xmlns:drawing:1.0" xmlns:xlink="http://www.w3.org/1999/xlink" xmlns:loext="urn:org:documentfoundation:names:experimental:office:xmlns:loext:1.0""#;

    fn load() -> WriterDocument {
        let styles = format!(
            r#"<office:document-styles {NS}><office:styles>
  <style:default-style style:family="paragraph"><style:text-properties style:font-name="Liberation Serif" fo:font-size="12pt"/></style:default-style>
  <style:style style:name="Standard" style:family="paragraph"><style:paragraph-properties fo:text-align="justify"/></style:style>
  <style:style style:name="Heading_20_1" style:display-name="Heading 1" style:family="paragraph" style:parent-style-name="Standard" style:default-outline-level="1">
    <style:paragraph-properties fo:break-before="page"/>
    <style:text-properties fo:font-size="16pt" fo:font-weight="bold"/>
  </style:style>
  <style:style style:name="Heading_20_2" style:display-name="Heading 2" style:family="paragraph" style:parent-style-name="Standard" style:default-outline-level="2"/>
  <style:style style:name="Kod" style:display-name="Kód" style:family="paragraph" style:parent-style-name="Standard"/>
  <text:outline-style style:name="Outline">
    <text:outline-level-style text:level="1" style:num-format="1"/>
    <text:outline-level-style text:level="2" style:num-format="1" loext:num-list-format="%1%.%2%"/>
  </text:outline-style>
</office:styles></office:document-styles>"#
        );
        let content = format!(
            r#"<office:document-content {NS}><office:automatic-styles/><office:body><office:text>
  <text:p text:style-name="Standard">Titulní strana</text:p>
  <text:h text:style-name="Heading_20_1" text:outline-level="1">Úvod</text:h>
  <text:h text:style-name="Heading_20_2" text:outline-level="2">Cíl práce</text:h>
  <text:h text:style-name="Heading_20_1" text:outline-level="1"/>
  <text:p><draw:frame><draw:object xlink:href="./Object 1"/></draw:frame></text:p>
</office:text></office:body></office:document-content>"#
        );
        let object = r#"<math xmlns="http://www.w3.org/1998/Math/MathML"><mi>x</mi></math>"#;
        let bytes = build_zip(&[
            ("content.xml", content.as_str()),
            ("styles.xml", styles.as_str()),
            ("Object 1/content.xml", object),
        ]);
        WriterDocument::from_reader(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn test_styles_resolve() {
        let doc = load();
        let normal = doc.normal_style().unwrap();
        assert_eq!(normal.font.as_deref(), Some("Liberation Serif"));
        assert_eq!(normal.alignment.as_deref(), Some("justify"));

        let h1 = doc.heading_style(1).unwrap();
        assert_eq!(h1.size, Some(16.0));
        assert_eq!(h1.bold, Some(true));
        assert_eq!(h1.page_break_before, Some(true));
        // inherited from Standard
        assert_eq!(h1.alignment.as_deref(), Some("justify"));
        assert_eq!(h1.num_level, Some(0));
        assert!(doc.heading_style(3).is_none());

        assert_eq!(doc.doc_default_font_size(), Some(12.0));
        assert!(doc.style_exists("kód"));
        assert_eq!(doc.style_info("Kód").unwrap().parent.as_deref(), Some("Standard"));
        assert!(doc.sections().is_none());
    }

    #[test]
    fn test_headings_and_numbering() {
        let doc = load();
        assert_eq!(
            doc.headings(),
            &[Heading::new("Úvod", 1), Heading::new("Cíl práce", 2)]
        );
        let h2 = doc.heading_numbering(2);
        assert!(h2.numbered && h2.hierarchical);
        assert_eq!(h2.level, Some(1));
        assert_eq!(doc.heading_numbering(3), HeadingNumbering::default());
        assert!(doc.paragraphs()[1].page_break_before);
        assert!(!doc.has_toc());
        assert_eq!(doc.toc_levels(), None);
    }

    #[test]
    fn test_embedded_formula() {
        let doc = load();
        let last = doc.paragraphs().into_iter().last().unwrap();
        assert_eq!(last.objects, vec![ObjectKind::Equation]);
    }

    #[test]
    fn test_missing_content_part() {
        let bytes = build_zip(&[("styles.xml", "<a/>")]);
        assert!(matches!(
            WriterDocument::from_reader(Cursor::new(bytes)),
            Err(Error::ComponentNotFound(_))
        ));
    }
}
