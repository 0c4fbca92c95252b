//! Document format detection.
//!
//! The extension decides first. Files with an unknown extension are sniffed by
//! their package layout: the ODF `mimetype` entry or the OOXML main part.

use crate::common::package::Package;
use crate::common::{Error, Result};
use phf::{Map, phf_map};
use std::io::{Read, Seek};
use std::path::Path;

/// Document formats the grader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// Word (.docx)
    Docx,
    /// Excel (.xlsx)
    Xlsx,
    /// Writer (.odt)
    Odt,
    /// Calc (.ods)
    Ods,
}

/// Document family: decides which check catalog applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Text,
    Spreadsheet,
}

static EXTENSIONS: Map<&'static str, DocumentFormat> = phf_map! {
    "docx" => DocumentFormat::Docx,
    "docm" => DocumentFormat::Docx,
    "xlsx" => DocumentFormat::Xlsx,
    "xlsm" => DocumentFormat::Xlsx,
    "odt" => DocumentFormat::Odt,
    "ott" => DocumentFormat::Odt,
    "ods" => DocumentFormat::Ods,
    "ots" => DocumentFormat::Ods,
};

static ODF_MIMETYPES: Map<&'static str, DocumentFormat> = phf_map! {
    "application/vnd.oasis.opendocument.text" => DocumentFormat::Odt,
    "application/vnd.oasis.opendocument.text-template" => DocumentFormat::Odt,
    "application/vnd.oasis.opendocument.spreadsheet" => DocumentFormat::Ods,
    "application/vnd.oasis.opendocument.spreadsheet-template" => DocumentFormat::Ods,
};

impl DocumentFormat {
    /// Look up a format by file extension (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use docgrade::common::DocumentFormat;
    /// assert_eq!(DocumentFormat::from_extension("DOCX"), Some(DocumentFormat::Docx));
    /// assert_eq!(DocumentFormat::from_extension("pdf"), None);
    /// ```
    pub fn from_extension(ext: &str) -> Option<Self> {
        EXTENSIONS.get(ext.to_ascii_lowercase().as_str()).copied()
    }

    /// Detect from a path, sniffing the package when the extension is unknown.
    pub fn detect<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(format) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
        {
            return Ok(format);
        }
        let package = Package::open(path)?;
        Self::sniff(&package).ok_or_else(|| {
            Error::Unsupported(format!("unrecognized document: {}", path.display()))
        })
    }

    /// Identify a package by its contents.
    pub fn sniff<R: Read + Seek>(package: &Package<R>) -> Option<Self> {
        if let Ok(bytes) = package.get_file("mimetype") {
            let mimetype = String::from_utf8_lossy(&bytes);
            return ODF_MIMETYPES.get(mimetype.trim()).copied();
        }
        if package.has_file("word/document.xml") {
            Some(Self::Docx)
        } else if package.has_file("xl/workbook.xml") {
            Some(Self::Xlsx)
        } else {
            None
        }
    }

    pub fn kind(self) -> DocumentKind {
        match self {
            Self::Docx | Self::Odt => DocumentKind::Text,
            Self::Xlsx | Self::Ods => DocumentKind::Spreadsheet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::package::test_support::build_zip;
    use std::io::Cursor;

    #[test]
    fn test_extension_lookup() {
        assert_eq!(DocumentFormat::from_extension("ods"), Some(DocumentFormat::Ods));
        assert_eq!(DocumentFormat::from_extension("Odt"), Some(DocumentFormat::Odt));
        assert_eq!(DocumentFormat::Xlsx.kind(), DocumentKind::Spreadsheet);
        assert_eq!(DocumentFormat::Odt.kind(), DocumentKind::Text);
    }

    #[test]
    fn test_sniff_by_contents() {
        let odf = build_zip(&[("mimetype", "application/vnd.oasis.opendocument.spreadsheet")]);
        let package = Package::from_reader(Cursor::new(odf)).unwrap();
        assert_eq!(DocumentFormat::sniff(&package), Some(DocumentFormat::Ods));

        let docx = build_zip(&[("word/document.xml", "<d/>")]);
        let package = Package::from_reader(Cursor::new(docx)).unwrap();
        assert_eq!(DocumentFormat::sniff(&package), Some(DocumentFormat::Docx));
    }

    #[test]
    fn test_detect_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("submission.bin");
        std::fs::write(&path, build_zip(&[("xl/workbook.xml", "<w/>")])).unwrap();
        assert_eq!(DocumentFormat::detect(&path).unwrap(), DocumentFormat::Xlsx);
    }
}
