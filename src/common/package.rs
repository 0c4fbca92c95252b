//! ZIP package handling shared by OOXML and ODF documents.
//!
//! Both families are ZIP archives of XML parts. The package only reads:
//! adapters pull the parts they need during load and keep the parsed trees.

use crate::common::xml::Element;
use crate::common::{Error, Result};
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::debug;

/// An office package (ZIP file containing XML parts)
pub struct Package<R> {
    archive: RefCell<zip::ZipArchive<R>>,
}

impl Package<BufReader<File>> {
    /// Open a package from a file on disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> Package<R> {
    /// Open a package from a reader
    pub fn from_reader(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader)
            .map_err(|e| Error::InvalidFormat(format!("Invalid ZIP archive: {}", e)))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Get a file from the package by path
    pub fn get_file(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::ComponentNotFound(path.to_string()))?;

        let mut content = Vec::new();
        file.read_to_end(&mut content)?;
        Ok(content)
    }

    /// Check if a file exists in the package
    pub fn has_file(&self, path: &str) -> bool {
        self.archive.borrow_mut().by_name(path).is_ok()
    }

    /// List all files in the package
    pub fn files(&self) -> Vec<String> {
        self.archive
            .borrow()
            .file_names()
            .map(str::to_string)
            .collect()
    }

    /// Parse a required XML part.
    pub fn xml_part(&self, path: &str) -> Result<Element> {
        let bytes = self.get_file(path)?;
        Element::parse(&bytes)
            .map_err(|e| Error::CorruptedFile(format!("{}: {}", path, e)))
    }

    /// Parse an optional XML part. A missing part yields `None`; a present
    /// but malformed part is still an error.
    pub fn optional_xml_part(&self, path: &str) -> Result<Option<Element>> {
        if !self.has_file(path) {
            debug!(part = path, "optional part not present");
            return Ok(None);
        }
        self.xml_part(path).map(Some)
    }
}
