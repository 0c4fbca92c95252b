//! Provides the PackURI value type for part names inside an OOXML package.

use crate::common::{Error, Result};

/// A part name within an OPC package.
///
/// A PackURI always begins with a forward slash and uses forward slashes as
/// separators. Relationship targets are relative to the directory of their
/// source part and get resolved into PackURIs before the part is read from
/// the archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackURI {
    /// The full pack URI string (e.g., "/word/document.xml")
    uri: String,
}

impl PackURI {
    /// Create a new PackURI. The URI must begin with a forward slash.
    pub fn new<S: Into<String>>(uri: S) -> Result<Self> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(Error::InvalidFormat(format!(
                "PackURI must begin with slash, got '{}'",
                uri
            )));
        }
        Ok(PackURI { uri })
    }

    /// Resolve a relative reference (like "../media/image1.png") against a
    /// base URI (like "/word") into an absolute PackURI.
    ///
    /// An absolute reference ("/xl/worksheets/sheet1.xml") is taken as is.
    pub fn from_rel_ref(base_uri: &str, relative_ref: &str) -> Result<Self> {
        let joined = if relative_ref.starts_with('/') {
            relative_ref.to_string()
        } else {
            Self::join_paths(base_uri, relative_ref)
        };
        Self::new(Self::normalize_path(&joined))
    }

    /// Get the base URI (directory portion) of this PackURI.
    ///
    /// For example, "/xl/worksheets" for "/xl/worksheets/sheet1.xml".
    pub fn base_uri(&self) -> &str {
        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    /// Get the filename portion, e.g. "sheet1.xml".
    pub fn filename(&self) -> &str {
        self.uri
            .rfind('/')
            .map_or("", |pos| &self.uri[pos + 1..])
    }

    /// Get the membername (URI with leading slash stripped), the name of the
    /// part inside the ZIP archive.
    pub fn membername(&self) -> &str {
        &self.uri[1..]
    }

    /// Get the PackURI of the .rels part belonging to this part.
    ///
    /// For example, "/word/_rels/document.xml.rels" for "/word/document.xml".
    pub fn rels_uri(&self) -> Result<PackURI> {
        let rels_filename = format!("{}.rels", self.filename());
        let base_uri = self.base_uri();
        if base_uri == "/" {
            Self::new(format!("/_rels/{}", rels_filename))
        } else {
            Self::new(format!("{}/_rels/{}", base_uri, rels_filename))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.uri
    }

    fn join_paths(base: &str, rel: &str) -> String {
        if base.ends_with('/') {
            format!("{}{}", base, rel)
        } else {
            format!("{}/{}", base, rel)
        }
    }

    /// Resolve "." and ".." segments.
    fn normalize_path(path: &str) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for part in path.split('/') {
            match part {
                "" | "." => {},
                ".." => {
                    parts.pop();
                },
                _ => parts.push(part),
            }
        }
        format!("/{}", parts.join("/"))
    }
}

impl std::fmt::Display for PackURI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uri)
    }
}

impl AsRef<str> for PackURI {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}
