//! Relationship-related objects for OPC packages.
//!
//! A `.rels` part maps relationship ids (`rId7`) used inside a source part to
//! target parts. Adapters follow them to reach headers, footers, worksheets,
//! drawings and charts.

use crate::common::Result;
use crate::common::package::Package;
use crate::common::xml::Element;
use crate::ooxml::namespaces::PKG_REL;
use crate::ooxml::opc::packuri::PackURI;
use std::collections::HashMap;
use std::io::{Read, Seek};
use tracing::debug;

/// A single relationship from a source part to a target.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,

    /// Relationship type URI
    reltype: String,

    /// Target reference - either a part URI or external URL
    target_ref: String,

    /// Base URI for resolving relative references
    base_uri: String,

    /// Whether this is an external relationship
    is_external: bool,
}

impl Relationship {
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }

    /// Get the absolute target partname. `None` for external relationships.
    pub fn target_partname(&self) -> Option<PackURI> {
        if self.is_external {
            return None;
        }
        PackURI::from_rel_ref(&self.base_uri, &self.target_ref).ok()
    }
}

/// Collection of relationships from a single source part.
#[derive(Debug, Default)]
pub struct Relationships {
    /// Map of relationship ID to Relationship
    rels: HashMap<String, Relationship>,
}

impl Relationships {
    /// Load the relationships of `source`. A missing `.rels` part yields an
    /// empty collection.
    pub fn load<R: Read + Seek>(package: &Package<R>, source: &PackURI) -> Result<Self> {
        let rels_uri = source.rels_uri()?;
        match package.optional_xml_part(rels_uri.membername())? {
            Some(root) => Ok(Self::from_xml(&root, source.base_uri())),
            None => {
                debug!(part = %source, "no relationships part");
                Ok(Self::default())
            },
        }
    }

    /// Build from a parsed `<Relationships>` element.
    pub fn from_xml(root: &Element, base_uri: &str) -> Self {
        let rels = root
            .children_named(PKG_REL, "Relationship")
            .filter_map(|rel| {
                let r_id = rel.attr("", "Id")?.to_string();
                let relationship = Relationship {
                    r_id: r_id.clone(),
                    reltype: rel.attr("", "Type").unwrap_or_default().to_string(),
                    target_ref: rel.attr("", "Target")?.to_string(),
                    base_uri: base_uri.to_string(),
                    is_external: rel.attr("", "TargetMode") == Some("External"),
                };
                Some((r_id, relationship))
            })
            .collect();
        Self { rels }
    }

    /// Get a relationship by its ID.
    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.get(r_id)
    }

    /// Resolve a relationship ID straight to its target part.
    pub fn target_of(&self, r_id: &str) -> Option<PackURI> {
        self.get(r_id).and_then(Relationship::target_partname)
    }

    /// All relationships of a type, ordered by id.
    pub fn of_type(&self, reltype: &str) -> Vec<&Relationship> {
        let mut matching: Vec<&Relationship> = self
            .rels
            .values()
            .filter(|rel| rel.reltype() == reltype)
            .collect();
        matching.sort_by(|a, b| a.r_id().cmp(b.r_id()));
        matching
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }
}
