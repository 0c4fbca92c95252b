//! Numbering definitions (`word/numbering.xml`).
//!
//! A paragraph or style points at a numbering instance (`w:num`) by id and
//! at a list level by `w:ilvl`. The instance references an abstract
//! definition whose per-level number format and level text decide what the
//! reader actually sees in front of the heading.

use crate::common::xml::Element;
use crate::ooxml::namespaces::W;

/// Numbering definitions in a Word document.
///
/// Contains abstract numbering definitions and numbering instances.
#[derive(Debug, Clone, Default)]
pub struct Numbering {
    /// Abstract numbering definitions (templates)
    abstract_nums: Vec<AbstractNum>,
    /// Numbering instances (concrete uses)
    nums: Vec<Num>,
}

/// An abstract numbering definition (template).
#[derive(Debug, Clone)]
pub struct AbstractNum {
    /// Abstract numbering ID
    id: u32,
    /// Numbering type (e.g., "hybridMultilevel", "multilevel")
    num_type: Option<String>,
    levels: Vec<NumberingLevel>,
}

/// A numbering instance (concrete use of an abstract numbering).
#[derive(Debug, Clone)]
pub struct Num {
    /// Numbering ID
    id: u32,
    /// Reference to abstract numbering ID
    abstract_num_id: u32,
}

/// One list level of an abstract definition (`w:lvl`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingLevel {
    /// Zero-based level index
    pub ilvl: u32,
    /// `w:numFmt/@w:val`, e.g. "decimal" or "none"
    pub num_format: String,
    /// `w:lvlText/@w:val`, e.g. "%1.%2."
    pub level_text: String,
}

impl NumberingLevel {
    /// The level shows a visible number.
    pub fn is_numbered(&self) -> bool {
        self.num_format != "none" && !self.level_text.is_empty()
    }

    /// The level text repeats every ancestor placeholder, `%1` through
    /// `%level` where `level` is 1-based.
    pub fn is_hierarchical(&self, level: u32) -> bool {
        (1..=level).all(|n| self.level_text.contains(&format!("%{}", n)))
    }
}

impl Numbering {
    /// Create a new empty Numbering.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the definitions from a parsed `w:numbering` root.
    pub fn from_xml(root: &Element) -> Self {
        let abstract_nums = root
            .children_named(W, "abstractNum")
            .filter_map(|abs| {
                let id = abs.attr_parse(W, "abstractNumId")?;
                let levels = abs
                    .children_named(W, "lvl")
                    .filter_map(|lvl| {
                        Some(NumberingLevel {
                            ilvl: lvl.attr_parse(W, "ilvl")?,
                            num_format: child_val(lvl, "numFmt").unwrap_or_default(),
                            level_text: child_val(lvl, "lvlText").unwrap_or_default(),
                        })
                    })
                    .collect();
                Some(AbstractNum {
                    id,
                    num_type: child_val(abs, "multiLevelType"),
                    levels,
                })
            })
            .collect();

        let nums = root
            .children_named(W, "num")
            .filter_map(|num| {
                Some(Num {
                    id: num.attr_parse(W, "numId")?,
                    abstract_num_id: num
                        .child(W, "abstractNumId")?
                        .attr_parse(W, "val")?,
                })
            })
            .collect();

        Self {
            abstract_nums,
            nums,
        }
    }

    /// Get all abstract numbering definitions.
    #[inline]
    pub fn abstract_nums(&self) -> &[AbstractNum] {
        &self.abstract_nums
    }

    /// Get all numbering instances.
    #[inline]
    pub fn nums(&self) -> &[Num] {
        &self.nums
    }

    #[inline]
    pub fn num_count(&self) -> usize {
        self.nums.len()
    }

    /// Get an abstract numbering by ID.
    pub fn get_abstract_num(&self, id: u32) -> Option<&AbstractNum> {
        self.abstract_nums.iter().find(|a| a.id == id)
    }

    /// Get a numbering instance by ID.
    pub fn get_num(&self, id: u32) -> Option<&Num> {
        self.nums.iter().find(|n| n.id == id)
    }

    /// Follow `num` -> `abstractNum` -> `lvl[ilvl]`.
    pub fn level(&self, num_id: u32, ilvl: u32) -> Option<&NumberingLevel> {
        let num = self.get_num(num_id)?;
        self.get_abstract_num(num.abstract_num_id)?.level(ilvl)
    }
}

impl AbstractNum {
    /// Get the abstract numbering ID.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Get the numbering type.
    #[inline]
    pub fn num_type(&self) -> Option<&str> {
        self.num_type.as_deref()
    }

    pub fn level(&self, ilvl: u32) -> Option<&NumberingLevel> {
        self.levels.iter().find(|l| l.ilvl == ilvl)
    }
}

impl Num {
    /// Get the numbering ID.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Get the abstract numbering ID this references.
    #[inline]
    pub fn abstract_num_id(&self) -> u32 {
        self.abstract_num_id
    }
}

fn child_val(parent: &Element, local: &str) -> Option<String> {
    parent
        .child(W, local)
        .and_then(|e| e.attr(W, "val"))
        .map(str::to_string)
}
