//! Assignment for Word and Writer documents.

use super::NumberOrText;
use super::ordered;
use crate::common::{Error, Result};
use crate::document::ObjectKind;
use crate::style::StyleSpec;
use phf::{Set, phf_set};
use serde::{Deserialize, Deserializer};

/// Styles every document has, graded by their dedicated checks rather than
/// as custom styles. Lowercase.
static BUILTIN_STYLES: Set<&'static str> = phf_set! {
    "normal",
    "heading 1",
    "heading 2",
    "heading 3",
    "heading 4",
    "heading 5",
    "heading 6",
    "heading 7",
    "heading 8",
    "heading 9",
    "caption",
    "bibliography",
    "toc heading",
    "table of contents",
    "content heading",
};

/// Whether a style name belongs to the built-in set (case-insensitive).
pub fn is_builtin_style(name: &str) -> bool {
    BUILTIN_STYLES.contains(name.trim().to_lowercase().as_str())
}

/// A heading the document must contain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExpectedHeading {
    pub text: String,
    #[serde(deserialize_with = "level")]
    pub level: u32,
}

fn level<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    let value = NumberOrText::deserialize(deserializer)?;
    value
        .as_f64()
        .filter(|n| *n >= 0.0 && n.fract() == 0.0)
        .map(|n| n as u32)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid heading level {:?}", value)))
}

/// An embedded object the document must contain, with its caption text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExpectedObject {
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    #[serde(default)]
    pub caption: String,
}

/// One bibliography record. Its fields vary with the source type and are
/// kept as written.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct BibliographyEntry(pub serde_json::Value);

/// Expected state of a text document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TextAssignment {
    /// Expected styles in declaration order
    #[serde(deserialize_with = "ordered::deserialize")]
    pub styles: Vec<(String, StyleSpec)>,
    pub headlines: Vec<ExpectedHeading>,
    pub objects: Vec<ExpectedObject>,
    pub bibliography: Vec<BibliographyEntry>,
}

impl TextAssignment {
    /// Parse an assignment from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut assignment: Self = serde_json::from_str(json)?;
        for (name, spec) in &mut assignment.styles {
            spec.name = name.clone();
        }
        for heading in &mut assignment.headlines {
            heading.text = heading.text.trim().to_string();
        }
        if let Some(h) = assignment.headlines.iter().find(|h| h.level == 0) {
            return Err(Error::Assignment(format!("heading \"{}\" has level 0", h.text)));
        }
        Ok(assignment)
    }

    /// Expected style by its exact name.
    pub fn style(&self, name: &str) -> Option<&StyleSpec> {
        self.styles
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, spec)| spec)
    }

    /// Styles outside the built-in set, in declaration order.
    pub fn custom_styles(&self) -> impl Iterator<Item = &StyleSpec> {
        self.styles
            .iter()
            .filter(|(name, _)| !is_builtin_style(name))
            .map(|(_, spec)| spec)
    }

    /// Expected objects of one kind, in order.
    pub fn objects_of(&self, kind: ObjectKind) -> impl Iterator<Item = &ExpectedObject> {
        self.objects.iter().filter(move |o| o.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
        "styles": {
            "Normal": { "type": "Calibri", "size": 11 },
            "Kód": { "type": "Consolas", "basedOn": "Normal", "tabs": [["left", 567]] },
            "Heading 1": { "bold": true, "size": 16, "numLevel": 0 },
            "Citát": { "italic": true }
        },
        "headlines": [
            { "text": " Úvod ", "level": 1 },
            { "text": "Cíl práce", "level": "2" }
        ],
        "objects": [
            { "type": "image", "caption": "Logo fakulty" },
            { "type": "table", "caption": "Výsledky" }
        ],
        "bibliography": [ { "author": "Novák, J.", "year": 2020 } ]
    }"#;

    #[test]
    fn test_load_text_assignment() {
        let a = TextAssignment::from_json(JSON).unwrap();
        let names: Vec<&str> = a.styles.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["Normal", "Kód", "Heading 1", "Citát"]);
        assert_eq!(a.style("Kód").unwrap().name, "Kód");
        assert_eq!(a.style("Kód").unwrap().based_on.as_deref(), Some("Normal"));
        assert_eq!(a.headlines[0], ExpectedHeading { text: "Úvod".into(), level: 1 });
        assert_eq!(a.headlines[1].level, 2);
        assert_eq!(a.objects_of(ObjectKind::Image).count(), 1);
        assert_eq!(a.bibliography.len(), 1);
    }

    #[test]
    fn test_custom_styles_skip_builtins() {
        let a = TextAssignment::from_json(JSON).unwrap();
        let custom: Vec<&str> = a.custom_styles().map(|s| s.name.as_str()).collect();
        assert_eq!(custom, ["Kód", "Citát"]);
        assert!(is_builtin_style("TOC Heading"));
        assert!(!is_builtin_style("Kód"));
    }

    #[test]
    fn test_missing_sections_default() {
        let a = TextAssignment::from_json("{}").unwrap();
        assert!(a.styles.is_empty());
        assert!(a.headlines.is_empty());
    }

    #[test]
    fn test_malformed_assignment() {
        assert!(matches!(
            TextAssignment::from_json(r#"{"headlines": [{"text": "x", "level": "první"}]}"#),
            Err(Error::Assignment(_))
        ));
        assert!(matches!(
            TextAssignment::from_json(r#"{"objects": [{"type": "video"}]}"#),
            Err(Error::Assignment(_))
        ));
        assert!(matches!(
            TextAssignment::from_json(r#"{"headlines": [{"text": "x", "level": 0}]}"#),
            Err(Error::Assignment(_))
        ));
    }
}
