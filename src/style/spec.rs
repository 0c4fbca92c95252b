//! The resolved formatting record.

use serde::Deserialize;
use std::fmt;

/// A single tab stop: alignment keyword and position in twips.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, f64)")]
pub struct TabStop {
    pub alignment: String,
    pub position: i64,
}

impl TabStop {
    pub fn new(alignment: impl Into<String>, position: i64) -> Self {
        Self {
            alignment: alignment.into(),
            position,
        }
    }
}

impl From<(String, f64)> for TabStop {
    fn from((alignment, position): (String, f64)) -> Self {
        Self {
            alignment,
            position: position.round() as i64,
        }
    }
}

impl fmt::Display for TabStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.alignment, self.position)
    }
}

pub type TabStops = Vec<TabStop>;

/// Resolved paragraph/character formatting of one style.
///
/// Every attribute is either a concrete value or `None`. Adapters produce
/// these after walking the inheritance chain; assignments deserialize into
/// the same type, where `None` means "no constraint".
///
/// Units: `size` in points, `line_height` as a line multiple, spacing,
/// indents and tab positions in twips.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleSpec {
    pub name: String,
    #[serde(alias = "type")]
    pub font: Option<String>,
    pub size: Option<f64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub all_caps: Option<bool>,
    pub color: Option<String>,
    pub alignment: Option<String>,
    pub line_height: Option<f64>,
    pub page_break_before: Option<bool>,
    pub is_numbered: Option<bool>,
    pub num_level: Option<u32>,
    pub based_on: Option<String>,
    pub space_before: Option<i64>,
    pub indent_left: Option<i64>,
    pub indent_right: Option<i64>,
    pub indent_first_line: Option<i64>,
    pub indent_hanging: Option<i64>,
    pub tabs: Option<TabStops>,
}

impl StyleSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Whether the spec sets any tab stop.
    pub fn has_tabs(&self) -> bool {
        self.tabs.as_ref().is_some_and(|t| !t.is_empty())
    }
}

/// Render an optional value the way discrepancy messages show it.
pub(crate) fn show<T: fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "none".to_string(),
    }
}

pub(crate) fn show_tabs(tabs: &Option<TabStops>) -> String {
    match tabs {
        Some(tabs) => {
            let items: Vec<String> = tabs.iter().map(ToString::to_string).collect();
            format!("[{}]", items.join(", "))
        },
        None => "none".to_string(),
    }
}
