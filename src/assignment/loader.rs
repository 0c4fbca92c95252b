use super::{SheetAssignment, TextAssignment};
use crate::common::{DocumentKind, Error, Result};
use std::path::Path;
use tracing::debug;

/// An assignment of either document family.
#[derive(Debug, Clone)]
pub enum Assignment {
    Text(TextAssignment),
    Sheet(SheetAssignment),
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| Error::Assignment(format!("{}: {}", path.display(), e)))
}

/// Load a text-document assignment from a JSON file.
pub fn load_text_assignment<P: AsRef<Path>>(path: P) -> Result<TextAssignment> {
    let path = path.as_ref();
    let assignment = TextAssignment::from_json(&read(path)?)?;
    debug!(
        path = %path.display(),
        styles = assignment.styles.len(),
        headlines = assignment.headlines.len(),
        objects = assignment.objects.len(),
        "loaded text assignment"
    );
    Ok(assignment)
}

/// Load a workbook assignment from a JSON file.
pub fn load_sheet_assignment<P: AsRef<Path>>(path: P) -> Result<SheetAssignment> {
    let path = path.as_ref();
    let assignment = SheetAssignment::from_json(&read(path)?)?;
    debug!(
        path = %path.display(),
        cells = assignment.cells.len(),
        borders = assignment.borders.len(),
        chart = assignment.chart.is_some(),
        "loaded sheet assignment"
    );
    Ok(assignment)
}

/// Load the assignment matching a document family.
pub fn load_assignment<P: AsRef<Path>>(path: P, kind: DocumentKind) -> Result<Assignment> {
    match kind {
        DocumentKind::Text => load_text_assignment(path).map(Assignment::Text),
        DocumentKind::Spreadsheet => load_sheet_assignment(path).map(Assignment::Sheet),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zadani.json");
        std::fs::write(&path, r#"{"cells": {"B2": {"expression": "=A2*2"}}}"#).unwrap();

        match load_assignment(&path, DocumentKind::Spreadsheet).unwrap() {
            Assignment::Sheet(a) => assert_eq!(a.cells.len(), 1),
            Assignment::Text(_) => panic!("expected a sheet assignment"),
        }
    }

    #[test]
    fn test_missing_file_is_assignment_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_text_assignment(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::Assignment(_)));
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"styles\": [").unwrap();
        assert!(matches!(load_text_assignment(&path), Err(Error::Assignment(_))));
    }
}
