//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert errors raised by
//! the ZIP, XML and JSON layers into the unified Error type.

use super::types::Error;

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::FileNotFound => {
                Error::ComponentNotFound("File not found in archive".to_string())
            },
            other => Error::ZipError(other.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlError(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlError(format!("Invalid attribute: {}", err))
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::XmlError(format!("Invalid UTF-8: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Assignment(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_not_found_maps_to_component() {
        let err: Error = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(err, Error::ComponentNotFound(_)));
    }

    #[test]
    fn test_json_error_maps_to_assignment() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse.into();
        assert!(matches!(err, Error::Assignment(_)));
        assert!(err.to_string().starts_with("Assignment error:"));
    }
}
