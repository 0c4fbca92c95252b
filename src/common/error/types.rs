//! Unified error type for docgrade.
//!
//! Every adapter, the assignment loader and the configuration layer report
//! failures through this single enum so callers can use `?` end to end.
use thiserror::Error;

/// Main error type for docgrade operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Corrupted or malformed package content
    #[error("Corrupted file: {0}")]
    CorruptedFile(String),

    /// Required part not found in the package
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    XmlError(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// Assignment file could not be read or is malformed
    #[error("Assignment error: {0}")]
    Assignment(String),

    /// Grading configuration could not be read or is malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unsupported document kind
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for docgrade operations.
pub type Result<T> = std::result::Result<T, Error>;
