//! Shared infrastructure: errors, the ZIP package, the XML element tree and
//! unit conversions used by every format adapter.

pub mod error;
pub mod format;
pub mod package;
pub mod unit;
pub mod xml;

pub use error::{Error, Result};
pub use format::{DocumentFormat, DocumentKind};
pub use package::Package;
