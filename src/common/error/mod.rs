//! Unified error types for docgrade.
//!
//! This module provides a single error type shared by the OOXML and ODF
//! adapters, the assignment loader and the grading configuration.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
