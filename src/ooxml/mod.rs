//! Office Open XML adapters.
//!
//! Both adapters sit on the same two layers: the Open Packaging Conventions
//! (`opc`) for part names and relationships, and the namespace constants in
//! [`namespaces`]. Parts are parsed into [`crate::common::xml::Element`]
//! trees once at load time.
//!
//! - [`docx`]: Word documents
//! - [`xlsx`]: Excel workbooks

pub mod docx;
pub mod namespaces;
pub mod opc;
pub mod xlsx;

pub use opc::PackURI;
