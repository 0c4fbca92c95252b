//! Resolved style records and their comparison.
//!
//! Adapters produce a [`StyleSpec`] per queried style; assignments carry a
//! partial [`StyleSpec`] per expected style; [`StyleSpec::diff`] reports the
//! differences as stable, human-readable lines.

pub mod diff;
pub mod spec;

pub use diff::{DiffOptions, SPACE_TOLERANCE, TAB_TOLERANCE};
pub use spec::{StyleSpec, TabStop, TabStops};
