//! Error handling module
//!
//! Library-wide error type plus the structured validation report produced by
//! the schema IR validator.

pub mod report;
pub mod types;

pub use report::{Constraint, FieldPath, PathSegment, ValidationReport, Violation};
pub use types::{Result, SchemaError};
