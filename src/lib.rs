//! Open Schemas
//!
//! Typed data-shape contracts for the OpenAI, Anthropic, Google AI and Ollama
//! APIs, each expressed as:
//!
//! - plain `serde` types in [`schemas`], with `validator` constraints;
//! - a schema IR catalog per provider in [`catalog`], validated dynamically
//!   by [`ir`] and lowered to JSON Schema / OpenAPI by [`emit`].
//!
//! [`contract`] ties each typed schema to its catalog definition.

pub mod catalog;
pub mod config;
pub mod contract;
pub mod emit;
pub mod error;
pub mod ir;
pub mod logging;
pub mod schemas;

// Re-export commonly used types
pub use catalog::Provider;
pub use config::Settings;
pub use contract::{check, parse, parse_str, Contract};
pub use error::{Result, SchemaError, ValidationReport};
pub use ir::Catalog;
