//! Schema emitters
//!
//! Lower a provider [`Catalog`] into documents other tooling understands:
//!
//! - [`JsonSchemaEmitter`]: JSON Schema draft 2020-12 with every definition
//!   under `$defs`.
//! - [`OpenApiEmitter`]: OpenAPI 3.0.3 `components.schemas`.
//!
//! Both keep every IR constraint. Keywords a target lacks are carried as
//! `x-` vendor extensions.
//!
//! # Usage
//!
//! ```
//! use open_schemas::catalog::Provider;
//! use open_schemas::emit::{Emitter, JsonSchemaEmitter};
//!
//! let document = JsonSchemaEmitter::new()
//!     .emit(Provider::Anthropic.catalog())
//!     .unwrap();
//! assert!(document["$defs"]["CreateMessageRequest"].is_object());
//! ```

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SchemaError};
use crate::ir::Catalog;

pub mod json_schema;
pub mod openapi;
pub mod writer;

pub use json_schema::JsonSchemaEmitter;
pub use openapi::OpenApiEmitter;
pub use writer::write_catalogs;

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    #[value(name = "json-schema", alias = "jsonschema")]
    JsonSchema,
    #[value(name = "openapi")]
    OpenApi,
}

impl Target {
    pub const ALL: [Target; 2] = [Target::JsonSchema, Target::OpenApi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::JsonSchema => "json-schema",
            Target::OpenApi => "openapi",
        }
    }

    pub fn emitter(&self) -> Box<dyn Emitter> {
        match self {
            Target::JsonSchema => Box::new(JsonSchemaEmitter::new()),
            Target::OpenApi => Box::new(OpenApiEmitter::new()),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json-schema" | "jsonschema" => Ok(Target::JsonSchema),
            "openapi" => Ok(Target::OpenApi),
            _ => Err(SchemaError::UnknownTarget(s.to_string())),
        }
    }
}

/// Translates a catalog into one target format.
pub trait Emitter {
    fn target(&self) -> Target;

    /// The whole catalog as one document.
    fn emit(&self, catalog: &Catalog) -> Result<Value>;

    /// A single named definition.
    fn emit_definition(&self, catalog: &Catalog, name: &str) -> Result<Value>;

    fn file_extension(&self) -> &'static str {
        "json"
    }
}

/// Numeric bound as it should appear in a document: whole numbers without a
/// fractional part.
pub(crate) fn bound(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}
