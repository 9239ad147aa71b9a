//! Schema error types

use std::path::PathBuf;

use thiserror::Error;

use super::report::ValidationReport;
use crate::catalog::Provider;

/// Result alias used throughout the library.
pub type Result<T, E = SchemaError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Unknown provider: {0}. Expected one of: anthropic, openai, googleai, ollama")]
    UnknownProvider(String),

    #[error("Unknown emit target: {0}. Expected one of: json-schema, openapi")]
    UnknownTarget(String),

    #[error("Unknown schema `{name}` for provider {provider}")]
    UnknownSchema { provider: Provider, name: String },

    /// The payload does not conform to the schema IR definition.
    #[error("{0}")]
    Invalid(ValidationReport),

    /// A typed value failed its `validator` constraints.
    #[error("Constraint violation: {0}")]
    Constraint(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SchemaError {
    /// The validation report, if this error came from the schema IR validator.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            SchemaError::Invalid(report) => Some(report),
            _ => None,
        }
    }

    /// Whether the error means "value does not conform to schema", as opposed
    /// to a lookup or I/O failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SchemaError::Invalid(_) | SchemaError::Constraint(_) | SchemaError::Json(_)
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SchemaError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Constraint, FieldPath, Violation};

    #[test]
    fn test_unknown_schema_message() {
        let err = SchemaError::UnknownSchema {
            provider: Provider::OpenAi,
            name: "Nope".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown schema `Nope` for provider openai");
        assert!(!err.is_validation());
    }

    #[test]
    fn test_invalid_exposes_report() {
        let report = ValidationReport::new(
            "CreateMessageRequest",
            vec![Violation::new(FieldPath::root().key("model"), Constraint::Required)],
        );
        let err = SchemaError::Invalid(report);
        assert!(err.is_validation());
        assert_eq!(err.report().map(|r| r.len()), Some(1));
        assert!(err.to_string().contains("model"));
    }
}
