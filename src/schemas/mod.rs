//! Schema module
//!
//! Typed request/response/event contracts for each provider. Field names and
//! literal values match the provider APIs exactly; constraints are carried by
//! `validator` derives and mirrored by the IR catalogs in [`crate::catalog`].

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::ir::StringFormat;

/// Declares a single-valued string enum for literal tag properties such as
/// `"object": "chat.completion"`. The value is also the `Default`.
macro_rules! literal {
    ($(#[$meta:meta])* $name:ident = $value:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            #[default]
            #[serde(rename = $value)]
            Value,
        }

        impl $name {
            pub const fn as_str(&self) -> &'static str {
                $value
            }
        }
    };
}

pub mod anthropic;
pub mod googleai;
pub mod ollama;
pub mod openai;

/// Allowed characters for function and tool names.
pub(crate) static FUNCTION_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]+$").expect("function name pattern is valid")
});

/// Maximum length of a function name.
pub const FUNCTION_NAME_MAX_LENGTH: usize = 64;

/// Metadata limits shared by the Assistants API objects.
pub const METADATA_MAX_PAIRS: usize = 16;
pub const METADATA_KEY_MAX_LENGTH: usize = 64;
pub const METADATA_VALUE_MAX_LENGTH: usize = 512;

/// Deserializes `null` like an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Converts a whole-valued JSON number such as `1024.0` to `u32`.
pub(crate) fn whole_u32(value: f64) -> Option<u32> {
    (value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value)).then(|| value as u32)
}

// ============================================================================
// Validation Functions
// ============================================================================

fn nested_error(errors: ValidationErrors) -> ValidationError {
    let mut error = ValidationError::new("nested");
    error.message = Some(Cow::Owned(errors.to_string()));
    error
}

/// Validates a nested value that is not covered by a derive (enums).
pub(crate) fn validate_one<T: Validate>(value: &T) -> Result<(), ValidationError> {
    value.validate().map_err(nested_error)
}

/// Validates every element of a nested list.
pub(crate) fn validate_each<T: Validate>(items: &[T]) -> Result<(), ValidationError> {
    items.iter().try_for_each(validate_one)
}

/// Validates function names: `[a-zA-Z0-9_-]`, at most 64 characters.
pub(crate) fn validate_function_name(name: &str) -> Result<(), ValidationError> {
    if name.chars().count() > FUNCTION_NAME_MAX_LENGTH {
        return Err(ValidationError::new("function name must be at most 64 characters"));
    }
    if !FUNCTION_NAME_PATTERN.is_match(name) {
        return Err(ValidationError::new(
            "function name may only contain a-z, A-Z, 0-9, underscores and dashes",
        ));
    }
    Ok(())
}

/// Validates an absolute URI.
pub(crate) fn validate_uri(uri: &str) -> Result<(), ValidationError> {
    if StringFormat::Uri.matches(uri) {
        Ok(())
    } else {
        Err(ValidationError::new("uri"))
    }
}

/// Validates an RFC 3339 timestamp.
pub(crate) fn validate_date_time(timestamp: &str) -> Result<(), ValidationError> {
    if StringFormat::DateTime.matches(timestamp) {
        Ok(())
    } else {
        Err(ValidationError::new("date-time"))
    }
}

/// Validates Assistants API metadata: at most 16 pairs, keys up to 64 and
/// values up to 512 characters.
pub(crate) fn validate_metadata(metadata: &HashMap<String, String>) -> Result<(), ValidationError> {
    if metadata.len() > METADATA_MAX_PAIRS {
        return Err(ValidationError::new("metadata may contain at most 16 pairs"));
    }
    for (key, value) in metadata {
        if key.chars().count() > METADATA_KEY_MAX_LENGTH {
            return Err(ValidationError::new("metadata keys must be at most 64 characters"));
        }
        if value.chars().count() > METADATA_VALUE_MAX_LENGTH {
            return Err(ValidationError::new("metadata values must be at most 512 characters"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    literal!(
        /// Test literal.
        ChatCompletionTag = "chat.completion"
    );

    #[test]
    fn test_literal_serialization() {
        assert_eq!(
            serde_json::to_string(&ChatCompletionTag::Value).unwrap(),
            r#""chat.completion""#
        );
        let parsed: ChatCompletionTag = serde_json::from_str(r#""chat.completion""#).unwrap();
        assert_eq!(parsed, ChatCompletionTag::default());
        assert!(serde_json::from_str::<ChatCompletionTag>(r#""chat.completion.chunk""#).is_err());
        assert_eq!(ChatCompletionTag::Value.as_str(), "chat.completion");
    }

    #[test]
    fn test_function_name_validation() {
        assert!(validate_function_name("get_weather-v2").is_ok());
        assert!(validate_function_name("get weather").is_err());
        assert!(validate_function_name(&"a".repeat(65)).is_err());
        assert!(validate_function_name(&"a".repeat(64)).is_ok());
    }

    #[test]
    fn test_metadata_validation() {
        let mut metadata = HashMap::new();
        metadata.insert("user".to_string(), "42".to_string());
        assert!(validate_metadata(&metadata).is_ok());

        metadata.insert("k".repeat(65), "v".to_string());
        assert!(validate_metadata(&metadata).is_err());

        let too_many: HashMap<_, _> = (0..17).map(|i| (i.to_string(), String::new())).collect();
        assert!(validate_metadata(&too_many).is_err());
    }

    #[test]
    fn test_format_validation() {
        assert!(validate_uri("https://ai.google.dev/terms").is_ok());
        assert!(validate_uri("no scheme").is_err());
        assert!(validate_date_time("2023-08-04T08:52:19.385406455-07:00").is_ok());
        assert!(validate_date_time("2023-08-04 08:52").is_err());
    }
}
