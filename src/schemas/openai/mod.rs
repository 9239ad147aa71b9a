//! OpenAI API schemas
//!
//! Chat completions, embeddings, models, files and the Assistants API, plus
//! the unified [`extra::AssistantResponse`].

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use validator::{Validate, ValidationErrors};

use crate::schemas::validate_each;

pub mod assistants;
pub mod chat;
pub mod embeddings;
pub mod extra;
pub mod files;
pub mod models;

pub use assistants::*;
pub use chat::*;
pub use embeddings::*;
pub use extra::*;
pub use files::*;
pub use models::*;

literal!(ListTag = "list");

/// The literal `true`, as carried by `deleted` in deletion responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TrueTag;

impl Serialize for TrueTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(true)
    }
}

impl<'de> Deserialize<'de> for TrueTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if bool::deserialize(deserializer)? {
            Ok(TrueTag)
        } else {
            Err(D::Error::custom("expected `true`"))
        }
    }
}

/// Paginated list envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub object: ListTag,
    pub data: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_id: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            object: ListTag::Value,
            data,
            first_id: None,
            last_id: None,
            has_more: false,
        }
    }
}

impl<T: Validate> Validate for ListResponse<T> {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(error) = validate_each(&self.data) {
            errors.add("data", error);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
