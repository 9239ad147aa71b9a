//! OpenAI Models API schemas

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{ListResponse, TrueTag};

literal!(ModelTag = "model");

fn default_owner() -> String {
    "openai".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ModelObject {
    pub id: String,
    /// Unix timestamp in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(default)]
    pub object: ModelTag,
    #[serde(default = "default_owner")]
    pub owned_by: String,
}

impl ModelObject {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created: None,
            object: ModelTag::Value,
            owned_by: default_owner(),
        }
    }

    pub fn with_owner(mut self, owned_by: impl Into<String>) -> Self {
        self.owned_by = owned_by.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DeleteModelResponse {
    pub id: String,
    #[serde(default)]
    pub deleted: TrueTag,
    #[serde(default)]
    pub object: ModelTag,
}

pub type ListModelsResponse = ListResponse<ModelObject>;
