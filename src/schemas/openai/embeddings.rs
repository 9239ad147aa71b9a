//! OpenAI Embeddings API schemas

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::ListTag;

literal!(EmbeddingTag = "embedding");

/// Text or token input to embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    Text(String),
    TextArray(Vec<String>),
    Tokens(Vec<u32>),
    TokenArrays(Vec<Vec<u32>>),
}

impl EmbeddingInput {
    pub fn is_empty(&self) -> bool {
        match self {
            EmbeddingInput::Text(s) => s.is_empty(),
            EmbeddingInput::TextArray(v) => v.is_empty(),
            EmbeddingInput::Tokens(v) => v.is_empty(),
            EmbeddingInput::TokenArrays(v) => v.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingFormat {
    #[default]
    Float,
    Base64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateEmbeddingRequest {
    #[validate(custom(function = "validate_input"))]
    pub input: EmbeddingInput,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding_format: Option<EncodingFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub dimensions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl CreateEmbeddingRequest {
    pub fn new(model: impl Into<String>, input: EmbeddingInput) -> Self {
        Self {
            input,
            model: model.into(),
            encoding_format: None,
            dimensions: None,
            user: None,
        }
    }
}

fn validate_input(input: &EmbeddingInput) -> Result<(), ValidationError> {
    if input.is_empty() {
        return Err(ValidationError::new("embedding input cannot be empty"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Embedding {
    pub index: u32,
    pub embedding: Vec<f64>,
    #[serde(default)]
    pub object: EmbeddingTag,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingUsage {
    pub prompt_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateEmbeddingResponse {
    pub data: Vec<Embedding>,
    pub model: String,
    #[serde(default)]
    pub object: ListTag,
    pub usage: EmbeddingUsage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_input_forms() {
        let cases = [
            (json!("hello"), "text"),
            (json!(["a", "b"]), "text array"),
            (json!([1, 2, 3]), "tokens"),
            (json!([[1, 2], [3]]), "token arrays"),
        ];
        for (input, label) in cases {
            let request: CreateEmbeddingRequest =
                serde_json::from_value(json!({"input": input, "model": "text-embedding-3-small"}))
                    .unwrap_or_else(|e| panic!("{label}: {e}"));
            assert!(request.validate().is_ok(), "{label}");
        }
    }

    #[test]
    fn test_empty_input_rejected() {
        let request = CreateEmbeddingRequest::new("m", EmbeddingInput::TextArray(vec![]));
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_response() {
        let response: CreateEmbeddingResponse = serde_json::from_value(json!({
            "object": "list",
            "data": [{"object": "embedding", "embedding": [0.0023, -0.0093], "index": 0}],
            "model": "text-embedding-ada-002",
            "usage": {"prompt_tokens": 8, "total_tokens": 8}
        }))
        .unwrap();
        assert_eq!(response.data[0].embedding.len(), 2);
        assert_eq!(response.object, ListTag::Value);
    }
}
