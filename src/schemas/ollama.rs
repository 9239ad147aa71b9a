//! Ollama chat API schemas
//!
//! Shapes for `POST /api/chat`. Option defaults follow the modelfile
//! parameter reference.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{validate_date_time, validate_each, validate_one};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Base64-encoded images for multimodal models.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            images: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// Model parameters. Every field may be omitted or `null`; omitted fields
/// take the defaults shown by [`ChatOptions::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChatOptions {
    /// Mirostat sampling: 0 disabled, 1 Mirostat, 2 Mirostat 2.0.
    #[validate(range(min = 0, max = 2))]
    pub mirostat: Option<u8>,
    pub mirostat_eta: Option<f64>,
    pub mirostat_tau: Option<f64>,
    pub num_ctx: Option<u32>,
    /// Required for some models, for example it is 8 for llama2:70b.
    pub num_gqa: Option<u32>,
    pub num_gpu: Option<u32>,
    pub num_thread: Option<u32>,
    pub repeat_last_n: Option<i32>,
    pub repeat_penalty: Option<f64>,
    pub temperature: Option<f64>,
    pub seed: Option<i64>,
    pub stop: Option<String>,
    pub tfs_z: Option<f64>,
    pub num_predict: Option<i32>,
    pub top_k: Option<u32>,
    pub top_p: Option<f64>,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            mirostat: Some(0),
            mirostat_eta: Some(0.1),
            mirostat_tau: Some(5.0),
            num_ctx: Some(2048),
            num_gqa: None,
            num_gpu: None,
            num_thread: None,
            repeat_last_n: Some(64),
            repeat_penalty: Some(1.1),
            temperature: Some(0.8),
            seed: Some(0),
            stop: None,
            tfs_z: Some(1.0),
            num_predict: Some(128),
            top_k: Some(40),
            top_p: Some(0.9),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    Json,
}

fn default_keep_alive() -> Option<String> {
    Some("5m".to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ChatRequest {
    pub model: String,
    #[validate(length(min = 1), custom(function = "validate_each"))]
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ResponseFormat>,
    #[validate(custom(function = "validate_one"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ChatOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    /// How long the model stays loaded after the request, e.g. `"5m"`.
    #[serde(default = "default_keep_alive", skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<String>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            format: None,
            options: None,
            template: None,
            stream: None,
            keep_alive: default_keep_alive(),
        }
    }

    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_json_format(mut self) -> Self {
        self.format = Some(ResponseFormat::Json);
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = Some(stream);
        self
    }
}

/// A chat reply, or one line of a streamed reply. Durations are nanoseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ChatResponse {
    pub model: String,
    /// RFC 3339 timestamp.
    #[validate(custom(function = "validate_date_time"))]
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<ChatMessage>,
    pub done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_eval_duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_duration: Option<u64>,
}

impl ChatResponse {
    /// `created_at` as a timestamp.
    pub fn created(&self) -> Option<chrono::DateTime<chrono::FixedOffset>> {
        chrono::DateTime::parse_from_rfc3339(&self.created_at).ok()
    }

    /// Generation speed in tokens per second, when timings are reported.
    pub fn tokens_per_second(&self) -> Option<f64> {
        match (self.eval_count, self.eval_duration) {
            (Some(count), Some(duration)) if duration > 0 => {
                Some(count as f64 / (duration as f64 / 1e9))
            }
            _ => None,
        }
    }
}
