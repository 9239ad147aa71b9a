//! Unified assistant response used by Open Assistant servers.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::assistants::{MessageTextContent, ToolCall, Usage};

/// One assistant turn: generated text and/or tool calls, with usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AssistantResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageTextContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    pub usage: Usage,
}

impl AssistantResponse {
    pub fn text(value: impl Into<String>, usage: Usage) -> Self {
        Self {
            content: Some(MessageTextContent::new(value)),
            tool_calls: None,
            usage,
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|calls| !calls.is_empty())
    }
}
