//! Anthropic Messages API schemas
//!
//! Request, response and streaming event shapes for `POST /v1/messages`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

use super::null_as_default;

literal!(Base64Type = "base64");
literal!(MessageType = "message");
literal!(AssistantRole = "assistant");
literal!(ErrorType = "error");
literal!(TextType = "text");

// ============================================================================
// Content Blocks
// ============================================================================

/// Supported image media types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/gif")]
    Gif,
    #[serde(rename = "image/webp")]
    Webp,
}

/// The source of an image block. Only base64 data is supported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ImageContentSource {
    #[serde(rename = "type", default)]
    pub source_type: Base64Type,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    pub data: String,
}

impl ImageContentSource {
    pub fn base64(media_type: MediaType, data: impl Into<String>) -> Self {
        Self {
            source_type: Base64Type::Value,
            media_type: Some(media_type),
            data: data.into(),
        }
    }
}

/// Text content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TextContent {
    pub text: String,
}

/// Image content, supported from Claude 3 onwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ImageContent {
    pub source: ImageContentSource,
}

/// A tool invocation produced by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ToolUseContent {
    /// Unique identifier for this tool use block.
    pub id: String,
    pub name: String,
    /// Input conforming to the tool's `input_schema`.
    pub input: Map<String, Value>,
}

/// Result content of a tool call: plain text or text blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolResultValue {
    Text(String),
    Blocks(Vec<TextBlock>),
}

/// A text block nested inside tool results. The `type` tag may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(rename = "type", default)]
    pub block_type: TextType,
    pub text: String,
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            block_type: TextType::Value,
            text: text.into(),
        }
    }
}

/// The result of a tool call, sent back by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ToolResultContent {
    pub tool_use_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ToolResultValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Input content block, discriminated on `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    Text(TextContent),
    Image(ImageContent),
    ToolUse(ToolUseContent),
    ToolResult(ToolResultContent),
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text(TextContent { text: text.into() })
    }

    pub fn image(media_type: MediaType, data: impl Into<String>) -> Self {
        Content::Image(ImageContent {
            source: ImageContentSource::base64(media_type, data),
        })
    }

    pub fn tool_result(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        Content::ToolResult(ToolResultContent {
            tool_use_id: tool_use_id.into(),
            content: Some(ToolResultValue::Text(content.into())),
            is_error: None,
        })
    }
}

/// Output content block: text or tool use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseContent {
    Text(TextContent),
    ToolUse(ToolUseContent),
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Message content: a plain string or a list of blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<Content>),
}

/// An input message. Conversations alternate user and assistant turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Message {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(MessageContent::Text(content.into())),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(MessageContent::Text(content.into())),
        }
    }

    pub fn with_blocks(role: Role, blocks: Vec<Content>) -> Self {
        Self {
            role,
            content: Some(MessageContent::Blocks(blocks)),
        }
    }
}

/// Tool definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Tool {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema of the tool input.
    pub input_schema: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RequestMetadata {
    pub user_id: String,
}

/// Request body for creating a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateMessageRequest {
    pub model: String,
    #[validate(length(min = 1))]
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[validate(range(min = 1))]
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RequestMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

impl CreateMessageRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            messages,
            system: None,
            max_tokens,
            metadata: None,
            stop_sequences: None,
            stream: None,
            temperature: None,
            tools: None,
            top_p: None,
            top_k: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = Some(stream);
        self
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.unwrap_or(false)
    }
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
    ToolUse,
}

/// Billing and rate-limit usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MessageUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Response body for a created message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateMessageResponse {
    pub id: String,
    #[serde(rename = "type", default)]
    pub response_type: MessageType,
    #[serde(default)]
    pub role: AssistantRole,
    pub content: Vec<ResponseContent>,
    pub model: String,
    pub stop_reason: Option<StopReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequence: Option<String>,
    pub usage: MessageUsage,
}

impl CreateMessageResponse {
    /// Concatenated text of all text blocks.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ResponseContent::Text(t) => Some(t.text.as_str()),
                ResponseContent::ToolUse(_) => None,
            })
            .collect()
    }

    pub fn tool_uses(&self) -> impl Iterator<Item = &ToolUseContent> {
        self.content.iter().filter_map(|block| match block {
            ResponseContent::ToolUse(t) => Some(t),
            ResponseContent::Text(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ErrorResponse {
    #[serde(rename = "type", default)]
    pub response_type: ErrorType,
    pub error: ErrorDetail,
}

// ============================================================================
// Streaming Events
// ============================================================================

/// The message skeleton carried by `message_start`, with empty content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StreamMessage {
    pub id: String,
    #[serde(rename = "type", default)]
    pub message_type: MessageType,
    #[serde(default)]
    pub role: AssistantRole,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub content: Vec<ResponseContent>,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequence: Option<String>,
    pub usage: MessageUsage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MessageStartEvent {
    pub message: StreamMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequence: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaUsage {
    pub output_tokens: u32,
}

/// Top-level changes to the final message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MessageDeltaEvent {
    pub delta: MessageDelta,
    pub usage: DeltaUsage,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MessageStopEvent {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ContentBlockStartEvent {
    pub index: u32,
    pub content_block: ResponseContent,
}

/// Incremental content of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentDelta {
    TextDelta { text: String },
    InputJsonDelta { partial_json: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ContentBlockDeltaEvent {
    pub index: u32,
    pub delta: ContentDelta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ContentBlockStopEvent {
    pub index: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PingEvent {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ErrorEvent {
    pub error: ErrorDetail,
}

/// Server-sent event payload, discriminated on `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageStreamEvent {
    MessageStart(MessageStartEvent),
    MessageDelta(MessageDeltaEvent),
    MessageStop(MessageStopEvent),
    ContentBlockStart(ContentBlockStartEvent),
    ContentBlockDelta(ContentBlockDeltaEvent),
    ContentBlockStop(ContentBlockStopEvent),
    Ping(PingEvent),
    Error(ErrorEvent),
}

impl MessageStreamEvent {
    /// The SSE `event:` name for this payload.
    pub fn event_name(&self) -> &'static str {
        match self {
            MessageStreamEvent::MessageStart(_) => "message_start",
            MessageStreamEvent::MessageDelta(_) => "message_delta",
            MessageStreamEvent::MessageStop(_) => "message_stop",
            MessageStreamEvent::ContentBlockStart(_) => "content_block_start",
            MessageStreamEvent::ContentBlockDelta(_) => "content_block_delta",
            MessageStreamEvent::ContentBlockStop(_) => "content_block_stop",
            MessageStreamEvent::Ping(_) => "ping",
            MessageStreamEvent::Error(_) => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MessageStreamEvent::MessageStop(_) | MessageStreamEvent::Error(_)
        )
    }
}

impl Validate for MessageStreamEvent {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            MessageStreamEvent::MessageStart(e) => e.validate(),
            MessageStreamEvent::MessageDelta(e) => e.validate(),
            MessageStreamEvent::MessageStop(e) => e.validate(),
            MessageStreamEvent::ContentBlockStart(e) => e.validate(),
            MessageStreamEvent::ContentBlockDelta(e) => e.validate(),
            MessageStreamEvent::ContentBlockStop(e) => e.validate(),
            MessageStreamEvent::Ping(e) => e.validate(),
            MessageStreamEvent::Error(e) => e.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let request = CreateMessageRequest::new(
            "claude-3-opus-20240229",
            vec![Message::user("Hello, Claude")],
            1024,
        )
        .with_system("Be brief.");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0], json!({"role": "user", "content": "Hello, Claude"}));
        assert_eq!(json["system"], "Be brief.");
        assert!(json.get("temperature").is_none());
        assert!(!request.is_streaming());
    }

    #[test]
    fn test_request_constraints() {
        let request = CreateMessageRequest::new("claude-3", vec![Message::user("hi")], 1);
        assert!(request.validate().is_ok());

        let errors = CreateMessageRequest::new("claude-3", vec![], 0)
            .with_temperature(1.5)
            .validate()
            .unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("messages"));
        assert!(fields.contains_key("max_tokens"));
        assert!(fields.contains_key("temperature"));
    }

    #[test]
    fn test_content_blocks() {
        let json = json!({
            "role": "user",
            "content": [
                {"type": "image", "source": {"type": "base64", "media_type": "image/webp", "data": "UklGR..."}},
                {"type": "text", "text": "What is in this image?"},
                {"type": "tool_result", "tool_use_id": "toolu_01", "content": [{"type": "text", "text": "15 degrees"}]}
            ]
        });
        let message: Message = serde_json::from_value(json.clone()).unwrap();
        let Some(MessageContent::Blocks(blocks)) = &message.content else {
            panic!("expected blocks");
        };
        assert!(matches!(
            &blocks[0],
            Content::Image(ImageContent { source }) if source.media_type == Some(MediaType::Webp)
        ));
        assert_eq!(blocks[1], Content::text("What is in this image?"));
        assert_eq!(serde_json::to_value(&message).unwrap(), json);
    }

    #[test]
    fn test_image_source_type_defaults() {
        let source: ImageContentSource =
            serde_json::from_value(json!({"media_type": "image/png", "data": "iVBOR"})).unwrap();
        assert_eq!(source.source_type, Base64Type::Value);
        assert!(serde_json::from_value::<ImageContentSource>(
            json!({"type": "url", "data": "iVBOR"})
        )
        .is_err());
    }

    #[test]
    fn test_response_deserialization() {
        let response: CreateMessageResponse = serde_json::from_value(json!({
            "id": "msg_013Zva2CMHLNnXjNJJKqJ2EF",
            "type": "message",
            "role": "assistant",
            "content": [
                {"type": "text", "text": "Let me check. "},
                {"type": "tool_use", "id": "toolu_01", "name": "get_weather", "input": {"city": "Paris"}}
            ],
            "model": "claude-3-opus-20240229",
            "stop_reason": "tool_use",
            "usage": {"input_tokens": 10, "output_tokens": 25}
        }))
        .unwrap();
        assert_eq!(response.text(), "Let me check. ");
        assert_eq!(response.tool_uses().count(), 1);
        assert_eq!(response.stop_reason, Some(StopReason::ToolUse));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "message");
        assert!(json.get("stop_sequence").is_none());
    }

    #[test]
    fn test_stream_events() {
        let events = [
            json!({"type": "message_start", "message": {"id": "msg_1", "type": "message", "role": "assistant", "content": [], "model": "claude-3-opus-20240229", "stop_reason": null, "stop_sequence": null, "usage": {"input_tokens": 25, "output_tokens": 1}}}),
            json!({"type": "content_block_start", "index": 0, "content_block": {"type": "text", "text": ""}}),
            json!({"type": "ping"}),
            json!({"type": "content_block_delta", "index": 0, "delta": {"type": "text_delta", "text": "Hello"}}),
            json!({"type": "content_block_stop", "index": 0}),
            json!({"type": "message_delta", "delta": {"stop_reason": "end_turn", "stop_sequence": null}, "usage": {"output_tokens": 15}}),
            json!({"type": "message_stop"}),
        ];
        let parsed: Vec<MessageStreamEvent> = events
            .iter()
            .map(|e| serde_json::from_value(e.clone()).unwrap())
            .collect();
        let names: Vec<_> = parsed.iter().map(MessageStreamEvent::event_name).collect();
        assert_eq!(
            names,
            vec![
                "message_start",
                "content_block_start",
                "ping",
                "content_block_delta",
                "content_block_stop",
                "message_delta",
                "message_stop"
            ]
        );
        assert!(parsed.last().is_some_and(MessageStreamEvent::is_terminal));
        assert!(parsed.iter().all(|e| e.validate().is_ok()));
    }

    #[test]
    fn test_tool_result_text_blocks_without_type() {
        let result: ToolResultContent = serde_json::from_value(json!({
            "tool_use_id": "toolu_1",
            "content": [{"text": "15 degrees"}]
        }))
        .unwrap();
        assert_eq!(
            result.content,
            Some(ToolResultValue::Blocks(vec![TextBlock::new("15 degrees")]))
        );
        assert_eq!(
            serde_json::to_value(&result).unwrap()["content"][0]["type"],
            "text"
        );
        assert!(serde_json::from_value::<ToolResultContent>(json!({
            "tool_use_id": "toolu_1",
            "content": [{"type": "image", "text": "15 degrees"}]
        }))
        .is_err());
    }

    #[test]
    fn test_stream_message_null_content() {
        let event: MessageStreamEvent = serde_json::from_value(json!({
            "type": "message_start",
            "message": {"id": "msg_1", "content": null, "model": "claude-3-opus-20240229", "usage": {"input_tokens": 25, "output_tokens": 1}}
        }))
        .unwrap();
        let MessageStreamEvent::MessageStart(start) = event else {
            panic!("expected message_start");
        };
        assert!(start.message.content.is_empty());
    }

    #[test]
    fn test_unknown_event_type_rejected() {
        assert!(serde_json::from_value::<MessageStreamEvent>(json!({"type": "message_pause"})).is_err());
    }
}
