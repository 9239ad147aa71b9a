//! Typed contracts bound to their catalog definitions
//!
//! [`parse`] turns raw JSON into a typed value in three steps. First the IR
//! validator runs, so every violation is reported with its path. The accepted
//! value is then normalized against its definition and deserialized by serde.
//! Finally the `validator` constraints are checked, and their failures are
//! reported with paths too. [`check`] runs the same checks on a value built in
//! code before it is sent.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use validator::Validate;

use crate::catalog::Provider;
use crate::error::{Result, SchemaError, ValidationReport};
use crate::ir::Catalog;

/// A typed schema with an IR definition of the same name.
pub trait Contract: Serialize + DeserializeOwned + Validate {
    const PROVIDER: Provider;
    const NAME: &'static str;

    fn catalog() -> &'static Catalog {
        Self::PROVIDER.catalog()
    }
}

/// Validate and deserialize a raw payload.
pub fn parse<T: Contract>(value: Value) -> Result<T> {
    let catalog = T::catalog();
    catalog.validate(T::NAME, &value).inspect_err(|err| {
        tracing::debug!(provider = %T::PROVIDER, schema = T::NAME, error = %err, "Payload rejected");
    })?;
    let parsed: T = serde_json::from_value(catalog.normalize(T::NAME, value)?)?;
    typed_checks(&parsed)?;
    Ok(parsed)
}

pub fn parse_str<T: Contract>(json: &str) -> Result<T> {
    parse(serde_json::from_str(json)?)
}

/// Check a constructed value against both encodings.
pub fn check<T: Contract>(value: &T) -> Result<()> {
    let json = serde_json::to_value(value)?;
    T::catalog().validate(T::NAME, &json)?;
    typed_checks(value)
}

fn typed_checks<T: Contract>(value: &T) -> Result<()> {
    value.validate().map_err(|errors| {
        SchemaError::Invalid(ValidationReport::from_validator(T::NAME, &errors))
    })
}

macro_rules! contracts {
    ($provider:ident, $module:ident, $list:ident, $parse:ident: [$($name:ident),* $(,)?]) => {
        $(
            impl Contract for crate::schemas::$module::$name {
                const PROVIDER: Provider = Provider::$provider;
                const NAME: &'static str = stringify!($name);
            }
        )*

        #[cfg(test)]
        const $list: &[&str] = &[$(stringify!($name)),*];

        /// Parse `value` as the contract called `name`.
        #[cfg(test)]
        fn $parse(name: &str, value: Value) -> Option<Result<()>> {
            $(
                if name == stringify!($name) {
                    return Some(parse::<crate::schemas::$module::$name>(value).map(drop));
                }
            )*
            None
        }
    };
}

contracts!(Anthropic, anthropic, ANTHROPIC, parse_anthropic: [
    ImageContentSource,
    TextContent,
    ImageContent,
    ToolUseContent,
    ToolResultContent,
    Message,
    Tool,
    CreateMessageRequest,
    MessageUsage,
    CreateMessageResponse,
    ErrorDetail,
    ErrorResponse,
    StreamMessage,
    MessageStartEvent,
    MessageDeltaEvent,
    MessageStopEvent,
    ContentBlockStartEvent,
    ContentBlockDeltaEvent,
    ContentBlockStopEvent,
    PingEvent,
    ErrorEvent,
    MessageStreamEvent,
]);

contracts!(OpenAi, openai, OPENAI, parse_openai: [
    // chat
    ChatCompletionRequestSystemMessage,
    ChatCompletionRequestUserMessage,
    ChatCompletionRequestAssistantMessage,
    ChatCompletionRequestToolMessage,
    ChatCompletionRequestMessageTextContentPart,
    ChatCompletionRequestMessageImageContentPart,
    ChatCompletionMessageToolCall,
    ChatCompletionTool,
    ChatCompletionNamedToolChoice,
    CreateChatCompletionRequest,
    ChatCompletionLogprobs,
    ChatCompletionChoiceContent,
    ChatCompletionChoice,
    CompletionUsage,
    ChatCompletionObject,
    ChatCompletionChunkChoice,
    ChatCompletionChunkObject,
    // embeddings, models, files
    CreateEmbeddingRequest,
    Embedding,
    CreateEmbeddingResponse,
    ModelObject,
    DeleteModelResponse,
    ListModelsResponse,
    FileObject,
    UploadFile,
    UploadFileRequest,
    DeleteFileResponse,
    ListFilesResponse,
    // assistants
    FunctionDefinition,
    FunctionTool,
    Tool,
    AssistantObject,
    AssistantFileObject,
    CreateAssistantRequest,
    CreateAssistantFileRequest,
    ModifyAssistantRequest,
    ThreadObject,
    MessageTextContent,
    MessageObject,
    MessageFileObject,
    CreateMessageRequest,
    CreateThreadRequest,
    ModifyThreadRequest,
    ModifyMessageRequest,
    SubmitToolOutputsAction,
    Usage,
    RunObject,
    StepObject,
    CreateRunRequest,
    CreateThreadAndRunRequest,
    ModifyRunRequest,
    ToolOutput,
    SubmitToolOutputsToRunRequest,
    DeleteAssistantResponse,
    DeleteAssistantFileResponse,
    DeleteThreadResponse,
    DeleteMessageResponse,
    ListAssistantsResponse,
    ListAssistantFilesResponse,
    ListMessagesResponse,
    ListMessageFilesResponse,
    ListRunsResponse,
    ListRunStepsResponse,
    Pagination,
    Ordering,
    AssistantResponse,
]);

contracts!(GoogleAi, googleai, GOOGLEAI, parse_googleai: [
    Blob,
    FunctionCall,
    FunctionResponse,
    Part,
    Content,
    SafetyRating,
    SafetySetting,
    CitationSource,
    CitationMetadata,
    Candidate,
    PromptFeedback,
    UsageMetadata,
    GenerateContentResponse,
    FunctionDeclaration,
    Tool,
    GenerationConfig,
    GenerateContentRequest,
]);

contracts!(Ollama, ollama, OLLAMA, parse_ollama: [
    ChatMessage,
    ChatOptions,
    ChatRequest,
    ChatResponse,
]);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use crate::ir::Schema;
    use crate::schemas::{anthropic, ollama, openai};
    use serde_json::json;

    fn contracts(provider: Provider) -> &'static [&'static str] {
        match provider {
            Provider::Anthropic => ANTHROPIC,
            Provider::OpenAi => OPENAI,
            Provider::GoogleAi => GOOGLEAI,
            Provider::Ollama => OLLAMA,
        }
    }

    fn parse_named(provider: Provider, name: &str, value: Value) -> Result<()> {
        let parsed = match provider {
            Provider::Anthropic => parse_anthropic(name, value),
            Provider::OpenAi => parse_openai(name, value),
            Provider::GoogleAi => parse_googleai(name, value),
            Provider::Ollama => parse_ollama(name, value),
        };
        parsed.unwrap_or_else(|| panic!("{provider} has no contract {name}"))
    }

    /// Every integer in `value` written as a whole float.
    fn with_float_integers(value: &Value) -> Value {
        match value {
            Value::Number(n) if n.is_u64() || n.is_i64() => {
                n.as_f64().map(Value::from).unwrap_or_else(|| value.clone())
            }
            Value::Array(items) => Value::Array(items.iter().map(with_float_integers).collect()),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, item)| (key.clone(), with_float_integers(item)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// `value` with every absent optional top-level field set to `null`.
    fn with_null_optionals(provider: Provider, name: &str, value: &Value) -> Value {
        let catalog = provider.catalog();
        let mut value = value.clone();
        let schema = catalog.get(name).and_then(|s| catalog.resolve(s));
        if let (Some(Schema::Object(object)), Some(map)) = (schema, value.as_object_mut()) {
            for field in object.fields.iter().filter(|f| !f.required) {
                map.entry(field.name.clone()).or_insert(Value::Null);
            }
        }
        value
    }

    #[test]
    fn test_every_contract_has_a_definition() {
        for (provider, names) in [
            (Provider::Anthropic, ANTHROPIC),
            (Provider::OpenAi, OPENAI),
            (Provider::GoogleAi, GOOGLEAI),
            (Provider::Ollama, OLLAMA),
        ] {
            for name in names {
                assert!(provider.catalog().contains(name), "{provider} has no {name}");
            }
        }
    }

    #[test]
    fn test_parse_reports_paths() {
        let err = parse::<anthropic::CreateMessageRequest>(json!({
            "model": "claude-3-opus-20240229",
            "max_tokens": 0,
            "messages": [{"role": "user", "content": "Hello"}],
            "temperature": 3
        }))
        .unwrap_err();
        let report = err.report().unwrap();
        assert!(report.has_violation_at("max_tokens"));
        assert!(report.has_violation_at("temperature"));
    }

    #[test]
    fn test_parse_str() {
        let request: ollama::ChatRequest = parse_str(
            r#"{"model": "llama2", "messages": [{"role": "user", "content": "why is the sky blue?"}]}"#,
        )
        .unwrap();
        assert_eq!(request.keep_alive.as_deref(), Some("5m"));

        assert!(matches!(
            parse_str::<ollama::ChatRequest>("{not json"),
            Err(SchemaError::Json(_))
        ));
    }

    #[test]
    fn test_check_constructed_value() {
        let request = openai::CreateChatCompletionRequest::new(
            "gpt-4",
            vec![openai::ChatCompletionRequestMessage::user("Hello!")],
        );
        assert!(check(&request).is_ok());

        let request = request.with_temperature(2.5);
        assert!(check(&request).unwrap_err().report().unwrap().has_violation_at("temperature"));
    }

    #[test]
    fn test_parse_accepts_what_the_ir_accepts() {
        let result: anthropic::ToolResultContent = parse(json!({
            "tool_use_id": "toolu_1",
            "content": [{"text": "15 degrees"}]
        }))
        .unwrap();
        assert_eq!(
            result.content,
            Some(anthropic::ToolResultValue::Blocks(vec![anthropic::TextBlock::new(
                "15 degrees"
            )]))
        );

        let start: anthropic::MessageStartEvent = parse(json!({
            "message": {
                "id": "msg_1",
                "type": "message",
                "role": "assistant",
                "content": null,
                "model": "claude-3-opus-20240229",
                "stop_reason": null,
                "stop_sequence": null,
                "usage": {"input_tokens": 25, "output_tokens": 1}
            }
        }))
        .unwrap();
        assert!(start.message.content.is_empty());

        let request: anthropic::CreateMessageRequest = parse(json!({
            "model": "claude-3-opus-20240229",
            "max_tokens": 1024.0,
            "messages": [{"role": "user", "content": "Hello"}]
        }))
        .unwrap();
        assert_eq!(request.max_tokens, 1024);

        let page: openai::Pagination = parse(json!({"limit": "50.0"})).unwrap();
        assert_eq!(page.limit, 50);
    }

    #[test]
    fn test_typed_constraints_report_paths() {
        let request = anthropic::CreateMessageRequest::new("claude-3-opus-20240229", vec![], 0);
        let err = typed_checks(&request).unwrap_err();
        assert!(err.is_validation());
        let report = err.report().unwrap();
        assert_eq!(report.schema, "CreateMessageRequest");
        assert!(report.has_violation_at("max_tokens"));
        assert!(report.has_violation_at("messages"));
        assert!(check(&request).unwrap_err().report().is_some());
    }

    #[test]
    fn test_ir_accepted_edge_payloads_parse() {
        let table = [
            (Provider::Anthropic, "ToolResultContent", json!({
                "tool_use_id": "toolu_1",
                "content": [{"text": "15 degrees"}]
            })),
            (Provider::Anthropic, "Message", json!({
                "role": "user",
                "content": [{"type": "tool_result", "tool_use_id": "toolu_1", "content": [{"text": "15 degrees"}]}]
            })),
            (Provider::Anthropic, "ImageContentSource", json!({"media_type": "image/png", "data": "iVBOR"})),
            (Provider::Anthropic, "CreateMessageRequest", json!({
                "model": "claude-3-opus-20240229",
                "max_tokens": 1024,
                "messages": [{"role": "user", "content": "Hello"}],
                "top_k": 5
            })),
            (Provider::Anthropic, "MessageStartEvent", json!({
                "message": {"id": "msg_1", "content": null, "model": "claude-3-opus-20240229", "usage": {"input_tokens": 25, "output_tokens": 1}}
            })),
            (Provider::OpenAi, "Pagination", json!({"limit": "50.0"})),
            (Provider::OpenAi, "CreateChatCompletionRequest", json!({
                "model": "gpt-3.5-turbo",
                "messages": [{"role": "user", "content": "Hello!"}],
                "n": 2
            })),
            (Provider::OpenAi, "ChatCompletionObject", json!({
                "id": "chatcmpl-123",
                "object": "chat.completion",
                "created": 1677652288,
                "model": "gpt-3.5-turbo-0125",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hello"}, "finish_reason": "stop"}],
                "usage": {"prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21}
            })),
            (Provider::GoogleAi, "GenerateContentRequest", json!({
                "contents": [{"role": "user", "parts": [{"text": "Write a story."}]}],
                "generationConfig": {"maxOutputTokens": 800, "topK": 10}
            })),
            (Provider::Ollama, "ChatRequest", json!({
                "model": "llama2",
                "messages": [{"role": "user", "content": "why is the sky blue?"}],
                "options": {"num_ctx": 4096, "seed": 42}
            })),
            (Provider::Ollama, "ChatResponse", json!({
                "model": "llama2",
                "created_at": "2023-08-04T19:22:45.499127Z",
                "message": {"role": "assistant", "content": "Rayleigh scattering."},
                "done": true,
                "total_duration": 4883583458u64,
                "eval_count": 282
            })),
        ];

        for (provider, name, payload) in table {
            assert!(contracts(provider).contains(&name), "{provider} lists no {name}");
            let catalog = provider.catalog();
            let variants = [
                with_float_integers(&payload),
                with_null_optionals(provider, name, &payload),
                payload,
            ];
            for value in variants {
                if let Err(err) = catalog.validate(name, &value) {
                    panic!("{provider}.{name} rejected by IR: {err}\n{value}");
                }
                if let Err(err) = parse_named(provider, name, value.clone()) {
                    panic!("{provider}.{name} accepted by IR but not parsed: {err}\n{value}");
                }
            }
        }
    }

    #[test]
    fn test_every_listed_contract_parses_by_name() {
        for provider in Provider::ALL {
            for name in contracts(provider) {
                assert!(parse_named(provider, name, json!("not an object")).is_err());
            }
        }
    }

    #[test]
    fn test_round_trip() {
        let value = json!({
            "id": "msg_013Zva2CMHLNnXjNJJKqJ2EF",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": "Hi! My name is Claude."}],
            "model": "claude-3-opus-20240229",
            "stop_reason": "end_turn",
            "stop_sequence": null,
            "usage": {"input_tokens": 10, "output_tokens": 25}
        });
        let response: anthropic::CreateMessageResponse = parse(value).unwrap();
        let reparsed: anthropic::CreateMessageResponse =
            parse(serde_json::to_value(&response).unwrap()).unwrap();
        assert_eq!(reparsed, response);
    }
}
