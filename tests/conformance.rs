//! Every documented payload must be accepted the same way by the IR
//! validator, the typed layer, and a third-party JSON Schema validator run
//! against the emitted document.

use jsonschema::Validator;
use open_schemas::emit::{Emitter, JsonSchemaEmitter, OpenApiEmitter};
use open_schemas::schemas::{anthropic, googleai, ollama, openai};
use open_schemas::{parse, Contract, Provider};
use serde_json::{json, Value};

fn compiled(provider: Provider, name: &str) -> Validator {
    let document = JsonSchemaEmitter::new()
        .emit_definition(provider.catalog(), name)
        .unwrap();
    jsonschema::validator_for(&document).unwrap()
}

/// Accept `payload` through all three layers and return the typed value.
fn conforms<T: Contract>(payload: Value) -> T {
    let catalog = T::catalog();
    if let Err(err) = catalog.validate(T::NAME, &payload) {
        panic!("{} rejected by IR: {err}", T::NAME);
    }
    let validator = compiled(T::PROVIDER, T::NAME);
    let messages: Vec<String> = validator.iter_errors(&payload).map(|e| e.to_string()).collect();
    assert!(messages.is_empty(), "{} rejected by JSON Schema: {messages:?}", T::NAME);
    parse::<T>(payload).unwrap()
}

/// Reject `payload` in the IR validator and the emitted JSON Schema.
fn rejects(provider: Provider, name: &str, payload: &Value) {
    assert!(!provider.catalog().is_valid(name, payload), "{name} accepted {payload}");
    assert!(!compiled(provider, name).is_valid(payload), "{name} JSON Schema accepted {payload}");
}

#[test]
fn anthropic_messages() {
    let request: anthropic::CreateMessageRequest = conforms(json!({
        "model": "claude-3-opus-20240229",
        "max_tokens": 1024,
        "system": "Respond only in Spanish.",
        "messages": [
            {"role": "user", "content": "Hello, Claude"},
            {"role": "assistant", "content": [{"type": "text", "text": "Hola"}]},
            {"role": "user", "content": [
                {"type": "image", "source": {"type": "base64", "media_type": "image/png", "data": "iVBORw0KGgo="}},
                {"type": "text", "text": "What is in this image?"}
            ]}
        ],
        "metadata": {"user_id": "13803d75-b4b5-4c3e-b2a2-6f21399b021b"},
        "temperature": 0.5
    }));
    assert_eq!(request.messages.len(), 3);
    assert!(!request.is_streaming());

    let response: anthropic::CreateMessageResponse = conforms(json!({
        "id": "msg_013Zva2CMHLNnXjNJJKqJ2EF",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": "Hi! My name is Claude."}],
        "model": "claude-3-opus-20240229",
        "stop_reason": "end_turn",
        "stop_sequence": null,
        "usage": {"input_tokens": 10, "output_tokens": 25}
    }));
    assert_eq!(response.text(), "Hi! My name is Claude.");
}

#[test]
fn anthropic_rejections() {
    let base = json!({
        "model": "claude-3-opus-20240229",
        "max_tokens": 1024,
        "messages": [{"role": "user", "content": "Hello"}]
    });
    for (key, value) in [
        ("max_tokens", json!(0)),
        ("temperature", json!(1.5)),
        ("messages", json!([{"role": "system", "content": "Hello"}])),
        ("messages", json!([{"role": "user", "content": [{"type": "video", "text": "x"}]}])),
    ] {
        let mut payload = base.clone();
        payload[key] = value;
        rejects(Provider::Anthropic, "CreateMessageRequest", &payload);
    }
}

#[test]
fn openai_chat() {
    let request: openai::CreateChatCompletionRequest = conforms(json!({
        "model": "gpt-3.5-turbo",
        "messages": [
            {"role": "system", "content": "You are a helpful assistant."},
            {"role": "user", "content": "What's the weather like in Boston today?"}
        ],
        "tools": [{
            "type": "function",
            "function": {
                "name": "get_current_weather",
                "description": "Get the current weather in a given location",
                "parameters": {
                    "type": "object",
                    "properties": {"location": {"type": "string"}},
                    "required": ["location"]
                }
            }
        }],
        "tool_choice": "auto",
        "stop": ["\n\n"],
        "temperature": 0.7
    }));
    assert_eq!(request.messages.len(), 2);

    let response: openai::ChatCompletionObject = conforms(json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1677652288,
        "model": "gpt-3.5-turbo-0125",
        "system_fingerprint": "fp_44709d6fcb",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "Hello there, how may I assist you today?"},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21}
    }));
    assert_eq!(response.content(), Some("Hello there, how may I assist you today?"));
}

#[test]
fn openai_rejections() {
    let base = json!({
        "model": "gpt-3.5-turbo",
        "messages": [{"role": "user", "content": "Hello!"}]
    });
    for (key, value) in [
        ("temperature", json!(2.5)),
        ("stop", json!(["a", "b", "c", "d", "e"])),
        ("messages", json!([{"role": "developer", "content": "Hello!"}])),
    ] {
        let mut payload = base.clone();
        payload[key] = value;
        rejects(Provider::OpenAi, "CreateChatCompletionRequest", &payload);
    }
}

#[test]
fn openai_assistants() {
    let assistant: openai::CreateAssistantRequest = conforms(json!({
        "model": "gpt-4-turbo",
        "name": "Math Tutor",
        "instructions": "You are a personal math tutor.",
        "tools": [{"type": "code_interpreter"}],
        "metadata": {"team": "edu"}
    }));
    assert_eq!(assistant.name.as_deref(), Some("Math Tutor"));

    let mut metadata = serde_json::Map::new();
    for i in 0..17 {
        metadata.insert(format!("key{i}"), json!("value"));
    }
    rejects(
        Provider::OpenAi,
        "CreateAssistantRequest",
        &json!({"model": "gpt-4-turbo", "metadata": metadata}),
    );
    rejects(
        Provider::OpenAi,
        "CreateAssistantRequest",
        &json!({"model": "gpt-4-turbo", "name": "x".repeat(257)}),
    );
}

#[test]
fn googleai_generate_content() {
    let request: googleai::GenerateContentRequest = conforms(json!({
        "contents": [{"role": "user", "parts": [{"text": "Write a story about a magic backpack."}]}],
        "safetySettings": [
            {"category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_ONLY_HIGH"}
        ],
        "generationConfig": {
            "stopSequences": ["Title"],
            "temperature": 1.0,
            "maxOutputTokens": 800,
            "topP": 0.8,
            "topK": 10
        }
    }));
    assert_eq!(request.contents.len(), 1);

    let response: googleai::GenerateContentResponse = conforms(json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": "Once upon a time"}]},
            "finishReason": "STOP",
            "index": 0,
            "safetyRatings": [
                {"category": "HARM_CATEGORY_HARASSMENT", "probability": "NEGLIGIBLE"}
            ]
        }],
        "promptFeedback": {
            "safetyRatings": [
                {"category": "HARM_CATEGORY_HATE_SPEECH", "probability": "NEGLIGIBLE"}
            ]
        },
        "usageMetadata": {"promptTokenCount": 8, "candidatesTokenCount": 4, "totalTokenCount": 12}
    }));
    assert_eq!(response.text().as_deref(), Some("Once upon a time"));
    assert!(!response.is_blocked());

    rejects(
        Provider::GoogleAi,
        "GenerateContentRequest",
        &json!({"contents": [], "generationConfig": {"candidateCount": 9}}),
    );
}

#[test]
fn ollama_chat() {
    let request: ollama::ChatRequest = conforms(json!({
        "model": "llama2",
        "messages": [{"role": "user", "content": "why is the sky blue?"}],
        "options": {"temperature": 0.2, "num_ctx": 4096},
        "stream": false
    }));
    assert_eq!(request.keep_alive.as_deref(), Some("5m"));

    let response: ollama::ChatResponse = conforms(json!({
        "model": "llama2",
        "created_at": "2023-08-04T19:22:45.499127Z",
        "message": {"role": "assistant", "content": "The sky is blue because of Rayleigh scattering."},
        "done": true,
        "total_duration": 4883583458u64,
        "load_duration": 1334875,
        "prompt_eval_count": 26,
        "prompt_eval_duration": 342546000,
        "eval_count": 282,
        "eval_duration": 4535599000u64
    }));
    assert!(response.created().is_some());

    rejects(
        Provider::Ollama,
        "ChatRequest",
        &json!({"model": "llama2", "messages": [{"role": "tool", "content": "x"}]}),
    );
}

#[test]
fn violation_paths_are_nested() {
    let err = Provider::Anthropic
        .catalog()
        .validate(
            "CreateMessageRequest",
            &json!({
                "model": "claude-3-opus-20240229",
                "max_tokens": 1024,
                "messages": [
                    {"role": "user", "content": "Hello"},
                    {"role": "assistant", "content": [{"type": "text"}]}
                ]
            }),
        )
        .unwrap_err();
    let report = err.report().unwrap();
    assert_eq!(report.paths(), vec!["messages[1].content[0].text"]);
}

#[test]
fn defaults_round_trip_through_typed_layer() {
    let catalog = Provider::Ollama.catalog();
    let filled = catalog
        .apply_defaults(
            "ChatRequest",
            json!({"model": "llama2", "messages": [{"role": "user", "content": "hi"}]}),
        )
        .unwrap();
    assert_eq!(filled["keep_alive"], "5m");

    let typed: ollama::ChatRequest = parse(filled.clone()).unwrap();
    let reparsed: ollama::ChatRequest = parse(serde_json::to_value(&typed).unwrap()).unwrap();
    assert_eq!(reparsed, typed);
}

#[test]
fn whole_catalogs_emit() {
    for provider in Provider::ALL {
        let catalog = provider.catalog();
        let document = JsonSchemaEmitter::new().emit(catalog).unwrap();
        assert_eq!(document["$defs"].as_object().unwrap().len(), catalog.len());
        jsonschema::validator_for(&document).unwrap();

        let openapi = OpenApiEmitter::new().emit(catalog).unwrap();
        let schemas = openapi["components"]["schemas"].as_object().unwrap();
        assert_eq!(schemas.len(), catalog.len());
        assert!(catalog.names().all(|name| schemas.contains_key(name)));
    }
}
