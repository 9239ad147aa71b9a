//! Chat Completions definitions

use crate::ir::*;

pub(super) fn define(c: &mut Catalog) {
    // Request messages
    c.define(
        "ChatCompletionRequestSystemMessage",
        object([
            field("content", string()),
            tag("role", "system"),
            field("name", string()).optional(),
        ]),
    )
    .define(
        "ChatCompletionRequestMessageTextContentPart",
        object([tag("type", "text"), field("text", string())]),
    )
    .define(
        "ChatCompletionRequestMessageImageContentPart",
        object([
            tag("type", "image_url"),
            field(
                "image_url",
                object([
                    field("url", string()).describe("An image URL or a base64 data URL."),
                    field("detail", enumeration(&["auto", "low", "high"])).optional(),
                ]),
            ),
        ]),
    )
    .define(
        "ChatCompletionRequestMessageContentPart",
        tagged_union(
            "type",
            [
                reference("ChatCompletionRequestMessageTextContentPart"),
                reference("ChatCompletionRequestMessageImageContentPart"),
            ],
        ),
    )
    .define(
        "ChatCompletionRequestUserMessage",
        object([
            field(
                "content",
                union([
                    string().into(),
                    array(reference("ChatCompletionRequestMessageContentPart")).into(),
                ]),
            ),
            tag("role", "user"),
            field("name", string()).optional(),
        ]),
    )
    .define(
        "ChatCompletionMessageToolCall",
        object([
            field("id", string()),
            tag("type", "function"),
            field(
                "function",
                object([
                    field("name", string()),
                    field("arguments", string())
                        .describe("JSON-encoded arguments, as generated by the model."),
                ]),
            ),
        ]),
    )
    .define(
        "ChatCompletionRequestAssistantMessage",
        object([
            field("content", string()).optional(),
            tag("role", "assistant"),
            field("name", string()).optional(),
            field("tool_calls", array(reference("ChatCompletionMessageToolCall"))).optional(),
        ]),
    )
    .define(
        "ChatCompletionRequestToolMessage",
        object([
            tag("role", "tool"),
            field("content", string()),
            field("tool_call_id", string()),
        ]),
    )
    .define(
        "ChatCompletionRequestMessage",
        tagged_union(
            "role",
            [
                reference("ChatCompletionRequestSystemMessage"),
                reference("ChatCompletionRequestUserMessage"),
                reference("ChatCompletionRequestAssistantMessage"),
                reference("ChatCompletionRequestToolMessage"),
            ],
        ),
    );

    // Tools
    c.define(
        "ChatCompletionTool",
        object([
            tag("type", "function"),
            field(
                "function",
                object([
                    field("name", string()),
                    field("description", string()).optional(),
                    field("parameters", any())
                        .optional()
                        .describe("JSON Schema of the function parameters."),
                ]),
            ),
        ]),
    )
    .define(
        "ChatCompletionNamedToolChoice",
        object([
            field("type", literal("function")),
            field("function", object([field("name", string())])),
        ]),
    )
    .define(
        "ChatCompletionToolChoiceOption",
        union([
            enumeration(&["none", "auto", "required"]),
            reference("ChatCompletionNamedToolChoice"),
        ]),
    );

    // Request
    c.define(
        "ResponseFormat",
        object([field("type", enumeration(&["text", "json_object"])).default("text")]),
    )
    .define(
        "CreateChatCompletionRequest",
        object([
            field(
                "messages",
                array(reference("ChatCompletionRequestMessage")).min_items(1),
            ),
            field("model", string()),
            field("frequency_penalty", number().range(-2.0, 2.0))
                .optional()
                .default(0),
            field("logit_bias", record(number().range(-100.0, 100.0)))
                .optional()
                .describe("Token ID to bias in [-100, 100]."),
            field("logprobs", boolean()).optional(),
            field("top_logprobs", integer().range(0.0, 20.0)).optional(),
            field("max_tokens", integer().min(1.0)).optional(),
            field("n", integer().range(1.0, 128.0)).optional().default(1),
            field("presence_penalty", number().range(-2.0, 2.0))
                .optional()
                .default(0),
            field("response_format", reference("ResponseFormat"))
                .optional()
                .default(serde_json::json!({"type": "text"})),
            field("seed", integer()).optional(),
            field(
                "stop",
                union([string().into(), array(string()).max_items(4).into()]),
            )
            .optional(),
            field("stream", boolean()).optional().default(false),
            field(
                "stream_options",
                object([field("include_usage", boolean()).optional()]),
            )
            .optional(),
            field("temperature", number().range(0.0, 2.0))
                .optional()
                .default(1),
            field("top_p", number().range(0.0, 1.0)).optional().default(1),
            field("tools", array(reference("ChatCompletionTool"))).optional(),
            field("tool_choice", reference("ChatCompletionToolChoiceOption")).optional(),
            field("user", string()).optional(),
        ]),
    );

    // Response
    let top_logprob = object([
        field("token", string()),
        field("logprob", number()),
        field("bytes", array(integer().range(0.0, 255.0))).optional(),
    ]);
    c.define(
        "FinishReason",
        enumeration(&["stop", "length", "content_filter", "tool_calls", "function_call"]),
    )
    .define("TopLogprob", top_logprob.clone())
    .define(
        "ChatCompletionTokenLogprob",
        top_logprob.extend([field("top_logprobs", array(reference("TopLogprob")))]),
    )
    .define(
        "ChatCompletionLogprobs",
        object([field("content", array(reference("ChatCompletionTokenLogprob"))).optional()]),
    )
    .define(
        "ChatCompletionChoiceContent",
        object([
            field("content", string()).optional(),
            field("tool_calls", array(reference("ChatCompletionMessageToolCall"))).optional(),
            tag("role", "assistant"),
        ]),
    )
    .define(
        "ChatCompletionChoice",
        object([
            field("finish_reason", reference("FinishReason")),
            field("index", integer().min(0.0)),
            field("message", reference("ChatCompletionChoiceContent")),
            field("logprobs", reference("ChatCompletionLogprobs")).optional(),
        ]),
    )
    .define(
        "CompletionUsage",
        object([
            field("completion_tokens", integer().min(0.0)),
            field("prompt_tokens", integer().min(0.0)),
            field("total_tokens", integer().min(0.0)),
        ]),
    )
    .define(
        "ChatCompletionObject",
        object([
            field("id", string()),
            field("choices", array(reference("ChatCompletionChoice"))),
            field("created", integer()).describe("Unix timestamp in seconds."),
            field("model", string()),
            field("system_fingerprint", string()).optional(),
            tag("object", "chat.completion"),
            field("usage", reference("CompletionUsage")),
        ]),
    )
    .define(
        "ChatCompletionChunkChoice",
        object([
            field("delta", reference("ChatCompletionChoiceContent")),
            field("logprobs", reference("ChatCompletionLogprobs")).optional(),
            field("finish_reason", reference("FinishReason")).optional(),
            field("index", integer().min(0.0)),
        ]),
    )
    .define(
        "ChatCompletionChunkObject",
        object([
            field("id", string()),
            field("choices", array(reference("ChatCompletionChunkChoice"))),
            field("created", integer()),
            field("model", string()),
            field("system_fingerprint", string()).optional(),
            tag("object", "chat.completion.chunk"),
            field("usage", reference("CompletionUsage")).optional(),
        ]),
    );
}
