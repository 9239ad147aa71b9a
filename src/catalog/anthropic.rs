//! Anthropic Messages API catalog

use super::{built, Provider};
use crate::ir::*;

pub(super) fn catalog() -> Catalog {
    let mut c = Catalog::new(Provider::Anthropic);

    // Content blocks
    c.define(
        "ImageContentSource",
        object([
            tag("type", "base64"),
            field(
                "media_type",
                enumeration(&["image/jpeg", "image/png", "image/gif", "image/webp"]),
            )
            .optional(),
            field("data", string()),
        ]),
    )
    .define(
        "TextContent",
        object([tag("type", "text"), field("text", string())]),
    )
    .define(
        "ImageContent",
        object([
            tag("type", "image"),
            field("source", reference("ImageContentSource")),
        ]),
    )
    .define(
        "ToolUseContent",
        object([
            tag("type", "tool_use"),
            field("id", string()).describe("Unique identifier for this tool use block."),
            field("name", string()).describe("Name of the tool being used."),
            field("input", record(any()))
                .describe("Input conforming to the tool's input_schema."),
        ]),
    )
    .define(
        "ToolResultContent",
        object([
            tag("type", "tool_result"),
            field("tool_use_id", string()),
            field(
                "content",
                union([string().into(), array(reference("TextContent")).into()]),
            )
            .optional(),
            field("is_error", boolean()).optional(),
        ]),
    )
    .define(
        "Content",
        tagged_union(
            "type",
            [
                reference("TextContent"),
                reference("ImageContent"),
                reference("ToolUseContent"),
                reference("ToolResultContent"),
            ],
        ),
    )
    .define(
        "ResponseContent",
        tagged_union(
            "type",
            [reference("TextContent"), reference("ToolUseContent")],
        ),
    );

    // Requests
    c.define("Role", enumeration(&["user", "assistant"]))
        .define(
            "Message",
            object([
                field("role", reference("Role")),
                field(
                    "content",
                    union([string().into(), array(reference("Content")).into()]),
                )
                .optional(),
            ]),
        )
        .define(
            "Tool",
            object([
                field("name", string()),
                field("description", string()).optional(),
                field("input_schema", record(any()))
                    .describe("JSON schema for the tool input shape."),
            ]),
        )
        .define(
            "CreateMessageRequest",
            object([
                field("model", string()),
                field("messages", array(reference("Message")).min_items(1)),
                field("system", string()).optional(),
                field("max_tokens", integer().min(1.0)),
                field("metadata", object([field("user_id", string())])).optional(),
                field("stop_sequences", array(string())).optional(),
                field("stream", boolean()).optional().default(false),
                field("temperature", number().range(0.0, 1.0))
                    .optional()
                    .default(1),
                field("tools", array(reference("Tool"))).optional(),
                field("top_p", number().range(0.0, 1.0)).optional(),
                field("top_k", integer().min(0.0)).optional(),
            ]),
        );

    // Responses
    c.define(
        "StopReason",
        enumeration(&["end_turn", "max_tokens", "stop_sequence", "tool_use"]),
    )
    .define(
        "MessageUsage",
        object([
            field("input_tokens", integer().min(0.0)),
            field("output_tokens", integer().min(0.0)),
        ]),
    )
    .define(
        "CreateMessageResponse",
        object([
            field("id", string()),
            tag("type", "message"),
            tag("role", "assistant"),
            field("content", array(reference("ResponseContent"))),
            field("model", string()),
            field("stop_reason", reference("StopReason")).nullable(),
            field("stop_sequence", string()).optional(),
            field("usage", reference("MessageUsage")),
        ]),
    )
    .define(
        "ErrorDetail",
        object([field("type", string()), field("message", string())]),
    )
    .define(
        "ErrorResponse",
        object([tag("type", "error"), field("error", reference("ErrorDetail"))]),
    );

    // Streaming
    c.define(
        "StreamMessage",
        object([
            field("id", string()),
            tag("type", "message"),
            tag("role", "assistant"),
            field("content", array(reference("ResponseContent"))).optional(),
            field("model", string()),
            field("stop_reason", reference("StopReason")).optional(),
            field("stop_sequence", string()).optional(),
            field("usage", reference("MessageUsage")),
        ]),
    )
    .define(
        "MessageStartEvent",
        object([
            tag("type", "message_start"),
            field("message", reference("StreamMessage")),
        ]),
    )
    .define(
        "MessageDeltaEvent",
        object([
            tag("type", "message_delta"),
            field(
                "delta",
                object([
                    field("stop_reason", reference("StopReason")).optional(),
                    field("stop_sequence", string()).optional(),
                ]),
            ),
            field("usage", object([field("output_tokens", integer().min(0.0))])),
        ]),
    )
    .define("MessageStopEvent", object([tag("type", "message_stop")]))
    .define(
        "ContentBlockStartEvent",
        object([
            tag("type", "content_block_start"),
            field("index", integer().min(0.0)),
            field("content_block", reference("ResponseContent")),
        ]),
    )
    .define(
        "ContentDelta",
        tagged_union(
            "type",
            [
                object([tag("type", "text_delta"), field("text", string())]).into(),
                object([
                    tag("type", "input_json_delta"),
                    field("partial_json", string()),
                ])
                .into(),
            ],
        ),
    )
    .define(
        "ContentBlockDeltaEvent",
        object([
            tag("type", "content_block_delta"),
            field("index", integer().min(0.0)),
            field("delta", reference("ContentDelta")),
        ]),
    )
    .define(
        "ContentBlockStopEvent",
        object([
            tag("type", "content_block_stop"),
            field("index", integer().min(0.0)),
        ]),
    )
    .define("PingEvent", object([tag("type", "ping")]))
    .define(
        "ErrorEvent",
        object([tag("type", "error"), field("error", reference("ErrorDetail"))]),
    )
    .define(
        "MessageStreamEvent",
        tagged_union(
            "type",
            [
                reference("MessageStartEvent"),
                reference("MessageDeltaEvent"),
                reference("MessageStopEvent"),
                reference("ContentBlockStartEvent"),
                reference("ContentBlockDeltaEvent"),
                reference("ContentBlockStopEvent"),
                reference("PingEvent"),
                reference("ErrorEvent"),
            ],
        ),
    );

    built(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_documented_request_is_valid() {
        let c = catalog();
        let request = json!({
            "model": "claude-3-opus-20240229",
            "max_tokens": 1024,
            "messages": [
                {"role": "user", "content": "Hello, Claude"},
                {"role": "assistant", "content": [{"type": "text", "text": "Hello, How can I assist you today?"}]}
            ]
        });
        assert!(c.validate("CreateMessageRequest", &request).is_ok());
    }

    #[test]
    fn test_request_violations() {
        let c = catalog();
        let request = json!({
            "model": "claude-3-opus-20240229",
            "max_tokens": 0,
            "temperature": 3,
            "messages": []
        });
        let err = c.validate("CreateMessageRequest", &request).unwrap_err();
        let report = err.report().unwrap();
        assert!(report.has_violation_at("max_tokens"));
        assert!(report.has_violation_at("temperature"));
        assert!(report.has_violation_at("messages"));
        assert_eq!(report.len(), 3);
    }

    #[test]
    fn test_stop_reason_must_be_present() {
        let c = catalog();
        let mut response = json!({
            "id": "msg_1",
            "content": [],
            "model": "claude-3",
            "stop_reason": null,
            "usage": {"input_tokens": 1, "output_tokens": 1}
        });
        assert!(c.validate("CreateMessageResponse", &response).is_ok());

        response.as_object_mut().unwrap().remove("stop_reason");
        let err = c.validate("CreateMessageResponse", &response).unwrap_err();
        assert!(err.report().unwrap().has_violation_at("stop_reason"));
    }

    #[test]
    fn test_unknown_block_type() {
        let c = catalog();
        let message = json!({"role": "user", "content": [{"type": "video", "url": "x"}]});
        let err = c.validate("Message", &message).unwrap_err();
        assert!(err.report().unwrap().has_violation_at("content[0].type"));
    }

    #[test]
    fn test_defaults_fill_tags() {
        let c = catalog();
        let filled = c
            .apply_defaults(
                "CreateMessageRequest",
                json!({"model": "claude-3", "max_tokens": 10, "messages": [{"role": "user"}]}),
            )
            .unwrap();
        assert_eq!(filled["stream"], json!(false));
        assert_eq!(filled["temperature"], json!(1));
    }
}
