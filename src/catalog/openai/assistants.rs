//! Assistants API definitions

use super::{deleted, list_of};
use crate::ir::*;
use crate::schemas::{
    FUNCTION_NAME_MAX_LENGTH, FUNCTION_NAME_PATTERN, METADATA_KEY_MAX_LENGTH, METADATA_MAX_PAIRS,
    METADATA_VALUE_MAX_LENGTH,
};

/// `id` and `created_at` shared by every stored object.
fn object_meta() -> [Field; 2] {
    [
        field("id", string()),
        field("created_at", integer()).describe("Unix timestamp in seconds."),
    ]
}

fn metadata() -> Field {
    field("metadata", reference("Metadata")).optional()
}

fn assistant_object() -> ObjectSchema {
    object(object_meta())
        .extend([
            tag("object", "assistant"),
            field("name", string().max_length(256)).optional(),
            field("description", string().max_length(512)).optional(),
            field("model", string()),
            field("instructions", string().max_length(32768)).optional(),
            field("tools", array(reference("Tool")).max_items(128)).optional(),
            field("file_ids", array(string()).max_items(20)).optional(),
            metadata(),
        ])
}

fn create_run_request() -> ObjectSchema {
    object([
        field("assistant_id", string()),
        field("model", string()).optional(),
        field("instructions", string()).optional(),
        field("additional_instructions", string())
            .optional()
            .describe("Appended to the assistant instructions for this run only."),
        field("tools", array(reference("Tool"))).optional(),
        metadata(),
        field("temperature", number().range(0.0, 1.0))
            .optional()
            .default(1),
        field("stream", boolean()).optional().default(false),
    ])
}

fn delete_response(object_tag: &str) -> ObjectSchema {
    object([field("id", string()), deleted(), tag("object", object_tag)])
}

pub(super) fn define(c: &mut Catalog) {
    c.define(
        "Metadata",
        record(string().max_length(METADATA_VALUE_MAX_LENGTH))
            .max_properties(METADATA_MAX_PAIRS)
            .key_max_length(METADATA_KEY_MAX_LENGTH),
    );

    // Tools
    c.define(
        "CodeInterpreterTool",
        object([tag("type", "code_interpreter")]),
    )
    .define("RetrievalTool", object([tag("type", "retrieval")]))
    .define(
        "FunctionDefinition",
        object([
            field("description", string()),
            field(
                "name",
                string()
                    .max_length(FUNCTION_NAME_MAX_LENGTH)
                    .pattern(FUNCTION_NAME_PATTERN.clone()),
            ),
            field("parameters", record(any()))
                .describe("JSON Schema of the function parameters."),
        ]),
    )
    .define(
        "FunctionTool",
        object([
            tag("type", "function"),
            field("function", reference("FunctionDefinition")),
        ]),
    )
    .define(
        "Tool",
        tagged_union(
            "type",
            [
                reference("CodeInterpreterTool"),
                reference("RetrievalTool"),
                reference("FunctionTool"),
            ],
        ),
    );

    // Assistants
    c.define("AssistantObject", assistant_object())
        .define(
            "AssistantFileObject",
            object(object_meta()).extend([
                tag("object", "assistant.file"),
                field("assistant_id", string()),
            ]),
        )
        .define(
            "CreateAssistantRequest",
            assistant_object().omit(&["id", "created_at", "object"]),
        )
        .define(
            "CreateAssistantFileRequest",
            object([field("file_id", string())]),
        )
        .define(
            "ModifyAssistantRequest",
            assistant_object()
                .omit(&["id", "created_at", "object"])
                .partial(),
        );

    // Threads & messages
    c.define(
        "ThreadObject",
        object(object_meta()).extend([tag("object", "thread"), metadata()]),
    )
    .define("FileRef", object([field("file_id", string())]))
    .define(
        "MessageImageFileContent",
        object([
            tag("type", "image_file"),
            field("image_file", reference("FileRef")),
        ]),
    )
    .define(
        "FileCitationAnnotation",
        object([
            tag("type", "file_citation"),
            field("text", string()),
            field(
                "file_citation",
                object([field("file_id", string()), field("quote", string())]),
            ),
            field("start_index", integer().min(0.0)),
            field("end_index", integer().min(0.0)),
        ]),
    )
    .define(
        "FilePathAnnotation",
        object([
            tag("type", "file_path"),
            field("text", string()),
            field("file_path", reference("FileRef")),
            field("start_index", integer().min(0.0)),
            field("end_index", integer().min(0.0)),
        ]),
    )
    .define(
        "MessageAnnotation",
        tagged_union(
            "type",
            [
                reference("FileCitationAnnotation"),
                reference("FilePathAnnotation"),
            ],
        ),
    )
    .define(
        "MessageText",
        object([
            field("value", string()),
            field("annotations", array(reference("MessageAnnotation"))).optional(),
        ]),
    )
    .define(
        "MessageTextContent",
        object([tag("type", "text"), field("text", reference("MessageText"))]),
    )
    .define(
        "MessageContent",
        tagged_union(
            "type",
            [
                reference("MessageImageFileContent"),
                reference("MessageTextContent"),
            ],
        ),
    )
    .define("MessageRole", enumeration(&["user", "assistant"]))
    .define(
        "MessageObject",
        object(object_meta()).extend([
            tag("object", "thread.message"),
            field("thread_id", string()),
            field("status", enumeration(&["in_progress", "incomplete", "completed"])).optional(),
            field("incomplete_details", object([field("reason", string())])).optional(),
            field("completed_at", integer()).optional(),
            field("incomplete_at", integer()).optional(),
            field("role", reference("MessageRole")),
            field("content", array(reference("MessageContent"))),
            field("assistant_id", string()).optional(),
            field("run_id", string()).optional(),
            field("file_ids", array(string()).max_items(10)).optional(),
            metadata(),
        ]),
    )
    .define(
        "MessageFileObject",
        object(object_meta()).extend([
            tag("object", "thread.message.file"),
            field("message_id", string()),
        ]),
    )
    .define(
        "CreateMessageRequest",
        object([
            field("role", reference("MessageRole")),
            field("content", string()),
            field("file_ids", array(string()).max_items(10)).optional(),
        ]),
    )
    .define(
        "CreateThreadRequest",
        object([
            field("messages", array(reference("CreateMessageRequest"))).optional(),
            metadata(),
        ]),
    )
    .define("ModifyThreadRequest", object([metadata()]))
    .define("ModifyMessageRequest", object([metadata()]));

    // Tool calls
    c.define(
        "CodeInterpreterLogOutput",
        object([tag("type", "logs"), field("logs", string())]),
    )
    .define(
        "CodeInterpreterImageOutput",
        object([tag("type", "image"), field("image", reference("FileRef"))]),
    )
    .define(
        "CodeInterpreterOutput",
        tagged_union(
            "type",
            [
                reference("CodeInterpreterImageOutput"),
                reference("CodeInterpreterLogOutput"),
            ],
        ),
    )
    .define(
        "CodeInterpreterToolCall",
        object([
            field("id", string()),
            tag("type", "code_interpreter"),
            field(
                "code_interpreter",
                object([
                    field("input", string()),
                    field("outputs", array(reference("CodeInterpreterOutput"))),
                ]),
            ),
        ]),
    )
    .define(
        "RetrievalToolCall",
        object([
            field("id", string()),
            tag("type", "retrieval"),
            field("retrieval", record(any())).optional(),
        ]),
    )
    .define(
        "FunctionToolCall",
        object([
            field("id", string()),
            tag("type", "function"),
            field(
                "function",
                object([
                    field("name", string()),
                    field("arguments", string()),
                    field("output", string()).optional(),
                ]),
            ),
        ]),
    )
    .define(
        "ToolCall",
        tagged_union(
            "type",
            [
                reference("CodeInterpreterToolCall"),
                reference("RetrievalToolCall"),
                reference("FunctionToolCall"),
            ],
        ),
    )
    .define(
        "SubmitToolOutputsAction",
        object([
            tag("type", "submit_tool_outputs"),
            field(
                "submit_tool_outputs",
                object([field("tool_calls", array(reference("FunctionToolCall")))]),
            ),
        ]),
    );

    // Runs & steps
    c.define(
        "Usage",
        object([
            field("completion_tokens", integer().min(0.0)),
            field("prompt_tokens", integer().min(0.0)),
            field("total_tokens", integer().min(0.0)),
        ]),
    )
    .define(
        "RunStatus",
        enumeration(&[
            "queued",
            "in_progress",
            "requires_action",
            "cancelling",
            "cancelled",
            "failed",
            "completed",
            "expired",
        ]),
    )
    .define(
        "RunObject",
        object(object_meta()).extend([
            tag("object", "thread.run"),
            field("thread_id", string()),
            field("assistant_id", string()),
            field("status", reference("RunStatus")),
            field("required_action", reference("SubmitToolOutputsAction")).optional(),
            field(
                "last_error",
                object([
                    field(
                        "code",
                        enumeration(&["server_error", "rate_limit_exceeded", "invalid_prompt"]),
                    ),
                    field("message", string()),
                ]),
            )
            .optional(),
            field("expires_at", integer()).optional(),
            field("started_at", integer()).optional(),
            field("cancelled_at", integer()).optional(),
            field("failed_at", integer()).optional(),
            field("completed_at", integer()).optional(),
            field("model", string()).optional(),
            field("instructions", string()).optional(),
            field("tools", array(reference("Tool"))).optional(),
            field("file_ids", array(string())).optional(),
            metadata(),
            field("usage", reference("Usage")).optional(),
            field("temperature", number().range(0.0, 1.0))
                .optional()
                .default(1),
        ]),
    )
    .define(
        "MessageCreationDetail",
        object([
            tag("type", "message_creation"),
            field("message_creation", object([field("message_id", string())])),
        ]),
    )
    .define(
        "ToolCallsDetail",
        object([
            tag("type", "tool_calls"),
            field("tool_calls", array(reference("ToolCall"))),
        ]),
    )
    .define(
        "StepDetails",
        tagged_union(
            "type",
            [
                reference("MessageCreationDetail"),
                reference("ToolCallsDetail"),
            ],
        ),
    )
    .define(
        "StepObject",
        object(object_meta()).extend([
            tag("object", "thread.run.step"),
            field("assistant_id", string()),
            field("thread_id", string()),
            field("run_id", string()),
            field("type", enumeration(&["message_creation", "tool_calls"])),
            field(
                "status",
                enumeration(&["in_progress", "cancelled", "failed", "completed", "expired"]),
            ),
            field("step_details", reference("StepDetails")),
            field(
                "last_error",
                object([
                    field("code", enumeration(&["server_error", "rate_limit_exceeded"])),
                    field("message", string()),
                ]),
            )
            .optional(),
            field("expired_at", integer()).optional(),
            field("cancelled_at", integer()).optional(),
            field("failed_at", integer()).optional(),
            field("completed_at", integer()).optional(),
            metadata(),
            field("usage", reference("Usage")).optional(),
        ]),
    );

    // Run requests
    c.define("CreateRunRequest", create_run_request())
        .define(
            "CreateThreadAndRunRequest",
            create_run_request()
                .extend([field("thread", reference("CreateThreadRequest")).optional()]),
        )
        .define("ModifyRunRequest", object([metadata()]))
        .define(
            "ToolOutput",
            object([
                field("tool_call_id", string()),
                field("output", string()).optional(),
            ]),
        )
        .define(
            "SubmitToolOutputsToRunRequest",
            object([
                field("tool_outputs", array(reference("ToolOutput"))),
                field("stream", boolean()).optional().default(false),
            ]),
        );

    // Deletion responses and lists
    c.define("DeleteAssistantResponse", delete_response("assistant.deleted"))
        .define(
            "DeleteAssistantFileResponse",
            delete_response("assistant.file.deleted"),
        )
        .define("DeleteThreadResponse", delete_response("thread.deleted"))
        .define("DeleteMessageResponse", delete_response("thread.message.deleted"))
        .define("ListAssistantsResponse", list_of("AssistantObject"))
        .define("ListAssistantFilesResponse", list_of("AssistantFileObject"))
        .define("ListMessagesResponse", list_of("MessageObject"))
        .define("ListMessageFilesResponse", list_of("MessageFileObject"))
        .define("ListRunsResponse", list_of("RunObject"))
        .define("ListRunStepsResponse", list_of("StepObject"));

    // Parameters
    c.define(
        "Pagination",
        object([
            field("limit", integer().range(1.0, 100.0).coerce())
                .default(20)
                .describe("Between 1 and 100."),
            field("after", string())
                .optional()
                .describe("Object ID to list after."),
            field("before", string())
                .optional()
                .describe("Object ID to list before."),
        ]),
    )
    .define(
        "Ordering",
        object([field("order", enumeration(&["asc", "desc"]))
            .optional()
            .default("desc")]),
    );

    // Unified response
    c.define(
        "AssistantResponse",
        object([
            field("content", reference("MessageTextContent")).optional(),
            field("tool_calls", array(reference("ToolCall"))).optional(),
            field("usage", reference("Usage")),
        ]),
    );
}

#[cfg(test)]
mod tests {
    use crate::catalog::Provider;
    use serde_json::json;

    #[test]
    fn test_assistant_limits() {
        let c = Provider::OpenAi.catalog();
        let request = json!({
            "model": "gpt-4",
            "name": "n".repeat(257),
            "tools": [{"type": "function", "function": {"description": "d", "name": "bad name", "parameters": {}}}],
            "file_ids": vec!["file"; 21],
        });
        let err = c.validate("CreateAssistantRequest", &request).unwrap_err();
        let report = err.report().unwrap();
        assert!(report.has_violation_at("name"));
        assert!(report.has_violation_at("tools[0].function.name"));
        assert!(report.has_violation_at("file_ids"));
    }

    #[test]
    fn test_modify_assistant_is_partial() {
        let c = Provider::OpenAi.catalog();
        assert!(c.is_valid("ModifyAssistantRequest", &json!({})));
        assert!(!c.is_valid("CreateAssistantRequest", &json!({})));
        assert!(!c.is_valid("ModifyAssistantRequest", &json!({"description": "d".repeat(513)})));
    }

    #[test]
    fn test_metadata_limits() {
        let c = Provider::OpenAi.catalog();
        let long_key = "k".repeat(65);
        let err = c
            .validate("ModifyThreadRequest", &json!({"metadata": {long_key: "v"}}))
            .unwrap_err();
        assert!(err.report().unwrap().paths()[0].starts_with("metadata"));

        let many: serde_json::Map<_, _> = (0..17).map(|i| (format!("k{i}"), json!("v"))).collect();
        assert!(!c.is_valid("ModifyThreadRequest", &json!({"metadata": many})));
    }

    #[test]
    fn test_thread_and_run_extends_run() {
        let c = Provider::OpenAi.catalog();
        let request = json!({
            "assistant_id": "asst_abc123",
            "thread": {"messages": [{"role": "user", "content": "Explain deep learning"}]}
        });
        assert!(c.is_valid("CreateThreadAndRunRequest", &request));
        assert!(!c.is_valid("CreateThreadAndRunRequest", &json!({"thread": {}})));
    }

    #[test]
    fn test_pagination_coercion() {
        let c = Provider::OpenAi.catalog();
        assert!(c.is_valid("Pagination", &json!({"limit": "50"})));
        assert!(!c.is_valid("Pagination", &json!({"limit": "500"})));
        assert!(!c.is_valid("Pagination", &json!({"limit": "many"})));
        assert_eq!(
            c.apply_defaults("Pagination", json!({})).unwrap(),
            json!({"limit": 20})
        );
    }

    #[test]
    fn test_run_temperature() {
        let c = Provider::OpenAi.catalog();
        let run = |temperature: f64| {
            json!({
                "id": "run_1", "created_at": 0, "thread_id": "t", "assistant_id": "a",
                "status": "queued", "temperature": temperature
            })
        };
        assert!(c.is_valid("RunObject", &run(1.0)));
        assert!(!c.is_valid("RunObject", &run(1.5)));
    }
}
