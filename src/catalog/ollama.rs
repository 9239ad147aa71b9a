//! Ollama catalog

use super::{built, Provider};
use crate::ir::*;

pub(super) fn catalog() -> Catalog {
    let mut c = Catalog::new(Provider::Ollama);

    c.define(
        "ChatMessage",
        object([
            field("role", enumeration(&["user", "assistant", "system"])),
            field("content", string()),
            field("images", array(string()))
                .optional()
                .describe("Base64-encoded images."),
        ]),
    )
    .define(
        "ChatOptions",
        object([
            field("mirostat", integer().range(0.0, 2.0)).optional().default(0),
            field("mirostat_eta", number()).optional().default(0.1),
            field("mirostat_tau", number()).optional().default(5.0),
            field("num_ctx", integer()).optional().default(2048),
            field("num_gqa", integer())
                .optional()
                .describe("Required for some models, for example it is 8 for llama2:70b."),
            field("num_gpu", integer()).optional(),
            field("num_thread", integer()).optional(),
            field("repeat_last_n", integer()).optional().default(64),
            field("repeat_penalty", number()).optional().default(1.1),
            field("temperature", number()).optional().default(0.8),
            field("seed", integer()).optional().default(0),
            field("stop", string()).optional(),
            field("tfs_z", number()).optional().default(1),
            field("num_predict", integer()).optional().default(128),
            field("top_k", integer()).optional().default(40),
            field("top_p", number()).optional().default(0.9),
        ]),
    )
    .define(
        "ChatRequest",
        object([
            field("model", string()),
            field("messages", array(reference("ChatMessage")).min_items(1)),
            field("format", enumeration(&["json"])).optional(),
            field("options", reference("ChatOptions")).optional(),
            field("template", string()).optional(),
            field("stream", boolean()).optional(),
            field("keep_alive", string()).optional().default("5m"),
        ]),
    )
    .define(
        "ChatResponse",
        object([
            field("model", string()),
            field("created_at", string().format(StringFormat::DateTime)),
            field("message", reference("ChatMessage")).optional(),
            field("done", boolean()),
            field("total_duration", integer().min(0.0)).optional(),
            field("load_duration", integer().min(0.0)).optional(),
            field("prompt_eval_count", integer().min(0.0)).optional(),
            field("prompt_eval_duration", integer().min(0.0)).optional(),
            field("eval_count", integer().min(0.0)).optional(),
            field("eval_duration", integer().min(0.0)).optional(),
        ]),
    );

    built(c)
}
