//! Embeddings, Models and Files definitions

use super::{deleted, list_of};
use crate::ir::*;

pub(super) fn define(c: &mut Catalog) {
    // Embeddings
    c.define(
        "CreateEmbeddingRequest",
        object([
            field(
                "input",
                union([
                    string().min_length(1).into(),
                    array(string()).min_items(1).into(),
                    array(integer().min(0.0)).min_items(1).into(),
                    array(array(integer().min(0.0)).min_items(1))
                        .min_items(1)
                        .into(),
                ]),
            )
            .describe("Text or token input to embed."),
            field("model", string()),
            field("encoding_format", enumeration(&["float", "base64"]))
                .optional()
                .default("float"),
            field("dimensions", integer().min(1.0)).optional(),
            field("user", string()).optional(),
        ]),
    )
    .define(
        "Embedding",
        object([
            field("index", integer().min(0.0)),
            field("embedding", array(number())),
            tag("object", "embedding"),
        ]),
    )
    .define(
        "EmbeddingUsage",
        object([
            field("prompt_tokens", integer().min(0.0)),
            field("total_tokens", integer().min(0.0)),
        ]),
    )
    .define(
        "CreateEmbeddingResponse",
        object([
            field("data", array(reference("Embedding"))),
            field("model", string()),
            tag("object", "list"),
            field("usage", reference("EmbeddingUsage")),
        ]),
    );

    // Models
    c.define(
        "ModelObject",
        object([
            field("id", string()),
            field("created", integer()).optional(),
            tag("object", "model"),
            field("owned_by", string()).default("openai"),
        ]),
    )
    .define(
        "DeleteModelResponse",
        object([field("id", string()), deleted(), tag("object", "model")]),
    )
    .define("ListModelsResponse", list_of("ModelObject"));

    // Files
    c.define(
        "FilePurpose",
        enumeration(&["fine-tune", "fine-tune-results", "assistants", "assistants_output"]),
    )
    .define(
        "FileStatus",
        enumeration(&["uploaded", "processed", "error"]),
    )
    .define(
        "FileObject",
        object([
            field("id", string()),
            field("bytes", integer().min(0.0)).describe("Size in bytes."),
            field("created_at", integer()),
            field("filename", string()),
            tag("object", "file"),
            field("purpose", reference("FilePurpose")),
            field("status", reference("FileStatus")).optional().deprecated(),
            field("status_details", string()).optional().deprecated(),
        ]),
    )
    .define(
        "UploadFile",
        object([
            field("name", string()),
            field("size", integer().range(1.0, 512_000_000.0)),
            field("type", string()).describe("MIME type."),
        ]),
    )
    .define(
        "UploadFileRequest",
        object([
            field("file", reference("UploadFile")),
            field("purpose", enumeration(&["fine-tune", "assistants"])),
        ]),
    )
    .define(
        "DeleteFileResponse",
        object([field("id", string()), tag("object", "file"), deleted()]),
    )
    .define("ListFilesResponse", list_of("FileObject"));
}

#[cfg(test)]
mod tests {
    use crate::catalog::Provider;
    use serde_json::json;

    #[test]
    fn test_embedding_input_forms() {
        let c = Provider::OpenAi.catalog();
        for input in [json!("hi"), json!(["a"]), json!([1, 2]), json!([[1], [2, 3]])] {
            let request = json!({"input": input, "model": "text-embedding-3-small"});
            assert!(c.is_valid("CreateEmbeddingRequest", &request), "{input}");
        }
        for input in [json!(""), json!([]), json!([true]), json!({"text": "a"})] {
            let request = json!({"input": input, "model": "text-embedding-3-small"});
            assert!(!c.is_valid("CreateEmbeddingRequest", &request), "{input}");
        }
    }

    #[test]
    fn test_upload_size_bounds() {
        let c = Provider::OpenAi.catalog();
        let upload = |size: u64| {
            json!({"file": {"name": "a.jsonl", "size": size, "type": "application/jsonl"}, "purpose": "fine-tune"})
        };
        assert!(c.is_valid("UploadFileRequest", &upload(512_000_000)));
        let err = c.validate("UploadFileRequest", &upload(512_000_001)).unwrap_err();
        assert!(err.report().unwrap().has_violation_at("file.size"));
    }

    #[test]
    fn test_model_owner_default() {
        let c = Provider::OpenAi.catalog();
        let filled = c.apply_defaults("ModelObject", json!({"id": "gpt-4"})).unwrap();
        assert_eq!(filled, json!({"id": "gpt-4", "object": "model", "owned_by": "openai"}));
    }
}
