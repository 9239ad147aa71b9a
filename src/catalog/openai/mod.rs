//! OpenAI catalog

use super::{built, Provider};
use crate::ir::*;

mod assistants;
mod chat;
mod resources;

pub(super) fn catalog() -> Catalog {
    let mut c = Catalog::new(Provider::OpenAi);
    chat::define(&mut c);
    resources::define(&mut c);
    assistants::define(&mut c);
    built(c)
}

/// `{ object: "list", data: T[], first_id?, last_id?, has_more }`
fn list_of(item: &str) -> ObjectSchema {
    object([
        tag("object", "list"),
        field("data", array(reference(item))),
        field("first_id", string()).optional(),
        field("last_id", string()).optional(),
        field("has_more", boolean()).default(false),
    ])
}

/// `deleted: true` of deletion responses.
fn deleted() -> Field {
    field("deleted", literal(true)).default(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_catalog_is_closed() {
        let c = catalog();
        assert!(c.unresolved_references().is_empty(), "{:?}", c.unresolved_references());
        for name in [
            "CreateChatCompletionRequest",
            "ChatCompletionObject",
            "ChatCompletionChunkObject",
            "CreateEmbeddingRequest",
            "ModelObject",
            "FileObject",
            "AssistantObject",
            "RunObject",
            "StepObject",
            "ListAssistantsResponse",
            "Pagination",
            "AssistantResponse",
        ] {
            assert!(c.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_list_envelope() {
        let c = catalog();
        let list = json!({"object": "list", "data": [{"id": "gpt-4"}]});
        assert!(c.validate("ListModelsResponse", &list).is_ok());

        let err = c
            .validate("ListModelsResponse", &json!({"object": "page", "data": [{}]}))
            .unwrap_err();
        let report = err.report().unwrap();
        assert!(report.has_violation_at("object"));
        assert!(report.has_violation_at("data[0].id"));
    }

    #[test]
    fn test_deleted_must_be_true() {
        let c = catalog();
        assert!(c.is_valid("DeleteModelResponse", &json!({"id": "m"})));
        assert!(!c.is_valid("DeleteModelResponse", &json!({"id": "m", "deleted": false})));
    }
}
