//! Google AI catalog

use super::{built, Provider};
use crate::ir::*;
use crate::schemas::{FUNCTION_NAME_MAX_LENGTH, FUNCTION_NAME_PATTERN};

pub(super) fn catalog() -> Catalog {
    let mut c = Catalog::new(Provider::GoogleAi);

    // Content
    c.define(
        "Blob",
        object([
            field("mimeType", string()),
            field("data", string()).describe("Base64-encoded bytes."),
        ]),
    )
    .define(
        "FunctionCall",
        object([field("name", string()), field("args", any()).optional()]),
    )
    .define(
        "FunctionResponse",
        object([field("name", string()), field("response", any()).optional()]),
    )
    .define(
        "Part",
        object([
            field("text", string()).optional(),
            field("inlineData", reference("Blob")).optional(),
            field("functionCall", reference("FunctionCall")).optional(),
            field("functionResponse", reference("FunctionResponse")).optional(),
        ]),
    )
    .define(
        "Content",
        object([
            field("parts", array(reference("Part"))),
            field("role", string()).optional(),
        ]),
    );

    // Safety
    c.define(
        "FinishReason",
        enumeration(&[
            "FINISH_REASON_UNSPECIFIED",
            "STOP",
            "MAX_TOKENS",
            "SAFETY",
            "RECITATION",
            "OTHER",
        ]),
    )
    .define(
        "HarmCategory",
        enumeration(&[
            "HARM_CATEGORY_UNSPECIFIED",
            "HARM_CATEGORY_DEROGATORY",
            "HARM_CATEGORY_TOXICITY",
            "HARM_CATEGORY_VIOLENCE",
            "HARM_CATEGORY_SEXUAL",
            "HARM_CATEGORY_MEDICAL",
            "HARM_CATEGORY_DANGEROUS",
            "HARM_CATEGORY_HARASSMENT",
            "HARM_CATEGORY_HATE_SPEECH",
            "HARM_CATEGORY_SEXUALLY_EXPLICIT",
            "HARM_CATEGORY_DANGEROUS_CONTENT",
        ]),
    )
    .define(
        "HarmProbability",
        enumeration(&["HARM_PROBABILITY_UNSPECIFIED", "NEGLIGIBLE", "LOW", "MEDIUM", "HIGH"]),
    )
    .define(
        "BlockReason",
        enumeration(&["BLOCK_REASON_UNSPECIFIED", "SAFETY", "OTHER"]),
    )
    .define(
        "HarmBlockThreshold",
        enumeration(&[
            "HARM_BLOCK_THRESHOLD_UNSPECIFIED",
            "BLOCK_LOW_AND_ABOVE",
            "BLOCK_MEDIUM_AND_ABOVE",
            "BLOCK_ONLY_HIGH",
            "BLOCK_NONE",
        ]),
    )
    .define(
        "SafetyRating",
        object([
            field("category", reference("HarmCategory")),
            field("probability", reference("HarmProbability")),
            field("blocked", boolean()).optional(),
        ]),
    )
    .define(
        "SafetySetting",
        object([
            field("category", reference("HarmCategory")),
            field("threshold", reference("HarmBlockThreshold")),
        ]),
    );

    // Response
    c.define(
        "CitationSource",
        object([
            field("startIndex", integer().min(0.0)).optional(),
            field("endIndex", integer().min(0.0)).optional(),
            field("uri", string().format(StringFormat::Uri)).optional(),
            field("license", string()).optional(),
        ]),
    )
    .define(
        "CitationMetadata",
        object([field("citationSources", array(reference("CitationSource")))]),
    )
    .define(
        "Candidate",
        object([
            field("content", reference("Content")),
            field("finishReason", reference("FinishReason")).optional(),
            field("safetyRatings", array(reference("SafetyRating"))).optional(),
            field("citationMetadata", reference("CitationMetadata")).optional(),
            field("tokenCount", integer().min(0.0)).optional(),
            field("index", integer().min(0.0)),
        ]),
    )
    .define(
        "PromptFeedback",
        object([
            field("blockReason", reference("BlockReason")).optional(),
            field("safetyRatings", array(reference("SafetyRating"))).optional(),
        ]),
    )
    .define(
        "UsageMetadata",
        object([
            field("promptTokenCount", integer().min(0.0)),
            field("candidatesTokenCount", integer().min(0.0)).optional(),
            field("totalTokenCount", integer().min(0.0)),
        ]),
    )
    .define(
        "GenerateContentResponse",
        object([
            field("candidates", array(reference("Candidate"))),
            field("promptFeedback", reference("PromptFeedback")).optional(),
            field("usageMetadata", reference("UsageMetadata")).optional(),
        ]),
    );

    // Request
    c.define(
        "FunctionDeclaration",
        object([
            field(
                "name",
                string()
                    .max_length(FUNCTION_NAME_MAX_LENGTH)
                    .pattern(FUNCTION_NAME_PATTERN.clone()),
            ),
            field("description", string()).optional(),
            field("parameters", record(any())).optional(),
        ]),
    )
    .define(
        "Tool",
        object([field(
            "functionDeclarations",
            array(reference("FunctionDeclaration")),
        )
        .optional()]),
    )
    .define(
        "GenerationConfig",
        object([
            field("stopSequences", array(string()).max_items(5)).optional(),
            field("candidateCount", integer().range(1.0, 8.0)).optional(),
            field("maxOutputTokens", integer().min(1.0)).optional(),
            field("temperature", number().range(0.0, 2.0)).optional(),
            field("topP", number().range(0.0, 1.0)).optional(),
            field("topK", integer().min(1.0)).optional(),
        ]),
    )
    .define(
        "GenerateContentRequest",
        object([
            field("contents", array(reference("Content")).min_items(1)),
            field("tools", array(reference("Tool"))).optional(),
            field("safetySettings", array(reference("SafetySetting"))).optional(),
            field("generationConfig", reference("GenerationConfig")).optional(),
            field("systemInstruction", reference("Content")).optional(),
        ]),
    );

    built(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_documented_request() {
        let c = catalog();
        let request = json!({
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
        });
        assert!(c.validate("GenerateContentRequest", &request).is_ok());
    }

    #[test]
    fn test_generation_config_bounds() {
        let c = catalog();
        let err = c
            .validate(
                "GenerateContentRequest",
                &json!({
                    "contents": [],
                    "generationConfig": {"candidateCount": 0, "topK": 0, "stopSequences": ["a", "b", "c", "d", "e", "f"]}
                }),
            )
            .unwrap_err();
        let report = err.report().unwrap();
        for path in [
            "contents",
            "generationConfig.candidateCount",
            "generationConfig.topK",
            "generationConfig.stopSequences",
        ] {
            assert!(report.has_violation_at(path), "{path}: {report}");
        }
    }

    #[test]
    fn test_enums_are_exact() {
        let c = catalog();
        let rating = |category: &str| json!({"category": category, "probability": "LOW"});
        assert!(c.is_valid("SafetyRating", &rating("HARM_CATEGORY_HATE_SPEECH")));
        assert!(!c.is_valid("SafetyRating", &rating("harm_category_hate_speech")));
    }

    #[test]
    fn test_citation_uri_format() {
        let c = catalog();
        assert!(c.is_valid("CitationSource", &json!({"uri": "https://example.com"})));
        let err = c.validate("CitationSource", &json!({"uri": "example"})).unwrap_err();
        assert!(err.report().unwrap().has_violation_at("uri"));
    }
}
