//! JSON Schema (draft 2020-12) emitter

use serde_json::{json, Map, Value};

use super::{bound, Emitter, Target};
use crate::error::Result;
use crate::ir::{Catalog, Field, ObjectSchema, Schema, UnionSchema};

pub const DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

#[derive(Debug, Clone, Default)]
pub struct JsonSchemaEmitter;

impl JsonSchemaEmitter {
    pub fn new() -> Self {
        Self
    }

    fn definitions(&self, catalog: &Catalog) -> Map<String, Value> {
        catalog
            .definitions()
            .map(|(name, schema)| (name.to_string(), self.schema(catalog, schema)))
            .collect()
    }

    fn schema(&self, catalog: &Catalog, schema: &Schema) -> Value {
        match schema {
            Schema::Any => json!({}),
            Schema::Null => json!({"type": "null"}),
            Schema::Boolean => json!({"type": "boolean"}),
            Schema::String(s) => {
                let mut out = Map::new();
                out.insert("type".into(), "string".into());
                if let Some(min) = s.min_length {
                    out.insert("minLength".into(), min.into());
                }
                if let Some(max) = s.max_length {
                    out.insert("maxLength".into(), max.into());
                }
                if let Some(pattern) = &s.pattern {
                    out.insert("pattern".into(), pattern.as_str().into());
                }
                if let Some(format) = s.format {
                    out.insert("format".into(), format.as_str().into());
                }
                Value::Object(out)
            }
            Schema::Number(n) => {
                let mut out = Map::new();
                let kind = if n.integer { "integer" } else { "number" };
                out.insert("type".into(), kind.into());
                if let Some(min) = n.minimum {
                    out.insert("minimum".into(), bound(min));
                }
                if let Some(max) = n.maximum {
                    out.insert("maximum".into(), bound(max));
                }
                if n.coerce {
                    out.insert("x-coerce".into(), true.into());
                }
                Value::Object(out)
            }
            Schema::Literal(value) => json!({"const": value}),
            Schema::Enum(values) => json!({"enum": values}),
            Schema::Array(a) => {
                let mut out = Map::new();
                out.insert("type".into(), "array".into());
                out.insert("items".into(), self.schema(catalog, &a.items));
                if let Some(min) = a.min_items {
                    out.insert("minItems".into(), min.into());
                }
                if let Some(max) = a.max_items {
                    out.insert("maxItems".into(), max.into());
                }
                Value::Object(out)
            }
            Schema::Record(r) => {
                let mut out = Map::new();
                out.insert("type".into(), "object".into());
                out.insert("additionalProperties".into(), self.schema(catalog, &r.values));
                if let Some(max) = r.max_properties {
                    out.insert("maxProperties".into(), max.into());
                }
                if let Some(max) = r.key_max_length {
                    out.insert("propertyNames".into(), json!({"maxLength": max}));
                }
                Value::Object(out)
            }
            Schema::Object(o) => self.object(catalog, o),
            Schema::Union(u) => self.union(catalog, u),
            Schema::Ref(name) => json!({"$ref": format!("#/$defs/{name}")}),
        }
    }

    fn object(&self, catalog: &Catalog, object: &ObjectSchema) -> Value {
        let properties: Map<String, Value> = object
            .fields
            .iter()
            .map(|f| (f.name.clone(), self.property(catalog, f)))
            .collect();
        let required: Vec<&str> = object
            .fields
            .iter()
            .filter(|f| f.is_mandatory())
            .map(|f| f.name.as_str())
            .collect();

        let mut out = Map::new();
        out.insert("type".into(), "object".into());
        out.insert("properties".into(), Value::Object(properties));
        if !required.is_empty() {
            out.insert("required".into(), json!(required));
        }
        Value::Object(out)
    }

    fn property(&self, catalog: &Catalog, field: &Field) -> Value {
        let inner = self.schema(catalog, &field.schema);
        let mut out = if field.nullable {
            let mut wrapper = Map::new();
            wrapper.insert("anyOf".into(), json!([inner, {"type": "null"}]));
            wrapper
        } else {
            match inner {
                Value::Object(map) => map,
                other => {
                    let mut wrapper = Map::new();
                    wrapper.insert("allOf".into(), json!([other]));
                    wrapper
                }
            }
        };
        if let Some(description) = &field.description {
            out.insert("description".into(), description.clone().into());
        }
        if let Some(default) = &field.default {
            out.insert("default".into(), default.clone());
        }
        if field.deprecated {
            out.insert("deprecated".into(), true.into());
        }
        Value::Object(out)
    }

    fn union(&self, catalog: &Catalog, union: &UnionSchema) -> Value {
        match &union.discriminator {
            // The tag is required inside a discriminated union even where
            // the variant itself defaults it.
            Some(tag) => {
                let variants: Vec<Value> = union
                    .variants
                    .iter()
                    .map(|variant| {
                        let mut lowered = self.schema(catalog, variant);
                        if let Some(map) = lowered.as_object_mut() {
                            let required = map
                                .entry("required")
                                .or_insert_with(|| Value::Array(Vec::new()));
                            if let Some(names) = required.as_array_mut() {
                                if !names.iter().any(|n| n == tag.as_str()) {
                                    names.push(tag.as_str().into());
                                }
                            }
                        }
                        lowered
                    })
                    .collect();
                json!({"oneOf": variants})
            }
            None => {
                let variants: Vec<Value> = union
                    .variants
                    .iter()
                    .map(|variant| self.schema(catalog, variant))
                    .collect();
                json!({"anyOf": variants})
            }
        }
    }
}

impl Emitter for JsonSchemaEmitter {
    fn target(&self) -> Target {
        Target::JsonSchema
    }

    fn emit(&self, catalog: &Catalog) -> Result<Value> {
        catalog.check_references()?;
        Ok(json!({
            "$schema": DIALECT,
            "title": format!("{} schemas", catalog.provider()),
            "$defs": self.definitions(catalog),
        }))
    }

    /// A self-contained document whose root is the named definition.
    fn emit_definition(&self, catalog: &Catalog, name: &str) -> Result<Value> {
        catalog.require(name)?;
        catalog.check_references()?;
        Ok(json!({
            "$schema": DIALECT,
            "$ref": format!("#/$defs/{name}"),
            "$defs": self.definitions(catalog),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Provider;
    use crate::ir::*;
    use pretty_assertions::assert_eq;

    fn catalog() -> Catalog {
        let mut c = Catalog::new(Provider::Anthropic);
        c.define("TextContent", object([tag("type", "text"), field("text", string())]))
            .define(
                "ImageContent",
                object([tag("type", "image"), field("source", any())]),
            )
            .define(
                "Content",
                tagged_union("type", [reference("TextContent"), reference("ImageContent")]),
            )
            .define(
                "Request",
                object([
                    field("max_tokens", integer().min(1.0)),
                    field("temperature", number().range(0.0, 1.0))
                        .optional()
                        .default(1),
                    field("content", union([string().into(), array(reference("Content")).into()])),
                    field("metadata", record(string().max_length(512)).key_max_length(64))
                        .optional()
                        .describe("Key-value pairs."),
                    field("status", enumeration(&["a", "b"])).optional().deprecated(),
                ]),
            );
        c
    }

    #[test]
    fn test_object_lowering() {
        let document = JsonSchemaEmitter::new().emit(&catalog()).unwrap();
        assert_eq!(document["$schema"], DIALECT);
        assert_eq!(
            document["$defs"]["Request"],
            json!({
                "type": "object",
                "properties": {
                    "max_tokens": {"type": "integer", "minimum": 1},
                    "temperature": {
                        "anyOf": [{"type": "number", "minimum": 0, "maximum": 1}, {"type": "null"}],
                        "default": 1
                    },
                    "content": {
                        "anyOf": [
                            {"type": "string"},
                            {"type": "array", "items": {"$ref": "#/$defs/Content"}}
                        ]
                    },
                    "metadata": {
                        "anyOf": [
                            {
                                "type": "object",
                                "additionalProperties": {"type": "string", "maxLength": 512},
                                "propertyNames": {"maxLength": 64}
                            },
                            {"type": "null"}
                        ],
                        "description": "Key-value pairs."
                    },
                    "status": {
                        "anyOf": [{"enum": ["a", "b"]}, {"type": "null"}],
                        "deprecated": true
                    }
                },
                "required": ["max_tokens", "content"]
            })
        );
    }

    #[test]
    fn test_tags_and_discriminated_unions() {
        let document = JsonSchemaEmitter::new().emit(&catalog()).unwrap();
        assert_eq!(
            document["$defs"]["TextContent"],
            json!({
                "type": "object",
                "properties": {
                    "type": {"const": "text", "default": "text"},
                    "text": {"type": "string"}
                },
                "required": ["text"]
            })
        );
        assert_eq!(
            document["$defs"]["Content"],
            json!({"oneOf": [
                {"$ref": "#/$defs/TextContent", "required": ["type"]},
                {"$ref": "#/$defs/ImageContent", "required": ["type"]}
            ]})
        );
    }

    #[test]
    fn test_definition_document() {
        let emitter = JsonSchemaEmitter::new();
        let document = emitter.emit_definition(&catalog(), "Request").unwrap();
        assert_eq!(document["$ref"], "#/$defs/Request");
        assert!(emitter.emit_definition(&catalog(), "Missing").is_err());
    }

    #[test]
    fn test_dangling_reference_is_an_error() {
        let mut c = catalog();
        c.define("Broken", array(reference("Nowhere")));
        let err = JsonSchemaEmitter::new().emit(&c).unwrap_err();
        assert!(err.to_string().contains("Nowhere"));
    }
}
