//! OpenAPI 3.0.3 emitter
//!
//! OpenAPI 3.0 schemas are a JSON Schema dialect without `const`, `null` or
//! `propertyNames`. Literals become single-value enums, nullability becomes
//! `nullable: true`, and key length limits use `x-key-max-length`.
//!
//! A `null` variant of a union folds into `nullable` on the union. A bare
//! `null` schema has no 3.0 equivalent and lowers to `{"enum": [null]}`,
//! which strict readers treat as matching nothing.

use serde_json::{json, Map, Value};

use super::{bound, Emitter, Target};
use crate::error::Result;
use crate::ir::{Catalog, Field, ObjectSchema, Schema, UnionSchema};

pub const OPENAPI_VERSION: &str = "3.0.3";

const COMPONENTS: &str = "#/components/schemas/";

#[derive(Debug, Clone, Default)]
pub struct OpenApiEmitter;

impl OpenApiEmitter {
    pub fn new() -> Self {
        Self
    }

    fn schema(&self, catalog: &Catalog, schema: &Schema) -> Value {
        match schema {
            Schema::Any => json!({}),
            Schema::Null => json!({"enum": [null]}),
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
            Schema::Literal(value) => match json_type(value) {
                Some(kind) => json!({"type": kind, "enum": [value]}),
                None => json!({"enum": [value]}),
            },
            Schema::Enum(values) => match values.first().and_then(json_type) {
                Some(kind) => json!({"type": kind, "enum": values}),
                None => json!({"enum": values}),
            },
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
                    out.insert("x-key-max-length".into(), max.into());
                }
                Value::Object(out)
            }
            Schema::Object(o) => self.object(catalog, o),
            Schema::Union(u) => self.union(catalog, u),
            Schema::Ref(name) => json!({"$ref": format!("{COMPONENTS}{name}")}),
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
        // Siblings of `$ref` are ignored in 3.0, so wrap references that
        // carry annotations.
        let annotated = field.nullable
            || field.description.is_some()
            || field.default.is_some()
            || field.deprecated;
        let mut out = match inner {
            Value::Object(map) if map.contains_key("$ref") && annotated => {
                let mut wrapper = Map::new();
                wrapper.insert("allOf".into(), json!([map]));
                wrapper
            }
            Value::Object(map) => map,
            other => {
                let mut wrapper = Map::new();
                wrapper.insert("allOf".into(), json!([other]));
                wrapper
            }
        };
        if field.nullable {
            out.insert("nullable".into(), true.into());
        }
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
        let nullable = union.variants.iter().any(|v| matches!(v, Schema::Null));
        let mut variants: Vec<Value> = union
            .variants
            .iter()
            .filter(|v| !matches!(v, Schema::Null))
            .map(|variant| {
                let lowered = self.schema(catalog, variant);
                match &union.discriminator {
                    Some(tag) => require_tag(lowered, tag),
                    None => lowered,
                }
            })
            .collect();
        let mut out = match &union.discriminator {
            Some(tag) => {
                let mapping: Map<String, Value> = union
                    .variants
                    .iter()
                    .filter_map(|variant| {
                        let Schema::Ref(name) = variant else {
                            return None;
                        };
                        let value = catalog.variant_tag(variant, tag)?.as_str()?;
                        Some((value.to_string(), Value::from(format!("{COMPONENTS}{name}"))))
                    })
                    .collect();
                let mut discriminator = Map::new();
                discriminator.insert("propertyName".into(), tag.clone().into());
                if !mapping.is_empty() {
                    discriminator.insert("mapping".into(), Value::Object(mapping));
                }
                let mut out = Map::new();
                out.insert("oneOf".into(), Value::Array(variants));
                out.insert("discriminator".into(), Value::Object(discriminator));
                out
            }
            None if variants.len() == 1 => match variants.remove(0) {
                Value::Object(map) if !map.contains_key("$ref") => map,
                other => {
                    let mut wrapper = Map::new();
                    wrapper.insert("allOf".into(), json!([other]));
                    wrapper
                }
            },
            None => {
                let mut out = Map::new();
                out.insert("anyOf".into(), Value::Array(variants));
                out
            }
        };
        if nullable {
            out.insert("nullable".into(), true.into());
        }
        Value::Object(out)
    }

    fn components(&self, catalog: &Catalog) -> Map<String, Value> {
        catalog
            .definitions()
            .map(|(name, schema)| (name.to_string(), self.schema(catalog, schema)))
            .collect()
    }
}

/// Require the discriminator inside a variant even where the variant defaults
/// it. `$ref` takes no siblings in 3.0, so references are wrapped.
fn require_tag(variant: Value, tag: &str) -> Value {
    match variant {
        Value::Object(mut map) if !map.contains_key("$ref") => {
            let required = map
                .entry("required")
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Some(names) = required.as_array_mut() {
                if !names.iter().any(|n| n == tag) {
                    names.push(tag.into());
                }
            }
            Value::Object(map)
        }
        other => json!({"allOf": [other, {"required": [tag]}]}),
    }
}

fn json_type(value: &Value) -> Option<&'static str> {
    match value {
        Value::String(_) => Some("string"),
        Value::Bool(_) => Some("boolean"),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some("integer"),
        Value::Number(_) => Some("number"),
        _ => None,
    }
}

impl Emitter for OpenApiEmitter {
    fn target(&self) -> Target {
        Target::OpenApi
    }

    fn emit(&self, catalog: &Catalog) -> Result<Value> {
        catalog.check_references()?;
        Ok(json!({
            "openapi": OPENAPI_VERSION,
            "info": {
                "title": format!("{} schemas", catalog.provider()),
                "version": env!("CARGO_PKG_VERSION"),
            },
            "paths": {},
            "components": {"schemas": self.components(catalog)},
        }))
    }

    /// The component schema for `name`. References point into
    /// `#/components/schemas`.
    fn emit_definition(&self, catalog: &Catalog, name: &str) -> Result<Value> {
        let schema = catalog.require(name)?;
        catalog.check_references()?;
        Ok(self.schema(catalog, schema))
    }
}
