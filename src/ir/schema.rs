//! Schema IR types and builder DSL
//!
//! A `Schema` is the canonical, provider-independent description of a
//! payload shape and its constraints. Catalogs are written with the small
//! builder DSL at the bottom of this module:
//!
//! ```
//! use open_schemas::ir::*;
//!
//! let usage = object([
//!     field("input_tokens", integer().min(0.0)),
//!     field("output_tokens", integer().min(0.0)),
//! ]);
//! assert_eq!(usage.fields.len(), 2);
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Scheme followed by a non-empty, whitespace-free remainder.
static URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:[^\s]+$").expect("URI pattern is valid")
});

/// Well-known string formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    /// RFC 3339 timestamp.
    DateTime,
    /// Absolute URI with a scheme.
    Uri,
}

impl StringFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            StringFormat::DateTime => "date-time",
            StringFormat::Uri => "uri",
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            StringFormat::DateTime => chrono::DateTime::parse_from_rfc3339(text).is_ok(),
            StringFormat::Uri => URI.is_match(text),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub format: Option<StringFormat>,
}

impl StringSchema {
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn format(mut self, format: StringFormat) -> Self {
        self.format = Some(format);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberSchema {
    pub integer: bool,
    /// Inclusive lower bound.
    pub minimum: Option<f64>,
    /// Inclusive upper bound.
    pub maximum: Option<f64>,
    /// Accept numeric strings (query parameters).
    pub coerce: bool,
}

impl NumberSchema {
    pub fn min(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn max(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    pub fn range(self, minimum: f64, maximum: f64) -> Self {
        self.min(minimum).max(maximum)
    }

    pub fn coerce(mut self) -> Self {
        self.coerce = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ArraySchema {
    pub items: Box<Schema>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

impl ArraySchema {
    pub fn min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }
}

/// String-keyed map with uniform values.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    pub values: Box<Schema>,
    pub max_properties: Option<usize>,
    pub key_max_length: Option<usize>,
}

impl RecordSchema {
    pub fn max_properties(mut self, max: usize) -> Self {
        self.max_properties = Some(max);
        self
    }

    pub fn key_max_length(mut self, max: usize) -> Self {
        self.key_max_length = Some(max);
        self
    }
}

/// A named property of an object.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub schema: Schema,
    pub required: bool,
    pub nullable: bool,
    pub default: Option<Value>,
    pub description: Option<String>,
    pub deprecated: bool,
}

impl Field {
    /// May be absent or `null`.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self.nullable = true;
        self
    }

    /// Must be present but may be `null`.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Missing values are an error only when there is nothing to fill in.
    pub fn is_mandatory(&self) -> bool {
        self.required && self.default.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    pub fields: Vec<Field>,
}

impl ObjectSchema {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Intersection: append fields, replacing same-named ones.
    pub fn extend(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        for field in fields {
            match self.fields.iter_mut().find(|f| f.name == field.name) {
                Some(existing) => *existing = field,
                None => self.fields.push(field),
            }
        }
        self
    }

    /// Keep only the named fields.
    pub fn pick(mut self, names: &[&str]) -> Self {
        self.fields.retain(|f| names.contains(&f.name.as_str()));
        self
    }

    /// Drop the named fields.
    pub fn omit(mut self, names: &[&str]) -> Self {
        self.fields.retain(|f| !names.contains(&f.name.as_str()));
        self
    }

    /// Make every field optional.
    pub fn partial(mut self) -> Self {
        self.fields = self.fields.into_iter().map(Field::optional).collect();
        self
    }
}

#[derive(Debug, Clone)]
pub struct UnionSchema {
    pub variants: Vec<Schema>,
    /// Property whose literal value selects the variant.
    pub discriminator: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Schema {
    Any,
    Null,
    Boolean,
    String(StringSchema),
    Number(NumberSchema),
    Literal(Value),
    Enum(Vec<Value>),
    Array(ArraySchema),
    Record(RecordSchema),
    Object(ObjectSchema),
    Union(UnionSchema),
    /// Named definition in the same catalog.
    Ref(String),
}

impl Schema {
    /// JSON type name used in diagnostics.
    pub fn type_name(&self) -> String {
        match self {
            Schema::Any => "any".to_string(),
            Schema::Null => "null".to_string(),
            Schema::Boolean => "boolean".to_string(),
            Schema::String(_) => "string".to_string(),
            Schema::Number(n) if n.integer => "integer".to_string(),
            Schema::Number(_) => "number".to_string(),
            Schema::Literal(v) => v.to_string(),
            Schema::Enum(_) => "enum".to_string(),
            Schema::Array(_) => "array".to_string(),
            Schema::Record(_) | Schema::Object(_) => "object".to_string(),
            Schema::Union(u) => u
                .variants
                .iter()
                .map(Schema::type_name)
                .collect::<Vec<_>>()
                .join(" | "),
            Schema::Ref(name) => name.clone(),
        }
    }
}

impl From<StringSchema> for Schema {
    fn from(s: StringSchema) -> Self {
        Schema::String(s)
    }
}

impl From<NumberSchema> for Schema {
    fn from(n: NumberSchema) -> Self {
        Schema::Number(n)
    }
}

impl From<ArraySchema> for Schema {
    fn from(a: ArraySchema) -> Self {
        Schema::Array(a)
    }
}

impl From<RecordSchema> for Schema {
    fn from(r: RecordSchema) -> Self {
        Schema::Record(r)
    }
}

impl From<ObjectSchema> for Schema {
    fn from(o: ObjectSchema) -> Self {
        Schema::Object(o)
    }
}

impl From<UnionSchema> for Schema {
    fn from(u: UnionSchema) -> Self {
        Schema::Union(u)
    }
}

// ============================================================================
// Builder DSL
// ============================================================================

pub fn any() -> Schema {
    Schema::Any
}

pub fn null() -> Schema {
    Schema::Null
}

pub fn boolean() -> Schema {
    Schema::Boolean
}

pub fn string() -> StringSchema {
    StringSchema::default()
}

pub fn number() -> NumberSchema {
    NumberSchema::default()
}

pub fn integer() -> NumberSchema {
    NumberSchema {
        integer: true,
        ..NumberSchema::default()
    }
}

pub fn literal(value: impl Into<Value>) -> Schema {
    Schema::Literal(value.into())
}

pub fn enumeration(values: &[&str]) -> Schema {
    Schema::Enum(values.iter().map(|v| Value::from(*v)).collect())
}

pub fn array(items: impl Into<Schema>) -> ArraySchema {
    ArraySchema {
        items: Box::new(items.into()),
        min_items: None,
        max_items: None,
    }
}

pub fn record(values: impl Into<Schema>) -> RecordSchema {
    RecordSchema {
        values: Box::new(values.into()),
        max_properties: None,
        key_max_length: None,
    }
}

pub fn object(fields: impl IntoIterator<Item = Field>) -> ObjectSchema {
    ObjectSchema {
        fields: fields.into_iter().collect(),
    }
}

pub fn union(variants: impl IntoIterator<Item = Schema>) -> UnionSchema {
    UnionSchema {
        variants: variants.into_iter().collect(),
        discriminator: None,
    }
}

pub fn tagged_union(tag: &str, variants: impl IntoIterator<Item = Schema>) -> UnionSchema {
    UnionSchema {
        variants: variants.into_iter().collect(),
        discriminator: Some(tag.to_string()),
    }
}

pub fn reference(name: &str) -> Schema {
    Schema::Ref(name.to_string())
}

pub fn field(name: &str, schema: impl Into<Schema>) -> Field {
    Field {
        name: name.to_string(),
        schema: schema.into(),
        required: true,
        nullable: false,
        default: None,
        description: None,
        deprecated: false,
    }
}

/// Literal tag property that defaults to its only value.
pub fn tag(name: &str, value: &str) -> Field {
    field(name, literal(value)).default(value)
}
