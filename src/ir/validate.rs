//! Dynamic validation of raw JSON payloads against the schema IR

use serde_json::Value;

use super::catalog::Catalog;
use super::schema::{
    ArraySchema, NumberSchema, ObjectSchema, RecordSchema, Schema, StringSchema, UnionSchema,
};
use crate::error::{Constraint, FieldPath, Result, SchemaError, ValidationReport, Violation};

impl Catalog {
    /// Validate `value` against the definition called `name`, collecting every
    /// violation.
    pub fn validate(&self, name: &str, value: &Value) -> Result<()> {
        let schema = self.require(name)?;
        let violations = self.violations(schema, value);
        if violations.is_empty() {
            return Ok(());
        }
        tracing::debug!(
            provider = %self.provider(),
            schema = name,
            violations = violations.len(),
            "Payload failed schema validation"
        );
        Err(SchemaError::Invalid(ValidationReport::new(name, violations)))
    }

    /// Whether `value` conforms to the definition called `name`. Unknown names
    /// are never valid.
    pub fn is_valid(&self, name: &str, value: &Value) -> bool {
        self.validate(name, value).is_ok()
    }

    /// Violations of an arbitrary schema, resolved against this catalog.
    pub fn violations(&self, schema: &Schema, value: &Value) -> Vec<Violation> {
        let mut out = Vec::new();
        self.check(schema, value, &FieldPath::root(), &[], &mut out);
        out
    }

    /// `seen` holds the references already followed at this value. Meeting
    /// one again means the chain never consumes input (`A -> B -> A`).
    fn check(
        &self,
        schema: &Schema,
        value: &Value,
        path: &FieldPath,
        seen: &[&str],
        out: &mut Vec<Violation>,
    ) {
        match schema {
            Schema::Any => {}
            Schema::Null => {
                if !value.is_null() {
                    out.push(type_violation(path, "null"));
                }
            }
            Schema::Boolean => {
                if !value.is_boolean() {
                    out.push(type_violation(path, "boolean"));
                }
            }
            Schema::String(s) => check_string(s, value, path, out),
            Schema::Number(n) => check_number(n, value, path, out),
            Schema::Literal(expected) => {
                if value != expected {
                    out.push(Violation::new(
                        path.clone(),
                        Constraint::Literal {
                            expected: expected.clone(),
                        },
                    ));
                }
            }
            Schema::Enum(allowed) => {
                if !allowed.contains(value) {
                    out.push(Violation::new(
                        path.clone(),
                        Constraint::Enum {
                            allowed: allowed.clone(),
                        },
                    ));
                }
            }
            Schema::Array(a) => self.check_array(a, value, path, out),
            Schema::Record(r) => self.check_record(r, value, path, out),
            Schema::Object(o) => self.check_object(o, value, path, out),
            Schema::Union(u) => self.check_union(u, value, path, seen, out),
            Schema::Ref(name) if seen.contains(&name.as_str()) => out.push(Violation::new(
                path.clone(),
                Constraint::RefCycle { name: name.clone() },
            )),
            Schema::Ref(name) => match self.get(name) {
                Some(target) => {
                    let mut next = seen.to_vec();
                    next.push(name.as_str());
                    self.check(target, value, path, &next, out)
                }
                None => out.push(Violation::new(
                    path.clone(),
                    Constraint::UnresolvedRef { name: name.clone() },
                )),
            },
        }
    }

    fn check_array(&self, a: &ArraySchema, value: &Value, path: &FieldPath, out: &mut Vec<Violation>) {
        let Some(items) = value.as_array() else {
            out.push(type_violation(path, "array"));
            return;
        };
        if let Some(min) = a.min_items {
            if items.len() < min {
                out.push(Violation::new(
                    path.clone(),
                    Constraint::MinItems {
                        min,
                        actual: items.len(),
                    },
                ));
            }
        }
        if let Some(max) = a.max_items {
            if items.len() > max {
                out.push(Violation::new(
                    path.clone(),
                    Constraint::MaxItems {
                        max,
                        actual: items.len(),
                    },
                ));
            }
        }
        for (i, item) in items.iter().enumerate() {
            self.check(&a.items, item, &path.index(i), &[], out);
        }
    }

    fn check_record(&self, r: &RecordSchema, value: &Value, path: &FieldPath, out: &mut Vec<Violation>) {
        let Some(map) = value.as_object() else {
            out.push(type_violation(path, "object"));
            return;
        };
        if let Some(max) = r.max_properties {
            if map.len() > max {
                out.push(Violation::new(
                    path.clone(),
                    Constraint::MaxProperties {
                        max,
                        actual: map.len(),
                    },
                ));
            }
        }
        for (key, item) in map {
            let child = path.key(key);
            if let Some(max) = r.key_max_length {
                let actual = key.chars().count();
                if actual > max {
                    out.push(Violation::new(child.clone(), Constraint::MaxLength { max, actual }));
                }
            }
            self.check(&r.values, item, &child, &[], out);
        }
    }

    fn check_object(&self, o: &ObjectSchema, value: &Value, path: &FieldPath, out: &mut Vec<Violation>) {
        let Some(map) = value.as_object() else {
            out.push(type_violation(path, "object"));
            return;
        };
        for field in &o.fields {
            let child = path.key(&field.name);
            match map.get(&field.name) {
                None => {
                    if field.is_mandatory() {
                        out.push(Violation::new(child, Constraint::Required));
                    }
                }
                Some(Value::Null) if field.nullable => {}
                Some(item) => self.check(&field.schema, item, &child, &[], out),
            }
        }
    }

    fn check_union(
        &self,
        u: &UnionSchema,
        value: &Value,
        path: &FieldPath,
        seen: &[&str],
        out: &mut Vec<Violation>,
    ) {
        if let Some(tag) = &u.discriminator {
            self.check_tagged(u, tag, value, path, seen, out);
            return;
        }

        // Closest variant wins: right JSON type first, then fewest violations.
        let mut best: Option<(bool, Vec<Violation>)> = None;
        for variant in &u.variants {
            let found = self.violations_at(variant, value, path, seen);
            if found.is_empty() {
                return;
            }
            let type_matches = self.accepts_type(variant, value, &[]);
            let better = match &best {
                None => true,
                Some((best_matches, best_found)) => {
                    (type_matches && !best_matches)
                        || (type_matches == *best_matches && found.len() < best_found.len())
                }
            };
            if better {
                best = Some((type_matches, found));
            }
        }

        match best {
            Some((true, found)) => out.extend(found),
            Some((false, _)) => out.push(type_violation(path, &Schema::Union(u.clone()).type_name())),
            None => out.push(Violation::new(path.clone(), Constraint::NoMatchingVariant)),
        }
    }

    fn check_tagged(
        &self,
        u: &UnionSchema,
        tag: &str,
        value: &Value,
        path: &FieldPath,
        seen: &[&str],
        out: &mut Vec<Violation>,
    ) {
        let Some(map) = value.as_object() else {
            out.push(type_violation(path, "object"));
            return;
        };
        let actual = map.get(tag);
        for variant in &u.variants {
            if let (Some(expected), Some(actual)) = (self.variant_tag(variant, tag), actual) {
                if expected == actual {
                    self.check(variant, value, path, seen, out);
                    return;
                }
            }
        }
        let allowed = u
            .variants
            .iter()
            .filter_map(|v| self.variant_tag(v, tag).cloned())
            .collect();
        out.push(Violation::new(
            path.key(tag),
            Constraint::Discriminator {
                tag: tag.to_string(),
                allowed,
            },
        ));
    }

    fn violations_at(
        &self,
        schema: &Schema,
        value: &Value,
        path: &FieldPath,
        seen: &[&str],
    ) -> Vec<Violation> {
        let mut found = Vec::new();
        self.check(schema, value, path, seen, &mut found);
        found
    }

    /// Shallow JSON-type match, used to pick the closest union variant.
    fn accepts_type(&self, schema: &Schema, value: &Value, seen: &[&str]) -> bool {
        match schema {
            Schema::Any => true,
            Schema::Null => value.is_null(),
            Schema::Boolean => value.is_boolean(),
            Schema::String(_) => value.is_string(),
            Schema::Number(n) => value.is_number() || (n.coerce && value.is_string()),
            Schema::Literal(expected) => same_kind(expected, value),
            Schema::Enum(allowed) => allowed.iter().any(|a| same_kind(a, value)),
            Schema::Array(_) => value.is_array(),
            Schema::Record(_) | Schema::Object(_) => value.is_object(),
            Schema::Union(u) => u.variants.iter().any(|v| self.accepts_type(v, value, seen)),
            Schema::Ref(name) if seen.contains(&name.as_str()) => false,
            Schema::Ref(name) => self.get(name).is_some_and(|target| {
                let mut next = seen.to_vec();
                next.push(name.as_str());
                self.accepts_type(target, value, &next)
            }),
        }
    }
}

fn type_violation(path: &FieldPath, expected: &str) -> Violation {
    Violation::new(
        path.clone(),
        Constraint::Type {
            expected: expected.to_string(),
        },
    )
}

fn same_kind(a: &Value, b: &Value) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

fn check_string(s: &StringSchema, value: &Value, path: &FieldPath, out: &mut Vec<Violation>) {
    let Some(text) = value.as_str() else {
        out.push(type_violation(path, "string"));
        return;
    };
    let length = text.chars().count();
    if let Some(min) = s.min_length {
        if length < min {
            out.push(Violation::new(path.clone(), Constraint::MinLength { min, actual: length }));
        }
    }
    if let Some(max) = s.max_length {
        if length > max {
            out.push(Violation::new(path.clone(), Constraint::MaxLength { max, actual: length }));
        }
    }
    if let Some(pattern) = &s.pattern {
        if !pattern.is_match(text) {
            out.push(Violation::new(
                path.clone(),
                Constraint::Pattern {
                    pattern: pattern.as_str().to_string(),
                },
            ));
        }
    }
    if let Some(format) = s.format {
        if !format.matches(text) {
            out.push(Violation::new(
                path.clone(),
                Constraint::Format {
                    format: format.as_str().to_string(),
                },
            ));
        }
    }
}

/// Numeric value of `value`, honouring string coercion.
fn numeric(n: &NumberSchema, value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) if n.coerce => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn check_number(n: &NumberSchema, value: &Value, path: &FieldPath, out: &mut Vec<Violation>) {
    let expected = if n.integer { "integer" } else { "number" };
    let Some(actual) = numeric(n, value) else {
        out.push(type_violation(path, expected));
        return;
    };
    if n.integer && actual.fract() != 0.0 {
        out.push(type_violation(path, expected));
        return;
    }
    if let Some(minimum) = n.minimum {
        if actual < minimum {
            out.push(Violation::new(path.clone(), Constraint::Minimum { minimum, actual }));
        }
    }
    if let Some(maximum) = n.maximum {
        if actual > maximum {
            out.push(Violation::new(path.clone(), Constraint::Maximum { maximum, actual }));
        }
    }
}
