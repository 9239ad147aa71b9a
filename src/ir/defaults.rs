//! Default filling
//!
//! Produces the value a schema-aware parser would hand back: missing
//! properties that declare a default are filled in, coercible numeric
//! strings become numbers, and whole floats such as `1024.0` become integers
//! where the schema asks for one.

use serde_json::{Number, Value};

use super::catalog::Catalog;
use super::schema::Schema;
use crate::error::Result;

/// Largest magnitude at which every whole `f64` is exact.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fill {
    /// Fill every declared default and keep explicit `null`.
    Defaults,
    /// Shape the value for the typed layer: optional fields that are `null`
    /// are dropped and only mandatory tags and values are filled.
    Typed,
}

impl Catalog {
    /// Fill defaults into `value` according to the definition called `name`.
    /// Values that do not match the schema are left as they are.
    pub fn apply_defaults(&self, name: &str, value: Value) -> Result<Value> {
        let schema = self.require(name)?;
        Ok(self.fill(schema, value, Fill::Defaults, &[]))
    }

    /// Shape a payload the IR accepted so that the typed layer reads the same
    /// thing: omitted required tags are filled, optional `null`s are removed
    /// and whole numbers are made integers.
    pub fn normalize(&self, name: &str, value: Value) -> Result<Value> {
        let schema = self.require(name)?;
        Ok(self.fill(schema, value, Fill::Typed, &[]))
    }

    fn fill(&self, schema: &Schema, value: Value, mode: Fill, seen: &[&str]) -> Value {
        match (schema, value) {
            (Schema::Ref(name), value) if seen.contains(&name.as_str()) => value,
            (Schema::Ref(name), value) => match self.get(name) {
                Some(target) => {
                    let mut next = seen.to_vec();
                    next.push(name.as_str());
                    self.fill(target, value, mode, &next)
                }
                None => value,
            },
            (Schema::Number(n), Value::String(text)) if n.coerce => {
                match text.trim().parse::<f64>() {
                    Ok(f) if n.integer && f.fract() == 0.0 => Value::from(f as i64),
                    Ok(f) => Number::from_f64(f)
                        .map(Value::Number)
                        .unwrap_or(Value::String(text)),
                    Err(_) => Value::String(text),
                }
            }
            (Schema::Number(n), Value::Number(number)) if n.integer => whole(number),
            (Schema::Object(object), Value::Object(mut map)) => {
                for field in &object.fields {
                    match map.remove(&field.name) {
                        None => {
                            let wanted = mode == Fill::Defaults || field.required;
                            if let Some(default) = field.default.as_ref().filter(|_| wanted) {
                                map.insert(field.name.clone(), default.clone());
                            }
                        }
                        Some(Value::Null) if mode == Fill::Typed && !field.required => {}
                        Some(Value::Null) => {
                            map.insert(field.name.clone(), Value::Null);
                        }
                        Some(present) => {
                            let filled = self.fill(&field.schema, present, mode, &[]);
                            map.insert(field.name.clone(), filled);
                        }
                    }
                }
                Value::Object(map)
            }
            (Schema::Array(array), Value::Array(items)) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.fill(&array.items, item, mode, &[]))
                    .collect(),
            ),
            (Schema::Record(record), Value::Object(map)) => Value::Object(
                map.into_iter()
                    .map(|(key, item)| (key, self.fill(&record.values, item, mode, &[])))
                    .collect(),
            ),
            (Schema::Union(union), value) => {
                let chosen = match &union.discriminator {
                    Some(tag) => union.variants.iter().find(|variant| {
                        match (self.variant_tag(variant, tag), value.get(tag)) {
                            (Some(expected), Some(actual)) => expected == actual,
                            _ => false,
                        }
                    }),
                    None => union
                        .variants
                        .iter()
                        .find(|variant| self.violations(variant, &value).is_empty()),
                };
                match chosen {
                    Some(variant) => self.fill(variant, value, mode, seen),
                    None => value,
                }
            }
            (_, value) => value,
        }
    }
}

/// `1024.0` becomes `1024`. Fractions and integers pass through.
fn whole(number: Number) -> Value {
    match number.as_f64() {
        Some(f)
            if !number.is_i64()
                && !number.is_u64()
                && f.fract() == 0.0
                && f.abs() <= MAX_EXACT_FLOAT =>
        {
            Value::from(f as i64)
        }
        _ => Value::Number(number),
    }
}
