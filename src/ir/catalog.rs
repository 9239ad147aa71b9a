//! Named schema definitions for one provider

use indexmap::IndexMap;

use super::schema::{Schema, UnionSchema};
use crate::catalog::Provider;
use crate::error::{Constraint, FieldPath, Result, SchemaError, ValidationReport, Violation};

/// Ordered set of named definitions. `Schema::Ref` values resolve against
/// the catalog that contains them.
#[derive(Debug, Clone)]
pub struct Catalog {
    provider: Provider,
    definitions: IndexMap<String, Schema>,
}

impl Catalog {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            definitions: IndexMap::new(),
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Add or replace a definition.
    pub fn define(&mut self, name: &str, schema: impl Into<Schema>) -> &mut Self {
        self.definitions.insert(name.to_string(), schema.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.definitions.get(name)
    }

    /// Look up a definition, failing with `UnknownSchema`.
    pub fn require(&self, name: &str) -> Result<&Schema> {
        self.get(name).ok_or_else(|| SchemaError::UnknownSchema {
            provider: self.provider,
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub fn definitions(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.definitions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Follow `Ref`s until a concrete schema is reached. Returns `None` for a
    /// dangling or cyclic reference chain.
    pub fn resolve<'a>(&'a self, schema: &'a Schema) -> Option<&'a Schema> {
        let mut current = schema;
        for _ in 0..=self.definitions.len() {
            match current {
                Schema::Ref(name) => current = self.get(name)?,
                other => return Some(other),
            }
        }
        None
    }

    /// The literal value a union variant carries in its discriminator
    /// property.
    pub(crate) fn variant_tag<'a>(
        &'a self,
        variant: &'a Schema,
        tag: &str,
    ) -> Option<&'a serde_json::Value> {
        match self.resolve(variant)? {
            Schema::Object(object) => match &object.field(tag)?.schema {
                Schema::Literal(value) => Some(value),
                _ => None,
            },
            _ => None,
        }
    }

    /// Names referenced anywhere in the catalog that have no definition.
    pub fn unresolved_references(&self) -> Vec<String> {
        let mut missing = Vec::new();
        for schema in self.definitions.values() {
            self.collect_missing(schema, &mut missing);
        }
        missing.sort();
        missing.dedup();
        missing
    }

    /// Definitions whose chain of plain references comes back around
    /// without reaching a schema.
    pub fn reference_cycles(&self) -> Vec<String> {
        self.definitions
            .iter()
            .filter(|(name, schema)| {
                let mut chain = vec![name.as_str()];
                let mut current = *schema;
                while let Schema::Ref(next) = current {
                    if chain.contains(&next.as_str()) {
                        return true;
                    }
                    match self.get(next) {
                        Some(target) => {
                            chain.push(next.as_str());
                            current = target;
                        }
                        None => return false,
                    }
                }
                false
            })
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Fail with an `UnresolvedRef` violation per dangling reference and a
    /// `RefCycle` violation per definition that never reaches a schema.
    pub fn check_references(&self) -> Result<()> {
        let missing = self.unresolved_references();
        let cycles = self.reference_cycles();
        if missing.is_empty() && cycles.is_empty() {
            return Ok(());
        }
        let violations = missing
            .into_iter()
            .map(|name| Violation::new(FieldPath::root(), Constraint::UnresolvedRef { name }))
            .chain(
                cycles
                    .into_iter()
                    .map(|name| Violation::new(FieldPath::root(), Constraint::RefCycle { name })),
            )
            .collect();
        Err(SchemaError::Invalid(ValidationReport::new(
            self.provider.to_string(),
            violations,
        )))
    }

    fn collect_missing(&self, schema: &Schema, missing: &mut Vec<String>) {
        match schema {
            Schema::Ref(name) => {
                if !self.contains(name) {
                    missing.push(name.clone());
                }
            }
            Schema::Array(array) => self.collect_missing(&array.items, missing),
            Schema::Record(record) => self.collect_missing(&record.values, missing),
            Schema::Object(object) => {
                for field in &object.fields {
                    self.collect_missing(&field.schema, missing);
                }
            }
            Schema::Union(UnionSchema { variants, .. }) => {
                for variant in variants {
                    self.collect_missing(variant, missing);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{field, literal, object, reference, string, tagged_union};
    use serde_json::json;

    fn sample() -> Catalog {
        let mut catalog = Catalog::new(Provider::Anthropic);
        catalog
            .define(
                "TextContent",
                object([field("type", literal("text")), field("text", string())]),
            )
            .define("Alias", reference("TextContent"))
            .define("Content", tagged_union("type", [reference("Alias")]));
        catalog
    }

    #[test]
    fn test_define_and_lookup() {
        let catalog = sample();
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog.names().collect::<Vec<_>>(),
            vec!["TextContent", "Alias", "Content"]
        );
        assert!(catalog.require("TextContent").is_ok());
        assert!(matches!(
            catalog.require("Missing"),
            Err(SchemaError::UnknownSchema { .. })
        ));
    }

    #[test]
    fn test_resolve_follows_chain() {
        let catalog = sample();
        let alias = reference("Alias");
        assert!(matches!(catalog.resolve(&alias), Some(Schema::Object(_))));
        assert_eq!(catalog.variant_tag(&alias, "type"), Some(&json!("text")));
    }

    #[test]
    fn test_cyclic_reference_does_not_resolve() {
        let mut catalog = Catalog::new(Provider::Ollama);
        catalog.define("A", reference("B")).define("B", reference("A"));
        assert!(catalog.resolve(&reference("A")).is_none());
    }

    #[test]
    fn test_check_references_reports_cycles() {
        let mut catalog = sample();
        assert!(catalog.reference_cycles().is_empty());
        catalog
            .define("A", reference("B"))
            .define("B", reference("A"))
            .define("Self", reference("Self"));
        assert_eq!(catalog.reference_cycles(), vec!["A", "B", "Self"]);

        let err = catalog.check_references().unwrap_err();
        let report = err.report().unwrap();
        assert_eq!(report.len(), 3);
        assert!(report
            .iter()
            .all(|v| matches!(v.constraint, Constraint::RefCycle { .. })));
    }

    #[test]
    fn test_unresolved_references() {
        let mut catalog = sample();
        assert!(catalog.unresolved_references().is_empty());
        assert!(catalog.check_references().is_ok());
        catalog.define("Broken", object([field("x", reference("Nowhere"))]));
        assert_eq!(catalog.unresolved_references(), vec!["Nowhere".to_string()]);
        let err = catalog.check_references().unwrap_err();
        assert_eq!(err.report().map(|r| r.len()), Some(1));
    }
}
