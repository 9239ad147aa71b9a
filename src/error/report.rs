//! Validation report
//!
//! A failed validation yields every violation found, each tied to the JSON
//! path of the offending value and the constraint it broke.

use std::fmt;

use serde_json::Value;

/// One step in a path through a JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside a payload, rendered as `messages[0].content`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Child path for an object key.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    /// Child path for an array index.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// The last object key on the path, if any.
    pub fn field(&self) -> Option<&str> {
        self.0.iter().rev().find_map(|segment| match segment {
            PathSegment::Key(key) => Some(key.as_str()),
            PathSegment::Index(_) => None,
        })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{}", key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// The constraint a value failed.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Required,
    Type { expected: String },
    Minimum { minimum: f64, actual: f64 },
    Maximum { maximum: f64, actual: f64 },
    MinLength { min: usize, actual: usize },
    MaxLength { max: usize, actual: usize },
    MinItems { min: usize, actual: usize },
    MaxItems { max: usize, actual: usize },
    MaxProperties { max: usize, actual: usize },
    Literal { expected: Value },
    Enum { allowed: Vec<Value> },
    Pattern { pattern: String },
    Format { format: String },
    Discriminator { tag: String, allowed: Vec<Value> },
    NoMatchingVariant,
    UnresolvedRef { name: String },
    /// `name` reaches itself through references without consuming input.
    RefCycle { name: String },
    /// A rule reported by the typed `validator` layer.
    Rule { code: String, message: Option<String> },
}

impl Constraint {
    /// Short machine-readable name, stable across releases.
    pub fn code(&self) -> &str {
        match self {
            Constraint::Required => "required",
            Constraint::Type { .. } => "type",
            Constraint::Minimum { .. } => "minimum",
            Constraint::Maximum { .. } => "maximum",
            Constraint::MinLength { .. } => "min_length",
            Constraint::MaxLength { .. } => "max_length",
            Constraint::MinItems { .. } => "min_items",
            Constraint::MaxItems { .. } => "max_items",
            Constraint::MaxProperties { .. } => "max_properties",
            Constraint::Literal { .. } => "literal",
            Constraint::Enum { .. } => "enum",
            Constraint::Pattern { .. } => "pattern",
            Constraint::Format { .. } => "format",
            Constraint::Discriminator { .. } => "discriminator",
            Constraint::NoMatchingVariant => "union",
            Constraint::UnresolvedRef { .. } => "unresolved_ref",
            Constraint::RefCycle { .. } => "ref_cycle",
            Constraint::Rule { code, .. } => code,
        }
    }
}

fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Required => write!(f, "is required"),
            Constraint::Type { expected } => write!(f, "expected {}", expected),
            Constraint::Minimum { minimum, actual } => {
                write!(f, "must be >= {} (got {})", minimum, actual)
            }
            Constraint::Maximum { maximum, actual } => {
                write!(f, "must be <= {} (got {})", maximum, actual)
            }
            Constraint::MinLength { min, actual } => {
                write!(f, "length must be >= {} (got {})", min, actual)
            }
            Constraint::MaxLength { max, actual } => {
                write!(f, "length must be <= {} (got {})", max, actual)
            }
            Constraint::MinItems { min, actual } => {
                write!(f, "must contain at least {} item(s) (got {})", min, actual)
            }
            Constraint::MaxItems { max, actual } => {
                write!(f, "must contain at most {} item(s) (got {})", max, actual)
            }
            Constraint::MaxProperties { max, actual } => {
                write!(f, "must contain at most {} key(s) (got {})", max, actual)
            }
            Constraint::Literal { expected } => write!(f, "must be {}", expected),
            Constraint::Enum { allowed } => write!(f, "must be one of {}", join_values(allowed)),
            Constraint::Pattern { pattern } => write!(f, "must match /{}/", pattern),
            Constraint::Format { format } => write!(f, "must be a valid {}", format),
            Constraint::Discriminator { tag, allowed } => {
                write!(f, "`{}` must be one of {}", tag, join_values(allowed))
            }
            Constraint::NoMatchingVariant => write!(f, "does not match any variant"),
            Constraint::UnresolvedRef { name } => write!(f, "references unknown schema `{}`", name),
            Constraint::RefCycle { name } => write!(f, "reference `{}` never reaches a schema", name),
            Constraint::Rule { code, message } => match message {
                Some(message) => write!(f, "{} ({})", message, code),
                None => write!(f, "failed `{}`", code),
            },
        }
    }
}

/// A single failed constraint at a location.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub path: FieldPath,
    pub constraint: Constraint,
}

impl Violation {
    pub fn new(path: FieldPath, constraint: Constraint) -> Self {
        Self { path, constraint }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.constraint)
    }
}

/// All violations found while validating one payload against one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub schema: String,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new(schema: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            schema: schema.into(),
            violations,
        }
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }

    /// Whether any violation sits exactly at `path` (e.g. `"messages[0].role"`).
    pub fn has_violation_at(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path.to_string() == path)
    }

    /// Rendered paths of all violations, in discovery order.
    pub fn paths(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.path.to_string()).collect()
    }

    /// Convert typed-layer `validator` errors into a report.
    pub fn from_validator(schema: impl Into<String>, errors: &validator::ValidationErrors) -> Self {
        let mut violations = Vec::new();
        collect_validator_errors(&FieldPath::root(), errors, &mut violations);
        Self::new(schema, violations)
    }
}

fn collect_validator_errors(
    path: &FieldPath,
    errors: &validator::ValidationErrors,
    out: &mut Vec<Violation>,
) {
    use validator::ValidationErrorsKind;

    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    for (field, kind) in fields {
        let name: &str = field.as_ref();
        // Schema-level errors are reported under the pseudo-field "__all__".
        let field_path = if name == "__all__" {
            path.clone()
        } else {
            path.key(name)
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    out.push(Violation::new(
                        field_path.clone(),
                        Constraint::Rule {
                            code: error.code.to_string(),
                            message: error.message.as_ref().map(|m| m.to_string()),
                        },
                    ));
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                collect_validator_errors(&field_path, inner, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_validator_errors(&field_path.index(*index), inner, out);
                }
            }
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} violation(s) against {}",
            self.violations.len(),
            self.schema
        )?;
        for violation in &self.violations {
            write!(f, "\n  {}", violation)?;
        }
        Ok(())
    }
}
