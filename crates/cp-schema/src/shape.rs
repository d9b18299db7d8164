//! # Shape Descriptors
//!
//! A [`Shape`] is the fixed schema of one contract record: an ordered list of
//! [`Field`]s, each with a semantic [`FieldKind`], a required flag, and an
//! optional [`DefaultValue`].
//!
//! Everything here is `const`-constructible so that shapes can be declared as
//! `const` items and referenced from one another (`FieldKind::Record(&OTHER)`)
//! without any runtime initialization.

use serde_json::{Map, Value};

/// The fixed schema of a named contract record.
#[derive(Debug, Clone, Copy)]
pub struct Shape {
    /// The record name, e.g. `JobRequest`.
    pub name: &'static str,
    /// Fields in declaration order.
    pub fields: &'static [Field],
}

impl Shape {
    /// Look up a field by its wire name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Wire names of the required fields, in declaration order.
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }
}

/// One field of a [`Shape`].
#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// Wire name (camelCase, as it appears in JSON).
    pub name: &'static str,
    /// Semantic type the value must conform to.
    pub kind: FieldKind,
    /// Absence of a required field is a validation failure.
    pub required: bool,
    /// Substituted when an optional field is absent.
    pub default: Option<DefaultValue>,
}

impl Field {
    /// A field that must be present.
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
        }
    }

    /// A field that may be absent and has no default.
    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: None,
        }
    }

    /// A field that may be absent and falls back to `default`.
    pub const fn defaulted(name: &'static str, kind: FieldKind, default: DefaultValue) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: Some(default),
        }
    }
}

/// Semantic type of a field value.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// JSON string.
    String,
    /// Whole number. Integral floats such as `50.0` are accepted and normalized.
    Integer,
    /// Any JSON number.
    Float,
    /// JSON boolean.
    Boolean,
    /// RFC 3339 date-time string, normalized to UTC.
    Timestamp,
    /// String that must be one of a fixed literal set.
    Enum(&'static [&'static str]),
    /// Arbitrary JSON mapping.
    Object,
    /// Any JSON value, including `null`.
    Any,
    /// Nested record with its own shape.
    Record(&'static Shape),
    /// JSON array whose elements all conform to the inner kind.
    List(&'static FieldKind),
    /// JSON mapping whose values all conform to the inner kind.
    MapOf(&'static FieldKind),
    /// Value conforming to at least one of the alternatives, tried in order.
    OneOf(&'static [FieldKind]),
}

impl FieldKind {
    /// Human-readable label used in validation messages and `cpctl schemas show`.
    pub fn describe(&self) -> String {
        match self {
            Self::String => "string".to_string(),
            Self::Integer => "integer".to_string(),
            Self::Float => "number".to_string(),
            Self::Boolean => "boolean".to_string(),
            Self::Timestamp => "timestamp".to_string(),
            Self::Enum(values) => format!("one of {}", quote_literals(values)),
            Self::Object => "mapping".to_string(),
            Self::Any => "any".to_string(),
            Self::Record(shape) => shape.name.to_string(),
            Self::List(inner) => format!("list of {}", inner.describe()),
            Self::MapOf(inner) => format!("mapping of {}", inner.describe()),
            Self::OneOf(kinds) => kinds
                .iter()
                .map(FieldKind::describe)
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }
}

/// Render a literal set as `'a', 'b', 'c'`.
pub(crate) fn quote_literals(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A declared default, in a form that can live in a `const`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'static str),
    List(&'static [DefaultValue]),
    Object(&'static [(&'static str, DefaultValue)]),
}

impl DefaultValue {
    /// Materialize the default as a JSON value.
    pub fn to_value(&self) -> Value {
        match *self {
            Self::Bool(b) => Value::Bool(b),
            Self::Int(i) => Value::from(i),
            Self::Float(f) => Value::from(f),
            Self::Str(s) => Value::String(s.to_string()),
            Self::List(items) => Value::Array(items.iter().map(DefaultValue::to_value).collect()),
            Self::Object(entries) => {
                let map: Map<String, Value> = entries
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), v.to_value()))
                    .collect();
                Value::Object(map)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INNER: Shape = Shape {
        name: "Inner",
        fields: &[Field::required("value", FieldKind::String)],
    };

    const OUTER: Shape = Shape {
        name: "Outer",
        fields: &[
            Field::required("id", FieldKind::String),
            Field::optional("note", FieldKind::String),
            Field::defaulted("count", FieldKind::Integer, DefaultValue::Int(3)),
            Field::required("inner", FieldKind::Record(&INNER)),
            Field::optional("tags", FieldKind::List(&FieldKind::String)),
        ],
    };

    #[test]
    fn field_lookup_and_required_list() {
        assert!(OUTER.field("count").is_some());
        assert!(OUTER.field("missing").is_none());
        let required: Vec<_> = OUTER.required_fields().collect();
        assert_eq!(required, vec!["id", "inner"]);
    }

    #[test]
    fn describe_renders_nested_kinds() {
        assert_eq!(FieldKind::List(&FieldKind::String).describe(), "list of string");
        assert_eq!(FieldKind::Record(&INNER).describe(), "Inner");
        assert_eq!(FieldKind::Enum(&["a", "b"]).describe(), "one of 'a', 'b'");
        assert_eq!(
            FieldKind::OneOf(&[FieldKind::String, FieldKind::Boolean]).describe(),
            "string | boolean"
        );
    }

    #[test]
    fn object_default_materializes_in_order() {
        let default = DefaultValue::Object(&[
            ("maxRetries", DefaultValue::Int(3)),
            ("categories", DefaultValue::List(&[DefaultValue::Str("TIMEOUT")])),
            ("enabled", DefaultValue::Bool(false)),
        ]);
        assert_eq!(
            default.to_value(),
            serde_json::json!({"maxRetries": 3, "categories": ["TIMEOUT"], "enabled": false})
        );
    }
}
