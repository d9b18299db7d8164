//! # Shape Audit
//!
//! Reports shapes whose declarations contradict themselves. The explicit
//! `required` flag is authoritative at validation time; this audit only
//! flags disagreements so they can be fixed at the declaration. It never
//! rewrites a shape.
//!
//! Checked per field:
//!
//! - a required field that also declares a default (the default is unreachable);
//! - a default that would itself fail validation against the field's kind;
//! - an enumerated field with an empty literal set;
//! - a wire name declared more than once in the same shape.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::shape::{Field, FieldKind, Shape};
use crate::validate::check_kind;

/// What kind of inconsistency was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeFindingKind {
    RequiredWithDefault,
    DefaultDoesNotConform,
    EmptyLiteralSet,
    DuplicateField,
}

/// A single inconsistency in a shape declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeFinding {
    /// The shape name.
    pub shape: &'static str,
    /// The field wire name.
    pub field: &'static str,
    pub kind: ShapeFindingKind,
    pub detail: String,
}

impl fmt::Display for ShapeFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.shape, self.field, self.detail)
    }
}

/// Audit one shape's own fields. Nested shapes are audited separately.
pub fn audit_shape(shape: &Shape) -> Vec<ShapeFinding> {
    let mut findings = Vec::new();
    let mut seen = HashSet::new();

    for field in shape.fields {
        if !seen.insert(field.name) {
            findings.push(finding(
                shape,
                field,
                ShapeFindingKind::DuplicateField,
                "declared more than once".to_string(),
            ));
        }

        if field.required && field.default.is_some() {
            findings.push(finding(
                shape,
                field,
                ShapeFindingKind::RequiredWithDefault,
                "required field declares a default that can never apply".to_string(),
            ));
        }

        if has_empty_literal_set(&field.kind) {
            findings.push(finding(
                shape,
                field,
                ShapeFindingKind::EmptyLiteralSet,
                "enumerated field admits no values".to_string(),
            ));
        }

        if let Some(default) = field.default {
            if let Err(issues) = check_kind(&field.kind, &default.to_value()) {
                let reasons: Vec<String> = issues.iter().map(ToString::to_string).collect();
                findings.push(finding(
                    shape,
                    field,
                    ShapeFindingKind::DefaultDoesNotConform,
                    format!("default does not conform: {}", reasons.join("; ")),
                ));
            }
        }
    }

    findings
}

fn finding(shape: &Shape, field: &Field, kind: ShapeFindingKind, detail: String) -> ShapeFinding {
    ShapeFinding {
        shape: shape.name,
        field: field.name,
        kind,
        detail,
    }
}

fn has_empty_literal_set(kind: &FieldKind) -> bool {
    match kind {
        FieldKind::Enum(values) => values.is_empty(),
        FieldKind::List(inner) | FieldKind::MapOf(inner) => has_empty_literal_set(inner),
        FieldKind::OneOf(alternatives) => alternatives.iter().any(has_empty_literal_set),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::DefaultValue;

    const CONSISTENT: Shape = Shape {
        name: "Consistent",
        fields: &[
            Field::required("id", FieldKind::String),
            Field::defaulted("mode", FieldKind::Enum(&["a", "b"]), DefaultValue::Str("a")),
            Field::defaulted(
                "tags",
                FieldKind::List(&FieldKind::String),
                DefaultValue::List(&[]),
            ),
        ],
    };

    const BROKEN: Shape = Shape {
        name: "Broken",
        fields: &[
            Field {
                name: "id",
                kind: FieldKind::String,
                required: true,
                default: Some(DefaultValue::Str("x")),
            },
            Field::defaulted("mode", FieldKind::Enum(&["a", "b"]), DefaultValue::Str("c")),
            Field::optional("never", FieldKind::Enum(&[])),
            Field::optional("id", FieldKind::String),
        ],
    };

    #[test]
    fn consistent_shape_has_no_findings() {
        assert!(audit_shape(&CONSISTENT).is_empty());
    }

    #[test]
    fn broken_shape_reports_each_disagreement() {
        let kinds: Vec<_> = audit_shape(&BROKEN).into_iter().map(|f| (f.field, f.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("id", ShapeFindingKind::RequiredWithDefault),
                ("mode", ShapeFindingKind::DefaultDoesNotConform),
                ("never", ShapeFindingKind::EmptyLiteralSet),
                ("id", ShapeFindingKind::DuplicateField),
            ]
        );
    }

    #[test]
    fn finding_display_names_shape_and_field() {
        let findings = audit_shape(&BROKEN);
        assert!(findings[1].to_string().starts_with("Broken.mode: default does not conform"));
    }
}
