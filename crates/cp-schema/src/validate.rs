//! # Shape Validation
//!
//! [`check`] is the single validation routine behind every typed and untyped
//! entry point in the SDK. It is a pure function of its two inputs.
//!
//! ## Rules
//!
//! - A required field that is absent (or `null`, unless its kind is
//!   [`FieldKind::Any`]) is reported as [`IssueKind::Missing`].
//! - A present field must conform to its [`FieldKind`]. Nested records, lists
//!   and mappings are checked recursively with the path extended at each step.
//! - An absent optional field with a declared default receives the default.
//! - Keys the shape does not declare are ignored and dropped from the output.
//! - Every problem is collected; validation never stops at the first one.
//!
//! The returned mapping is normalized: integers in integer form, timestamps
//! in UTC RFC 3339, nested records with their own defaults applied. It is
//! suitable for direct `serde` decoding into the matching typed record.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::error::{FieldIssue, FieldPath, IssueKind, PathSegment, ValidationError};
use crate::shape::{quote_literals, FieldKind, Shape};

/// Validate `data` against `shape`.
///
/// Returns the normalized mapping on success, or a [`ValidationError`]
/// listing every field-level problem.
pub fn check(shape: &Shape, data: &Value) -> Result<Map<String, Value>, ValidationError> {
    let mut issues = Vec::new();
    let mut path = FieldPath::root();

    let normalized = match data.as_object() {
        Some(object) => check_record(shape, object, &mut path, &mut issues),
        None => {
            issues.push(FieldIssue::new(
                FieldPath::root(),
                IssueKind::InvalidType,
                format!("expected a mapping for {}", shape.name),
                Some(data.clone()),
            ));
            Map::new()
        }
    };

    if issues.is_empty() {
        Ok(normalized)
    } else {
        tracing::debug!(
            model = shape.name,
            issue_count = issues.len(),
            "validation failed"
        );
        Err(ValidationError::new(shape.name, issues))
    }
}

/// Validate a bare value against a single kind, rooted at an empty path.
pub(crate) fn check_kind(kind: &FieldKind, value: &Value) -> Result<Value, Vec<FieldIssue>> {
    let mut issues = Vec::new();
    let mut path = FieldPath::root();
    match coerce(kind, value, &mut path, &mut issues) {
        Some(normalized) if issues.is_empty() => Ok(normalized),
        _ => Err(issues),
    }
}

fn check_record(
    shape: &Shape,
    object: &Map<String, Value>,
    path: &mut FieldPath,
    issues: &mut Vec<FieldIssue>,
) -> Map<String, Value> {
    let mut out = Map::new();

    for field in shape.fields {
        path.push(PathSegment::Key(field.name.to_string()));

        let present = object
            .get(field.name)
            .filter(|v| !v.is_null() || matches!(field.kind, FieldKind::Any));

        match present {
            Some(value) => {
                if let Some(normalized) = coerce(&field.kind, value, path, issues) {
                    out.insert(field.name.to_string(), normalized);
                }
            }
            None if field.required => {
                issues.push(FieldIssue::new(
                    path.clone(),
                    IssueKind::Missing,
                    "field required",
                    object.get(field.name).cloned(),
                ));
            }
            None => {
                if let Some(default) = field.default {
                    out.insert(field.name.to_string(), default.to_value());
                }
            }
        }

        path.pop();
    }

    out
}

/// Check one value against a kind. Returns the normalized value, or `None`
/// after recording at least one issue.
fn coerce(
    kind: &FieldKind,
    value: &Value,
    path: &mut FieldPath,
    issues: &mut Vec<FieldIssue>,
) -> Option<Value> {
    match kind {
        FieldKind::String => match value {
            Value::String(_) => Some(value.clone()),
            _ => reject(issues, path, IssueKind::InvalidType, "expected a string", value),
        },
        FieldKind::Integer => coerce_integer(value, path, issues),
        FieldKind::Float => match value {
            Value::Number(_) => Some(value.clone()),
            _ => reject(issues, path, IssueKind::InvalidType, "expected a number", value),
        },
        FieldKind::Boolean => match value {
            Value::Bool(_) => Some(value.clone()),
            _ => reject(issues, path, IssueKind::InvalidType, "expected a boolean", value),
        },
        FieldKind::Timestamp => match value.as_str() {
            Some(text) => match DateTime::parse_from_rfc3339(text) {
                Ok(parsed) => Some(Value::String(
                    parsed
                        .with_timezone(&Utc)
                        .to_rfc3339_opts(SecondsFormat::AutoSi, true),
                )),
                Err(e) => reject(
                    issues,
                    path,
                    IssueKind::InvalidTimestamp,
                    format!("expected an RFC 3339 date-time: {e}"),
                    value,
                ),
            },
            None => reject(
                issues,
                path,
                IssueKind::InvalidType,
                "expected a date-time string",
                value,
            ),
        },
        FieldKind::Enum(literals) => match value.as_str() {
            Some(text) if literals.contains(&text) => Some(value.clone()),
            Some(_) => reject(
                issues,
                path,
                IssueKind::InvalidLiteral,
                format!("expected one of {}", quote_literals(literals)),
                value,
            ),
            None => reject(
                issues,
                path,
                IssueKind::InvalidType,
                "expected a string literal",
                value,
            ),
        },
        FieldKind::Object => match value {
            Value::Object(_) => Some(value.clone()),
            _ => reject(issues, path, IssueKind::InvalidType, "expected a mapping", value),
        },
        FieldKind::Any => Some(value.clone()),
        FieldKind::Record(shape) => match value.as_object() {
            Some(object) => {
                let before = issues.len();
                let record = check_record(shape, object, path, issues);
                (issues.len() == before).then_some(Value::Object(record))
            }
            None => reject(
                issues,
                path,
                IssueKind::InvalidType,
                format!("expected a mapping for {}", shape.name),
                value,
            ),
        },
        FieldKind::List(inner) => match value.as_array() {
            Some(items) => {
                let before = issues.len();
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    path.push(PathSegment::Index(index));
                    if let Some(normalized) = coerce(inner, item, path, issues) {
                        out.push(normalized);
                    }
                    path.pop();
                }
                (issues.len() == before).then_some(Value::Array(out))
            }
            None => reject(issues, path, IssueKind::InvalidType, "expected a list", value),
        },
        FieldKind::MapOf(inner) => match value.as_object() {
            Some(object) => {
                let before = issues.len();
                let mut out = Map::new();
                for (key, item) in object {
                    path.push(PathSegment::Key(key.clone()));
                    if let Some(normalized) = coerce(inner, item, path, issues) {
                        out.insert(key.clone(), normalized);
                    }
                    path.pop();
                }
                (issues.len() == before).then_some(Value::Object(out))
            }
            None => reject(issues, path, IssueKind::InvalidType, "expected a mapping", value),
        },
        FieldKind::OneOf(alternatives) => {
            for alternative in alternatives.iter() {
                let mut scratch = Vec::new();
                if let Some(normalized) = coerce(alternative, value, path, &mut scratch) {
                    if scratch.is_empty() {
                        return Some(normalized);
                    }
                }
            }
            reject(
                issues,
                path,
                IssueKind::NoMatchingVariant,
                format!("expected {}", kind.describe()),
                value,
            )
        }
    }
}

fn coerce_integer(value: &Value, path: &FieldPath, issues: &mut Vec<FieldIssue>) -> Option<Value> {
    let Value::Number(number) = value else {
        return reject(issues, path, IssueKind::InvalidType, "expected an integer", value);
    };

    if let Some(i) = number.as_i64() {
        return Some(Value::from(i));
    }
    if number.is_u64() {
        return reject(
            issues,
            path,
            IssueKind::OutOfRange,
            "integer exceeds the 64-bit signed range",
            value,
        );
    }

    match number.as_f64() {
        Some(f) if f.fract() != 0.0 || !f.is_finite() => reject(
            issues,
            path,
            IssueKind::InvalidType,
            "expected an integer, got a fractional number",
            value,
        ),
        Some(f) if f >= i64::MIN as f64 && f < i64::MAX as f64 => Some(Value::from(f as i64)),
        _ => reject(
            issues,
            path,
            IssueKind::OutOfRange,
            "integer exceeds the 64-bit signed range",
            value,
        ),
    }
}

fn reject(
    issues: &mut Vec<FieldIssue>,
    path: &FieldPath,
    kind: IssueKind,
    message: impl Into<String>,
    value: &Value,
) -> Option<Value> {
    issues.push(FieldIssue::new(
        path.clone(),
        kind,
        message,
        Some(value.clone()),
    ));
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{DefaultValue, Field};
    use serde_json::json;

    const ITEM: Shape = Shape {
        name: "Item",
        fields: &[
            Field::required("sku", FieldKind::String),
            Field::defaulted("qty", FieldKind::Integer, DefaultValue::Int(1)),
        ],
    };

    const ORDER: Shape = Shape {
        name: "Order",
        fields: &[
            Field::required("id", FieldKind::String),
            Field::required("status", FieldKind::Enum(&["open", "closed"])),
            Field::required("placedAt", FieldKind::Timestamp),
            Field::optional("note", FieldKind::String),
            Field::defaulted("rush", FieldKind::Boolean, DefaultValue::Bool(false)),
            Field::defaulted("weight", FieldKind::Float, DefaultValue::Float(0.5)),
            Field::defaulted(
                "items",
                FieldKind::List(&FieldKind::Record(&ITEM)),
                DefaultValue::List(&[]),
            ),
            Field::defaulted(
                "labels",
                FieldKind::MapOf(&FieldKind::String),
                DefaultValue::Object(&[]),
            ),
            Field::optional("extra", FieldKind::Any),
            Field::optional(
                "ref",
                FieldKind::OneOf(&[FieldKind::String, FieldKind::Integer]),
            ),
        ],
    };

    fn paths(err: &ValidationError) -> Vec<String> {
        err.issues.iter().map(|i| i.path.to_string()).collect()
    }

    #[test]
    fn valid_input_gets_defaults_and_drops_unknown_keys() {
        let data = json!({
            "id": "o1",
            "status": "open",
            "placedAt": "2024-01-01T00:00:00Z",
            "items": [{"sku": "a"}],
            "unknown": 42
        });
        let out = check(&ORDER, &data).unwrap();
        assert_eq!(out["rush"], json!(false));
        assert_eq!(out["weight"], json!(0.5));
        assert_eq!(out["items"], json!([{"sku": "a", "qty": 1}]));
        assert_eq!(out["labels"], json!({}));
        assert!(!out.contains_key("note"));
        assert!(!out.contains_key("unknown"));
    }

    #[test]
    fn collects_every_issue_with_paths() {
        let data = json!({
            "status": "archived",
            "placedAt": "yesterday",
            "items": [{"sku": "a"}, {"qty": "two"}],
            "labels": {"team": 7}
        });
        let err = check(&ORDER, &data).unwrap_err();
        assert_eq!(err.model, "Order");
        assert_eq!(
            paths(&err),
            vec![
                "id",
                "status",
                "placedAt",
                "items[1].sku",
                "items[1].qty",
                "labels.team"
            ]
        );
        let status = &err.issues[1];
        assert_eq!(status.kind, IssueKind::InvalidLiteral);
        assert_eq!(status.value, Some(json!("archived")));
        assert_eq!(err.issues[0].kind, IssueKind::Missing);
        assert_eq!(err.issues[0].value, None);
        assert_eq!(err.issues[2].kind, IssueKind::InvalidTimestamp);
    }

    #[test]
    fn null_counts_as_absent_except_for_any() {
        let data = json!({
            "id": null,
            "status": "open",
            "placedAt": "2024-01-01T00:00:00Z",
            "rush": null,
            "extra": null
        });
        let err = check(&ORDER, &data).unwrap_err();
        assert_eq!(paths(&err), vec!["id"]);
        assert_eq!(err.issues[0].value, Some(Value::Null));

        let data = json!({
            "id": "o1",
            "status": "open",
            "placedAt": "2024-01-01T00:00:00Z",
            "rush": null,
            "extra": null
        });
        let out = check(&ORDER, &data).unwrap();
        assert_eq!(out["rush"], json!(false));
        assert_eq!(out["extra"], Value::Null);
    }

    #[test]
    fn integers_accept_integral_floats_only() {
        let base = |qty: Value| json!({"sku": "a", "qty": qty});
        assert_eq!(check(&ITEM, &base(json!(4.0))).unwrap()["qty"], json!(4));
        let err = check(&ITEM, &base(json!(4.5))).unwrap_err();
        assert_eq!(err.issues[0].kind, IssueKind::InvalidType);
        let err = check(&ITEM, &base(json!(u64::MAX))).unwrap_err();
        assert_eq!(err.issues[0].kind, IssueKind::OutOfRange);
    }

    #[test]
    fn timestamps_normalize_to_utc() {
        let data = json!({"id": "o1", "status": "open", "placedAt": "2024-01-01T02:00:00+02:00"});
        let out = check(&ORDER, &data).unwrap();
        assert_eq!(out["placedAt"], json!("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn one_of_tries_alternatives_in_order() {
        let base = |r: Value| {
            json!({"id": "o1", "status": "open", "placedAt": "2024-01-01T00:00:00Z", "ref": r})
        };
        assert_eq!(check(&ORDER, &base(json!("abc"))).unwrap()["ref"], json!("abc"));
        assert_eq!(check(&ORDER, &base(json!(7))).unwrap()["ref"], json!(7));
        let err = check(&ORDER, &base(json!(true))).unwrap_err();
        assert_eq!(err.issues[0].kind, IssueKind::NoMatchingVariant);
        assert_eq!(err.issues[0].message, "expected string | integer");
    }

    #[test]
    fn non_mapping_root_is_rejected() {
        let err = check(&ORDER, &json!([1, 2])).unwrap_err();
        assert!(err.issues[0].path.is_root());
        assert_eq!(err.issues[0].kind, IssueKind::InvalidType);
    }
}
