//! # Validation Error Types
//!
//! A failed validation reports every field-level problem at once. Each
//! [`FieldIssue`] carries the [`FieldPath`] into the (possibly nested) input,
//! an [`IssueKind`], a human-readable message, and the offending value.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// One step into a nested JSON structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Mapping key.
    Key(String),
    /// Array index.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => f.write_str(k),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Location of a value inside the validated input. Empty means the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The root of the input document.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a path of mapping keys, e.g. `FieldPath::from_keys(["payload", "data"])`.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(|k| PathSegment::Key(k.into())).collect())
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for FieldPath {
    /// Renders as `payload.data`, with indices in brackets: `items[2].id`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(k) if i == 0 => f.write_str(k)?,
                PathSegment::Key(k) => write!(f, ".{k}")?,
                PathSegment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

/// Category of a field-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A required field is absent or null.
    Missing,
    /// The value has the wrong JSON type.
    InvalidType,
    /// A string outside the field's literal set.
    InvalidLiteral,
    /// A string that is not an RFC 3339 date-time.
    InvalidTimestamp,
    /// An integer that does not fit the declared range.
    OutOfRange,
    /// A value that matched none of the alternatives of a union field.
    NoMatchingVariant,
    /// The normalized record could not be decoded into its typed form.
    Decode,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldIssue {
    pub path: FieldPath,
    pub kind: IssueKind,
    pub message: String,
    /// The offending value; `None` when the field was absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl FieldIssue {
    pub fn new(
        path: FieldPath,
        kind: IssueKind,
        message: impl Into<String>,
        value: Option<Value>,
    ) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
            value,
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Data failed to conform to a shape. Lists every problem found.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{} validation error(s) for {model}", .issues.len())]
pub struct ValidationError {
    /// Name of the shape that was violated.
    pub model: String,
    /// Individual violations, in the order they were found.
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn new(model: impl Into<String>, issues: Vec<FieldIssue>) -> Self {
        Self {
            model: model.into(),
            issues,
        }
    }

    /// A failure of the final decode step, reported against the root.
    pub fn decode(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            model,
            vec![FieldIssue::new(
                FieldPath::root(),
                IssueKind::Decode,
                reason,
                None,
            )],
        )
    }

    /// Whether any issue points at exactly `path`.
    pub fn has_issue_at(&self, path: &FieldPath) -> bool {
        self.issues.iter().any(|issue| &issue.path == path)
    }

    /// The issues located at `path`.
    pub fn issues_at<'a>(&'a self, path: &'a FieldPath) -> impl Iterator<Item = &'a FieldIssue> {
        self.issues.iter().filter(move |issue| &issue.path == path)
    }
}

/// Errors from registry lookups and name-addressed validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// No shape is registered under this exact name.
    #[error("schema not found: {0}")]
    SchemaNotFound(String),

    /// The data failed validation against the named shape.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_display_mixes_keys_and_indices() {
        let mut path = FieldPath::from_keys(["items"]);
        path.push(PathSegment::Index(2));
        path.push(PathSegment::Key("id".into()));
        assert_eq!(path.to_string(), "items[2].id");
        assert_eq!(FieldPath::root().to_string(), "<root>");
    }

    #[test]
    fn path_serializes_as_plain_array() {
        let mut path = FieldPath::from_keys(["capabilities"]);
        path.push(PathSegment::Index(0));
        assert_eq!(
            serde_json::to_value(&path).unwrap(),
            serde_json::json!(["capabilities", 0])
        );
    }

    #[test]
    fn error_display_counts_issues() {
        let err = ValidationError::new(
            "JobRequest",
            vec![
                FieldIssue::new(
                    FieldPath::from_keys(["id"]),
                    IssueKind::Missing,
                    "field required",
                    None,
                ),
                FieldIssue::new(
                    FieldPath::from_keys(["type"]),
                    IssueKind::Missing,
                    "field required",
                    None,
                ),
            ],
        );
        assert_eq!(err.to_string(), "2 validation error(s) for JobRequest");
        assert!(err.has_issue_at(&FieldPath::from_keys(["type"])));
        assert!(!err.has_issue_at(&FieldPath::from_keys(["payload"])));
    }

    #[test]
    fn issues_at_filters_by_exact_path() {
        let mut tags = FieldPath::from_keys(["metadata", "tags"]);
        tags.push(PathSegment::Index(1));
        assert_eq!(
            tags.segments(),
            &[
                PathSegment::Key("metadata".into()),
                PathSegment::Key("tags".into()),
                PathSegment::Index(1),
            ]
        );

        let err = ValidationError::new(
            "JobRequest",
            vec![
                FieldIssue::new(
                    tags.clone(),
                    IssueKind::InvalidType,
                    "expected a string",
                    None,
                ),
                FieldIssue::new(
                    FieldPath::from_keys(["id"]),
                    IssueKind::Missing,
                    "field required",
                    None,
                ),
                FieldIssue::new(
                    tags.clone(),
                    IssueKind::InvalidLiteral,
                    "second issue",
                    None,
                ),
            ],
        );
        let kinds: Vec<IssueKind> = err.issues_at(&tags).map(|issue| issue.kind).collect();
        assert_eq!(kinds, vec![IssueKind::InvalidType, IssueKind::InvalidLiteral]);
        assert_eq!(err.issues_at(&FieldPath::from_keys(["metadata"])).count(), 0);
    }
}
