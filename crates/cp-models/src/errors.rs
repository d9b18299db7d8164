//! Error envelope records shared by every ControlPlane service.
//!
//! [`RetryPolicy`] is carried as data only. Nothing in this SDK executes it.

use chrono::{DateTime, Utc};
use cp_schema::{DefaultValue, Field, FieldKind, Shape};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::versioning::{ContractVersion, CONTRACT_VERSION_SHAPE};

literal_enum! {
    /// How bad an error is.
    ErrorSeverity {
        Fatal => "fatal",
        Error => "error",
        Warning => "warning",
        Info => "info",
    }
}

literal_enum! {
    /// Coarse classification used for routing and retry decisions.
    ErrorCategory {
        ValidationError => "VALIDATION_ERROR",
        SchemaMismatch => "SCHEMA_MISMATCH",
        RuntimeError => "RUNTIME_ERROR",
        Timeout => "TIMEOUT",
        NetworkError => "NETWORK_ERROR",
        AuthenticationError => "AUTHENTICATION_ERROR",
        AuthorizationError => "AUTHORIZATION_ERROR",
        ResourceNotFound => "RESOURCE_NOT_FOUND",
        ResourceConflict => "RESOURCE_CONFLICT",
        RateLimited => "RATE_LIMITED",
        ServiceUnavailable => "SERVICE_UNAVAILABLE",
        RunnerError => "RUNNER_ERROR",
        TruthcoreError => "TRUTHCORE_ERROR",
        InternalError => "INTERNAL_ERROR",
    }
}

/// Declared retry behaviour for a job. Inert configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    pub max_retries: i64,
    pub backoff_ms: f64,
    pub max_backoff_ms: f64,
    pub backoff_multiplier: f64,
    pub retryable_categories: Vec<ErrorCategory>,
    pub non_retryable_categories: Vec<ErrorCategory>,
}

pub const RETRY_POLICY_SHAPE: Shape = Shape {
    name: "RetryPolicy",
    fields: &[
        Field::defaulted("maxRetries", FieldKind::Integer, DefaultValue::Int(3)),
        Field::defaulted("backoffMs", FieldKind::Float, DefaultValue::Float(1000.0)),
        Field::defaulted(
            "maxBackoffMs",
            FieldKind::Float,
            DefaultValue::Float(30000.0),
        ),
        Field::defaulted(
            "backoffMultiplier",
            FieldKind::Float,
            DefaultValue::Float(2.0),
        ),
        Field::defaulted(
            "retryableCategories",
            FieldKind::List(&FieldKind::Enum(ErrorCategory::VALUES)),
            DefaultValue::List(&[
                DefaultValue::Str("TIMEOUT"),
                DefaultValue::Str("NETWORK_ERROR"),
                DefaultValue::Str("SERVICE_UNAVAILABLE"),
                DefaultValue::Str("RUNTIME_ERROR"),
            ]),
        ),
        Field::defaulted(
            "nonRetryableCategories",
            FieldKind::List(&FieldKind::Enum(ErrorCategory::VALUES)),
            DefaultValue::List(&[
                DefaultValue::Str("VALIDATION_ERROR"),
                DefaultValue::Str("SCHEMA_MISMATCH"),
                DefaultValue::Str("AUTHENTICATION_ERROR"),
                DefaultValue::Str("AUTHORIZATION_ERROR"),
                DefaultValue::Str("RESOURCE_NOT_FOUND"),
            ]),
        ),
    ],
};

/// A single field-level problem reported by a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<String>>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

pub const ERROR_DETAIL_SHAPE: Shape = Shape {
    name: "ErrorDetail",
    fields: &[
        Field::optional("path", FieldKind::List(&FieldKind::String)),
        Field::required("message", FieldKind::String),
        Field::optional("code", FieldKind::String),
        Field::optional("value", FieldKind::Any),
    ],
};

/// Standard error body returned by every service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    pub code: String,
    pub message: String,
    pub details: Vec<ErrorDetail>,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub causation_id: Option<String>,
    pub retryable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<f64>,
    pub contract_version: ContractVersion,
}

pub const ERROR_ENVELOPE_SHAPE: Shape = Shape {
    name: "ErrorEnvelope",
    fields: &[
        Field::required("id", FieldKind::String),
        Field::required("timestamp", FieldKind::Timestamp),
        Field::required("category", FieldKind::Enum(ErrorCategory::VALUES)),
        Field::required("severity", FieldKind::Enum(ErrorSeverity::VALUES)),
        Field::required("code", FieldKind::String),
        Field::required("message", FieldKind::String),
        Field::defaulted(
            "details",
            FieldKind::List(&FieldKind::Record(&ERROR_DETAIL_SHAPE)),
            DefaultValue::List(&[]),
        ),
        Field::required("service", FieldKind::String),
        Field::optional("operation", FieldKind::String),
        Field::optional("correlationId", FieldKind::String),
        Field::optional("causationId", FieldKind::String),
        Field::defaulted("retryable", FieldKind::Boolean, DefaultValue::Bool(false)),
        Field::optional("retryAfter", FieldKind::Float),
        Field::required(
            "contractVersion",
            FieldKind::Record(&CONTRACT_VERSION_SHAPE),
        ),
    ],
};
