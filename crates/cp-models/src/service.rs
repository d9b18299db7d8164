//! Service-level envelopes: health, metadata, pagination, and generic API
//! request/response records.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use cp_schema::{DefaultValue, Field, FieldKind, Shape};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ErrorEnvelope, ERROR_ENVELOPE_SHAPE};
use crate::Attributes;

literal_enum! {
    HealthStatus {
        Healthy => "healthy",
        Degraded => "degraded",
        Unhealthy => "unhealthy",
        Unknown => "unknown",
    }
}

literal_enum! {
    /// Deployment tier a service reports.
    Environment {
        Development => "development",
        Staging => "staging",
        Production => "production",
    }
}

literal_enum! {
    SortOrder {
        Asc => "asc",
        Desc => "desc",
    }
}

literal_enum! {
    HttpMethod {
        Get => "GET",
        Post => "POST",
        Put => "PUT",
        Patch => "PATCH",
        Delete => "DELETE",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    pub service: String,
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    /// Seconds since the service started.
    pub uptime: f64,
    pub checks: Vec<Attributes>,
}

pub const HEALTH_CHECK_SHAPE: Shape = Shape {
    name: "HealthCheck",
    fields: &[
        Field::required("service", FieldKind::String),
        Field::required("status", FieldKind::Enum(HealthStatus::VALUES)),
        Field::required("timestamp", FieldKind::Timestamp),
        Field::required("version", FieldKind::String),
        Field::required("uptime", FieldKind::Float),
        Field::defaulted(
            "checks",
            FieldKind::List(&FieldKind::Object),
            DefaultValue::List(&[]),
        ),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMetadata {
    pub name: String,
    pub version: String,
    /// Version string as the service reports it, e.g. `"1.0.0"`.
    pub contract_version: String,
    pub environment: Environment,
    pub start_time: DateTime<Utc>,
    pub features: Vec<String>,
}

pub const SERVICE_METADATA_SHAPE: Shape = Shape {
    name: "ServiceMetadata",
    fields: &[
        Field::required("name", FieldKind::String),
        Field::required("version", FieldKind::String),
        Field::required("contractVersion", FieldKind::String),
        Field::defaulted(
            "environment",
            FieldKind::Enum(Environment::VALUES),
            DefaultValue::Str("development"),
        ),
        Field::required("startTime", FieldKind::Timestamp),
        Field::defaulted(
            "features",
            FieldKind::List(&FieldKind::String),
            DefaultValue::List(&[]),
        ),
    ],
};

/// Offset or cursor pagination parameters. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedRequest {
    pub limit: i64,
    pub offset: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
}

pub const PAGINATED_REQUEST_SHAPE: Shape = Shape {
    name: "PaginatedRequest",
    fields: &[
        Field::defaulted("limit", FieldKind::Integer, DefaultValue::Int(100)),
        Field::defaulted("offset", FieldKind::Integer, DefaultValue::Int(0)),
        Field::optional("cursor", FieldKind::String),
        Field::optional("sortBy", FieldKind::String),
        Field::defaulted(
            "sortOrder",
            FieldKind::Enum(SortOrder::VALUES),
            DefaultValue::Str("asc"),
        ),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse {
    pub items: Vec<Value>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

pub const PAGINATED_RESPONSE_SHAPE: Shape = Shape {
    name: "PaginatedResponse",
    fields: &[
        Field::required("items", FieldKind::List(&FieldKind::Any)),
        Field::required("total", FieldKind::Integer),
        Field::required("limit", FieldKind::Integer),
        Field::required("offset", FieldKind::Integer),
        Field::required("hasMore", FieldKind::Boolean),
        Field::optional("nextCursor", FieldKind::String),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    pub id: String,
    pub method: HttpMethod,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub query: Attributes,
    /// Request body; `null` is a legal value.
    pub body: Value,
    pub metadata: Attributes,
}

pub const API_REQUEST_SHAPE: Shape = Shape {
    name: "ApiRequest",
    fields: &[
        Field::required("id", FieldKind::String),
        Field::required("method", FieldKind::Enum(HttpMethod::VALUES)),
        Field::required("path", FieldKind::String),
        Field::defaulted(
            "headers",
            FieldKind::MapOf(&FieldKind::String),
            DefaultValue::Object(&[]),
        ),
        Field::defaulted("query", FieldKind::Object, DefaultValue::Object(&[])),
        Field::required("body", FieldKind::Any),
        Field::required("metadata", FieldKind::Object),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub request_id: String,
    pub status_code: i64,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelope>,
    pub metadata: Attributes,
}

pub const API_RESPONSE_SHAPE: Shape = Shape {
    name: "ApiResponse",
    fields: &[
        Field::required("requestId", FieldKind::String),
        Field::required("statusCode", FieldKind::Integer),
        Field::defaulted(
            "headers",
            FieldKind::MapOf(&FieldKind::String),
            DefaultValue::Object(&[]),
        ),
        Field::required("body", FieldKind::Any),
        Field::optional("error", FieldKind::Record(&ERROR_ENVELOPE_SHAPE)),
        Field::required("metadata", FieldKind::Object),
    ],
};
