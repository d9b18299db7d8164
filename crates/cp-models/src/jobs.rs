//! Job submission and lifecycle records.

use chrono::{DateTime, Utc};
use cp_schema::{DefaultValue, Field, FieldKind, Shape};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ErrorEnvelope, RetryPolicy, ERROR_ENVELOPE_SHAPE, RETRY_POLICY_SHAPE};
use crate::Attributes;

literal_enum! {
    /// Lifecycle state of a job.
    JobStatus {
        Pending => "pending",
        Queued => "queued",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
        Retrying => "retrying",
    }
}

/// Provenance and scheduling hints attached to a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMetadata {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub causation_id: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

pub const JOB_METADATA_SHAPE: Shape = Shape {
    name: "JobMetadata",
    fields: &[
        Field::required("source", FieldKind::String),
        Field::optional("userId", FieldKind::String),
        Field::optional("sessionId", FieldKind::String),
        Field::optional("correlationId", FieldKind::String),
        Field::optional("causationId", FieldKind::String),
        Field::defaulted(
            "tags",
            FieldKind::List(&FieldKind::String),
            DefaultValue::List(&[]),
        ),
        Field::required("createdAt", FieldKind::Timestamp),
        Field::optional("scheduledAt", FieldKind::Timestamp),
        Field::optional("expiresAt", FieldKind::Timestamp),
    ],
};

/// The work item a runner executes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
    pub data: Attributes,
    pub options: Attributes,
}

pub const JOB_PAYLOAD_SHAPE: Shape = Shape {
    name: "JobPayload",
    fields: &[
        Field::required("type", FieldKind::String),
        Field::defaulted("version", FieldKind::String, DefaultValue::Str("1.0.0")),
        Field::required("data", FieldKind::Object),
        Field::defaulted("options", FieldKind::Object, DefaultValue::Object(&[])),
    ],
};

/// A request to run a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: i64,
    pub payload: JobPayload,
    pub metadata: JobMetadata,
    pub retry_policy: RetryPolicy,
    pub timeout_ms: f64,
}

pub const JOB_REQUEST_SHAPE: Shape = Shape {
    name: "JobRequest",
    fields: &[
        Field::required("id", FieldKind::String),
        Field::required("type", FieldKind::String),
        Field::defaulted("priority", FieldKind::Integer, DefaultValue::Int(50)),
        Field::required("payload", FieldKind::Record(&JOB_PAYLOAD_SHAPE)),
        Field::required("metadata", FieldKind::Record(&JOB_METADATA_SHAPE)),
        Field::defaulted(
            "retryPolicy",
            FieldKind::Record(&RETRY_POLICY_SHAPE),
            DefaultValue::Object(&[
                ("maxRetries", DefaultValue::Int(3)),
                ("backoffMs", DefaultValue::Float(1000.0)),
                ("maxBackoffMs", DefaultValue::Float(30000.0)),
                ("backoffMultiplier", DefaultValue::Float(2.0)),
                ("retryableCategories", DefaultValue::List(&[])),
                ("nonRetryableCategories", DefaultValue::List(&[])),
            ]),
        ),
        Field::defaulted("timeoutMs", FieldKind::Float, DefaultValue::Float(30000.0)),
    ],
};

/// Outcome of a finished job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelope>,
    pub metadata: Attributes,
}

pub const JOB_RESULT_SHAPE: Shape = Shape {
    name: "JobResult",
    fields: &[
        Field::required("success", FieldKind::Boolean),
        Field::optional("data", FieldKind::Any),
        Field::optional("error", FieldKind::Record(&ERROR_ENVELOPE_SHAPE)),
        Field::required("metadata", FieldKind::Object),
    ],
};

/// Current view of a job as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub id: String,
    pub status: JobStatus,
    pub request: JobRequest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<JobResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelope>,
    pub updated_at: DateTime<Utc>,
}

pub const JOB_RESPONSE_SHAPE: Shape = Shape {
    name: "JobResponse",
    fields: &[
        Field::required("id", FieldKind::String),
        Field::required("status", FieldKind::Enum(JobStatus::VALUES)),
        Field::required("request", FieldKind::Record(&JOB_REQUEST_SHAPE)),
        Field::optional("result", FieldKind::Record(&JOB_RESULT_SHAPE)),
        Field::optional("error", FieldKind::Record(&ERROR_ENVELOPE_SHAPE)),
        Field::required("updatedAt", FieldKind::Timestamp),
    ],
};
