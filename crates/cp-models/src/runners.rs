//! Runner registration, heartbeat, and execution records.

use chrono::{DateTime, Utc};
use cp_schema::{DefaultValue, Field, FieldKind, Shape};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ErrorEnvelope, ERROR_ENVELOPE_SHAPE};
use crate::versioning::{ContractVersion, CONTRACT_VERSION_SHAPE};
use crate::Attributes;

literal_enum! {
    /// Health of a registered runner.
    RunnerStatus {
        Healthy => "healthy",
        Degraded => "degraded",
        Unhealthy => "unhealthy",
        Offline => "offline",
    }
}

literal_enum! {
    /// Health a runner self-reports in a heartbeat.
    HeartbeatStatus {
        Healthy => "healthy",
        Degraded => "degraded",
        Unhealthy => "unhealthy",
    }
}

/// One unit of work a runner can perform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerCapability {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: String,
    pub input_schema: Attributes,
    pub output_schema: Attributes,
    pub supported_job_types: Vec<String>,
    pub max_concurrency: i64,
    pub timeout_ms: f64,
    pub resource_requirements: Attributes,
}

pub const RUNNER_CAPABILITY_SHAPE: Shape = Shape {
    name: "RunnerCapability",
    fields: &[
        Field::required("id", FieldKind::String),
        Field::required("name", FieldKind::String),
        Field::required("version", FieldKind::String),
        Field::required("description", FieldKind::String),
        Field::required("inputSchema", FieldKind::Object),
        Field::required("outputSchema", FieldKind::Object),
        Field::required("supportedJobTypes", FieldKind::List(&FieldKind::String)),
        Field::defaulted("maxConcurrency", FieldKind::Integer, DefaultValue::Int(1)),
        Field::defaulted("timeoutMs", FieldKind::Float, DefaultValue::Float(30000.0)),
        Field::defaulted(
            "resourceRequirements",
            FieldKind::Object,
            DefaultValue::Object(&[]),
        ),
    ],
};

/// Full description of a registered runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerMetadata {
    pub id: String,
    pub name: String,
    pub version: String,
    pub contract_version: ContractVersion,
    pub capabilities: Vec<RunnerCapability>,
    pub supported_contracts: Vec<String>,
    pub health_check_endpoint: String,
    pub registered_at: DateTime<Utc>,
    pub last_heartbeat_at: DateTime<Utc>,
    pub status: RunnerStatus,
    pub tags: Vec<String>,
}

pub const RUNNER_METADATA_SHAPE: Shape = Shape {
    name: "RunnerMetadata",
    fields: &[
        Field::required("id", FieldKind::String),
        Field::required("name", FieldKind::String),
        Field::required("version", FieldKind::String),
        Field::required(
            "contractVersion",
            FieldKind::Record(&CONTRACT_VERSION_SHAPE),
        ),
        Field::required(
            "capabilities",
            FieldKind::List(&FieldKind::Record(&RUNNER_CAPABILITY_SHAPE)),
        ),
        Field::required("supportedContracts", FieldKind::List(&FieldKind::String)),
        Field::required("healthCheckEndpoint", FieldKind::String),
        Field::required("registeredAt", FieldKind::Timestamp),
        Field::required("lastHeartbeatAt", FieldKind::Timestamp),
        Field::defaulted(
            "status",
            FieldKind::Enum(RunnerStatus::VALUES),
            DefaultValue::Str("healthy"),
        ),
        Field::defaulted(
            "tags",
            FieldKind::List(&FieldKind::String),
            DefaultValue::List(&[]),
        ),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerRegistrationRequest {
    pub name: String,
    pub version: String,
    pub contract_version: ContractVersion,
    pub capabilities: Vec<RunnerCapability>,
    pub health_check_endpoint: String,
    pub tags: Vec<String>,
}

pub const RUNNER_REGISTRATION_REQUEST_SHAPE: Shape = Shape {
    name: "RunnerRegistrationRequest",
    fields: &[
        Field::required("name", FieldKind::String),
        Field::required("version", FieldKind::String),
        Field::required(
            "contractVersion",
            FieldKind::Record(&CONTRACT_VERSION_SHAPE),
        ),
        Field::required(
            "capabilities",
            FieldKind::List(&FieldKind::Record(&RUNNER_CAPABILITY_SHAPE)),
        ),
        Field::required("healthCheckEndpoint", FieldKind::String),
        Field::defaulted(
            "tags",
            FieldKind::List(&FieldKind::String),
            DefaultValue::List(&[]),
        ),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerRegistrationResponse {
    pub runner_id: String,
    pub registered_at: DateTime<Utc>,
    pub heartbeat_interval_ms: f64,
}

pub const RUNNER_REGISTRATION_RESPONSE_SHAPE: Shape = Shape {
    name: "RunnerRegistrationResponse",
    fields: &[
        Field::required("runnerId", FieldKind::String),
        Field::required("registeredAt", FieldKind::Timestamp),
        Field::defaulted(
            "heartbeatIntervalMs",
            FieldKind::Float,
            DefaultValue::Float(30000.0),
        ),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerHeartbeat {
    pub runner_id: String,
    pub timestamp: DateTime<Utc>,
    pub status: HeartbeatStatus,
    pub active_jobs: i64,
    pub queued_jobs: i64,
    pub metrics: Attributes,
}

pub const RUNNER_HEARTBEAT_SHAPE: Shape = Shape {
    name: "RunnerHeartbeat",
    fields: &[
        Field::required("runnerId", FieldKind::String),
        Field::required("timestamp", FieldKind::Timestamp),
        Field::required("status", FieldKind::Enum(HeartbeatStatus::VALUES)),
        Field::defaulted("activeJobs", FieldKind::Integer, DefaultValue::Int(0)),
        Field::defaulted("queuedJobs", FieldKind::Integer, DefaultValue::Int(0)),
        Field::defaulted("metrics", FieldKind::Object, DefaultValue::Object(&[])),
    ],
};

/// Deployable module that bundles one or more capabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleManifest {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: String,
    pub entry_point: String,
    pub contract_version: ContractVersion,
    pub capabilities: Vec<RunnerCapability>,
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_schema: Option<Attributes>,
    pub default_config: Attributes,
}

pub const MODULE_MANIFEST_SHAPE: Shape = Shape {
    name: "ModuleManifest",
    fields: &[
        Field::required("id", FieldKind::String),
        Field::required("name", FieldKind::String),
        Field::required("version", FieldKind::String),
        Field::required("description", FieldKind::String),
        Field::required("entryPoint", FieldKind::String),
        Field::required(
            "contractVersion",
            FieldKind::Record(&CONTRACT_VERSION_SHAPE),
        ),
        Field::required(
            "capabilities",
            FieldKind::List(&FieldKind::Record(&RUNNER_CAPABILITY_SHAPE)),
        ),
        Field::defaulted(
            "dependencies",
            FieldKind::List(&FieldKind::String),
            DefaultValue::List(&[]),
        ),
        Field::optional("configSchema", FieldKind::Object),
        Field::defaulted(
            "defaultConfig",
            FieldKind::Object,
            DefaultValue::Object(&[]),
        ),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerExecutionRequest {
    pub job_id: String,
    pub module_id: String,
    pub capability_id: String,
    pub payload: Attributes,
    pub timeout_ms: f64,
    pub metadata: Attributes,
}

pub const RUNNER_EXECUTION_REQUEST_SHAPE: Shape = Shape {
    name: "RunnerExecutionRequest",
    fields: &[
        Field::required("jobId", FieldKind::String),
        Field::required("moduleId", FieldKind::String),
        Field::required("capabilityId", FieldKind::String),
        Field::required("payload", FieldKind::Object),
        Field::defaulted("timeoutMs", FieldKind::Float, DefaultValue::Float(30000.0)),
        Field::defaulted("metadata", FieldKind::Object, DefaultValue::Object(&[])),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerExecutionResponse {
    pub job_id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelope>,
    pub execution_time_ms: f64,
    pub runner_id: String,
}

pub const RUNNER_EXECUTION_RESPONSE_SHAPE: Shape = Shape {
    name: "RunnerExecutionResponse",
    fields: &[
        Field::required("jobId", FieldKind::String),
        Field::required("success", FieldKind::Boolean),
        Field::optional("data", FieldKind::Any),
        Field::optional("error", FieldKind::Record(&ERROR_ENVELOPE_SHAPE)),
        Field::required("executionTimeMs", FieldKind::Float),
        Field::required("runnerId", FieldKind::String),
    ],
};
