//! Capability registry: the published catalogue of runners and connectors.

use chrono::{DateTime, Utc};
use cp_schema::{DefaultValue, Field, FieldKind, Shape};
use serde::{Deserialize, Serialize};

use crate::runners::{
    RunnerCapability, RunnerMetadata, RUNNER_CAPABILITY_SHAPE, RUNNER_METADATA_SHAPE,
};
use crate::Attributes;

literal_enum! {
    /// Functional area a runner belongs to.
    RunnerCategory {
        Ops => "ops",
        Finops => "finops",
        Support => "support",
        Growth => "growth",
        Analytics => "analytics",
        Security => "security",
        Infrastructure => "infrastructure",
        Custom => "custom",
    }
}

literal_enum! {
    ConnectorType {
        Database => "database",
        Queue => "queue",
        Storage => "storage",
        Api => "api",
        Webhook => "webhook",
        Stream => "stream",
        Cache => "cache",
        Messaging => "messaging",
    }
}

literal_enum! {
    ConnectorStatus {
        Connected => "connected",
        Disconnected => "disconnected",
        Error => "error",
        Unknown => "unknown",
    }
}

literal_enum! {
    /// Health filter for registry queries; `any` disables filtering.
    RegistryHealthFilter {
        Healthy => "healthy",
        Degraded => "degraded",
        Unhealthy => "unhealthy",
        Offline => "offline",
        Any => "any",
    }
}

/// Static description of an external system a runner can talk to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorConfig {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ConnectorType,
    pub version: String,
    pub description: String,
    pub config_schema: Attributes,
    pub required: bool,
    pub health_checkable: bool,
}

pub const CONNECTOR_CONFIG_SHAPE: Shape = Shape {
    name: "ConnectorConfig",
    fields: &[
        Field::required("id", FieldKind::String),
        Field::required("name", FieldKind::String),
        Field::required("type", FieldKind::Enum(ConnectorType::VALUES)),
        Field::required("version", FieldKind::String),
        Field::required("description", FieldKind::String),
        Field::required("configSchema", FieldKind::Object),
        Field::defaulted("required", FieldKind::Boolean, DefaultValue::Bool(false)),
        Field::defaulted(
            "healthCheckable",
            FieldKind::Boolean,
            DefaultValue::Bool(true),
        ),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredRunner {
    pub metadata: RunnerMetadata,
    pub category: RunnerCategory,
    /// Ids of the connectors this runner depends on.
    pub connectors: Vec<String>,
    pub health: Attributes,
    pub capabilities: Vec<RunnerCapability>,
}

pub const REGISTERED_RUNNER_SHAPE: Shape = Shape {
    name: "RegisteredRunner",
    fields: &[
        Field::required("metadata", FieldKind::Record(&RUNNER_METADATA_SHAPE)),
        Field::required("category", FieldKind::Enum(RunnerCategory::VALUES)),
        Field::required("connectors", FieldKind::List(&FieldKind::String)),
        Field::required("health", FieldKind::Object),
        Field::required(
            "capabilities",
            FieldKind::List(&FieldKind::Record(&RUNNER_CAPABILITY_SHAPE)),
        ),
    ],
};

/// Snapshot of every runner and connector known to the control plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityRegistry {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub system: Attributes,
    pub truthcore: Attributes,
    pub runners: Vec<RegisteredRunner>,
    pub connectors: Vec<ConnectorConfig>,
    pub summary: Attributes,
}

pub const CAPABILITY_REGISTRY_SHAPE: Shape = Shape {
    name: "CapabilityRegistry",
    fields: &[
        Field::required("version", FieldKind::String),
        Field::required("generatedAt", FieldKind::Timestamp),
        Field::required("system", FieldKind::Object),
        Field::required("truthcore", FieldKind::Object),
        Field::required(
            "runners",
            FieldKind::List(&FieldKind::Record(&REGISTERED_RUNNER_SHAPE)),
        ),
        Field::required(
            "connectors",
            FieldKind::List(&FieldKind::Record(&CONNECTOR_CONFIG_SHAPE)),
        ),
        Field::required("summary", FieldKind::Object),
    ],
};

/// Live state of a configured connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorInstance {
    pub config: ConnectorConfig,
    pub status: ConnectorStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_connected_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub metadata: Attributes,
}

pub const CONNECTOR_INSTANCE_SHAPE: Shape = Shape {
    name: "ConnectorInstance",
    fields: &[
        Field::required("config", FieldKind::Record(&CONNECTOR_CONFIG_SHAPE)),
        Field::required("status", FieldKind::Enum(ConnectorStatus::VALUES)),
        Field::optional("lastConnectedAt", FieldKind::Timestamp),
        Field::optional("lastErrorAt", FieldKind::Timestamp),
        Field::optional("errorMessage", FieldKind::String),
        Field::defaulted("metadata", FieldKind::Object, DefaultValue::Object(&[])),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<RunnerCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_type: Option<ConnectorType>,
    pub health_status: RegistryHealthFilter,
    pub include_capabilities: bool,
    pub include_connectors: bool,
}

pub const REGISTRY_QUERY_SHAPE: Shape = Shape {
    name: "RegistryQuery",
    fields: &[
        Field::optional("category", FieldKind::Enum(RunnerCategory::VALUES)),
        Field::optional("connectorType", FieldKind::Enum(ConnectorType::VALUES)),
        Field::defaulted(
            "healthStatus",
            FieldKind::Enum(RegistryHealthFilter::VALUES),
            DefaultValue::Str("any"),
        ),
        Field::defaulted(
            "includeCapabilities",
            FieldKind::Boolean,
            DefaultValue::Bool(true),
        ),
        Field::defaulted(
            "includeConnectors",
            FieldKind::Boolean,
            DefaultValue::Bool(true),
        ),
    ],
};

/// Change set between two registry snapshots, identified by checksum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryDiff {
    pub added: Vec<Attributes>,
    pub removed: Vec<Attributes>,
    pub modified: Vec<Attributes>,
    pub timestamp: DateTime<Utc>,
    pub previous_checksum: String,
    pub current_checksum: String,
}

pub const REGISTRY_DIFF_SHAPE: Shape = Shape {
    name: "RegistryDiff",
    fields: &[
        Field::required("added", FieldKind::List(&FieldKind::Object)),
        Field::required("removed", FieldKind::List(&FieldKind::Object)),
        Field::required("modified", FieldKind::List(&FieldKind::Object)),
        Field::required("timestamp", FieldKind::Timestamp),
        Field::required("previousChecksum", FieldKind::String),
        Field::required("currentChecksum", FieldKind::String),
    ],
};
