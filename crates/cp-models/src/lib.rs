//! # cp-models: ControlPlane Contract Records
//!
//! Typed records for every ControlPlane wire contract, the shape each one is
//! validated against, and the name-addressed registry.
//!
//! ## Layout
//!
//! | Module | Records |
//! |--------|---------|
//! | [`errors`] | `RetryPolicy`, `ErrorDetail`, `ErrorEnvelope` |
//! | [`versioning`] | `ContractVersion`, `ContractRange` |
//! | [`jobs`] | job metadata, payload, request, result, response |
//! | [`runners`] | runner capability, registration, heartbeat, execution |
//! | [`truth`] | TruthCore assertions, queries, subscriptions |
//! | [`service`] | health, service metadata, pagination, API envelopes |
//! | [`catalog`] | capability registry, connectors, registry queries |
//! | [`marketplace`] | marketplace listings, trust signals, search |
//!
//! ## Validation
//!
//! ```
//! use cp_models::{jobs::JobRequest, validate_as};
//! use serde_json::json;
//!
//! let job: JobRequest = validate_as(&json!({
//!     "id": "j1",
//!     "type": "ingest",
//!     "payload": {"type": "x", "data": {}},
//!     "metadata": {"source": "api", "createdAt": "2024-01-01T00:00:00Z"}
//! }))
//! .unwrap();
//! assert_eq!(job.priority, 50);
//! assert_eq!(job.timeout_ms, 30000.0);
//! ```
//!
//! Every record serializes canonically: required fields always present,
//! absent optionals omitted, enumerations as their literal, timestamps as
//! RFC 3339 text.

#[macro_use]
mod macros;

pub mod catalog;
pub mod errors;
pub mod jobs;
pub mod marketplace;
pub mod model;
pub mod registry;
pub mod runners;
pub mod service;
pub mod truth;
pub mod versioning;

/// Arbitrary JSON mapping carried as-is.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

pub use model::{
    audit_registry, create_validator, safe_validate, safe_validate_as, validate, validate_as,
    validate_named, Model, Validated, Validator,
};
pub use registry::{get_schema, list_schemas, AnyModel, ModelName, Schema};
pub use versioning::{ContractRange, ContractVersion, CONTRACT_VERSION};

pub use cp_schema::{FieldIssue, FieldPath, IssueKind, SchemaError, ValidationError};
