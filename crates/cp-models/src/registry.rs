//! Name-addressed registry of every contract model.
//!
//! The registry is a closed, compile-time table: [`ModelName`] enumerates the
//! registered names in publication order and maps each to its [`Shape`].
//! Lookups by string go through [`get_schema`], which accepts exact names
//! only.

use std::fmt;
use std::str::FromStr;

use cp_schema::{SchemaError, Shape};
use serde::Serialize;
use serde_json::Value;

use crate::catalog::*;
use crate::errors::*;
use crate::jobs::*;
use crate::marketplace::*;
use crate::model::Model;
use crate::runners::*;
use crate::service::*;
use crate::truth::*;
use crate::versioning::*;

macro_rules! registry {
    ($($name:ident => $shape:ident),+ $(,)?) => {
        /// Name of a registered contract model.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub enum ModelName {
            $($name,)+
        }

        impl ModelName {
            /// Every registered name, in registration order.
            pub const ALL: &'static [ModelName] = &[$(ModelName::$name,)+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$name => stringify!($name),)+
                }
            }

            pub fn shape(&self) -> &'static Shape {
                match self {
                    $(Self::$name => &$shape,)+
                }
            }
        }

        impl FromStr for ModelName {
            type Err = SchemaError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($name) => Ok(Self::$name),)+
                    other => Err(SchemaError::SchemaNotFound(other.to_string())),
                }
            }
        }

        /// A validated instance of any registered model.
        ///
        /// Serializes as the inner record, without a tag.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(untagged)]
        #[allow(clippy::large_enum_variant)]
        pub enum AnyModel {
            $($name($name),)+
        }

        impl AnyModel {
            pub fn model_name(&self) -> ModelName {
                match self {
                    $(Self::$name(_) => ModelName::$name,)+
                }
            }

            /// Decode an already-checked mapping into the typed record for `model`.
            pub(crate) fn decode(
                model: ModelName,
                value: Value,
            ) -> Result<Self, serde_json::Error> {
                match model {
                    $(ModelName::$name => serde_json::from_value(value).map(Self::$name),)+
                }
            }
        }

        $(
            impl Model for $name {
                const NAME: ModelName = ModelName::$name;
            }

            impl From<$name> for AnyModel {
                fn from(model: $name) -> Self {
                    Self::$name(model)
                }
            }
        )+
    };
}

registry! {
    RetryPolicy => RETRY_POLICY_SHAPE,
    ErrorDetail => ERROR_DETAIL_SHAPE,
    ErrorEnvelope => ERROR_ENVELOPE_SHAPE,
    ContractVersion => CONTRACT_VERSION_SHAPE,
    ContractRange => CONTRACT_RANGE_SHAPE,
    JobMetadata => JOB_METADATA_SHAPE,
    JobPayload => JOB_PAYLOAD_SHAPE,
    JobRequest => JOB_REQUEST_SHAPE,
    JobResult => JOB_RESULT_SHAPE,
    JobResponse => JOB_RESPONSE_SHAPE,
    RunnerCapability => RUNNER_CAPABILITY_SHAPE,
    RunnerMetadata => RUNNER_METADATA_SHAPE,
    RunnerRegistrationRequest => RUNNER_REGISTRATION_REQUEST_SHAPE,
    RunnerRegistrationResponse => RUNNER_REGISTRATION_RESPONSE_SHAPE,
    RunnerHeartbeat => RUNNER_HEARTBEAT_SHAPE,
    ModuleManifest => MODULE_MANIFEST_SHAPE,
    RunnerExecutionRequest => RUNNER_EXECUTION_REQUEST_SHAPE,
    RunnerExecutionResponse => RUNNER_EXECUTION_RESPONSE_SHAPE,
    TruthAssertion => TRUTH_ASSERTION_SHAPE,
    TruthQuery => TRUTH_QUERY_SHAPE,
    TruthQueryResult => TRUTH_QUERY_RESULT_SHAPE,
    TruthSubscription => TRUTH_SUBSCRIPTION_SHAPE,
    TruthCoreRequest => TRUTH_CORE_REQUEST_SHAPE,
    TruthCoreResponse => TRUTH_CORE_RESPONSE_SHAPE,
    HealthCheck => HEALTH_CHECK_SHAPE,
    ServiceMetadata => SERVICE_METADATA_SHAPE,
    PaginatedRequest => PAGINATED_REQUEST_SHAPE,
    PaginatedResponse => PAGINATED_RESPONSE_SHAPE,
    ApiRequest => API_REQUEST_SHAPE,
    ApiResponse => API_RESPONSE_SHAPE,
    CapabilityRegistry => CAPABILITY_REGISTRY_SHAPE,
    RegisteredRunner => REGISTERED_RUNNER_SHAPE,
    ConnectorConfig => CONNECTOR_CONFIG_SHAPE,
    ConnectorInstance => CONNECTOR_INSTANCE_SHAPE,
    RegistryQuery => REGISTRY_QUERY_SHAPE,
    RegistryDiff => REGISTRY_DIFF_SHAPE,
    MarketplaceIndex => MARKETPLACE_INDEX_SHAPE,
    MarketplaceRunner => MARKETPLACE_RUNNER_SHAPE,
    MarketplaceConnector => MARKETPLACE_CONNECTOR_SHAPE,
    MarketplaceQuery => MARKETPLACE_QUERY_SHAPE,
    MarketplaceQueryResult => MARKETPLACE_QUERY_RESULT_SHAPE,
    MarketplaceTrustSignals => MARKETPLACE_TRUST_SIGNALS_SHAPE,
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to a registered model: its name and its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    model: ModelName,
}

impl Schema {
    pub fn model(&self) -> ModelName {
        self.model
    }

    pub fn name(&self) -> &'static str {
        self.model.as_str()
    }

    pub fn shape(&self) -> &'static Shape {
        self.model.shape()
    }
}

impl From<ModelName> for Schema {
    fn from(model: ModelName) -> Self {
        Self { model }
    }
}

/// Look up a registered model by its exact name.
pub fn get_schema(name: &str) -> Result<Schema, SchemaError> {
    name.parse::<ModelName>().map(Schema::from)
}

/// Every registered name, in registration order.
pub fn list_schemas() -> Vec<&'static str> {
    ModelName::ALL.iter().map(ModelName::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_name_resolves() {
        let names = list_schemas();
        assert_eq!(names.len(), 42);
        for name in names {
            let schema = get_schema(name).unwrap();
            assert_eq!(schema.name(), name);
            assert_eq!(schema.shape().name, name);
        }
    }

    #[test]
    fn lookup_is_exact() {
        for bad in ["jobRequest", "JobRequest ", "", "Job", "TruthValue"] {
            let err = get_schema(bad).unwrap_err();
            assert!(matches!(err, SchemaError::SchemaNotFound(ref n) if n == bad));
        }
    }

    #[test]
    fn registration_order_starts_with_errors_and_ends_with_trust_signals() {
        let names = list_schemas();
        assert_eq!(names.first(), Some(&"RetryPolicy"));
        assert_eq!(names.last(), Some(&"MarketplaceTrustSignals"));
        assert_eq!(names.iter().position(|n| *n == "JobRequest"), Some(7));
    }
}
