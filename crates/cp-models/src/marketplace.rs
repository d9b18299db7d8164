//! Marketplace listings, trust signals, and search.

use chrono::{DateTime, Utc};
use cp_schema::{DefaultValue, Field, FieldKind, Shape};
use serde::{Deserialize, Serialize};

use crate::catalog::{ConnectorConfig, RunnerCategory, CONNECTOR_CONFIG_SHAPE};
use crate::service::SortOrder;
use crate::versioning::{ContractVersion, CONTRACT_VERSION_SHAPE};
use crate::Attributes;

literal_enum! {
    /// Publication state of a listing.
    ListingStatus {
        Active => "active",
        Deprecated => "deprecated",
        PendingReview => "pending_review",
        Rejected => "rejected",
        Delisted => "delisted",
    }
}

literal_enum! {
    MarketplaceItemType {
        Runner => "runner",
        Connector => "connector",
        All => "all",
    }
}

literal_enum! {
    MarketplaceStatusFilter {
        Active => "active",
        Deprecated => "deprecated",
        PendingReview => "pending_review",
        All => "all",
    }
}

literal_enum! {
    TrustLevelFilter {
        Verified => "verified",
        Community => "community",
        All => "all",
    }
}

literal_enum! {
    MarketplaceSortBy {
        Relevance => "relevance",
        Name => "name",
        Published => "published",
        Updated => "updated",
        Rating => "rating",
        Downloads => "downloads",
    }
}

literal_enum! {
    TrustStatus {
        Verified => "verified",
        Pending => "pending",
        Failed => "failed",
        Unverified => "unverified",
    }
}

literal_enum! {
    ContractTestStatus {
        Passing => "passing",
        Failing => "failing",
        NotTested => "not_tested",
        Stale => "stale",
    }
}

literal_enum! {
    /// How a listing's trust status was established.
    VerificationMethod {
        AutomatedCi => "automated_ci",
        ManualReview => "manual_review",
        CommunityVerified => "community_verified",
        OfficialPublisher => "official_publisher",
    }
}

literal_enum! {
    SecurityScanStatus {
        Passed => "passed",
        Failed => "failed",
        Pending => "pending",
        NotScanned => "not_scanned",
    }
}

literal_enum! {
    MaintainerReputation {
        Official => "official",
        Verified => "verified",
        Community => "community",
        Unknown => "unknown",
    }
}

const NOT_DEPRECATED: DefaultValue =
    DefaultValue::Object(&[("isDeprecated", DefaultValue::Bool(false))]);

/// Verification, testing, and popularity evidence for a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceTrustSignals {
    pub overall_trust: TrustStatus,
    pub contract_test_status: ContractTestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contract_test_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_verified_version: Option<String>,
    pub verification_method: VerificationMethod,
    pub security_scan_status: SecurityScanStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_security_scan_at: Option<DateTime<Utc>>,
    pub security_scan_details: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_quality_score: Option<f64>,
    pub maintainer_reputation: MaintainerReputation,
    pub download_count: f64,
    pub rating: Attributes,
}

pub const MARKETPLACE_TRUST_SIGNALS_SHAPE: Shape = Shape {
    name: "MarketplaceTrustSignals",
    fields: &[
        Field::required("overallTrust", FieldKind::Enum(TrustStatus::VALUES)),
        Field::required(
            "contractTestStatus",
            FieldKind::Enum(ContractTestStatus::VALUES),
        ),
        Field::optional("lastContractTestAt", FieldKind::Timestamp),
        Field::optional("lastVerifiedVersion", FieldKind::String),
        Field::required(
            "verificationMethod",
            FieldKind::Enum(VerificationMethod::VALUES),
        ),
        Field::required(
            "securityScanStatus",
            FieldKind::Enum(SecurityScanStatus::VALUES),
        ),
        Field::optional("lastSecurityScanAt", FieldKind::Timestamp),
        Field::defaulted(
            "securityScanDetails",
            FieldKind::Object,
            DefaultValue::Object(&[]),
        ),
        Field::optional("codeQualityScore", FieldKind::Float),
        Field::defaulted(
            "maintainerReputation",
            FieldKind::Enum(MaintainerReputation::VALUES),
            DefaultValue::Str("unknown"),
        ),
        Field::defaulted("downloadCount", FieldKind::Float, DefaultValue::Float(0.0)),
        Field::defaulted("rating", FieldKind::Object, DefaultValue::Object(&[])),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceRunner {
    pub id: String,
    pub metadata: Attributes,
    pub category: RunnerCategory,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    pub author: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<Attributes>,
    pub documentation: Attributes,
    pub license: String,
    pub keywords: Vec<String>,
    pub capabilities: Vec<Attributes>,
    pub compatibility: Attributes,
    pub trust_signals: MarketplaceTrustSignals,
    pub deprecation: Attributes,
    pub status: ListingStatus,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version_history: Vec<Attributes>,
    pub installation: Attributes,
}

pub const MARKETPLACE_RUNNER_SHAPE: Shape = Shape {
    name: "MarketplaceRunner",
    fields: &[
        Field::required("id", FieldKind::String),
        Field::required("metadata", FieldKind::Object),
        Field::required("category", FieldKind::Enum(RunnerCategory::VALUES)),
        Field::required("description", FieldKind::String),
        Field::optional("longDescription", FieldKind::String),
        Field::required("author", FieldKind::Object),
        Field::optional("repository", FieldKind::Object),
        Field::defaulted(
            "documentation",
            FieldKind::Object,
            DefaultValue::Object(&[]),
        ),
        Field::required("license", FieldKind::String),
        Field::defaulted(
            "keywords",
            FieldKind::List(&FieldKind::String),
            DefaultValue::List(&[]),
        ),
        Field::required("capabilities", FieldKind::List(&FieldKind::Object)),
        Field::required("compatibility", FieldKind::Object),
        Field::required(
            "trustSignals",
            FieldKind::Record(&MARKETPLACE_TRUST_SIGNALS_SHAPE),
        ),
        Field::defaulted("deprecation", FieldKind::Object, NOT_DEPRECATED),
        Field::defaulted(
            "status",
            FieldKind::Enum(ListingStatus::VALUES),
            DefaultValue::Str("active"),
        ),
        Field::required("publishedAt", FieldKind::Timestamp),
        Field::required("updatedAt", FieldKind::Timestamp),
        Field::defaulted(
            "versionHistory",
            FieldKind::List(&FieldKind::Object),
            DefaultValue::List(&[]),
        ),
        Field::defaulted("installation", FieldKind::Object, DefaultValue::Object(&[])),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceConnector {
    pub id: String,
    pub config: ConnectorConfig,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    pub author: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<Attributes>,
    pub documentation: Attributes,
    pub license: String,
    pub keywords: Vec<String>,
    pub input_schema: Attributes,
    pub output_schema: Attributes,
    pub compatibility: Attributes,
    pub trust_signals: MarketplaceTrustSignals,
    pub deprecation: Attributes,
    pub status: ListingStatus,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version_history: Vec<Attributes>,
    pub installation: Attributes,
}

pub const MARKETPLACE_CONNECTOR_SHAPE: Shape = Shape {
    name: "MarketplaceConnector",
    fields: &[
        Field::required("id", FieldKind::String),
        Field::required("config", FieldKind::Record(&CONNECTOR_CONFIG_SHAPE)),
        Field::required("description", FieldKind::String),
        Field::optional("longDescription", FieldKind::String),
        Field::required("author", FieldKind::Object),
        Field::optional("repository", FieldKind::Object),
        Field::defaulted(
            "documentation",
            FieldKind::Object,
            DefaultValue::Object(&[]),
        ),
        Field::required("license", FieldKind::String),
        Field::defaulted(
            "keywords",
            FieldKind::List(&FieldKind::String),
            DefaultValue::List(&[]),
        ),
        Field::required("inputSchema", FieldKind::Object),
        Field::required("outputSchema", FieldKind::Object),
        Field::required("compatibility", FieldKind::Object),
        Field::required(
            "trustSignals",
            FieldKind::Record(&MARKETPLACE_TRUST_SIGNALS_SHAPE),
        ),
        Field::defaulted("deprecation", FieldKind::Object, NOT_DEPRECATED),
        Field::defaulted(
            "status",
            FieldKind::Enum(ListingStatus::VALUES),
            DefaultValue::Str("active"),
        ),
        Field::required("publishedAt", FieldKind::Timestamp),
        Field::required("updatedAt", FieldKind::Timestamp),
        Field::defaulted(
            "versionHistory",
            FieldKind::List(&FieldKind::Object),
            DefaultValue::List(&[]),
        ),
        Field::defaulted("installation", FieldKind::Object, DefaultValue::Object(&[])),
    ],
};

/// A single search hit: either kind of listing.
///
/// Runner is tried first, matching the order of the `items` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarketplaceItem {
    Runner(Box<MarketplaceRunner>),
    Connector(Box<MarketplaceConnector>),
}

impl MarketplaceItem {
    pub fn id(&self) -> &str {
        match self {
            Self::Runner(runner) => &runner.id,
            Self::Connector(connector) => &connector.id,
        }
    }
}

/// Full marketplace catalogue as published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceIndex {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub schema: Attributes,
    pub system: Attributes,
    pub stats: Attributes,
    pub runners: Vec<MarketplaceRunner>,
    pub connectors: Vec<MarketplaceConnector>,
    pub filters: Attributes,
}

pub const MARKETPLACE_INDEX_SHAPE: Shape = Shape {
    name: "MarketplaceIndex",
    fields: &[
        Field::required("version", FieldKind::String),
        Field::required("generatedAt", FieldKind::Timestamp),
        Field::required("schema", FieldKind::Object),
        Field::required("system", FieldKind::Object),
        Field::required("stats", FieldKind::Object),
        Field::required(
            "runners",
            FieldKind::List(&FieldKind::Record(&MARKETPLACE_RUNNER_SHAPE)),
        ),
        Field::required(
            "connectors",
            FieldKind::List(&FieldKind::Record(&MARKETPLACE_CONNECTOR_SHAPE)),
        ),
        Field::required("filters", FieldKind::Object),
    ],
};

/// Marketplace search parameters. Every field has a default or is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceQuery {
    #[serde(rename = "type")]
    pub kind: MarketplaceItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_type: Option<String>,
    pub status: MarketplaceStatusFilter,
    pub trust_level: TrustLevelFilter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility_version: Option<ContractVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub keywords: Vec<String>,
    pub sort_by: MarketplaceSortBy,
    pub sort_order: SortOrder,
    pub limit: f64,
    pub offset: f64,
}

pub const MARKETPLACE_QUERY_SHAPE: Shape = Shape {
    name: "MarketplaceQuery",
    fields: &[
        Field::defaulted(
            "type",
            FieldKind::Enum(MarketplaceItemType::VALUES),
            DefaultValue::Str("all"),
        ),
        Field::optional("category", FieldKind::String),
        Field::optional("connectorType", FieldKind::String),
        Field::defaulted(
            "status",
            FieldKind::Enum(MarketplaceStatusFilter::VALUES),
            DefaultValue::Str("active"),
        ),
        Field::defaulted(
            "trustLevel",
            FieldKind::Enum(TrustLevelFilter::VALUES),
            DefaultValue::Str("all"),
        ),
        Field::optional("search", FieldKind::String),
        Field::optional(
            "compatibilityVersion",
            FieldKind::Record(&CONTRACT_VERSION_SHAPE),
        ),
        Field::optional("author", FieldKind::String),
        Field::defaulted(
            "keywords",
            FieldKind::List(&FieldKind::String),
            DefaultValue::List(&[]),
        ),
        Field::defaulted(
            "sortBy",
            FieldKind::Enum(MarketplaceSortBy::VALUES),
            DefaultValue::Str("relevance"),
        ),
        Field::defaulted(
            "sortOrder",
            FieldKind::Enum(SortOrder::VALUES),
            DefaultValue::Str("desc"),
        ),
        Field::defaulted("limit", FieldKind::Float, DefaultValue::Float(20.0)),
        Field::defaulted("offset", FieldKind::Float, DefaultValue::Float(0.0)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceQueryResult {
    pub query: MarketplaceQuery,
    pub total: f64,
    pub has_more: bool,
    pub items: Vec<MarketplaceItem>,
    pub facets: Attributes,
}

pub const MARKETPLACE_QUERY_RESULT_SHAPE: Shape = Shape {
    name: "MarketplaceQueryResult",
    fields: &[
        Field::required("query", FieldKind::Record(&MARKETPLACE_QUERY_SHAPE)),
        Field::required("total", FieldKind::Float),
        Field::required("hasMore", FieldKind::Boolean),
        Field::required(
            "items",
            FieldKind::List(&FieldKind::OneOf(&[
                FieldKind::Record(&MARKETPLACE_RUNNER_SHAPE),
                FieldKind::Record(&MARKETPLACE_CONNECTOR_SHAPE),
            ])),
        ),
        Field::required("facets", FieldKind::Object),
    ],
};
