//! TruthCore assertion store records.

use chrono::{DateTime, Utc};
use cp_schema::{DefaultValue, Field, FieldKind, Shape};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ErrorEnvelope, ERROR_ENVELOPE_SHAPE};
use crate::Attributes;

literal_enum! {
    /// Operation carried by a [`TruthCoreRequest`].
    TruthCoreRequestType {
        Assert => "assert",
        Query => "query",
        Subscribe => "subscribe",
        Unsubscribe => "unsubscribe",
    }
}

literal_enum! {
    ConsistencyLevel {
        Strict => "strict",
        Eventual => "eventual",
        BestEffort => "best_effort",
    }
}

/// Object position of an assertion: any JSON value, `null` included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TruthValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Value>),
    Map(Attributes),
}

/// A subject-predicate-object fact with provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruthAssertion {
    pub id: String,
    pub subject: String,
    pub predicate: String,
    pub object: TruthValue,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub metadata: Attributes,
}

pub const TRUTH_ASSERTION_SHAPE: Shape = Shape {
    name: "TruthAssertion",
    fields: &[
        Field::required("id", FieldKind::String),
        Field::required("subject", FieldKind::String),
        Field::required("predicate", FieldKind::String),
        Field::required("object", FieldKind::Any),
        Field::defaulted("confidence", FieldKind::Float, DefaultValue::Float(1.0)),
        Field::required("timestamp", FieldKind::Timestamp),
        Field::required("source", FieldKind::String),
        Field::optional("expiresAt", FieldKind::Timestamp),
        Field::defaulted("metadata", FieldKind::Object, DefaultValue::Object(&[])),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruthQuery {
    pub id: String,
    pub pattern: Attributes,
    pub filters: Attributes,
    pub limit: i64,
    pub offset: i64,
}

pub const TRUTH_QUERY_SHAPE: Shape = Shape {
    name: "TruthQuery",
    fields: &[
        Field::required("id", FieldKind::String),
        Field::required("pattern", FieldKind::Object),
        Field::defaulted("filters", FieldKind::Object, DefaultValue::Object(&[])),
        Field::defaulted("limit", FieldKind::Integer, DefaultValue::Int(100)),
        Field::defaulted("offset", FieldKind::Integer, DefaultValue::Int(0)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruthQueryResult {
    pub query_id: String,
    pub assertions: Vec<TruthAssertion>,
    pub total_count: i64,
    pub has_more: bool,
    pub query_time_ms: f64,
}

pub const TRUTH_QUERY_RESULT_SHAPE: Shape = Shape {
    name: "TruthQueryResult",
    fields: &[
        Field::required("queryId", FieldKind::String),
        Field::required(
            "assertions",
            FieldKind::List(&FieldKind::Record(&TRUTH_ASSERTION_SHAPE)),
        ),
        Field::required("totalCount", FieldKind::Integer),
        Field::defaulted("hasMore", FieldKind::Boolean, DefaultValue::Bool(false)),
        Field::required("queryTimeMs", FieldKind::Float),
    ],
};

/// Standing query that pushes matching assertions to a webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruthSubscription {
    pub id: String,
    pub pattern: Attributes,
    pub filters: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub const TRUTH_SUBSCRIPTION_SHAPE: Shape = Shape {
    name: "TruthSubscription",
    fields: &[
        Field::required("id", FieldKind::String),
        Field::required("pattern", FieldKind::Object),
        Field::defaulted("filters", FieldKind::Object, DefaultValue::Object(&[])),
        Field::optional("webhookUrl", FieldKind::String),
        Field::required("createdAt", FieldKind::Timestamp),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruthCoreRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TruthCoreRequestType,
    pub payload: Attributes,
    pub metadata: Attributes,
}

pub const TRUTH_CORE_REQUEST_SHAPE: Shape = Shape {
    name: "TruthCoreRequest",
    fields: &[
        Field::required("id", FieldKind::String),
        Field::required("type", FieldKind::Enum(TruthCoreRequestType::VALUES)),
        Field::required("payload", FieldKind::Object),
        Field::required("metadata", FieldKind::Object),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruthCoreResponse {
    pub request_id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelope>,
    pub timestamp: DateTime<Utc>,
}

pub const TRUTH_CORE_RESPONSE_SHAPE: Shape = Shape {
    name: "TruthCoreResponse",
    fields: &[
        Field::required("requestId", FieldKind::String),
        Field::required("success", FieldKind::Boolean),
        Field::optional("data", FieldKind::Any),
        Field::optional("error", FieldKind::Record(&ERROR_ENVELOPE_SHAPE)),
        Field::required("timestamp", FieldKind::Timestamp),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truth_value_accepts_every_json_kind() {
        let cases = [
            (json!(null), TruthValue::Null),
            (json!(true), TruthValue::Bool(true)),
            (json!(2.5), TruthValue::Number(2.5)),
            (json!("blue"), TruthValue::Text("blue".into())),
            (json!([1, "a"]), TruthValue::List(vec![json!(1), json!("a")])),
        ];
        for (raw, expected) in cases {
            let decoded: TruthValue = serde_json::from_value(raw).unwrap();
            assert_eq!(decoded, expected);
        }
        let map: TruthValue = serde_json::from_value(json!({"k": 1})).unwrap();
        assert!(matches!(map, TruthValue::Map(m) if m["k"] == json!(1)));
    }

    #[test]
    fn null_object_survives_round_trip() {
        let assertion = TruthAssertion {
            id: "a1".into(),
            subject: "svc".into(),
            predicate: "owner".into(),
            object: TruthValue::Null,
            confidence: 1.0,
            timestamp: "2024-01-01T00:00:00Z".parse().unwrap(),
            source: "test".into(),
            expires_at: None,
            metadata: Attributes::new(),
        };
        let wire = serde_json::to_value(&assertion).unwrap();
        assert_eq!(wire["object"], Value::Null);
        assert!(wire.get("expiresAt").is_none());
    }
}
