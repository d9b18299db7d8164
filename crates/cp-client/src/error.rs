//! Client error types.

use std::time::Duration;

use cp_models::ValidationError;

use crate::config::ConfigError;

/// Errors from ControlPlane calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport error: connection refused, TLS failure, and the like.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// No response within the configured timeout.
    #[error("{endpoint} timed out after {timeout:?}")]
    Timeout { endpoint: String, timeout: Duration },
    /// The service returned a non-2xx status.
    #[error("ControlPlane {endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The response body was not JSON.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: serde_json::Error,
    },
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// The response decoded but did not conform to the expected model.
    #[error("response failed validation: {0}")]
    Validation(#[from] ValidationError),
}

impl ClientError {
    /// Whether this failure happened on the wire rather than in decoding,
    /// configuration, or validation.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Timeout { .. } | Self::ApiError { .. }
        )
    }

    /// HTTP status of an [`ClientError::ApiError`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
