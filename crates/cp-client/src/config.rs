//! Client configuration.
//!
//! Built explicitly with [`ClientConfig::new`] or loaded from the
//! environment with [`ClientConfig::from_env`].

use std::time::Duration;

use url::Url;
use zeroize::Zeroizing;

/// Base URL used when `CONTROLPLANE_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for a ControlPlane service.
///
/// Custom `Debug` implementation redacts the `api_key` field. The key is
/// zeroized when the config is dropped.
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    /// Bearer token. `None` or an empty string sends no `Authorization` header.
    pub api_key: Option<Zeroizing<String>>,
    /// Per-request timeout covering connect, send, and body read.
    pub timeout: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Configuration with no credentials and the default 30 second timeout.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Zeroizing::new(api_key.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured key, if it is non-empty.
    pub(crate) fn bearer_token(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(String::as_str)
            .filter(|key| !key.is_empty())
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CONTROLPLANE_BASE_URL` (default: `http://localhost:8080`)
    /// - `CONTROLPLANE_API_KEY` (optional)
    /// - `CONTROLPLANE_TIMEOUT_SECS` (default: 30; unparseable values fall back to the default)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url =
            lookup("CONTROLPLANE_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&raw_url)
            .map_err(|e| {
                ConfigError::InvalidUrl("CONTROLPLANE_BASE_URL".to_string(), e.to_string())
            })?;

        let timeout = lookup("CONTROLPLANE_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Ok(Self {
            base_url,
            api_key: lookup("CONTROLPLANE_API_KEY").map(Zeroizing::new),
            timeout,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("API key contains characters that are not valid in an HTTP header")]
    InvalidApiKey,
    #[error("invalid value for header {0}")]
    InvalidHeader(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| vars.get(var).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let cfg = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg.base_url.as_str(), "http://localhost:8080/");
        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn environment_overrides_are_read() {
        let cfg = ClientConfig::from_lookup(lookup_from(&[
            ("CONTROLPLANE_BASE_URL", "https://cp.example.com/api"),
            ("CONTROLPLANE_API_KEY", "k-123"),
            ("CONTROLPLANE_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(cfg.base_url.as_str(), "https://cp.example.com/api");
        assert_eq!(cfg.bearer_token(), Some("k-123"));
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }

    #[test]
    fn unparseable_timeout_falls_back_to_default() {
        let cfg =
            ClientConfig::from_lookup(lookup_from(&[("CONTROLPLANE_TIMEOUT_SECS", "soon")]))
                .unwrap();
        assert_eq!(cfg.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ClientConfig::from_lookup(lookup_from(&[("CONTROLPLANE_BASE_URL", "not a url")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidUrl(ref var, _) if var == "CONTROLPLANE_BASE_URL"
        ));
    }

    #[test]
    fn empty_key_is_not_a_bearer_token() {
        let cfg = ClientConfig::new(DEFAULT_BASE_URL.parse().unwrap()).with_api_key("");
        assert_eq!(cfg.bearer_token(), None);
    }

    #[test]
    fn debug_redacts_api_key() {
        let cfg = ClientConfig::new(DEFAULT_BASE_URL.parse().unwrap()).with_api_key("super-secret");
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
