//! The ControlPlane HTTP client.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use url::Url;

use cp_models::{validate_as, ContractVersion, Model, CONTRACT_VERSION};

use crate::config::{ClientConfig, ConfigError};
use crate::error::ClientError;

/// Header carrying the contract version on every request.
pub const CONTRACT_VERSION_HEADER: &str = "x-contract-version";

/// Per-call options for [`ControlPlaneClient::request`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// JSON body. Omitted from the request when `None`.
    pub body: Option<Value>,
    /// Query-string pairs, appended in order.
    pub query: Vec<(String, String)>,
    /// Extra headers. These override the defaults for the same name.
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn with_body(body: Value) -> Self {
        Self {
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// Headers sent with every request for `config` at `version`.
///
/// Always `Content-Type: application/json` and `X-Contract-Version:
/// {major}.{minor}.{patch}`. `Authorization: Bearer <key>` is added only
/// for a non-empty key and is marked sensitive.
pub fn default_headers(
    config: &ClientConfig,
    version: &ContractVersion,
) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static(CONTRACT_VERSION_HEADER),
        HeaderValue::from_str(&version.wire_tag())
            .map_err(|_| ConfigError::InvalidHeader(CONTRACT_VERSION_HEADER))?,
    );
    if let Some(key) = config.bearer_token() {
        let mut value = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|_| ConfigError::InvalidApiKey)?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

/// Client for one ControlPlane service.
///
/// Owns a single connection pool. It is released when the client is
/// dropped or passed to [`ControlPlaneClient::close`].
#[derive(Debug, Clone)]
pub struct ControlPlaneClient {
    http: reqwest::Client,
    config: ClientConfig,
    contract_version: ContractVersion,
    headers: HeaderMap,
}

impl ControlPlaneClient {
    /// Build the client and its transport from configuration.
    pub fn open(config: ClientConfig) -> Result<Self, ClientError> {
        let contract_version = CONTRACT_VERSION;
        let headers = default_headers(&config, &contract_version)?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers.clone())
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        tracing::debug!(
            base_url = %config.base_url,
            timeout = ?config.timeout,
            "opened ControlPlane client"
        );

        Ok(Self {
            http,
            config,
            contract_version,
            headers,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The contract version this client sends.
    pub fn get_contract_version(&self) -> &ContractVersion {
        &self.contract_version
    }

    /// The headers attached to every request.
    pub fn default_headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Resolve `path` against the base URL, keeping any base path prefix.
    ///
    /// `path` is appended segment by segment, so characters such as `?` are
    /// percent-encoded rather than starting a query. A query on the base URL
    /// is kept and a fragment is dropped.
    fn endpoint_url(&self, path: &str) -> Result<Url, ClientError> {
        let mut url = self.config.base_url.clone();
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| {
                ConfigError::InvalidUrl(
                    self.config.base_url.to_string(),
                    "base URL cannot carry a path".to_string(),
                )
            })?
            .pop_if_empty()
            .extend(path.trim_start_matches('/').split('/'));
        Ok(url)
    }

    fn transport_error(&self, endpoint: &str, source: reqwest::Error) -> ClientError {
        if source.is_timeout() {
            ClientError::Timeout {
                endpoint: endpoint.to_string(),
                timeout: self.config.timeout,
            }
        } else {
            ClientError::Http {
                endpoint: endpoint.to_string(),
                source,
            }
        }
    }

    /// Send a request and return the decoded JSON body, untyped.
    ///
    /// A non-2xx status is returned as [`ClientError::ApiError`] carrying the
    /// raw body. An empty body decodes to `null`. No schema validation
    /// happens here; see [`ControlPlaneClient::request_model`].
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, ClientError> {
        let endpoint = format!("{method} {path}");
        let url = self.endpoint_url(path)?;

        tracing::debug!(method = %method, url = %url, "sending ControlPlane request");

        let mut builder = self.http.request(method, url).headers(options.headers);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| self.transport_error(&endpoint, e))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| self.transport_error(&endpoint, e))?;

        if !status.is_success() {
            tracing::warn!(
                endpoint = %endpoint,
                status = status.as_u16(),
                "ControlPlane returned an error status"
            );
            return Err(ClientError::ApiError {
                endpoint,
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| ClientError::Deserialization { endpoint, source: e })
    }

    /// [`request`](Self::request), then validate the body as `T`.
    pub async fn request_model<T: Model>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let body = self.request(method, path, options).await?;
        Ok(validate_as::<T>(&body)?)
    }

    pub async fn get(&self, path: &str) -> Result<Value, ClientError> {
        self.request(Method::GET, path, RequestOptions::default()).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Value, ClientError> {
        self.request(Method::POST, path, RequestOptions::with_body(body))
            .await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<Value, ClientError> {
        self.request(Method::PUT, path, RequestOptions::with_body(body))
            .await
    }

    pub async fn patch(&self, path: &str, body: Value) -> Result<Value, ClientError> {
        self.request(Method::PATCH, path, RequestOptions::with_body(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ClientError> {
        self.request(Method::DELETE, path, RequestOptions::default())
            .await
    }

    /// Release the transport. Equivalent to dropping the client.
    pub fn close(self) {
        tracing::debug!(base_url = %self.config.base_url, "closed ControlPlane client");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::new("http://127.0.0.1:9/api/".parse().unwrap())
    }

    #[test]
    fn headers_without_key_omit_authorization() {
        let headers = default_headers(&config(), &CONTRACT_VERSION).unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[CONTRACT_VERSION_HEADER], "1.0.0");
        assert!(headers.get(AUTHORIZATION).is_none());

        let empty = default_headers(&config().with_api_key(""), &CONTRACT_VERSION).unwrap();
        assert!(empty.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn headers_with_key_carry_one_bearer_token() {
        let headers = default_headers(&config().with_api_key("tok"), &CONTRACT_VERSION).unwrap();
        let auth: Vec<_> = headers.get_all(AUTHORIZATION).iter().collect();
        assert_eq!(auth.len(), 1);
        assert_eq!(auth[0], "Bearer tok");
        assert!(auth[0].is_sensitive());
    }

    #[test]
    fn header_version_omits_pre_release() {
        let mut version = CONTRACT_VERSION;
        version.pre_release = Some("rc.1".into());
        let headers = default_headers(&config(), &version).unwrap();
        assert_eq!(headers[CONTRACT_VERSION_HEADER], "1.0.0");
    }

    #[test]
    fn newline_in_key_is_a_config_error() {
        let err =
            default_headers(&config().with_api_key("bad\nkey"), &CONTRACT_VERSION).unwrap_err();
        assert!(matches!(err, ClientError::Config(ConfigError::InvalidApiKey)));
    }

    #[test]
    fn paths_join_under_the_base_prefix() {
        let client = ControlPlaneClient::open(config()).unwrap();
        assert_eq!(
            client.endpoint_url("/v1/jobs").unwrap().as_str(),
            "http://127.0.0.1:9/api/v1/jobs"
        );
        assert_eq!(
            client.endpoint_url("health").unwrap().as_str(),
            "http://127.0.0.1:9/api/health"
        );
    }

    #[test]
    fn base_query_stays_after_the_joined_path() {
        let base = "http://127.0.0.1:9/api?tenant=a#frag".parse().unwrap();
        let client = ControlPlaneClient::open(ClientConfig::new(base)).unwrap();
        assert_eq!(
            client.endpoint_url("/v1/jobs").unwrap().as_str(),
            "http://127.0.0.1:9/api/v1/jobs?tenant=a"
        );
        assert_eq!(
            client.endpoint_url("/v1/jobs?x=1").unwrap().as_str(),
            "http://127.0.0.1:9/api/v1/jobs%3Fx=1?tenant=a"
        );
    }

    #[test]
    fn root_base_url_joins_without_double_slash() {
        let base = "http://127.0.0.1:9".parse().unwrap();
        let client = ControlPlaneClient::open(ClientConfig::new(base)).unwrap();
        assert_eq!(
            client.endpoint_url("/v1/health").unwrap().as_str(),
            "http://127.0.0.1:9/v1/health"
        );
    }

    #[test]
    fn base_without_a_path_is_a_config_error() {
        let base = "mailto:ops@example.com".parse().unwrap();
        let client = ControlPlaneClient::open(ClientConfig::new(base)).unwrap();
        let err = client.endpoint_url("/v1/jobs").unwrap_err();
        assert!(matches!(err, ClientError::Config(ConfigError::InvalidUrl(..))));
    }
}
