//! # Request Subcommand
//!
//! Sends one raw request to a ControlPlane service and prints the JSON body.
//! With `--expect <Name>` the body is validated against that model and the
//! `safe_validate` result is printed instead.
//!
//! Connection settings come from `CONTROLPLANE_BASE_URL`,
//! `CONTROLPLANE_API_KEY`, and `CONTROLPLANE_TIMEOUT_SECS`; `--base-url` and
//! `--timeout-secs` override them.
//!
//! Exits 1 on a transport failure (non-2xx status, connection error,
//! timeout) or a failed `--expect` validation.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use url::Url;

use cp_client::{ClientConfig, ControlPlaneClient, Method, RequestOptions};
use cp_models::service::HttpMethod;
use cp_models::{get_schema, safe_validate};

use crate::validate::load_document;

/// Arguments for the `cpctl request` subcommand.
#[derive(Args, Debug)]
pub struct RequestArgs {
    /// HTTP method: GET, POST, PUT, PATCH, or DELETE.
    pub method: String,

    /// Path relative to the base URL, e.g. `/v1/jobs`.
    pub path: String,

    /// JSON or YAML file sent as the request body.
    #[arg(long)]
    pub body: Option<PathBuf>,

    /// Validate the response against this model.
    #[arg(long)]
    pub expect: Option<String>,

    /// Query parameter as `key=value`. Repeatable.
    #[arg(long = "query", short = 'q')]
    pub query: Vec<String>,

    /// Overrides `CONTROLPLANE_BASE_URL`.
    #[arg(long)]
    pub base_url: Option<Url>,

    /// Overrides `CONTROLPLANE_TIMEOUT_SECS`.
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

/// Accept only the methods the API contract declares.
pub fn parse_method(raw: &str) -> Result<Method> {
    let upper = raw.to_ascii_uppercase();
    if !HttpMethod::VALUES.contains(&upper.as_str()) {
        bail!(
            "unsupported method {raw:?}; expected one of {}",
            HttpMethod::VALUES.join(", ")
        );
    }
    upper
        .parse::<Method>()
        .with_context(|| format!("invalid method {raw:?}"))
}

/// Split `key=value` query arguments.
pub fn parse_query(pairs: &[String]) -> Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => bail!("query parameter {pair:?} is not key=value"),
        })
        .collect()
}

pub async fn run_request(args: &RequestArgs) -> Result<u8> {
    let method = parse_method(&args.method)?;
    // Resolve the model before touching the network.
    let expected = args.expect.as_deref().map(get_schema).transpose()?;

    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(secs) = args.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }

    let options = RequestOptions {
        body: args.body.as_deref().map(load_document).transpose()?,
        query: parse_query(&args.query)?,
        ..RequestOptions::default()
    };

    let client = ControlPlaneClient::open(config)?;
    let outcome = client.request(method, &args.path, options).await;
    client.close();

    let body = match outcome {
        Ok(body) => body,
        Err(err) if err.is_transport() => {
            eprintln!("error: {err}");
            return Ok(1);
        }
        Err(err) => return Err(err.into()),
    };

    match expected {
        Some(schema) => {
            let result = safe_validate(schema, &body);
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(if result.success() { 0 } else { 1 })
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_are_limited_to_the_contract_set() {
        assert_eq!(parse_method("get").unwrap(), Method::GET);
        assert_eq!(parse_method("PATCH").unwrap(), Method::PATCH);
        let err = parse_method("options").unwrap_err();
        assert!(err.to_string().contains("GET, POST, PUT, PATCH, DELETE"));
    }

    #[test]
    fn query_pairs_split_on_first_equals() {
        let parsed =
            parse_query(&["limit=10".into(), "filter=a=b".into(), "empty=".into()]).unwrap();
        assert_eq!(
            parsed,
            vec![
                ("limit".to_string(), "10".to_string()),
                ("filter".to_string(), "a=b".to_string()),
                ("empty".to_string(), String::new()),
            ]
        );
        assert!(parse_query(&["novalue".into()]).is_err());
        assert!(parse_query(&["=x".into()]).is_err());
    }
}
