//! # cp-client: ControlPlane HTTP Client
//!
//! Async client for ControlPlane services built on `reqwest`.
//!
//! Every request carries `Content-Type: application/json`,
//! `X-Contract-Version: 1.0.0`, and, when a non-empty key is configured,
//! `Authorization: Bearer <key>`. [`ControlPlaneClient::request`] returns
//! the decoded body untyped; callers validate it with `cp-models`, or use
//! [`ControlPlaneClient::request_model`] to do both in one call.
//!
//! There is no automatic retry. A request completes when the server
//! responds or the configured timeout elapses.
//!
//! ```no_run
//! use cp_client::{ClientConfig, ControlPlaneClient};
//! use cp_models::service::HealthCheck;
//!
//! # async fn run() -> Result<(), cp_client::ClientError> {
//! let client = ControlPlaneClient::open(ClientConfig::from_env()?)?;
//! let health: HealthCheck = client
//!     .request_model(cp_client::Method::GET, "/health", Default::default())
//!     .await?;
//! println!("{} is {}", health.service, health.status);
//! client.close();
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::{default_headers, ControlPlaneClient, RequestOptions, CONTRACT_VERSION_HEADER};
pub use config::{ClientConfig, ConfigError};
pub use error::ClientError;

pub use reqwest::Method;
