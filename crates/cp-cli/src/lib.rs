//! # cp-cli: ControlPlane Command Line
//!
//! Provides the `cpctl` binary over the contract registry, the validator,
//! and the HTTP client.
//!
//! ## Subcommands
//!
//! - `cpctl schemas list|show|audit`: Inspect registered models.
//! - `cpctl validate <Name> [PATH]`: Validate a JSON or YAML document.
//! - `cpctl request <METHOD> <PATH>`: Send a raw request, optionally validating the response.
//! - `cpctl version`: Tool and contract versions.
//!
//! ## Exit codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | Validation failure, audit findings, or transport failure |
//! | 2 | Usage or operational error |
//!
//! ```bash
//! cpctl validate JobRequest job.yaml
//! cpctl request GET /v1/jobs/j1 --expect JobResponse
//! ```

pub mod request;
pub mod schemas;
pub mod validate;

use cp_models::CONTRACT_VERSION;

/// One-line version banner for `cpctl version`.
pub fn version_banner() -> String {
    format!(
        "cpctl {} (contract {})",
        env!("CARGO_PKG_VERSION"),
        CONTRACT_VERSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_names_the_contract_version() {
        let banner = version_banner();
        assert!(banner.starts_with("cpctl "));
        assert!(banner.ends_with("(contract 1.0.0)"));
    }
}
