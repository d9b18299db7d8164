//! # cpctl entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cp_cli::request::{run_request, RequestArgs};
use cp_cli::schemas::{run_schemas, SchemasArgs};
use cp_cli::validate::{run_validate, ValidateArgs};

/// ControlPlane contract toolchain.
///
/// Inspects the contract registry, validates documents against it, and
/// sends raw requests to ControlPlane services.
#[derive(Parser, Debug)]
#[command(name = "cpctl", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List, show, and audit registered models.
    Schemas(SchemasArgs),

    /// Validate a JSON or YAML document against a model.
    Validate(ValidateArgs),

    /// Send a request to a ControlPlane service.
    Request(RequestArgs),

    /// Print the tool and contract versions.
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Schemas(args) => run_schemas(&args),
        Commands::Validate(args) => run_validate(&args),
        Commands::Request(args) => tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(anyhow::Error::from)
            .and_then(|runtime| runtime.block_on(run_request(&args))),
        Commands::Version => {
            println!("{}", cp_cli::version_banner());
            Ok(0)
        }
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn cli_parse_schemas_show() {
        let cli = Cli::try_parse_from(["cpctl", "schemas", "show", "JobRequest"]).unwrap();
        match cli.command {
            Commands::Schemas(args) => assert!(matches!(
                args.command,
                cp_cli::schemas::SchemasCommand::Show { ref name } if name == "JobRequest"
            )),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_parse_validate_with_path() {
        let cli =
            Cli::try_parse_from(["cpctl", "-vv", "validate", "JobRequest", "job.yaml"]).unwrap();
        assert_eq!(cli.verbose, 2);
        if let Commands::Validate(args) = cli.command {
            assert_eq!(args.model, "JobRequest");
            assert_eq!(args.path, Some(PathBuf::from("job.yaml")));
            assert!(!args.compact);
        } else {
            panic!("expected validate");
        }
    }

    #[test]
    fn cli_parse_validate_from_stdin() {
        let cli = Cli::try_parse_from(["cpctl", "validate", "HealthCheck", "--compact"]).unwrap();
        if let Commands::Validate(args) = cli.command {
            assert!(args.path.is_none());
            assert!(args.compact);
        } else {
            panic!("expected validate");
        }
    }

    #[test]
    fn cli_parse_request_with_options() {
        let cli = Cli::try_parse_from([
            "cpctl",
            "request",
            "POST",
            "/v1/jobs",
            "--body",
            "job.json",
            "--expect",
            "JobResponse",
            "-q",
            "dryRun=true",
            "--base-url",
            "http://127.0.0.1:9000",
        ])
        .unwrap();
        if let Commands::Request(args) = cli.command {
            assert_eq!(args.method, "POST");
            assert_eq!(args.path, "/v1/jobs");
            assert_eq!(args.body, Some(PathBuf::from("job.json")));
            assert_eq!(args.expect.as_deref(), Some("JobResponse"));
            assert_eq!(args.query, vec!["dryRun=true".to_string()]);
            assert_eq!(args.base_url.unwrap().as_str(), "http://127.0.0.1:9000/");
            assert!(args.timeout_secs.is_none());
        } else {
            panic!("expected request");
        }
    }

    #[test]
    fn cli_rejects_invalid_base_url() {
        let result = Cli::try_parse_from(["cpctl", "request", "GET", "/", "--base-url", "nope"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_version() {
        let cli = Cli::try_parse_from(["cpctl", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }
}
