//! # Validate Subcommand
//!
//! Validates a JSON or YAML document against a registered model and prints
//! the `safe_validate` result as JSON:
//!
//! ```bash
//! cpctl validate JobRequest job.yaml
//! cat job.json | cpctl validate JobRequest
//! ```
//!
//! Exits 0 when the document is valid and 1 when it is not.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use cp_models::{get_schema, safe_validate};

/// Arguments for the `cpctl validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Exact model name, e.g. `JobRequest`.
    pub model: String,

    /// Document to validate. Reads stdin when omitted or `-`.
    pub path: Option<PathBuf>,

    /// Print the result on one line.
    #[arg(long)]
    pub compact: bool,
}

pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let schema = get_schema(&args.model)?;
    let data = match args.path.as_deref() {
        Some(path) if path != Path::new("-") => load_document(path)?,
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read document from stdin")?;
            parse_document(&text, None)?
        }
    };

    let result = safe_validate(schema, &data);
    tracing::info!(model = %schema.model(), success = result.success(), "validated document");

    let rendered = if args.compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{rendered}");

    Ok(if result.success() { 0 } else { 1 })
}

/// Read and parse a document, choosing the format from the file extension.
pub fn load_document(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let extension = path.extension().and_then(|e| e.to_str());
    parse_document(&text, extension).with_context(|| format!("failed to parse {}", path.display()))
}

/// Parse `text` as JSON or YAML.
///
/// `json` and `yaml`/`yml` extensions select the parser. Without a known
/// extension JSON is tried first, then YAML.
pub fn parse_document(text: &str, extension: Option<&str>) -> Result<Value> {
    match extension.map(str::to_ascii_lowercase).as_deref() {
        Some("json") => serde_json::from_str(text).context("invalid JSON"),
        Some("yaml" | "yml") => serde_yaml::from_str(text).context("invalid YAML"),
        _ => match serde_json::from_str(text) {
            Ok(value) => Ok(value),
            Err(_) => serde_yaml::from_str(text).context("document is neither JSON nor YAML"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const JOB_YAML: &str = "\
id: j1
type: ingest
payload:
  type: x
  data: {}
metadata:
  source: api
  createdAt: '2024-01-01T00:00:00Z'
";

    #[test]
    fn yaml_and_json_documents_parse_to_the_same_value() {
        let from_yaml = parse_document(JOB_YAML, Some("yaml")).unwrap();
        let from_json = parse_document(&from_yaml.to_string(), Some("json")).unwrap();
        assert_eq!(from_yaml, from_json);
        assert_eq!(from_yaml["payload"]["type"], json!("x"));
    }

    #[test]
    fn unknown_extension_falls_back_to_yaml() {
        let value = parse_document(JOB_YAML, None).unwrap();
        assert_eq!(value["metadata"]["source"], json!("api"));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(parse_document("{\"id\": ", Some("json")).is_err());
    }

    #[test]
    fn load_document_reads_files_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml_path = dir.path().join("job.yml");
        std::fs::write(&yaml_path, JOB_YAML).unwrap();
        let json_path = dir.path().join("job.json");
        std::fs::write(&json_path, r#"{"id": "j2"}"#).unwrap();

        assert_eq!(load_document(&yaml_path).unwrap()["id"], json!("j1"));
        assert_eq!(load_document(&json_path).unwrap()["id"], json!("j2"));
    }

    #[test]
    fn validate_exit_code_tracks_the_result() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.yaml");
        std::fs::write(&good, JOB_YAML).unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"id": "j1"}"#).unwrap();

        let args = |path: &Path| ValidateArgs {
            model: "JobRequest".into(),
            path: Some(path.to_path_buf()),
            compact: true,
        };
        assert_eq!(run_validate(&args(&good)).unwrap(), 0);
        assert_eq!(run_validate(&args(&bad)).unwrap(), 1);
    }

    #[test]
    fn unknown_model_is_an_error() {
        let args = ValidateArgs {
            model: "Nope".into(),
            path: None,
            compact: false,
        };
        let err = run_validate(&args).unwrap_err();
        assert_eq!(err.to_string(), "schema not found: Nope");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_document(Path::new("/nonexistent/cp/job.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
