//! # Schemas Subcommand
//!
//! Read-only views over the contract registry.
//!
//! - `list`: every registered model name, one per line, in registration order.
//! - `show <Name>`: the fields of one model with their types, required flags, and defaults.
//! - `audit`: shape-consistency findings across the registry. Exits 1 when any are found.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use cp_models::{audit_registry, get_schema, list_schemas};
use cp_schema::{Shape, ShapeFinding};

/// Arguments for the `cpctl schemas` subcommand.
#[derive(Args, Debug)]
pub struct SchemasArgs {
    #[command(subcommand)]
    pub command: SchemasCommand,
}

#[derive(Subcommand, Debug)]
pub enum SchemasCommand {
    /// List every registered model name.
    List,
    /// Show the fields of one model.
    Show {
        /// Exact model name, e.g. `JobRequest`.
        name: String,
    },
    /// Check every registered shape for self-contradicting declarations.
    Audit,
}

pub fn run_schemas(args: &SchemasArgs) -> Result<u8> {
    match &args.command {
        SchemasCommand::List => {
            for name in list_schemas() {
                println!("{name}");
            }
            Ok(0)
        }
        SchemasCommand::Show { name } => {
            let schema =
                get_schema(name).with_context(|| "run `cpctl schemas list` for valid names")?;
            print!("{}", render_shape(schema.shape()));
            Ok(0)
        }
        SchemasCommand::Audit => {
            let findings = audit_registry();
            print!("{}", render_audit(&findings, list_schemas().len()));
            Ok(if findings.is_empty() { 0 } else { 1 })
        }
    }
}

/// One line per field: name, type, and `required`, `default <json>`, or `optional`.
pub fn render_shape(shape: &Shape) -> String {
    let width = shape.fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
    let mut out = format!("{}\n", shape.name);
    for field in shape.fields {
        let presence = match (&field.default, field.required) {
            (_, true) => "required".to_string(),
            (Some(default), false) => format!("default {}", default.to_value()),
            (None, false) => "optional".to_string(),
        };
        let _ = writeln!(
            out,
            "  {:<width$}  {}  [{}]",
            field.name,
            field.kind.describe(),
            presence
        );
    }
    out
}

pub fn render_audit(findings: &[ShapeFinding], shape_count: usize) -> String {
    if findings.is_empty() {
        return format!("OK: {shape_count} shapes consistent\n");
    }
    let mut out = String::new();
    for finding in findings {
        let _ = writeln!(out, "FAIL: {finding}");
    }
    let _ = writeln!(out, "{} finding(s) across {shape_count} shapes", findings.len());
    out
}
