//! # Schema Subcommands
//!
//! `yval check-schema FILE` compiles a schema without validating any
//! document, surfacing unknown rules and malformed rule arguments.
//! `yval rules` lists the registered rules.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use yval_schema::{AppLayout, RuleRegistry, SchemaCompiler};

use crate::config::ConfigFile;

/// Arguments for `yval check-schema`.
#[derive(Args, Debug)]
pub struct CheckSchemaArgs {
    /// Schema file to compile.
    #[arg(value_name = "FILE")]
    pub schema: PathBuf,
}

/// Compile the schema and print a short summary.
///
/// Returns exit code 0; any configuration fault is an error.
pub fn run_check_schema(
    args: &CheckSchemaArgs,
    config_path: Option<&Path>,
    working_dir: &Path,
) -> Result<u8> {
    let config = ConfigFile::discover(config_path, working_dir)?;
    let registry = RuleRegistry::with_builtins(config.app_layout());
    let limits = config.limits();
    let path = crate::resolve_path(&args.schema, working_dir);

    let schema = SchemaCompiler::new(&registry, limits)
        .load(&path)
        .with_context(|| format!("failed to load schema: {}", path.display()))?;

    let fields: Vec<&str> = schema.field_names().collect();
    println!("OK: {}", path.display());
    println!("  Fields: {}", fields.len());
    for field in fields {
        let node = &schema.root().children[field];
        let marker = if node.required { " (required)" } else { "" };
        println!("    {field}: {}{marker}", node.schema_type);
    }
    println!("  Rule invocations: {}", schema.rule_count());
    Ok(0)
}

/// Print every registered rule.
pub fn run_rules() -> Result<u8> {
    let registry = RuleRegistry::with_builtins(AppLayout::default());
    println!("Available rules:");
    for name in registry.names() {
        println!("  {name}");
    }
    println!();
    println!("Total: {} rules", registry.len());
    Ok(0)
}
