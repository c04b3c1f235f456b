//! # Validate Subcommand
//!
//! Validates a batch of documents against one schema:
//!
//! ```bash
//! yval validate --schema schemas/team.yml teams/
//! yval validate --schema schemas/team.yml --include 'teams/**/*.yml' --format json
//! ```
//!
//! Returns exit code 0 when every processed document is valid, 1 when any
//! document is invalid. Configuration and resource faults (bad schema,
//! unknown rule, missing schema file, bad pattern) surface as errors, which
//! the entry point maps to exit code 2.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use yval_core::ResourceError;
use yval_schema::{AppLayout, BatchConfig, BatchRunner, Limits, RuleRegistry, SchemaCompiler};

use crate::config::ConfigFile;
use crate::report::{self, OutputFormat};
use crate::resolve::LocationResolver;

/// Arguments for the `yval validate` subcommand.
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Schema file. Overrides `schema` from the configuration file.
    #[arg(long, short, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Files or directories to validate. Directories are searched
    /// recursively.
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Glob pattern selecting documents. May be repeated.
    #[arg(long = "include", value_name = "GLOB")]
    pub include: Vec<String>,

    /// Glob pattern removing documents from the selection. May be repeated.
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Eligible document extension. May be repeated. Defaults to yml and yaml.
    #[arg(long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Report documents with ineligible extensions as invalid instead of
    /// skipping them.
    #[arg(long)]
    pub validate_file_extension: bool,

    /// Treat an empty selection as an error instead of a passing batch.
    #[arg(long)]
    pub fail_on_empty: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Effective settings after merging the configuration file and flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub schema: PathBuf,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub batch: BatchConfig,
    pub limits: Limits,
    pub app_layout: AppLayout,
}

impl Settings {
    /// Merge `config` with `args`. Flags win over file values; include and
    /// exclude lists are concatenated, file entries first. Relative paths and
    /// patterns from flags are anchored at `working_dir`.
    pub fn merge(args: &ValidateArgs, config: &ConfigFile, working_dir: &Path) -> Result<Self> {
        let schema = match &args.schema {
            Some(path) => crate::resolve_path(path, working_dir),
            None => config
                .schema_path()
                .context("no schema given: pass --schema or set `schema` in the config file")?,
        };

        let mut include = config.include_patterns();
        include.extend(
            args.paths
                .iter()
                .map(|p| crate::anchor_path(p, working_dir).display().to_string()),
        );
        include.extend(
            args.include
                .iter()
                .map(|p| crate::anchor_pattern(p, working_dir)),
        );
        if include.is_empty() {
            bail!("no documents given: pass PATH or --include, or set `include` in the config file");
        }

        let mut exclude = config.exclude_patterns();
        exclude.extend(
            args.exclude
                .iter()
                .map(|p| crate::anchor_pattern(p, working_dir)),
        );

        let mut batch = BatchConfig::default();
        if !args.extensions.is_empty() {
            batch.filter_extensions = args.extensions.iter().cloned().collect::<BTreeSet<_>>();
        } else if let Some(extensions) = &config.filter_extensions {
            batch.filter_extensions = extensions.clone();
        }
        if batch.filter_extensions.is_empty() {
            bail!("at least one eligible extension is required");
        }
        batch.validate_file_extension =
            args.validate_file_extension || config.validate_file_extension.unwrap_or(false);
        if let Some(max) = config.max_document_bytes {
            batch.max_document_bytes = max;
        }

        Ok(Self {
            schema,
            include,
            exclude,
            batch,
            limits: config.limits(),
            app_layout: config.app_layout(),
        })
    }
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 on success, 1 on validation failure.
pub fn run_validate(
    args: &ValidateArgs,
    config_path: Option<&Path>,
    working_dir: &Path,
) -> Result<u8> {
    let config = ConfigFile::discover(config_path, working_dir)?;
    let settings = Settings::merge(args, &config, working_dir)?;

    let registry = RuleRegistry::with_builtins(settings.app_layout.clone());
    let schema = SchemaCompiler::new(&registry, settings.limits)
        .load(&settings.schema)
        .with_context(|| format!("failed to load schema: {}", settings.schema.display()))?;

    tracing::info!(
        schema = %settings.schema.display(),
        fields = schema.field_names().count(),
        rules = schema.rule_count(),
        "loaded schema"
    );

    let resolver = LocationResolver::new(settings.include.clone(), &settings.exclude)?;
    let locations = resolver.resolve()?;
    if locations.is_empty() {
        let empty = ResourceError::NoDocumentsMatched {
            patterns: resolver.include_patterns().to_vec(),
        };
        if args.fail_on_empty {
            return Err(empty.into());
        }
        tracing::warn!("{empty}");
    }

    let result = BatchRunner::new(&schema, settings.batch).run(&locations);
    print!("{}", report::render(&result, args.format)?);

    if result.passed() {
        Ok(0)
    } else {
        Ok(1)
    }
}
