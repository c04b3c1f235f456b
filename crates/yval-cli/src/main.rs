//! # yval CLI entry point
//!
//! Parses command-line arguments, initializes logging, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use yval_cli::schema::{run_check_schema, run_rules, CheckSchemaArgs};
use yval_cli::validate::{run_validate, ValidateArgs};

/// Exit code for configuration and resource errors.
const EXIT_ERROR: u8 = 2;

/// yval: validate YAML documents against declarative schemas.
#[derive(Parser, Debug)]
#[command(name = "yval", version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file. Defaults to `.yval.yaml` in the working directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate documents against a schema.
    Validate(ValidateArgs),

    /// Compile a schema and report configuration errors.
    CheckSchema(CheckSchemaArgs),

    /// List the available rules.
    Rules,
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

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "yval starting");

    let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, config, &working_dir),
        Commands::CheckSchema(args) => run_check_schema(&args, config, &working_dir),
        Commands::Rules => run_rules(),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yval_cli::report::OutputFormat;

    #[test]
    fn cli_parse_validate_with_schema_and_paths() {
        let cli =
            Cli::try_parse_from(["yval", "validate", "--schema", "s.yml", "a.yml", "teams/"])
                .unwrap();
        if let Commands::Validate(args) = cli.command {
            assert_eq!(args.schema, Some(PathBuf::from("s.yml")));
            assert_eq!(args.paths, vec![PathBuf::from("a.yml"), PathBuf::from("teams/")]);
            assert_eq!(args.format, OutputFormat::Human);
            assert!(!args.validate_file_extension);
        } else {
            panic!("expected validate");
        }
    }

    #[test]
    fn cli_parse_validate_repeated_flags() {
        let cli = Cli::try_parse_from([
            "yval",
            "validate",
            "-s",
            "s.yml",
            "--include",
            "a/*.yml",
            "--include",
            "b/*.yml",
            "--exclude",
            "a/old.yml",
            "--extension",
            "yml",
            "--validate-file-extension",
            "--fail-on-empty",
            "--format",
            "json",
        ])
        .unwrap();
        if let Commands::Validate(args) = cli.command {
            assert_eq!(args.include, vec!["a/*.yml", "b/*.yml"]);
            assert_eq!(args.exclude, vec!["a/old.yml"]);
            assert_eq!(args.extensions, vec!["yml"]);
            assert!(args.validate_file_extension);
            assert!(args.fail_on_empty);
            assert_eq!(args.format, OutputFormat::Json);
        } else {
            panic!("expected validate");
        }
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["yval", "check-schema", "s.yml", "-vv", "--config", "c.yaml"])
                .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("c.yaml")));
        if let Commands::CheckSchema(args) = cli.command {
            assert_eq!(args.schema, PathBuf::from("s.yml"));
        } else {
            panic!("expected check-schema");
        }
    }

    #[test]
    fn cli_parse_rules() {
        let cli = Cli::try_parse_from(["yval", "rules"]).unwrap();
        assert!(matches!(cli.command, Commands::Rules));
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["yval", "validate", "--format", "xml"]).is_err());
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["yval"]).is_err());
    }
}
