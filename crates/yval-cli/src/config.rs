//! # Configuration File
//!
//! Optional YAML file supplying defaults for the `validate` subcommand.
//! Loaded from `--config FILE` when given, otherwise from `.yval.yaml` in
//! the working directory when present. Command-line flags override file
//! values; list-valued options (`include`, `exclude`) are concatenated.
//!
//! Relative paths and patterns in the file are anchored at the directory
//! containing the file.
//!
//! ```yaml
//! schema: schemas/team.yml
//! include:
//!   - "teams/**/*.yml"
//! exclude:
//!   - "teams/archive/**"
//! filter_extensions: [yml, yaml]
//! validate_file_extension: false
//! max_document_bytes: 16777216
//! max_schema_depth: 64
//! app_layout:
//!   apps_dir: apps
//!   namespace_depth: 2
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use yval_schema::{AppLayout, Limits};

use crate::{anchor_path, anchor_pattern};

/// File name looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = ".yval.yaml";

/// Parsed configuration file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub schema: Option<PathBuf>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub filter_extensions: Option<BTreeSet<String>>,
    pub validate_file_extension: Option<bool>,
    pub max_document_bytes: Option<u64>,
    pub max_schema_depth: Option<usize>,
    pub app_layout: Option<AppLayout>,

    /// Directory the file was loaded from; anchors relative entries.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl ConfigFile {
    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let mut config = if source.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str::<Self>(&source)
                .with_context(|| format!("invalid config file: {}", path.display()))?
        };
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Load the explicit file, or `.yval.yaml` under `working_dir` if it
    /// exists, or fall back to an empty configuration.
    pub fn discover(explicit: Option<&Path>, working_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            let path = crate::resolve_path(path, working_dir);
            if !path.is_file() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            return Self::load(&path);
        }

        let implicit = working_dir.join(DEFAULT_CONFIG_FILE);
        if implicit.is_file() {
            return Self::load(&implicit);
        }

        Ok(Self {
            base_dir: working_dir.to_path_buf(),
            ..Self::default()
        })
    }

    /// Schema path from the file, anchored at the file's directory.
    pub fn schema_path(&self) -> Option<PathBuf> {
        self.schema.as_deref().map(|p| anchor_path(p, &self.base_dir))
    }

    /// Rule layout for `app_must_exist`.
    pub fn app_layout(&self) -> AppLayout {
        self.app_layout.clone().unwrap_or_default()
    }

    /// Schema compilation limits.
    pub fn limits(&self) -> Limits {
        let mut limits = Limits::default();
        if let Some(depth) = self.max_schema_depth {
            limits.max_schema_depth = depth;
        }
        limits
    }

    /// Include patterns, anchored at the file's directory.
    pub fn include_patterns(&self) -> Vec<String> {
        self.include
            .iter()
            .map(|p| anchor_pattern(p, &self.base_dir))
            .collect()
    }

    /// Exclude patterns, anchored at the file's directory.
    pub fn exclude_patterns(&self) -> Vec<String> {
        self.exclude
            .iter()
            .map(|p| anchor_pattern(p, &self.base_dir))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yval.yaml");
        std::fs::write(
            &path,
            "schema: schema.yml\n\
             include: ['teams/*.yml']\n\
             exclude: ['teams/old-*.yml']\n\
             filter_extensions: [yml]\n\
             validate_file_extension: true\n\
             max_document_bytes: 1024\n\
             max_schema_depth: 8\n\
             app_layout:\n  apps_dir: services\n",
        )
        .unwrap();

        let config = ConfigFile::load(&path).unwrap();
        assert_eq!(config.schema_path(), Some(dir.path().join("schema.yml")));
        assert_eq!(config.validate_file_extension, Some(true));
        assert_eq!(config.max_document_bytes, Some(1024));
        assert_eq!(config.max_schema_depth, Some(8));
        let layout = config.app_layout.clone().unwrap();
        assert_eq!(layout.apps_dir, "services");
        assert_eq!(layout.namespace_depth, 2);
        assert_eq!(config.include_patterns().len(), 1);
        assert!(config.include_patterns()[0].ends_with("/teams/*.yml"));
        assert!(config.exclude_patterns()[0].ends_with("/teams/old-*.yml"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yval.yaml");
        std::fs::write(&path, "schemas: oops.yml\n").unwrap();
        let err = ConfigFile::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("invalid config file"));
    }

    #[test]
    fn empty_file_is_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yval.yaml");
        std::fs::write(&path, "").unwrap();
        let config = ConfigFile::load(&path).unwrap();
        assert!(config.schema.is_none());
        assert!(config.include.is_empty());
    }

    #[test]
    fn discover_prefers_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "schema: implicit.yml\n").unwrap();
        std::fs::write(dir.path().join("other.yaml"), "schema: explicit.yml\n").unwrap();

        let config = ConfigFile::discover(Some(Path::new("other.yaml")), dir.path()).unwrap();
        assert_eq!(config.schema_path(), Some(dir.path().join("explicit.yml")));
    }

    #[test]
    fn discover_finds_implicit_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "schema: implicit.yml\n").unwrap();
        let config = ConfigFile::discover(None, dir.path()).unwrap();
        assert_eq!(config.schema_path(), Some(dir.path().join("implicit.yml")));
    }

    #[test]
    fn discover_without_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigFile::discover(None, dir.path()).unwrap();
        assert!(config.schema.is_none());
        assert_eq!(config.base_dir, dir.path());
    }

    #[test]
    fn discover_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigFile::discover(Some(Path::new("absent.yaml")), dir.path()).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn absolute_entries_are_not_anchored() {
        let config = ConfigFile {
            schema: Some(PathBuf::from("/etc/schema.yml")),
            include: vec!["/srv/*.yml".to_string()],
            base_dir: PathBuf::from("/work"),
            ..ConfigFile::default()
        };
        assert_eq!(config.schema_path(), Some(PathBuf::from("/etc/schema.yml")));
        assert_eq!(config.include_patterns(), vec!["/srv/*.yml".to_string()]);
    }

    #[test]
    fn base_dir_metacharacters_are_escaped() {
        let config = ConfigFile {
            include: vec!["*.yml".to_string()],
            base_dir: PathBuf::from("/work/[v1]"),
            ..ConfigFile::default()
        };
        assert_eq!(config.include_patterns(), vec!["/work/[[]v1[]]/*.yml".to_string()]);
    }
}
