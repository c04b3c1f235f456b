//! # Document Location Resolution
//!
//! Expands include entries (literal files, directories, or glob patterns)
//! into an ordered, de-duplicated list of existing files, then drops those
//! matching any exclude pattern.
//!
//! Order is the order of the include entries; within one glob the order is
//! the lexicographic order `glob` yields. Two entries naming the same file
//! through different spellings yield it once. Directory expansion skips
//! hidden entries (`.yval.yaml`, `.git/`); explicit globs do not.
//! Extension filtering is left to the batch runner so that ineligible files
//! are reported as skipped.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Resolved include/exclude sets.
#[derive(Debug, Clone, Default)]
pub struct LocationResolver {
    include: Vec<String>,
    exclude: Vec<glob::Pattern>,
}

impl LocationResolver {
    /// Compile the exclude patterns. Invalid patterns are configuration
    /// errors.
    pub fn new(include: Vec<String>, exclude: &[String]) -> Result<Self> {
        let exclude = exclude
            .iter()
            .map(|p| glob::Pattern::new(p).with_context(|| format!("invalid exclude pattern: {p}")))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { include, exclude })
    }

    /// Patterns as given, for diagnostics.
    pub fn include_patterns(&self) -> &[String] {
        &self.include
    }

    /// Expand every include entry.
    pub fn resolve(&self) -> Result<Vec<PathBuf>> {
        let mut seen = HashSet::new();
        let mut locations = Vec::new();

        for entry in &self.include {
            for path in expand(entry)? {
                if self.is_excluded(&path) {
                    tracing::trace!(path = %path.display(), "excluded");
                    continue;
                }
                let key = path.canonicalize().unwrap_or_else(|_| path.clone());
                if seen.insert(key) {
                    locations.push(path);
                }
            }
        }

        tracing::info!(
            patterns = self.include.len(),
            documents = locations.len(),
            "resolved document locations"
        );
        Ok(locations)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.exclude.iter().any(|p| p.matches_path(path))
    }
}

fn expand(entry: &str) -> Result<Vec<PathBuf>> {
    let literal = Path::new(entry);
    if literal.is_file() {
        return Ok(vec![literal.to_path_buf()]);
    }
    if literal.is_dir() {
        let escaped = glob::Pattern::escape(entry.trim_end_matches('/'));
        let options = glob::MatchOptions {
            require_literal_leading_dot: true,
            ..glob::MatchOptions::new()
        };
        return glob_files(&format!("{escaped}/**/*"), options);
    }
    glob_files(entry, glob::MatchOptions::new())
}

fn glob_files(pattern: &str, options: glob::MatchOptions) -> Result<Vec<PathBuf>> {
    let entries = glob::glob_with(pattern, options)
        .with_context(|| format!("invalid include pattern: {pattern}"))?;
    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => tracing::warn!(path = %e.path().display(), error = %e.error(), "unreadable path"),
        }
    }
    Ok(files)
}
