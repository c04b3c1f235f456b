//! # yval-cli — Command-Line Interface
//!
//! Provides the `yval` binary: batch validation of YAML documents against
//! a schema, schema checking, and rule listing.
//!
//! ## Subcommands
//!
//! - `yval validate`: Validate documents selected by paths and globs.
//! - `yval check-schema`: Compile a schema without validating documents.
//! - `yval rules`: List the registered rules.
//!
//! ```bash
//! yval validate --schema schemas/team.yml teams/
//! yval -vv validate --config ci/yval.yaml --format json
//! yval check-schema schemas/team.yml
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: every processed document is valid.
//! - `1`: at least one document is invalid.
//! - `2`: configuration or resource error; no report was produced.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers live in this library so
//!   they can be tested without spawning the binary.
//! - Reports go to stdout, logs go to stderr.

pub mod config;
pub mod report;
pub mod resolve;
pub mod schema;
pub mod validate;

use std::path::{Path, PathBuf};

/// Resolve a path that may be relative to the working directory.
///
/// If the path is absolute, returns it as-is. If relative and the file
/// exists relative to `base`, uses that. Otherwise returns the path
/// unchanged.
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let anchored = base.join(path);
    if anchored.exists() {
        anchored
    } else {
        path.to_path_buf()
    }
}

/// Join a relative path onto `base`. Absolute paths, and any path when
/// `base` is empty, are returned unchanged.
pub fn anchor_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() || base.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Anchor a glob pattern at `base`. The base directory is escaped so that
/// characters such as `[` in it are matched literally.
pub fn anchor_pattern(pattern: &str, base: &Path) -> String {
    if Path::new(pattern).is_absolute() || base.as_os_str().is_empty() {
        return pattern.to_string();
    }
    let base = glob::Pattern::escape(&base.to_string_lossy());
    format!("{}/{}", base.trim_end_matches('/'), pattern)
}
