//! # Document Identity
//!
//! A [`DocumentId`] names one document within a run. It is the location the
//! path resolver produced, kept verbatim so that reports and duplicate
//! messages show the same path the user passed in.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Identifier of a document within a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocumentId(PathBuf);

impl DocumentId {
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self(location.into())
    }

    /// The document location.
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Filename with its last extension stripped (`team-a.yml` → `team-a`).
    pub fn file_stem(&self) -> Option<&str> {
        self.0.file_stem().and_then(|s| s.to_str())
    }

    /// Extension without the leading dot, if any.
    pub fn extension(&self) -> Option<&str> {
        self.0.extension().and_then(|s| s.to_str())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<&Path> for DocumentId {
    fn from(path: &Path) -> Self {
        Self(path.to_path_buf())
    }
}

impl From<PathBuf> for DocumentId {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl From<&str> for DocumentId {
    fn from(path: &str) -> Self {
        Self(PathBuf::from(path))
    }
}
