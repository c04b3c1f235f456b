//! # Document Paths
//!
//! A [`DocumentPath`] addresses one node inside a document: the ordered
//! field names and sequence indices walked from the root. Paths are built
//! by the engine as it descends and are copied into every error, so the
//! same document shape always yields the same path rendering.

use std::fmt;

use serde::Serialize;

/// One step from a parent node to a child node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// A mapping field name.
    Field(String),
    /// A sequence index.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => f.write_str(name),
            PathSegment::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        PathSegment::Field(name.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Ordered path from the document root. The root is the empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DocumentPath(Vec<PathSegment>);

impl DocumentPath {
    /// The document root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// A new path extended by one segment.
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    /// Name of the nearest enclosing field. For a sequence item this is the
    /// index rendering, for the root it is empty.
    pub fn field_name(&self) -> String {
        self.0.last().map(|s| s.to_string()).unwrap_or_default()
    }
}

impl fmt::Display for DocumentPath {
    /// Segments joined with `->`, e.g. `spec->containers->0->image`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("->")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromIterator<PathSegment> for DocumentPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
