//! # Error Types — Structured Error Hierarchy
//!
//! Two families live here:
//!
//! - [`ValidationError`] is *data*: one rule failure on one document. The
//!   engine accumulates these and never stops on them.
//! - [`ConfigurationError`], [`ParseError`] and [`ResourceError`] are real
//!   `std::error::Error`s describing why a run, a schema, or a single
//!   document could not be processed. [`YvalError`] wraps them all.
//!
//! ## Propagation
//!
//! - Configuration errors abort the run before any document is validated.
//! - Parse errors on a document mark that document invalid; on the schema
//!   they are fatal.
//! - Resource errors are fatal for a missing schema and per-document for a
//!   failing filesystem predicate.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::path::DocumentPath;
use crate::value::Value;

/// A single rule failure on one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Location of the offending node.
    pub document_path: DocumentPath,
    /// Nearest field name (last path segment).
    pub field: String,
    /// Name of the failing constraint (`required`, `type`, a rule name, ...).
    pub constraint: String,
    /// The offending literal; `null` when the field is missing.
    pub value: Value,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    /// A failure with a caller-supplied message.
    pub fn new(
        document_path: DocumentPath,
        constraint: impl Into<String>,
        value: Value,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: document_path.field_name(),
            document_path,
            constraint: constraint.into(),
            value,
            message: message.into(),
        }
    }

    /// A failure using the standard structural message:
    /// `'<value>' does not satisfy constraint '<constraint>' at '<path>'`.
    pub fn constraint_failed(
        document_path: DocumentPath,
        constraint: impl Into<String>,
        value: Value,
    ) -> Self {
        let constraint = constraint.into();
        let message = format!(
            "'{value}' does not satisfy constraint '{constraint}' at '{document_path}'"
        );
        Self::new(document_path, constraint, value, message)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.document_path.is_root() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.document_path, self.message)
        }
    }
}

/// Renders a schema location for configuration errors.
fn schema_location(path: &DocumentPath) -> String {
    if path.is_root() {
        "(root)".to_string()
    } else {
        path.to_string()
    }
}

/// The schema itself is unusable. Fatal before any document is processed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A schema references a rule name that is not registered.
    #[error("unknown rule '{rule}' at schema location '{}'", schema_location(.schema_path))]
    UnknownRule {
        /// The unresolved rule name.
        rule: String,
        /// Where in the schema the rule was declared.
        schema_path: DocumentPath,
    },

    /// A rule argument failed the rule's meta-schema.
    #[error("invalid argument for rule '{rule}' at schema location '{}': {reason}", schema_location(.schema_path))]
    InvalidRuleArgument {
        rule: String,
        schema_path: DocumentPath,
        reason: String,
    },

    /// A structural schema key has the wrong shape.
    #[error("invalid schema at '{}': {reason}", schema_location(.schema_path))]
    InvalidSchema {
        schema_path: DocumentPath,
        reason: String,
    },

    /// Nesting exceeds the configured depth limit.
    #[error("schema nesting at '{}' exceeds the maximum depth of {limit}", schema_location(.schema_path))]
    SchemaTooDeep {
        schema_path: DocumentPath,
        limit: usize,
    },

    /// A rule name was registered twice.
    #[error("rule '{rule}' is already registered")]
    DuplicateRule { rule: String },
}

/// A document or schema source could not be parsed into a tree.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The source is not well-formed YAML.
    #[error("invalid YAML in '{origin}': {reason}")]
    Syntax { origin: String, reason: String },

    /// The source is YAML but uses constructs the document model cannot hold.
    #[error("unsupported content in '{origin}': {reason}")]
    Unsupported { origin: String, reason: String },

    /// The source exceeds the configured size bound.
    #[error("'{origin}' is {size} bytes, larger than the {limit}-byte limit")]
    TooLarge { origin: String, size: u64, limit: u64 },

    /// The source could not be read.
    #[error("cannot read '{origin}': {source}")]
    Unreadable {
        origin: String,
        #[source]
        source: std::io::Error,
    },
}

/// A required external resource is missing or unusable.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The schema file does not exist.
    #[error("schema file not found: {}", .path.display())]
    SchemaNotFound { path: PathBuf },

    /// Path resolution produced no documents.
    #[error("no documents matched the patterns [{}]", .patterns.join(", "))]
    NoDocumentsMatched { patterns: Vec<String> },

    /// A filesystem existence check failed for a reason other than "not found".
    #[error("cannot stat '{}': {source}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level error type for yval.
#[derive(Error, Debug)]
pub enum YvalError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_message_format() {
        let path = DocumentPath::root().child("spec").child("replicas");
        let err = ValidationError::constraint_failed(path, "type", Value::from("three"));
        assert_eq!(
            err.message,
            "'three' does not satisfy constraint 'type' at 'spec->replicas'"
        );
        assert_eq!(err.field, "replicas");
        assert_eq!(err.constraint, "type");
    }

    #[test]
    fn display_marks_root() {
        let err = ValidationError::new(DocumentPath::root(), "parse", Value::Null, "bad");
        assert_eq!(err.to_string(), "(root): bad");
        assert_eq!(err.field, "");
    }

    #[test]
    fn configuration_error_names_location() {
        let err = ConfigurationError::UnknownRule {
            rule: "no_such_rule".into(),
            schema_path: DocumentPath::root().child("name"),
        };
        let msg = err.to_string();
        assert!(msg.contains("no_such_rule"));
        assert!(msg.contains("'name'"));

        let root = ConfigurationError::InvalidSchema {
            schema_path: DocumentPath::root(),
            reason: "must be a mapping".into(),
        };
        assert!(root.to_string().contains("(root)"));
    }

    #[test]
    fn top_level_wraps_sources() {
        let err: YvalError = ResourceError::SchemaNotFound {
            path: PathBuf::from("schema.yml"),
        }
        .into();
        assert!(matches!(err, YvalError::Resource(_)));
        assert!(err.to_string().contains("schema.yml"));
    }

    #[test]
    fn no_documents_lists_patterns() {
        let err = ResourceError::NoDocumentsMatched {
            patterns: vec!["teams/*.yml".into(), "apps/**/*.yaml".into()],
        };
        assert_eq!(
            err.to_string(),
            "no documents matched the patterns [teams/*.yml, apps/**/*.yaml]"
        );
    }
}
