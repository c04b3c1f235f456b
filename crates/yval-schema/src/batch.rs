//! # Batch Runner
//!
//! Validates an ordered list of document locations against one schema and
//! aggregates the outcomes. Documents are processed sequentially in the
//! order given, which makes uniqueness attribution ("first seen wins")
//! deterministic.
//!
//! A document that cannot be read or parsed, or whose rules hit a resource
//! fault, is recorded as invalid with a single synthetic error; the batch
//! always continues with the next location.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use yval_core::{
    load_document, DocumentId, DocumentPath, ValidationError, Value, DEFAULT_MAX_DOCUMENT_BYTES,
};

use crate::engine::validate_document;
use crate::model::Schema;
use crate::state::CrossDocumentState;

pub const CONSTRAINT_PARSE: &str = "parse";
pub const CONSTRAINT_FILE_EXTENSION: &str = "file_extension";
pub const CONSTRAINT_RESOURCE: &str = "resource";

/// Options governing which locations are validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Report locations outside `filter_extensions` as invalid instead of
    /// skipping them.
    pub validate_file_extension: bool,
    /// Extensions eligible for validation, with or without the leading dot.
    /// Compared case-insensitively.
    pub filter_extensions: BTreeSet<String>,
    /// Documents larger than this are reported as parse failures.
    pub max_document_bytes: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            validate_file_extension: false,
            filter_extensions: ["yml", "yaml"].into_iter().map(String::from).collect(),
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

impl BatchConfig {
    /// Whether `path` carries one of the eligible extensions.
    pub fn accepts(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.filter_extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }

    /// Eligible extensions, normalised to lowercase without dots.
    pub fn normalized_extensions(&self) -> Vec<String> {
        let set: BTreeSet<String> = self
            .filter_extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        set.into_iter().collect()
    }
}

/// What happened to one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentOutcome {
    Valid,
    Invalid,
    /// Extension not eligible and extension enforcement off. Not counted.
    Skipped,
}

/// Result for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentResult {
    pub document: DocumentId,
    pub outcome: DocumentOutcome,
    pub errors: Vec<ValidationError>,
}

/// Aggregate over a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchResult {
    /// Documents processed (valid + invalid). Skipped documents are excluded.
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub skipped: usize,
    /// Every location, in processing order.
    pub documents: Vec<DocumentResult>,
}

impl BatchResult {
    /// True iff no document is invalid.
    pub fn passed(&self) -> bool {
        self.invalid == 0
    }

    /// Invalid documents, in processing order.
    pub fn failures(&self) -> impl Iterator<Item = &DocumentResult> {
        self.documents
            .iter()
            .filter(|d| d.outcome == DocumentOutcome::Invalid)
    }

    fn push(&mut self, result: DocumentResult) {
        match result.outcome {
            DocumentOutcome::Valid => {
                self.total += 1;
                self.valid += 1;
            }
            DocumentOutcome::Invalid => {
                self.total += 1;
                self.invalid += 1;
            }
            DocumentOutcome::Skipped => self.skipped += 1,
        }
        self.documents.push(result);
    }
}

/// Runs one schema over many documents.
#[derive(Debug, Clone)]
pub struct BatchRunner<'s> {
    schema: &'s Schema,
    config: BatchConfig,
}

impl<'s> BatchRunner<'s> {
    pub fn new(schema: &'s Schema, config: BatchConfig) -> Self {
        Self { schema, config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Validate every location with fresh cross-document state.
    pub fn run(&self, locations: &[PathBuf]) -> BatchResult {
        let state = CrossDocumentState::new();
        self.run_with_state(locations, &state)
    }

    /// Validate every location against caller-owned state. The state is
    /// only ever added to.
    pub fn run_with_state(&self, locations: &[PathBuf], state: &CrossDocumentState) -> BatchResult {
        let mut result = BatchResult::default();
        for location in locations {
            let outcome = self.validate_location(location, state);
            tracing::debug!(
                document = %outcome.document,
                outcome = ?outcome.outcome,
                errors = outcome.errors.len(),
                "validated document"
            );
            result.push(outcome);
        }
        tracing::info!(
            total = result.total,
            valid = result.valid,
            invalid = result.invalid,
            skipped = result.skipped,
            "batch complete"
        );
        result
    }

    /// Validate an already-parsed document against the runner's schema.
    pub fn validate_value(
        &self,
        document: &Value,
        document_id: &DocumentId,
        state: &CrossDocumentState,
    ) -> DocumentResult {
        match validate_document(self.schema, document, document_id, state) {
            Ok(errors) => DocumentResult {
                document: document_id.clone(),
                outcome: if errors.is_empty() {
                    DocumentOutcome::Valid
                } else {
                    DocumentOutcome::Invalid
                },
                errors,
            },
            Err(e) => {
                tracing::warn!(document = %document_id, error = %e, "rule could not be evaluated");
                invalid(document_id, CONSTRAINT_RESOURCE, Value::Null, e.to_string())
            }
        }
    }

    fn validate_location(&self, location: &Path, state: &CrossDocumentState) -> DocumentResult {
        let document_id = DocumentId::from(location);

        if !self.config.accepts(location) {
            if !self.config.validate_file_extension {
                tracing::debug!(document = %document_id, "skipping: extension not eligible");
                return DocumentResult {
                    document: document_id,
                    outcome: DocumentOutcome::Skipped,
                    errors: Vec::new(),
                };
            }
            let ext = document_id.extension().map(Value::from).unwrap_or(Value::Null);
            let message = format!(
                "'{}' does not have one of the accepted extensions [{}]",
                document_id,
                self.config.normalized_extensions().join(", ")
            );
            return invalid(&document_id, CONSTRAINT_FILE_EXTENSION, ext, message);
        }

        match load_document(location, self.config.max_document_bytes) {
            Ok(document) => self.validate_value(&document, &document_id, state),
            Err(e) => {
                tracing::warn!(document = %document_id, error = %e, "document could not be parsed");
                invalid(&document_id, CONSTRAINT_PARSE, Value::Null, e.to_string())
            }
        }
    }
}

fn invalid(
    document_id: &DocumentId,
    constraint: &str,
    value: Value,
    message: String,
) -> DocumentResult {
    DocumentResult {
        document: document_id.clone(),
        outcome: DocumentOutcome::Invalid,
        errors: vec![ValidationError::new(
            DocumentPath::root(),
            constraint,
            value,
            message,
        )],
    }
}
