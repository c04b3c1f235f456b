//! # Cross-Document State
//!
//! The only data that outlives a single document. The batch runner creates
//! one [`CrossDocumentState`] per run and lends it to every engine call;
//! the uniqueness rule reads and writes it.
//!
//! `record_if_absent` performs its check-then-insert under one lock, so two
//! documents can never both observe themselves as the first owner of a value.

use std::collections::HashMap;

use parking_lot::Mutex;
use yval_core::{DocumentId, Fingerprint, Value};

/// `field name → (value fingerprint → first document that used it)`.
#[derive(Debug, Default)]
pub struct CrossDocumentState {
    seen_fields: Mutex<HashMap<String, HashMap<Fingerprint, DocumentId>>>,
}

impl CrossDocumentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `document` as the owner of `value` for `field` unless the value
    /// is already owned. Returns the existing owner when there is one; the
    /// stored owner never changes once recorded.
    pub fn record_if_absent(
        &self,
        field: &str,
        value: &Value,
        document: &DocumentId,
    ) -> Option<DocumentId> {
        let fingerprint = Fingerprint::of(value);
        let mut seen = self.seen_fields.lock();
        let bucket = seen.entry(field.to_string()).or_default();
        match bucket.get(&fingerprint) {
            Some(owner) => Some(owner.clone()),
            None => {
                bucket.insert(fingerprint, document.clone());
                None
            }
        }
    }

    /// The document that first used `value` for `field`, if any.
    pub fn owner_of(&self, field: &str, value: &Value) -> Option<DocumentId> {
        let fingerprint = Fingerprint::of(value);
        self.seen_fields
            .lock()
            .get(field)
            .and_then(|bucket| bucket.get(&fingerprint).cloned())
    }

    /// Number of fields with at least one recorded value.
    pub fn field_count(&self) -> usize {
        self.seen_fields.lock().len()
    }

    /// Number of distinct values recorded for `field`.
    pub fn value_count(&self, field: &str) -> usize {
        self.seen_fields.lock().get(field).map_or(0, |b| b.len())
    }

    pub fn is_empty(&self) -> bool {
        self.seen_fields.lock().is_empty()
    }
}
