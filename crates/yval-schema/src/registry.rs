//! # Rule Registry
//!
//! Maps rule names to [`Rule`] implementations. The registry is populated
//! at startup and consulted by the schema compiler: every custom key in a
//! schema rule set must resolve here, otherwise the schema is rejected
//! before any document is read.
//!
//! ## Extending
//!
//! A new rule is a type implementing [`Rule`] plus one call to
//! [`RuleRegistry::register`]. The engine never needs to change.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use yval_core::{
    ConfigurationError, DocumentId, DocumentPath, ResourceError, ValidationError, Value,
};

use crate::model::SchemaNode;
use crate::rules::{AppLayout, AppMustExist, ValueMustBeUnique, ValueMustMatchFilename};
use crate::state::CrossDocumentState;

/// Schema keys handled by the engine itself. They can never be rule names.
pub const STRUCTURAL_KEYS: [&str; 4] = ["type", "required", "allowed", "schema"];

/// Everything a rule may look at while checking one value.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Name of the field being checked (last path segment).
    pub field: &'a str,
    /// The value at `path`. Structural checks have already passed.
    pub value: &'a Value,
    /// Full path of the value inside the document.
    pub path: &'a DocumentPath,
    /// The document being validated.
    pub document: &'a DocumentId,
    /// Run-wide shared state.
    pub state: &'a CrossDocumentState,
}

/// A named, pluggable predicate.
///
/// Implementations return zero or more [`ValidationError`]s. `Err` is
/// reserved for faults that prevent the check from being made at all.
pub trait Rule: Send + Sync + fmt::Debug {
    /// The key under which the rule appears in schemas.
    fn name(&self) -> &str;

    /// Meta-schema every argument must satisfy. Checked once, when the
    /// schema is compiled.
    fn argument_schema(&self) -> SchemaNode;

    /// Check one value. `argument` has already passed [`Rule::argument_schema`].
    fn check(
        &self,
        argument: &Value,
        ctx: &RuleContext<'_>,
    ) -> Result<Vec<ValidationError>, ResourceError>;
}

/// Name → rule lookup table.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: BTreeMap<String, Arc<dyn Rule>>,
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl RuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in rules: `value_must_match_filename`,
    /// `value_must_be_unique`, and `app_must_exist` (using `layout`).
    pub fn with_builtins(layout: AppLayout) -> Self {
        let mut rules: BTreeMap<String, Arc<dyn Rule>> = BTreeMap::new();
        let builtins: [Arc<dyn Rule>; 3] = [
            Arc::new(ValueMustMatchFilename),
            Arc::new(ValueMustBeUnique),
            Arc::new(AppMustExist::new(layout)),
        ];
        for rule in builtins {
            rules.insert(rule.name().to_string(), rule);
        }
        Self { rules }
    }

    /// Add a rule.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::DuplicateRule` if the name is already
    /// registered or collides with a structural schema key.
    pub fn register(&mut self, rule: Arc<dyn Rule>) -> Result<(), ConfigurationError> {
        let name = rule.name().to_string();
        if STRUCTURAL_KEYS.contains(&name.as_str()) || self.rules.contains_key(&name) {
            return Err(ConfigurationError::DuplicateRule { rule: name });
        }
        tracing::debug!(rule = %name, "registered rule");
        self.rules.insert(name, rule);
        Ok(())
    }

    /// Look up a rule by name.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Rule>> {
        self.rules.get(name).cloned()
    }

    /// Registered rule names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.rules.keys().map(|k| k.as_str()).collect()
    }

    /// Registered rules, sorted by name.
    pub fn rules(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
