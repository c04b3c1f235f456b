//! # Validation Engine
//!
//! Depth-first structural match of one document against a compiled
//! [`Schema`], followed by the custom rules declared on each node.
//!
//! ## Evaluation order (observable contract)
//!
//! For every node: type check, allowed values, children in schema
//! declaration order (or sequence items in index order), then the node's
//! rules in declaration order. Errors are appended in exactly that order,
//! so repeated runs produce identical output.
//!
//! ## Short-circuits
//!
//! - A missing required field yields one `required` error and nothing below it.
//! - A type mismatch yields one `type` error; the subtree and the node's
//!   rules are skipped.
//!
//! Nothing else stops evaluation: a failing rule never hides its siblings.

use yval_core::{DocumentId, DocumentPath, ResourceError, ValidationError, Value};

use crate::model::{Schema, SchemaNode, SchemaType};
use crate::registry::RuleContext;
use crate::state::CrossDocumentState;

pub const CONSTRAINT_REQUIRED: &str = "required";
pub const CONSTRAINT_TYPE: &str = "type";
pub const CONSTRAINT_ALLOWED: &str = "allowed_values";

/// Validate one document.
///
/// Mutates `state` only through the rules that use it (uniqueness).
///
/// # Errors
///
/// Returns a [`ResourceError`] when a rule cannot perform its check at all
/// (for example a filesystem stat failing). Rule *failures* are never
/// errors; they are the returned list.
pub fn validate_document(
    schema: &Schema,
    document: &Value,
    document_id: &DocumentId,
    state: &CrossDocumentState,
) -> Result<Vec<ValidationError>, ResourceError> {
    let mut walker = Walker::new(Some(RuleScope {
        document: document_id,
        state,
    }));
    walker.node(schema.root(), document, &DocumentPath::root());
    match walker.fault {
        Some(fault) => Err(fault),
        None => Ok(walker.errors),
    }
}

/// Structural checks only (type, required, allowed values, nesting); custom
/// rules are not run. Used to check rule arguments against their meta-schema.
pub fn check_structure(node: &SchemaNode, value: &Value) -> Vec<ValidationError> {
    let mut walker = Walker::new(None);
    walker.node(node, value, &DocumentPath::root());
    walker.errors
}

/// Whether a value's runtime kind satisfies a schema type.
pub fn type_matches(schema_type: SchemaType, value: &Value) -> bool {
    match schema_type {
        SchemaType::Any => true,
        SchemaType::Mapping => matches!(value, Value::Mapping(_)),
        SchemaType::Sequence => matches!(value, Value::Sequence(_)),
        SchemaType::String => matches!(value, Value::String(_)),
        SchemaType::Integer => matches!(value, Value::Integer(_)),
        SchemaType::Float => matches!(value, Value::Float(_)),
        SchemaType::Boolean => matches!(value, Value::Bool(_)),
        SchemaType::Null => matches!(value, Value::Null),
    }
}

#[derive(Clone, Copy)]
struct RuleScope<'a> {
    document: &'a DocumentId,
    state: &'a CrossDocumentState,
}

/// Depth-first walker. Without a scope no rules run. The first resource
/// fault a rule reports stops the walk.
struct Walker<'a> {
    scope: Option<RuleScope<'a>>,
    errors: Vec<ValidationError>,
    fault: Option<ResourceError>,
}

impl<'a> Walker<'a> {
    fn new(scope: Option<RuleScope<'a>>) -> Self {
        Self {
            scope,
            errors: Vec::new(),
            fault: None,
        }
    }

    fn node(&mut self, node: &SchemaNode, value: &Value, path: &DocumentPath) {
        if self.fault.is_some() {
            return;
        }

        if !type_matches(node.schema_type, value) {
            self.errors.push(ValidationError::constraint_failed(
                path.clone(),
                CONSTRAINT_TYPE,
                value.clone(),
            ));
            return;
        }

        if let Some(allowed) = &node.allowed_values {
            self.allowed(allowed, value, path);
        }

        if let Value::Mapping(map) = value {
            for (name, child) in &node.children {
                let child_path = path.child(name.as_str());
                match map.get(name) {
                    Some(child_value) => self.node(child, child_value, &child_path),
                    None if child.required => {
                        self.errors.push(ValidationError::constraint_failed(
                            child_path,
                            CONSTRAINT_REQUIRED,
                            Value::Null,
                        ));
                    }
                    None => {}
                }
            }
        }

        if let (Some(item_schema), Value::Sequence(items)) = (&node.item_schema, value) {
            for (index, item) in items.iter().enumerate() {
                self.node(item_schema, item, &path.child(index));
            }
        }

        if let Some(scope) = self.scope {
            self.rules(node, value, path, scope);
        }
    }

    /// Scalars must be members; for sequences every element must be.
    fn allowed(&mut self, allowed: &[Value], value: &Value, path: &DocumentPath) {
        match value {
            Value::Sequence(items) => {
                for item in items.iter().filter(|item| !allowed.contains(item)) {
                    self.errors.push(ValidationError::constraint_failed(
                        path.clone(),
                        CONSTRAINT_ALLOWED,
                        item.clone(),
                    ));
                }
            }
            Value::Mapping(_) => {}
            scalar if !allowed.contains(scalar) => {
                self.errors.push(ValidationError::constraint_failed(
                    path.clone(),
                    CONSTRAINT_ALLOWED,
                    scalar.clone(),
                ));
            }
            _ => {}
        }
    }

    fn rules(&mut self, node: &SchemaNode, value: &Value, path: &DocumentPath, scope: RuleScope<'_>) {
        if node.rules.is_empty() || self.fault.is_some() {
            return;
        }
        let field = path.field_name();
        let ctx = RuleContext {
            field: &field,
            value,
            path,
            document: scope.document,
            state: scope.state,
        };
        for invocation in &node.rules {
            match invocation.rule.check(&invocation.argument, &ctx) {
                Ok(found) => {
                    if !found.is_empty() {
                        tracing::trace!(
                            rule = %invocation.name,
                            path = %path,
                            count = found.len(),
                            "rule reported errors"
                        );
                    }
                    self.errors.extend(found);
                }
                Err(fault) => {
                    self.fault = Some(fault);
                    return;
                }
            }
        }
    }
}
