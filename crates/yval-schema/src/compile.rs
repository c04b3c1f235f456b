//! # Schema Compiler
//!
//! Turns parsed schema source into a [`Schema`]. This is where every
//! configuration problem surfaces, before any document is read:
//!
//! - malformed structural keys (`type`, `required`, `allowed`, `schema`),
//! - rule names missing from the [`RuleRegistry`],
//! - rule arguments failing the rule's meta-schema,
//! - nesting deeper than [`Limits::max_schema_depth`].
//!
//! ## Source format
//!
//! The root is a mapping of field name → rule set; a rule set is a mapping
//! whose structural keys shape the node and whose remaining keys are rule
//! invocations, kept in source order:
//!
//! ```yaml
//! name:
//!   type: string
//!   required: true
//!   value_must_be_unique: true
//! spec:
//!   type: dict
//!   schema:
//!     replicas: {type: integer}
//! ```

use std::path::Path;

use yval_core::{
    load_document, ConfigurationError, DocumentPath, ResourceError, Value, YvalError,
    DEFAULT_MAX_DOCUMENT_BYTES,
};

use crate::engine::check_structure;
use crate::model::{RuleInvocation, Schema, SchemaNode, SchemaType};
use crate::registry::RuleRegistry;

/// Bounds applied while compiling a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting of rule sets below the root.
    pub max_schema_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_schema_depth: 64,
        }
    }
}

/// Compiles schema source against a rule registry.
#[derive(Debug, Clone, Copy)]
pub struct SchemaCompiler<'r> {
    registry: &'r RuleRegistry,
    limits: Limits,
}

impl<'r> SchemaCompiler<'r> {
    pub fn new(registry: &'r RuleRegistry, limits: Limits) -> Self {
        Self { registry, limits }
    }

    /// Read, parse, and compile a schema file.
    ///
    /// # Errors
    ///
    /// - `ResourceError::SchemaNotFound` if `path` does not exist.
    /// - `ParseError` if the file is not valid YAML.
    /// - `ConfigurationError` from [`SchemaCompiler::compile`].
    pub fn load(&self, path: &Path) -> Result<Schema, YvalError> {
        if !path.is_file() {
            return Err(ResourceError::SchemaNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        let source = load_document(path, DEFAULT_MAX_DOCUMENT_BYTES)?;
        let schema = self.compile(&source)?;
        tracing::debug!(
            schema = %path.display(),
            fields = schema.root().children.len(),
            rules = schema.rule_count(),
            "compiled schema"
        );
        Ok(schema)
    }

    /// Compile parsed schema source.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] found, in source order.
    pub fn compile(&self, source: &Value) -> Result<Schema, ConfigurationError> {
        let root_path = DocumentPath::root();
        let fields = match source {
            Value::Mapping(map) => map,
            // An empty schema file parses as null: accept any mapping.
            Value::Null => return Schema::from_root(SchemaNode::of_type(SchemaType::Mapping)),
            other => {
                return Err(invalid(
                    &root_path,
                    format!("schema root must be a mapping of fields, found {}", other.kind()),
                ))
            }
        };

        let mut root = SchemaNode::of_type(SchemaType::Mapping);
        for (name, rule_set) in fields {
            let node = self.rule_set(rule_set, &root_path.child(name.as_str()), 1)?;
            root.children.insert(name.clone(), node);
        }
        Schema::from_root(root)
    }

    fn rule_set(
        &self,
        source: &Value,
        path: &DocumentPath,
        depth: usize,
    ) -> Result<SchemaNode, ConfigurationError> {
        if depth > self.limits.max_schema_depth {
            return Err(ConfigurationError::SchemaTooDeep {
                schema_path: path.clone(),
                limit: self.limits.max_schema_depth,
            });
        }

        let map = source.as_mapping().ok_or_else(|| {
            invalid(path, format!("rule set must be a mapping, found {}", source.kind()))
        })?;

        let schema_type = match map.get("type") {
            None => SchemaType::Any,
            Some(Value::String(name)) => SchemaType::from_name(name)
                .ok_or_else(|| invalid(path, format!("unknown type '{name}'")))?,
            Some(other) => {
                return Err(invalid(path, format!("'type' must be a string, found {}", other.kind())))
            }
        };

        let mut node = SchemaNode::of_type(schema_type);

        for (key, value) in map {
            match key.as_str() {
                "type" => {}
                "required" => {
                    node.required = value.as_bool().ok_or_else(|| {
                        invalid(path, format!("'required' must be a boolean, found {}", value.kind()))
                    })?;
                }
                "allowed" => node.allowed_values = Some(allowed_values(value, path)?),
                "schema" => self.nested(&mut node, value, path, depth)?,
                rule_name => node.rules.push(self.invocation(rule_name, value, path)?),
            }
        }

        Ok(node)
    }

    /// Apply a `schema` key: child fields for mappings, item rule set for sequences.
    fn nested(
        &self,
        node: &mut SchemaNode,
        value: &Value,
        path: &DocumentPath,
        depth: usize,
    ) -> Result<(), ConfigurationError> {
        match node.schema_type {
            SchemaType::Mapping => {
                let fields = value.as_mapping().ok_or_else(|| {
                    invalid(path, "'schema' of a mapping must map field names to rule sets")
                })?;
                for (name, rule_set) in fields {
                    let child = self.rule_set(rule_set, &path.child(name.as_str()), depth + 1)?;
                    node.children.insert(name.clone(), child);
                }
            }
            SchemaType::Sequence => {
                let items = self.rule_set(value, &path.child("schema"), depth + 1)?;
                node.item_schema = Some(Box::new(items));
            }
            other => {
                return Err(invalid(
                    path,
                    format!("'schema' requires type mapping or sequence, found {other}"),
                ))
            }
        }
        Ok(())
    }

    fn invocation(
        &self,
        name: &str,
        argument: &Value,
        path: &DocumentPath,
    ) -> Result<RuleInvocation, ConfigurationError> {
        let rule = self
            .registry
            .resolve(name)
            .ok_or_else(|| ConfigurationError::UnknownRule {
                rule: name.to_string(),
                schema_path: path.clone(),
            })?;

        let violations = check_structure(&rule.argument_schema(), argument);
        if !violations.is_empty() {
            let reason = violations
                .iter()
                .map(|v| v.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ConfigurationError::InvalidRuleArgument {
                rule: name.to_string(),
                schema_path: path.clone(),
                reason,
            });
        }

        Ok(RuleInvocation {
            name: name.to_string(),
            argument: argument.clone(),
            rule,
        })
    }
}

fn allowed_values(value: &Value, path: &DocumentPath) -> Result<Vec<Value>, ConfigurationError> {
    let items = value
        .as_sequence()
        .ok_or_else(|| invalid(path, format!("'allowed' must be a sequence, found {}", value.kind())))?;
    if let Some(bad) = items.iter().find(|v| !v.is_scalar()) {
        return Err(invalid(
            path,
            format!("'allowed' entries must be scalars, found {}", bad.kind()),
        ));
    }
    Ok(items.to_vec())
}

fn invalid(path: &DocumentPath, reason: impl Into<String>) -> ConfigurationError {
    ConfigurationError::InvalidSchema {
        schema_path: path.clone(),
        reason: reason.into(),
    }
}
