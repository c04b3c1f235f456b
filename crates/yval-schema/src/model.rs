//! # Schema Model
//!
//! The compiled, in-memory schema tree. Nodes are plain data: the
//! compiler ([`crate::compile`]) builds them from schema source and the
//! engine ([`crate::engine`]) reads them. Rule invocations carry the
//! resolved rule handle so the tree is self-contained once compiled.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use yval_core::{ConfigurationError, DocumentPath, Value};

use crate::registry::Rule;

/// The value kind a schema node accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    Mapping,
    Sequence,
    String,
    Integer,
    Float,
    Boolean,
    Null,
    Any,
}

impl SchemaType {
    /// Parse a type name from schema source. Cerberus spellings (`dict`,
    /// `list`) are accepted alongside the canonical names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "mapping" | "dict" => Some(Self::Mapping),
            "sequence" | "list" => Some(Self::Sequence),
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "float" => Some(Self::Float),
            "boolean" => Some(Self::Boolean),
            "null" => Some(Self::Null),
            "any" => Some(Self::Any),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mapping => "mapping",
            Self::Sequence => "sequence",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A custom rule declared on a schema node.
#[derive(Debug, Clone)]
pub struct RuleInvocation {
    /// Rule name as written in the schema.
    pub name: String,
    /// The literal argument, already checked against the rule's meta-schema.
    pub argument: Value,
    /// The registered implementation.
    pub rule: Arc<dyn Rule>,
}

/// Allowed shape of one document position.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    pub schema_type: SchemaType,
    pub required: bool,
    pub allowed_values: Option<Vec<Value>>,
    /// Declared child fields for mapping nodes. Empty means any contents.
    pub children: IndexMap<String, SchemaNode>,
    /// Item schema for sequence nodes.
    pub item_schema: Option<Box<SchemaNode>>,
    /// Custom rules in declaration order.
    pub rules: Vec<RuleInvocation>,
}

impl SchemaNode {
    /// A node of the given type with no constraints. Sequence nodes get an
    /// `any` item schema.
    pub fn of_type(schema_type: SchemaType) -> Self {
        let item_schema = (schema_type == SchemaType::Sequence)
            .then(|| Box::new(SchemaNode::of_type(SchemaType::Any)));
        Self {
            schema_type,
            required: false,
            allowed_values: None,
            children: IndexMap::new(),
            item_schema,
            rules: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn allowed(mut self, values: Vec<Value>) -> Self {
        self.allowed_values = Some(values);
        self
    }

    pub fn child(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.children.insert(name.into(), node);
        self
    }

    pub fn items(mut self, node: SchemaNode) -> Self {
        self.item_schema = Some(Box::new(node));
        self
    }

    /// Nesting depth below this node (a leaf is 0).
    pub fn depth(&self) -> usize {
        let children = self.children.values().map(|c| c.depth() + 1);
        let items = self.item_schema.iter().map(|i| i.depth() + 1);
        children.chain(items).max().unwrap_or(0)
    }
}

/// A compiled schema. The root is always a mapping node.
#[derive(Debug, Clone)]
pub struct Schema {
    root: SchemaNode,
}

impl Schema {
    /// Wrap a root node.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidSchema` unless `root` is a
    /// mapping node.
    pub fn from_root(root: SchemaNode) -> Result<Self, ConfigurationError> {
        if root.schema_type != SchemaType::Mapping {
            return Err(ConfigurationError::InvalidSchema {
                schema_path: DocumentPath::root(),
                reason: format!("schema root must be a mapping, found {}", root.schema_type),
            });
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    /// Names of the top-level fields, in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.root.children.keys().map(|k| k.as_str())
    }

    /// Total number of rule invocations anywhere in the tree.
    pub fn rule_count(&self) -> usize {
        fn count(node: &SchemaNode) -> usize {
            node.rules.len()
                + node.children.values().map(count).sum::<usize>()
                + node.item_schema.as_deref().map(count).unwrap_or(0)
        }
        count(&self.root)
    }
}
