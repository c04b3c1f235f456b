//! # yval-schema — Schema-Driven Validation Engine
//!
//! Validates parsed documents against declarative, Cerberus-style schemas
//! extended with pluggable rules, some of which need knowledge across all
//! documents of a run.
//!
//! ## Pipeline
//!
//! 1. [`RuleRegistry`]: built at startup; maps rule names to [`Rule`]s.
//! 2. [`SchemaCompiler`]: compiles schema source into a [`Schema`],
//!    resolving every rule name and meta-validating every rule argument.
//!    All configuration errors surface here, before any document is read.
//! 3. [`validate_document`]: the recursive engine for one document.
//! 4. [`BatchRunner`]: validates an ordered list of locations, owning one
//!    [`CrossDocumentState`] per run, and aggregates a [`BatchResult`].
//!
//! ## Crate Policy
//!
//! - Depends only on `yval-core` internally.
//! - Rule failures are data ([`yval_core::ValidationError`]); they never
//!   abort traversal.
//! - `app_must_exist` is the only code path that touches the filesystem
//!   during validation.

pub mod batch;
pub mod compile;
pub mod engine;
pub mod model;
pub mod registry;
pub mod rules;
pub mod state;

pub use batch::{BatchConfig, BatchResult, BatchRunner, DocumentOutcome, DocumentResult};
pub use compile::{Limits, SchemaCompiler};
pub use engine::{check_structure, validate_document};
pub use model::{RuleInvocation, Schema, SchemaNode, SchemaType};
pub use registry::{Rule, RuleContext, RuleRegistry};
pub use rules::{AppLayout, AppMustExist, ValueMustBeUnique, ValueMustMatchFilename};
pub use state::CrossDocumentState;
