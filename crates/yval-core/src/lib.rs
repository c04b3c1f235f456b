//! # yval-core — Foundational Types for yval
//!
//! The leaf crate of the workspace. It defines the data the validation
//! engine reads and the errors every other crate reports:
//!
//! - [`Value`]: the immutable, parsed document tree (also used for every
//!   literal inside a schema).
//! - [`DocumentPath`]: the field/index path used to address errors.
//! - [`DocumentId`]: the identity of one document within a run.
//! - [`Fingerprint`]: the kind-tagged key under which values are remembered
//!   across documents.
//! - [`ValidationError`] plus the fatal taxonomy ([`ConfigurationError`],
//!   [`ParseError`], [`ResourceError`], wrapped by [`YvalError`]).
//! - [`load`]: the YAML parsing collaborator.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `yval-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod error;
pub mod identity;
pub mod load;
pub mod path;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use canonical::Fingerprint;
pub use error::{ConfigurationError, ParseError, ResourceError, ValidationError, YvalError};
pub use identity::DocumentId;
pub use load::{load_document, parse_document, DEFAULT_MAX_DOCUMENT_BYTES};
pub use path::{DocumentPath, PathSegment};
pub use value::{Mapping, Value, ValueKind};
