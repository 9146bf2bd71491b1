#![forbid(unsafe_code)]
//! quantaflow-core: operator model, plan registry, IDs, errors, and hashing
//! for the client-side plan builder.
//!
//! This crate holds the in-memory representation of a pipeline under
//! construction: an arena of operators keyed by id, linked source → transforms
//! → sink through id references. Nothing here performs I/O or touches data;
//! input paths and UDF bodies are opaque references until an external engine
//! consumes the serialized plan.

pub mod config;
pub mod error;
pub mod hash;
pub mod id;
pub mod operator;
pub mod prelude;
pub mod registry;
pub mod udf;

/// Crate version, embedded in provenance output.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
