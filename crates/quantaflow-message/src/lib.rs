#![forbid(unsafe_code)]
//! quantaflow-message: the engine-facing wire format.
//!
//! `MessageWriter` walks a finished `PlanRegistry` and produces a versioned
//! `PlanMessage`: flat operator records keyed by id, with links expressed as
//! id references so the receiver can rebuild the chain topology without
//! nested structures. Output is deterministic: identical registry contents
//! and registration order yield byte-identical messages.
//!
//! The execution engine and local console are collaborators behind the traits
//! in `engine`; this crate never runs a plan.

pub mod engine;
pub mod message;
pub mod udf;
pub mod writer;

pub use engine::{ConsoleRenderer, ExecutionEngine, JobHandle, JobId, JobStatus};
pub use message::{EncodedUdf, OperatorRecord, PlanMessage, WIRE_FORMAT_VERSION};
pub use udf::{CatalogUdfEncoder, SymbolicUdfEncoder, UdfEncoder};
pub use writer::{write_plan, MessageWriter};
