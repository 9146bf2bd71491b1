use thiserror::Error;

use crate::id::OperatorId;

/// Canonical result for the plan-building core.
pub type Result<T> = std::result::Result<T, PlanError>;

/// Error taxonomy for plan construction and serialization.
///
/// Every variant is reported to the immediate caller; there is no transient
/// class to retry, and a failed call leaves the registry and existing handles
/// intact for inspection.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Malformed input to a builder call (empty path, missing config).
    #[error("invalid plan input: {0}")]
    Validation(String),

    /// Illegal call for the handle's position in the chain state machine.
    #[error("illegal builder state: {0}")]
    State(String),

    /// Graph defect discovered at serialization time (dangling link, chain
    /// without a sink, orphaned operator).
    #[error("malformed plan graph: {0}")]
    Structural(String),

    /// Registry lookup miss.
    #[error("unknown operator: {0}")]
    NotFound(OperatorId),

    /// A UDF reference the encoder refuses to put on the wire. Plan-wide:
    /// the whole serialize call fails, no partial message.
    #[error("UDF reference cannot be encoded: {0}")]
    UnserializableUdf(String),

    /// Wire encoding/decoding failure (mapped from serde_json).
    #[error("wire encoding failed: {0}")]
    Encode(String),
}

impl From<serde_json::Error> for PlanError {
    fn from(e: serde_json::Error) -> Self {
        PlanError::Encode(e.to_string())
    }
}
