//! Plan wire message: the boundary artifact handed to the execution engine.

use serde::{Deserialize, Serialize};

use quantaflow_core::error::Result;
use quantaflow_core::hash::{hash_serde, Hash256};
use quantaflow_core::id::OperatorId;
use quantaflow_core::operator::{OperatorConfig, OperatorKind};

/// Bump on any schema change; receivers reject versions they do not know.
pub const WIRE_FORMAT_VERSION: u32 = 1;

/// A UDF reference as it appears on the wire, produced by a `UdfEncoder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "repr", rename_all = "snake_case")]
pub enum EncodedUdf {
    Symbolic { name: String },
    Bytecode { payload: Vec<u8> },
}

/// One operator, flattened for transmission. Links are id references; the
/// receiver reconstructs the chain from `predecessor`/`successor` rather than
/// from nesting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorRecord {
    pub id: OperatorId,
    pub kind: OperatorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predecessor: Option<OperatorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successor: Option<OperatorId>,
    pub config: OperatorConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udf: Option<EncodedUdf>,
}

/// The complete serialized plan.
///
/// `sources` and `sinks` list ids in registration order; `operators` lists
/// records in chain order (each source's chain walked front to back). All
/// collections are ordered and struct field order is fixed, so encoding the
/// same plan twice is byte-identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanMessage {
    pub version: u32,
    pub sources: Vec<OperatorId>,
    pub sinks: Vec<OperatorId>,
    pub operators: Vec<OperatorRecord>,
}

impl PlanMessage {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn to_pretty_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Stable digest of the encoded message, for provenance and logs.
    pub fn plan_hash(&self) -> Result<Hash256> {
        hash_serde(self)
    }

    pub fn record(&self, id: OperatorId) -> Option<&OperatorRecord> {
        self.operators.iter().find(|r| r.id == id)
    }
}
