//! Plan serializer: registry graph → wire message.
//!
//! Pure over the registry's current state; nothing is mutated. Structural
//! defects (a chain that never reaches a sink, a link to an id the registry
//! does not hold, an operator unreachable from any source) surface here as
//! `Structural` errors, and no partial message is returned.

use std::collections::BTreeSet;

use tracing::debug;

use quantaflow_core::error::{PlanError, Result};
use quantaflow_core::id::OperatorId;
use quantaflow_core::operator::{Operator, OperatorConfig, OperatorKind};
use quantaflow_core::registry::PlanRegistry;

use crate::message::{OperatorRecord, PlanMessage, WIRE_FORMAT_VERSION};
use crate::udf::UdfEncoder;

/// Serializes a registry's operator graph into a `PlanMessage`.
pub struct MessageWriter<'e> {
    encoder: &'e dyn UdfEncoder,
}

impl<'e> MessageWriter<'e> {
    pub fn new(encoder: &'e dyn UdfEncoder) -> Self {
        Self { encoder }
    }

    /// Walk every chain from its source to its sink and emit one record per
    /// visited operator, in chain order.
    pub fn write(&self, registry: &PlanRegistry) -> Result<PlanMessage> {
        let sources = ids_of(registry.sources())?;
        let sinks = ids_of(registry.sinks())?;

        let mut visited: BTreeSet<OperatorId> = BTreeSet::new();
        let mut records = Vec::with_capacity(registry.len());

        for &source in &sources {
            let mut cursor = source;
            loop {
                if !visited.insert(cursor) {
                    return Err(PlanError::Structural(format!(
                        "operator {cursor} is reachable from more than one direction; chains must not share nodes"
                    )));
                }
                let op = registry.get(cursor).map_err(|_| {
                    PlanError::Structural(format!(
                        "successor link points at unknown operator {cursor}"
                    ))
                })?;
                if let Some(pred) = op.predecessor() {
                    if !registry.contains(pred) {
                        return Err(PlanError::Structural(format!(
                            "operator {cursor} names unknown predecessor {pred}"
                        )));
                    }
                }
                records.push(self.encode_record(op)?);
                if op.kind().is_sink() {
                    break;
                }
                match op.successor() {
                    Some(next) => cursor = next,
                    None => {
                        return Err(PlanError::Structural(format!(
                            "chain starting at {source} does not terminate at a sink (operator {cursor} has no successor)"
                        )));
                    }
                }
            }
        }

        if visited.len() != registry.len() {
            let orphans: Vec<String> = registry
                .operators()
                .filter(|op| op.id().map_or(true, |id| !visited.contains(&id)))
                .map(describe_operator)
                .collect();
            return Err(PlanError::Structural(format!(
                "operators unreachable from any source: {}",
                orphans.join(", ")
            )));
        }

        let message = PlanMessage {
            version: WIRE_FORMAT_VERSION,
            sources,
            sinks,
            operators: records,
        };
        debug!(
            operators = message.operators.len(),
            sources = message.sources.len(),
            sinks = message.sinks.len(),
            "serialized plan"
        );
        Ok(message)
    }

    fn encode_record(&self, op: &Operator) -> Result<OperatorRecord> {
        let id = require_id(op)?;

        // The constructors keep kind and config in lockstep; re-check here so
        // a record can never carry a mismatched payload onto the wire.
        match (op.kind(), op.config()) {
            (OperatorKind::Source, OperatorConfig::Source { .. }) => {}
            (OperatorKind::Sink, OperatorConfig::Sink { .. }) => {}
            (kind, OperatorConfig::Transform) if kind.is_transform() => {}
            (kind, _) => {
                return Err(PlanError::Structural(format!(
                    "operator {id} of kind {} carries a config for a different kind",
                    kind.as_str()
                )));
            }
        }

        let udf = match op.udf() {
            Some(udf) => Some(self.encoder.encode(udf)?),
            None => None,
        };

        Ok(OperatorRecord {
            id,
            kind: op.kind(),
            predecessor: op.predecessor(),
            successor: op.successor(),
            config: op.config().clone(),
            udf,
        })
    }
}

/// One-shot convenience over `MessageWriter`.
pub fn write_plan(registry: &PlanRegistry, encoder: &dyn UdfEncoder) -> Result<PlanMessage> {
    MessageWriter::new(encoder).write(registry)
}

fn ids_of(operators: Vec<&Operator>) -> Result<Vec<OperatorId>> {
    operators.into_iter().map(require_id).collect()
}

fn require_id(op: &Operator) -> Result<OperatorId> {
    op.id().ok_or_else(|| {
        PlanError::Structural("registry holds an operator without an id".into())
    })
}

fn describe_operator(op: &Operator) -> String {
    match op.id() {
        Some(id) => format!("{id} ({})", op.kind().as_str()),
        None => format!("unregistered {}", op.kind().as_str()),
    }
}
