//! Process-scoped store of all operators for one plan-building session.
//!
//! The registry is an arena: operators are keyed by id and linked by id
//! reference, so dangling links and orphans are detectable as an explicit
//! validation pass at serialization time instead of relying on pointer
//! validity. Ids are monotone and never reused, which makes BTreeMap
//! iteration order equal registration order, the property the serializer's
//! determinism rests on.

use std::collections::BTreeMap;

use crate::error::{PlanError, Result};
use crate::id::OperatorId;
use crate::operator::{Operator, OperatorKind};

/// All operators created against one plan-building session.
///
/// Multiple builders may share one registry, producing multiple independent
/// chains. There is no deletion and no rewiring: identity fields are fixed at
/// registration, successor links are assigned exactly once.
#[derive(Debug, Default)]
pub struct PlanRegistry {
    operators: BTreeMap<OperatorId, Operator>,
    next_id: u64,
}

impl PlanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an unregistered operator, assign it the next unused id, and
    /// return that id. An operator that already carries an id was registered
    /// before; re-inserting it would alias two arena slots.
    pub fn register(&mut self, mut op: Operator) -> Result<OperatorId> {
        if let Some(existing) = op.id() {
            return Err(PlanError::Validation(format!(
                "operator is already registered as {existing}"
            )));
        }
        let id = OperatorId::new(self.next_id);
        self.next_id += 1;
        op.assign_id(id);
        self.operators.insert(id, op);
        Ok(id)
    }

    pub fn get(&self, id: OperatorId) -> Result<&Operator> {
        self.operators.get(&id).ok_or(PlanError::NotFound(id))
    }

    /// One-time successor wiring from `from` to `to`.
    ///
    /// Both ends must be registered, `to` must already name `from` as its
    /// predecessor (the builder sets that at construction), `from` must not
    /// be a sink, and `from` must not have been extended before. Nothing is
    /// mutated unless every check passes.
    pub fn link(&mut self, from: OperatorId, to: OperatorId) -> Result<()> {
        let to_predecessor = self.get(to)?.predecessor();
        if to_predecessor != Some(from) {
            return Err(PlanError::Validation(format!(
                "operator {to} does not name {from} as its predecessor"
            )));
        }
        let op = self.operators.get_mut(&from).ok_or(PlanError::NotFound(from))?;
        if op.kind().is_sink() {
            return Err(PlanError::State(format!(
                "operator {from} is a sink and cannot feed another operator"
            )));
        }
        op.set_successor(to)
    }

    /// Operators with kind Source, in registration order. Computed by
    /// filtering; no separate index to drift.
    pub fn sources(&self) -> Vec<&Operator> {
        self.of_kind(OperatorKind::Source)
    }

    /// Operators with kind Sink, in registration order.
    pub fn sinks(&self) -> Vec<&Operator> {
        self.of_kind(OperatorKind::Sink)
    }

    fn of_kind(&self, kind: OperatorKind) -> Vec<&Operator> {
        self.operators
            .values()
            .filter(|op| op.kind() == kind)
            .collect()
    }

    /// All operators in registration order.
    pub fn operators(&self) -> impl Iterator<Item = &Operator> {
        self.operators.values()
    }

    pub fn contains(&self, id: OperatorId) -> bool {
        self.operators.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}
