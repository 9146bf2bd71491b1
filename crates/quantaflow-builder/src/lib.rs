#![forbid(unsafe_code)]
//! quantaflow-builder: the fluent plan-building surface.
//!
//! A `DataQuantaBuilder` opens chains against a shared `PlanRegistry`; each
//! `DataQuanta` handle marks the tail of one chain. Handles build the graph
//! but never execute it; a terminated chain is serialized to a
//! `PlanMessage` and handed to an external engine.
//!
//! The registry is shared through `Rc<RefCell<_>>` rather than `Arc<Mutex<_>>`
//! on purpose: plan building is single-threaded, and `register` is the only
//! mutation point. A concurrent front-end would put its own lock around that
//! one boundary.

pub mod dsl;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use quantaflow_core::config::ClientConfig;
use quantaflow_core::error::{PlanError, Result};
use quantaflow_core::id::OperatorId;
use quantaflow_core::operator::{Operator, OperatorKind};
use quantaflow_core::registry::PlanRegistry;
use quantaflow_core::udf::UdfRef;
use quantaflow_message::engine::{ConsoleRenderer, ExecutionEngine, JobHandle};
use quantaflow_message::message::PlanMessage;
use quantaflow_message::udf::UdfEncoder;
use quantaflow_message::writer::MessageWriter;

pub use dsl::yaml::parse_yaml_pipeline;

/// Shared handle to the registry one or more builders append to.
pub type SharedRegistry = Rc<RefCell<PlanRegistry>>;

/// Sink-specific options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkOptions {
    pub line_terminator: String,
}

impl Default for SinkOptions {
    fn default() -> Self {
        Self {
            line_terminator: "\n".to_string(),
        }
    }
}

impl SinkOptions {
    pub fn with_terminator(line_terminator: impl Into<String>) -> Self {
        Self {
            line_terminator: line_terminator.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            line_terminator: config.line_terminator.clone(),
        }
    }
}

/// Opens pipeline chains against one registry.
///
/// Several builders may share a registry (`with_registry`); each `source`
/// call starts an independent chain in it.
pub struct DataQuantaBuilder {
    registry: SharedRegistry,
}

impl DataQuantaBuilder {
    /// A builder over a fresh, private registry.
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(PlanRegistry::new())),
        }
    }

    /// A builder appending to an existing registry.
    pub fn with_registry(registry: SharedRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> SharedRegistry {
        Rc::clone(&self.registry)
    }

    /// Open a new chain reading from `path`.
    pub fn source(&self, path: &str) -> Result<DataQuanta> {
        let op = Operator::source(path)?;
        let id = self.registry.borrow_mut().register(op)?;
        trace!(%id, path, "opened source chain");
        Ok(DataQuanta {
            registry: Rc::clone(&self.registry),
            op: id,
        })
    }
}

impl Default for DataQuantaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The pipeline ending at one operator.
///
/// Cheap to clone; cloning shares the underlying graph rather than copying
/// it. Each chain call registers a new operator and returns a new handle;
/// existing handles keep pointing at their original position.
#[derive(Clone, Debug)]
pub struct DataQuanta {
    registry: SharedRegistry,
    op: OperatorId,
}

impl DataQuanta {
    /// Id of the operator this handle points at.
    pub fn id(&self) -> OperatorId {
        self.op
    }

    pub fn registry(&self) -> SharedRegistry {
        Rc::clone(&self.registry)
    }

    /// True once the chain ends in a sink; terminal handles refuse further
    /// transforms.
    pub fn is_terminal(&self) -> bool {
        self.registry
            .borrow()
            .get(self.op)
            .map(|op| op.kind().is_sink())
            .unwrap_or(false)
    }

    pub fn map(&self, mapper: UdfRef) -> Result<Self> {
        self.extend_transform(OperatorKind::Map, mapper)
    }

    pub fn filter(&self, predicate: UdfRef) -> Result<Self> {
        self.extend_transform(OperatorKind::Filter, predicate)
    }

    pub fn sort(&self, key: UdfRef) -> Result<Self> {
        self.extend_transform(OperatorKind::Sort, key)
    }

    /// Terminate the chain with a sink writing to `path`.
    pub fn sink(&self, path: &str, options: SinkOptions) -> Result<Self> {
        let mut registry = self.registry.borrow_mut();
        check_extendable(&registry, self.op)?;
        let op = Operator::sink(path, options.line_terminator, self.op)?;
        let id = registry.register(op)?;
        registry.link(self.op, id)?;
        trace!(from = %self.op, %id, path, "terminated chain at sink");
        drop(registry);
        Ok(Self {
            registry: Rc::clone(&self.registry),
            op: id,
        })
    }

    fn extend_transform(&self, kind: OperatorKind, udf: UdfRef) -> Result<Self> {
        let mut registry = self.registry.borrow_mut();
        check_extendable(&registry, self.op)?;
        let op = Operator::transform(kind, udf, self.op)?;
        let id = registry.register(op)?;
        registry.link(self.op, id)?;
        trace!(from = %self.op, %id, kind = kind.as_str(), "extended chain");
        drop(registry);
        Ok(Self {
            registry: Rc::clone(&self.registry),
            op: id,
        })
    }

    /// Serialize the registry this chain belongs to. Terminal handles only.
    pub fn to_message(&self, encoder: &dyn UdfEncoder) -> Result<PlanMessage> {
        self.require_terminal()?;
        MessageWriter::new(encoder).write(&self.registry.borrow())
    }

    /// Hand the finished plan to an execution engine.
    pub fn execute(
        &self,
        engine: &dyn ExecutionEngine,
        encoder: &dyn UdfEncoder,
    ) -> Result<JobHandle> {
        let message = self.to_message(encoder)?;
        engine.submit(&message)
    }

    /// Stream this sink's output through a local renderer instead of
    /// submitting the plan.
    pub fn console(&self, renderer: &dyn ConsoleRenderer, encoder: &dyn UdfEncoder) -> Result<()> {
        let message = self.to_message(encoder)?;
        renderer.render(&message, self.op)
    }

    fn require_terminal(&self) -> Result<()> {
        if self.is_terminal() {
            Ok(())
        } else {
            Err(PlanError::State(format!(
                "operator {} is not a sink; only terminated chains can leave the builder",
                self.op
            )))
        }
    }
}

// Precondition gate for chain extension: the tail must be a registered,
// unextended non-sink. Runs before anything is registered, so a refused call
// leaves the registry untouched.
fn check_extendable(registry: &PlanRegistry, id: OperatorId) -> Result<()> {
    let tail = registry.get(id)?;
    if tail.kind().is_sink() {
        return Err(PlanError::State(format!(
            "chain already terminated at sink {id}"
        )));
    }
    if let Some(next) = tail.successor() {
        return Err(PlanError::State(format!(
            "operator {id} already feeds {next}; chains cannot branch"
        )));
    }
    Ok(())
}
