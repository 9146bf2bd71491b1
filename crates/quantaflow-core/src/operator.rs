//! Plan nodes: operator kinds, kind-specific configuration, and the arena
//! node itself.
//!
//! Operators are immutable once created except for two graph-link fields:
//! the id (assigned exactly once by the registry) and the successor link
//! (assigned exactly once by `PlanRegistry::link`). Everything else is fixed
//! at construction.

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::id::OperatorId;
use crate::udf::UdfRef;

/// Roles an operator can play in a pipeline. Wire tags are stable; extend at
/// the end only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperatorKind {
    Source,
    Map,
    Filter,
    Sort,
    Sink,
}

impl OperatorKind {
    pub fn is_source(self) -> bool {
        matches!(self, Self::Source)
    }

    pub fn is_sink(self) -> bool {
        matches!(self, Self::Sink)
    }

    /// True for kinds that carry their logic in a UDF.
    pub fn is_transform(self) -> bool {
        matches!(self, Self::Map | Self::Filter | Self::Sort)
    }

    /// Stable tag, identical to the wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "SOURCE",
            Self::Map => "MAP",
            Self::Filter => "FILTER",
            Self::Sort => "SORT",
            Self::Sink => "SINK",
        }
    }
}

/// Kind-specific parameters, discriminated in lockstep with `OperatorKind`.
///
/// Transforms have no config of their own; their logic lives in the UDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperatorConfig {
    Source {
        path: String,
    },
    Sink {
        path: String,
        line_terminator: String,
    },
    Transform,
}

/// One stage of a pipeline, stored in the registry arena and linked to its
/// neighbors by id reference rather than by pointer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    id: Option<OperatorId>,
    kind: OperatorKind,
    udf: Option<UdfRef>,
    config: OperatorConfig,
    predecessor: Option<OperatorId>,
    successor: Option<OperatorId>,
}

impl Operator {
    /// A source reading from `path`. Opens a chain; has no predecessor.
    pub fn source(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if path.is_empty() {
            return Err(PlanError::Validation("source path must not be empty".into()));
        }
        Ok(Self {
            id: None,
            kind: OperatorKind::Source,
            udf: None,
            config: OperatorConfig::Source { path },
            predecessor: None,
            successor: None,
        })
    }

    /// A transform of the given kind, fed by `predecessor`.
    pub fn transform(kind: OperatorKind, udf: UdfRef, predecessor: OperatorId) -> Result<Self> {
        if !kind.is_transform() {
            return Err(PlanError::Validation(format!(
                "{} does not take a UDF-backed transform position",
                kind.as_str()
            )));
        }
        Ok(Self {
            id: None,
            kind,
            udf: Some(udf),
            config: OperatorConfig::Transform,
            predecessor: Some(predecessor),
            successor: None,
        })
    }

    /// A sink writing to `path`, fed by `predecessor`. Terminates a chain.
    pub fn sink(
        path: impl Into<String>,
        line_terminator: impl Into<String>,
        predecessor: OperatorId,
    ) -> Result<Self> {
        let path = path.into();
        if path.is_empty() {
            return Err(PlanError::Validation("sink path must not be empty".into()));
        }
        Ok(Self {
            id: None,
            kind: OperatorKind::Sink,
            udf: None,
            config: OperatorConfig::Sink {
                path,
                line_terminator: line_terminator.into(),
            },
            predecessor: Some(predecessor),
            successor: None,
        })
    }

    pub fn id(&self) -> Option<OperatorId> {
        self.id
    }

    pub fn kind(&self) -> OperatorKind {
        self.kind
    }

    pub fn udf(&self) -> Option<&UdfRef> {
        self.udf.as_ref()
    }

    pub fn config(&self) -> &OperatorConfig {
        &self.config
    }

    pub fn predecessor(&self) -> Option<OperatorId> {
        self.predecessor
    }

    pub fn successor(&self) -> Option<OperatorId> {
        self.successor
    }

    pub fn is_source(&self) -> bool {
        self.kind.is_source()
    }

    pub fn is_sink(&self) -> bool {
        self.kind.is_sink()
    }

    // Identity assignment happens once, inside `PlanRegistry::register`.
    pub(crate) fn assign_id(&mut self, id: OperatorId) {
        self.id = Some(id);
    }

    // One-time successor wiring; a second attempt means a caller tried to
    // branch an append-only chain.
    pub(crate) fn set_successor(&mut self, to: OperatorId) -> Result<()> {
        if let Some(existing) = self.successor {
            return Err(PlanError::State(format!(
                "operator {} already feeds {existing}; chains cannot branch",
                self.id.map(|id| id.to_string()).unwrap_or_else(|| "?".into()),
            )));
        }
        self.successor = Some(to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_rejects_empty_path() {
        let err = Operator::source("").unwrap_err();
        assert!(matches!(err, PlanError::Validation(_)));
    }

    #[test]
    fn test_transform_rejects_non_transform_kind() {
        let err = Operator::transform(
            OperatorKind::Sink,
            UdfRef::symbolic("noop"),
            OperatorId::new(0),
        )
        .unwrap_err();
        assert!(matches!(err, PlanError::Validation(_)));
    }

    #[test]
    fn test_kind_config_pairing() {
        let src = Operator::source("in.txt").unwrap();
        assert!(matches!(src.config(), OperatorConfig::Source { .. }));
        assert_eq!(src.predecessor(), None);
        assert_eq!(src.udf(), None);

        let sink = Operator::sink("out.txt", "", OperatorId::new(0)).unwrap();
        assert!(matches!(sink.config(), OperatorConfig::Sink { .. }));
        assert_eq!(sink.predecessor(), Some(OperatorId::new(0)));
    }
}
