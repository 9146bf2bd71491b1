//! Minimal YAML → plan DSL for *linear* pipelines.
//!
//! Example:
//! ```yaml
//! pipeline:
//!   - op: source
//!     path: "data/words.txt"
//!   - op: sort
//!     udf: lowercase
//!   - op: filter
//!     udf: odd_only
//!   - op: sink
//!     path: "out/result.txt"
//!     line_terminator: ""
//! ```
//!
//! Steps are replayed through the fluent builder, so every rule the builder
//! enforces (source first, no branching, sink last) applies here too.

use serde::{Deserialize, Serialize};

use quantaflow_core::error::{PlanError, Result};
use quantaflow_core::udf::UdfRef;

use crate::{DataQuanta, DataQuantaBuilder, SinkOptions};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDoc {
    pub pipeline: Vec<Step>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Step {
    Source {
        path: String,
    },
    Map {
        udf: String,
    },
    Filter {
        udf: String,
    },
    Sort {
        udf: String,
    },
    Sink {
        path: String,
        #[serde(default)]
        line_terminator: Option<String>,
    },
}

impl Step {
    fn op_name(&self) -> &'static str {
        match self {
            Self::Source { .. } => "source",
            Self::Map { .. } => "map",
            Self::Filter { .. } => "filter",
            Self::Sort { .. } => "sort",
            Self::Sink { .. } => "sink",
        }
    }
}

/// Parse a YAML pipeline and replay it through `builder`.
///
/// Linear chains only: the first step must be a source, and the last step
/// must be a sink.
pub fn parse_yaml_pipeline(yaml_src: &str, builder: &DataQuantaBuilder) -> Result<DataQuanta> {
    let doc: PipelineDoc = serde_yaml::from_str(yaml_src)
        .map_err(|e| PlanError::Validation(format!("pipeline YAML: {e}")))?;

    let mut tail: Option<DataQuanta> = None;
    for step in doc.pipeline {
        tail = Some(match (step, tail) {
            (Step::Source { path }, None) => builder.source(&path)?,
            (Step::Source { .. }, Some(_)) => {
                return Err(PlanError::Validation(
                    "a source can only open a pipeline, not continue one".into(),
                ));
            }
            (Step::Map { udf }, Some(t)) => t.map(UdfRef::symbolic(udf))?,
            (Step::Filter { udf }, Some(t)) => t.filter(UdfRef::symbolic(udf))?,
            (Step::Sort { udf }, Some(t)) => t.sort(UdfRef::symbolic(udf))?,
            (
                Step::Sink {
                    path,
                    line_terminator,
                },
                Some(t),
            ) => {
                let options = match line_terminator {
                    Some(lt) => SinkOptions::with_terminator(lt),
                    None => SinkOptions::default(),
                };
                t.sink(&path, options)?
            }
            (step, None) => {
                return Err(PlanError::Validation(format!(
                    "first pipeline step must be a source, got {}",
                    step.op_name()
                )));
            }
        });
    }

    match tail {
        Some(t) if t.is_terminal() => Ok(t),
        Some(_) => Err(PlanError::Validation(
            "pipeline does not end with a sink".into(),
        )),
        None => Err(PlanError::Validation("pipeline has no steps".into())),
    }
}
