//! External collaborator seams: execution engine and local console.
//!
//! This crate only produces `PlanMessage`s. Submitting one for execution and
//! rendering a sink's output locally belong to other components; the traits
//! here are the full extent of what the plan core knows about them.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use quantaflow_core::error::Result;
use quantaflow_core::id::OperatorId;

use crate::message::PlanMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Accepted,
    Running,
    Completed,
    Failed,
}

/// What an engine hands back for one submitted plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    pub id: JobId,
    pub status: JobStatus,
}

impl JobHandle {
    pub fn accepted() -> Self {
        Self {
            id: JobId::random(),
            status: JobStatus::Accepted,
        }
    }
}

/// Accepts one complete plan message and returns an execution handle.
pub trait ExecutionEngine {
    fn submit(&self, message: &PlanMessage) -> Result<JobHandle>;
}

/// Streams the output of one sink locally instead of submitting the plan.
pub trait ConsoleRenderer {
    fn render(&self, message: &PlanMessage, sink: OperatorId) -> Result<()>;
}
