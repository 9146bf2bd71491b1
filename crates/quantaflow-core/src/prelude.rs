//! Convenient re-exports for downstream crates.

pub use crate::config::ClientConfig;
pub use crate::error::{PlanError, Result};
pub use crate::hash::Hash256;
pub use crate::id::OperatorId;
pub use crate::operator::{Operator, OperatorConfig, OperatorKind};
pub use crate::registry::PlanRegistry;
pub use crate::udf::{UdfCatalog, UdfRef};
