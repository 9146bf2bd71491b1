//! Opaque UDF references and the symbolic-name catalog.
//!
//! Native closures cannot cross the wire. A transform's logic is captured
//! either as a name the engine resolves against its operator-logic catalog,
//! or as an engine-interpretable bytecode payload. The builder stores these
//! references untouched; encoding happens in `quantaflow-message`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Caller-supplied transformation logic, held as an opaque reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "repr", rename_all = "snake_case")]
pub enum UdfRef {
    /// A name the engine resolves in its operator-logic catalog.
    Symbolic { name: String },
    /// Engine-interpretable intermediate representation, opaque here.
    Bytecode { payload: Vec<u8> },
}

impl UdfRef {
    pub fn symbolic(name: impl Into<String>) -> Self {
        Self::Symbolic { name: name.into() }
    }

    pub fn bytecode(payload: Vec<u8>) -> Self {
        Self::Bytecode { payload }
    }

    /// Short description for logs and error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Symbolic { name } => format!("symbolic:{name}"),
            Self::Bytecode { payload } => format!("bytecode:{} bytes", payload.len()),
        }
    }
}

/// Symbolic names the engine is known to resolve.
///
/// BTreeSet keeps iteration order stable for logs and snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UdfCatalog {
    names: BTreeSet<String>,
}

impl UdfCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_membership() {
        let mut catalog = UdfCatalog::new();
        catalog.register("lowercase");
        catalog.register("odd_only");

        assert!(catalog.contains("lowercase"));
        assert!(!catalog.contains("uppercase"));
        assert_eq!(catalog.names().collect::<Vec<_>>(), ["lowercase", "odd_only"]);
    }

    #[test]
    fn test_describe_is_compact() {
        assert_eq!(UdfRef::symbolic("trim").describe(), "symbolic:trim");
        assert_eq!(UdfRef::bytecode(vec![1, 2, 3]).describe(), "bytecode:3 bytes");
    }
}
