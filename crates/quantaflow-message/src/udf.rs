//! UDF encoding: turning builder-side references into wire payloads.
//!
//! The provider interface is deliberately narrow: given an opaque `UdfRef`,
//! either produce something the engine can consume or refuse with
//! `UnserializableUdf`. A refusal aborts the whole serialize call; there is
//! no best-effort partial plan.

use quantaflow_core::config::ClientConfig;
use quantaflow_core::error::{PlanError, Result};
use quantaflow_core::udf::{UdfCatalog, UdfRef};

use crate::message::EncodedUdf;

/// Collaborator interface consumed by the serializer.
pub trait UdfEncoder {
    fn encode(&self, udf: &UdfRef) -> Result<EncodedUdf>;
}

/// Permissive encoder: any non-empty symbolic name passes through; bytecode
/// must fit the payload cap.
#[derive(Debug, Clone)]
pub struct SymbolicUdfEncoder {
    max_payload_bytes: usize,
}

impl SymbolicUdfEncoder {
    pub fn new(max_payload_bytes: usize) -> Self {
        Self { max_payload_bytes }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.max_udf_payload_bytes)
    }
}

impl Default for SymbolicUdfEncoder {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

impl UdfEncoder for SymbolicUdfEncoder {
    fn encode(&self, udf: &UdfRef) -> Result<EncodedUdf> {
        match udf {
            UdfRef::Symbolic { name } => {
                if name.is_empty() {
                    return Err(PlanError::UnserializableUdf(
                        "symbolic UDF name is empty".into(),
                    ));
                }
                Ok(EncodedUdf::Symbolic { name: name.clone() })
            }
            UdfRef::Bytecode { payload } => {
                if payload.is_empty() {
                    return Err(PlanError::UnserializableUdf(
                        "bytecode UDF payload is empty".into(),
                    ));
                }
                if payload.len() > self.max_payload_bytes {
                    return Err(PlanError::UnserializableUdf(format!(
                        "bytecode payload of {} bytes exceeds the {}-byte cap",
                        payload.len(),
                        self.max_payload_bytes
                    )));
                }
                Ok(EncodedUdf::Bytecode {
                    payload: payload.clone(),
                })
            }
        }
    }
}

/// Strict encoder: symbolic names must exist in the engine's UDF catalog.
/// Bytecode is delegated to the permissive size checks.
#[derive(Debug, Clone)]
pub struct CatalogUdfEncoder {
    catalog: UdfCatalog,
    inner: SymbolicUdfEncoder,
}

impl CatalogUdfEncoder {
    pub fn new(catalog: UdfCatalog, max_payload_bytes: usize) -> Self {
        Self {
            catalog,
            inner: SymbolicUdfEncoder::new(max_payload_bytes),
        }
    }

    pub fn catalog(&self) -> &UdfCatalog {
        &self.catalog
    }
}

impl UdfEncoder for CatalogUdfEncoder {
    fn encode(&self, udf: &UdfRef) -> Result<EncodedUdf> {
        if let UdfRef::Symbolic { name } = udf {
            if !self.catalog.contains(name) {
                return Err(PlanError::UnserializableUdf(format!(
                    "'{name}' is not in the engine UDF catalog"
                )));
            }
        }
        self.inner.encode(udf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbolic_passthrough() {
        let encoder = SymbolicUdfEncoder::default();
        let encoded = encoder.encode(&UdfRef::symbolic("lowercase")).unwrap();
        assert_eq!(
            encoded,
            EncodedUdf::Symbolic {
                name: "lowercase".into()
            }
        );
    }

    #[test]
    fn test_empty_symbolic_name_refused() {
        let encoder = SymbolicUdfEncoder::default();
        let err = encoder.encode(&UdfRef::symbolic("")).unwrap_err();
        assert!(matches!(err, PlanError::UnserializableUdf(_)));
    }

    #[test]
    fn test_bytecode_cap() {
        let encoder = SymbolicUdfEncoder::new(8);
        assert!(encoder.encode(&UdfRef::bytecode(vec![0u8; 8])).is_ok());
        let err = encoder.encode(&UdfRef::bytecode(vec![0u8; 9])).unwrap_err();
        assert!(matches!(err, PlanError::UnserializableUdf(_)));
    }

    #[test]
    fn test_catalog_rejects_unknown_names() {
        let mut catalog = UdfCatalog::new();
        catalog.register("odd_only");
        let encoder = CatalogUdfEncoder::new(catalog, 1024);

        assert!(encoder.encode(&UdfRef::symbolic("odd_only")).is_ok());
        let err = encoder.encode(&UdfRef::symbolic("even_only")).unwrap_err();
        assert!(matches!(err, PlanError::UnserializableUdf(_)));
    }
}
