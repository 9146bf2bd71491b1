//! Client-session configuration shared by the builder, encoders, and CLI.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Default line terminator for sinks that do not set one explicitly.
    pub line_terminator: String,

    /// Engine endpoint a transport implementation would submit plans to.
    /// The core itself never opens a connection.
    pub engine_endpoint: Option<String>,

    /// Upper bound for bytecode UDF payloads accepted by the encoders.
    pub max_udf_payload_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            line_terminator: "\n".to_string(),
            engine_endpoint: None,
            max_udf_payload_bytes: 64 * 1024, // 64 KiB default
        }
    }
}

impl ClientConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `QUANTAFLOW_LINE_TERMINATOR`: default sink line terminator
    /// - `QUANTAFLOW_ENGINE_ENDPOINT`: engine submission endpoint
    /// - `QUANTAFLOW_MAX_UDF_PAYLOAD_BYTES`: bytecode payload cap
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("QUANTAFLOW_LINE_TERMINATOR") {
            cfg.line_terminator = s;
        }

        if let Ok(s) = std::env::var("QUANTAFLOW_ENGINE_ENDPOINT") {
            cfg.engine_endpoint = Some(s);
        }

        if let Ok(s) = std::env::var("QUANTAFLOW_MAX_UDF_PAYLOAD_BYTES") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.max_udf_payload_bytes = v;
            }
        }

        cfg
    }
}
