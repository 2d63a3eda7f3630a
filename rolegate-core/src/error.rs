//! Error types for rolegate-core.
//!
//! Resolution itself never fails: unknown roles and cyclic declarations
//! degrade to best-effort closures. Only the edges that touch the outside
//! world (reading, parsing and writing configuration) are fallible.

use thiserror::Error;

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading or saving an [`AccessConfig`](crate::config::AccessConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("Config file error for '{path}': {source}")]
    Io {
        /// Path that was being accessed.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid JSON or has the wrong shape.
    #[error("Failed to parse config: {0}")]
    Parse(#[source] serde_json::Error),

    /// The configuration could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn io(path: &str, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            source,
        }
    }
}
