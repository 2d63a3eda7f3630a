//! Error types for rolegate guards

use rolegate_core::ConfigError;
use thiserror::Error;

/// Errors that can occur while resolving a subject or building a gatekeeper
#[derive(Error, Debug)]
pub enum GuardError {
    #[error("Identity unavailable: {0}")]
    IdentityUnavailable(String),

    #[error("Invalid session claims: {0}")]
    InvalidClaims(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Access configuration error: {0}")]
    AccessConfig(#[from] ConfigError),
}

/// Result type for guard operations
pub type GuardResult<T> = std::result::Result<T, GuardError>;
