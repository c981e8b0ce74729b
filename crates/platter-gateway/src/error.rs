//! Error types for the Gateway

use platter_core::CatalogError;
use thiserror::Error;

/// Gateway error type
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Catalog rejected: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session limit reached ({0} sessions)")]
    SessionLimit(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for GatewayError {
    fn from(e: toml::de::Error) -> Self {
        GatewayError::InvalidConfig(e.to_string())
    }
}

impl From<toml::ser::Error> for GatewayError {
    fn from(e: toml::ser::Error) -> Self {
        GatewayError::Serialization(e.to_string())
    }
}

/// Result type for Gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
