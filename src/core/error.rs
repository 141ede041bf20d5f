//! Error types and handling for the MCP server.
//!
//! Startup and transport failures end up here. Tool calls never do: the
//! dispatcher turns their errors into error results for the client.

use thiserror::Error;

use super::transport::TransportError;
use crate::domains::prometheus::PrometheusError;
use crate::domains::tools::ToolError;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tools domain (e.g. an inconsistent catalog).
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// The Prometheus client could not be built.
    #[error("Prometheus error: {0}")]
    Prometheus(#[from] PrometheusError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The transport failed to start or stopped with an error.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// I/O errors from file operations or network communication.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal server errors that should not occur under normal operation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
