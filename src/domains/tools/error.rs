//! Tool-specific error types.

use thiserror::Error;

use crate::domains::prometheus::{InvalidTimeExpression, PrometheusError};

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Unknown tool: {0}")]
    NotFound(String),

    /// The arguments did not satisfy the tool's input schema.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// None of a set of alternative filters was supplied.
    #[error("Missing filter: {0}")]
    MissingFilter(String),

    /// A relative time expression could not be parsed.
    #[error(transparent)]
    InvalidTimeExpression(#[from] InvalidTimeExpression),

    /// The Prometheus call failed.
    #[error(transparent)]
    Backend(#[from] PrometheusError),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "missing filter" error.
    pub fn missing_filter(msg: impl Into<String>) -> Self {
        Self::MissingFilter(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("failed to serialize result: {err}"))
    }
}
