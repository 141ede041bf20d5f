//! Errors raised while talking to the Prometheus HTTP API.

use thiserror::Error;

/// Errors that can occur during a Prometheus API call.
#[derive(Debug, Error)]
pub enum PrometheusError {
    /// The request never produced a response (connection refused, DNS, timeout).
    #[error("Cannot reach Prometheus at {base_url}: {message}")]
    Unreachable { base_url: String, message: String },

    /// Prometheus answered with `status: "error"`.
    #[error("Prometheus query error ({error_type}): {message}")]
    Query { error_type: String, message: String },

    /// Non-2xx response without a parseable error envelope.
    #[error("Prometheus returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The response body could not be interpreted.
    #[error("Invalid response from Prometheus: {0}")]
    InvalidResponse(String),

    /// The client could not be built from the given connection settings.
    #[error("Invalid Prometheus client configuration: {0}")]
    InvalidConfig(String),
}

impl PrometheusError {
    /// Create an "unreachable" error for the given base URL.
    pub fn unreachable(base_url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unreachable {
            base_url: base_url.into(),
            message: message.into(),
        }
    }

    /// Create a query error from an error envelope.
    pub fn query(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Query {
            error_type: error_type.into(),
            message: message.into(),
        }
    }

    /// Create an "invalid response" error.
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Whether the failure happened before any response was received.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }
}
