//! Prometheus backend domain.
//!
//! - `client.rs` - HTTP client, one method per `/api/v1` endpoint
//! - `types.rs` - response envelope and passthrough data shapes
//! - `time.rs` - relative time expressions and step selection
//! - `error.rs` - backend error taxonomy

mod client;
mod error;
pub mod time;
pub mod types;

pub use client::{ConnectionCheck, ProbeKind, PrometheusClient};
pub use error::PrometheusError;
pub use time::InvalidTimeExpression;
