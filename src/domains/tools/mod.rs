//! Tools domain module.
//!
//! Tools are the operations MCP clients call. Every tool reads from the
//! Prometheus HTTP API through a shared [`PrometheusClient`](crate::domains::prometheus::PrometheusClient).
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `handlers.rs` - The [`PrometheusTool`] trait and type-erased [`ToolEntry`]
//! - `registry.rs` - Catalog and dispatch, shared by every transport
//! - `router.rs` - rmcp ToolRouter built from the registry for STDIO/TCP
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in the matching `definitions/` group
//! 2. Implement [`PrometheusTool`] for a unit struct
//! 3. Add `ToolEntry::of::<MyTool>()` to the group's `entries()`
//!
//! The registry and router pick it up from there.

pub mod definitions;
mod error;
mod handlers;
mod registry;
pub mod router;

pub use error::ToolError;
pub use handlers::*;
pub use registry::ToolRegistry;
pub use router::build_tool_router;
