//! Prometheus MCP Server
//!
//! A Model Context Protocol (MCP) server that exposes the read-only
//! Prometheus HTTP API as tools: instant and range PromQL queries, metric and
//! label discovery, scrape targets, alerts and rules, and server status.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server handler and transports
//! - **domains**:
//!   - **prometheus**: typed HTTP client for the Prometheus API
//!   - **tools**: the MCP tools built on top of that client
//!
//! # Example
//!
//! ```rust,no_run
//! use prometheus_mcp_server::{Config, McpServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = McpServer::new(config)?;
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
