//! Domains module containing business logic organized by bounded contexts.
//!
//! - `prometheus`: the HTTP API client and its wire types
//! - `tools`: MCP tools, each a thin layer over the client

pub mod prometheus;
pub mod tools;
