//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - The catalog of available tools, checked for duplicate names at startup
//! - Dispatch of tool calls by name, shared by every transport
//! - Tool metadata for listing

use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use rmcp::model::{CallToolResult, JsonObject, Tool};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use super::definitions::all_tools;
use super::definitions::common::{error_result, success_result};
use super::{ToolEntry, ToolError};
use crate::domains::prometheus::PrometheusClient;

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - owns the catalog and the shared backend client.
pub struct ToolRegistry {
    client: Arc<PrometheusClient>,
    entries: Vec<ToolEntry>,
}

impl ToolRegistry {
    /// Create the registry over the full catalog.
    pub fn new(client: Arc<PrometheusClient>) -> Result<Self, ToolError> {
        Self::with_entries(client, all_tools())
    }

    /// Create a registry over an explicit set of entries.
    ///
    /// Fails if two entries share a name.
    pub fn with_entries(
        client: Arc<PrometheusClient>,
        entries: Vec<ToolEntry>,
    ) -> Result<Self, ToolError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.name().to_string()) {
                return Err(ToolError::internal(format!(
                    "duplicate tool name in catalog: {}",
                    entry.name()
                )));
            }
        }
        info!("Registered {} tools", entries.len());
        Ok(Self { client, entries })
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&str> {
        self.entries.iter().map(ToolEntry::name).collect()
    }

    /// Catalog entries in listing order.
    pub fn entries(&self) -> &[ToolEntry] {
        &self.entries
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// Both HTTP and STDIO/TCP transports list tools from here.
    pub fn get_all_tools(&self) -> Vec<Tool> {
        self.entries.iter().map(|e| e.tool.clone()).collect()
    }

    fn find(&self, name: &str) -> Option<&ToolEntry> {
        self.entries.iter().find(|e| e.name() == name)
    }

    /// Dispatch a tool call by name.
    ///
    /// Never fails: unknown tools, bad arguments, backend errors and handler
    /// panics all come back as an error result naming the tool.
    #[instrument(skip(self, arguments))]
    pub async fn call_tool(&self, name: &str, arguments: Value) -> CallToolResult {
        let Some(entry) = self.find(name) else {
            warn!("Unknown tool requested: {}", name);
            return error_result(name, &ToolError::not_found(name).to_string());
        };

        let arguments: JsonObject = match arguments {
            Value::Null => JsonObject::new(),
            Value::Object(map) => map,
            other => {
                let err = ToolError::invalid_arguments(format!(
                    "expected an object, got {}",
                    json_kind(&other)
                ));
                return error_result(name, &err.to_string());
            }
        };

        info!("Calling tool {}", name);
        let outcome = AssertUnwindSafe((entry.handler)(self.client.clone(), arguments))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(payload)) => success_result(&payload),
            Ok(Err(e)) => error_result(name, &e.to_string()),
            Err(_) => {
                error!("Tool {} panicked", name);
                error_result(name, &ToolError::internal("tool handler panicked").to_string())
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
