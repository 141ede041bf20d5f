//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol. It only serves tools; every tool reads from Prometheus through
//! one shared client.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool
//! and collected by the [`ToolRegistry`]. The rmcp ToolRouter used by
//! STDIO/TCP is built from that registry, and the HTTP transport calls the
//! registry directly, so both paths list and dispatch the same catalog.

use std::sync::Arc;

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use serde_json::{Value, json};

use super::config::Config;
use crate::domains::prometheus::PrometheusClient;
use crate::domains::tools::{ToolRegistry, build_tool_router};

const INSTRUCTIONS: &str = "Read-only access to a Prometheus server. \
Start with test_connection, then explore with list_targets, list_metrics, get_label_values and find_series. \
Run PromQL with query_instant and query_range (relative ranges such as 30m, 6h, 7d are accepted). \
query_node_exporter, query_windows_exporter and query_blackbox_probes run canned host and probe queries. \
list_alerts, list_alert_rules, list_recording_rules and get_alert_history cover alerting; \
get_server_info and get_tsdb_status describe the server itself.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Tool catalog and dispatcher.
    registry: Arc<ToolRegistry>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// Builds the Prometheus client and the tool catalog; fails on an invalid
    /// connection setting or an inconsistent catalog.
    pub fn new(config: Config) -> super::error::Result<Self> {
        let config = Arc::new(config);
        let client = Arc::new(PrometheusClient::new(&config.prometheus)?);
        let registry = Arc::new(ToolRegistry::new(client)?);

        Ok(Self {
            tool_router: build_tool_router::<Self>(registry.clone()),
            registry,
            config,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<Value> {
        self.registry
            .get_all_tools()
            .into_iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// Returns the serialized `CallToolResult` (`content` plus `isError`).
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Value {
        let result = self.registry.call_tool(name, arguments).await;
        serde_json::to_value(&result).unwrap_or_else(|e| {
            json!({
                "content": [{"type": "text", "text": format!("failed to serialize result: {e}")}],
                "isError": true
            })
        })
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PrometheusConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn server_for(url: &str) -> McpServer {
        let config = Config {
            prometheus: PrometheusConfig::new(url).unwrap(),
            ..Config::default()
        };
        McpServer::new(config).unwrap()
    }

    #[test]
    fn test_info_advertises_tools_only() {
        let server = server_for("http://localhost:9090");
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.capabilities.prompts.is_none());
        assert_eq!(info.server_info.name, "prometheus-mcp-server");
    }

    #[test]
    fn test_list_tools() {
        let server = server_for("http://localhost:9090");
        let tools = server.list_tools();
        assert_eq!(tools.len(), 18);
        assert!(tools.iter().all(|t| t["inputSchema"].is_object()));
    }

    #[tokio::test]
    async fn test_call_tool_serializes_result() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/status/buildinfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {"version": "2.51.0"}
            })))
            .mount(&backend)
            .await;

        let server = server_for(&backend.uri());
        let result = server.call_tool("test_connection", json!({})).await;
        assert_eq!(result["isError"], false);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("2.51.0"));

        let unknown = server.call_tool("nope", Value::Null).await;
        assert_eq!(unknown["isError"], true);
    }
}
