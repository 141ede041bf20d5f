//! Host metrics from a Prometheus windows_exporter.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use super::exporter_queries::{WindowsCategory, run_sub_queries};
use super::node_exporter::DEFAULT_WINDOW;
use crate::domains::prometheus::PrometheusClient;
use crate::domains::prometheus::time::parse_duration;
use crate::domains::tools::definitions::common::require_non_empty;
use crate::domains::tools::{PrometheusTool, ToolError};

/// Parameters for the windows_exporter helper.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WindowsExporterParams {
    #[schemars(description = "Instance label of the windows_exporter target, e.g. winhost:9182")]
    pub instance: String,

    #[schemars(description = "Metric category: cpu, memory, disk, network, services or all (default: all)")]
    #[serde(default)]
    pub category: WindowsCategory,

    #[schemars(description = "Averaging window for rates, e.g. 5m, 15m, 1h (default: 5m)")]
    #[serde(default)]
    pub time_range: Option<String>,
}

/// Runs the canned windows_exporter queries for one instance.
pub struct WindowsExporterTool;

#[async_trait::async_trait]
impl PrometheusTool for WindowsExporterTool {
    const NAME: &'static str = "query_windows_exporter";

    const DESCRIPTION: &'static str = "Query common Windows host metrics from windows_exporter for one instance. Runs a fixed set of PromQL queries for the chosen category (cpu, memory, disk, network, services or all); a failing sub-query is reported inline without failing the others.";

    type Params = WindowsExporterParams;

    fn validate(params: &Self::Params) -> Result<(), String> {
        require_non_empty("instance", &params.instance)
    }

    async fn run(client: &PrometheusClient, params: Self::Params) -> Result<Value, ToolError> {
        let window = params.time_range.as_deref().unwrap_or(DEFAULT_WINDOW);
        parse_duration(window)?;

        let queries = params.category.queries();
        info!(
            "windows_exporter {:?} on {}: {} sub-queries",
            params.category,
            params.instance,
            queries.len()
        );
        let results = run_sub_queries(client, &queries, &params.instance, window).await;

        Ok(json!({
            "exporter": "windows_exporter",
            "instance": params.instance,
            "category": params.category,
            "timeRange": window,
            "results": results,
        }))
    }
}
