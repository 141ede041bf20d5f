//! List metric names.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::domains::prometheus::PrometheusClient;
use crate::domains::tools::definitions::common::{cap, non_empty, require_in_range};
use crate::domains::tools::{PrometheusTool, ToolError};

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 10_000;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Parameters for the list metrics tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListMetricsParams {
    #[schemars(description = "Case-insensitive substring the metric name must contain, e.g. 'http' or 'node_cpu'")]
    #[serde(default)]
    pub filter: Option<String>,

    #[schemars(description = "Maximum number of names to return (default: 100)")]
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Lists metric names known to Prometheus.
pub struct ListMetricsTool;

#[async_trait::async_trait]
impl PrometheusTool for ListMetricsTool {
    const NAME: &'static str = "list_metrics";

    const DESCRIPTION: &'static str = "List the metric names available in Prometheus, optionally filtered by a case-insensitive substring. Returns at most 'limit' names (default 100) and whether the list was truncated.";

    type Params = ListMetricsParams;

    fn validate(params: &Self::Params) -> Result<(), String> {
        require_in_range("limit", params.limit, 1, MAX_LIMIT)
    }

    async fn run(client: &PrometheusClient, params: Self::Params) -> Result<Value, ToolError> {
        let filter = non_empty(params.filter);
        let names = client.metric_names().await?;

        let matching: Vec<String> = match filter.as_deref().map(str::to_lowercase) {
            Some(needle) => names
                .into_iter()
                .filter(|n| n.to_lowercase().contains(&needle))
                .collect(),
            None => names,
        };
        let total = matching.len();
        let (metrics, truncated) = cap(matching, params.limit);

        info!("Listed {} of {} metric names (filter {:?})", metrics.len(), total, filter);

        Ok(json!({
            "total": total,
            "returned": metrics.len(),
            "truncated": truncated,
            "filter": filter,
            "metrics": metrics,
        }))
    }
}
