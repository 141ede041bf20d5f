//! Metric metadata: one metric in detail, or a type overview.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::domains::prometheus::PrometheusClient;
use crate::domains::tools::definitions::common::{cap, non_empty, require_in_range};
use crate::domains::tools::{PrometheusTool, ToolError};

const DEFAULT_SAMPLE: usize = 50;

fn default_limit() -> usize {
    DEFAULT_SAMPLE
}

/// Parameters for the metadata tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MetricMetadataParams {
    #[schemars(description = "Exact metric name. When omitted, returns a summary of all metric types")]
    #[serde(default)]
    pub metric: Option<String>,

    #[schemars(description = "Number of metrics to include in the summary sample (default: 50)")]
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Fetches type, help and unit metadata.
pub struct MetricMetadataTool;

#[async_trait::async_trait]
impl PrometheusTool for MetricMetadataTool {
    const NAME: &'static str = "get_metric_metadata";

    const DESCRIPTION: &'static str = "Get metadata (type, help text, unit) for a metric. Without a metric name, returns the count of metrics per type (counter, gauge, histogram, summary...) and a sample of metrics with their metadata.";

    type Params = MetricMetadataParams;

    fn validate(params: &Self::Params) -> Result<(), String> {
        require_in_range("limit", params.limit, 1, 1000)
    }

    async fn run(client: &PrometheusClient, params: Self::Params) -> Result<Value, ToolError> {
        if let Some(metric) = non_empty(params.metric) {
            let metadata = client.metadata(Some(&metric)).await?;
            return Ok(match metadata.get(&metric) {
                Some(entries) => json!({
                    "found": true,
                    "metric": metric,
                    "metadata": entries,
                }),
                None => json!({
                    "found": false,
                    "metric": metric,
                    "message": format!("No metadata found for metric '{metric}'"),
                }),
            });
        }

        let metadata = client.metadata(None).await?;
        let mut distribution: BTreeMap<&str, usize> = BTreeMap::new();
        for entries in metadata.values() {
            if let Some(first) = entries.first() {
                let kind = if first.metric_type.is_empty() {
                    "unknown"
                } else {
                    first.metric_type.as_str()
                };
                *distribution.entry(kind).or_default() += 1;
            }
        }

        let (sample, truncated) = cap(metadata.iter().collect::<Vec<_>>(), params.limit);
        let sample: Vec<Value> = sample
            .into_iter()
            .map(|(name, entries)| json!({ "metric": name, "metadata": entries }))
            .collect();

        info!("Metadata summary over {} metrics", metadata.len());

        Ok(json!({
            "totalMetrics": metadata.len(),
            "typeDistribution": distribution,
            "truncated": truncated,
            "sample": sample,
        }))
    }
}
