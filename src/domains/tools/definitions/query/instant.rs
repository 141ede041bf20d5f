//! Instant PromQL query tool.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::domains::prometheus::PrometheusClient;
use crate::domains::tools::definitions::common::require_non_empty;
use crate::domains::tools::{PrometheusTool, ToolError};

/// Parameters for an instant query.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueryInstantParams {
    /// PromQL expression.
    #[schemars(description = "PromQL expression to evaluate")]
    pub query: String,

    /// Evaluation instant; defaults to the server's current time.
    #[schemars(description = "Evaluation time as RFC3339 or Unix timestamp (default: now)")]
    #[serde(default)]
    pub time: Option<String>,
}

/// Evaluates a PromQL expression at a single instant.
pub struct QueryInstantTool;

#[async_trait::async_trait]
impl PrometheusTool for QueryInstantTool {
    const NAME: &'static str = "query_instant";

    const DESCRIPTION: &'static str = "Execute an instant PromQL query and return the result at a single point in time. Optionally evaluate at a specific time (RFC3339 or Unix timestamp).";

    type Params = QueryInstantParams;

    fn validate(params: &Self::Params) -> Result<(), String> {
        require_non_empty("query", &params.query)
    }

    async fn run(client: &PrometheusClient, params: Self::Params) -> Result<Value, ToolError> {
        info!("Instant query: {}", params.query);
        let data = client.query(&params.query, params.time.as_deref()).await?;

        Ok(json!({
            "query": params.query,
            "time": params.time,
            "resultType": data.result_type,
            "result": data.result,
        }))
    }
}
