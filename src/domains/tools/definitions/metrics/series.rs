//! Series search by selector.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::domains::prometheus::PrometheusClient;
use crate::domains::tools::definitions::common::{cap, require_non_empty};
use crate::domains::tools::{PrometheusTool, ToolError};

const MAX_SERIES: usize = 100;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FindSeriesParams {
    /// Series selector passed as `match[]`.
    #[serde(rename = "match")]
    #[schemars(description = "Series selector, e.g. up{job=\"node\"} or {__name__=~\"http_.*\"}")]
    pub selector: String,

    #[schemars(description = "Start of the search window as RFC3339 or Unix timestamp")]
    #[serde(default)]
    pub start: Option<String>,

    #[schemars(description = "End of the search window as RFC3339 or Unix timestamp")]
    #[serde(default)]
    pub end: Option<String>,
}

/// Finds series matching a selector.
pub struct FindSeriesTool;

#[async_trait::async_trait]
impl PrometheusTool for FindSeriesTool {
    const NAME: &'static str = "find_series";

    const DESCRIPTION: &'static str = "Find time series matching a selector and return their label sets, optionally within a start/end window. At most 100 series are returned.";

    type Params = FindSeriesParams;

    fn validate(params: &Self::Params) -> Result<(), String> {
        require_non_empty("match", &params.selector)
    }

    async fn run(client: &PrometheusClient, params: Self::Params) -> Result<Value, ToolError> {
        let series = client
            .series(&params.selector, params.start.as_deref(), params.end.as_deref())
            .await?;
        let total = series.len();
        let (series, truncated) = cap(series, MAX_SERIES);

        info!("Selector {} matched {} series", params.selector, total);

        Ok(json!({
            "match": params.selector,
            "total": total,
            "truncated": truncated,
            "series": series,
        }))
    }
}
