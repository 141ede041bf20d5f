//! TSDB head statistics and cardinality.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::domains::prometheus::PrometheusClient;
use crate::domains::prometheus::time::format_unix_millis;
use crate::domains::prometheus::types::NameValue;
use crate::domains::tools::definitions::common::{cap, format_bytes, require_in_range};
use crate::domains::tools::{PrometheusTool, ToolError};

const DEFAULT_LIMIT: usize = 10;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TsdbStatusParams {
    #[schemars(description = "Entries per top-N list, 1-100 (default: 10)")]
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn top(items: Vec<NameValue>, limit: usize) -> Vec<NameValue> {
    cap(items, limit).0
}

/// Reports TSDB head stats and the top cardinality contributors.
pub struct TsdbStatusTool;

#[async_trait::async_trait]
impl PrometheusTool for TsdbStatusTool {
    const NAME: &'static str = "get_tsdb_status";

    const DESCRIPTION: &'static str = "Get TSDB status: head block statistics (series, label pairs, chunks, time span) and top-N lists of series count by metric name, label value count by label name, memory usage by label name and series count by label pair. Useful for finding high-cardinality metrics.";

    type Params = TsdbStatusParams;

    fn validate(params: &Self::Params) -> Result<(), String> {
        require_in_range("limit", params.limit, 1, 100)
    }

    async fn run(client: &PrometheusClient, params: Self::Params) -> Result<Value, ToolError> {
        let limit = params.limit;
        let status = client.tsdb_status(Some(limit)).await?;
        let head = &status.head_stats;

        info!("TSDB status: {} head series", head.num_series);

        let memory: Vec<Value> = top(status.memory_in_bytes_by_label_name, limit)
            .into_iter()
            .map(|nv| {
                json!({
                    "name": nv.name,
                    "bytes": nv.value,
                    "formatted": format_bytes(nv.value),
                })
            })
            .collect();

        Ok(json!({
            "headStats": {
                "numSeries": head.num_series,
                "numLabelPairs": head.num_label_pairs,
                "chunkCount": head.chunk_count,
                "minTime": format_unix_millis(head.min_time),
                "maxTime": format_unix_millis(head.max_time),
            },
            "limit": limit,
            "seriesCountByMetricName": top(status.series_count_by_metric_name, limit),
            "labelValueCountByLabelName": top(status.label_value_count_by_label_name, limit),
            "memoryInBytesByLabelName": memory,
            "seriesCountByLabelValuePair": top(status.series_count_by_label_value_pair, limit),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::test_support::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer};

    fn name_values(n: usize) -> Value {
        json!((0..n)
            .map(|i| json!({"name": format!("m{i}"), "value": 1000 - i}))
            .collect::<Vec<_>>())
    }

    #[tokio::test]
    async fn test_status_is_capped_and_rendered() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/status/tsdb"))
            .and(query_param("limit", "3"))
            .respond_with(success(json!({
                "headStats": {
                    "numSeries": 508,
                    "numLabelPairs": 1234,
                    "chunkCount": 937,
                    "minTime": 1700000000000_i64,
                    "maxTime": 1700003600000_i64
                },
                "seriesCountByMetricName": name_values(5),
                "labelValueCountByLabelName": name_values(5),
                "memoryInBytesByLabelName": [
                    {"name": "__name__", "value": 1536},
                    {"name": "instance", "value": 0}
                ],
                "seriesCountByLabelValuePair": name_values(2)
            })))
            .expect(1)
            .mount(&server)
            .await;

        let body = call_ok(&server, TsdbStatusTool::NAME, json!({"limit": 3})).await;
        assert_eq!(body["headStats"]["numSeries"], 508);
        assert_eq!(body["headStats"]["minTime"], "2023-11-14T22:13:20.000Z");
        assert_eq!(body["headStats"]["maxTime"], "2023-11-14T23:13:20.000Z");
        assert_eq!(body["seriesCountByMetricName"].as_array().unwrap().len(), 3);
        assert_eq!(body["seriesCountByLabelValuePair"].as_array().unwrap().len(), 2);
        assert_eq!(body["memoryInBytesByLabelName"][0]["formatted"], "1.5 KB");
        assert_eq!(body["memoryInBytesByLabelName"][1]["formatted"], "0 Bytes");
    }

    #[tokio::test]
    async fn test_limit_out_of_range() {
        let server = MockServer::start().await;
        let body = call_err(&server, TsdbStatusTool::NAME, json!({"limit": 500})).await;
        assert!(body["error"].as_str().unwrap().contains("between 1 and 100"));
    }
}
