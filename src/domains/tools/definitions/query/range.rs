//! Range PromQL query tool.

use chrono::Utc;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::domains::prometheus::PrometheusClient;
use crate::domains::prometheus::time::{
    format_instant, lookback_start, parse_duration, step_for_lookback,
};
use crate::domains::prometheus::types::TimeRange;
use crate::domains::tools::definitions::common::require_non_empty;
use crate::domains::tools::{PrometheusTool, ToolError};

const DEFAULT_LOOKBACK: &str = "1h";
const DEFAULT_STEP: &str = "1m";

/// Parameters for a range query.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryRangeParams {
    /// PromQL expression.
    #[schemars(description = "PromQL expression to evaluate")]
    pub query: String,

    /// Absolute start instant.
    #[schemars(description = "Start time as RFC3339 or Unix timestamp. Mutually exclusive with timeRange")]
    #[serde(default)]
    pub start: Option<String>,

    /// Relative lookback from now, e.g. `30m`, `6h`, `2d`.
    #[schemars(description = "Relative lookback such as 30m, 6h, 2d (default: 1h when start is not given)")]
    #[serde(default)]
    pub time_range: Option<String>,

    /// End instant; defaults to now.
    #[schemars(description = "End time as RFC3339 or Unix timestamp (default: now)")]
    #[serde(default)]
    pub end: Option<String>,

    /// Resolution step.
    #[schemars(description = "Query resolution step, e.g. 15s, 1m, 5m (default: 1m for an absolute start, otherwise 1m/5m/15m as the lookback grows past 1d and 1w)")]
    #[serde(default)]
    pub step: Option<String>,
}

/// Evaluates a PromQL expression over a time range.
pub struct QueryRangeTool;

#[async_trait::async_trait]
impl PrometheusTool for QueryRangeTool {
    const NAME: &'static str = "query_range";

    const DESCRIPTION: &'static str = "Execute a PromQL range query over a time window. Give either an absolute 'start' or a relative 'timeRange' (e.g. 30m, 6h, 2d; default 1h). 'end' defaults to now. Without 'step', relative windows coarsen it (1m up to 1d, 5m up to 1w, 15m beyond); an absolute start uses 1m.";

    type Params = QueryRangeParams;

    fn validate(params: &Self::Params) -> Result<(), String> {
        require_non_empty("query", &params.query)?;
        if params.start.is_some() && params.time_range.is_some() {
            return Err("provide either 'start' or 'timeRange', not both".to_string());
        }
        Ok(())
    }

    async fn run(client: &PrometheusClient, params: Self::Params) -> Result<Value, ToolError> {
        let now = Utc::now();
        let (start, default_step) = match params.start {
            Some(start) => (start, DEFAULT_STEP),
            None => {
                let expr = params.time_range.as_deref().unwrap_or(DEFAULT_LOOKBACK);
                let step = step_for_lookback(parse_duration(expr)?);
                (format_instant(lookback_start(now, expr)?), step)
            }
        };
        let range = TimeRange {
            start,
            end: params.end.unwrap_or_else(|| format_instant(now)),
            step: params.step.unwrap_or_else(|| default_step.to_string()),
        };

        info!(
            "Range query: {} [{} .. {} step {}]",
            params.query, range.start, range.end, range.step
        );
        let data = client.query_range(&params.query, &range).await?;

        Ok(json!({
            "query": params.query,
            "start": range.start,
            "end": range.end,
            "step": range.step,
            "resultType": data.result_type,
            "result": data.result,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::test_support::*;
    use chrono::DateTime;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer};

    fn matrix() -> wiremock::ResponseTemplate {
        success(json!({"resultType": "matrix", "result": []}))
    }

    #[tokio::test]
    async fn test_relative_range_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/query_range"))
            .and(query_param("step", "1m"))
            .respond_with(matrix())
            .expect(1)
            .mount(&server)
            .await;

        let body = call_ok(
            &server,
            QueryRangeTool::NAME,
            json!({"query": "rate(http_requests_total[5m])", "timeRange": "30m"}),
        )
        .await;

        let start = DateTime::parse_from_rfc3339(body["start"].as_str().unwrap()).unwrap();
        let end = DateTime::parse_from_rfc3339(body["end"].as_str().unwrap()).unwrap();
        assert_eq!((end - start).num_milliseconds(), 1_800_000);
        assert_eq!(body["resultType"], "matrix");
    }

    #[tokio::test]
    async fn test_long_relative_range_coarsens_step() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/query_range"))
            .respond_with(matrix())
            .mount(&server)
            .await;

        for (window, step) in [("30d", "15m"), ("3d", "5m"), ("1d", "1m")] {
            let body = call_ok(
                &server,
                QueryRangeTool::NAME,
                json!({"query": "up", "timeRange": window}),
            )
            .await;
            assert_eq!(body["step"], step, "step for {window}");
        }

        let steps: Vec<String> = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter_map(|r| {
                r.url
                    .query_pairs()
                    .find(|(k, _)| k == "step")
                    .map(|(_, v)| v.into_owned())
            })
            .collect();
        assert_eq!(steps, ["15m", "5m", "1m"]);
    }

    #[tokio::test]
    async fn test_explicit_step_wins_over_lookback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/query_range"))
            .and(query_param("step", "1h"))
            .respond_with(matrix())
            .expect(1)
            .mount(&server)
            .await;

        call_ok(
            &server,
            QueryRangeTool::NAME,
            json!({"query": "up", "timeRange": "30d", "step": "1h"}),
        )
        .await;
    }

    #[tokio::test]
    async fn test_absolute_start_passed_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/query_range"))
            .and(query_param("start", "2024-01-01T00:00:00Z"))
            .and(query_param("end", "2024-01-01T06:00:00Z"))
            .and(query_param("step", "5m"))
            .respond_with(matrix())
            .expect(1)
            .mount(&server)
            .await;

        call_ok(
            &server,
            QueryRangeTool::NAME,
            json!({
                "query": "up",
                "start": "2024-01-01T00:00:00Z",
                "end": "2024-01-01T06:00:00Z",
                "step": "5m"
            }),
        )
        .await;
    }

    #[tokio::test]
    async fn test_invalid_time_range() {
        let server = MockServer::start().await;
        let body = call_err(
            &server,
            QueryRangeTool::NAME,
            json!({"query": "up", "timeRange": "last week"}),
        )
        .await;
        assert!(body["error"].as_str().unwrap().contains("'last week'"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_start_and_time_range_conflict() {
        let server = MockServer::start().await;
        let body = call_err(
            &server,
            QueryRangeTool::NAME,
            json!({"query": "up", "start": "0", "timeRange": "1h"}),
        )
        .await;
        assert!(body["error"].as_str().unwrap().contains("not both"));
    }
}
