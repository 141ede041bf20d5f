//! Host metrics from a Prometheus node_exporter.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use super::exporter_queries::{NodeCategory, run_sub_queries};
use crate::domains::prometheus::PrometheusClient;
use crate::domains::prometheus::time::parse_duration;
use crate::domains::tools::definitions::common::require_non_empty;
use crate::domains::tools::{PrometheusTool, ToolError};

pub(super) const DEFAULT_WINDOW: &str = "5m";

/// Parameters for the node_exporter helper.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeExporterParams {
    /// Scrape instance, e.g. `host:9100`.
    #[schemars(description = "Instance label of the node_exporter target, e.g. host:9100")]
    pub instance: String,

    #[schemars(description = "Metric category: cpu, memory, disk, network, filesystem, load or all (default: all)")]
    #[serde(default)]
    pub category: NodeCategory,

    /// Averaging window for rate() sub-queries.
    #[schemars(description = "Averaging window for rates, e.g. 5m, 15m, 1h (default: 5m)")]
    #[serde(default)]
    pub time_range: Option<String>,
}

/// Runs the canned node_exporter queries for one instance.
pub struct NodeExporterTool;

#[async_trait::async_trait]
impl PrometheusTool for NodeExporterTool {
    const NAME: &'static str = "query_node_exporter";

    const DESCRIPTION: &'static str = "Query common Linux/Unix host metrics from node_exporter for one instance. Runs a fixed set of PromQL queries for the chosen category (cpu, memory, disk, network, filesystem, load or all); a failing sub-query is reported inline without failing the others.";

    type Params = NodeExporterParams;

    fn validate(params: &Self::Params) -> Result<(), String> {
        require_non_empty("instance", &params.instance)
    }

    async fn run(client: &PrometheusClient, params: Self::Params) -> Result<Value, ToolError> {
        let window = params.time_range.as_deref().unwrap_or(DEFAULT_WINDOW);
        parse_duration(window)?;

        let queries = params.category.queries();
        info!(
            "node_exporter {:?} on {}: {} sub-queries",
            params.category,
            params.instance,
            queries.len()
        );
        let results = run_sub_queries(client, &queries, &params.instance, window).await;

        Ok(json!({
            "exporter": "node_exporter",
            "instance": params.instance,
            "category": params.category,
            "timeRange": window,
            "results": results,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::test_support::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_cpu_category_with_one_failing_sub_query() {
        let server = MockServer::start().await;
        let by_mode = r#"avg by (mode) (rate(node_cpu_seconds_total{instance="host:9100"}[5m])) * 100"#;
        Mock::given(method("GET"))
            .and(path("/api/v1/query"))
            .and(query_param("query", by_mode))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/query"))
            .respond_with(vector(json!([{"metric": {}, "value": [1700000000, "12.5"]}])))
            .mount(&server)
            .await;

        let body = call_ok(
            &server,
            NodeExporterTool::NAME,
            json!({"instance": "host:9100", "category": "cpu"}),
        )
        .await;

        assert_eq!(body["timeRange"], "5m");
        assert_eq!(body["category"], "cpu");
        let results = body["results"].as_object().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results["cpu_usage_percent"]["result"][0]["value"][1], "12.5");
        assert!(results["cpu_usage_by_mode"]["error"].as_str().unwrap().contains("503"));

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        for request in requests {
            let query = request
                .url
                .query_pairs()
                .find(|(k, _)| k == "query")
                .map(|(_, v)| v.into_owned())
                .unwrap();
            assert!(query.contains("node_cpu_seconds_total"), "{query}");
        }
    }

    #[tokio::test]
    async fn test_bad_window_rejected_before_querying() {
        let server = MockServer::start().await;
        let body = call_err(
            &server,
            NodeExporterTool::NAME,
            json!({"instance": "host:9100", "timeRange": "5 minutes"}),
        )
        .await;
        assert!(body["error"].as_str().unwrap().contains("Invalid time expression"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_category_rejected() {
        let server = MockServer::start().await;
        let body = call_err(
            &server,
            NodeExporterTool::NAME,
            json!({"instance": "host:9100", "category": "services"}),
        )
        .await;
        assert!(body["error"].as_str().unwrap().contains("Invalid arguments"));
    }
}
