//! Look up targets by job and/or instance.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use super::list_targets::TargetInfo;
use crate::domains::prometheus::PrometheusClient;
use crate::domains::tools::{PrometheusTool, ToolError};

/// Parameters for target lookup. At least one filter is required.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetTargetParams {
    /// Exact `job` label value.
    #[schemars(description = "Job name to match (exact)")]
    #[serde(default)]
    pub job: Option<String>,

    /// Exact `instance` label value.
    #[schemars(description = "Instance to match, e.g. host:9100 (exact)")]
    #[serde(default)]
    pub instance: Option<String>,
}

/// Finds the targets whose labels match the given job and/or instance.
pub struct GetTargetTool;

#[async_trait::async_trait]
impl PrometheusTool for GetTargetTool {
    const NAME: &'static str = "get_target";

    const DESCRIPTION: &'static str = "Get the health and scrape details of specific targets by job name and/or instance. At least one of 'job' or 'instance' is required. Reports found=false when nothing matches.";

    type Params = GetTargetParams;

    async fn run(client: &PrometheusClient, params: Self::Params) -> Result<Value, ToolError> {
        let job = params.job.filter(|j| !j.is_empty());
        let instance = params.instance.filter(|i| !i.is_empty());
        if job.is_none() && instance.is_none() {
            return Err(ToolError::missing_filter(
                "provide at least one of 'job' or 'instance'",
            ));
        }

        let data = client.targets().await?;
        let matches: Vec<TargetInfo> = data
            .active_targets
            .iter()
            .filter(|t| {
                job.as_deref()
                    .is_none_or(|j| t.labels.get("job").map(String::as_str) == Some(j))
            })
            .filter(|t| {
                instance
                    .as_deref()
                    .is_none_or(|i| t.labels.get("instance").map(String::as_str) == Some(i))
            })
            .map(TargetInfo::from)
            .collect();

        info!(
            "Target lookup job={:?} instance={:?}: {} match(es)",
            job,
            instance,
            matches.len()
        );

        if matches.is_empty() {
            return Ok(json!({
                "found": false,
                "job": job,
                "instance": instance,
                "message": "No active target matches the given filters",
            }));
        }

        Ok(json!({
            "found": true,
            "count": matches.len(),
            "targets": matches,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::test_support::*;
    use wiremock::MockServer;

    async fn server_with_targets() -> MockServer {
        let server = MockServer::start().await;
        mount_get(
            &server,
            "/api/v1/targets",
            success(json!({
                "activeTargets": [
                    {"labels": {"job": "node", "instance": "a:9100"}, "health": "up"},
                    {"labels": {"job": "node", "instance": "b:9100"}, "health": "down", "lastError": "timeout"},
                    {"labels": {"job": "api", "instance": "a:8080"}, "health": "up"}
                ],
                "droppedTargets": []
            })),
        )
        .await;
        server
    }

    #[tokio::test]
    async fn test_match_by_job() {
        let server = server_with_targets().await;
        let body = call_ok(&server, GetTargetTool::NAME, json!({"job": "node"})).await;
        assert_eq!(body["found"], true);
        assert_eq!(body["count"], 2);
    }

    #[tokio::test]
    async fn test_match_by_job_and_instance() {
        let server = server_with_targets().await;
        let body = call_ok(
            &server,
            GetTargetTool::NAME,
            json!({"job": "node", "instance": "b:9100"}),
        )
        .await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["targets"][0]["lastError"], "timeout");
    }

    #[tokio::test]
    async fn test_no_match_is_not_an_error() {
        let server = server_with_targets().await;
        let body = call_ok(
            &server,
            GetTargetTool::NAME,
            json!({"job": "api", "instance": "b:9100"}),
        )
        .await;
        assert_eq!(body["found"], false);
    }

    #[tokio::test]
    async fn test_missing_filter() {
        let server = MockServer::start().await;
        let body = call_err(&server, GetTargetTool::NAME, json!({})).await;
        assert!(body["error"].as_str().unwrap().contains("Missing filter"));
    }
}
