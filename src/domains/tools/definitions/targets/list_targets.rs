//! List scrape targets with a per-health summary.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::domains::prometheus::PrometheusClient;
use crate::domains::prometheus::types::{Labels, Target};
use crate::domains::tools::definitions::common::{non_empty, to_json};
use crate::domains::tools::{PrometheusTool, ToolError};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Target health filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthFilter {
    Up,
    Down,
    Unknown,
    #[default]
    All,
}

impl HealthFilter {
    /// Whether a target reporting `health` passes the filter.
    pub fn matches(self, health: &str) -> bool {
        match self {
            Self::All => true,
            Self::Up => health == "up",
            Self::Down => health == "down",
            Self::Unknown => health != "up" && health != "down",
        }
    }
}

/// Parameters for the list targets tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListTargetsParams {
    /// Only return targets in this health state.
    #[schemars(description = "Health filter: up, down, unknown or all (default: all)")]
    #[serde(default)]
    pub health: HealthFilter,
}

// ============================================================================
// Structured Output
// ============================================================================

/// Counts of active targets by health.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TargetSummary {
    pub total: usize,
    pub up: usize,
    pub down: usize,
    pub unknown: usize,
}

impl TargetSummary {
    /// Count `targets` by health.
    pub fn of(targets: &[Target]) -> Self {
        let mut summary = Self {
            total: targets.len(),
            ..Self::default()
        };
        for target in targets {
            match target.health.as_str() {
                "up" => summary.up += 1,
                "down" => summary.down += 1,
                _ => summary.unknown += 1,
            }
        }
        summary
    }
}

/// A target reshaped for assistants.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
    pub job: Option<String>,
    pub instance: Option<String>,
    pub health: String,
    pub scrape_pool: Option<String>,
    pub scrape_url: Option<String>,
    pub last_scrape: Option<String>,
    pub last_scrape_duration: Option<f64>,
    pub last_error: Option<String>,
    pub labels: Labels,
}

impl From<&Target> for TargetInfo {
    fn from(target: &Target) -> Self {
        Self {
            job: target.labels.get("job").cloned(),
            instance: target.labels.get("instance").cloned(),
            health: target.health.clone(),
            scrape_pool: target.scrape_pool.clone(),
            scrape_url: target.scrape_url.clone(),
            last_scrape: target.last_scrape.clone(),
            last_scrape_duration: target.last_scrape_duration,
            last_error: non_empty(target.last_error.clone()),
            labels: target.labels.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListTargetsResult {
    summary: TargetSummary,
    filter: HealthFilter,
    dropped_count: usize,
    count: usize,
    targets: Vec<TargetInfo>,
}

// ============================================================================
// Tool Implementation
// ============================================================================

/// Lists active scrape targets, optionally filtered by health.
pub struct ListTargetsTool;

#[async_trait::async_trait]
impl PrometheusTool for ListTargetsTool {
    const NAME: &'static str = "list_targets";

    const DESCRIPTION: &'static str = "List Prometheus scrape targets with their health, last scrape time, duration and last error. Returns a summary of target counts by health (up/down/unknown) and the targets matching the optional health filter.";

    type Params = ListTargetsParams;

    async fn run(client: &PrometheusClient, params: Self::Params) -> Result<Value, ToolError> {
        let data = client.targets().await?;

        let summary = TargetSummary::of(&data.active_targets);
        let targets: Vec<TargetInfo> = data
            .active_targets
            .iter()
            .filter(|t| params.health.matches(&t.health))
            .map(TargetInfo::from)
            .collect();

        info!(
            "Listed {} of {} targets (filter: {:?})",
            targets.len(),
            summary.total,
            params.health
        );

        to_json(&ListTargetsResult {
            summary,
            filter: params.health,
            dropped_count: data.dropped_targets.len(),
            count: targets.len(),
            targets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::test_support::*;
    use serde_json::json;
    use wiremock::MockServer;

    fn targets_fixture() -> Value {
        json!({
            "activeTargets": [
                {
                    "labels": {"job": "node", "instance": "host-a:9100"},
                    "scrapePool": "node",
                    "scrapeUrl": "http://host-a:9100/metrics",
                    "lastError": "",
                    "lastScrape": "2024-05-01T10:00:00Z",
                    "lastScrapeDuration": 0.012,
                    "health": "up"
                },
                {
                    "labels": {"job": "node", "instance": "host-b:9100"},
                    "scrapePool": "node",
                    "scrapeUrl": "http://host-b:9100/metrics",
                    "lastError": "connection refused",
                    "lastScrape": "2024-05-01T10:00:01Z",
                    "lastScrapeDuration": 0.001,
                    "health": "down"
                },
                {
                    "labels": {"job": "prometheus", "instance": "localhost:9090"},
                    "scrapePool": "prometheus",
                    "scrapeUrl": "http://localhost:9090/metrics",
                    "health": "up"
                }
            ],
            "droppedTargets": [{"discoveredLabels": {"__address__": "x:1"}}]
        })
    }

    #[test]
    fn test_health_filter_default_is_all() {
        let params: ListTargetsParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.health, HealthFilter::All);
        assert!(HealthFilter::All.matches("anything"));
        assert!(HealthFilter::Unknown.matches("unknown"));
        assert!(!HealthFilter::Unknown.matches("up"));
    }

    #[tokio::test]
    async fn test_down_filter_keeps_full_summary() {
        let server = MockServer::start().await;
        mount_get(&server, "/api/v1/targets", success(targets_fixture())).await;

        let body = call_ok(&server, ListTargetsTool::NAME, json!({"health": "down"})).await;
        assert_eq!(
            body["summary"],
            json!({"total": 3, "up": 2, "down": 1, "unknown": 0})
        );
        let targets = body["targets"].as_array().unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0]["instance"], "host-b:9100");
        assert_eq!(targets[0]["lastError"], "connection refused");
        assert_eq!(body["droppedCount"], 1);
    }

    #[tokio::test]
    async fn test_all_filter_matches_no_filter() {
        let server = MockServer::start().await;
        mount_get(&server, "/api/v1/targets", success(targets_fixture())).await;

        let all = call_ok(&server, ListTargetsTool::NAME, json!({"health": "all"})).await;
        let unfiltered = call_ok(&server, ListTargetsTool::NAME, json!({})).await;
        assert_eq!(all["targets"], unfiltered["targets"]);
        assert_eq!(all["count"], 3);
    }

    #[tokio::test]
    async fn test_absent_last_error_is_null() {
        let server = MockServer::start().await;
        mount_get(&server, "/api/v1/targets", success(targets_fixture())).await;

        let body = call_ok(&server, ListTargetsTool::NAME, json!({"health": "up"})).await;
        let targets = body["targets"].as_array().unwrap();
        assert_eq!(targets.len(), 2);
        for target in targets {
            assert!(target.get("lastError").unwrap().is_null());
        }
    }

    #[tokio::test]
    async fn test_rejects_unknown_health_value() {
        let server = MockServer::start().await;
        let body = call_err(&server, ListTargetsTool::NAME, json!({"health": "sideways"})).await;
        assert!(body["error"].as_str().unwrap().contains("Invalid arguments"));
    }
}
