//! Active alerts.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::domains::prometheus::PrometheusClient;
use crate::domains::prometheus::types::{Alert, Labels};
use crate::domains::tools::{PrometheusTool, ToolError};

/// Alert state filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertStateFilter {
    Firing,
    Pending,
    #[default]
    All,
}

impl AlertStateFilter {
    /// Whether an alert in `state` passes the filter.
    pub fn matches(self, state: &str) -> bool {
        match self {
            Self::All => true,
            Self::Firing => state == "firing",
            Self::Pending => state == "pending",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListAlertsParams {
    #[schemars(description = "State filter: firing, pending or all (default: all)")]
    #[serde(default)]
    pub state: AlertStateFilter,
}

/// An alert reshaped for output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct AlertInfo<'a> {
    alertname: Option<&'a str>,
    state: &'a str,
    severity: Option<&'a str>,
    active_at: Option<&'a str>,
    value: Option<&'a str>,
    summary: Option<&'a str>,
    labels: &'a Labels,
    annotations: &'a Labels,
}

impl<'a> From<&'a Alert> for AlertInfo<'a> {
    fn from(alert: &'a Alert) -> Self {
        Self {
            alertname: alert.labels.get("alertname").map(String::as_str),
            state: &alert.state,
            severity: alert.labels.get("severity").map(String::as_str),
            active_at: alert.active_at.as_deref(),
            value: alert.value.as_deref(),
            summary: alert.annotations.get("summary").map(String::as_str),
            labels: &alert.labels,
            annotations: &alert.annotations,
        }
    }
}

/// Lists pending and firing alerts.
pub struct ListAlertsTool;

#[async_trait::async_trait]
impl PrometheusTool for ListAlertsTool {
    const NAME: &'static str = "list_alerts";

    const DESCRIPTION: &'static str = "List active Prometheus alerts with their labels, annotations and activation time. Optionally filter by state (firing or pending); the summary always counts all alerts by state.";

    type Params = ListAlertsParams;

    async fn run(client: &PrometheusClient, params: Self::Params) -> Result<Value, ToolError> {
        let data = client.alerts().await?;
        let firing = data.alerts.iter().filter(|a| a.state == "firing").count();
        let pending = data.alerts.iter().filter(|a| a.state == "pending").count();

        let alerts: Vec<AlertInfo<'_>> = data
            .alerts
            .iter()
            .filter(|a| params.state.matches(&a.state))
            .map(AlertInfo::from)
            .collect();

        info!(
            "{} alerts ({} firing, {} pending), {} after filter",
            data.alerts.len(),
            firing,
            pending,
            alerts.len()
        );

        Ok(json!({
            "summary": {
                "total": data.alerts.len(),
                "firing": firing,
                "pending": pending,
            },
            "filter": params.state,
            "count": alerts.len(),
            "alerts": alerts,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::test_support::*;
    use wiremock::MockServer;

    async fn server_with_alerts() -> MockServer {
        let server = MockServer::start().await;
        mount_get(
            &server,
            "/api/v1/alerts",
            success(json!({"alerts": [
                {
                    "labels": {"alertname": "HighCPU", "severity": "warning"},
                    "annotations": {"summary": "CPU above 90%"},
                    "state": "firing",
                    "activeAt": "2024-01-01T00:00:00Z",
                    "value": "9.5e+01"
                },
                {
                    "labels": {"alertname": "DiskFilling"},
                    "annotations": {},
                    "state": "pending",
                    "activeAt": "2024-01-01T00:05:00Z",
                    "value": "1e+00"
                }
            ]})),
        )
        .await;
        server
    }

    #[tokio::test]
    async fn test_firing_filter_keeps_full_summary() {
        let server = server_with_alerts().await;
        let body = call_ok(&server, ListAlertsTool::NAME, json!({"state": "firing"})).await;
        assert_eq!(body["summary"], json!({"total": 2, "firing": 1, "pending": 1}));
        assert_eq!(body["count"], 1);
        assert_eq!(body["alerts"][0]["alertname"], "HighCPU");
        assert_eq!(body["alerts"][0]["summary"], "CPU above 90%");
    }

    #[tokio::test]
    async fn test_default_lists_all() {
        let server = server_with_alerts().await;
        let body = call_ok(&server, ListAlertsTool::NAME, json!({})).await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["filter"], "all");
        assert!(body["alerts"][1]["severity"].is_null());
    }
}
