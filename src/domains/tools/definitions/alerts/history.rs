//! Alert history from the synthetic `ALERTS` series.

use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::domains::prometheus::PrometheusClient;
use crate::domains::prometheus::time::{
    format_instant, format_unix_seconds, lookback_start, parse_duration, step_for_lookback,
};
use crate::domains::prometheus::types::{Labels, MatrixSeries, TimeRange};
use crate::domains::tools::definitions::common::{escape_label_value, non_empty, to_json};
use crate::domains::tools::{PrometheusTool, ToolError};

const DEFAULT_LOOKBACK: &str = "1h";

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlertHistoryParams {
    #[schemars(description = "Only this alert (the 'alertname' label)")]
    #[serde(default)]
    pub alertname: Option<String>,

    #[schemars(description = "How far back to look, e.g. 1h, 24h, 7d (default: 1h)")]
    #[serde(default)]
    pub time_range: Option<String>,
}

/// First/last sighting of one alert series.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct AlertSeriesSummary {
    alertname: Option<String>,
    alertstate: Option<String>,
    first_seen: Option<String>,
    last_seen: Option<String>,
    sample_count: usize,
    labels: Labels,
}

impl From<MatrixSeries> for AlertSeriesSummary {
    fn from(series: MatrixSeries) -> Self {
        let first_seen = series.values.first().and_then(|(ts, _)| format_unix_seconds(*ts));
        let last_seen = series.values.last().and_then(|(ts, _)| format_unix_seconds(*ts));
        Self {
            alertname: series.metric.get("alertname").cloned(),
            alertstate: series.metric.get("alertstate").cloned(),
            first_seen,
            last_seen,
            sample_count: series.values.len(),
            labels: series.metric,
        }
    }
}

fn alerts_selector(alertname: Option<&str>) -> String {
    match alertname {
        Some(name) => format!("ALERTS{{alertname=\"{}\"}}", escape_label_value(name)),
        None => "ALERTS".to_string(),
    }
}

/// Summarizes when alerts were pending or firing over a lookback window.
pub struct AlertHistoryTool;

#[async_trait::async_trait]
impl PrometheusTool for AlertHistoryTool {
    const NAME: &'static str = "get_alert_history";

    const DESCRIPTION: &'static str = "Get the recent history of pending and firing alerts from the ALERTS series over a lookback window (default 1h, e.g. 6h, 7d). For each alert series reports when it was first and last seen and the number of samples. Optionally restrict to one alert name.";

    type Params = AlertHistoryParams;

    async fn run(client: &PrometheusClient, params: Self::Params) -> Result<Value, ToolError> {
        let alertname = non_empty(params.alertname);
        let expr = params.time_range.as_deref().unwrap_or(DEFAULT_LOOKBACK);
        let lookback = parse_duration(expr)?;
        let step = step_for_lookback(lookback);

        let end = Utc::now();
        let start = lookback_start(end, expr)?;
        let range = TimeRange {
            start: format_instant(start),
            end: format_instant(end),
            step: step.to_string(),
        };

        let query = alerts_selector(alertname.as_deref());
        info!("Alert history {} over {} (step {})", query, expr, step);
        let data = client.query_range(&query, &range).await?;

        let series: Vec<AlertSeriesSummary> =
            data.matrix()?.into_iter().map(AlertSeriesSummary::from).collect();

        Ok(json!({
            "query": query,
            "timeRange": expr,
            "start": range.start,
            "end": range.end,
            "step": range.step,
            "seriesCount": series.len(),
            "series": to_json(&series)?,
        }))
    }
}
