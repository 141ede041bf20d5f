//! Blackbox exporter probe results.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::domains::prometheus::PrometheusClient;
use crate::domains::prometheus::types::{Labels, VectorSample};
use crate::domains::tools::definitions::common::{escape_label_value, to_json};
use crate::domains::tools::{PrometheusTool, ToolError};

/// Parameters for the probe results helper.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ProbeParams {
    #[schemars(description = "Only probes of this target (the 'target' label), e.g. https://example.com")]
    #[serde(default)]
    pub target: Option<String>,

    #[schemars(description = "Only probes using this blackbox module, e.g. http_2xx or icmp")]
    #[serde(default)]
    pub module: Option<String>,
}

/// One joined probe row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub instance: Option<String>,
    pub target: Option<String>,
    pub module: Option<String>,
    pub job: Option<String>,
    pub success: bool,
    pub duration_seconds: Option<f64>,
}

/// Build `metric{target="..",module=".."}` from the optional filters.
fn selector(metric: &str, params: &ProbeParams) -> String {
    let matchers: Vec<String> = [("target", &params.target), ("module", &params.module)]
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| format!("{label}=\"{}\"", escape_label_value(v)))
        })
        .collect();
    if matchers.is_empty() {
        metric.to_string()
    } else {
        format!("{metric}{{{}}}", matchers.join(","))
    }
}

fn join_key(labels: &Labels) -> (Option<String>, Option<String>) {
    (labels.get("instance").cloned(), labels.get("target").cloned())
}

/// Join success samples with duration samples on `(instance, target)`.
fn join(success: Vec<VectorSample>, durations: Vec<VectorSample>) -> Vec<ProbeResult> {
    let durations: HashMap<_, f64> = durations
        .into_iter()
        .filter_map(|s| s.value.1.parse().ok().map(|d| (join_key(&s.metric), d)))
        .collect();

    success
        .into_iter()
        .map(|sample| {
            let key = join_key(&sample.metric);
            ProbeResult {
                duration_seconds: durations.get(&key).copied(),
                success: sample.value.1.parse::<f64>().is_ok_and(|v| v == 1.0),
                module: sample.metric.get("module").cloned(),
                job: sample.metric.get("job").cloned(),
                instance: key.0,
                target: key.1,
            }
        })
        .collect()
}

/// Reports blackbox probe success and duration per target.
pub struct ProbesTool;

#[async_trait::async_trait]
impl PrometheusTool for ProbesTool {
    const NAME: &'static str = "query_blackbox_probes";

    const DESCRIPTION: &'static str = "Get blackbox_exporter probe results: whether each probe succeeded and how long it took. Optionally filter by probed target and/or blackbox module.";

    type Params = ProbeParams;

    async fn run(client: &PrometheusClient, params: Self::Params) -> Result<Value, ToolError> {
        let success_query = selector("probe_success", &params);
        let duration_query = selector("probe_duration_seconds", &params);
        info!("Probe query: {}", success_query);

        let (success, durations) = futures::join!(
            client.query(&success_query, None),
            client.query(&duration_query, None)
        );
        let success = success?.vector()?;
        let durations = match durations.and_then(|data| data.vector()) {
            Ok(samples) => samples,
            Err(e) => {
                warn!("Probe duration query failed, reporting without durations: {}", e);
                Vec::new()
            }
        };

        let probes = join(success, durations);
        let succeeded = probes.iter().filter(|p| p.success).count();

        Ok(json!({
            "filter": {"target": params.target, "module": params.module},
            "summary": {
                "total": probes.len(),
                "succeeded": succeeded,
                "failed": probes.len() - succeeded,
            },
            "probes": to_json(&probes)?,
        }))
    }
}
