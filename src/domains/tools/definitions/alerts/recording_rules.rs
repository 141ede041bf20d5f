//! Recording rules grouped by rule group.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use super::rules::select_groups;
use crate::domains::prometheus::PrometheusClient;
use crate::domains::prometheus::types::{Labels, Rule};
use crate::domains::tools::definitions::common::non_empty;
use crate::domains::tools::{PrometheusTool, ToolError};

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListRecordingRulesParams {
    #[schemars(description = "Only rules of the rule group with this exact name")]
    #[serde(default)]
    pub group: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordingRuleInfo {
    name: String,
    query: String,
    health: String,
    last_error: Option<String>,
    last_evaluation: Option<String>,
    evaluation_time: Option<f64>,
    labels: Labels,
}

impl From<&Rule> for RecordingRuleInfo {
    fn from(rule: &Rule) -> Self {
        Self {
            name: rule.name.clone(),
            query: rule.query.clone(),
            health: rule.health.clone(),
            last_error: non_empty(rule.last_error.clone()),
            last_evaluation: rule.last_evaluation.clone(),
            evaluation_time: rule.evaluation_time,
            labels: rule.labels.clone(),
        }
    }
}

/// Lists recording rules with their evaluation health.
pub struct ListRecordingRulesTool;

#[async_trait::async_trait]
impl PrometheusTool for ListRecordingRulesTool {
    const NAME: &'static str = "list_recording_rules";

    const DESCRIPTION: &'static str = "List recording rules grouped by rule group, with their PromQL expression, health and last evaluation. Optionally filter by group name. The summary counts healthy and unhealthy rules.";

    type Params = ListRecordingRulesParams;

    async fn run(client: &PrometheusClient, params: Self::Params) -> Result<Value, ToolError> {
        let group_filter = non_empty(params.group);
        let data = client.rules().await?;

        let mut healthy = 0;
        let mut unhealthy = 0;
        let mut out = Vec::new();
        for group in select_groups(data.groups, group_filter.as_deref()) {
            let rules: Vec<RecordingRuleInfo> = group
                .rules
                .iter()
                .filter(|r| !r.is_alerting())
                .map(RecordingRuleInfo::from)
                .collect();
            if rules.is_empty() {
                continue;
            }
            for rule in &rules {
                if rule.health == "ok" {
                    healthy += 1;
                } else {
                    unhealthy += 1;
                }
            }
            out.push(json!({
                "name": group.name,
                "file": group.file,
                "interval": group.interval,
                "rules": rules,
            }));
        }

        info!("{} recording rules, {} unhealthy", healthy + unhealthy, unhealthy);

        Ok(json!({
            "summary": {
                "total": healthy + unhealthy,
                "healthy": healthy,
                "unhealthy": unhealthy,
            },
            "group": group_filter,
            "groups": out,
        }))
    }
}
