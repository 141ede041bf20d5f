//! Alerting rules grouped by rule group.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::domains::prometheus::PrometheusClient;
use crate::domains::prometheus::types::{Labels, Rule, RuleGroup};
use crate::domains::tools::definitions::common::non_empty;
use crate::domains::tools::{PrometheusTool, ToolError};

/// Alerting rule state filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RuleStateFilter {
    Firing,
    Pending,
    Inactive,
    #[default]
    All,
}

impl RuleStateFilter {
    /// Whether a rule whose state is `state` passes the filter.
    pub fn matches(self, state: &str) -> bool {
        match self {
            Self::All => true,
            Self::Firing => state == "firing",
            Self::Pending => state == "pending",
            Self::Inactive => state == "inactive",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListAlertRulesParams {
    #[schemars(description = "Only rules of the rule group with this exact name")]
    #[serde(default)]
    pub group: Option<String>,

    #[schemars(description = "Rule state filter: firing, pending, inactive or all (default: all)")]
    #[serde(default)]
    pub state: RuleStateFilter,
}

/// An alerting rule reshaped for output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct AlertRuleInfo {
    name: String,
    state: String,
    query: String,
    duration: Option<f64>,
    health: String,
    last_error: Option<String>,
    active_alerts: usize,
    labels: Labels,
    annotations: Labels,
}

impl From<&Rule> for AlertRuleInfo {
    fn from(rule: &Rule) -> Self {
        Self {
            name: rule.name.clone(),
            state: rule_state(rule).to_string(),
            query: rule.query.clone(),
            duration: rule.duration,
            health: rule.health.clone(),
            last_error: non_empty(rule.last_error.clone()),
            active_alerts: rule.alerts.len(),
            labels: rule.labels.clone(),
            annotations: rule.annotations.clone(),
        }
    }
}

fn rule_state(rule: &Rule) -> &str {
    rule.state.as_deref().unwrap_or("inactive")
}

/// Keep the groups named `group` (all when `None`).
pub(super) fn select_groups(groups: Vec<RuleGroup>, group: Option<&str>) -> Vec<RuleGroup> {
    groups
        .into_iter()
        .filter(|g| group.is_none_or(|name| g.name == name))
        .collect()
}

/// Lists alerting rules with per-state counts.
pub struct ListAlertRulesTool;

#[async_trait::async_trait]
impl PrometheusTool for ListAlertRulesTool {
    const NAME: &'static str = "list_alert_rules";

    const DESCRIPTION: &'static str = "List alerting rules grouped by rule group, with their PromQL expression, state, health and 'for' duration. Optionally filter by group name and rule state (firing, pending, inactive). The summary counts rules by state in the selected groups.";

    type Params = ListAlertRulesParams;

    async fn run(client: &PrometheusClient, params: Self::Params) -> Result<Value, ToolError> {
        let group_filter = non_empty(params.group);
        let data = client.rules().await?;
        let groups = select_groups(data.groups, group_filter.as_deref());

        let (mut total, mut firing, mut pending, mut inactive) = (0, 0, 0, 0);
        let mut out = Vec::new();
        for group in &groups {
            let rules: Vec<AlertRuleInfo> = group
                .rules
                .iter()
                .filter(|r| r.is_alerting())
                .inspect(|r| {
                    total += 1;
                    match rule_state(r) {
                        "firing" => firing += 1,
                        "pending" => pending += 1,
                        _ => inactive += 1,
                    }
                })
                .filter(|r| params.state.matches(rule_state(r)))
                .map(AlertRuleInfo::from)
                .collect();
            if rules.is_empty() {
                continue;
            }
            out.push(json!({
                "name": group.name,
                "file": group.file,
                "interval": group.interval,
                "rules": rules,
            }));
        }

        info!(
            "{} alerting rules ({} firing, {} pending), {} groups after filter",
            total,
            firing,
            pending,
            out.len()
        );

        Ok(json!({
            "summary": {
                "total": total,
                "firing": firing,
                "pending": pending,
                "inactive": inactive,
            },
            "filter": {"group": group_filter, "state": params.state},
            "groups": out,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::test_support::*;
    use wiremock::MockServer;

    #[tokio::test]
    async fn test_counts_and_grouping() {
        let server = MockServer::start().await;
        mount_get(&server, "/api/v1/rules", success(rules_payload())).await;

        let body = call_ok(&server, ListAlertRulesTool::NAME, json!({})).await;
        assert_eq!(
            body["summary"],
            json!({"total": 3, "firing": 1, "pending": 1, "inactive": 1})
        );
        assert_eq!(body["groups"].as_array().unwrap().len(), 2);
        assert_eq!(body["groups"][0]["rules"].as_array().unwrap().len(), 2);
        assert_eq!(body["groups"][0]["rules"][0]["activeAlerts"], 1);
        assert_eq!(body["groups"][1]["rules"][0]["lastError"], "boom");
    }

    #[tokio::test]
    async fn test_state_filter_drops_empty_groups() {
        let server = MockServer::start().await;
        mount_get(&server, "/api/v1/rules", success(rules_payload())).await;

        let body = call_ok(&server, ListAlertRulesTool::NAME, json!({"state": "firing"})).await;
        let groups = body["groups"].as_array().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0]["name"], "node");
        assert_eq!(body["summary"]["total"], 3);
    }

    #[tokio::test]
    async fn test_group_filter_scopes_summary() {
        let server = MockServer::start().await;
        mount_get(&server, "/api/v1/rules", success(rules_payload())).await;

        let body = call_ok(&server, ListAlertRulesTool::NAME, json!({"group": "api"})).await;
        assert_eq!(
            body["summary"],
            json!({"total": 1, "firing": 0, "pending": 1, "inactive": 0})
        );
    }
}
