//! Response envelope and data shapes of the Prometheus HTTP API.
//!
//! Field names follow the API's camelCase JSON. Optional fields that Prometheus
//! omits on older versions are `Option` with `#[serde(default)]` so that
//! downstream formatting can render them as explicit `null`.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::PrometheusError;

/// A label set as returned by Prometheus.
pub type Labels = BTreeMap<String, String>;

/// The envelope every `/api/v1` endpoint answers with.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status: String,
    pub data: Option<T>,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl<T> ApiResponse<T> {
    /// Whether the envelope reports success.
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Result of an instant or range query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryData {
    pub result_type: String,
    pub result: Value,
}

impl QueryData {
    /// Decode the result as instant-vector samples.
    pub fn vector(&self) -> Result<Vec<VectorSample>, PrometheusError> {
        self.decode("vector")
    }

    /// Decode the result as range-vector series.
    pub fn matrix(&self) -> Result<Vec<MatrixSeries>, PrometheusError> {
        self.decode("matrix")
    }

    fn decode<T: DeserializeOwned>(&self, expected: &str) -> Result<Vec<T>, PrometheusError> {
        if self.result_type != expected {
            return Err(PrometheusError::invalid_response(format!(
                "expected a {expected} result, got {}",
                self.result_type
            )));
        }
        serde_json::from_value(self.result.clone()).map_err(|e| {
            PrometheusError::invalid_response(format!("malformed {expected} result: {e}"))
        })
    }
}

/// One sample of an instant vector: `{ metric, value: [ts, "v"] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorSample {
    #[serde(default)]
    pub metric: Labels,
    pub value: (f64, String),
}

/// One series of a range vector: `{ metric, values: [[ts, "v"], ...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixSeries {
    #[serde(default)]
    pub metric: Labels,
    #[serde(default)]
    pub values: Vec<(f64, String)>,
}

/// Parameters shared by every range query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
    pub step: String,
}

// ============================================================================
// Targets
// ============================================================================

/// Payload of `/api/v1/targets`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetsData {
    #[serde(default)]
    pub active_targets: Vec<Target>,
    #[serde(default)]
    pub dropped_targets: Vec<DroppedTarget>,
}

/// An active scrape target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    #[serde(default)]
    pub discovered_labels: Labels,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub scrape_pool: Option<String>,
    #[serde(default)]
    pub scrape_url: Option<String>,
    #[serde(default)]
    pub global_url: Option<String>,
    #[serde(default)]
    pub last_error: Option<String>,
    #[serde(default)]
    pub last_scrape: Option<String>,
    #[serde(default)]
    pub last_scrape_duration: Option<f64>,
    #[serde(default)]
    pub health: String,
    #[serde(default)]
    pub scrape_interval: Option<String>,
    #[serde(default)]
    pub scrape_timeout: Option<String>,
}

/// A target dropped by relabeling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedTarget {
    #[serde(default)]
    pub discovered_labels: Labels,
}

// ============================================================================
// Metadata
// ============================================================================

/// One metadata entry of `/api/v1/metadata`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricMetadata {
    #[serde(rename = "type", default)]
    pub metric_type: String,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub unit: String,
}

/// Payload of `/api/v1/metadata`: metric name to its metadata entries.
pub type MetadataData = BTreeMap<String, Vec<MetricMetadata>>;

// ============================================================================
// Alerts and rules
// ============================================================================

/// Payload of `/api/v1/alerts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertsData {
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

/// An active (pending or firing) alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub annotations: Labels,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub active_at: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

/// Payload of `/api/v1/rules`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesData {
    #[serde(default)]
    pub groups: Vec<RuleGroup>,
}

/// A rule group as loaded from a rule file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleGroup {
    pub name: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub interval: Option<f64>,
    #[serde(default)]
    pub last_evaluation: Option<String>,
    #[serde(default)]
    pub evaluation_time: Option<f64>,
}

/// An alerting or recording rule.
///
/// Both kinds share one shape; alerting-only fields are empty for recording rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub name: String,
    #[serde(default)]
    pub query: String,
    #[serde(rename = "type", default)]
    pub rule_type: String,
    #[serde(default)]
    pub health: String,
    #[serde(default)]
    pub last_error: Option<String>,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub annotations: Labels,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
    #[serde(default)]
    pub last_evaluation: Option<String>,
    #[serde(default)]
    pub evaluation_time: Option<f64>,
}

impl Rule {
    /// Whether this is an alerting rule.
    pub fn is_alerting(&self) -> bool {
        self.rule_type == "alerting"
    }
}

// ============================================================================
// Status
// ============================================================================

/// Payload of `/api/v1/status/buildinfo`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub revision: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub build_user: String,
    #[serde(default)]
    pub build_date: String,
    #[serde(default)]
    pub go_version: String,
}

/// Payload of `/api/v1/status/runtimeinfo`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeInfo {
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(rename = "CWD", default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub reload_config_success: Option<bool>,
    #[serde(default)]
    pub last_config_time: Option<String>,
    #[serde(default)]
    pub corruption_count: Option<i64>,
    #[serde(default)]
    pub goroutine_count: Option<i64>,
    #[serde(rename = "GOMAXPROCS", default)]
    pub gomaxprocs: Option<i64>,
    #[serde(rename = "GOGC", default)]
    pub gogc: Option<String>,
    #[serde(rename = "GODEBUG", default)]
    pub godebug: Option<String>,
    #[serde(default)]
    pub storage_retention: Option<String>,
}

/// Payload of `/api/v1/status/config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigData {
    #[serde(default)]
    pub yaml: String,
}

/// Payload of `/api/v1/status/flags`.
pub type FlagsData = BTreeMap<String, String>;

/// Payload of `/api/v1/status/tsdb`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsdbStatus {
    #[serde(default)]
    pub head_stats: HeadStats,
    #[serde(default)]
    pub series_count_by_metric_name: Vec<NameValue>,
    #[serde(default)]
    pub label_value_count_by_label_name: Vec<NameValue>,
    #[serde(default)]
    pub memory_in_bytes_by_label_name: Vec<NameValue>,
    #[serde(default)]
    pub series_count_by_label_value_pair: Vec<NameValue>,
}

/// Head block statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadStats {
    #[serde(default)]
    pub num_series: u64,
    #[serde(default)]
    pub num_label_pairs: u64,
    #[serde(default)]
    pub chunk_count: u64,
    #[serde(default)]
    pub min_time: i64,
    #[serde(default)]
    pub max_time: i64,
}

/// A `{ name, value }` pair from the TSDB cardinality lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameValue {
    pub name: String,
    pub value: u64,
}
