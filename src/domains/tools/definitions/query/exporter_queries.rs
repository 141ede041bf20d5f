//! Declarative PromQL tables for the exporter helper tools.
//!
//! Each category maps to a list of `(result key, template)` pairs.
//! Templates use `$instance` and `$window` placeholders; [`render`] is the only
//! place they are substituted.

use std::collections::BTreeMap;

use futures::future::join_all;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

use crate::domains::prometheus::PrometheusClient;
use crate::domains::tools::definitions::common::escape_label_value;

/// A named sub-query template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubQuery {
    pub key: &'static str,
    pub template: &'static str,
}

const fn sub(key: &'static str, template: &'static str) -> SubQuery {
    SubQuery { key, template }
}

// ============================================================================
// windows_exporter
// ============================================================================

const WINDOWS_CPU: &[SubQuery] = &[
    sub(
        "cpu_usage_percent",
        r#"100 - (avg by (instance) (rate(windows_cpu_time_total{instance="$instance",mode="idle"}[$window])) * 100)"#,
    ),
    sub(
        "cpu_usage_by_core",
        r#"100 - (avg by (core) (rate(windows_cpu_time_total{instance="$instance",mode="idle"}[$window])) * 100)"#,
    ),
    sub(
        "processor_queue_length",
        r#"windows_system_processor_queue_length{instance="$instance"}"#,
    ),
];

const WINDOWS_MEMORY: &[SubQuery] = &[
    sub(
        "memory_total_bytes",
        r#"windows_cs_physical_memory_bytes{instance="$instance"}"#,
    ),
    sub(
        "memory_free_bytes",
        r#"windows_os_physical_memory_free_bytes{instance="$instance"}"#,
    ),
    sub(
        "memory_usage_percent",
        r#"100 - (windows_os_physical_memory_free_bytes{instance="$instance"} / windows_cs_physical_memory_bytes{instance="$instance"} * 100)"#,
    ),
];

const WINDOWS_DISK: &[SubQuery] = &[
    sub(
        "disk_free_percent",
        r#"windows_logical_disk_free_bytes{instance="$instance",volume!~"HarddiskVolume.*"} / windows_logical_disk_size_bytes{instance="$instance",volume!~"HarddiskVolume.*"} * 100"#,
    ),
    sub(
        "disk_read_bytes_rate",
        r#"rate(windows_logical_disk_read_bytes_total{instance="$instance"}[$window])"#,
    ),
    sub(
        "disk_write_bytes_rate",
        r#"rate(windows_logical_disk_write_bytes_total{instance="$instance"}[$window])"#,
    ),
];

const WINDOWS_NETWORK: &[SubQuery] = &[
    sub(
        "network_received_bytes_rate",
        r#"rate(windows_net_bytes_received_total{instance="$instance"}[$window])"#,
    ),
    sub(
        "network_sent_bytes_rate",
        r#"rate(windows_net_bytes_sent_total{instance="$instance"}[$window])"#,
    ),
];

const WINDOWS_SERVICES: &[SubQuery] = &[
    sub(
        "services_running",
        r#"count(windows_service_state{instance="$instance",state="running"} == 1)"#,
    ),
    sub(
        "services_stopped_auto_start",
        r#"windows_service_state{instance="$instance",state="stopped"} == 1 and on (name) windows_service_start_mode{instance="$instance",start_mode="auto"} == 1"#,
    ),
];

/// Metric categories offered by the Windows exporter helper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum WindowsCategory {
    Cpu,
    Memory,
    Disk,
    Network,
    Services,
    #[default]
    All,
}

impl WindowsCategory {
    /// Sub-queries for this category, in table order.
    pub fn queries(self) -> Vec<SubQuery> {
        match self {
            Self::Cpu => WINDOWS_CPU.to_vec(),
            Self::Memory => WINDOWS_MEMORY.to_vec(),
            Self::Disk => WINDOWS_DISK.to_vec(),
            Self::Network => WINDOWS_NETWORK.to_vec(),
            Self::Services => WINDOWS_SERVICES.to_vec(),
            Self::All => [
                WINDOWS_CPU,
                WINDOWS_MEMORY,
                WINDOWS_DISK,
                WINDOWS_NETWORK,
                WINDOWS_SERVICES,
            ]
            .concat(),
        }
    }
}

// ============================================================================
// node_exporter
// ============================================================================

const NODE_CPU: &[SubQuery] = &[
    sub(
        "cpu_usage_percent",
        r#"100 - (avg by (instance) (rate(node_cpu_seconds_total{instance="$instance",mode="idle"}[$window])) * 100)"#,
    ),
    sub(
        "cpu_usage_by_mode",
        r#"avg by (mode) (rate(node_cpu_seconds_total{instance="$instance"}[$window])) * 100"#,
    ),
];

const NODE_MEMORY: &[SubQuery] = &[
    sub(
        "memory_total_bytes",
        r#"node_memory_MemTotal_bytes{instance="$instance"}"#,
    ),
    sub(
        "memory_available_bytes",
        r#"node_memory_MemAvailable_bytes{instance="$instance"}"#,
    ),
    sub(
        "memory_usage_percent",
        r#"(1 - node_memory_MemAvailable_bytes{instance="$instance"} / node_memory_MemTotal_bytes{instance="$instance"}) * 100"#,
    ),
];

const NODE_DISK: &[SubQuery] = &[
    sub(
        "disk_read_bytes_rate",
        r#"rate(node_disk_read_bytes_total{instance="$instance"}[$window])"#,
    ),
    sub(
        "disk_write_bytes_rate",
        r#"rate(node_disk_written_bytes_total{instance="$instance"}[$window])"#,
    ),
    sub(
        "disk_io_utilization_percent",
        r#"rate(node_disk_io_time_seconds_total{instance="$instance"}[$window]) * 100"#,
    ),
];

const NODE_NETWORK: &[SubQuery] = &[
    sub(
        "network_receive_bytes_rate",
        r#"rate(node_network_receive_bytes_total{instance="$instance",device!="lo"}[$window])"#,
    ),
    sub(
        "network_transmit_bytes_rate",
        r#"rate(node_network_transmit_bytes_total{instance="$instance",device!="lo"}[$window])"#,
    ),
];

const NODE_FILESYSTEM: &[SubQuery] = &[
    sub(
        "filesystem_free_percent",
        r#"node_filesystem_avail_bytes{instance="$instance",fstype!~"tmpfs|overlay|squashfs"} / node_filesystem_size_bytes{instance="$instance",fstype!~"tmpfs|overlay|squashfs"} * 100"#,
    ),
    sub(
        "filesystem_size_bytes",
        r#"node_filesystem_size_bytes{instance="$instance",fstype!~"tmpfs|overlay|squashfs"}"#,
    ),
];

const NODE_LOAD: &[SubQuery] = &[
    sub("load1", r#"node_load1{instance="$instance"}"#),
    sub("load5", r#"node_load5{instance="$instance"}"#),
    sub("load15", r#"node_load15{instance="$instance"}"#),
];

/// Metric categories offered by the node exporter helper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    Cpu,
    Memory,
    Disk,
    Network,
    Filesystem,
    Load,
    #[default]
    All,
}

impl NodeCategory {
    /// Sub-queries for this category, in table order.
    pub fn queries(self) -> Vec<SubQuery> {
        match self {
            Self::Cpu => NODE_CPU.to_vec(),
            Self::Memory => NODE_MEMORY.to_vec(),
            Self::Disk => NODE_DISK.to_vec(),
            Self::Network => NODE_NETWORK.to_vec(),
            Self::Filesystem => NODE_FILESYSTEM.to_vec(),
            Self::Load => NODE_LOAD.to_vec(),
            Self::All => [
                NODE_CPU,
                NODE_MEMORY,
                NODE_DISK,
                NODE_NETWORK,
                NODE_FILESYSTEM,
                NODE_LOAD,
            ]
            .concat(),
        }
    }
}

// ============================================================================
// Rendering and execution
// ============================================================================

/// Substitute the instance (escaped) and averaging window into a template.
pub fn render(template: &str, instance: &str, window: &str) -> String {
    template
        .replace("$instance", &escape_label_value(instance))
        .replace("$window", window)
}

/// Run every sub-query concurrently and key the outcomes by name.
///
/// The map is sorted by key, not by table order. A failing sub-query yields
/// `{ "query", "error" }` under its key; the others are unaffected.
pub async fn run_sub_queries(
    client: &PrometheusClient,
    queries: &[SubQuery],
    instance: &str,
    window: &str,
) -> BTreeMap<String, Value> {
    let rendered: Vec<(&'static str, String)> = queries
        .iter()
        .map(|q| (q.key, render(q.template, instance, window)))
        .collect();

    let outcomes = join_all(rendered.iter().map(|(_, expr)| client.query(expr, None))).await;

    rendered
        .into_iter()
        .zip(outcomes)
        .map(|((key, expr), outcome)| {
            let value = match outcome {
                Ok(data) => json!({
                    "query": expr,
                    "resultType": data.result_type,
                    "result": data.result,
                }),
                Err(e) => {
                    warn!("Sub-query {} failed for {}: {}", key, instance, e);
                    json!({ "query": expr, "error": e.to_string() })
                }
            };
            (key.to_string(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_placeholders() {
        let rendered = render(NODE_CPU[0].template, "host:9100", "5m");
        assert_eq!(
            rendered,
            r#"100 - (avg by (instance) (rate(node_cpu_seconds_total{instance="host:9100",mode="idle"}[5m])) * 100)"#
        );
        assert!(!rendered.contains('$'));
    }

    #[test]
    fn test_render_escapes_instance() {
        let rendered = render(NODE_LOAD[0].template, r#"evil"} or vector(1) #"#, "5m");
        assert_eq!(rendered, r#"node_load1{instance="evil\"} or vector(1) #"}"#);
    }

    #[test]
    fn test_all_is_union_of_categories() {
        let all = NodeCategory::All.queries();
        let parts: usize = [
            NodeCategory::Cpu,
            NodeCategory::Memory,
            NodeCategory::Disk,
            NodeCategory::Network,
            NodeCategory::Filesystem,
            NodeCategory::Load,
        ]
        .iter()
        .map(|c| c.queries().len())
        .sum();
        assert_eq!(all.len(), parts);
        assert_eq!(WindowsCategory::All.queries().len(), 13);
    }

    #[test]
    fn test_keys_unique_per_exporter() {
        for queries in [NodeCategory::All.queries(), WindowsCategory::All.queries()] {
            let mut keys: Vec<_> = queries.iter().map(|q| q.key).collect();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), queries.len());
        }
    }

    #[test]
    fn test_every_template_mentions_instance() {
        for q in NodeCategory::All.queries().iter().chain(WindowsCategory::All.queries().iter()) {
            assert!(q.template.contains("$instance"), "{}", q.key);
        }
    }
}
