//! Fixtures shared by tool tests: a registry wired to a wiremock server and
//! helpers to read tool results back as JSON.

use std::sync::Arc;

use rmcp::model::{CallToolResult, RawContent};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::config::PrometheusConfig;
use crate::domains::prometheus::PrometheusClient;
use crate::domains::tools::ToolRegistry;

/// Registry whose client points at `server`.
pub fn registry_for(server: &MockServer) -> ToolRegistry {
    let config = PrometheusConfig::new(&server.uri()).unwrap();
    let client = Arc::new(PrometheusClient::new(&config).unwrap());
    ToolRegistry::new(client).unwrap()
}

/// A `status: "success"` envelope around `data`.
pub fn success(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"status": "success", "data": data}))
}

/// An instant-vector query result.
pub fn vector(samples: Value) -> ResponseTemplate {
    success(json!({"resultType": "vector", "result": samples}))
}

/// Mount `response` for `GET <endpoint>`.
pub async fn mount_get(server: &MockServer, endpoint: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(response)
        .mount(server)
        .await;
}

/// The JSON payload of a tool result's text content.
pub fn payload(result: &CallToolResult) -> Value {
    match &result.content[0].raw {
        RawContent::Text(text) => serde_json::from_str(&text.text).unwrap(),
        _ => panic!("expected text content"),
    }
}

/// Call a tool and return its payload, asserting success.
pub async fn call_ok(server: &MockServer, tool: &str, arguments: Value) -> Value {
    let result = registry_for(server).call_tool(tool, arguments).await;
    let body = payload(&result);
    assert_ne!(result.is_error, Some(true), "{tool} failed: {body}");
    body
}

/// Call a tool and return its payload, asserting failure.
pub async fn call_err(server: &MockServer, tool: &str, arguments: Value) -> Value {
    let result = registry_for(server).call_tool(tool, arguments).await;
    assert_eq!(result.is_error, Some(true));
    payload(&result)
}

/// Two rule groups mixing alerting and recording rules.
pub fn rules_payload() -> Value {
    json!({"groups": [
        {
            "name": "node",
            "file": "/etc/prometheus/node.yml",
            "interval": 30,
            "rules": [
                {"name": "HighCPU", "query": "cpu > 90", "type": "alerting", "health": "ok",
                 "state": "firing", "duration": 300, "alerts": [{"labels": {}, "state": "firing"}]},
                {"name": "LowDisk", "query": "disk < 10", "type": "alerting", "health": "ok",
                 "state": "inactive", "alerts": []},
                {"name": "node:cpu:rate5m", "query": "rate(cpu[5m])", "type": "recording",
                 "health": "ok"}
            ]
        },
        {
            "name": "api",
            "file": "/etc/prometheus/api.yml",
            "rules": [
                {"name": "SlowRequests", "query": "latency > 1", "type": "alerting",
                 "health": "err", "lastError": "boom", "state": "pending", "alerts": []},
                {"name": "api:errors:rate5m", "query": "rate(errors[5m])", "type": "recording",
                 "health": "err", "lastError": "bad"}
            ]
        }
    ]})
}
