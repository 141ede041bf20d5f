//! Connectivity probe tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::domains::prometheus::{ConnectionCheck, PrometheusClient};
use crate::domains::tools::{PrometheusTool, ToolError, definitions::common::to_json};

/// The probe takes no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct TestConnectionParams {}

/// Structured output for a successful probe.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReport {
    pub status: &'static str,
    pub base_url: String,
    #[serde(flatten)]
    pub check: ConnectionCheck,
}

/// Checks that Prometheus answers, via build info or a fallback `up` query.
pub struct TestConnectionTool;

#[async_trait::async_trait]
impl PrometheusTool for TestConnectionTool {
    const NAME: &'static str = "test_connection";

    const DESCRIPTION: &'static str = "Test connectivity to the Prometheus server. Tries the build info endpoint first and falls back to a minimal 'up' query. Reports the server version when available and flags a degraded connection when only the fallback succeeded.";

    type Params = TestConnectionParams;

    async fn run(client: &PrometheusClient, _params: Self::Params) -> Result<Value, ToolError> {
        let check = client.check_connection().await?;
        info!(
            "Connected to {} via {:?} probe (degraded: {})",
            client.base_url(),
            check.probe,
            check.degraded
        );

        to_json(&ConnectionReport {
            status: "connected",
            base_url: client.base_url().to_string(),
            check,
        })
    }
}
