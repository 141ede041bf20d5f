//! Server build, runtime, configuration and flags.

use std::future::Future;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use crate::domains::prometheus::PrometheusClient;
use crate::domains::prometheus::PrometheusError;
use crate::domains::prometheus::types::ConfigData;
use crate::domains::tools::{PrometheusTool, ToolError};

const MAX_CONFIG_CHARS: usize = 2000;

/// Which sections to fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum InfoSection {
    Build,
    Runtime,
    Config,
    Flags,
    #[default]
    All,
}

impl InfoSection {
    fn wants(self, section: Self) -> bool {
        self == Self::All || self == section
    }
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ServerInfoParams {
    #[schemars(description = "Section to include: build, runtime, config, flags or all (default: all)")]
    #[serde(default)]
    pub include: InfoSection,
}

/// Fetch one section when wanted; a failure becomes `{ "error": .. }`.
async fn section<T, F>(name: &str, wanted: bool, fetch: F, render: fn(T) -> Value) -> Option<Value>
where
    F: Future<Output = Result<T, PrometheusError>>,
{
    if !wanted {
        return None;
    }
    Some(match fetch.await {
        Ok(data) => render(data),
        Err(e) => {
            warn!("Server info section {} failed: {}", name, e);
            json!({ "error": e.to_string() })
        }
    })
}

fn render_value<T: Serialize>(data: T) -> Value {
    serde_json::to_value(data).unwrap_or_else(|e| json!({ "error": e.to_string() }))
}

/// Config YAML, truncated to a bounded number of characters.
fn render_config(data: ConfigData) -> Value {
    let original_length = data.yaml.chars().count();
    if original_length <= MAX_CONFIG_CHARS {
        return json!({ "yaml": data.yaml, "truncated": false });
    }
    let yaml: String = data.yaml.chars().take(MAX_CONFIG_CHARS).collect();
    json!({
        "yaml": yaml,
        "truncated": true,
        "originalLength": original_length,
    })
}

/// Reports server build, runtime, configuration and flags.
pub struct ServerInfoTool;

#[async_trait::async_trait]
impl PrometheusTool for ServerInfoTool {
    const NAME: &'static str = "get_server_info";

    const DESCRIPTION: &'static str = "Get Prometheus server information: build (version, revision), runtime (start time, retention, goroutines), configuration YAML (truncated to 2000 characters) and command-line flags. Select one section with 'include' or fetch all; a failing section is reported inline.";

    type Params = ServerInfoParams;

    async fn run(client: &PrometheusClient, params: Self::Params) -> Result<Value, ToolError> {
        let include = params.include;
        info!("Server info: {:?}", include);

        let (build, runtime, config, flags) = futures::join!(
            section(
                "build",
                include.wants(InfoSection::Build),
                client.build_info(),
                render_value
            ),
            section(
                "runtime",
                include.wants(InfoSection::Runtime),
                client.runtime_info(),
                render_value
            ),
            section(
                "config",
                include.wants(InfoSection::Config),
                client.config(),
                render_config
            ),
            section(
                "flags",
                include.wants(InfoSection::Flags),
                client.flags(),
                render_value
            ),
        );

        let mut out = Map::new();
        out.insert("include".into(), json!(include));
        for (key, value) in [
            ("build", build),
            ("runtime", runtime),
            ("config", config),
            ("flags", flags),
        ] {
            if let Some(value) = value {
                out.insert(key.into(), value);
            }
        }
        Ok(Value::Object(out))
    }
}
