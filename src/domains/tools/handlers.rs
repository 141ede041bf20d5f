//! The contract every Prometheus tool implements.
//!
//! A tool is a unit struct with a name, a description, a typed parameter
//! struct (its JSON schema is derived with `schemars`) and an async `run`.
//! Argument decoding and validation happen in [`invoke`], before `run` is
//! ever reached.

use std::sync::Arc;

use futures::future::BoxFuture;
use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ToolError;
use crate::domains::prometheus::PrometheusClient;

/// Trait implemented by every tool in the catalog.
#[async_trait::async_trait]
pub trait PrometheusTool {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// Typed, defaulted arguments.
    type Params: DeserializeOwned + JsonSchema + Send + 'static;

    /// Constraints the schema cannot express. Runs before [`Self::run`].
    fn validate(_params: &Self::Params) -> Result<(), String> {
        Ok(())
    }

    /// Execute the tool against Prometheus.
    async fn run(client: &PrometheusClient, params: Self::Params) -> Result<Value, ToolError>;

    /// Create a Tool model for this tool (metadata).
    fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<Self::Params>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

/// Type-erased tool entry point stored in the registry.
pub type ToolHandlerFn =
    fn(Arc<PrometheusClient>, JsonObject) -> BoxFuture<'static, Result<Value, ToolError>>;

/// A catalog entry: metadata plus handler.
#[derive(Clone)]
pub struct ToolEntry {
    pub tool: Tool,
    pub handler: ToolHandlerFn,
}

impl ToolEntry {
    /// Build the entry for tool `T`.
    pub fn of<T: PrometheusTool + 'static>() -> Self {
        Self {
            tool: T::to_tool(),
            handler: invoke::<T>,
        }
    }

    /// The tool name.
    pub fn name(&self) -> &str {
        &self.tool.name
    }
}

/// Decode and validate raw arguments for tool `T`.
pub fn parse_params<T: PrometheusTool>(arguments: JsonObject) -> Result<T::Params, ToolError> {
    let params: T::Params = serde_json::from_value(Value::Object(arguments))
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;
    T::validate(&params).map_err(ToolError::invalid_arguments)?;
    Ok(params)
}

/// Decode, validate, then run tool `T`.
pub fn invoke<T: PrometheusTool + 'static>(
    client: Arc<PrometheusClient>,
    arguments: JsonObject,
) -> BoxFuture<'static, Result<Value, ToolError>> {
    Box::pin(async move {
        let params = parse_params::<T>(arguments)?;
        T::run(&client, params).await
    })
}
