//! Values of one label.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::domains::prometheus::PrometheusClient;
use crate::domains::tools::definitions::common::{cap, require_non_empty};
use crate::domains::tools::{PrometheusTool, ToolError};

const MAX_VALUES: usize = 500;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LabelValuesParams {
    #[schemars(description = "Label name, e.g. job, instance, namespace")]
    pub label: String,
}

/// Lists every value a label takes across all series.
pub struct LabelValuesTool;

#[async_trait::async_trait]
impl PrometheusTool for LabelValuesTool {
    const NAME: &'static str = "get_label_values";

    const DESCRIPTION: &'static str = "Get all values of a label across all series (e.g. every 'job' or 'instance'). At most 500 values are returned.";

    type Params = LabelValuesParams;

    fn validate(params: &Self::Params) -> Result<(), String> {
        require_non_empty("label", &params.label)
    }

    async fn run(client: &PrometheusClient, params: Self::Params) -> Result<Value, ToolError> {
        let values = client.label_values(&params.label).await?;
        let total = values.len();
        let (values, truncated) = cap(values, MAX_VALUES);

        info!("Label {}: {} values", params.label, total);

        Ok(json!({
            "label": params.label,
            "total": total,
            "truncated": truncated,
            "values": values,
        }))
    }
}
