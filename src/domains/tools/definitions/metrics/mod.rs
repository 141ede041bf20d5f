//! Metric discovery tools.

pub mod label_values;
pub mod list;
pub mod metadata;
pub mod series;

pub use label_values::{LabelValuesParams, LabelValuesTool};
pub use list::{ListMetricsParams, ListMetricsTool};
pub use metadata::{MetricMetadataParams, MetricMetadataTool};
pub use series::{FindSeriesParams, FindSeriesTool};

use crate::domains::tools::ToolEntry;

/// Catalog entries for this group.
pub fn entries() -> Vec<ToolEntry> {
    vec![
        ToolEntry::of::<ListMetricsTool>(),
        ToolEntry::of::<MetricMetadataTool>(),
        ToolEntry::of::<LabelValuesTool>(),
        ToolEntry::of::<FindSeriesTool>(),
    ]
}
